// Copyright (c) 2025-2026 Bengal contributors

// SPDX-License-Identifier: MIT
// All contributions are certified under the DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! Frontmatter fence detection and parsing (spec §4.1): TOML (`+++`), YAML
//! (`---`), and bare/fenced JSON (`{ ... }`).

use crate::error::{BuildError, ErrorKind};
use crate::structure::page::PageMeta;

/// Parses the leading frontmatter fence out of `text`, if present, returning
/// the parsed metadata map and the remaining body.
///
/// A file with no recognized fence has no metadata and its entire contents
/// are the body.
pub fn parse(text: &str) -> Result<(PageMeta, String), BuildError> {
    if let Some(rest) = text.strip_prefix("+++\n").or_else(|| text.strip_prefix("+++\r\n")) {
        let (fence, body) = split_fence(rest, "+++")?;
        let meta = toml::from_str(&fence).map_err(|err| {
            BuildError::new("P001", ErrorKind::Content, format!("invalid TOML frontmatter: {err}"))
                .with_source(err)
        })?;
        return Ok((meta, body));
    }
    if let Some(rest) = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n")) {
        let (fence, body) = split_fence(rest, "---")?;
        let meta = serde_yaml::from_str(&fence).map_err(|err| {
            BuildError::new("P001", ErrorKind::Content, format!("invalid YAML frontmatter: {err}"))
                .with_source(err)
        })?;
        return Ok((meta, body));
    }
    if text.trim_start().starts_with('{') {
        if let Some((fence, body)) = split_json(text) {
            let meta = serde_json::from_str(&fence).map_err(|err| {
                BuildError::new("P001", ErrorKind::Content, format!("invalid JSON frontmatter: {err}"))
                    .with_source(err)
            })?;
            return Ok((meta, body));
        }
    }
    Ok((PageMeta::new(), text.to_string()))
}

fn split_fence(rest: &str, fence: &str) -> Result<(String, String), BuildError> {
    let closing = format!("\n{fence}");
    match rest.find(&closing) {
        Some(idx) => {
            let body_start = idx + closing.len();
            let body = rest[body_start..].trim_start_matches(['\r', '\n']).to_string();
            Ok((rest[..idx].to_string(), body))
        }
        None => Err(BuildError::new(
            "P001",
            ErrorKind::Content,
            format!("unterminated `{fence}` frontmatter fence"),
        )
        .with_hint(format!("add a closing `{fence}` line"))),
    }
}

/// Parses a bare JSON object frontmatter fence: a `{ ... }` block at the
/// start of the file, delimited by brace balance rather than a marker line.
fn split_json(text: &str) -> Option<(String, String)> {
    let bytes = text.as_bytes();
    let start = text.len() - text.trim_start().len();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        let ch = byte as char;
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = i + 1;
                    let fence = text[start..end].to_string();
                    let body = text[end..].trim_start_matches(['\r', '\n']).to_string();
                    return Some((fence, body));
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_fence() {
        let (meta, body) = parse("+++\ntitle = \"Hi\"\n+++\nBody.\n").unwrap();
        assert_eq!(meta.get("title").and_then(crate::structure::dynamic::Dynamic::as_str), Some("Hi"));
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn parses_yaml_fence() {
        let (meta, body) = parse("---\ntitle: Hi\n---\nBody.\n").unwrap();
        assert_eq!(meta.get("title").and_then(crate::structure::dynamic::Dynamic::as_str), Some("Hi"));
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn parses_bare_json_fence() {
        let (meta, body) = parse("{\"title\": \"Hi\"}\nBody.\n").unwrap();
        assert_eq!(meta.get("title").and_then(crate::structure::dynamic::Dynamic::as_str), Some("Hi"));
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn no_fence_returns_whole_text_as_body() {
        let (meta, body) = parse("# Just markdown\n").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn unterminated_fence_errors_with_hint() {
        let err = parse("+++\ntitle = \"Hi\"\n").unwrap_err();
        assert_eq!(err.code, "P001");
        assert!(err.hint.is_some());
    }
}
