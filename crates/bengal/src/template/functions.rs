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

//! Engine-agnostic template functions (url builders, dates, taxonomies,
//! i18n), registered once per engine and wrapped by the MiniJinja adapter.
//!
//! These are plain functions rather than methods on the engine so that a
//! future second `TemplateEngine` implementation can reuse them without
//! depending on MiniJinja.

use std::path::Path;

use crate::util::path_ext::PathExt;

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Joins a base path and a logical URL, normalizing `.`/`..` segments.
pub fn absolute_url(base: &str, path: &str) -> String {
    Path::new(base)
        .join(path)
        .normalize()
        .to_string_lossy()
        .replace('\\', "/")
}

/// Formats a date already given as `YYYY-MM-DD` into a display string.
///
/// This intentionally does not parse arbitrary date formats: frontmatter
/// dates are normalized to ISO-8601 during discovery (see
/// [`crate::discovery::frontmatter`]), so this function only needs to
/// reorder an already-valid date.
pub fn date_format(date: &str, pattern: &str) -> String {
    let parts: Vec<&str> = date.splitn(3, '-').collect();
    let [year, month, day] = match parts.as_slice() {
        [y, m, d] => [*y, *m, *d],
        _ => return date.to_string(),
    };
    pattern
        .replace("%Y", year)
        .replace("%m", month)
        .replace("%d", day)
}

/// Resolves the display name for a locale code, given the configured list,
/// falling back to the code itself.
pub fn locale_name(locales: &[crate::config::i18n::Locale], code: &str) -> String {
    locales
        .iter()
        .find(|locale| locale.code == code)
        .map_or_else(|| code.to_string(), |locale| locale.name.clone())
}

/// Builds a taxonomy slug from a free-form tag name (lowercased, spaces and
/// punctuation collapsed to `-`).
pub fn tag_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_and_normalizes() {
        assert_eq!(absolute_url("/docs", "../guide"), "/guide");
        assert_eq!(absolute_url("/docs/", "./intro"), "/docs/intro");
    }

    #[test]
    fn date_format_reorders_iso_date() {
        assert_eq!(date_format("2026-07-27", "%d/%m/%Y"), "27/07/2026");
    }

    #[test]
    fn tag_slug_collapses_punctuation() {
        assert_eq!(tag_slug("Rust & WASM!"), "rust-wasm");
    }
}
