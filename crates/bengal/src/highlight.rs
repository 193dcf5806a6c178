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

//! Syntax highlighting seam for fenced code blocks.
//!
//! The core does not ship a highlighter; it depends on a small trait so an
//! external collaborator (a tree-sitter or syntect based crate, say) can be
//! plugged in without the rendering pipeline knowing the difference. The
//! default implementation here only escapes and wraps the code, matching
//! plain markdown's fenced-code behavior.

use std::fmt::Write as _;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Highlights a fenced code block's contents into HTML.
///
/// Implementations receive the raw (unescaped) code and the fence's info
/// string (e.g. `rust` in `` ```rust ``), and return a complete `<pre>`
/// element ready to splice into the rendered page. Shared read-only across
/// render workers (§5), so implementations must be `Send + Sync`.
pub trait SyntaxHighlighter: Send + Sync {
    /// Renders `code` (language `lang`, empty if the fence had no info
    /// string) to an HTML `<pre>` block.
    fn highlight(&self, code: &str, lang: &str) -> String;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A pass-through highlighter: escapes the code and wraps it in
/// `<pre><code>`, without any token coloring. Used when no highlighter is
/// configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl SyntaxHighlighter for PlainHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> String {
        let escaped = escape_html(code);
        if lang.is_empty() {
            format!("<pre><code>{escaped}</code></pre>\n")
        } else {
            format!("<pre><code class=\"language-{lang}\">{escaped}</code></pre>\n")
        }
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => {
                let _ = write!(out, "{ch}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_highlighter_escapes_and_wraps() {
        let html = PlainHighlighter.highlight("<b>&1</b>", "rust");
        assert_eq!(html, "<pre><code class=\"language-rust\">&lt;b&gt;&amp;1&lt;/b&gt;</code></pre>\n");
    }

    #[test]
    fn plain_highlighter_omits_language_class_when_absent() {
        let html = PlainHighlighter.highlight("plain", "");
        assert_eq!(html, "<pre><code>plain</code></pre>\n");
    }
}
