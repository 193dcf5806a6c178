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

//! The data cascade (spec §4.1): section-declared defaults that flow down
//! to descendant pages, shallow per top-level key.

use crate::structure::dynamic::Dynamic;
use crate::structure::page::PageMeta;

/// Fills every key in `page` that it does not already set from `cascades`,
/// a chain ordered innermost (deepest section) first, outermost (root)
/// last.
///
/// Semantics are shallow per top-level key: a nested map in a cascade
/// replaces, rather than merges with, any nested map already at that key
/// in a shallower cascade — only the top-level key presence is consulted
/// (spec §4.1, §9 open question, resolved in DESIGN.md).
pub fn apply(page: &mut PageMeta, cascades: &[&Dynamic]) {
    for cascade in cascades {
        let Some(map) = cascade.as_map() else { continue };
        for (key, value) in map {
            page.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map(pairs: &[(&str, Dynamic)]) -> Dynamic {
        let mut out = BTreeMap::new();
        for (k, v) in pairs {
            out.insert((*k).to_string(), v.clone());
        }
        Dynamic::Map(out)
    }

    #[test]
    fn deeper_cascade_wins_over_shallower_but_not_page() {
        let mut page = PageMeta::new();
        page.insert("title".to_string(), Dynamic::String("Mine".to_string()));

        let inner = map(&[("author", Dynamic::String("Inner".to_string()))]);
        let outer = map(&[
            ("author", Dynamic::String("Outer".to_string())),
            ("license", Dynamic::String("MIT".to_string())),
        ]);

        apply(&mut page, &[&inner, &outer]);

        assert_eq!(page.get("title").and_then(Dynamic::as_str), Some("Mine"));
        assert_eq!(page.get("author").and_then(Dynamic::as_str), Some("Inner"));
        assert_eq!(page.get("license").and_then(Dynamic::as_str), Some("MIT"));
    }
}
