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

//! Per-page render context and cascading parameter resolution (spec §4.3, §9).

use std::collections::BTreeMap;

use crate::structure::dynamic::Dynamic;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A cascading view over `params`: page metadata, then each enclosing
/// section's cascaded metadata (innermost first), then site-level `params`.
///
/// Implements the cascade law of spec §8 property 6: `params[k] =
/// page.metadata[k] OR innermost-section-cascade[k] OR ... OR
/// site.params[k] OR empty`. Nested maps cascade key-by-key, not as whole
/// values: a lookup walks the stack independently for every key accessed.
#[derive(Clone, Debug)]
pub struct ParamsView {
    /// Layers consulted in order, most specific first.
    layers: Vec<Dynamic>,
}

impl ParamsView {
    /// Builds a view from page metadata, the section cascade stack (root
    /// last), and site-level params.
    pub fn new(
        page: Dynamic, section_cascades: Vec<Dynamic>, site_params: Dynamic,
    ) -> Self {
        let mut layers = vec![page];
        layers.extend(section_cascades);
        layers.push(site_params);
        ParamsView { layers }
    }

    /// Resolves a single key, walking the stack until a layer defines it.
    /// Missing at every layer yields [`Dynamic::Null`], never an error —
    /// this is the safe-access contract of spec §4.3/§8 property 8.
    pub fn get(&self, key: &str) -> Dynamic {
        for layer in &self.layers {
            if let Some(value) = layer.get(key) {
                if !value.is_null() {
                    return value.clone();
                }
            }
        }
        Dynamic::Null
    }

    /// Materializes the full merged map, key-by-key, for contexts that need
    /// to iterate rather than look up a single key (e.g. template `params`
    /// globals).
    pub fn to_map(&self) -> BTreeMap<String, Dynamic> {
        let mut keys: Vec<&str> = Vec::new();
        for layer in &self.layers {
            if let Some(map) = layer.as_map() {
                for key in map.keys() {
                    if !keys.contains(&key.as_str()) {
                        keys.push(key.as_str());
                    }
                }
            }
        }
        keys.into_iter().map(|k| (k.to_string(), self.get(k))).collect()
    }
}

// ----------------------------------------------------------------------------

/// The full per-render context handed to a [`super::TemplateEngine`].
///
/// Mirrors the shape of spec §4.3: `{ page, site, config, params, section,
/// posts?, subsections?, tag?, pagination?, content, content_html }`. Field
/// absence (e.g. `tag` outside a taxonomy render) is represented by simply
/// omitting the entry — engines must expose safe access to undefined keys.
#[derive(Clone, Debug, Default)]
pub struct Context {
    /// Named values available to the template.
    pub values: BTreeMap<String, Dynamic>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named value, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Dynamic>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl From<String> for Dynamic {
    fn from(value: String) -> Self {
        Dynamic::String(value)
    }
}

impl From<&str> for Dynamic {
    fn from(value: &str) -> Self {
        Dynamic::String(value.to_string())
    }
}

impl From<bool> for Dynamic {
    fn from(value: bool) -> Self {
        Dynamic::Bool(value)
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
    fn cascade_prefers_page_then_section_then_site() {
        let page = map(&[("title", Dynamic::String("Page".into()))]);
        let inner_section = map(&[("author", Dynamic::String("Inner".into()))]);
        let outer_section = map(&[
            ("author", Dynamic::String("Outer".into())),
            ("license", Dynamic::String("MIT".into())),
        ]);
        let site = map(&[("license", Dynamic::String("Site".into()))]);

        let view = ParamsView::new(page, vec![inner_section, outer_section], site);

        assert_eq!(view.get("title"), Dynamic::String("Page".into()));
        assert_eq!(view.get("author"), Dynamic::String("Inner".into()));
        assert_eq!(view.get("license"), Dynamic::String("MIT".into()));
        assert_eq!(view.get("missing"), Dynamic::Null);
    }
}
