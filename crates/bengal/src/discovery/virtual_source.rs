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

//! Virtual content sources (spec §3.1, §4.1): collaborators that produce
//! page-shaped objects without a backing file, mounted into the section
//! tree under a configured URL prefix. Autodoc extraction (Python AST,
//! OpenAPI, CLI introspection) is the intended concrete use, but is out of
//! scope for the core (spec §1) — only the trait boundary lives here.

use crate::config::Config;
use crate::error::BuildError;
use crate::structure::page::Page;

/// A collaborator that produces pages outside of filesystem discovery.
pub trait VirtualSource: Send + Sync {
    /// A short, stable name identifying this source (used in diagnostics).
    fn name(&self) -> &str;

    /// Produces this source's pages for the given build configuration.
    ///
    /// Implementations must set [`Page::is_virtual`] (and
    /// [`Page::is_autodoc`] where applicable) on every returned page.
    fn pages(&self, config: &Config) -> Result<Vec<Page>, BuildError>;
}

/// A virtual source that always returns a fixed set of pages.
///
/// The illustrative implementation named in SPEC_FULL.md §3: exercises the
/// `VirtualSource` boundary in tests without pulling in a real extractor.
pub struct StaticVirtualSource {
    name: String,
    pages: Vec<Page>,
}

impl StaticVirtualSource {
    /// Creates a source that always yields `pages`, tagged virtual.
    pub fn new(name: impl Into<String>, mut pages: Vec<Page>) -> Self {
        for page in &mut pages {
            page.is_virtual = true;
        }
        StaticVirtualSource { name: name.into(), pages }
    }
}

impl VirtualSource for StaticVirtualSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn pages(&self, _config: &Config) -> Result<Vec<Page>, BuildError> {
        Ok(self.pages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::page::PageMeta;
    use std::io::Write as _;
    use std::path::PathBuf;

    #[test]
    fn static_source_marks_pages_virtual() {
        let page = Page::new(
            PathBuf::from("virtual/example.md"),
            PathBuf::from("virtual"),
            "/virtual/example/".to_string(),
            "Example".to_string(),
            PageMeta::new(),
            String::new(),
        );
        let source = StaticVirtualSource::new("example", vec![page]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\n").unwrap();
        let config = Config::new(file.path()).unwrap();

        let pages = source.pages(&config).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_virtual);
        assert_eq!(source.name(), "example");
    }
}
