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

//! Site: the root aggregate (spec §3.1).

use std::path::PathBuf;

use crate::config::Config;

use super::page::Page;
use super::section::Section;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// The root aggregate produced by discovery.
///
/// `Site` exclusively owns the section tree and configuration (spec §3.2);
/// parts may be mutated only between phases (frozen during rendering, see
/// spec §5's resource table). The flat `pages()` view below is computed by
/// walking `root`, never stored redundantly.
#[derive(Clone, Debug)]
pub struct Site {
    /// Content root directory, absolute or relative to the process cwd.
    pub root_path: PathBuf,
    /// Output directory.
    pub output_path: PathBuf,
    /// Merged configuration.
    pub config: Config,
    /// Root section of the content tree.
    pub root: Section,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Site {
    /// Creates a site over an empty root section.
    pub fn new(root_path: PathBuf, output_path: PathBuf, config: Config) -> Self {
        Site { root_path, output_path, config, root: Section::new("", PathBuf::new()) }
    }

    /// Returns the union of every page in the section tree, physical and
    /// virtual alike (spec §3.1 invariant: `site.pages` is the union of
    /// page leaves plus virtual pages, the latter having been inserted
    /// into the tree at discovery time under their mount prefix).
    pub fn pages(&self) -> Vec<&Page> {
        self.root.all_pages()
    }

    /// Returns every page matching the given version (`None` = no
    /// versioning, or the unversioned/shared pages).
    pub fn pages_for_version(&self, version: Option<&str>) -> Vec<&Page> {
        self.root.pages_for_version(version)
    }

    /// Looks up a section by its content-relative path, descending
    /// component by component from the root.
    pub fn section(&self, path: &std::path::Path) -> Option<&Section> {
        let mut current = &self.root;
        for component in path.components() {
            let name = component.as_os_str().to_string_lossy();
            current = current.child(&name)?;
        }
        Some(current)
    }

    /// Looks up (and creates, if absent) the section at the given
    /// content-relative path, creating intermediate sections as needed.
    /// Used by discovery while assembling the tree bottom-up.
    pub fn section_mut_or_create(&mut self, path: &std::path::Path) -> &mut Section {
        let mut current = &mut self.root;
        for component in path.components() {
            let name = component.as_os_str().to_string_lossy().into_owned();
            let exists = current.sections.iter().any(|s| s.name == name);
            if !exists {
                let child_path = current.path.join(&name);
                current.sections.push(Section::new(name.clone(), child_path));
            }
            current = current.sections.iter_mut().find(|s| s.name == name).expect("just inserted");
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn config() -> Config {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\n").unwrap();
        Config::new(file.path()).unwrap()
    }

    #[test]
    fn section_mut_or_create_builds_intermediate_sections() {
        let mut site = Site::new(PathBuf::from("content"), PathBuf::from("output"), config());
        site.section_mut_or_create(std::path::Path::new("guide/advanced"));
        assert!(site.section(std::path::Path::new("guide")).is_some());
        assert!(site.section(std::path::Path::new("guide/advanced")).is_some());
        assert!(site.section(std::path::Path::new("missing")).is_none());
    }
}
