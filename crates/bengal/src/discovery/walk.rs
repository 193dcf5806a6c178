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

//! Content root walking (spec §4.1).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// The kind of a discovered content file, determined by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// A markdown source (`.md`).
    Markdown,
    /// An HTML passthrough source (`.html`/`.htm`).
    Html,
    /// Structured data (`.toml`/`.yaml`/`.yml`/`.json`), not itself a page.
    Data,
}

/// A file discovered while walking the content root.
#[derive(Clone, Debug)]
pub struct ContentFile {
    /// Absolute (or process-relative) path on disk.
    pub path: PathBuf,
    /// Path relative to the content root.
    pub relative_path: PathBuf,
    /// The detected content kind.
    pub kind: ContentKind,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Walks `root` and returns every recognized content file, sorted by
/// relative path for deterministic ordering (spec §8 property 1).
pub fn walk(root: &Path) -> Vec<ContentFile> {
    let mut files: Vec<ContentFile> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let path = entry.into_path();
            let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            kind_of(&path).map(|kind| ContentFile { path, relative_path, kind })
        })
        .collect();
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

fn kind_of(path: &Path) -> Option<ContentKind> {
    match path.extension().and_then(|ext| ext.to_str())?.to_ascii_lowercase().as_str() {
        "md" | "markdown" => Some(ContentKind::Markdown),
        "html" | "htm" => Some(ContentKind::Html),
        "toml" | "yaml" | "yml" | "json" => Some(ContentKind::Data),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn walk_returns_files_sorted_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("zeta.md"), "").unwrap();
        fs::write(dir.path().join("guide/intro.md"), "").unwrap();
        fs::write(dir.path().join("ignored.txt"), "").unwrap();

        let files = walk(dir.path());
        let relative: Vec<&str> =
            files.iter().map(|f| f.relative_path.to_str().unwrap()).collect();
        assert_eq!(relative, vec!["guide/intro.md", "zeta.md"]);
    }
}
