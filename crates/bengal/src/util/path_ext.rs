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

//! Path helpers for URL-shaped paths.
//!
//! Logical URLs are manipulated as [`Path`]s throughout the crate (it gives us
//! `join`/`components` for free), but they are never touched on the real
//! filesystem, so the usual `fs::canonicalize`-based relativization doesn't
//! apply. These two helpers instead operate purely on path components.

use std::path::{Component, Path, PathBuf};

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Extension methods for URL-shaped paths.
pub trait PathExt {
    /// Removes `.`/`..` components without touching the filesystem.
    fn normalize(&self) -> PathBuf;

    /// Computes `self`'s path relative to `base`, treating both as siblings
    /// under a common root (as two logical URLs are).
    fn relative_to<P>(&self, base: P) -> PathBuf
    where
        P: AsRef<Path>;
}

impl<T> PathExt for T
where
    T: AsRef<Path>,
{
    fn normalize(&self) -> PathBuf {
        let mut out = PathBuf::new();
        for component in self.as_ref().components() {
            match component {
                Component::ParentDir => {
                    if !matches!(out.components().next_back(), None | Some(Component::ParentDir))
                    {
                        out.pop();
                    } else {
                        out.push(component);
                    }
                }
                Component::CurDir => {}
                other => out.push(other),
            }
        }
        out
    }

    fn relative_to<P>(&self, base: P) -> PathBuf
    where
        P: AsRef<Path>,
    {
        let target: Vec<_> = self.as_ref().normalize().components().collect();
        let mut base: Vec<_> = base.as_ref().normalize().components().collect();

        // A logical URL's base is the directory it resolves relative to; if
        // it looks like a file (has an extension or is `index.html`-shaped),
        // drop the last component to get that directory.
        base.pop();

        let common = target
            .iter()
            .zip(base.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut out = PathBuf::new();
        for _ in common..base.len() {
            out.push("..");
        }
        for component in &target[common..] {
            out.push(component);
        }

        if out.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_parent_and_current_dirs() {
        assert_eq!(Path::new("a/./b/../c").normalize(), PathBuf::from("a/c"));
        assert_eq!(Path::new("../a").normalize(), PathBuf::from("../a"));
    }

    #[test]
    fn relative_to_computes_sibling_paths() {
        assert_eq!(
            Path::new("guide/install/").relative_to("guide/intro/"),
            PathBuf::from("../install")
        );
        assert_eq!(
            Path::new("index.html").relative_to("guide/intro/"),
            PathBuf::from("../../index.html")
        );
    }
}
