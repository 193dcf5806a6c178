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

//! MiniJinja template loader.

use minijinja::{Error, ErrorKind};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::{fs, io};
use walkdir::WalkDir;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// MiniJinja template loader with override support.
pub struct Loader {
    /// Template search directories.
    dirs: Vec<PathBuf>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Loader {
    /// Creates a template loader.
    pub fn new<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Loads a template by name, searching all configured directories.
    pub fn load<S>(&self, name: S) -> Result<Option<String>, Error>
    where
        S: AsRef<str>,
    {
        for dir in &self.dirs {
            match fs::read_to_string(dir.join(name.as_ref())) {
                Ok(res) => return Ok(Some(res)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    // Try next directory
                }
                Err(err) => {
                    let inner = Error::new(
                        ErrorKind::InvalidOperation,
                        "could not read template",
                    );
                    return Err(inner.with_source(err));
                }
            }
        }

        // No template found
        Ok(None)
    }

    /// Returns the on-disk path a template name resolves to, searching
    /// directories in override order.
    pub fn path<S>(&self, name: S) -> Option<PathBuf>
    where
        S: AsRef<str>,
    {
        self.dirs.iter().map(|dir| dir.join(name.as_ref())).find(|p| p.is_file())
    }

    /// Lists every template name visible across all search directories,
    /// with more specific (override) directories taking precedence but not
    /// hiding names unique to less specific ones.
    pub fn list(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for dir in &self.dirs {
            for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
                if entry.file_type().is_file() {
                    if let Ok(relative) = entry.path().strip_prefix(dir) {
                        names.insert(relative.to_string_lossy().replace('\\', "/"));
                    }
                }
            }
        }
        names.into_iter().collect()
    }
}
