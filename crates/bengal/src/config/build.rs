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

//! Build settings (`[build]` table).

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Build settings.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct Build {
    /// Output directory, relative to the configuration file.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Content root directory, relative to the configuration file.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
    /// Worker pool size override; `None` uses the §5 sizing formula.
    #[serde(default)]
    pub parallelism: Option<usize>,
    /// Strict mode: directive/template/content errors become fatal.
    #[serde(default)]
    pub strict: bool,
    /// Production flag: excludes draft pages, enables asset fingerprinting.
    #[serde(default)]
    pub production: bool,
    /// Validate directive contracts even outside strict mode.
    #[serde(default = "default_true")]
    pub validate_contracts: bool,
    /// Delete output files not produced by this build.
    #[serde(default)]
    pub prune_output: bool,
}

impl Default for Build {
    fn default() -> Self {
        Build {
            output_dir: default_output_dir(),
            content_dir: default_content_dir(),
            parallelism: None,
            strict: false,
            production: false,
            validate_contracts: true,
            prune_output: false,
        }
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_true() -> bool {
    true
}
