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

//! Theme settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Theme settings.
///
/// Deliberately thin: the core only needs a theme's name, its feature
/// requirements (checked against `theme.yaml -> engine.features_used` at
/// render time, see the template contract), and an optional override
/// directory used for swizzling individual templates.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name, resolved under `themes/<name>/`.
    #[serde(default = "default_theme_name")]
    pub name: String,
    /// Site-level override directory, checked before the bundled theme.
    #[serde(default)]
    pub custom_dir: Option<PathBuf>,
    /// Feature flags the theme is expected to support.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            name: default_theme_name(),
            custom_dir: None,
            features: Vec::new(),
        }
    }
}

fn default_theme_name() -> String {
    "default".to_string()
}
