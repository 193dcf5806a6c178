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

//! Documentation versioning settings (`[versioning]` table).

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Versioning settings.
#[derive(Clone, Debug, Hash, Default, Serialize, Deserialize)]
pub struct Versioning {
    /// Whether versioning is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Identifier of the default version.
    #[serde(default)]
    pub default: Option<String>,
    /// Ordered list of known versions.
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Versioning {
    /// Returns the identifier of the default version, falling back to the
    /// first configured version.
    pub fn default_id(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.versions.iter().find(|v| v.default).map(|v| v.id.as_str()))
            .or_else(|| self.versions.first().map(|v| v.id.as_str()))
    }
}

/// A single documentation version.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Stable identifier, used in paths (`_versions/<id>/`).
    pub id: String,
    /// Internal name.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Whether this is the default version.
    #[serde(default)]
    pub default: bool,
}
