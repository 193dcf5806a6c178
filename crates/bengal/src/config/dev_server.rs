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

//! Dev-server hook settings (`[dev_server]` table).
//!
//! The dev server itself is an external collaborator (see spec §1); the core
//! only carries the settings it needs to hand to that collaborator.

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Dev-server hook settings.
#[derive(Clone, Debug, Hash, Default, Serialize, Deserialize)]
pub struct DevServer {
    /// Shell command run before each build.
    #[serde(default)]
    pub pre_build: Option<String>,
    /// Shell command run after each build.
    #[serde(default)]
    pub post_build: Option<String>,
    /// Glob patterns excluded from the watcher.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Regex excluded from the watcher.
    #[serde(default)]
    pub exclude_regex: Option<String>,
}
