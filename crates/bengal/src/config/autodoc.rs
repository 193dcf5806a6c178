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

//! Autodoc settings (`[autodoc.<kind>]` tables).
//!
//! The core only needs to know whether a kind is enabled and where to mount
//! its output; the extractor that turns a `kind` into pages is an external
//! collaborator implementing [`crate::discovery::VirtualSource`].

use crate::structure::dynamic::Dynamic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Settings for a single autodoc kind.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct AutodocConfig {
    /// Whether this autodoc kind is active.
    #[serde(default)]
    pub enabled: bool,
    /// URL prefix pages from this kind are mounted under.
    pub output_prefix: String,
    /// Kind-specific options, opaque to the core.
    #[serde(default, flatten)]
    pub options: BTreeMap<String, Dynamic>,
}
