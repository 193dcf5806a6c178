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

//! Template rendering engine abstraction and MiniJinja adapter.

use std::path::PathBuf;

pub mod context;
mod filter;
mod functions;
pub mod minijinja_engine;

mod loader;

use loader::Loader;

use crate::error::BuildError;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// A pluggable rendering engine (spec §4.2, §9).
///
/// Engine instances are expected to be thread-safe once constructed: the
/// rendering pipeline hands one `Arc<dyn TemplateEngine>` to every worker.
pub trait TemplateEngine: Send + Sync {
    /// Renders the named template with the given context.
    fn render_template(
        &self, name: &str, ctx: context::Context,
    ) -> Result<String, BuildError>;

    /// Returns whether a template with the given name is known to the engine.
    fn template_exists(&self, name: &str) -> bool;

    /// Lists every template name known to the engine.
    fn list_templates(&self) -> Vec<String>;

    /// Returns the on-disk path a template name resolves to, if any.
    fn get_template_path(&self, name: &str) -> Option<PathBuf>;
}

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Generator string embedded in rendered pages.
pub const GENERATOR: &str =
    concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));
