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

//! Bengal's build engine core: discovers content, renders it through
//! templates, and writes a static site, incrementally where it can.
//!
//! The crate follows the pipeline its modules are named for:
//! [`discovery`] walks content into a [`structure::site::Site`], [`render`]
//! turns pages into HTML via [`template`], [`writer`] commits that HTML
//! (plus assets, sitemap, feeds, manifests) to disk, and [`cache`] makes
//! repeat builds skip what hasn't changed. [`engine`] ties all of it
//! together behind a small `build`/`rebuild` API; a caller that wants a
//! file watcher or an HTTP dev server brings its own and talks to the core
//! only through [`engine::SourceEvent`].

#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod render;
pub mod structure;
pub mod template;
pub mod util;
pub mod writer;

pub use config::Config;
pub use engine::{BuildReport, Engine, SourceEvent};
pub use error::{BuildError, ErrorSession};
pub use template::GENERATOR;

/// Installs a Chrome-trace-event subscriber for the lifetime of the
/// returned guard, for profiling a slow incremental build.
#[cfg(feature = "tracing")]
pub fn setup_tracing() -> tracing_chrome::FlushGuard {
    use tracing_subscriber::layer::SubscriberExt;

    let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
        .file("trace.json")
        .include_args(true)
        .include_locations(true)
        .build();

    let subscriber = tracing_subscriber::Registry::default().with(chrome_layer);
    let _ = tracing::subscriber::set_global_default(subscriber);
    guard
}
