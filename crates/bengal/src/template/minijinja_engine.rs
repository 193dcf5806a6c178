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

//! MiniJinja adapter implementing [`super::TemplateEngine`].

use minijinja::{AutoEscape, Environment, Value};
use minijinja_contrib::filters::striptags;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::filter::{script_tag_filter, url_filter};
use super::functions::{absolute_url, date_format, tag_slug};
use super::loader::Loader;
use super::{context::Context, TemplateEngine};
use crate::error::{BuildError, ErrorKind};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// MiniJinja-backed template engine.
///
/// Holds a single `Environment` whose loader searches the theme override
/// directory before the bundled theme directory (spec §6.2 swizzling).
/// `Environment` is `Send + Sync` once built, so one instance is shared
/// read-only across the worker pool (spec §5's `TemplateEngine` row).
pub struct MinijinjaEngine {
    env: Environment<'static>,
    loader: Loader,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl MinijinjaEngine {
    /// Builds an engine searching the given directories in order.
    pub fn new<D>(dirs: D) -> Self
    where
        D: IntoIterator<Item = PathBuf>,
    {
        let dirs: Vec<PathBuf> = dirs.into_iter().collect();
        let loader = Loader::new(dirs.clone());
        let mut env = Environment::new();

        let env_loader = Loader::new(dirs);
        env.set_loader(move |name| env_loader.load(name));

        env.add_filter("striptags", striptags);
        env.add_filter("url", url_filter);
        env.add_filter("script_tag", script_tag_filter);
        env.add_function("absolute_url", absolute_url);
        env.add_function("date_format", date_format);
        env.add_function("tag_slug", tag_slug);

        // Content is rendered HTML; templates must not re-escape it, and the
        // `Dynamic -> Value` coercion already turns `Null` into an undefined
        // that MiniJinja prints as an empty string (spec §8 property 8).
        env.set_auto_escape_callback(|_| AutoEscape::None);

        MinijinjaEngine { env, loader }
    }

    fn build_value(ctx: Context) -> Value {
        let map: BTreeMap<String, Value> =
            ctx.values.into_iter().map(|(k, v)| (k, v.into())).collect();
        Value::from(map)
    }
}

impl TemplateEngine for MinijinjaEngine {
    fn render_template(
        &self, name: &str, ctx: Context,
    ) -> Result<String, BuildError> {
        let template = self.env.get_template(name).map_err(|err| {
            BuildError::new("T001", ErrorKind::Template, err.to_string())
                .with_file(name)
                .with_source(err)
        })?;
        template
            .render(Self::build_value(ctx))
            .map_err(|err| {
                BuildError::new("T002", ErrorKind::Template, err.to_string())
                    .with_file(name)
                    .with_source(err)
            })
    }

    fn template_exists(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    fn list_templates(&self) -> Vec<String> {
        self.loader.list()
    }

    fn get_template_path(&self, name: &str) -> Option<PathBuf> {
        self.loader.path(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn renders_template_with_safe_missing_attribute_access() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("page.html"),
            "<h1>{{ page.title }}</h1><p>{{ page.missing.deeper }}</p>",
        )
        .unwrap();

        let engine = MinijinjaEngine::new([dir.path().to_path_buf()]);

        let mut page = BTreeMap::new();
        page.insert(
            "title".to_string(),
            crate::structure::dynamic::Dynamic::String("Home".to_string()),
        );
        let ctx = Context::new().with(
            "page",
            crate::structure::dynamic::Dynamic::Map(page),
        );

        let html = engine.render_template("page.html", ctx).unwrap();
        assert!(html.contains("<h1>Home</h1>"));
    }

    #[test]
    fn template_exists_reflects_loader_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.html"), "hi").unwrap();
        let engine = MinijinjaEngine::new([dir.path().to_path_buf()]);
        assert!(engine.template_exists("base.html"));
        assert!(!engine.template_exists("missing.html"));
    }
}
