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

//! Configuration.

use fluent_uri::Uri;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

pub mod autodoc;
pub mod build;
pub mod dev_server;
mod error;
pub mod i18n;
pub mod menus;
pub mod site;
pub mod theme;
pub mod versioning;

pub use error::{Error, Result};

use crate::structure::dynamic::Dynamic;
use autodoc::AutodocConfig;
use build::Build;
use dev_server::DevServer;
use i18n::I18n;
use menus::MenuEntry;
use site::Site;
use theme::Theme;
use versioning::Versioning;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Parsed configuration file contents, per spec §6.1.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
struct Document {
    site: Site,
    #[serde(default)]
    build: Build,
    #[serde(default)]
    params: Dynamic,
    #[serde(default)]
    menus: std::collections::BTreeMap<String, Vec<MenuEntry>>,
    #[serde(default)]
    i18n: I18n,
    #[serde(default)]
    versioning: Versioning,
    #[serde(default)]
    autodoc: std::collections::BTreeMap<String, AutodocConfig>,
    #[serde(default)]
    dev_server: DevServer,
    #[serde(default)]
    theme: Theme,
}

/// Build configuration.
///
/// Holds the parsed configuration document together with the location it was
/// loaded from, so that relative content/theme/output directories can be
/// resolved. Shared read-only across worker threads during rendering (§5).
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Parsed document, shared cheaply across workers.
    document: Arc<Document>,
    /// Theme search directories, most specific first.
    pub theme_dirs: Vec<PathBuf>,
    /// Precomputed configuration hash, used for cache-fingerprinting (§4.4).
    pub hash: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Loads and parses the configuration file at the given path.
    pub fn new<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document: Document =
            toml::from_str(&text).map_err(|source| Error::Toml {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        let hash = {
            let mut hasher = DefaultHasher::default();
            document.hash(&mut hasher);
            hasher.finish()
        };

        let root = path.parent().unwrap_or_else(|| Path::new("."));
        let theme_dirs = {
            let mut dirs = Vec::new();
            if let Some(custom) = &document.theme.custom_dir {
                dirs.push(root.join(custom));
            }
            dirs.push(root.join("themes").join(&document.theme.name));
            dirs
        };

        Ok(Config {
            path: path.to_path_buf(),
            document: Arc::new(document),
            theme_dirs,
            hash,
        })
    }

    /// Returns the directory the configuration file is located in.
    pub fn get_root_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Returns the content root directory, resolved relative to the
    /// configuration file.
    pub fn get_content_dir(&self) -> PathBuf {
        self.get_root_dir().join(&self.document.build.content_dir)
    }

    /// Returns the site output directory, creating it if absent.
    pub fn get_site_dir(&self) -> io::Result<PathBuf> {
        let path = self.get_root_dir().join(&self.document.build.output_dir);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Returns the `.bengal/` state directory, creating it (and a
    /// `.gitignore` inside it) if absent.
    pub fn get_cache_dir(&self) -> io::Result<PathBuf> {
        let path = self.get_root_dir().join(".bengal");
        fs::create_dir_all(&path)?;

        let gitignore = path.join(".gitignore");
        if !gitignore.exists() {
            fs::write(gitignore, "*\n")?;
        }
        Ok(path)
    }

    /// Returns the base path derived from `site.baseurl`, always starting
    /// with `/` and never ending with one (unless it's the root path).
    pub fn get_base_path(&self) -> String {
        let mut base = match Uri::parse(self.document.site.baseurl.clone()) {
            Ok(uri) => uri.path().as_str().to_string(),
            Err(_) => self.document.site.baseurl.clone(),
        };
        if !base.starts_with('/') {
            base = format!("/{base}");
        }
        if base != "/" {
            base = base.trim_end_matches('/').to_string();
        }
        base
    }

    /// Returns the site settings table.
    pub fn site(&self) -> &Site {
        &self.document.site
    }

    /// Returns the build settings table.
    pub fn build(&self) -> &Build {
        &self.document.build
    }

    /// Returns the free-form site-level parameters.
    pub fn params(&self) -> &Dynamic {
        &self.document.params
    }

    /// Returns the named menus.
    pub fn menus(&self) -> &std::collections::BTreeMap<String, Vec<MenuEntry>> {
        &self.document.menus
    }

    /// Returns the internationalization settings.
    pub fn i18n(&self) -> &I18n {
        &self.document.i18n
    }

    /// Returns the versioning settings.
    pub fn versioning(&self) -> &Versioning {
        &self.document.versioning
    }

    /// Returns the autodoc settings, keyed by kind.
    pub fn autodoc(&self) -> &std::collections::BTreeMap<String, AutodocConfig> {
        &self.document.autodoc
    }

    /// Returns the dev-server hook settings.
    pub fn dev_server(&self) -> &DevServer {
        &self.document.dev_server
    }

    /// Returns the theme settings.
    pub fn theme(&self) -> &Theme {
        &self.document.theme
    }

    /// Returns the configured (or formula-derived) worker pool size.
    ///
    /// See spec §5: `min(max(2, CPU-1), 10)`, overridable by
    /// `build.parallelism`.
    pub fn worker_count(&self) -> usize {
        self.document.build.parallelism.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism()
                .map(std::num::NonZeroUsize::get)
                .unwrap_or(1);
            (cpus.saturating_sub(1)).max(2).min(10)
        })
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Hash for Config {
    /// Hashes the configuration using its precomputed hash.
    #[inline]
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u64(self.hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn new_parses_minimal_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [site]
            title = "Example"
            baseurl = "https://example.org/docs"
            "#
        )
        .unwrap();

        let config = Config::new(file.path()).unwrap();
        assert_eq!(config.site().title, "Example");
        assert_eq!(config.get_base_path(), "/docs");
        assert_eq!(config.build().output_dir, "output");
    }

    #[test]
    fn worker_count_is_bounded_between_two_and_ten() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\ntitle = \"Example\"\n").unwrap();
        let config = Config::new(file.path()).unwrap();
        let count = config.worker_count();
        assert!((2..=10).contains(&count));
    }
}
