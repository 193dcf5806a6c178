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

//! Internationalization settings (`[i18n]` table).

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Internationalization settings.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct I18n {
    /// Default locale code.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Configured locales.
    #[serde(default)]
    pub locales: Vec<Locale>,
    /// Whether locale-specific content lives under `<locale>/` or is
    /// distinguished by a `<name>.<locale>.md` filename suffix.
    #[serde(default)]
    pub mode: I18nMode,
    /// Whether the locale is encoded as a URL path prefix or a subdomain.
    #[serde(default)]
    pub url_strategy: UrlStrategy,
    /// Omit the locale segment for the default locale's URLs.
    #[serde(default)]
    pub hide_default_locale: bool,
    /// Fall back to the default locale when a translation is missing.
    #[serde(default = "default_true")]
    pub fallback_to_default: bool,
}

impl Default for I18n {
    fn default() -> Self {
        I18n {
            default_locale: default_locale(),
            locales: Vec::new(),
            mode: I18nMode::default(),
            url_strategy: UrlStrategy::default(),
            hide_default_locale: false,
            fallback_to_default: true,
        }
    }
}

/// A configured locale.
#[derive(Clone, Debug, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Locale code, e.g. `en`, `de`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether this is the default locale.
    #[serde(default)]
    pub default: bool,
}

/// How locale-specific content is laid out on disk.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I18nMode {
    /// `content/<locale>/...`.
    #[default]
    Folder,
    /// `<name>.<locale>.md`.
    Suffix,
}

/// How a locale is encoded in the served URL.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStrategy {
    /// `/<locale>/...`.
    #[default]
    Prefix,
    /// `<locale>.example.com`.
    Subdomain,
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}
