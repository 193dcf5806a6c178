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

//! Content discovery & parsing (spec §4.1): walks the content root, parses
//! frontmatter and markdown bodies, applies the data cascade, and
//! materializes the Section/Page tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{BuildError, ErrorKind, ErrorSession};
use crate::structure::dynamic::Dynamic;
use crate::structure::page::{Page, PageMeta};
use crate::structure::site::Site;

pub mod cascade;
pub mod frontmatter;
pub mod virtual_source;
pub mod walk;

pub use virtual_source::VirtualSource;
use walk::ContentKind;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A page parsed from disk, before cascade resolution.
struct RawPage {
    source_path: PathBuf,
    section_path: PathBuf,
    url: String,
    title: String,
    metadata: PageMeta,
    raw: String,
    is_index: bool,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Walks `config`'s content root and returns a fully populated [`Site`]
/// (content parsed, not yet rendered), per spec §4.1's `discover(root)`.
///
/// Frontmatter parse failures are fatal in strict mode, otherwise recorded
/// as warnings on `session` and the offending page is skipped. Discovery
/// itself (missing content root, duplicate URLs) is always fatal, per the
/// spec §7 taxonomy table.
pub fn discover(
    config: &Config, sources: &[Box<dyn VirtualSource>], session: &ErrorSession,
) -> Result<Site, BuildError> {
    let root = config.get_content_dir();
    if !root.exists() {
        return Err(BuildError::new(
            "D001",
            ErrorKind::Discovery,
            format!("content root `{}` does not exist", root.display()),
        )
        .with_hint("create the content directory or fix `build.content_dir`"));
    }

    let strict = config.build().strict;
    let production = config.build().production;
    let files = walk::walk(&root);

    let mut section_cascades: BTreeMap<PathBuf, Dynamic> = BTreeMap::new();
    let mut raw_pages: Vec<RawPage> = Vec::new();

    for file in files {
        if file.kind != ContentKind::Markdown {
            continue;
        }
        let text = std::fs::read_to_string(&file.path).map_err(|source| {
            BuildError::new("D003", ErrorKind::Discovery, format!("could not read `{}`", file.path.display()))
                .with_file(file.relative_path.clone())
                .with_source(source)
        })?;

        let parsed = frontmatter::parse(&text).map_err(|err| err.with_file(file.relative_path.clone()));
        let (metadata, body) = match parsed {
            Ok(ok) => ok,
            Err(err) => {
                if strict {
                    return Err(err);
                }
                session.warn(err);
                continue;
            }
        };

        if production && matches!(metadata.get("draft"), Some(Dynamic::Bool(true))) {
            continue;
        }

        let stem = file.relative_path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let is_index = stem == "_index" || stem == "index";
        let (version, versioned_tail) = strip_version_prefix(&file.relative_path);
        let lang = detect_lang(config, &versioned_tail, stem);
        let tail = strip_locale_folder(config, &versioned_tail, lang.as_deref());

        let section_path = tail.parent().map(Path::to_path_buf).unwrap_or_default();

        let url = build_url(&metadata, version.as_deref(), lang.as_deref(), is_index, &section_path, &tail);
        let title = derive_title(&metadata, &body, stem);

        if is_index {
            let cascade = metadata.get("cascade").cloned().unwrap_or(Dynamic::Null);
            section_cascades.insert(section_path.clone(), cascade);
        }

        raw_pages.push(RawPage {
            source_path: file.relative_path,
            section_path,
            url,
            title,
            metadata,
            raw: body,
            is_index,
        });
    }

    let mut pages: Vec<(PathBuf, bool, Page)> = Vec::new();
    for raw in raw_pages {
        let chain = cascade_chain(&raw.section_path, &section_cascades);
        let mut metadata = raw.metadata;
        cascade::apply(&mut metadata, &chain);
        let page =
            Page::new(raw.source_path, raw.section_path.clone(), raw.url, raw.title, metadata, raw.raw);
        pages.push((raw.section_path, raw.is_index, page));
    }

    for source in sources {
        for mut page in source.pages(config)? {
            page.is_virtual = true;
            let section_path = page.section_path.clone();
            let is_index = page.url.ends_with('/') && page.source_path.file_stem().and_then(|s| s.to_str()) == Some("_index");
            pages.push((section_path, is_index, page));
        }
    }

    check_duplicate_urls(&pages)?;

    let mut site = Site::new(root, config.get_site_dir().map_err(|source| {
        BuildError::new("D003", ErrorKind::Discovery, "could not create output directory").with_source(source)
    })?, config.clone());

    for (section_path, is_index, page) in pages {
        let section = site.section_mut_or_create(&section_path);
        if is_index {
            section.index = Some(page);
        } else {
            section.pages.push(page);
        }
    }

    Ok(site)
}

fn check_duplicate_urls(pages: &[(PathBuf, bool, Page)]) -> Result<(), BuildError> {
    let mut seen: BTreeMap<(Option<String>, Option<String>), BTreeMap<String, PathBuf>> = BTreeMap::new();
    for (_, _, page) in pages {
        let key = (page.version.clone(), page.lang.clone());
        let group = seen.entry(key).or_default();
        if let Some(existing) = group.get(&page.url) {
            return Err(BuildError::new(
                "D002",
                ErrorKind::Discovery,
                format!(
                    "duplicate URL `{}`: `{}` and `{}`",
                    page.url,
                    existing.display(),
                    page.source_path.display()
                ),
            ));
        }
        group.insert(page.url.clone(), page.source_path.clone());
    }
    Ok(())
}

/// Returns the cascade chain for a section path, innermost (deepest
/// ancestor with a declared cascade) first.
fn cascade_chain<'a>(
    section_path: &Path, cascades: &'a BTreeMap<PathBuf, Dynamic>,
) -> Vec<&'a Dynamic> {
    let mut chain = Vec::new();
    let mut current = Some(section_path.to_path_buf());
    while let Some(path) = current {
        if let Some(cascade) = cascades.get(&path) {
            chain.push(cascade);
        }
        current = if path.as_os_str().is_empty() { None } else { path.parent().map(Path::to_path_buf) };
    }
    chain
}

/// Splits an internal `_versions/<id>/` or `_shared/` prefix off a
/// content-relative path, returning the version id (if any, `_shared/`
/// pages are unversioned) and the remaining tail.
fn strip_version_prefix(relative: &Path) -> (Option<String>, PathBuf) {
    let mut components = relative.components();
    match components.next() {
        Some(std::path::Component::Normal(first)) if first == "_versions" => {
            if let Some(std::path::Component::Normal(id)) = components.next() {
                let version = id.to_string_lossy().into_owned();
                (Some(version), components.as_path().to_path_buf())
            } else {
                (None, relative.to_path_buf())
            }
        }
        Some(std::path::Component::Normal(first)) if first == "_shared" => {
            (None, components.as_path().to_path_buf())
        }
        _ => (None, relative.to_path_buf()),
    }
}

fn detect_lang(config: &Config, tail: &Path, stem: &str) -> Option<String> {
    use crate::config::i18n::I18nMode;
    let i18n = config.i18n();
    if i18n.locales.is_empty() {
        return None;
    }
    match i18n.mode {
        I18nMode::Folder => {
            let first = tail.components().next()?;
            let name = first.as_os_str().to_str()?;
            i18n.locales.iter().find(|l| l.code == name).map(|l| l.code.clone())
        }
        I18nMode::Suffix => {
            let parts: Vec<&str> = stem.rsplitn(2, '.').collect();
            if parts.len() == 2 {
                i18n.locales.iter().find(|l| l.code == parts[0]).map(|l| l.code.clone())
            } else {
                None
            }
        }
    }
}

/// Strips the leading locale folder off `tail` when `i18n.mode` is
/// [`I18nMode::Folder`] and a locale was detected, so the locale segment
/// doesn't also get treated as a section name.
fn strip_locale_folder(config: &Config, tail: &Path, lang: Option<&str>) -> PathBuf {
    use crate::config::i18n::I18nMode;
    if lang.is_some() && config.i18n().mode == I18nMode::Folder {
        let mut components = tail.components();
        components.next();
        components.as_path().to_path_buf()
    } else {
        tail.to_path_buf()
    }
}

fn build_url(
    metadata: &PageMeta, version: Option<&str>, lang: Option<&str>, is_index: bool,
    section_path: &Path, tail: &Path,
) -> String {
    if let Some(url) = metadata.get("url").and_then(Dynamic::as_str) {
        return url.to_string();
    }

    let mut segments: Vec<String> = Vec::new();
    if let Some(version) = version {
        segments.push(version.to_string());
    }
    if let Some(lang) = lang {
        segments.push(lang.to_string());
    }

    if is_index {
        for component in section_path.components() {
            segments.push(component.as_os_str().to_string_lossy().into_owned());
        }
    } else {
        let without_ext = tail.with_extension("");
        let mut components: Vec<String> =
            without_ext.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
        if let Some(slug) = metadata.get("slug").and_then(Dynamic::as_str) {
            if let Some(last) = components.last_mut() {
                *last = slug.to_string();
            }
        }
        segments.extend(components);
    }

    if segments.is_empty() { "/".to_string() } else { format!("/{}/", segments.join("/")) }
}

fn derive_title(metadata: &PageMeta, body: &str, stem: &str) -> String {
    if let Some(title) = metadata.get("title").and_then(Dynamic::as_str) {
        return title.to_string();
    }
    for line in body.lines() {
        if let Some(heading) = line.trim_start().strip_prefix("# ") {
            return heading.trim().to_string();
        }
    }
    let mut chars = stem.replace(['-', '_'], " ").chars().collect::<Vec<_>>();
    if let Some(first) = chars.first_mut() {
        *first = first.to_ascii_uppercase();
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_content(dir: &std::path::Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn discovers_pages_and_index_sections() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(
            &config_path,
            "[site]\ntitle = \"Example\"\n[build]\ncontent_dir = \"content\"\noutput_dir = \"output\"\n",
        )
        .unwrap();
        write_content(temp.path(), "content/_index.md", "+++\ntitle = \"Home\"\n+++\nWelcome.\n");
        write_content(temp.path(), "content/guide/_index.md", "+++\ntitle = \"Guide\"\n+++\n");
        write_content(temp.path(), "content/guide/intro.md", "+++\ntitle = \"Intro\"\nweight = 1\n+++\nHi.\n");

        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        let site = discover(&config, &[], &session).unwrap();

        assert!(site.section(Path::new("")).unwrap().index.is_some());
        let guide = site.section(Path::new("guide")).unwrap();
        assert_eq!(guide.index.as_ref().unwrap().title, "Guide");
        assert_eq!(guide.pages.len(), 1);
        assert_eq!(guide.pages[0].url, "/guide/intro/");
    }

    #[test]
    fn cascade_flows_from_section_index_to_descendant_pages() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(&config_path, "[site]\ntitle = \"Example\"\n").unwrap();
        write_content(
            temp.path(),
            "content/guide/_index.md",
            "+++\ntitle = \"Guide\"\n[cascade]\nauthor = \"Team\"\n+++\n",
        );
        write_content(temp.path(), "content/guide/intro.md", "+++\ntitle = \"Intro\"\n+++\n");

        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        let site = discover(&config, &[], &session).unwrap();

        let guide = site.section(Path::new("guide")).unwrap();
        assert_eq!(
            guide.pages[0].metadata.get("author").and_then(Dynamic::as_str),
            Some("Team")
        );
    }

    #[test]
    fn duplicate_urls_fail_discovery() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(&config_path, "[site]\ntitle = \"Example\"\n").unwrap();
        write_content(temp.path(), "content/a.md", "+++\nurl = \"/same/\"\n+++\n");
        write_content(temp.path(), "content/b.md", "+++\nurl = \"/same/\"\n+++\n");

        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        let err = discover(&config, &[], &session).unwrap_err();
        assert_eq!(err.code, "D002");
    }

    #[test]
    fn missing_content_root_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(&config_path, "[site]\ntitle = \"Example\"\n").unwrap();
        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        let err = discover(&config, &[], &session).unwrap_err();
        assert_eq!(err.code, "D001");
    }

    #[test]
    fn lenient_mode_warns_and_skips_on_bad_frontmatter() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(&config_path, "[site]\ntitle = \"Example\"\n").unwrap();
        write_content(temp.path(), "content/bad.md", "+++\ntitle = \"Unterminated\n");

        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        let site = discover(&config, &[], &session).unwrap();
        assert!(site.pages().is_empty());
        assert_eq!(session.warning_count(), 1);
    }

    #[test]
    fn strict_mode_fails_on_bad_frontmatter() {
        let temp = tempfile::tempdir().unwrap();
        let config_path = temp.path().join("bengal.toml");
        fs::write(&config_path, "[site]\ntitle = \"Example\"\n[build]\nstrict = true\n").unwrap();
        write_content(temp.path(), "content/bad.md", "+++\ntitle = \"Unterminated\n");

        let config = Config::new(&config_path).unwrap();
        let session = ErrorSession::new();
        assert!(discover(&config, &[], &session).is_err());
    }
}
