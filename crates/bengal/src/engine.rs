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

//! The build orchestrator (spec §2, §4, §5): wires discovery, the
//! incremental cache, the render worker pool, and the output writer into
//! the discover -> plan -> render -> postprocess -> write pipeline.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crossbeam::channel::unbounded;

use crate::cache::fingerprint::{fingerprint_file, Fingerprint};
use crate::cache::{self, BuildCache};
use crate::config::Config;
use crate::discovery::{self, VirtualSource};
use crate::error::{BuildError, ErrorSession};
use crate::highlight::{PlainHighlighter, SyntaxHighlighter};
use crate::render::{self, RenderedPage};
use crate::structure::markdown::Dependencies;
use crate::structure::directive::Registry;
use crate::structure::dynamic::Dynamic;
use crate::structure::nav::{NavTreeCache, NavTreeContext};
use crate::structure::page::Page;
use crate::structure::section::Section;
use crate::structure::site::Site;
use crate::template::minijinja_engine::MinijinjaEngine;
use crate::template::TemplateEngine;
use crate::writer::{RssEntry, SitemapEntry, VersionManifestEntry, Writer};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// A change reported by an external file watcher (spec §5's interface
/// boundary: the core never watches the filesystem itself).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceEvent {
    /// A new source file appeared.
    Created(std::path::PathBuf),
    /// An existing source file's contents changed.
    Modified(std::path::PathBuf),
    /// A source file was deleted.
    Removed(std::path::PathBuf),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Summary of one build (spec §2's orchestrator output).
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    /// Total pages discovered this build.
    pub total_pages: usize,
    /// Pages actually re-rendered (the rest kept their prior output: an
    /// unchanged fingerprint, no affected dependency, and an existing
    /// output fingerprint).
    pub rendered_pages: usize,
    /// Assets copied from `assets/`/`static/`.
    pub assets_copied: usize,
    /// Output files removed by pruning (always 0 unless `build.prune_output`
    /// is set).
    pub pruned_files: usize,
    /// Non-fatal warnings collected across every phase.
    pub warnings: Vec<BuildError>,
}

/// Ties discovery, the incremental cache, the render worker pool, and the
/// output writer together.
///
/// Keeps the previous build's [`Site`] in memory so a long-running caller
/// (a dev server driving successive [`Engine::rebuild`] calls) can detect
/// structural changes without re-deriving them from the on-disk cache
/// alone (spec §4.4). A one-shot CLI build only ever calls [`Engine::build`]
/// once, for which this just means "the first build is always full."
pub struct Engine {
    config: Config,
    sources: Vec<Box<dyn VirtualSource>>,
    highlighter: Arc<dyn SyntaxHighlighter>,
    registry: Arc<Registry>,
    nav_cache: NavTreeCache,
    previous_site: Mutex<Option<Site>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Engine {
    /// Creates an engine for `config`, with no virtual content sources and
    /// the default (non-highlighting) syntax highlighter.
    pub fn new(config: Config) -> Self {
        Engine {
            config,
            sources: Vec::new(),
            highlighter: Arc::new(PlainHighlighter),
            registry: Arc::new(Registry::with_builtins()),
            nav_cache: NavTreeCache::new(),
            previous_site: Mutex::new(None),
        }
    }

    /// Registers a virtual content source (spec §3's autodoc/collaborator
    /// seam), consulted on every discovery pass alongside the content root.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn VirtualSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Installs a syntax highlighter, replacing the default pass-through.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Arc<dyn SyntaxHighlighter>) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Runs a full build: discover, plan, render, postprocess, write.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        self.run(None)
    }

    /// Runs an incremental build triggered by watcher `events` (spec §5).
    /// The events themselves only inform logging here; the actual set of
    /// pages to re-render is always recomputed from the fingerprint and
    /// dependency comparison against the prior cache and in-memory
    /// [`Site`], whatever triggered the call.
    pub fn rebuild(&self, events: &[SourceEvent]) -> Result<BuildReport, BuildError> {
        for event in events {
            log_event(event);
        }
        self.run(Some(events))
    }

    fn run(&self, _events: Option<&[SourceEvent]>) -> Result<BuildReport, BuildError> {
        let session = ErrorSession::new();
        let mut cache = BuildCache::load(&self.config, &session);
        let site = discovery::discover(&self.config, &self.sources, &session)?;

        let structural = self.detect_structural_change(&site);
        if structural {
            self.nav_cache.invalidate();
        }

        let template_engine: Arc<dyn TemplateEngine> =
            Arc::new(MinijinjaEngine::new(self.config.theme_dirs.clone()));

        let all_pages: Vec<&Page> = site.pages();
        let mut changed_keys: Vec<String> = Vec::new();
        let mut fingerprints: BTreeMap<String, Fingerprint> = BTreeMap::new();
        for page in all_pages.iter().copied() {
            let key = source_key(page);
            let fingerprint = fingerprint_of(&self.config, &site, page);
            if !cache.is_unchanged(&key, &fingerprint) {
                changed_keys.push(key.clone());
            }
            fingerprints.insert(key, fingerprint);
        }

        let affected = cache.affected_by(&changed_keys);
        let needs_render = |page: &Page| -> bool {
            structural
                || affected.contains(&source_key(page))
                || cache.output_fingerprint(&page.url).is_none()
        };

        let selected: Vec<&Page> =
            all_pages.iter().copied().filter(|page| needs_render(*page)).collect();
        let strict = self.config.build().strict;

        let outcomes = self.render_selected(&site, &selected, &template_engine, strict);

        let mut writer = Writer::new(site.output_path.clone());
        let mut report = BuildReport { total_pages: all_pages.len(), ..BuildReport::default() };
        let mut rendered_dependencies: Vec<(String, Dependencies)> = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(rendered) => {
                    writer.write_page(&rendered)?;
                    record_dependencies(&mut cache, &rendered);
                    cache.record_output(rendered.url.clone(), rendered.output_hash.clone());
                    rendered_dependencies.push((rendered.url.clone(), rendered.dependencies.clone()));
                    report.rendered_pages += 1;
                    report.warnings.extend(rendered.warnings);
                }
                Err(err) => {
                    if strict {
                        return Err(err);
                    }
                    session.warn(err);
                }
            }
        }

        for (key, fingerprint) in fingerprints {
            cache.record(key, fingerprint);
        }

        for page in all_pages.iter().copied() {
            writer.expect_page(&page.url);
        }

        let (assets_copied, asset_manifest) = self.copy_assets(&mut writer)?;
        report.assets_copied = assets_copied;
        self.write_site_artifacts(&site, &mut writer)?;

        for warning in missing_dependency_warnings(&rendered_dependencies, &asset_manifest) {
            if strict {
                return Err(warning);
            }
            session.warn(warning);
        }

        report.pruned_files = writer.prune(self.config.build().prune_output)?;

        cache.save(&self.config)?;
        *self.previous_site.lock().expect("engine mutex poisoned") = Some(site);

        let (warnings, errors) = session.drain();
        report.warnings.extend(warnings);
        if let Some(first) = errors.into_iter().next() {
            return Err(first);
        }

        Ok(report)
    }

    /// Compares the freshly discovered `site` against the previous build's
    /// site (if any) for a structural change (spec §4.4): a title, weight,
    /// section, version, tag, icon, or cascade change, or a page
    /// appearing/disappearing. Every page's rendered HTML bakes in the full
    /// `NavTree`, so a structural change forces a full re-render rather
    /// than a selective one.
    fn detect_structural_change(&self, site: &Site) -> bool {
        let previous = self.previous_site.lock().expect("engine mutex poisoned");
        let Some(previous) = previous.as_ref() else { return true };

        let previous_pages = previous.pages();
        let current_pages = site.pages();
        if previous_pages.len() != current_pages.len() {
            return true;
        }
        for page in current_pages.iter().copied() {
            let before = previous_pages.iter().copied().find(|p| p.source_path == page.source_path);
            if cache::structural_changed(before, page) {
                return true;
            }
        }
        for page in previous_pages.iter().copied() {
            if cache::page_removed(&page.source_path, &current_pages) {
                return true;
            }
        }
        false
    }

    /// Renders `selected` across a fixed worker pool sized by
    /// `Config::worker_count` (spec §4.2/§5), ordered largest-source-first
    /// so a handful of long pages don't straggle behind a pool of workers
    /// that finished the short ones.
    fn render_selected(
        &self, site: &Site, selected: &[&Page], engine: &Arc<dyn TemplateEngine>, strict: bool,
    ) -> Vec<Result<RenderedPage, BuildError>> {
        if selected.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<&Page> = selected.to_vec();
        ordered.sort_by_key(|page| std::cmp::Reverse(page.raw.len()));

        let worker_count = self.config.worker_count().min(ordered.len());
        let (job_tx, job_rx) = unbounded::<&Page>();
        let (result_tx, result_rx) = unbounded::<Result<RenderedPage, BuildError>>();
        for page in ordered.iter().copied() {
            job_tx.send(page).expect("job channel outlives senders");
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..worker_count.max(1) {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    while let Ok(page) = job_rx.recv() {
                        let section = site.section(&page.section_path).unwrap_or(&site.root);
                        let tree = self.nav_cache.get(site, page.version.as_deref());
                        let nav = NavTreeContext::new(&tree, page.url.clone());
                        let outcome = render::render_page(
                            page, site, section, &[], &nav, engine.as_ref(), &self.registry,
                            self.highlighter.as_ref(), strict,
                        );
                        let _ = result_tx.send(outcome);
                    }
                });
            }
            drop(result_tx);
        });

        result_rx.iter().collect()
    }

    /// Walks `assets/` and `static/` under the configuration root, copying
    /// every file to the output directory (spec §6.2: these directories
    /// are not content, never parsed, only copied). Files under `assets/`
    /// are content-fingerprinted in production builds so long-lived caching
    /// headers are safe to set; `static/` is copied verbatim, matching
    /// conventional SSG behavior for files that must keep a fixed name
    /// (`favicon.ico`, `robots.txt`).
    fn copy_assets(&self, writer: &mut Writer) -> Result<(usize, BTreeMap<String, String>), BuildError> {
        let root = self.config.get_root_dir();
        let production = self.config.build().production;
        let mut manifest = BTreeMap::new();
        let mut copied = 0;

        for (dir_name, fingerprint) in [("assets", production), ("static", false)] {
            let dir = root.join(dir_name);
            if !dir.exists() {
                continue;
            }
            for entry in walkdir::WalkDir::new(&dir).into_iter().filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&dir)
                    .expect("walked entries are under dir")
                    .to_string_lossy()
                    .replace('\\', "/");
                let logical = format!("/{relative}");
                let final_logical = writer.copy_asset(entry.path(), &logical, fingerprint)?;
                manifest.insert(logical, final_logical);
                copied += 1;
            }
        }

        if !manifest.is_empty() {
            writer.write_asset_manifest(&manifest)?;
        }
        Ok((copied, manifest))
    }

    /// Writes the site-wide artifacts that depend on the full page set
    /// rather than any single page: `sitemap.xml`, `_redirects`, per-section
    /// `rss.xml`, and `_version-manifest.json` (spec §4.5).
    fn write_site_artifacts(&self, site: &Site, writer: &mut Writer) -> Result<(), BuildError> {
        let pages = site.pages();

        let sitemap_entries: Vec<SitemapEntry> = pages
            .iter()
            .copied()
            .map(|page| SitemapEntry { loc: page.url.clone(), alternates: self.alternates_for(&pages, page) })
            .collect();
        writer.write_sitemap(&sitemap_entries)?;

        let mut aliases = BTreeMap::new();
        for page in &pages {
            for alias in &page.aliases {
                aliases.insert(alias.clone(), page.url.clone());
            }
        }
        if !aliases.is_empty() {
            writer.write_redirects(&aliases)?;
        }

        self.write_section_feeds(&site.root, writer)?;

        if self.config.versioning().enabled {
            let version_ids: Vec<String> =
                self.config.versioning().versions.iter().map(|v| v.id.clone()).collect();
            let mut manifest = BTreeMap::new();
            for version in &self.config.versioning().versions {
                let tree = self.nav_cache.get(site, Some(version.id.as_str()));
                let urls: Vec<String> = tree.urls().into_iter().map(str::to_string).collect();

                let mut fallbacks: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
                for other in &version_ids {
                    if *other == version.id {
                        continue;
                    }
                    let targets: BTreeMap<String, String> = urls
                        .iter()
                        .map(|url| (url.clone(), self.nav_cache.version_switch_target(site, other, url)))
                        .collect();
                    fallbacks.insert(other.clone(), targets);
                }

                manifest.insert(version.id.clone(), VersionManifestEntry { urls, fallbacks });
            }
            writer.write_version_manifest(&manifest)?;
        }

        Ok(())
    }

    /// hreflang alternates for one page: the same tail URL under every
    /// other configured locale, kept only when that URL is actually known
    /// (i.e. a translation exists). Versioning has its own artifact
    /// (`_version-manifest.json`) rather than hreflang entries, since
    /// hreflang is a language signal, not a version one.
    fn alternates_for(&self, pages: &[&Page], page: &Page) -> Vec<(String, String)> {
        let Some(lang) = page.lang.as_deref() else { return Vec::new() };
        let mut alternates = Vec::new();
        for locale in &self.config.i18n().locales {
            if locale.code == lang {
                continue;
            }
            if let Some(candidate) = swap_locale_segment(&page.url, lang, &locale.code) {
                if pages.iter().any(|p| p.url == candidate) {
                    alternates.push((locale.code.clone(), candidate));
                }
            }
        }
        alternates
    }

    /// Recursively emits one `rss.xml` per section that has at least one
    /// dated page, most recent first.
    fn write_section_feeds(&self, section: &Section, writer: &mut Writer) -> Result<(), BuildError> {
        let mut entries: Vec<RssEntry> = section
            .pages
            .iter()
            .filter(|page| page.date.is_some())
            .map(|page| RssEntry {
                title: page.title.clone(),
                url: page.url.clone(),
                date: page.date.clone(),
                summary: page.metadata.get("description").and_then(Dynamic::as_str).map(str::to_string),
            })
            .collect();

        if !entries.is_empty() {
            entries.sort_by(|a, b| b.date.cmp(&a.date));
            let relative = if section.path.as_os_str().is_empty() {
                "rss.xml".to_string()
            } else {
                format!("{}/rss.xml", section.path.to_string_lossy())
            };
            writer.write_rss(&relative, &entries, &self.config.site().title, &self.config.site().baseurl)?;
        }

        for child in &section.sections {
            self.write_section_feeds(child, writer)?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// The cache key a page is fingerprinted and depended-upon under: its
/// source path relative to the content root, which is stable across builds
/// for physical pages and synthesized consistently for virtual ones.
fn source_key(page: &Page) -> String {
    page.source_path.to_string_lossy().into_owned()
}

/// Fingerprints a page's backing source: reads the file on disk for
/// physical content, or hashes the page's already-loaded fields for a
/// virtual source (spec §3.3's virtual sources have no file to stat).
fn fingerprint_of(config: &Config, site: &Site, page: &Page) -> Fingerprint {
    if page.is_virtual {
        let mut buffer = page.raw.clone();
        buffer.push('\u{0}');
        buffer.push_str(&page.url);
        buffer.push('\u{0}');
        buffer.push_str(&page.title);
        Fingerprint {
            content_hash: cache::fingerprint::content_hash(buffer.as_bytes()),
            mtime: 0,
            size: buffer.len() as u64,
            config_hash: config.hash,
        }
    } else {
        let path = site.root_path.join(&page.source_path);
        fingerprint_file(&path, config.hash).unwrap_or(Fingerprint {
            content_hash: String::new(),
            mtime: 0,
            size: 0,
            config_hash: config.hash,
        })
    }
}

/// Replaces a rendered page's dependency graph edges for this build: it
/// depends on its own source (so a direct content edit reruns it), every
/// page/asset/icon its markdown referenced, and the layout template it was
/// rendered through.
fn record_dependencies(cache: &mut BuildCache, rendered: &RenderedPage) {
    let dependent = rendered.url.clone();
    cache.clear_dependencies(&dependent);
    for page in &rendered.dependencies.pages {
        cache.add_dependency(&dependent, page);
    }
    for asset in &rendered.dependencies.assets {
        cache.add_dependency(&dependent, asset);
    }
    for icon in &rendered.dependencies.icons {
        cache.add_dependency(&dependent, icon);
    }
}

/// Checks every rendered page's asset/icon references against the files
/// actually copied to the output directory, reporting `T010` for any that
/// went missing (spec §7's error taxonomy names this code; nothing wired
/// it up until asset copying gave the orchestrator something to check
/// against). Internal page links aren't checked here: markdown link
/// targets aren't normalized to canonical URLs at parse time, so a
/// mismatch would be too likely to be a false positive.
fn missing_dependency_warnings(
    rendered: &[(String, Dependencies)], asset_manifest: &BTreeMap<String, String>,
) -> Vec<BuildError> {
    let mut warnings = Vec::new();
    for (url, dependencies) in rendered {
        for asset in dependencies.assets.iter().chain(dependencies.icons.iter()) {
            if !asset_manifest.contains_key(asset) {
                warnings.push(BuildError::new(
                    "T010",
                    crate::error::ErrorKind::Asset,
                    format!("page `{url}` references missing asset `{asset}`"),
                ));
            }
        }
    }
    warnings
}

/// Swaps the leading `/<from>/` URL segment for `/<to>/`, used to guess a
/// translation's URL from its source language's URL (spec §4.1's i18n URL
/// layout: the locale is always a path segment when a locale-suffixed path
/// is in play).
fn swap_locale_segment(url: &str, from: &str, to: &str) -> Option<String> {
    let trimmed = url.trim_start_matches('/');
    let rest = trimmed.strip_prefix(from)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(format!("/{to}{rest}"))
}

#[cfg(feature = "tracing")]
fn log_event(event: &SourceEvent) {
    match event {
        SourceEvent::Created(path) => tracing::debug!(path = %path.display(), "source created"),
        SourceEvent::Modified(path) => tracing::debug!(path = %path.display(), "source modified"),
        SourceEvent::Removed(path) => tracing::debug!(path = %path.display(), "source removed"),
    }
}

#[cfg(not(feature = "tracing"))]
fn log_event(_event: &SourceEvent) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn swap_locale_segment_replaces_only_the_leading_segment() {
        assert_eq!(swap_locale_segment("/en/guide/intro/", "en", "de"), Some("/de/guide/intro/".to_string()));
        assert_eq!(swap_locale_segment("/en/", "en", "de"), Some("/de/".to_string()));
        assert_eq!(swap_locale_segment("/fr/guide/", "en", "de"), None);
        assert_eq!(swap_locale_segment("/english/guide/", "en", "de"), None);
    }

    #[test]
    fn source_key_is_the_source_path_as_a_string() {
        let page = Page::new(
            Path::new("guide/intro.md").to_path_buf(),
            Path::new("guide").to_path_buf(),
            "/guide/intro/".to_string(),
            "Intro".to_string(),
            crate::structure::page::PageMeta::new(),
            String::new(),
        );
        assert_eq!(source_key(&page), "guide/intro.md");
    }
}
