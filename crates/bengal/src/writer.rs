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

//! The output writer (spec §4.5): HTML by logical URL, asset copy with
//! optional fingerprinting, `sitemap.xml`/`rss.xml`/manifests/`_redirects`,
//! and the writer invariants (no rewrite on unchanged bytes, atomic commit,
//! an in-memory outputs set, optional pruning).
//!
//! Owned by a single writer thread (spec §5's resource table): renderer
//! workers hand off `RenderedPage`s via a queue rather than touching the
//! filesystem themselves.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{BuildError, ErrorKind};
use crate::highlight::escape_html;
use crate::render::RenderedPage;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// One entry in `sitemap.xml`.
#[derive(Clone, Debug)]
pub struct SitemapEntry {
    /// The page's absolute or site-relative URL.
    pub loc: String,
    /// `(hreflang, url)` alternates, emitted when i18n/versioning is
    /// enabled (spec §4.5).
    pub alternates: Vec<(String, String)>,
}

/// One version's entry in `_version-manifest.json`: its own URL list plus a
/// pre-computed fallback target, for every other version, of every one of
/// its URLs (spec §4.3's version-switch target cascade). Resolving the
/// cascade at build time, rather than leaving it to the client-side version
/// selector, is spec §4.3's explicit requirement ("no client-side fallback
/// required").
#[derive(Clone, Debug, serde::Serialize)]
pub struct VersionManifestEntry {
    /// Every logical URL present in this version.
    pub urls: Vec<String>,
    /// `other_version_id -> (url_in_this_version -> fallback_target_url)`.
    pub fallbacks: BTreeMap<String, BTreeMap<String, String>>,
}

/// One entry in a section's `rss.xml`.
#[derive(Clone, Debug)]
pub struct RssEntry {
    /// Item title.
    pub title: String,
    /// Item URL.
    pub url: String,
    /// Publish date, if known.
    pub date: Option<String>,
    /// Short summary/description, if any.
    pub summary: Option<String>,
}

/// Writes build output to `output_root`, tracking every path it touches so
/// a final pass can prune anything left behind from a prior build.
pub struct Writer {
    output_root: PathBuf,
    outputs: BTreeSet<PathBuf>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Writer {
    /// Creates a writer rooted at `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Writer { output_root: output_root.into(), outputs: BTreeSet::new() }
    }

    /// Writes a rendered page's HTML under its logical URL (`/foo/bar/` ->
    /// `<output>/foo/bar/index.html`). Returns whether the file's bytes
    /// actually changed.
    pub fn write_page(&mut self, page: &RenderedPage) -> Result<bool, BuildError> {
        let path = html_output_path(&self.output_root, &page.url);
        let written = write_if_changed(&path, page.html.as_bytes())?;
        self.outputs.insert(path);
        Ok(written)
    }

    /// Copies an asset from `source` to `logical_path` under the output
    /// root, optionally suffixing it with a content fingerprint (`app.css`
    /// -> `app.1a2b3c4d.css`). Returns the logical path actually used, for
    /// the asset manifest.
    pub fn copy_asset(
        &mut self, source: &Path, logical_path: &str, fingerprint: bool,
    ) -> Result<String, BuildError> {
        let final_logical = if fingerprint {
            let bytes = std::fs::read(source)
                .map_err(|source_err| writer_error("could not read asset", source_err).with_file(source))?;
            fingerprint_asset_path(logical_path, &bytes)
        } else {
            logical_path.to_string()
        };

        let dest = self.output_root.join(final_logical.trim_start_matches('/'));
        if let Some(parent) = dest.parent() {
            create_dir(parent)?;
        }
        std::fs::copy(source, &dest)
            .map_err(|source_err| writer_error("could not copy asset", source_err).with_file(source))?;
        self.outputs.insert(dest);
        Ok(final_logical)
    }

    /// Writes `asset-manifest.json`, mapping logical asset path to its
    /// (possibly fingerprinted) output path.
    pub fn write_asset_manifest(&mut self, manifest: &BTreeMap<String, String>) -> Result<(), BuildError> {
        let body = serde_json::to_string_pretty(manifest).map_err(|source_err| {
            BuildError::new("T030", ErrorKind::Writer, "could not serialize asset manifest")
                .with_source(source_err)
        })?;
        self.write_named("asset-manifest.json", body.as_bytes())
    }

    /// Writes `_version-manifest.json`, mapping version id to its URL list
    /// and pre-computed version-switch fallback targets (spec §4.5).
    pub fn write_version_manifest(
        &mut self, manifest: &BTreeMap<String, VersionManifestEntry>,
    ) -> Result<(), BuildError> {
        let body = serde_json::to_string_pretty(manifest).map_err(|source_err| {
            BuildError::new("T030", ErrorKind::Writer, "could not serialize version manifest")
                .with_source(source_err)
        })?;
        self.write_named("_version-manifest.json", body.as_bytes())
    }

    /// Writes `_redirects`: one `from to` line per alias.
    pub fn write_redirects(&mut self, aliases: &BTreeMap<String, String>) -> Result<(), BuildError> {
        let mut body = String::new();
        for (from, to) in aliases {
            body.push_str(from);
            body.push(' ');
            body.push_str(to);
            body.push('\n');
        }
        self.write_named("_redirects", body.as_bytes())
    }

    /// Writes `sitemap.xml` from the flat page list.
    pub fn write_sitemap(&mut self, entries: &[SitemapEntry]) -> Result<(), BuildError> {
        self.write_named("sitemap.xml", render_sitemap(entries).as_bytes())
    }

    /// Writes one section's `rss.xml` at `relative_path` (e.g.
    /// `blog/rss.xml`).
    pub fn write_rss(
        &mut self, relative_path: &str, entries: &[RssEntry], site_title: &str, site_baseurl: &str,
    ) -> Result<(), BuildError> {
        let body = render_rss(entries, site_title, site_baseurl);
        self.write_named(relative_path, body.as_bytes())
    }

    /// Marks a page's output path as expected to exist without writing it —
    /// for a page an incremental build left untouched (its fingerprint and
    /// dependencies were unchanged, so `render_selected` never produced a
    /// `RenderedPage` for it), its prior output on disk is still correct and
    /// must not be mistaken by [`Writer::prune`] for a stale leftover (spec
    /// §4.5 output-idempotence, §8 property 2 incremental soundness).
    pub fn expect_page(&mut self, url: &str) {
        let path = html_output_path(&self.output_root, url);
        self.outputs.insert(path);
    }

    /// Deletes every file under the output root that isn't part of the full
    /// expected output set, when `enabled` (`Build.prune_output`, off by
    /// default). The expected set is every path written this build *plus*
    /// every path registered via [`Writer::expect_page`] — on an incremental
    /// build that's every discovered page, not just the ones re-rendered, so
    /// an unchanged page's still-valid output is never swept up alongside
    /// genuinely stale files. Returns the number of files removed.
    pub fn prune(&self, enabled: bool) -> Result<usize, BuildError> {
        if !enabled {
            return Ok(0);
        }
        let mut removed = 0;
        for entry in walkdir::WalkDir::new(&self.output_root).into_iter().filter_map(Result::ok) {
            let path = entry.path();
            if path.is_file() && !self.outputs.contains(path) {
                std::fs::remove_file(path).map_err(|source_err| {
                    writer_error("could not prune stale output file", source_err).with_file(path)
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn write_named(&mut self, name: &str, bytes: &[u8]) -> Result<(), BuildError> {
        let path = self.output_root.join(name);
        write_if_changed(&path, bytes)?;
        self.outputs.insert(path);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Maps a logical URL to its HTML output path (`/foo/bar/` ->
/// `<root>/foo/bar/index.html`, `/` -> `<root>/index.html`).
fn html_output_path(output_root: &Path, url: &str) -> PathBuf {
    let trimmed = url.trim_start_matches('/');
    let mut path = output_root.to_path_buf();
    if trimmed.is_empty() {
        path.push("index.html");
    } else if url.ends_with('/') {
        path.push(trimmed.trim_end_matches('/'));
        path.push("index.html");
    } else {
        path.push(trimmed);
    }
    path
}

/// Returns a content-fingerprinted logical path (`app.css` ->
/// `app.1a2b3c4d.css`), an 8-hex-char prefix of the content hash.
fn fingerprint_asset_path(logical_path: &str, contents: &[u8]) -> String {
    let hash = crate::cache::fingerprint::content_hash(contents);
    let short = &hash[..8];
    match logical_path.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}.{short}.{ext}"),
        None => format!("{logical_path}.{short}"),
    }
}

fn create_dir(dir: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(dir)
        .map_err(|source| writer_error("could not create output directory", source).with_file(dir))
}

fn writer_error(message: &str, source: std::io::Error) -> BuildError {
    BuildError::new("T030", ErrorKind::Writer, message).with_source(source)
}

/// Writes `bytes` to `path` only if its current contents differ (spec
/// §4.5's "no file is overwritten if its bytes match", so mtime is
/// preserved for downstream watchers), committing via a sibling temp file
/// + rename (spec §4.4: a half-written file is rolled back on failure).
fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<bool, BuildError> {
    if let Ok(existing) = std::fs::read(path) {
        if existing == bytes {
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    let tmp_path = path.with_extension("bengaltmp");
    std::fs::write(&tmp_path, bytes)
        .map_err(|source| writer_error("could not write output file", source).with_file(path))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|source| writer_error("could not commit output file", source).with_file(path))?;
    Ok(true)
}

fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
         xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );
    for entry in entries {
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", escape_html(&entry.loc)));
        for (hreflang, url) in &entry.alternates {
            out.push_str(&format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                escape_html(hreflang),
                escape_html(url),
            ));
        }
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    out
}

fn render_rss(entries: &[RssEntry], site_title: &str, site_baseurl: &str) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n");
    out.push_str(&format!("    <title>{}</title>\n", escape_html(site_title)));
    out.push_str(&format!("    <link>{}</link>\n", escape_html(site_baseurl)));
    for entry in entries {
        out.push_str("    <item>\n");
        out.push_str(&format!("      <title>{}</title>\n", escape_html(&entry.title)));
        out.push_str(&format!("      <link>{}</link>\n", escape_html(&entry.url)));
        if let Some(date) = &entry.date {
            out.push_str(&format!("      <pubDate>{}</pubDate>\n", escape_html(date)));
        }
        if let Some(summary) = &entry.summary {
            out.push_str(&format!("      <description>{}</description>\n", escape_html(summary)));
        }
        out.push_str("    </item>\n");
    }
    out.push_str("  </channel>\n</rss>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::markdown::Dependencies;

    fn rendered(url: &str, html: &str) -> RenderedPage {
        RenderedPage {
            url: url.to_string(),
            html: html.to_string(),
            toc: Vec::new(),
            dependencies: Dependencies::default(),
            output_hash: crate::cache::fingerprint::content_hash(html.as_bytes()),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn write_page_maps_logical_url_to_index_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        writer.write_page(&rendered("/guide/intro/", "<p>hi</p>")).unwrap();
        let path = dir.path().join("guide/intro/index.html");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn write_page_root_url_maps_to_root_index_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        writer.write_page(&rendered("/", "<p>home</p>")).unwrap();
        assert!(dir.path().join("index.html").exists());
    }

    #[test]
    fn write_page_skips_rewrite_when_bytes_are_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        assert!(writer.write_page(&rendered("/a/", "same")).unwrap());
        assert!(!writer.write_page(&rendered("/a/", "same")).unwrap());
        assert!(writer.write_page(&rendered("/a/", "different")).unwrap());
    }

    #[test]
    fn copy_asset_fingerprints_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("app.css");
        std::fs::write(&source, b"body{}").unwrap();
        let mut writer = Writer::new(dir.path().join("out"));
        let logical = writer.copy_asset(&source, "app.css", true).unwrap();
        assert!(logical.starts_with("app."));
        assert!(logical.ends_with(".css"));
        assert_ne!(logical, "app.css");
        assert!(dir.path().join("out").join(&logical).exists());
    }

    #[test]
    fn write_version_manifest_includes_urls_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        let mut manifest = BTreeMap::new();
        let mut fallbacks = BTreeMap::new();
        fallbacks.insert(
            "v1".to_string(),
            BTreeMap::from([("/v2/docs/advanced/".to_string(), "/v1/docs/".to_string())]),
        );
        manifest.insert(
            "v2".to_string(),
            VersionManifestEntry { urls: vec!["/v2/docs/advanced/".to_string()], fallbacks },
        );
        writer.write_version_manifest(&manifest).unwrap();
        let body = std::fs::read_to_string(dir.path().join("_version-manifest.json")).unwrap();
        assert!(body.contains("\"urls\""));
        assert!(body.contains("\"/v2/docs/advanced/\""));
        assert!(body.contains("\"fallbacks\""));
        assert!(body.contains("\"/v1/docs/\""));
    }

    #[test]
    fn write_redirects_emits_one_line_per_alias() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        let mut aliases = BTreeMap::new();
        aliases.insert("/old/".to_string(), "/new/".to_string());
        writer.write_redirects(&aliases).unwrap();
        let body = std::fs::read_to_string(dir.path().join("_redirects")).unwrap();
        assert_eq!(body, "/old/ /new/\n");
    }

    #[test]
    fn write_sitemap_includes_hreflang_alternates() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        let entries = vec![SitemapEntry {
            loc: "/guide/".to_string(),
            alternates: vec![("fr".to_string(), "/fr/guide/".to_string())],
        }];
        writer.write_sitemap(&entries).unwrap();
        let body = std::fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
        assert!(body.contains("<loc>/guide/</loc>"));
        assert!(body.contains("hreflang=\"fr\""));
    }

    #[test]
    fn prune_removes_files_not_written_this_build_only_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stale.html"), "old").unwrap();
        let mut writer = Writer::new(dir.path());
        writer.write_page(&rendered("/kept/", "<p>kept</p>")).unwrap();

        assert_eq!(writer.prune(false).unwrap(), 0);
        assert!(dir.path().join("stale.html").exists());

        assert_eq!(writer.prune(true).unwrap(), 1);
        assert!(!dir.path().join("stale.html").exists());
        assert!(dir.path().join("kept/index.html").exists());
    }

    #[test]
    fn prune_keeps_unrendered_pages_marked_via_expect_page() {
        // Simulates an incremental build: `/untouched/` was rendered by a
        // prior build and isn't in this build's `selected` set, so only
        // `expect_page` (not `write_page`) ever names it.
        let dir = tempfile::tempdir().unwrap();
        let mut writer = Writer::new(dir.path());
        writer.write_page(&rendered("/untouched/", "<p>old</p>")).unwrap();

        let mut writer = Writer::new(dir.path());
        std::fs::write(dir.path().join("truly-stale.html"), "gone").unwrap();
        writer.write_page(&rendered("/edited/", "<p>new</p>")).unwrap();
        writer.expect_page("/untouched/");

        let removed = writer.prune(true).unwrap();
        assert_eq!(removed, 1);
        assert!(dir.path().join("untouched/index.html").exists());
        assert!(dir.path().join("edited/index.html").exists());
        assert!(!dir.path().join("truly-stale.html").exists());
    }
}
