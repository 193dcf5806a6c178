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

//! Atomic cache persistence (spec §4.4): temp-file + rename, header +
//! checksum corruption detection, a format-version guard.

use std::path::Path;

use crate::error::{BuildError, ErrorKind, ErrorSession};

use super::fingerprint::content_hash;
use super::BuildCache;

/// Bumped whenever [`BuildCache`]'s on-disk shape changes incompatibly.
pub const CACHE_FORMAT_VERSION: u32 = 1;

const MAGIC: &str = "BENGALCACHE";

/// Loads the cache at `path`.
///
/// A missing file is not corruption: it simply means no prior build, and
/// an empty cache is returned. A present-but-corrupt or wrong-version file
/// is discarded with a `T020` warning recorded on `session`, per spec §7's
/// "Cache: corruption -> discard cache, full rebuild, log once".
pub fn load(path: &Path, session: &ErrorSession) -> BuildCache {
    let Ok(text) = std::fs::read_to_string(path) else { return BuildCache::new() };

    match parse(&text) {
        Ok(cache) => cache,
        Err(reason) => {
            session.warn(
                BuildError::new("T020", ErrorKind::Cache, reason)
                    .with_file(path)
                    .with_hint("cache discarded; performing a full rebuild"),
            );
            BuildCache::new()
        }
    }
}

fn parse(text: &str) -> Result<BuildCache, String> {
    let mut lines = text.splitn(3, '\n');
    let magic = lines.next().ok_or("empty cache file")?;
    let Some((tag, version)) = magic.split_once(' ') else {
        return Err("malformed cache header".to_string());
    };
    if tag != MAGIC {
        return Err("unrecognized cache header".to_string());
    }
    let version: u32 = version.parse().map_err(|_| "unreadable cache format version".to_string())?;
    if version != CACHE_FORMAT_VERSION {
        return Err(format!("cache format version {version} is not supported"));
    }

    let checksum = lines.next().ok_or("missing cache checksum")?;
    let body = lines.next().ok_or("missing cache body")?;
    if content_hash(body.as_bytes()) != checksum {
        return Err("cache checksum mismatch".to_string());
    }

    serde_json::from_str(body).map_err(|err| format!("cache body is not valid JSON: {err}"))
}

/// Saves `cache` to `path` atomically: written to a sibling temp file, then
/// renamed into place, so a crash mid-write never leaves a half-written
/// cache file behind.
pub fn save(path: &Path, cache: &BuildCache) -> Result<(), BuildError> {
    let body = serde_json::to_string(cache).map_err(|source| {
        BuildError::new("T020", ErrorKind::Cache, "could not serialize build cache")
            .with_source(source)
    })?;
    let checksum = content_hash(body.as_bytes());
    let contents = format!("{MAGIC} {CACHE_FORMAT_VERSION}\n{checksum}\n{body}");

    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, contents).map_err(|source| {
        BuildError::new("T020", ErrorKind::Cache, "could not write build cache")
            .with_file(path)
            .with_source(source)
    })?;
    std::fs::rename(&tmp_path, path).map_err(|source| {
        BuildError::new("T020", ErrorKind::Cache, "could not commit build cache")
            .with_file(path)
            .with_source(source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        let mut cache = BuildCache::new();
        cache.record("a.md", super::super::fingerprint::Fingerprint {
            content_hash: "abc".to_string(),
            mtime: 1,
            size: 2,
            config_hash: 3,
        });

        save(&path, &cache).unwrap();
        let session = ErrorSession::new();
        let loaded = load(&path, &session);
        assert_eq!(session.warning_count(), 0);
        assert_eq!(loaded.fingerprint("a.md").map(|fp| fp.content_hash.clone()), Some("abc".to_string()));
    }

    #[test]
    fn missing_file_returns_empty_cache_without_warning() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing.json");
        let session = ErrorSession::new();
        let cache = load(&path, &session);
        assert_eq!(session.warning_count(), 0);
        assert!(cache.fingerprint("anything").is_none());
    }

    #[test]
    fn corrupted_checksum_is_discarded_with_warning() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        std::fs::write(&path, format!("{MAGIC} {CACHE_FORMAT_VERSION}\nbadchecksum\n{{}}")).unwrap();

        let session = ErrorSession::new();
        let cache = load(&path, &session);
        assert_eq!(session.warning_count(), 1);
        assert!(cache.fingerprint("anything").is_none());
    }

    #[test]
    fn wrong_format_version_is_discarded_with_warning() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("cache.json");
        let body = "{}";
        let checksum = content_hash(body.as_bytes());
        std::fs::write(&path, format!("{MAGIC} 999\n{checksum}\n{body}")).unwrap();

        let session = ErrorSession::new();
        let cache = load(&path, &session);
        assert_eq!(session.warning_count(), 1);
        assert!(cache.fingerprint("anything").is_none());
    }
}
