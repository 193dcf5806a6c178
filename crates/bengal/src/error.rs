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

//! Build error taxonomy, error codes, and diagnostic reporting.

pub mod codes;

use ariadne::{Label, Report as AriadneReport, ReportKind, Source};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Behavioral error kind (spec §7), independent of the error's Rust type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration loading/validation.
    Configuration,
    /// Content discovery (walking, section assembly, duplicate URLs).
    Discovery,
    /// Content parsing (frontmatter, markdown, directives).
    Content,
    /// Template resolution or rendering.
    Template,
    /// Directive contract violation.
    Directive,
    /// Missing/invalid asset or icon.
    Asset,
    /// Build cache corruption or I/O.
    Cache,
    /// Output writer failure.
    Writer,
    /// Uncategorized I/O.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Discovery => "discovery",
            ErrorKind::Content => "content",
            ErrorKind::Template => "template",
            ErrorKind::Directive => "directive",
            ErrorKind::Asset => "asset",
            ErrorKind::Cache => "cache",
            ErrorKind::Writer => "writer",
            ErrorKind::Io => "io",
        };
        f.write_str(name)
    }
}

/// Default disposition of an error kind when not running in strict mode
/// (spec §7's taxonomy table).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Terminates the build immediately.
    Fatal,
    /// Recorded and surfaced, but the build continues.
    Warn,
}

impl ErrorKind {
    /// Returns this kind's default disposition outside strict mode.
    pub fn default_disposition(self) -> Disposition {
        match self {
            ErrorKind::Configuration
            | ErrorKind::Discovery
            | ErrorKind::Writer => Disposition::Fatal,
            ErrorKind::Content
            | ErrorKind::Template
            | ErrorKind::Directive
            | ErrorKind::Asset
            | ErrorKind::Cache
            | ErrorKind::Io => Disposition::Warn,
        }
    }
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A build error, carrying everything needed to render a structured
/// diagnostic (spec §7's "code, message, file/line, hint" block).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct BuildError {
    /// Stable error code, matches `^[A-Z][0-9]{3,4}$` (testable property 10).
    pub code: &'static str,
    /// Behavioral kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Source file the error pertains to, if any.
    pub file: Option<PathBuf>,
    /// Line within that file, if known.
    pub line: Option<u32>,
    /// Suggested fix, if any.
    pub hint: Option<String>,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BuildError {
    /// Creates a build error with no file/line/hint/source set.
    pub fn new(code: &'static str, kind: ErrorKind, message: impl Into<String>) -> Self {
        BuildError {
            code,
            kind,
            message: message.into(),
            file: None,
            line: None,
            hint: None,
            source: None,
        }
    }

    /// Attaches a source file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attaches a line number.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Attaches a suggested fix.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(
        mut self, source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Renders this error as a structured diagnostic block via `ariadne`,
    /// falling back to a plain block when no file contents are available to
    /// anchor a span against.
    pub fn render(&self, source_text: Option<&str>) -> String {
        let Some(file) = &self.file else {
            return self.render_plain();
        };
        let Some(text) = source_text else {
            return self.render_plain();
        };

        let path = file.to_string_lossy().to_string();
        let offset = self
            .line
            .map(|line| {
                text.split('\n')
                    .take(line.saturating_sub(1) as usize)
                    .map(|l| l.len() + 1)
                    .sum::<usize>()
            })
            .unwrap_or(0)
            .min(text.len());

        let mut buffer = Vec::new();
        let mut report = AriadneReport::build(ReportKind::Error, (path.clone(), offset..offset))
            .with_code(self.code)
            .with_message(&self.message);
        report = report.with_label(
            Label::new((path.clone(), offset..offset)).with_message(&self.message),
        );
        if let Some(hint) = &self.hint {
            report = report.with_note(hint);
        }
        let cache = (path.clone(), Source::from(text));
        if report.finish().write(cache, &mut buffer).is_ok() {
            String::from_utf8_lossy(&buffer).into_owned()
        } else {
            self.render_plain()
        }
    }

    fn render_plain(&self) -> String {
        let mut out = format!("[{}] {}: {}", self.code, self.kind, self.message);
        if let Some(file) = &self.file {
            out.push_str(&format!("\n  --> {}", file.display()));
            if let Some(line) = self.line {
                out.push_str(&format!(":{line}"));
            }
        }
        if let Some(hint) = &self.hint {
            out.push_str(&format!("\n  hint: {hint}"));
        }
        out
    }
}

// ----------------------------------------------------------------------------

/// Accumulates warnings/errors across build phases, deduplicating by
/// `(code, file)` (spec §7's propagation policy).
#[derive(Default)]
pub struct ErrorSession {
    inner: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    seen: HashSet<(&'static str, Option<PathBuf>)>,
    warnings: Vec<BuildError>,
    errors: Vec<BuildError>,
}

impl ErrorSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error as fatal, unless an equivalent `(code, file)` pair was
    /// already recorded.
    pub fn error(&self, error: BuildError) {
        let mut state = self.inner.lock().expect("error session poisoned");
        let key = (error.code, error.file.clone());
        if state.seen.insert(key) {
            state.errors.push(error);
        }
    }

    /// Records a warning, unless an equivalent `(code, file)` pair was
    /// already recorded.
    pub fn warn(&self, error: BuildError) {
        let mut state = self.inner.lock().expect("error session poisoned");
        let key = (error.code, error.file.clone());
        if state.seen.insert(key) {
            state.warnings.push(error);
        }
    }

    /// Returns whether any fatal error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.inner.lock().expect("error session poisoned").errors.is_empty()
    }

    /// Returns the number of warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.inner.lock().expect("error session poisoned").warnings.len()
    }

    /// Drains all recorded warnings and errors.
    pub fn drain(&self) -> (Vec<BuildError>, Vec<BuildError>) {
        let mut state = self.inner.lock().expect("error session poisoned");
        (
            std::mem::take(&mut state.warnings),
            std::mem::take(&mut state.errors),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_session_deduplicates_by_code_and_file() {
        let session = ErrorSession::new();
        session.warn(
            BuildError::new("T010", ErrorKind::Asset, "missing icon")
                .with_file("content/guide.md"),
        );
        session.warn(
            BuildError::new("T010", ErrorKind::Asset, "missing icon (again)")
                .with_file("content/guide.md"),
        );
        session.warn(
            BuildError::new("T010", ErrorKind::Asset, "missing icon")
                .with_file("content/other.md"),
        );
        assert_eq!(session.warning_count(), 2);
    }

    #[test]
    fn error_kind_disposition_matches_taxonomy_table() {
        assert_eq!(
            ErrorKind::Discovery.default_disposition(),
            Disposition::Fatal
        );
        assert_eq!(ErrorKind::Asset.default_disposition(), Disposition::Warn);
    }

    #[test]
    fn render_plain_includes_code_and_hint() {
        let error = BuildError::new("C001", ErrorKind::Configuration, "bad key")
            .with_file("bengal.toml")
            .with_hint("remove the unknown key");
        let rendered = error.render(None);
        assert!(rendered.contains("C001"));
        assert!(rendered.contains("remove the unknown key"));
    }
}
