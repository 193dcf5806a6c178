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

//! Table of contents, built from the heading ids assigned during
//! post-processing (spec §4.2 step 6).

use serde::Serialize;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// A single heading, after id assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level, 1-6.
    pub level: u8,
    /// Heading text, with inline markup stripped.
    pub title: String,
    /// Assigned anchor id, unique within the page.
    pub id: String,
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Assigns unique, slug-shaped ids to a flat list of headings, disambiguating
/// repeats with a numeric suffix (`install`, `install-1`, `install-2`, ...).
pub fn assign_ids(headings: &mut [Heading]) {
    let mut seen = std::collections::HashMap::<String, u32>::new();
    for heading in headings.iter_mut() {
        let base = slugify(&heading.title);
        let count = seen.entry(base.clone()).or_insert(0);
        heading.id = if *count == 0 { base } else { format!("{base}-{count}") };
        *count += 1;
    }
}

/// Demotes every heading level by `shift` levels (spec §4.2 step 6's
/// "heading-demotion for embedded pages"), clamping at level 6.
pub fn demote(headings: &mut [Heading], shift: u8) {
    for heading in headings.iter_mut() {
        heading.level = (heading.level + shift).min(6);
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_dash = true;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() { "section".to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, title: &str) -> Heading {
        Heading { level, title: title.to_string(), id: String::new() }
    }

    #[test]
    fn assign_ids_disambiguates_repeated_titles() {
        let mut headings = vec![heading(2, "Install"), heading(2, "Install")];
        assign_ids(&mut headings);
        assert_eq!(headings[0].id, "install");
        assert_eq!(headings[1].id, "install-1");
    }

    #[test]
    fn demote_clamps_at_level_six() {
        let mut headings = vec![heading(5, "Deep")];
        demote(&mut headings, 3);
        assert_eq!(headings[0].level, 6);
    }
}
