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

//! Stable, documented error code registry (spec §6.5).
//!
//! Family prefix tags the subsystem: `C*` configuration, `D*` discovery,
//! `P*` parsing/content, `T*` template, `O*` autodoc extraction.

/// A documented error code.
pub struct Code {
    /// The code itself, e.g. `"C001"`.
    pub code: &'static str,
    /// Short description of the condition.
    pub description: &'static str,
}

/// The full registry of codes this crate may emit.
pub const REGISTRY: &[Code] = &[
    Code { code: "C001", description: "configuration file could not be read" },
    Code { code: "C002", description: "configuration file failed to parse" },
    Code { code: "D001", description: "content root does not exist" },
    Code { code: "D002", description: "duplicate logical URL within (version, lang)" },
    Code { code: "D003", description: "invalid source path" },
    Code { code: "P001", description: "frontmatter fence could not be parsed" },
    Code { code: "P002", description: "autodoc extraction produced invalid content" },
    Code { code: "P003", description: "markdown variable substitution failed" },
    Code { code: "T001", description: "template not found" },
    Code { code: "T002", description: "template failed to render" },
    Code { code: "T003", description: "directive contract violation (bad nesting)" },
    Code { code: "T004", description: "unknown directive name" },
    Code { code: "T010", description: "referenced icon or asset is missing" },
    Code { code: "T020", description: "build cache is corrupt and was discarded" },
    Code { code: "T030", description: "output could not be written" },
];

/// All codes must match `^[A-Z][0-9]{3,4}$` (testable property 10).
pub fn is_well_formed(code: &str) -> bool {
    let mut chars = code.chars();
    let Some(first) = chars.next() else { return false };
    if !first.is_ascii_uppercase() {
        return false;
    }
    let digits: String = chars.collect();
    (3..=4).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_code_is_well_formed() {
        for entry in REGISTRY {
            assert!(is_well_formed(entry.code), "{} is malformed", entry.code);
        }
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(!is_well_formed("c001"));
        assert!(!is_well_formed("C1"));
        assert!(!is_well_formed("C12345"));
    }
}
