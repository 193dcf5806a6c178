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

//! Dynamic value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

mod float;

use float::Float;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Dynamic value.
///
/// This data type represents any valid value that can be used as part of the
/// metadata of a page and the extra data of configuration, supporting null,
/// strings, booleans, integers, floating point numbers, lists, and maps, so
/// basically everything supported in YAML, TOML, and JSON frontmatter.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Dynamic {
    /// Absence of a value.
    #[default]
    Null,
    /// String value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(Float),
    /// List value.
    List(Vec<Dynamic>),
    /// Map value.
    Map(BTreeMap<String, Dynamic>),
}

impl Dynamic {
    /// Returns the value as a string slice, if it holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Dynamic::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value as a map, if it holds one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Dynamic>> {
        match self {
            Dynamic::Map(value) => Some(value),
            _ => None,
        }
    }

    /// Looks up a key in a map value, returning `None` for any other variant.
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Returns whether the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Dynamic {
    /// Formats the dynamic value for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dynamic::Null => write!(f, ""),
            Dynamic::String(value) => write!(f, "{value}"),
            Dynamic::Bool(value) => write!(f, "{value}"),
            Dynamic::Integer(value) => write!(f, "{value}"),
            Dynamic::Float(value) => write!(f, "{value}"),
            Dynamic::List(values) => {
                let iter = values.iter().map(|v| format!("{v}"));
                let values: Vec<String> = iter.collect();
                write!(f, "[{}]", values.join(", "))
            }
            Dynamic::Map(values) => {
                let iter = values.iter().map(|(k, v)| format!("{k}: {v}"));
                let values: Vec<String> = iter.collect();
                write!(f, "{{{}}}", values.join(", "))
            }
        }
    }
}

impl From<Dynamic> for minijinja::Value {
    /// Converts a dynamic value into a template engine value.
    fn from(value: Dynamic) -> Self {
        match value {
            Dynamic::Null => minijinja::Value::UNDEFINED,
            Dynamic::String(value) => minijinja::Value::from(value),
            Dynamic::Bool(value) => minijinja::Value::from(value),
            Dynamic::Integer(value) => minijinja::Value::from(value),
            Dynamic::Float(value) => minijinja::Value::from(value.0),
            Dynamic::List(values) => {
                let values: Vec<minijinja::Value> =
                    values.into_iter().map(Into::into).collect();
                minijinja::Value::from(values)
            }
            Dynamic::Map(values) => {
                let values: BTreeMap<String, minijinja::Value> =
                    values.into_iter().map(|(k, v)| (k, v.into())).collect();
                minijinja::Value::from(values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_nested_structures() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Dynamic::Integer(1));
        map.insert(
            "b".to_string(),
            Dynamic::List(vec![Dynamic::Bool(true), Dynamic::Null]),
        );
        let value = Dynamic::Map(map);
        assert_eq!(value.to_string(), "{a: 1, b: [true, ]}");
    }

    #[test]
    fn get_descends_into_maps_only() {
        let mut map = BTreeMap::new();
        map.insert("title".to_string(), Dynamic::String("Hello".to_string()));
        let value = Dynamic::Map(map);
        assert_eq!(value.get("title").and_then(Dynamic::as_str), Some("Hello"));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Dynamic::Null.get("title"), None);
    }
}
