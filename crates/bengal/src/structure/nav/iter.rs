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

//! Navigation tree iterator.

use super::NavNode;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Pre-order iterator over a slice of [`NavNode`]s and their descendants.
pub struct Iter<'a> {
    /// Iteration stack.
    stack: Vec<(&'a [NavNode], usize)>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Iter<'a> {
    /// Creates a navigation iterator.
    pub fn new(nodes: &'a [NavNode]) -> Self {
        let mut stack = Vec::new();
        if !nodes.is_empty() {
            stack.push((nodes, 0));
        }
        Self { stack }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> Iterator for Iter<'a> {
    type Item = &'a NavNode;

    /// Advances the iterator and returns the next node, pre-order.
    fn next(&mut self) -> Option<Self::Item> {
        while let Some((slice, index)) = self.stack.last_mut() {
            if *index >= slice.len() {
                self.stack.pop();
                continue;
            }

            let node = &slice[*index];
            *index += 1;

            if !node.children.is_empty() {
                self.stack.push((node.children.as_slice(), 0));
            }

            return Some(node);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(title: &str) -> NavNode {
        NavNode {
            id: title.to_string(),
            title: title.to_string(),
            url: Some(format!("/{title}/")),
            icon: None,
            weight: 0,
            children: Vec::new(),
            is_index: false,
        }
    }

    #[test]
    fn visits_parent_before_children() {
        let mut root = leaf("root");
        root.children = vec![leaf("a"), leaf("b")];
        let titles: Vec<&str> = Iter::new(std::slice::from_ref(&root)).map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["root", "a", "b"]);
    }
}
