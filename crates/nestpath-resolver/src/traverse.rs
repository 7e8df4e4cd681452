//! Lazy traversal of a value along a parsed path.
//!
//! [`Traversal`] walks depth-first with an explicit stack and yields
//! `(joined_key, &value)` pairs in order: insertion order for mappings and
//! fields, index order for sequences. Every mismatch (missing key, bad index,
//! empty intermediate, scalar with segments left) ends that branch without
//! an error.

use nestpath_core::{Shape, Value};
use tracing::{debug, trace, warn};

use crate::path::Segment;

/// Separator used when joining the resolved key path into an output key.
pub const KEY_SEPARATOR: &str = "_";

struct Frame<'v> {
    value: &'v Value,
    depth: usize,
    key_path: Vec<String>,
}

/// Single-pass iterator over the matches of one path.
pub struct Traversal<'v, 'p> {
    segments: &'p [Segment],
    stack: Vec<Frame<'v>>,
}

impl<'v, 'p> Traversal<'v, 'p> {
    pub fn new(root: &'v Value, segments: &'p [Segment]) -> Self {
        Self::with_prefix(root, segments, Vec::new())
    }

    /// Start from an existing key path; yielded keys include the prefix.
    pub fn with_prefix(root: &'v Value, segments: &'p [Segment], key_path: Vec<String>) -> Self {
        Self {
            segments,
            stack: vec![Frame {
                value: root,
                depth: 0,
                key_path,
            }],
        }
    }

    fn descend(&mut self, frame: &Frame<'v>, segment: &Segment) {
        let value: &'v Value = frame.value;
        let depth = frame.depth + 1;
        let key_path = &frame.key_path;
        let shape = value.shape();

        // Records and mappings share the keyed view from here on
        if let Some(entries) = shape.entries() {
            match segment {
                Segment::Wildcard => {
                    // Reverse push so pops come out in insertion order
                    for (key, child) in entries.iter().rev() {
                        self.push(child, depth, key_path, key.clone());
                    }
                }
                Segment::Key(key) => match entries.get(key) {
                    Some(child) => self.push(child, depth, key_path, key.clone()),
                    None => debug!(
                        "Key '{}' not found in {} at path '{}'",
                        key,
                        value.type_name(),
                        dotted(key_path)
                    ),
                },
            }
            return;
        }

        match shape {
            Shape::Sequence(items) => match segment {
                Segment::Wildcard => {
                    for (index, child) in items.iter().enumerate().rev() {
                        self.push(child, depth, key_path, index.to_string());
                    }
                }
                Segment::Key(raw) => match resolve_index(raw, items.len()) {
                    Some(index) => self.push(&items[index], depth, key_path, index.to_string()),
                    None => warn!(
                        "Invalid index '{}' in list of length {} at path '{}'",
                        raw,
                        items.len(),
                        dotted(key_path)
                    ),
                },
            },
            _ => debug!(
                "Cannot descend into {} with '{}' at path '{}'",
                value.type_name(),
                segment,
                dotted(key_path)
            ),
        }
    }

    fn push(&mut self, value: &'v Value, depth: usize, parent: &[String], key: String) {
        let mut key_path = Vec::with_capacity(parent.len() + 1);
        key_path.extend_from_slice(parent);
        key_path.push(key);
        self.stack.push(Frame {
            value,
            depth,
            key_path,
        });
    }
}

impl<'v, 'p> Iterator for Traversal<'v, 'p> {
    type Item = (String, &'v Value);

    fn next(&mut self) -> Option<Self::Item> {
        let segments = self.segments;
        while let Some(frame) = self.stack.pop() {
            let Some(segment) = segments.get(frame.depth) else {
                let joined = frame.key_path.join(KEY_SEPARATOR);
                trace!("Matched '{}' ({})", joined, frame.value.type_name());
                return Some((joined, frame.value));
            };

            if frame.value.is_empty_like() {
                debug!(
                    "Empty {} at path '{}' with {} segment(s) remaining",
                    frame.value.type_name(),
                    dotted(&frame.key_path),
                    segments.len() - frame.depth
                );
                continue;
            }

            self.descend(&frame, segment);
        }
        None
    }
}

/// Traverse `root` along `segments`.
pub fn traverse<'v, 'p>(root: &'v Value, segments: &'p [Segment]) -> Traversal<'v, 'p> {
    Traversal::new(root, segments)
}

/// Resolve a literal index against a sequence length. Negative indices count
/// from the end; anything non-numeric or out of range is `None`.
pub fn resolve_index(raw: &str, len: usize) -> Option<usize> {
    resolve_offset(raw.parse().ok()?, len)
}

/// Resolve a possibly negative offset against a sequence length.
pub fn resolve_offset(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

fn dotted(key_path: &[String]) -> String {
    key_path.join(".")
}
