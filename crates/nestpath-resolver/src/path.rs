//! Dotted path parsing with a bounded cache.
//!
//! `"bowls.*.weight"` parses to `[Key("bowls"), Wildcard, Key("weight")]`.
//! The wildcard is a distinct segment variant, so no literal key can ever
//! trigger fan-out.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use nestpath_core::config::defaults;
use parking_lot::Mutex;
use tracing::trace;

/// Token that parses to [`Segment::Wildcard`].
pub const WILDCARD: &str = "*";

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// One component of a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key, field name or (for sequences) an integer index
    Key(String),
    /// Matches every entry at this position
    Wildcard,
}

impl Segment {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    segments: Arc<[Segment]>,
    has_wildcard: bool,
}

impl ParsedPath {
    /// Parse without going through a cache. Any string is valid input.
    pub fn parse(raw: &str) -> Self {
        let segments: Arc<[Segment]> = raw
            .split(SEPARATOR)
            .map(|part| {
                if part == WILDCARD {
                    Segment::Wildcard
                } else {
                    Segment::Key(part.to_string())
                }
            })
            .collect();
        let has_wildcard = segments.iter().any(Segment::is_wildcard);
        Self {
            segments,
            has_wildcard,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn has_wildcard(&self) -> bool {
        self.has_wildcard
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ParsedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Hit/miss counters of a [`PathCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently held
    pub len: usize,
    pub capacity: usize,
}

struct CacheInner {
    entries: LruCache<String, ParsedPath>,
    hits: u64,
    misses: u64,
}

/// Bounded least-recently-used cache of parsed paths keyed on the raw string.
///
/// A lost race between two callers parsing the same string only costs a
/// duplicate parse; results are identical either way.
pub struct PathCache {
    inner: Mutex<CacheInner>,
}

impl PathCache {
    /// Create a cache holding at most `capacity` paths (minimum one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Parse `raw`, reusing a cached result when present.
    pub fn parse(&self, raw: &str) -> ParsedPath {
        {
            let mut inner = self.inner.lock();
            if let Some(parsed) = inner.entries.get(raw).cloned() {
                inner.hits += 1;
                trace!("Path cache hit for '{}'", raw);
                return parsed;
            }
            inner.misses += 1;
        }

        let parsed = ParsedPath::parse(raw);
        self.inner.lock().entries.put(raw.to_string(), parsed.clone());
        parsed
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            len: inner.entries.len(),
            capacity: inner.entries.cap().get(),
        }
    }

    /// Drop all cached paths and reset the counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(defaults::PATH_CACHE_CAPACITY)
    }
}

impl fmt::Debug for PathCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathCache").field("stats", &self.stats()).finish()
    }
}
