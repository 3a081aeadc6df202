// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only string interner for event ids.
//!
//! Node comparison is performed on dense integer keys rather than strings,
//! so every event id is interned exactly once for the lifetime of the
//! process. The table is append-only: keys are never reassigned or removed.
//!
//! ## Thread safety
//!
//! Insertion is protected by an `RwLock` with a read-locked fast path, so
//! the interner may be populated concurrently from mining workers. Callers
//! that want fully deterministic key assignment should intern their ids
//! before starting a parallel phase.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

static GLOBAL_INTERNER: Lazy<IdInterner> = Lazy::new(IdInterner::new);

/// An interned event id: the dense integer key plus the original text.
///
/// Equality, ordering, and hashing all use the integer key only; the text
/// is carried so that display never needs to consult the interner. Symbols
/// are only comparable when they come from the same interner.
#[derive(Debug, Clone)]
pub struct Symbol {
    key: u32,
    text: Arc<str>,
}

impl Symbol {
    /// Dense integer key assigned by the interner
    #[inline]
    pub fn key(&self) -> u32 {
        self.key
    }

    /// Original id text
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Process-wide append-only id table
pub struct IdInterner {
    inner: RwLock<InternerInner>,
}

struct InternerInner {
    table: HashMap<Arc<str>, u32>,
    symbols: Vec<Arc<str>>,
}

impl IdInterner {
    /// Create a fresh, empty interner (tests; production code uses [`IdInterner::global`])
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(InternerInner {
                table: HashMap::new(),
                symbols: Vec::new(),
            }),
        }
    }

    /// The process-wide interner used by all event and node constructors
    pub fn global() -> &'static IdInterner {
        &GLOBAL_INTERNER
    }

    /// Intern `id`, returning its symbol. Inserts on first sight.
    pub fn intern(&self, id: &str) -> Symbol {
        {
            let inner = self.inner.read().expect("interner lock poisoned");
            if let Some((text, &key)) = inner.table.get_key_value(id) {
                return Symbol {
                    key,
                    text: Arc::clone(text),
                };
            }
        }
        let mut inner = self.inner.write().expect("interner lock poisoned");
        // Re-check: another writer may have inserted between the locks.
        if let Some((text, &key)) = inner.table.get_key_value(id) {
            return Symbol {
                key,
                text: Arc::clone(text),
            };
        }
        let text: Arc<str> = Arc::from(id);
        let key = inner.symbols.len() as u32;
        inner.symbols.push(Arc::clone(&text));
        inner.table.insert(Arc::clone(&text), key);
        Symbol { key, text }
    }

    /// Resolve a previously assigned key back to its text
    pub fn resolve(&self, key: u32) -> Option<Arc<str>> {
        let inner = self.inner.read().expect("interner lock poisoned");
        inner.symbols.get(key as usize).map(Arc::clone)
    }

    /// Number of distinct ids interned so far
    pub fn len(&self) -> usize {
        self.inner.read().expect("interner lock poisoned").symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdInterner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_dense_keys() {
        let interner = IdInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let a2 = interner.intern("a");

        assert_eq!(a.key(), 0);
        assert_eq!(b.key(), 1);
        assert_eq!(a, a2);
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.resolve(1).as_deref(), Some("b"));
        assert_eq!(interner.resolve(2), None);
    }

    #[test]
    fn test_concurrent_insert_is_consistent() {
        let interner = Arc::new(IdInterner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|i| interner.intern(&format!("id-{i}")).key())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let keyings: Vec<Vec<u32>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(interner.len(), 100);
        for keying in &keyings[1..] {
            assert_eq!(keying, &keyings[0]);
        }
    }
}
