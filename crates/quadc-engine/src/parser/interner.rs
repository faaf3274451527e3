//! String interning for identifiers and string literals
//!
//! The lexer interns every identifier and string literal so the parser and
//! checker can compare names as small integers.

use rustc_hash::FxHashMap;

/// An interned string (index into the [`Interner`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Placeholder used where only the token kind matters (diagnostics).
    pub const fn dummy() -> Self {
        Symbol(u32::MAX)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Deduplicating string store.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    map: FxHashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an interner with room for `capacity` strings.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            strings: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning the existing symbol if it was seen before.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.to_string());
        self.map.insert(s.to_string(), sym);
        sym
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    /// Resolve a symbol back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the symbol did not come from this interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut interner = Interner::new();

        let main = interner.intern("main");
        let argc = interner.intern("argc");
        let again = interner.intern("main");

        assert_eq!(main, again);
        assert_ne!(main, argc);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_resolve_and_get() {
        let mut interner = Interner::with_capacity(4);
        let sym = interner.intern("fact_rec");

        assert_eq!(interner.resolve(sym), "fact_rec");
        assert_eq!(interner.get("fact_rec"), Some(sym));
        assert_eq!(interner.get("fact_itr"), None);
    }
}
