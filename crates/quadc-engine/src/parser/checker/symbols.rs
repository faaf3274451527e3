//! Symbol table implementation for name resolution
//!
//! Symbols and scopes live in two arenas addressed by [`SymbolId`] and
//! [`ScopeId`]. The checker fills the table with declared names; lowering
//! later adds compiler temporaries through [`SymbolTable::new_temp`].

use super::error::CheckError;
use crate::parser::types::TypeId;
use crate::parser::Span;
use rustc_hash::FxHashMap;
use std::fmt;

/// Index of a symbol in the [`SymbolTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sym{}", self.0)
    }
}

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

/// Symbol kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// File-scope variable
    Global,
    /// Block-scope variable
    Local,
    /// Function parameter
    Param,
    /// Compiler-generated temporary
    Temp,
    /// Function (defined, prototyped or extern)
    Function,
}

impl SymbolKind {
    pub fn is_variable(self) -> bool {
        !matches!(self, SymbolKind::Function)
    }
}

/// Symbol information
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
    /// Scope where this symbol was defined
    pub scope: ScopeId,
    /// Declaration site; temporaries carry a default span
    pub span: Span,
    /// Functions only: declared `extern`
    pub is_extern: bool,
    /// Functions only: a body has been seen
    pub is_defined: bool,
}

/// Scope kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

/// Scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Parent scope (None for global scope)
    pub parent: Option<ScopeId>,
    /// Named symbols visible for resolution
    names: FxHashMap<String, SymbolId>,
    /// Every symbol owned by this scope, temporaries included, in creation order
    members: Vec<SymbolId>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            id,
            kind,
            parent,
            names: FxHashMap::default(),
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[SymbolId] {
        &self.members
    }
}

/// Symbol table with scope tree
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<SymbolEntry>,
    scopes: Vec<Scope>,
    /// Table-wide temporary counter; temporaries are never recycled
    next_temp: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Create a new symbol table with a global scope
    pub fn new() -> Self {
        SymbolTable {
            symbols: Vec::new(),
            scopes: vec![Scope::new(ScopeId(0), ScopeKind::Global, None)],
            next_temp: 0,
        }
    }

    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a child scope of `parent`
    pub fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, Some(parent)));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Define a named symbol in `scope`.
    ///
    /// Fails with [`CheckError::DuplicateSymbol`] if the name already exists
    /// in that same scope. Shadowing an outer scope is allowed.
    pub fn define(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: SymbolKind,
        ty: TypeId,
        span: Span,
    ) -> Result<SymbolId, CheckError> {
        if let Some(existing) = self.lookup_local(scope, name) {
            return Err(CheckError::DuplicateSymbol {
                name: name.to_string(),
                original: self.get(existing).span,
                duplicate: span,
            });
        }

        let id = self.push_symbol(SymbolEntry {
            name: name.to_string(),
            kind,
            ty,
            scope,
            span,
            is_extern: false,
            is_defined: false,
        });
        self.scopes[scope.0 as usize].names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Allocate a fresh temporary of type `ty` owned by `scope`.
    ///
    /// Temporaries are named `_t<n>` from a counter shared by the whole
    /// table, are never reused, and are not visible to name resolution.
    pub fn new_temp(&mut self, scope: ScopeId, ty: TypeId) -> SymbolId {
        let name = format!("_t{}", self.next_temp);
        self.next_temp += 1;
        self.push_symbol(SymbolEntry {
            name,
            kind: SymbolKind::Temp,
            ty,
            scope,
            span: Span::default(),
            is_extern: false,
            is_defined: false,
        })
    }

    fn push_symbol(&mut self, entry: SymbolEntry) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.scopes[entry.scope.0 as usize].members.push(id);
        self.symbols.push(entry);
        id
    }

    /// Look a name up in one scope only
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scope(scope).names.get(name).copied()
    }

    /// Resolve a name from `scope` outward to the global scope
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(&sym) = scope.names.get(name) {
                return Some(sym);
            }
            current = scope.parent;
        }
        None
    }

    pub fn get(&self, id: SymbolId) -> &SymbolEntry {
        &self.symbols[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolEntry {
        &mut self.symbols[id.0 as usize]
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.get(id).name
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of temporaries handed out so far
    pub fn temp_count(&self) -> u32 {
        self.next_temp
    }

    /// Variables (locals, params, temporaries) owned by `scope`, in creation order
    pub fn variables_in(&self, scope: ScopeId) -> impl Iterator<Item = SymbolId> + '_ {
        self.scope(scope)
            .members
            .iter()
            .copied()
            .filter(move |&id| self.get(id).kind.is_variable())
    }

    /// Iterate over all symbols with their ids
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolEntry)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, entry)| (SymbolId(i as u32), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::TypeContext;

    #[test]
    fn test_define_and_resolve_through_parents() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let x = table
            .define(global, "x", SymbolKind::Global, TypeContext::INT, Span::default())
            .unwrap();

        let func = table.push_scope(ScopeKind::Function, global);
        let block = table.push_scope(ScopeKind::Block, func);

        assert_eq!(table.resolve(block, "x"), Some(x));
        assert_eq!(table.resolve(block, "y"), None);
        assert_eq!(table.lookup_local(block, "x"), None);
    }

    #[test]
    fn test_shadowing_and_duplicates() {
        let mut table = SymbolTable::new();
        let global = table.global_scope();
        let outer = table
            .define(global, "n", SymbolKind::Global, TypeContext::INT, Span::default())
            .unwrap();
        let block = table.push_scope(ScopeKind::Block, global);
        let inner = table
            .define(block, "n", SymbolKind::Local, TypeContext::CHAR, Span::default())
            .unwrap();

        assert_ne!(outer, inner);
        assert_eq!(table.resolve(block, "n"), Some(inner));

        let dup = table.define(block, "n", SymbolKind::Local, TypeContext::INT, Span::default());
        assert!(matches!(dup, Err(CheckError::DuplicateSymbol { .. })));
    }

    #[test]
    fn test_temporaries_are_fresh_and_hidden() {
        let mut table = SymbolTable::new();
        let scope = table.push_scope(ScopeKind::Block, table.global_scope());

        let a = table.new_temp(scope, TypeContext::INT);
        let b = table.new_temp(scope, TypeContext::INT);
        let c = table.new_temp(table.global_scope(), TypeContext::CHAR);

        assert_ne!(a, b);
        assert_eq!(table.name(a), "_t0");
        assert_eq!(table.name(b), "_t1");
        assert_eq!(table.name(c), "_t2");
        assert_eq!(table.get(a).kind, SymbolKind::Temp);
        assert_eq!(table.resolve(scope, "_t0"), None);
        assert_eq!(table.variables_in(scope).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(table.temp_count(), 3);
    }
}
