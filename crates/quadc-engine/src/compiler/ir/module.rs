//! IR Module
//!
//! Top-level container for a lowered compilation unit.

use super::function::IrFunction;
use super::quad::{Quad, QuadList};
use rustc_hash::FxHashMap;

/// Function index within an [`IrModule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

/// An IR module (compilation unit)
#[derive(Debug, Clone, Default)]
pub struct IrModule {
    /// `Global` quads, in source order
    pub globals: QuadList,
    /// Defined functions, in source order
    pub functions: Vec<IrFunction>,
    /// Function lookup by name
    function_map: FxHashMap<String, FunctionId>,
}

impl IrModule {
    /// Create a new empty module
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global(&mut self, quad: Quad) {
        self.globals.push(quad);
    }

    /// Add a function to the module
    pub fn add_function(&mut self, func: IrFunction) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.function_map.insert(func.name.clone(), id);
        self.functions.push(func);
        id
    }

    /// Get a function by ID
    pub fn get_function(&self, id: FunctionId) -> Option<&IrFunction> {
        self.functions.get(id.0 as usize)
    }

    /// Get a function by name
    pub fn get_function_by_name(&self, name: &str) -> Option<&IrFunction> {
        self.function_map
            .get(name)
            .and_then(|&id| self.get_function(id))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn functions(&self) -> impl Iterator<Item = &IrFunction> {
        self.functions.iter()
    }

    /// Validate every function
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .functions
            .iter()
            .filter_map(|func| {
                func.validate()
                    .err()
                    .map(|e| format!("Function '{}': {}", func.name, e))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Total quad count across globals and functions
    pub fn total_quad_count(&self) -> usize {
        self.globals.len() + self.functions.iter().map(|f| f.quad_count()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::checker::{ScopeId, SymbolId};
    use crate::parser::TypeContext;

    #[test]
    fn test_function_lookup() {
        let mut module = IrModule::new();
        let id = module.add_function(IrFunction::new(
            "main",
            SymbolId(0),
            vec![],
            TypeContext::INT,
            ScopeId(1),
        ));
        module.add_global(Quad::global(SymbolId(1), None));

        assert_eq!(module.function_count(), 1);
        assert_eq!(module.get_function(id).map(|f| f.name.as_str()), Some("main"));
        assert!(module.get_function_by_name("main").is_some());
        assert!(module.get_function_by_name("other").is_none());
        assert_eq!(module.total_quad_count(), 1);
    }
}
