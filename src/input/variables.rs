// src/input/variables.rs  -  In-memory firmware variable store
use super::{InputError, VariableStore};
use std::collections::HashMap;

/// Variables loaded from the `[nvram]` config table
#[derive(Debug, Clone, Default)]
pub struct MemoryVariables(HashMap<String, u32>);

impl MemoryVariables {
    pub fn new(vars: HashMap<String, u32>) -> Self { Self(vars) }
}

impl VariableStore for MemoryVariables {
    fn read_u32(&self, name: &str) -> Result<u32, InputError> {
        self.0.get(name).copied().ok_or_else(|| InputError::NotFound(name.to_string()))
    }
}
