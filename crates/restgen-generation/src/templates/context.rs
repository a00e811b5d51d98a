//! Variable bindings for template resolution

use std::collections::BTreeMap;

use crate::models::TypeDeclaration;

/// A value a template key can be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single type, rendered through a naming form
    Type(TypeDeclaration),
    /// An ordered sequence of types, iterated with `range`
    Types(Vec<TypeDeclaration>),
    /// A plain string emitted as-is
    Scalar(String),
}

impl From<TypeDeclaration> for Value {
    fn from(declaration: TypeDeclaration) -> Self {
        Value::Type(declaration)
    }
}

impl From<Vec<TypeDeclaration>> for Value {
    fn from(declarations: Vec<TypeDeclaration>) -> Self {
        Value::Types(declarations)
    }
}

impl From<String> for Value {
    fn from(scalar: String) -> Self {
        Value::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(scalar: &str) -> Self {
        Value::Scalar(scalar.to_string())
    }
}

/// Key to value bindings visible to a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    values: BTreeMap<String, Value>,
}

impl VariableMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, returning the previous binding
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Builder form of [`VariableMap::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a binding
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether `key` is bound
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Bound keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every binding of `other` into this map, overwriting on conflict
    pub fn extend(&mut self, other: &VariableMap) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}
