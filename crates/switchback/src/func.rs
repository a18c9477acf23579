// File: src/func.rs
// Purpose: Handler functions, references to them, and the per-set registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{Result, RouterError};

type FnBody = dyn Fn(&mut Context<'_>) + Send + Sync;

/// A callable unit in a route or handler chain.
///
/// Cheap to clone; clones share the same underlying closure, and
/// [`Func::ptr_eq`] compares that identity.
#[derive(Clone)]
pub struct Func(Arc<FnBody>);

impl Func {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>) + Send + Sync + 'static,
    {
        Func(Arc::new(f))
    }

    pub fn call(&self, ctx: &mut Context<'_>) {
        (self.0)(ctx)
    }

    /// Whether both values wrap the same closure
    pub fn ptr_eq(&self, other: &Func) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Func({:p})", Arc::as_ptr(&self.0))
    }
}

/// Either a function value or the name of a registered one.
///
/// Names are resolved when the route set is built, against the registry as
/// it stood at the point of declaration.
#[derive(Debug, Clone)]
pub enum FnRef {
    Direct(Func),
    Named(String),
}

impl FnRef {
    pub fn named(name: impl Into<String>) -> Self {
        FnRef::Named(name.into())
    }
}

impl From<Func> for FnRef {
    fn from(func: Func) -> Self {
        FnRef::Direct(func)
    }
}

impl From<&Func> for FnRef {
    fn from(func: &Func) -> Self {
        FnRef::Direct(func.clone())
    }
}

impl From<&str> for FnRef {
    fn from(name: &str) -> Self {
        FnRef::Named(name.to_string())
    }
}

impl From<String> for FnRef {
    fn from(name: String) -> Self {
        FnRef::Named(name)
    }
}

/// Ordered list of function references, as accepted by `to`, `before` and `after`
#[derive(Debug, Clone, Default)]
pub struct FnList(Vec<FnRef>);

impl FnList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, func: impl Into<FnRef>) {
        self.0.push(func.into());
    }

    pub fn extend(&mut self, other: FnList) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FnRef> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<FnRef> for FnList {
    fn from(func: FnRef) -> Self {
        FnList(vec![func])
    }
}

impl From<Func> for FnList {
    fn from(func: Func) -> Self {
        FnList(vec![FnRef::Direct(func)])
    }
}

impl From<&Func> for FnList {
    fn from(func: &Func) -> Self {
        FnList(vec![FnRef::Direct(func.clone())])
    }
}

impl From<&str> for FnList {
    fn from(name: &str) -> Self {
        FnList(vec![FnRef::from(name)])
    }
}

impl From<String> for FnList {
    fn from(name: String) -> Self {
        FnList(vec![FnRef::Named(name)])
    }
}

impl<T: Into<FnRef>> From<Vec<T>> for FnList {
    fn from(funcs: Vec<T>) -> Self {
        FnList(funcs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FnRef>, const N: usize> From<[T; N]> for FnList {
    fn from(funcs: [T; N]) -> Self {
        FnList(funcs.into_iter().map(Into::into).collect())
    }
}

/// Maps names to functions for one route set.
///
/// Re-registering a name overwrites it; chains resolved before the overwrite
/// keep the function they were bound to.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    funcs: HashMap<String, Func>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `func` under `name`, returning the function it replaced
    pub fn register(&mut self, name: impl Into<String>, func: Func) -> Option<Func> {
        self.funcs.insert(name.into(), func)
    }

    pub fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Resolves one reference into a single-element chain
    pub fn resolve(&self, func: &FnRef) -> Result<Func> {
        match func {
            FnRef::Direct(func) => Ok(func.clone()),
            FnRef::Named(name) => {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| RouterError::UnknownFunction { name: name.clone() })
            }
        }
    }

    /// Resolves every reference in order and concatenates the results
    pub fn resolve_all(&self, funcs: &FnList) -> Result<Vec<Func>> {
        funcs.iter().map(|func| self.resolve(func)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Func {
        Func::new(|_| {})
    }

    #[test]
    fn test_clones_share_identity() {
        let a = noop();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&noop()));
    }

    #[test]
    fn test_resolve_direct_and_named() {
        let foo = noop();
        let bar = noop();
        let mut registry = FunctionRegistry::new();
        registry.register("foo", foo.clone());

        let list = FnList::from(vec![FnRef::from("foo"), FnRef::from(&bar)]);
        let chain = registry.resolve_all(&list).unwrap();

        assert_eq!(chain.len(), 2);
        assert!(chain[0].ptr_eq(&foo));
        assert!(chain[1].ptr_eq(&bar));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let registry = FunctionRegistry::new();
        let err = registry.resolve(&FnRef::named("missing")).unwrap_err();
        assert_eq!(
            err,
            RouterError::UnknownFunction {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_overwrite_keeps_earlier_resolution() {
        let first = noop();
        let second = noop();
        let mut registry = FunctionRegistry::new();

        registry.register("f", first.clone());
        let bound = registry.resolve(&FnRef::named("f")).unwrap();
        let replaced = registry.register("f", second.clone());

        assert!(replaced.unwrap().ptr_eq(&first));
        assert!(bound.ptr_eq(&first));
        assert!(registry.get("f").unwrap().ptr_eq(&second));
    }
}
