//! Bound instances: a live value paired with its member index.

use std::any::Any;
use std::cell::RefCell;
use std::sync::Arc;

use specula_core::{AccessError, TypeEntry, TypeHash};

use crate::MemberIndex;

/// A type-erased instance paired with its type entry and member index.
///
/// The instance is owned exclusively for the lifetime of the binding;
/// accessors derived from it borrow the `BoundInstance` and reach the value
/// through [`read`](BoundInstance::read) / [`write`](BoundInstance::write).
///
/// Interior mutability is `RefCell`: the binding adds no locking, and a
/// caller sharing one bound instance across threads is responsible for its
/// own synchronization. A transform that re-enters the same instance
/// mid-operation gets a typed [`AccessError::ReentrantAccess`], not a
/// panic.
pub struct BoundInstance {
    instance: RefCell<Box<dyn Any>>,
    entry: Arc<TypeEntry>,
    index: Arc<MemberIndex>,
}

impl BoundInstance {
    /// Bind a type-erased instance to its entry and index.
    pub fn new(instance: Box<dyn Any>, entry: Arc<TypeEntry>, index: Arc<MemberIndex>) -> Self {
        Self {
            instance: RefCell::new(instance),
            entry,
            index,
        }
    }

    /// The bound type's entry.
    pub fn entry(&self) -> &Arc<TypeEntry> {
        &self.entry
    }

    /// The bound type's member index.
    pub fn index(&self) -> &Arc<MemberIndex> {
        &self.index
    }

    /// The bound type's hash.
    pub fn type_hash(&self) -> TypeHash {
        self.entry.type_hash()
    }

    /// Run a read-only operation against the instance.
    pub fn read<R>(&self, op: impl FnOnce(&dyn Any) -> R) -> Result<R, AccessError> {
        let guard = self
            .instance
            .try_borrow()
            .map_err(|_| self.reentrant())?;
        Ok(op(&**guard))
    }

    /// Run a mutating operation against the instance.
    pub fn write<R>(&self, op: impl FnOnce(&mut dyn Any) -> R) -> Result<R, AccessError> {
        let mut guard = self
            .instance
            .try_borrow_mut()
            .map_err(|_| self.reentrant())?;
        Ok(op(&mut **guard))
    }

    /// Take the instance back out of the binding.
    pub fn into_inner(self) -> Box<dyn Any> {
        self.instance.into_inner()
    }

    fn reentrant(&self) -> AccessError {
        AccessError::ReentrantAccess {
            type_name: self.entry.qualified_name().to_owned(),
        }
    }
}

impl std::fmt::Debug for BoundInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundInstance")
            .field("type", &self.entry.qualified_name())
            .finish_non_exhaustive()
    }
}
