//! Core data model for the specula reflection toolkit.
//!
//! This crate holds the leaf types shared by the registry and the query
//! surface:
//!
//! - [`TypeHash`] - deterministic hash-based identity for types, members,
//!   and constructor signatures
//! - [`Value`] / [`IntoValue`] / [`FromValue`] - the dynamic value currency
//!   of reflective reads, writes, and invocations
//! - [`ArgValue`] - the (value, transform) argument wrapper
//! - [`Modifiers`] - member modifier flags
//! - [`FieldDef`], [`MethodDef`], [`CtorDef`], [`TypeEntry`] - member and
//!   type definitions carrying type-erased accessor thunks
//! - the error hierarchy under [`MirrorError`]
//!
//! Nothing here caches or resolves; that lives in `specula-registry`.

mod args;
mod entries;
mod error;
mod modifiers;
mod type_hash;
mod value;

pub use args::ArgValue;
pub use entries::{CtorDef, FieldDef, Member, MethodDef, TypeEntry};
pub use error::{AccessError, LookupError, MirrorError, RegistrationError};
pub use modifiers::Modifiers;
pub use type_hash::{TypeHash, hash_constants};
pub use value::{BoxedValue, FromValue, IntoValue, Value};
