//! Unified error types for specula.
//!
//! This module provides a consistent error hierarchy for the phases of the
//! toolkit: registration, lookup, and member access.
//!
//! ## Error Hierarchy
//!
//! ```text
//! MirrorError (top-level wrapper)
//! ├── RegistrationError - duplicate names/aliases during registration
//! ├── LookupError       - structural failures (type, constructor) - hard errors
//! └── AccessError       - per-operation get/set/invoke failures
//! ```
//!
//! Structural lookup failures propagate as hard errors. Per-operation access
//! failures are typed values too: a failed `get` is an `Err(AccessError)`,
//! never an ambiguous null-like result, so callers can always distinguish
//! "operation failed" from "value is legitimately absent".

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering a type entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this qualified name (or a colliding alias) already exists.
    #[error("type '{qualified_name}' is already registered")]
    DuplicateType { qualified_name: String },

    /// An alias of the new entry collides with an existing name or alias.
    #[error("alias '{alias}' of type '{qualified_name}' is already registered")]
    DuplicateAlias {
        qualified_name: String,
        alias: String,
    },
}

// ============================================================================
// Lookup Errors
// ============================================================================

/// Structural lookup failures. These are hard errors and propagate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// None of the candidate names resolved to a registered type.
    #[error("unable to resolve a type by any of these names: {}", attempted.join(", "))]
    TypeNotFound { attempted: Vec<String> },

    /// No registered constructor of the type matches the argument signature.
    #[error("no constructor of '{type_name}' matches argument types [{}]", signature.join(", "))]
    ConstructorNotFound {
        type_name: String,
        signature: Vec<String>,
    },
}

// ============================================================================
// Access Errors
// ============================================================================

/// Per-operation failures while reading, writing, or invoking a member.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The bound instance is not of the type the accessor thunk was
    /// registered for.
    #[error("receiver type mismatch: accessor expects {expected}")]
    ReceiverMismatch { expected: &'static str },

    /// A value could not be converted to the type the member expects.
    #[error("value type mismatch: expected {expected}, got {found}")]
    ValueMismatch {
        expected: &'static str,
        found: String,
    },

    /// The field was registered without a setter.
    #[error("field '{field}' has no registered setter")]
    NoSetter { field: String },

    /// A method was invoked with the wrong number of arguments.
    #[error("expected {expected} arguments, got {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// The target operation itself failed.
    #[error("invocation failed: {reason}")]
    InvocationFailed { reason: String },

    /// The bound instance is already borrowed by an operation further up the
    /// stack (a transform re-entering the same instance, for example).
    #[error("instance of '{type_name}' is already in use by a reentrant operation")]
    ReentrantAccess { type_name: String },
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error wrapper unifying all phases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_not_found_names_all_candidates() {
        let err = LookupError::TypeNotFound {
            attempted: vec!["a.b.C".into(), "a.c.C".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("a.b.C"));
        assert!(msg.contains("a.c.C"));
    }

    #[test]
    fn constructor_not_found_names_signature() {
        let err = LookupError::ConstructorNotFound {
            type_name: "game.Player".into(),
            signature: vec!["i64".into(), "f64".into()],
        };
        assert_eq!(
            err.to_string(),
            "no constructor of 'game.Player' matches argument types [i64, f64]"
        );
    }

    #[test]
    fn wrapper_is_transparent() {
        let err: MirrorError = AccessError::ArityMismatch {
            expected: 2,
            found: 0,
        }
        .into();
        assert_eq!(err.to_string(), "expected 2 arguments, got 0");
    }
}
