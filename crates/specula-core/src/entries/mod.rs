//! Registry entry types: fields, methods, constructors, and type entries.

mod constructor;
mod field;
mod method;
mod type_entry;

pub use constructor::CtorDef;
pub use field::FieldDef;
pub use method::MethodDef;
pub use type_entry::TypeEntry;

use crate::{Modifiers, TypeHash};

/// Common surface of declared members (fields and methods).
///
/// The *value type* of a member is what the member index groups by: a
/// field's declared type, or a method's declared return type.
pub trait Member: Send + Sync + 'static {
    /// Member name.
    fn name(&self) -> &str;

    /// Modifier flags.
    fn modifiers(&self) -> Modifiers;

    /// The member's value type.
    fn value_type(&self) -> TypeHash;
}
