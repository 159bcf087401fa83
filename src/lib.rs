//! specula - a registry-backed runtime reflection toolkit.
//!
//! Callers register type descriptions once (fields, methods, constructors,
//! alias names), then:
//!
//! - resolve types by ordered candidate qualified names, memoized per
//!   winning name
//! - enumerate declared members grouped by *value type* (a field's declared
//!   type, a method's return type), snapshotted once per type
//! - narrow members with a composable filter builder (leaf predicates plus
//!   nested child specs with independent required semantics)
//! - read, write, and invoke matched members dynamically on type-erased
//!   instances, with typed errors
//! - construct instances through cached constructor handles keyed by the
//!   exact argument-type signature
//!
//! All caches live inside an explicit [`TypeRegistry`]; there is no global
//! state. Registration is a single-threaded setup phase, after which the
//! registry can be shared freely across threads.
//!
//! # Example
//!
//! ```
//! use specula::prelude::*;
//!
//! struct Npc {
//!     health: i64,
//!     stamina: i64,
//!     name: String,
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register(
//!     TypeEntry::of::<Npc>("game.Npc")
//!         .with_alias("game.v2.Npc")
//!         .with_field(FieldDef::accessor::<Npc, i64>(
//!             "health",
//!             Modifiers::PUBLIC,
//!             |n| n.health,
//!             |n, v| n.health = v,
//!         ))
//!         .with_field(FieldDef::accessor::<Npc, i64>(
//!             "stamina",
//!             Modifiers::PUBLIC,
//!             |n| n.stamina,
//!             |n, v| n.stamina = v,
//!         ))
//!         .with_field(FieldDef::read_only::<Npc, String>(
//!             "name",
//!             Modifiers::PUBLIC | Modifiers::FINAL,
//!             |n| n.name.clone(),
//!         ))
//!         .with_method(MethodDef::unary::<Npc, i64, i64>(
//!             "heal",
//!             Modifiers::PUBLIC,
//!             |n, amount| {
//!                 n.health += amount;
//!                 n.health
//!             },
//!         ))
//!         .with_constructor(CtorDef::unary::<Npc, String>(|name| Npc {
//!             health: 20,
//!             stamina: 10,
//!             name,
//!         })),
//! )?;
//!
//! // Construct through the factory; the resolved constructor handle is
//! // cached under the exact argument-type signature.
//! let npc = registry.construct(&["game.v2.Npc"], vec![Value::Str("steve".into())])?;
//!
//! // Filter members by value type, then narrow by name.
//! let health = npc
//!     .fields()
//!     .require_value_type(TypeHash::of::<i64>())
//!     .require_name("health")
//!     .build()
//!     .find_first()
//!     .expect("declared field");
//! health.set(25i64)?;
//! assert_eq!(health.get_as::<i64>()?, 25);
//!
//! // Invoke a method with a transformed argument.
//! let heal = npc
//!     .methods()
//!     .require_name("heal")
//!     .build()
//!     .find_first()
//!     .expect("declared method");
//! assert_eq!(heal.invoke_as::<i64>([ArgValue::of(5i64, |x| x * 2)])?, 35);
//! # Ok::<(), specula::MirrorError>(())
//! ```

pub mod accessor;
pub mod filter;

pub use accessor::{FieldAccessor, MethodAccessor};
pub use filter::{
    BoundFilterBuilder, BoundInstanceExt, FieldFilterBuilder, FieldQuery, FilterBuilder,
    FilterPart, MemberFilter, MemberPredicate, MemberQuery, MethodFilterBuilder, MethodQuery,
    QueryTarget,
};

pub use specula_core::{
    AccessError, ArgValue, BoxedValue, CtorDef, FieldDef, FromValue, IntoValue, LookupError,
    Member, MethodDef, MirrorError, Modifiers, RegistrationError, TypeEntry, TypeHash, Value,
};
pub use specula_registry::{BoundInstance, MemberIndex, MemberTable, TypeRegistry};

/// Convenience re-exports for consumers.
pub mod prelude {
    pub use crate::accessor::{FieldAccessor, MethodAccessor};
    pub use crate::filter::{
        BoundInstanceExt, FieldFilterBuilder, FieldQuery, FilterBuilder, FilterPart, MemberFilter,
        MethodFilterBuilder, MethodQuery,
    };
    pub use specula_core::{
        AccessError, ArgValue, CtorDef, FieldDef, FromValue, IntoValue, LookupError, Member,
        MethodDef, MirrorError, Modifiers, RegistrationError, TypeEntry, TypeHash, Value,
    };
    pub use specula_registry::{BoundInstance, MemberIndex, MemberTable, TypeRegistry};
}
