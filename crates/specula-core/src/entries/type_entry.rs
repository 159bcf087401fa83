//! Type entries - the registration surface.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::TypeHash;

use super::{CtorDef, FieldDef, MethodDef};

/// A registered type description.
///
/// This is the host-type-system boundary of the toolkit: a `TypeEntry`
/// declares a type's qualified name, optional alias names, optional base
/// type, and its declared fields, methods, and constructors, each carrying
/// the thunks that perform the actual operation. Entries are immutable once
/// registered.
///
/// # Examples
///
/// ```
/// use specula_core::{CtorDef, FieldDef, Modifiers, TypeEntry};
///
/// struct Player { health: i64 }
///
/// let entry = TypeEntry::of::<Player>("game.Player")
///     .with_alias("game.v2.Player")
///     .with_field(FieldDef::accessor::<Player, i64>(
///         "health",
///         Modifiers::PUBLIC,
///         |p| p.health,
///         |p, v| p.health = v,
///     ))
///     .with_constructor(CtorDef::unary::<Player, i64>(|health| Player { health }));
///
/// assert_eq!(entry.name(), "Player");
/// assert!(entry.find_field("health").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TypeEntry {
    name: String,
    qualified_name: String,
    type_hash: TypeHash,
    rust_type: Option<TypeId>,
    aliases: Vec<String>,
    base: Option<TypeHash>,
    fields: Vec<Arc<FieldDef>>,
    methods: Vec<Arc<MethodDef>>,
    constructors: Vec<Arc<CtorDef>>,
}

impl TypeEntry {
    /// Create an entry for a concrete Rust type.
    ///
    /// The Rust `TypeId` is recorded so live values of `T` can later be
    /// bound without naming the type.
    pub fn of<T: Any>(qualified_name: impl Into<String>) -> Self {
        let mut entry = Self::opaque(qualified_name);
        entry.rust_type = Some(TypeId::of::<T>());
        entry
    }

    /// Create an entry with no backing Rust type (metadata-only).
    pub fn opaque(qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        let type_hash = TypeHash::from_name(&qualified_name);
        Self {
            name: simple_name(&qualified_name).to_owned(),
            qualified_name,
            type_hash,
            rust_type: None,
            aliases: Vec::new(),
            base: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    // === Builder Methods ===

    /// Add an alias name the resolver may find this entry under.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the base type (single inheritance).
    pub fn with_base(mut self, base: TypeHash) -> Self {
        self.base = Some(base);
        self
    }

    /// Add a declared field. Declaration order is preserved.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    /// Add a declared method. Declaration order is preserved.
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    /// Add a constructor.
    pub fn with_constructor(mut self, ctor: CtorDef) -> Self {
        self.constructors.push(Arc::new(ctor));
        self
    }

    // === Query Methods ===

    /// Unqualified name (the last path segment).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Type hash identity, derived from the qualified name.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// The backing Rust type id, when registered with [`TypeEntry::of`].
    pub fn rust_type(&self) -> Option<TypeId> {
        self.rust_type
    }

    /// Alias names.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Base type hash, if any.
    pub fn base(&self) -> Option<TypeHash> {
        self.base
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[Arc<FieldDef>] {
        &self.fields
    }

    /// Declared methods, in declaration order.
    pub fn methods(&self) -> &[Arc<MethodDef>] {
        &self.methods
    }

    /// Registered constructors.
    pub fn constructors(&self) -> &[Arc<CtorDef>] {
        &self.constructors
    }

    /// Find a declared field by name.
    pub fn find_field(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Find a declared method by name.
    pub fn find_method(&self, name: &str) -> Option<&Arc<MethodDef>> {
        self.methods.iter().find(|m| m.name() == name)
    }
}

/// The last segment of a dotted or double-colon qualified name.
fn simple_name(qualified: &str) -> &str {
    qualified
        .rsplit(['.', ':'])
        .next()
        .unwrap_or(qualified)
}
