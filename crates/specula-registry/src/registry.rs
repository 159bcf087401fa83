//! The type registry: registration, resolution, and the process-lifetime
//! caches.
//!
//! # Storage Model
//!
//! - **Types**: entries stored by [`TypeHash`], with a qualified-name table
//!   and a Rust `TypeId` table pointing into it.
//! - **Resolution memo**: candidate name → hash, populated only with names
//!   that actually resolved.
//! - **Member indexes**: hash → `Arc<MemberIndex>`, built lazily on first
//!   access.
//! - **Constructors**: (hash, exact parameter signature) → `Arc<CtorDef>`.
//!
//! # Thread Safety
//!
//! Registration is a single-threaded phase: [`TypeRegistry::register`] takes
//! `&mut self`. After setup the registry is shared freely (`&self`, or via
//! `Arc`); the lookup caches are concurrent maps. Racing populations of the
//! same key may duplicate pure resolution work, but only one write is
//! retained - resolution is a pure function of the key, so this is
//! harmless. Nothing is ever evicted: registered types are frozen for the
//! registry's lifetime.

use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxHashMap;
use specula_core::{
    CtorDef, FieldDef, LookupError, MirrorError, Modifiers, RegistrationError, TypeEntry,
    TypeHash, Value,
};
use std::sync::Arc;
use tracing::debug;

use crate::{BoundInstance, MemberIndex};

type CtorKey = (TypeHash, Box<[TypeHash]>);

/// Registry of type entries plus the toolkit's caches.
///
/// # Examples
///
/// ```
/// use specula_core::{FieldDef, Modifiers, TypeEntry};
/// use specula_registry::TypeRegistry;
///
/// struct Player { health: i64 }
///
/// let mut registry = TypeRegistry::new();
/// registry
///     .register(TypeEntry::of::<Player>("game.Player").with_field(
///         FieldDef::accessor::<Player, i64>(
///             "health",
///             Modifiers::PUBLIC,
///             |p| p.health,
///             |p, v| p.health = v,
///         ),
///     ))
///     .unwrap();
///
/// let entry = registry.resolve(&["game.Player"]).unwrap();
/// assert_eq!(entry.name(), "Player");
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    // === Registration-phase tables ===
    types: FxHashMap<TypeHash, Arc<TypeEntry>>,
    names: FxHashMap<String, TypeHash>,
    aliases: FxHashMap<String, TypeHash>,
    rust_types: FxHashMap<TypeId, TypeHash>,

    // === Concurrent lookup caches ===
    resolved: DashMap<String, TypeHash>,
    indexes: DashMap<TypeHash, Arc<MemberIndex>>,
    constructors: DashMap<CtorKey, Arc<CtorDef>>,

    // === Diagnostics ===
    live_lookups: AtomicU64,
    indexes_built: AtomicU64,
    ctor_resolutions: AtomicU64,
}

impl TypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a type entry.
    ///
    /// The qualified name and every alias must be unused across both the
    /// name and alias tables.
    pub fn register(&mut self, entry: TypeEntry) -> Result<TypeHash, RegistrationError> {
        let qualified = entry.qualified_name().to_owned();
        if self.name_taken(&qualified) {
            return Err(RegistrationError::DuplicateType {
                qualified_name: qualified,
            });
        }
        for alias in entry.aliases() {
            if self.name_taken(alias) {
                return Err(RegistrationError::DuplicateAlias {
                    qualified_name: qualified,
                    alias: alias.clone(),
                });
            }
        }

        let hash = entry.type_hash();
        if self.types.contains_key(&hash) {
            // Distinct qualified names hashing together; refuse rather than
            // shadow the earlier entry.
            return Err(RegistrationError::DuplicateType {
                qualified_name: qualified,
            });
        }

        for alias in entry.aliases() {
            self.aliases.insert(alias.clone(), hash);
        }
        if let Some(rust_type) = entry.rust_type() {
            self.rust_types.insert(rust_type, hash);
        }
        self.names.insert(qualified, hash);
        self.types.insert(hash, Arc::new(entry));
        Ok(hash)
    }

    fn name_taken(&self, name: &str) -> bool {
        self.names.contains_key(name) || self.aliases.contains_key(name)
    }

    // ==========================================================================
    // Class resolution
    // ==========================================================================

    /// Resolve a type by an ordered list of candidate qualified names.
    ///
    /// Every candidate is first checked against the resolution memo; only
    /// then are live lookups attempted, in order. The winning name - and
    /// only the winning name - is memoized. Fails with
    /// [`LookupError::TypeNotFound`] naming all attempted candidates.
    pub fn resolve(&self, candidates: &[&str]) -> Result<Arc<TypeEntry>, LookupError> {
        for name in candidates {
            if let Some(hash) = self.resolved.get(*name).map(|memo| *memo)
                && let Some(entry) = self.types.get(&hash)
            {
                return Ok(entry.clone());
            }
        }
        for name in candidates {
            if let Some(entry) = self.live_lookup(name) {
                self.resolved.insert((*name).to_owned(), entry.type_hash());
                return Ok(entry);
            }
        }
        debug!(?candidates, "type resolution failed");
        Err(LookupError::TypeNotFound {
            attempted: candidates.iter().map(|s| (*s).to_owned()).collect(),
        })
    }

    fn live_lookup(&self, name: &str) -> Option<Arc<TypeEntry>> {
        self.live_lookups.fetch_add(1, Ordering::Relaxed);
        let hash = self
            .names
            .get(name)
            .or_else(|| self.aliases.get(name))?;
        self.types.get(hash).cloned()
    }

    /// Get a registered entry by hash.
    pub fn entry(&self, hash: TypeHash) -> Option<&Arc<TypeEntry>> {
        self.types.get(&hash)
    }

    /// Human-readable name for a hash: the qualified name when registered,
    /// the hex form otherwise.
    pub fn describe(&self, hash: TypeHash) -> String {
        match self.types.get(&hash) {
            Some(entry) => entry.qualified_name().to_owned(),
            None => hash.to_string(),
        }
    }

    // ==========================================================================
    // Member indexes
    // ==========================================================================

    /// The member index for an entry, building and caching it on first
    /// request.
    pub fn index_of(&self, entry: &Arc<TypeEntry>) -> Arc<MemberIndex> {
        self.indexes
            .entry(entry.type_hash())
            .or_insert_with(|| {
                self.indexes_built.fetch_add(1, Ordering::Relaxed);
                Arc::new(MemberIndex::build(entry))
            })
            .clone()
    }

    // ==========================================================================
    // Binding and construction
    // ==========================================================================

    /// Bind a live value to its registered entry, located via the value's
    /// Rust type.
    pub fn bind<T: Any>(&self, value: T) -> Result<BoundInstance, LookupError> {
        let not_found = || LookupError::TypeNotFound {
            attempted: vec![std::any::type_name::<T>().to_owned()],
        };
        let hash = self
            .rust_types
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(not_found)?;
        let entry = self.types.get(&hash).cloned().ok_or_else(not_found)?;
        let index = self.index_of(&entry);
        Ok(BoundInstance::new(Box::new(value), entry, index))
    }

    /// Resolve a type by candidate names and construct an instance from the
    /// given arguments.
    pub fn construct(
        &self,
        candidates: &[&str],
        args: Vec<Value>,
    ) -> Result<BoundInstance, MirrorError> {
        let entry = self.resolve(candidates)?;
        self.construct_for(&entry, args)
    }

    /// Construct an instance of a resolved type.
    ///
    /// The argument signature is computed from the arguments' runtime value
    /// types and matched against the type's registered constructors. The
    /// resolved handle is cached under the exact signature, so a repeat
    /// construction with the same argument types skips the scan entirely.
    pub fn construct_for(
        &self,
        entry: &Arc<TypeEntry>,
        args: Vec<Value>,
    ) -> Result<BoundInstance, MirrorError> {
        let signature: Vec<TypeHash> = args.iter().map(Value::type_hash).collect();
        let key: CtorKey = (entry.type_hash(), signature.clone().into_boxed_slice());

        let ctor = match self.constructors.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let found = entry
                    .constructors()
                    .iter()
                    .find(|c| c.params() == signature.as_slice())
                    .ok_or_else(|| LookupError::ConstructorNotFound {
                        type_name: entry.qualified_name().to_owned(),
                        signature: args.iter().map(|v| v.type_label().to_owned()).collect(),
                    })?
                    .clone();
                self.ctor_resolutions.fetch_add(1, Ordering::Relaxed);
                debug!(
                    ty = entry.qualified_name(),
                    ctor = %found.signature_hash(entry.type_hash()),
                    "resolved constructor"
                );
                self.constructors.entry(key).or_insert(found).clone()
            }
        };

        let instance = ctor.instantiate(args).map_err(MirrorError::Access)?;
        let index = self.index_of(entry);
        Ok(BoundInstance::new(instance, entry.clone(), index))
    }

    // ==========================================================================
    // Hierarchy lookup
    // ==========================================================================

    /// Find a field by name, walking the base-type chain.
    ///
    /// Unlike the member index - which is exact-type by design - this lookup
    /// ascends through `base` entries until a field with the given name is
    /// found. Static fields are skipped unless `allow_static` is set.
    pub fn find_field_walking(
        &self,
        start: TypeHash,
        name: &str,
        allow_static: bool,
    ) -> Option<Arc<FieldDef>> {
        let mut current = self.types.get(&start);
        while let Some(entry) = current {
            let hit = entry.fields().iter().find(|f| {
                f.name() == name && (allow_static || !f.modifiers().contains(Modifiers::STATIC))
            });
            if let Some(field) = hit {
                return Some(field.clone());
            }
            current = entry.base().and_then(|base| self.types.get(&base));
        }
        None
    }

    // ==========================================================================
    // Diagnostics
    // ==========================================================================

    /// Number of live (non-memoized) name lookups performed so far.
    pub fn live_lookups(&self) -> u64 {
        self.live_lookups.load(Ordering::Relaxed)
    }

    /// Number of member indexes built so far.
    pub fn indexes_built(&self) -> u64 {
        self.indexes_built.load(Ordering::Relaxed)
    }

    /// Number of constructor resolutions (cache misses) so far.
    pub fn ctor_resolutions(&self) -> u64 {
        self.ctor_resolutions.load(Ordering::Relaxed)
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("resolved", &self.resolved.len())
            .field("indexes", &self.indexes.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
