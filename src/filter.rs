//! The member filter engine.
//!
//! A [`MemberFilter`] is an immutable, composable predicate set over one
//! member kind (fields or methods): a set of leaf predicates that must all
//! hold, plus nested child filters that participate in matching only when
//! their own `required` flag is set. Non-required children are inert for
//! matching but are retained - [`filters`](MemberFilter::filters) surfaces
//! them for introspection and further composition.
//!
//! Filters are built in two phases: a [`FilterBuilder`] accumulates, and
//! `build()` snapshots into an immutable spec.
//! [`MemberFilter::to_builder`] copies a spec back into a fresh builder, so
//! a derived builder never aliases the spec it came from.
//!
//! Bound queries ([`FieldQuery`], [`MethodQuery`]) attach a spec to a
//! [`BoundInstance`] and scan its member index: value-type groups in
//! first-declaration order, declaration order within each group. Grouping
//! by value type is how the index pre-narrows candidates cheaply; the query
//! only ever sees the composed match semantics.

use std::sync::Arc;

use specula_core::{FieldDef, Member, MethodDef, Modifiers, TypeHash};
use specula_registry::{BoundInstance, MemberIndex, MemberTable};

use crate::accessor::{FieldAccessor, MethodAccessor};

/// A shared leaf predicate over a member kind.
pub type MemberPredicate<M> = Arc<dyn Fn(&M) -> bool + Send + Sync>;

// ============================================================================
// Filter specs
// ============================================================================

/// An immutable predicate set over one member kind.
pub struct MemberFilter<M> {
    required: bool,
    predicates: Vec<MemberPredicate<M>>,
    children: Vec<Arc<MemberFilter<M>>>,
}

impl<M: Member> MemberFilter<M> {
    /// Start a fresh builder for this member kind.
    pub fn builder() -> FilterBuilder<M> {
        FilterBuilder::new()
    }

    /// Whether this filter demands participation when nested as a child.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Test a candidate member.
    ///
    /// All leaf predicates must hold (any failure rejects immediately);
    /// then each child is evaluated recursively, but only if that child's
    /// own required flag is set.
    pub fn matches(&self, member: &M) -> bool {
        for predicate in &self.predicates {
            if !predicate(member) {
                return false;
            }
        }
        for child in &self.children {
            if child.required && !child.matches(member) {
                return false;
            }
        }
        true
    }

    /// The union of leaf predicates and child filters, for introspection
    /// and composition.
    pub fn filters(&self) -> impl Iterator<Item = FilterPart<'_, M>> {
        self.predicates
            .iter()
            .map(FilterPart::Predicate)
            .chain(self.children.iter().map(FilterPart::Child))
    }

    /// Copy this spec into a fresh builder.
    ///
    /// The returned builder shares the (immutable) predicates and children
    /// but owns its own vectors: extending it never mutates this spec.
    pub fn to_builder(&self) -> FilterBuilder<M> {
        FilterBuilder {
            required: self.required,
            predicates: self.predicates.clone(),
            children: self.children.clone(),
        }
    }
}

impl<M> std::fmt::Debug for MemberFilter<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberFilter")
            .field("required", &self.required)
            .field("predicates", &self.predicates.len())
            .field("children", &self.children.len())
            .finish()
    }
}

/// One element of a filter's composition: a leaf predicate or a child spec.
pub enum FilterPart<'a, M> {
    Predicate(&'a MemberPredicate<M>),
    Child(&'a Arc<MemberFilter<M>>),
}

// ============================================================================
// Builders
// ============================================================================

/// Accumulating builder for a [`MemberFilter`].
pub struct FilterBuilder<M> {
    required: bool,
    predicates: Vec<MemberPredicate<M>>,
    children: Vec<Arc<MemberFilter<M>>>,
}

impl<M: Member> FilterBuilder<M> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            required: false,
            predicates: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Mark the resulting spec as required when nested as a child.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a mandatory leaf predicate.
    pub fn require(mut self, predicate: impl Fn(&M) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Leaf predicate: the member's modifier bits intersect the mask.
    pub fn require_modifier(self, mask: Modifiers) -> Self {
        self.require(move |member| member.modifiers().intersects(mask))
    }

    /// Leaf predicate: exact name match.
    pub fn require_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.require(move |member| member.name() == name)
    }

    /// Leaf predicate: exact value-type match.
    pub fn require_value_type(self, value_type: TypeHash) -> Self {
        self.require(move |member| member.value_type() == value_type)
    }

    /// Nest a child spec. It participates in matching only if its own
    /// required flag is set.
    pub fn with(mut self, child: impl Into<Arc<MemberFilter<M>>>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Snapshot into an immutable spec.
    pub fn build(self) -> MemberFilter<M> {
        MemberFilter {
            required: self.required,
            predicates: self.predicates,
            children: self.children,
        }
    }
}

impl<M: Member> Default for FilterBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Bound queries
// ============================================================================

/// A member kind that can be queried against a bound instance.
///
/// Ties a member definition type to the index table holding it and the
/// accessor type its matches are wrapped into.
pub trait QueryTarget: Member + Sized {
    /// The accessor produced for matches of this member kind.
    type Accessor<'a>;

    /// The index table holding members of this kind.
    fn table(index: &MemberIndex) -> &MemberTable<Self>;

    /// Wrap a located member into its accessor.
    fn wrap<'a>(def: Arc<Self>, bound: &'a BoundInstance) -> Self::Accessor<'a>;
}

impl QueryTarget for FieldDef {
    type Accessor<'a> = FieldAccessor<'a>;

    fn table(index: &MemberIndex) -> &MemberTable<Self> {
        index.fields()
    }

    fn wrap<'a>(def: Arc<Self>, bound: &'a BoundInstance) -> FieldAccessor<'a> {
        FieldAccessor::new(def, bound)
    }
}

impl QueryTarget for MethodDef {
    type Accessor<'a> = MethodAccessor<'a>;

    fn table(index: &MemberIndex) -> &MemberTable<Self> {
        index.methods()
    }

    fn wrap<'a>(def: Arc<Self>, bound: &'a BoundInstance) -> MethodAccessor<'a> {
        MethodAccessor::new(def, bound)
    }
}

/// Builder for a filter bound to a [`BoundInstance`].
pub struct BoundFilterBuilder<'a, M: QueryTarget> {
    bound: &'a BoundInstance,
    inner: FilterBuilder<M>,
}

/// Bound filter builder over fields.
pub type FieldFilterBuilder<'a> = BoundFilterBuilder<'a, FieldDef>;
/// Bound filter builder over methods.
pub type MethodFilterBuilder<'a> = BoundFilterBuilder<'a, MethodDef>;

impl<'a, M: QueryTarget> BoundFilterBuilder<'a, M> {
    fn new(bound: &'a BoundInstance) -> Self {
        Self {
            bound,
            inner: FilterBuilder::new(),
        }
    }

    /// Mark the resulting spec as required when nested as a child.
    pub fn required(mut self) -> Self {
        self.inner = self.inner.required();
        self
    }

    /// Add a mandatory leaf predicate.
    pub fn require(mut self, predicate: impl Fn(&M) -> bool + Send + Sync + 'static) -> Self {
        self.inner = self.inner.require(predicate);
        self
    }

    /// Leaf predicate: the member's modifier bits intersect the mask.
    pub fn require_modifier(mut self, mask: Modifiers) -> Self {
        self.inner = self.inner.require_modifier(mask);
        self
    }

    /// Leaf predicate: exact name match.
    pub fn require_name(mut self, name: impl Into<String>) -> Self {
        self.inner = self.inner.require_name(name);
        self
    }

    /// Leaf predicate: exact value-type match.
    pub fn require_value_type(mut self, value_type: TypeHash) -> Self {
        self.inner = self.inner.require_value_type(value_type);
        self
    }

    /// Nest a child spec.
    pub fn with(mut self, child: impl Into<Arc<MemberFilter<M>>>) -> Self {
        self.inner = self.inner.with(child);
        self
    }

    /// Snapshot into a query against the bound instance.
    pub fn build(self) -> MemberQuery<'a, M> {
        MemberQuery {
            bound: self.bound,
            spec: Arc::new(self.inner.build()),
        }
    }
}

/// An immutable filter spec attached to a bound instance.
pub struct MemberQuery<'a, M: QueryTarget> {
    bound: &'a BoundInstance,
    spec: Arc<MemberFilter<M>>,
}

/// Bound query over fields.
pub type FieldQuery<'a> = MemberQuery<'a, FieldDef>;
/// Bound query over methods.
pub type MethodQuery<'a> = MemberQuery<'a, MethodDef>;

impl<'a, M: QueryTarget> MemberQuery<'a, M> {
    /// The underlying spec.
    pub fn spec(&self) -> &Arc<MemberFilter<M>> {
        &self.spec
    }

    /// Whether the spec is required when nested as a child.
    pub fn required(&self) -> bool {
        self.spec.required()
    }

    /// Test a candidate member against the spec.
    pub fn matches(&self, member: &M) -> bool {
        self.spec.matches(member)
    }

    /// The first match, scanning value-type groups in index order and
    /// declaration order within each group.
    pub fn find_first(&self) -> Option<M::Accessor<'a>> {
        let bound = self.bound;
        M::table(bound.index())
            .iter()
            .find(|member| self.spec.matches(member))
            .map(|member| M::wrap(Arc::clone(member), bound))
    }

    /// Every match across all groups, in the same deterministic order.
    pub fn find_all(&self) -> Vec<M::Accessor<'a>> {
        let bound = self.bound;
        M::table(bound.index())
            .iter()
            .filter(|member| self.spec.matches(member))
            .map(|member| M::wrap(Arc::clone(member), bound))
            .collect()
    }

    /// Copy the spec back into a fresh bound builder for incremental
    /// extension. The original spec is never mutated.
    pub fn to_builder(&self) -> BoundFilterBuilder<'a, M> {
        BoundFilterBuilder {
            bound: self.bound,
            inner: self.spec.to_builder(),
        }
    }
}

// ============================================================================
// Bound-instance query surface
// ============================================================================

/// Filter entry points on [`BoundInstance`].
pub trait BoundInstanceExt {
    /// Start a field filter over this instance's member index.
    fn fields(&self) -> FieldFilterBuilder<'_>;

    /// Start a method filter over this instance's member index.
    fn methods(&self) -> MethodFilterBuilder<'_>;
}

impl BoundInstanceExt for BoundInstance {
    fn fields(&self) -> FieldFilterBuilder<'_> {
        BoundFilterBuilder::new(self)
    }

    fn methods(&self) -> MethodFilterBuilder<'_> {
        BoundFilterBuilder::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_core::Modifiers;

    fn field(name: &str, modifiers: Modifiers) -> FieldDef {
        struct Dummy {
            v: i64,
        }
        FieldDef::accessor::<Dummy, i64>(name, modifiers, |d| d.v, |d, v| d.v = v)
    }

    #[test]
    fn leaf_predicates_are_conjunctive() {
        let spec = MemberFilter::<FieldDef>::builder()
            .require_name("health")
            .require_modifier(Modifiers::PUBLIC)
            .build();

        assert!(spec.matches(&field("health", Modifiers::PUBLIC)));
        assert!(!spec.matches(&field("health", Modifiers::PRIVATE)));
        assert!(!spec.matches(&field("mana", Modifiers::PUBLIC)));
    }

    #[test]
    fn required_children_participate() {
        let child = MemberFilter::<FieldDef>::builder()
            .required()
            .require_name("health")
            .build();
        let spec = MemberFilter::<FieldDef>::builder()
            .require_modifier(Modifiers::PUBLIC)
            .with(child)
            .build();

        assert!(spec.matches(&field("health", Modifiers::PUBLIC)));
        assert!(!spec.matches(&field("mana", Modifiers::PUBLIC)));
    }

    #[test]
    fn non_required_children_are_inert_but_retained() {
        let inert = MemberFilter::<FieldDef>::builder()
            .require_name("never_matches_anything")
            .build();
        let spec = MemberFilter::<FieldDef>::builder()
            .require_modifier(Modifiers::PUBLIC)
            .with(inert)
            .build();

        assert!(spec.matches(&field("mana", Modifiers::PUBLIC)));
        assert_eq!(spec.filters().count(), 2);
        assert!(
            spec.filters()
                .any(|part| matches!(part, FilterPart::Child(c) if !c.required()))
        );
    }

    #[test]
    fn to_builder_does_not_alias() {
        let original = MemberFilter::<FieldDef>::builder()
            .require_modifier(Modifiers::PUBLIC)
            .build();

        let extended = original.to_builder().require_name("health").build();

        assert!(original.matches(&field("mana", Modifiers::PUBLIC)));
        assert!(!extended.matches(&field("mana", Modifiers::PUBLIC)));
        assert_eq!(original.filters().count(), 1);
        assert_eq!(extended.filters().count(), 2);
    }

    #[test]
    fn required_flag_survives_to_builder() {
        let spec = MemberFilter::<FieldDef>::builder().required().build();
        assert!(spec.to_builder().build().required());
    }
}
