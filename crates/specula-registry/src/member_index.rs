//! Per-type member indexes grouped by value type.
//!
//! A [`MemberIndex`] is an immutable snapshot of one type's declared
//! members: fields grouped by their declared type, methods grouped by their
//! declared return type. Grouping by value type lets a filter require a
//! specific member type as a cheap pre-narrowing step before running
//! arbitrary predicates.
//!
//! The index covers the exact type only - it never walks base types. Callers
//! that need inherited members request each type along the hierarchy
//! explicitly (or use the registry's name-based walking lookup, which is a
//! different tool for a different job).

use std::sync::Arc;

use rustc_hash::FxHashMap;
use specula_core::{FieldDef, Member, MethodDef, TypeEntry, TypeHash};

/// Ordered value-type grouping of one member kind.
///
/// Group iteration order is the order in which value types first appear in
/// the declaration sequence; members within a group keep declaration order.
/// Both orders are deterministic, so `find_first`/`find_all` scans are
/// reproducible.
#[derive(Debug)]
pub struct MemberTable<M> {
    groups: FxHashMap<TypeHash, Vec<Arc<M>>>,
    order: Vec<TypeHash>,
}

impl<M: Member> MemberTable<M> {
    fn new() -> Self {
        Self {
            groups: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, member: Arc<M>) {
        let key = member.value_type();
        let group = self.groups.entry(key).or_insert_with(|| {
            self.order.push(key);
            Vec::new()
        });
        group.push(member);
    }

    /// Members of one value-type group, in declaration order.
    pub fn group(&self, value_type: TypeHash) -> &[Arc<M>] {
        self.groups.get(&value_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Value-type group keys, in first-declaration order.
    pub fn group_order(&self) -> &[TypeHash] {
        &self.order
    }

    /// All members: groups in first-declaration order, declaration order
    /// within each group.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<M>> {
        self.order
            .iter()
            .flat_map(|key| self.groups.get(key).into_iter().flatten())
    }

    /// Total member count across all groups.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Check if the table holds no members.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct value-type groups.
    pub fn group_count(&self) -> usize {
        self.order.len()
    }
}

/// Immutable per-type member snapshot.
///
/// Built once per type by the registry, then shared by every bound instance
/// of that type. Never invalidated: registered types are frozen for the
/// registry's lifetime.
#[derive(Debug)]
pub struct MemberIndex {
    fields: MemberTable<FieldDef>,
    methods: MemberTable<MethodDef>,
}

impl MemberIndex {
    /// Build the index for a type entry.
    pub fn build(entry: &TypeEntry) -> Self {
        let mut fields = MemberTable::new();
        for field in entry.fields() {
            fields.insert(field.clone());
        }
        let mut methods = MemberTable::new();
        for method in entry.methods() {
            methods.insert(method.clone());
        }
        Self { fields, methods }
    }

    /// Declared fields, grouped by field type.
    pub fn fields(&self) -> &MemberTable<FieldDef> {
        &self.fields
    }

    /// Declared methods, grouped by return type.
    pub fn methods(&self) -> &MemberTable<MethodDef> {
        &self.methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specula_core::{FieldDef, MethodDef, Modifiers};

    struct Npc {
        x: f64,
        y: f64,
        name: String,
        ticks: i64,
    }

    fn npc_entry() -> TypeEntry {
        TypeEntry::of::<Npc>("game.Npc")
            .with_field(FieldDef::accessor::<Npc, f64>(
                "x",
                Modifiers::PUBLIC,
                |n| n.x,
                |n, v| n.x = v,
            ))
            .with_field(FieldDef::accessor::<Npc, String>(
                "name",
                Modifiers::PUBLIC,
                |n| n.name.clone(),
                |n, v| n.name = v,
            ))
            .with_field(FieldDef::accessor::<Npc, f64>(
                "y",
                Modifiers::PUBLIC,
                |n| n.y,
                |n, v| n.y = v,
            ))
            .with_method(MethodDef::nullary::<Npc, i64>(
                "tick",
                Modifiers::PUBLIC,
                |n| {
                    n.ticks += 1;
                    n.ticks
                },
            ))
    }

    #[test]
    fn fields_group_by_declared_type_in_order() {
        let index = MemberIndex::build(&npc_entry());

        let floats = index.fields().group(TypeHash::of::<f64>());
        let names: Vec<&str> = floats.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["x", "y"]);

        let strings = index.fields().group(TypeHash::of::<String>());
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].name(), "name");
    }

    #[test]
    fn group_order_is_first_declaration_order() {
        let index = MemberIndex::build(&npc_entry());
        assert_eq!(
            index.fields().group_order(),
            &[TypeHash::of::<f64>(), TypeHash::of::<String>()]
        );
    }

    #[test]
    fn iter_walks_groups_then_declarations() {
        let index = MemberIndex::build(&npc_entry());
        let names: Vec<&str> = index.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["x", "y", "name"]);
    }

    #[test]
    fn methods_group_by_return_type() {
        let index = MemberIndex::build(&npc_entry());
        assert_eq!(index.methods().group(TypeHash::of::<i64>()).len(), 1);
        assert!(index.methods().group(TypeHash::of::<String>()).is_empty());
    }

    #[test]
    fn empty_group_lookup_is_empty_slice() {
        let index = MemberIndex::build(&npc_entry());
        assert!(index.fields().group(TypeHash::of::<bool>()).is_empty());
        assert_eq!(index.fields().len(), 3);
        assert_eq!(index.fields().group_count(), 2);
    }
}
