//! Integration tests for registration, resolution, and the registry caches.

use std::sync::Arc;

use specula::prelude::*;

struct Entity {
    id: i64,
    tag: i64,
}

struct Mob {
    speed: f64,
}

fn base_entry() -> TypeEntry {
    TypeEntry::of::<Entity>("game.Entity")
        .with_field(FieldDef::accessor::<Entity, i64>(
            "id",
            Modifiers::PUBLIC,
            |e| e.id,
            |e, v| e.id = v,
        ))
        .with_field(FieldDef::read_only::<Entity, i64>(
            "tag",
            Modifiers::PUBLIC | Modifiers::STATIC,
            |e| e.tag,
        ))
}

fn mob_entry() -> TypeEntry {
    TypeEntry::of::<Mob>("game.Mob")
        .with_base(TypeHash::from_name("game.Entity"))
        .with_field(FieldDef::accessor::<Mob, f64>(
            "speed",
            Modifiers::PUBLIC,
            |m| m.speed,
            |m, v| m.speed = v,
        ))
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(base_entry().with_alias("game.legacy.Entity"))
        .unwrap();
    registry.register(mob_entry()).unwrap();
    registry
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn resolve_returns_the_first_candidate_that_exists() {
    let registry = registry();

    let entry = registry
        .resolve(&["game.Missing", "game.Mob", "game.Entity"])
        .unwrap();
    assert_eq!(entry.qualified_name(), "game.Mob");
}

#[test]
fn resolve_finds_aliases() {
    let registry = registry();

    let entry = registry.resolve(&["game.legacy.Entity"]).unwrap();
    assert_eq!(entry.qualified_name(), "game.Entity");
}

#[test]
fn unresolvable_names_fail_listing_every_candidate() {
    let registry = registry();

    let err = registry
        .resolve(&["does.not.Exist", "also.not.Here"])
        .unwrap_err();
    let LookupError::TypeNotFound { attempted } = &err else {
        panic!("expected TypeNotFound, got {err:?}");
    };
    assert_eq!(attempted, &["does.not.Exist", "also.not.Here"]);
    assert!(err.to_string().contains("does.not.Exist"));
    assert!(err.to_string().contains("also.not.Here"));
}

#[test]
fn repeated_resolution_skips_live_lookups() {
    let registry = registry();

    registry.resolve(&["game.Mob"]).unwrap();
    let after_first = registry.live_lookups();

    for _ in 0..10 {
        registry.resolve(&["game.Mob"]).unwrap();
    }
    assert_eq!(registry.live_lookups(), after_first);
}

// =============================================================================
// Member index cache
// =============================================================================

#[test]
fn index_is_constructed_at_most_once_per_type() {
    let registry = registry();

    for _ in 0..5 {
        registry
            .bind(Entity { id: 1, tag: 7 })
            .unwrap();
    }
    assert_eq!(registry.indexes_built(), 1);

    registry.bind(Mob { speed: 0.25 }).unwrap();
    assert_eq!(registry.indexes_built(), 2);
}

#[test]
fn bound_instances_of_one_type_share_the_index() {
    let registry = registry();

    let a = registry.bind(Entity { id: 1, tag: 0 }).unwrap();
    let b = registry.bind(Entity { id: 2, tag: 0 }).unwrap();
    assert!(Arc::ptr_eq(a.index(), b.index()));
}

#[test]
fn binding_an_unregistered_type_fails() {
    let registry = registry();

    struct Unregistered;
    let err = registry.bind(Unregistered).unwrap_err();
    assert!(matches!(err, LookupError::TypeNotFound { .. }));
}

#[test]
fn concurrent_index_population_retains_one_snapshot() {
    let registry = Arc::new(registry());
    let entry = registry.resolve(&["game.Entity"]).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let entry = entry.clone();
            scope.spawn(move || registry.index_of(&entry));
        }
    });

    assert_eq!(registry.indexes_built(), 1);
}

// =============================================================================
// Exact-type index vs. walking lookup
// =============================================================================

#[test]
fn index_does_not_walk_the_base_chain() {
    let registry = registry();
    let mob = registry.bind(Mob { speed: 0.5 }).unwrap();

    // `id` is declared on the base type; the exact-type index ignores it.
    assert!(mob.fields().require_name("id").build().find_first().is_none());
}

#[test]
fn walking_lookup_ascends_to_the_base_type() {
    let registry = registry();
    let mob_hash = TypeHash::from_name("game.Mob");

    let id = registry.find_field_walking(mob_hash, "id", false).unwrap();
    assert_eq!(id.name(), "id");
    assert_eq!(id.value_type(), TypeHash::of::<i64>());
}

#[test]
fn walking_lookup_skips_static_fields_unless_allowed() {
    let registry = registry();
    let mob_hash = TypeHash::from_name("game.Mob");

    assert!(registry.find_field_walking(mob_hash, "tag", false).is_none());
    assert!(registry.find_field_walking(mob_hash, "tag", true).is_some());
}
