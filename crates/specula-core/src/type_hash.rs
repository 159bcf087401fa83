//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash identifying types,
//! members, and constructor signatures. Hashes are computed deterministically
//! from qualified names, so registration and lookup agree without a central
//! id allocator:
//!
//! - Same name = same hash, in any registration order
//! - Hashes can be computed before the type is registered
//! - One map lookup per resolution, no secondary name→id tables
//!
//! # Hash Computation
//!
//! XXH64 over the name bytes, combined with domain-separation constants so a
//! type, a field, a method, and a constructor sharing a name never collide.
//! Signature hashes mix parameter hashes with per-position markers, making
//! parameter order significant.
//!
//! # Examples
//!
//! ```
//! use specula_core::TypeHash;
//!
//! let a = TypeHash::from_name("game.Player");
//! let b = TypeHash::from_name("game.Player");
//! assert_eq!(a, b);
//!
//! let int = TypeHash::of::<i64>();
//! let float = TypeHash::of::<f64>();
//! assert_ne!(
//!     TypeHash::from_constructor(a, &[int, float]),
//!     TypeHash::from_constructor(a, &[float, int]),
//! );
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-separation constants for hash computation.
///
/// Each entity kind gets its own constant so equal names in different
/// domains produce distinct hashes.
pub mod hash_constants {
    /// Mixing multiplier for signature components.
    pub const SEP: u64 = 0x4bc9_4d6b_d060_53ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac_10b6_3a6c_c57c;

    /// Domain marker for field member hashes.
    pub const FIELD: u64 = 0x5ea7_7ffb_cdf5_f302;

    /// Domain marker for method member hashes.
    pub const METHOD: u64 = 0x7d3c_8b4a_92e1_5f6d;

    /// Domain marker for constructor signature hashes.
    pub const CONSTRUCTOR: u64 = 0x9a7f_3d5e_2b8c_4601;

    /// Parameter position mixing constants.
    /// Each position gets a unique constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e37_79b9_7f4a_7c15,
        0xbf58_476d_1ce4_e5b9,
        0x94d0_49bb_1331_11eb,
        0xd6e8_feb8_6659_fd93,
        0xe703_7ed1_a0b4_28db,
        0xc6a4_a793_5bd1_e995,
        0x8648_dbbc_94d4_9b8d,
        0xa2b4_8b2c_69e0_d657,
        0x7c3e_9f2a_5b8d_1403,
        0x5d8c_7b4a_3e9f_2106,
        0x3f1e_9d8c_7b5a_4203,
        0x1a2b_3c4d_5e6f_7089,
        0x9f8e_7d6c_5b4a_3210,
        0x2468_ace0_1357_9bdf,
        0xfdb9_7531_eca8_6420,
        0x1234_5678_9abc_def0,
    ];
}

/// A deterministic 64-bit hash identifying a type, member, or signature.
///
/// Computed from the qualified name (for types and members) or from an owner
/// plus parameter hashes (for constructor signatures). The same input always
/// produces the same hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    ///
    /// # Examples
    ///
    /// ```
    /// use specula_core::TypeHash;
    ///
    /// assert_eq!(TypeHash::from_name("i64"), TypeHash::from_name("i64"));
    /// assert_ne!(TypeHash::from_name("i64"), TypeHash::from_name("f64"));
    /// ```
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a type hash for a Rust type, derived from its type name.
    ///
    /// Registration and filtering both use this, so a field registered with
    /// value type `i64` matches `require_value_type(TypeHash::of::<i64>())`
    /// without further coordination.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_name(std::any::type_name::<T>())
    }

    /// Create a field member hash from its owner type and name.
    #[inline]
    pub fn from_field(owner: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ owner.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method member hash from its owner type, name, and parameter
    /// type hashes.
    ///
    /// Parameter order matters: `(i64, f64)` and `(f64, i64)` hash apart.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix_params(seed, param_hashes))
    }

    /// Create a constructor signature hash from the owner type and parameter
    /// type hashes.
    ///
    /// Constructors have no name; they are identified by owner + parameters.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_hashes: &[TypeHash]) -> Self {
        let seed = hash_constants::CONSTRUCTOR ^ owner.0;
        TypeHash(mix_params(seed, param_hashes))
    }

    /// Check if this is the empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Fold parameter hashes into a seed, position-sensitively.
///
/// `wrapping_mul` keeps the fold non-commutative; XOR alone would make
/// `(a, b)` and `(b, a)` collide.
fn mix_params(seed: u64, param_hashes: &[TypeHash]) -> u64 {
    let mut hash = seed;
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash(0x{:016x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_deterministic() {
        assert_eq!(TypeHash::from_name("game.Player"), TypeHash::from_name("game.Player"));
        assert_ne!(TypeHash::from_name("game.Player"), TypeHash::from_name("game.Npc"));
    }

    #[test]
    fn of_matches_type_name() {
        assert_eq!(
            TypeHash::of::<i64>(),
            TypeHash::from_name(std::any::type_name::<i64>())
        );
        assert_ne!(TypeHash::of::<i64>(), TypeHash::of::<u64>());
    }

    #[test]
    fn domains_do_not_collide() {
        let owner = TypeHash::from_name("Player");
        assert_ne!(TypeHash::from_field(owner, "x"), TypeHash::from_method(owner, "x", &[]));
        assert_ne!(TypeHash::from_name("x"), TypeHash::from_field(owner, "x"));
    }

    #[test]
    fn constructor_signature_order_matters() {
        let owner = TypeHash::from_name("Player");
        let int = TypeHash::of::<i64>();
        let float = TypeHash::of::<f64>();

        assert_ne!(
            TypeHash::from_constructor(owner, &[int, float]),
            TypeHash::from_constructor(owner, &[float, int]),
        );
        assert_ne!(
            TypeHash::from_constructor(owner, &[int]),
            TypeHash::from_constructor(owner, &[int, int]),
        );
    }

    #[test]
    fn signature_mixing_handles_many_params() {
        let owner = TypeHash::from_name("Wide");
        let int = TypeHash::of::<i64>();
        let many: Vec<TypeHash> = std::iter::repeat(int).take(24).collect();
        let fewer: Vec<TypeHash> = std::iter::repeat(int).take(23).collect();

        assert_ne!(
            TypeHash::from_constructor(owner, &many),
            TypeHash::from_constructor(owner, &fewer),
        );
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(format!("{}", TypeHash(0xabcd)), "0x000000000000abcd");
    }
}
