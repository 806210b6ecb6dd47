//! Namespaced 64-bit entity identifiers
//!
//! The top bits partition the id space so ids built by different
//! constructors can never collide:
//!
//! ```text
//! 0x00000000_00000000  null entity
//! 0x01000000_00000000  root entity
//! 0x02000000_xxxxxxxx  string id   (x = 32-bit FNV-1a of the name)
//! 0x03000000_xxxxxxxx  numeric id  (x = user value)
//! 0x1xxxxxxx_xxxxxxxx  generated id (x = process-wide counter)
//! ```
//!
//! Generated ids come from one atomic counter initialized at process start
//! and never reset. At a million ids per millisecond it would take centuries
//! to run out of the 60-bit space, so wrapping is not handled.
//!
//! Two different names may hash to the same string id. That is not detected
//! here; registering both into one registry fails with a duplicate error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const ROOT_BITS: u64 = 0x0100_0000_0000_0000;
const NAME_TAG: u64 = 0x0200_0000_0000_0000;
const NUMBER_TAG: u64 = 0x0300_0000_0000_0000;
const GENERATED_BASE: u64 = 0x1000_0000_0000_0000;
const PAYLOAD_MASK: u64 = 0xFFFF_FFFF;

static NEXT_GENERATED: AtomicU64 = AtomicU64::new(GENERATED_BASE);

/// Which constructor an id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdNamespace {
    Null,
    Root,
    Name,
    Number,
    Generated,
    /// Bits that no constructor produces (only reachable via `from_bits`).
    Foreign,
}

/// Stable identity of an entity inside a [`Registry`](super::Registry).
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    pub const NULL: Self = Self(0);
    pub const ROOT: Self = Self(ROOT_BITS);

    /// Name an entity by string.
    pub const fn from_name(name: &str) -> Self {
        Self(fnv1a(name.as_bytes()) as u64 | NAME_TAG)
    }

    /// Name an entity by number.
    pub const fn from_number(value: u32) -> Self {
        Self(value as u64 | NUMBER_TAG)
    }

    /// Allocate a fresh id, distinct from every id generated before it.
    pub(crate) fn generate() -> Self {
        Self(NEXT_GENERATED.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn namespace(self) -> IdNamespace {
        match self.0 {
            0 => IdNamespace::Null,
            ROOT_BITS => IdNamespace::Root,
            bits if bits & !PAYLOAD_MASK == NAME_TAG => IdNamespace::Name,
            bits if bits & !PAYLOAD_MASK == NUMBER_TAG => IdNamespace::Number,
            bits if bits >> 60 == 0x1 => IdNamespace::Generated,
            _ => IdNamespace::Foreign,
        }
    }

    /// Serialize to 64-bit integer (for networking/save files)
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Deserialize from 64-bit integer
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<&str> for EntityId {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<u32> for EntityId {
    fn from(value: u32) -> Self {
        Self::from_number(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// 32-bit FNV-1a.
const fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = 0x811c_9dc5u32;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(0x0100_0193);
        i += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_are_stable() {
        assert_eq!(EntityId::from("foo"), EntityId::from("foo"));
        assert_ne!(EntityId::from("foo"), EntityId::from("bar"));

        const PLAYER: EntityId = EntityId::from_name("player");
        assert_eq!(PLAYER, EntityId::from("player"));
    }

    #[test]
    fn fnv1a_matches_reference_values() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
        assert_eq!(EntityId::from("a").to_bits(), 0x0200_0000_e40c_292c);
    }

    #[test]
    fn namespaces_keep_equal_payloads_apart() {
        let numeric = EntityId::from(5u32);
        let named = EntityId::from("5");

        assert_ne!(numeric, named);
        assert_eq!(numeric.to_bits() & PAYLOAD_MASK, 5);
        assert_eq!(numeric.namespace(), IdNamespace::Number);
        assert_eq!(named.namespace(), IdNamespace::Name);
    }

    #[test]
    fn default_is_null() {
        let id = EntityId::default();
        assert!(id.is_null());
        assert_eq!(id, EntityId::NULL);
        assert_eq!(id.namespace(), IdNamespace::Null);
        assert_eq!(EntityId::ROOT.namespace(), IdNamespace::Root);
    }

    #[test]
    fn generated_ids_are_unique_and_increasing() {
        let a = EntityId::generate();
        let b = EntityId::generate();

        assert!(b > a);
        assert_eq!(a.namespace(), IdNamespace::Generated);
        assert_eq!(b.namespace(), IdNamespace::Generated);
        assert!(a > EntityId::from(u32::MAX));
    }

    #[test]
    fn ordering_follows_bits() {
        let mut ids = vec![EntityId::from(3u32), EntityId::ROOT, EntityId::NULL];
        ids.sort();
        assert_eq!(ids, vec![EntityId::NULL, EntityId::ROOT, EntityId::from(3u32)]);
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = EntityId::from(7u32);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, (0x0300_0000_0000_0007u64).to_string());
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "0x0300000000000007");
    }
}
