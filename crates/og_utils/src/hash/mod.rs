//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] with a fixed-seed hasher.
///
/// Iteration order only depends on the inserted keys, which keeps
/// every diagnostic that lists map contents reproducible.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] with a fixed-seed hasher.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A map for keys that are already well distributed integers.
pub type IdMap<K, V> = hashbrown::HashMap<K, V, NoOpHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
