//! Stable hashing for integer grid coordinates.
//!
//! Each axis is multiplied by its own large odd constant and XOR-combined,
//! then passed through a fixed finalizer so the high bits are populated.
//! No per-process seed: the same coordinate hashes identically in every run.

use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};

use glam::{IVec2, IVec3};

use crate::constants::HASH_PRIMES;

/// Hasher fed one `i32` per axis (glam vectors hash field by field).
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordHasher {
    state: u64,
    axis: usize,
}

impl Hasher for CoordHasher {
    fn finish(&self) -> u64 {
        let mut h = self.state;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h
    }

    fn write_i32(&mut self, value: i32) {
        let prime = HASH_PRIMES[self.axis % HASH_PRIMES.len()];
        self.state ^= (value as u32 as u64).wrapping_mul(prime);
        self.axis += 1;
    }

    fn write(&mut self, bytes: &[u8]) {
        for word in bytes.chunks(4) {
            let mut buf = [0u8; 4];
            buf[..word.len()].copy_from_slice(word);
            self.write_i32(i32::from_le_bytes(buf));
        }
    }
}

pub type CoordBuildHasher = BuildHasherDefault<CoordHasher>;

/// Map keyed by an integer coordinate with stable hashing.
pub type CoordMap<K, V> = HashMap<K, V, CoordBuildHasher>;

/// Set of integer coordinates with stable hashing.
pub type CoordSet<K> = HashSet<K, CoordBuildHasher>;

/// Stable hash of a 3D coordinate.
pub fn hash_coord(coord: IVec3) -> u64 {
    let mut hasher = CoordHasher::default();
    hasher.write_i32(coord.x);
    hasher.write_i32(coord.y);
    hasher.write_i32(coord.z);
    hasher.finish()
}

/// Stable hash of a 2D coordinate (column keys, heightmaps).
pub fn hash_coord2(coord: IVec2) -> u64 {
    let mut hasher = CoordHasher::default();
    hasher.write_i32(coord.x);
    hasher.write_i32(coord.y);
    hasher.finish()
}
