//! Single source of truth for shared constants.
//! Client and server must agree on every value here; the wire format
//! in `voxen-net` depends on `CHUNK_SIZE` and the voxel width.

use crate::types::Voxel;

/// Side length of a chunk in voxels.
pub const CHUNK_SIZE: i32 = 32;

/// `CHUNK_SIZE` as a float, for world-space offset math.
pub const CHUNK_SIZE_F: f32 = CHUNK_SIZE as f32;

/// Voxels in one horizontal slice of a chunk (32^2).
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Total voxels per chunk (32^3).
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_SIZE as usize;

/// Bytes per voxel in storage and on the wire.
pub const VOXEL_BYTES: usize = std::mem::size_of::<Voxel>();

/// Total bytes of raw voxel data per chunk.
pub const BYTES_PER_CHUNK: usize = CHUNK_VOLUME * VOXEL_BYTES;

/// Empty space. Unloaded chunks read as all NULL_VOXEL.
pub const NULL_VOXEL: Voxel = 0;

/// Reserved sentinel. Never stored in a chunk.
pub const VOXEL_MAX: Voxel = Voxel::MAX;

/// Stable hash multipliers for integer coordinates, one per axis.
pub const HASH_PRIMES: [u64; 3] = [73_856_093, 19_349_663, 83_492_791];
