use std::borrow::Cow;

use voxen_core::constants::CHUNK_VOLUME;
use voxen_core::Voxel;

use crate::error::NetError;
use crate::format::{CHUNK_DATA_SIZE, FILL_SIZE};

/// Voxel storage as little-endian bytes.
fn voxel_bytes(voxels: &[Voxel]) -> Cow<'_, [u8]> {
    if cfg!(target_endian = "little") {
        Cow::Borrowed(bytemuck::cast_slice(voxels))
    } else {
        Cow::Owned(voxels.iter().flat_map(|v| v.to_le_bytes()).collect())
    }
}

/// Compress a chunk's voxels using LZ4 (size-prepended).
pub fn compress_voxels(voxels: &[Voxel]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(&voxel_bytes(voxels))
}

/// Decompress an LZ4 block, validating the output size.
pub fn decompress_voxels(compressed: &[u8]) -> Result<Vec<Voxel>, NetError> {
    let decompressed = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| NetError::Decompress(e.to_string()))?;

    if decompressed.len() != CHUNK_DATA_SIZE {
        return Err(NetError::InvalidChunkSize {
            expected: CHUNK_DATA_SIZE,
            actual: decompressed.len(),
        });
    }

    Ok(decompressed
        .chunks_exact(4)
        .map(|b| Voxel::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// The single voxel value a chunk is filled with, if it is uniform.
pub fn detect_fill(voxels: &[Voxel]) -> Option<Voxel> {
    let (&first, rest) = voxels.split_first()?;
    rest.iter().all(|&v| v == first).then_some(first)
}

pub fn encode_fill(voxel: Voxel) -> [u8; FILL_SIZE] {
    voxel.to_le_bytes()
}

/// Expand a fill body back to a full chunk.
pub fn expand_fill(data: &[u8]) -> Result<Vec<Voxel>, NetError> {
    let bytes: [u8; FILL_SIZE] = data
        .try_into()
        .map_err(|_| NetError::InvalidFill(data.len()))?;
    Ok(vec![Voxel::from_le_bytes(bytes); CHUNK_VOLUME])
}
