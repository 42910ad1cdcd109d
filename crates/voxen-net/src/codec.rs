use glam::IVec3;
use voxen_core::Voxel;

use crate::compress;
use crate::error::NetError;
use crate::format::*;
use crate::payload::{ChunkSnapshot, Payload, VoxelDelta};

/// Encode a payload into one packet.
pub fn encode(payload: &Payload) -> Vec<u8> {
    let (kind, flags, body) = match payload {
        Payload::Snapshot(snapshot) => {
            let mut body = Vec::new();
            write_coord(&mut body, snapshot.coord);
            let flags = match compress::detect_fill(&snapshot.voxels) {
                Some(voxel) => {
                    body.extend_from_slice(&compress::encode_fill(voxel));
                    FLAG_FILL
                }
                None => {
                    body.extend_from_slice(&compress::compress_voxels(&snapshot.voxels));
                    0
                }
            };
            (PacketKind::Snapshot, flags, body)
        }
        Payload::Delta(delta) => {
            let mut body = Vec::with_capacity(DELTA_BODY_SIZE);
            write_coord(&mut body, delta.vpos);
            body.extend_from_slice(&delta.voxel.to_le_bytes());
            (PacketKind::Delta, 0, body)
        }
    };

    let header = PacketHeader::new(kind, flags, body.len());
    let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(&body);
    bytes
}

/// Decode one packet, validating header, length and voxel count.
pub fn decode(bytes: &[u8]) -> Result<Payload, NetError> {
    let header = PacketHeader::read(bytes)?;
    let kind = PacketKind::from_u8(header.kind)?;

    let expected = HEADER_SIZE + header.body_len();
    if bytes.len() < expected {
        return Err(NetError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        return Err(NetError::TrailingBytes(bytes.len() - expected));
    }
    let body = &bytes[HEADER_SIZE..];

    match kind {
        PacketKind::Snapshot => {
            let coord = read_coord(body)?;
            let data = &body[COORD_SIZE..];
            let voxels = if header.flags & FLAG_FILL != 0 {
                compress::expand_fill(data)?
            } else {
                compress::decompress_voxels(data)?
            };
            Ok(Payload::Snapshot(ChunkSnapshot { coord, voxels }))
        }
        PacketKind::Delta => {
            if body.len() != DELTA_BODY_SIZE {
                return Err(NetError::Truncated {
                    expected: HEADER_SIZE + DELTA_BODY_SIZE,
                    actual: bytes.len(),
                });
            }
            let vpos = read_coord(body)?;
            let voxel = Voxel::from_le_bytes([body[12], body[13], body[14], body[15]]);
            Ok(Payload::Delta(VoxelDelta { vpos, voxel }))
        }
    }
}

fn write_coord(buf: &mut Vec<u8>, coord: IVec3) {
    for axis in coord.to_array() {
        buf.extend_from_slice(&axis.to_le_bytes());
    }
}

fn read_coord(body: &[u8]) -> Result<IVec3, NetError> {
    if body.len() < COORD_SIZE {
        return Err(NetError::Truncated {
            expected: HEADER_SIZE + COORD_SIZE,
            actual: HEADER_SIZE + body.len(),
        });
    }
    let axis = |i: usize| i32::from_le_bytes([body[i], body[i + 1], body[i + 2], body[i + 3]]);
    Ok(IVec3::new(axis(0), axis(4), axis(8)))
}
