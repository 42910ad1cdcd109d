use voxen_core::constants::BYTES_PER_CHUNK;

use crate::error::NetError;

/// Magic bytes opening every packet.
pub const MAGIC: [u8; 4] = *b"VXN1";

/// Size of the packet header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Encoded size of a coordinate (3 x i32 LE).
pub const COORD_SIZE: usize = 12;

/// Delta body: voxel coordinate plus the new voxel value.
pub const DELTA_BODY_SIZE: usize = COORD_SIZE + 4;

/// Fill body size after the coordinate: a single voxel value.
pub const FILL_SIZE: usize = 4;

/// Snapshot body holds a single repeated voxel instead of LZ4 data.
pub const FLAG_FILL: u8 = 0x01;

/// Expected decompressed snapshot size in bytes.
pub const CHUNK_DATA_SIZE: usize = BYTES_PER_CHUNK;

/// Packet kinds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketKind {
    Snapshot = 1,
    Delta = 2,
}

impl PacketKind {
    pub fn from_u8(kind: u8) -> Result<Self, NetError> {
        match kind {
            1 => Ok(PacketKind::Snapshot),
            2 => Ok(PacketKind::Delta),
            other => Err(NetError::UnknownKind(other)),
        }
    }
}

/// Packet header. Fixed 16 bytes, repr(C) for byte-level serialization.
/// Multi-byte fields are little-endian on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PacketHeader {
    pub magic: [u8; 4],
    pub kind: u8,
    pub flags: u8,
    pub _reserved0: u16,
    /// Body length in bytes, little-endian.
    pub length: u32,
    pub _reserved1: u32,
}

impl PacketHeader {
    pub fn new(kind: PacketKind, flags: u8, body_len: usize) -> Self {
        Self {
            magic: MAGIC,
            kind: kind as u8,
            flags,
            _reserved0: 0,
            length: (body_len as u32).to_le(),
            _reserved1: 0,
        }
    }

    pub fn body_len(&self) -> usize {
        u32::from_le(self.length) as usize
    }

    /// Read a header from the front of `bytes` (no alignment requirement).
    pub fn read(bytes: &[u8]) -> Result<Self, NetError> {
        if bytes.len() < HEADER_SIZE {
            return Err(NetError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        let header: PacketHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
        if header.magic != MAGIC {
            return Err(NetError::InvalidMagic);
        }
        Ok(header)
    }
}
