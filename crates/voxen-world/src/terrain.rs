use voxen_core::constants::{CHUNK_SIZE, CHUNK_VOLUME, NULL_VOXEL};
use voxen_core::math::local_to_index;
use voxen_core::{ChunkCoord, Voxel};

use glam::IVec3;

/// Pluggable producer of voxel data per chunk coordinate.
///
/// Must return exactly `CHUNK_VOLUME` voxels in local index order.
pub trait ChunkGenerator: Send {
    fn generate(&self, coord: ChunkCoord) -> Vec<Voxel>;
}

// Voxel ids produced by the default generator.
pub const STONE: Voxel = 1;
pub const DIRT: Voxel = 2;
pub const GRASS: Voxel = 3;
pub const SAND: Voxel = 4;
pub const WATER: Voxel = 5;

/// Sea level in voxel-space Y.
const SEA_LEVEL: i32 = 0;

/// Depth of the dirt layer under the surface voxel.
const SOIL_DEPTH: i32 = 3;

/// Highest surface the noise can produce (base + sum of octave amplitudes).
const MAX_SURFACE: i32 = SEA_LEVEL + 4 + 14;

/// Heightmap terrain from seeded 2D simplex noise.
pub struct TerrainGenerator {
    /// Permutation table for simplex noise (doubled for wrapping).
    perm: [u8; 512],
}

impl ChunkGenerator for TerrainGenerator {
    fn generate(&self, coord: ChunkCoord) -> Vec<Voxel> {
        self.generate_chunk(coord)
    }
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        let perm = Self::build_permutation(seed);
        Self { perm }
    }

    /// Generate voxel data for a chunk.
    ///
    /// Terrain layers:
    /// - Stone below the soil
    /// - Dirt for SOIL_DEPTH voxels under the surface
    /// - Grass on the surface above sea level, sand at or below it
    /// - Water from the surface up to SEA_LEVEL
    /// - Air above terrain and water
    pub fn generate_chunk(&self, coord: ChunkCoord) -> Vec<Voxel> {
        let mut data = vec![NULL_VOXEL; CHUNK_VOLUME];
        let base = coord * CHUNK_SIZE;

        if base.y > MAX_SURFACE.max(SEA_LEVEL) {
            return data;
        }

        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let height = self.terrain_height(base.x + lx, base.z + lz);

                for ly in 0..CHUNK_SIZE {
                    let wy = base.y + ly;
                    let voxel = Self::layer_at(wy, height);
                    if voxel != NULL_VOXEL {
                        data[local_to_index(IVec3::new(lx, ly, lz))] = voxel;
                    }
                }
            }
        }

        data
    }

    fn layer_at(wy: i32, height: i32) -> Voxel {
        if wy < height - SOIL_DEPTH {
            STONE
        } else if wy < height {
            DIRT
        } else if wy == height {
            if height > SEA_LEVEL {
                GRASS
            } else {
                SAND
            }
        } else if wy <= SEA_LEVEL {
            WATER
        } else {
            NULL_VOXEL
        }
    }

    /// Surface height at a voxel-space (x, z) column using 3-octave simplex noise.
    pub fn terrain_height(&self, wx: i32, wz: i32) -> i32 {
        let x = wx as f64;
        let z = wz as f64;

        let scale = 0.02;
        let mut h = 0.0f64;
        h += self.simplex2d(x * scale, z * scale) * 8.0;
        h += self.simplex2d(x * scale * 2.0 + 100.0, z * scale * 2.0 + 100.0) * 4.0;
        h += self.simplex2d(x * scale * 4.0 + 200.0, z * scale * 4.0 + 200.0) * 2.0;

        let base_height = SEA_LEVEL as f64 + 4.0 + h;
        base_height.round() as i32
    }

    /// 2D simplex noise. Returns value in [-1, 1].
    fn simplex2d(&self, x: f64, z: f64) -> f64 {
        const F2: f64 = 0.5 * (1.732_050_807_568_877_2 - 1.0); // (sqrt(3)-1)/2
        const G2: f64 = (3.0 - 1.732_050_807_568_877_2) / 6.0; // (3-sqrt(3))/6

        let s = (x + z) * F2;
        let i = (x + s).floor();
        let j = (z + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = z - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let gi0 = self.perm[ii + self.perm[jj] as usize] as usize % 12;
        let gi1 = self.perm[ii + i1 + self.perm[jj + j1] as usize] as usize % 12;
        let gi2 = self.perm[ii + 1 + self.perm[jj + 1] as usize] as usize % 12;

        let n0 = Self::corner_contribution(gi0, x0, y0);
        let n1 = Self::corner_contribution(gi1, x1, y1);
        let n2 = Self::corner_contribution(gi2, x2, y2);

        70.0 * (n0 + n1 + n2)
    }

    fn corner_contribution(gi: usize, x: f64, y: f64) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let t = t * t;
            t * t * Self::grad2d(gi, x, y)
        }
    }

    fn grad2d(hash: usize, x: f64, y: f64) -> f64 {
        const GRAD: [[f64; 2]; 12] = [
            [1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
            [1.0, 0.0],
            [-1.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
        ];
        let g = &GRAD[hash % 12];
        g[0] * x + g[1] * y
    }

    fn build_permutation(seed: u64) -> [u8; 512] {
        let mut p: [u8; 256] = [0; 256];
        for (i, val) in p.iter_mut().enumerate() {
            *val = i as u8;
        }

        // Fisher-Yates shuffle driven by a 64-bit LCG
        let mut rng = seed;
        for i in (1..256).rev() {
            rng = rng
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let j = (rng >> 33) as usize % (i + 1);
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        for (i, val) in perm.iter_mut().enumerate() {
            *val = p[i & 255];
        }
        perm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terrain_deterministic() {
        let gen = TerrainGenerator::new(42);
        let coord = IVec3::new(0, 0, 0);
        assert_eq!(
            gen.generate_chunk(coord),
            gen.generate_chunk(coord),
            "terrain generation must be deterministic"
        );
    }

    #[test]
    fn test_seeds_differ() {
        let a = TerrainGenerator::new(1);
        let b = TerrainGenerator::new(2);
        let differs = (0..64).any(|x| a.terrain_height(x * 7, x * 3) != b.terrain_height(x * 7, x * 3));
        assert!(differs, "different seeds should shape different terrain");
    }

    #[test]
    fn test_terrain_chunk_size() {
        let gen = TerrainGenerator::new(42);
        assert_eq!(gen.generate(IVec3::new(0, -1, 0)).len(), CHUNK_VOLUME);
    }

    #[test]
    fn test_deep_chunk_is_solid_stone() {
        let gen = TerrainGenerator::new(42);
        let data = gen.generate_chunk(IVec3::new(3, -4, -2));
        assert!(data.iter().all(|&v| v == STONE));
    }

    #[test]
    fn test_high_chunk_is_air() {
        let gen = TerrainGenerator::new(42);
        let data = gen.generate_chunk(IVec3::new(0, 2, 0));
        assert!(data.iter().all(|&v| v == NULL_VOXEL));
    }

    #[test]
    fn test_surface_chunks_have_layers() {
        let gen = TerrainGenerator::new(42);
        let below = gen.generate_chunk(IVec3::new(0, -1, 0));
        let above = gen.generate_chunk(IVec3::new(0, 0, 0));
        assert!(below.contains(&STONE), "chunk under sea level should contain stone");
        assert!(
            below.contains(&DIRT) || above.contains(&DIRT),
            "surface chunks should contain dirt"
        );
        assert!(
            above.contains(&NULL_VOXEL),
            "surface chunk should have air above the terrain"
        );
    }

    #[test]
    fn test_column_layer_order() {
        let gen = TerrainGenerator::new(42);
        let height = gen.terrain_height(5, 9);
        assert_eq!(TerrainGenerator::layer_at(height - SOIL_DEPTH - 1, height), STONE);
        assert_eq!(TerrainGenerator::layer_at(height - 1, height), DIRT);
        let surface = TerrainGenerator::layer_at(height, height);
        assert!(surface == GRASS || surface == SAND);
        assert!(matches!(
            TerrainGenerator::layer_at(height + 1, height),
            WATER | NULL_VOXEL
        ));
    }
}
