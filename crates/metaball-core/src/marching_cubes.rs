//! Table-driven marching cubes over a regular lattice of samples.
//!
//! Produces an indexed triangle mesh whose vertices are in lattice-index space
//! (corner `(ix, iy, iz)` sits at `Vec3::new(ix, iy, iz)`); callers map them to
//! world space. The 256-entry triangle table is the public-domain
//! `MarchingCubeCpp` table.

#![allow(
    clippy::unreadable_literal,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use glam::Vec3;

/// Marker for an edge whose crossing vertex has not been emitted yet.
const NO_VERTEX: u32 = u32::MAX;

/// The 12 cube edges as `(axis, start corner offset)`, in the order the
/// triangle table refers to them.
const CUBE_EDGES: [(usize, [u32; 3]); 12] = [
    (0, [0, 0, 0]),
    (0, [0, 1, 0]),
    (0, [0, 0, 1]),
    (0, [0, 1, 1]),
    (1, [0, 0, 0]),
    (1, [1, 0, 0]),
    (1, [0, 0, 1]),
    (1, [1, 0, 1]),
    (2, [0, 0, 0]),
    (2, [1, 0, 0]),
    (2, [0, 1, 0]),
    (2, [1, 1, 0]),
];

/// Indexed triangle mesh produced by [`marching_cubes`].
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions in lattice-index space.
    pub positions: Vec<Vec3>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Number of triangles.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Vertex indices for crossing edges on two z-layers of the lattice.
///
/// Cells in layer `z` only touch edges rooted in layers `z` and `z + 1`, so two
/// alternating layers are enough.
struct EdgeCache {
    nx: usize,
    ny: usize,
    slots: Vec<[u32; 3]>,
}

impl EdgeCache {
    fn new(nx: u32, ny: u32) -> Self {
        let (nx, ny) = (nx as usize, ny as usize);
        Self {
            nx,
            ny,
            slots: vec![[NO_VERTEX; 3]; nx * ny * 2],
        }
    }

    fn slot(&self, x: u32, y: u32, z: u32) -> usize {
        (z as usize % 2) * self.nx * self.ny + y as usize * self.nx + x as usize
    }

    fn clear_layer(&mut self, z: u32) {
        let start = (z as usize % 2) * self.nx * self.ny;
        let end = start + self.nx * self.ny;
        self.slots[start..end].fill([NO_VERTEX; 3]);
    }
}

/// Extracts the `iso_level` surface of a sampled scalar field.
///
/// `samples` holds one value per lattice point, with the value for `(ix, iy, iz)`
/// at `(ix * ny + iy) * nz + iz` (x outermost, z innermost). Corners with a value
/// below `iso_level` are classified as one side of the surface, the rest as the
/// other; each crossing vertex is linearly interpolated along its edge and shared
/// between neighboring cells.
///
/// # Panics
///
/// Panics if `samples.len() != nx * ny * nz` or if any dimension is less than 2.
#[must_use]
pub fn marching_cubes(samples: &[f32], iso_level: f32, dims: [u32; 3]) -> TriangleMesh {
    let [nx, ny, nz] = dims;
    let expected = nx as usize * ny as usize * nz as usize;
    assert!(
        samples.len() == expected,
        "Sample count {} does not match dimensions {nx}x{ny}x{nz} = {expected}",
        samples.len()
    );
    assert!(nx >= 2 && ny >= 2 && nz >= 2, "All dimensions must be >= 2");

    let value_at = |x: u32, y: u32, z: u32| -> f32 {
        let index = (x as usize * ny as usize + y as usize) * nz as usize + z as usize;
        samples[index] - iso_level
    };

    let mut mesh = TriangleMesh::default();
    let mut cache = EdgeCache::new(nx, ny);
    let mut corners = [0.0_f32; 8];

    for z in 0..nz - 1 {
        if z > 0 {
            // Layer z + 1 shares its slot with layer z - 1, which no cell needs anymore.
            cache.clear_layer(z + 1);
        }
        for y in 0..ny - 1 {
            for x in 0..nx - 1 {
                let mut config = 0_usize;
                for (corner, value) in corners.iter_mut().enumerate() {
                    let (dx, dy, dz) = corner_offset(corner);
                    *value = value_at(x + dx, y + dy, z + dz);
                    if *value < 0.0 {
                        config |= 1 << corner;
                    }
                }

                if config == 0 || config == 255 {
                    continue;
                }

                let entry = MC_TRIS[config];
                let n_indices = (entry & 0xF) as usize * 3;
                for i in 0..n_indices {
                    let edge = ((entry >> (4 + 4 * i)) & 0xF) as usize;
                    let index = edge_vertex(&mut cache, &mut mesh, &corners, edge, [x, y, z]);
                    mesh.indices.push(index);
                }
            }
        }
    }

    mesh
}

/// Lattice offset of cube corner `corner` (bit 0 = x, bit 1 = y, bit 2 = z).
#[inline]
fn corner_offset(corner: usize) -> (u32, u32, u32) {
    (
        (corner & 1) as u32,
        ((corner >> 1) & 1) as u32,
        ((corner >> 2) & 1) as u32,
    )
}

/// Returns the shared vertex on `edge` of cell `cell`, emitting it on first use.
fn edge_vertex(
    cache: &mut EdgeCache,
    mesh: &mut TriangleMesh,
    corners: &[f32; 8],
    edge: usize,
    cell: [u32; 3],
) -> u32 {
    let (axis, offset) = CUBE_EDGES[edge];
    let root = [cell[0] + offset[0], cell[1] + offset[1], cell[2] + offset[2]];
    let slot = cache.slot(root[0], root[1], root[2]);
    let cached = cache.slots[slot][axis];
    if cached != NO_VERTEX {
        return cached;
    }

    let start = (offset[0] | offset[1] << 1 | offset[2] << 2) as usize;
    let end = start | 1 << axis;
    let (va, vb) = (corners[start], corners[end]);

    let mut position = Vec3::new(root[0] as f32, root[1] as f32, root[2] as f32);
    let denom = va - vb;
    position[axis] += if denom.abs() > f32::EPSILON { va / denom } else { 0.5 };

    let index = mesh.positions.len() as u32;
    mesh.positions.push(position);
    cache.slots[slot][axis] = index;
    index
}

/// Triangle table, one entry per cube configuration.
///
/// Bits `[3:0]` hold the triangle count (0-5); each following nibble is an edge
/// index (0-11) into [`CUBE_EDGES`], three per triangle.
#[rustfmt::skip]
static MC_TRIS: [u64; 256] = [
    0, 33793, 36945, 159668546,
    18961, 144771090, 5851666, 595283255635,
    20913, 67640146, 193993474, 655980856339,
    88782242, 736732689667, 797430812739, 194554754,
    26657, 104867330, 136709522, 298069416227,
    109224258, 8877909667, 318136408323, 1567994331701604,
    189884450, 350847647843, 559958167731, 3256298596865604,
    447393122899, 651646838401572, 2538311371089956, 737032694307,
    29329, 43484162, 91358498, 374810899075,
    158485010, 178117478419, 88675058979, 433581536604804,
    158486962, 649105605635, 4866906995, 3220959471609924,
    649165714851, 3184943915608436, 570691368417972, 595804498035,
    124295042, 431498018963, 508238522371, 91518530,
    318240155763, 291789778348404, 1830001131721892, 375363605923,
    777781811075, 1136111028516116, 3097834205243396, 508001629971,
    2663607373704004, 680242583802939237, 333380770766129845, 179746658,
    42545, 138437538, 93365810, 713842853011,
    73602098, 69575510115, 23964357683, 868078761575828,
    28681778, 713778574611, 250912709379, 2323825233181284,
    302080811955, 3184439127991172, 1694042660682596, 796909779811,
    176306722, 150327278147, 619854856867, 1005252473234484,
    211025400963, 36712706, 360743481544788, 150627258963,
    117482600995, 1024968212107700, 2535169275963444, 4734473194086550421,
    628107696687956, 9399128243, 5198438490361643573, 194220594,
    104474994, 566996932387, 427920028243, 2014821863433780,
    492093858627, 147361150235284, 2005882975110676, 9671606099636618005,
    777701008947, 3185463219618820, 482784926917540, 2900953068249785909,
    1754182023747364, 4274848857537943333, 13198752741767688709, 2015093490989156,
    591272318771, 2659758091419812, 1531044293118596, 298306479155,
    408509245114388, 210504348563, 9248164405801223541, 91321106,
    2660352816454484, 680170263324308757, 8333659837799955077, 482966828984116,
    4274926723105633605, 3184439197724820, 192104450, 15217,
    45937, 129205250, 129208402, 529245952323,
    169097138, 770695537027, 382310500883, 2838550742137652,
    122763026, 277045793139, 81608128403, 1991870397907988,
    362778151475, 2059003085103236, 2132572377842852, 655681091891,
    58419234, 239280858627, 529092143139, 1568257451898804,
    447235128115, 679678845236084, 2167161349491220, 1554184567314086709,
    165479003923, 1428768988226596, 977710670185060, 10550024711307499077,
    1305410032576132, 11779770265620358997, 333446212255967269, 978168444447012,
    162736434, 35596216627, 138295313843, 891861543990356,
    692616541075, 3151866750863876, 100103641866564, 6572336607016932133,
    215036012883, 726936420696196, 52433666, 82160664963,
    2588613720361524, 5802089162353039525, 214799000387, 144876322,
    668013605731, 110616894681956, 1601657732871812, 430945547955,
    3156382366321172, 7644494644932993285, 3928124806469601813, 3155990846772900,
    339991010498708, 10743689387941597493, 5103845475, 105070898,
    3928064910068824213, 156265010, 1305138421793636, 27185,
    195459938, 567044449971, 382447549283, 2175279159592324,
    443529919251, 195059004769796, 2165424908404116, 1554158691063110021,
    504228368803, 1436350466655236, 27584723588724, 1900945754488837749,
    122971970, 443829749251, 302601798803, 108558722,
    724700725875, 43570095105972, 2295263717447940, 2860446751369014181,
    2165106202149444, 69275726195, 2860543885641537797, 2165106320445780,
    2280890014640004, 11820349930268368933, 8721082628082003989, 127050770,
    503707084675, 122834978, 2538193642857604, 10129,
    801441490467, 2923200302876740, 1443359556281892, 2901063790822564949,
    2728339631923524, 7103874718248233397, 12775311047932294245, 95520290,
    2623783208098404, 1900908618382410757, 137742672547, 2323440239468964,
    362478212387, 727199575803140, 73425410, 34337,
    163101314, 668566030659, 801204361987, 73030562,
    591509145619, 162574594, 100608342969108, 5553,
    724147968595, 1436604830452292, 176259090, 42001,
    143955266, 2385, 18433, 0,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice_index(i: u32, j: u32, k: u32, n: u32) -> usize {
        ((i * n + j) * n + k) as usize
    }

    #[test]
    fn test_constant_above_has_no_surface() {
        let samples = vec![2.0; 27];
        assert!(marching_cubes(&samples, 1.0, [3, 3, 3]).is_empty());
    }

    #[test]
    fn test_constant_below_has_no_surface() {
        let samples = vec![0.0; 27];
        assert!(marching_cubes(&samples, 1.0, [3, 3, 3]).is_empty());
    }

    #[test]
    fn test_single_corner_gives_one_triangle() {
        let mut samples = vec![1.0_f32; 8];
        samples[0] = -1.0;
        let mesh = marching_cubes(&samples, 0.0, [2, 2, 2]);
        assert_eq!(mesh.num_triangles(), 1);
        assert_eq!(mesh.positions.len(), 3);
        // Crossings sit halfway along the three edges leaving corner 0.
        for p in &mesh.positions {
            let mut sorted = p.to_array();
            sorted.sort_by(f32::total_cmp);
            assert_eq!(sorted, [0.0, 0.0, 0.5]);
        }
    }

    #[test]
    fn test_vertices_are_shared_between_cells() {
        // A plane at x = 1.5 crossing a 4x4x4 lattice.
        let n = 4;
        let mut samples = vec![0.0_f32; 64];
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    samples[lattice_index(i, j, k, n)] = i as f32 - 1.5;
                }
            }
        }
        let mesh = marching_cubes(&samples, 0.0, [n, n, n]);
        // One crossing per (y, z) lattice line.
        assert_eq!(mesh.positions.len(), 16);
        assert_eq!(mesh.num_triangles(), 2 * 9);
        for p in &mesh.positions {
            assert!((p.x - 1.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sphere_surface() {
        let n = 20_u32;
        let center = Vec3::splat(n as f32 / 2.0);
        let radius = n as f32 / 4.0;
        let mut samples = vec![0.0_f32; (n * n * n) as usize];
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let p = Vec3::new(i as f32, j as f32, k as f32);
                    samples[lattice_index(i, j, k, n)] = (p - center).length() - radius;
                }
            }
        }

        let mesh = marching_cubes(&samples, 0.0, [n, n, n]);
        assert!(mesh.num_triangles() > 100, "got {}", mesh.num_triangles());
        assert_eq!(mesh.indices.len() % 3, 0);
        for &idx in &mesh.indices {
            assert!((idx as usize) < mesh.positions.len());
        }
        for p in &mesh.positions {
            let dist = (*p - center).length();
            assert!((dist - radius).abs() < 0.5, "vertex {p:?} off surface by {}", dist - radius);
        }
    }

    #[test]
    #[should_panic(expected = "Sample count")]
    fn test_wrong_sample_count() {
        let _ = marching_cubes(&[0.0; 10], 0.0, [3, 3, 3]);
    }

    #[test]
    #[should_panic(expected = "dimensions must be >= 2")]
    fn test_dimension_too_small() {
        let _ = marching_cubes(&[0.0; 1], 0.0, [1, 1, 1]);
    }
}
