//! Coordinates mapping cube states onto table addresses.
//!
//! Each coordinate ranks one aspect of a [`CubieCube`] into a dense range so
//! that pruning and move tables can be indexed as flat arrays.

use cube::cubie::{CORNER_COUNT, CubieCube, EDGE_COUNT, SLICE_THRESHOLD};

/// Corner orientation coordinates, 3^7.
pub const CORNER_ORI_COUNT: usize = 2187;
/// Edge orientation coordinates, 2^11.
pub const EDGE_ORI_COUNT: usize = 2048;
/// Positions of the four equator edges, C(12, 4).
pub const SLICE_COUNT: usize = 495;
/// Combined edge orientation and equator position coordinates.
pub const EDGE_ORI_SLICE_COUNT: usize = EDGE_ORI_COUNT * SLICE_COUNT;
/// Corner permutation coordinates, 8!.
pub const CORNER_PERM_COUNT: usize = 40_320;
/// Phase 2 edge permutation coordinates, 8! * 4!.
pub const EDGE_PERM_COUNT: usize = 967_680;

const FACT: [usize; 8] = {
    let mut arr = [0; 8];
    arr[0] = 1;
    let mut i = 1;
    while i < arr.len() {
        arr[i] = arr[i - 1] * i;
        i += 1;
    }
    arr
};

/// Dense ranking of the equator-edge position masks.
///
/// The mask has bit `i` set when edge position `i` holds an equator edge.
/// Only the first eleven positions contribute a bit, so the mask of a
/// reachable state has three or four bits set and the occupancy of the
/// twelfth position is implied. Valid masks are ranked in increasing
/// numeric order.
pub struct Coords {
    slice_rank: Box<[u16]>,
}

impl Coords {
    #[must_use]
    pub fn new() -> Coords {
        let mut slice_rank = vec![u16::MAX; 1 << (EDGE_COUNT - 1)].into_boxed_slice();
        let mut rank = 0;
        for (mask, entry) in slice_rank.iter_mut().enumerate() {
            if matches!(mask.count_ones(), 3 | 4) {
                *entry = rank;
                rank += 1;
            }
        }
        debug_assert_eq!(usize::from(rank), SLICE_COUNT);
        Coords { slice_rank }
    }

    /// Ranks the corner orientations, reading the first seven twists as a
    /// ternary number.
    #[must_use]
    pub fn corner_ori(cube: &CubieCube) -> usize {
        cube.co[..CORNER_COUNT - 1]
            .iter()
            .fold(0, |id, &twist| id * 3 + usize::from(twist))
    }

    /// Ranks the edge orientations, reading the first eleven flips as a
    /// binary number.
    #[must_use]
    pub fn edge_ori(cube: &CubieCube) -> usize {
        cube.eo[..EDGE_COUNT - 1]
            .iter()
            .fold(0, |id, &flip| (id << 1) | usize::from(flip))
    }

    /// Ranks the corner permutation by its Lehmer code.
    #[must_use]
    pub fn corner_perm(cube: &CubieCube) -> usize {
        let mut id = 0;
        let mut seen: u32 = 0;
        for (i, &piece) in cube.cp[..CORNER_COUNT - 1].iter().enumerate() {
            let piece = usize::from(piece);
            seen |= 1 << (CORNER_COUNT - 1 - piece);
            let smaller = (seen >> (CORNER_COUNT - piece)).count_ones() as usize;
            id += (piece - smaller) * FACT[CORNER_COUNT - 1 - i];
        }
        id
    }

    /// Ranks the edge permutation of a phase 2 state. The top and bottom
    /// layer edges contribute a Lehmer code over the first eight positions
    /// and the equator edges one over the last four.
    #[must_use]
    pub fn edge_perm(cube: &CubieCube) -> usize {
        let mut id = 0;
        let mut seen: u32 = 0;
        for (i, &piece) in cube.ep[..SLICE_THRESHOLD - 1].iter().enumerate() {
            let piece = usize::from(piece);
            debug_assert!(piece < SLICE_THRESHOLD);
            seen |= 1 << (SLICE_THRESHOLD - 1 - piece);
            let smaller = (seen >> (SLICE_THRESHOLD - piece)).count_ones() as usize;
            id += (piece - smaller) * FACT[SLICE_THRESHOLD - 1 - i];
        }
        id *= 24;
        seen = 0;
        for (i, &piece) in cube.ep[SLICE_THRESHOLD..EDGE_COUNT - 1].iter().enumerate() {
            debug_assert!(usize::from(piece) >= SLICE_THRESHOLD);
            let piece = usize::from(piece) - SLICE_THRESHOLD;
            seen |= 1 << (3 - piece);
            let smaller = (seen >> (4 - piece)).count_ones() as usize;
            id += (piece - smaller) * FACT[3 - i];
        }
        id
    }

    /// Ranks the positions of the four equator edges.
    #[must_use]
    pub fn slice(&self, cube: &CubieCube) -> usize {
        let mut mask = 0usize;
        for (i, &piece) in cube.ep[..EDGE_COUNT - 1].iter().enumerate() {
            if usize::from(piece) >= SLICE_THRESHOLD {
                mask |= 1 << i;
            }
        }
        let rank = self.slice_rank[mask];
        debug_assert_ne!(rank, u16::MAX);
        usize::from(rank)
    }

    /// Ranks edge orientation and equator position together for the phase 1
    /// pruning table.
    #[must_use]
    pub fn edge_ori_slice(&self, cube: &CubieCube) -> usize {
        Self::edge_ori(cube) * SLICE_COUNT + self.slice(cube)
    }
}

impl Default for Coords {
    fn default() -> Coords {
        Coords::new()
    }
}
