//! The 48 whole-cube symmetries, used to prune redundant search instances
//! and to map solutions found in a rotated frame back to the original.

use crate::cubie::CubieCube;
use crate::moves::{ALL_MOVES, Face, Move, Turn};

pub const SYMMETRY_COUNT: usize = 48;

/// Index of the 120 degree URF-diagonal rotation in generation order.
pub const URF_ROTATION: usize = 16;

/// Symmetries that rotate the cube 120 degrees about one of the four long
/// diagonals. A state fixed by any of them looks the same from all three
/// URF search rotations; their inverses fix exactly the same states.
pub const LONG_DIAGONAL_ROTATIONS: [usize; 4] = [16, 20, 24, 28];

/// 120 degree rotation of the whole cube about the URF-DBL diagonal.
const ROT_URF: CubieCube = CubieCube {
    cp: [7, 3, 2, 6, 4, 0, 1, 5],
    co: [1, 2, 1, 2, 2, 1, 2, 1],
    ep: [11, 2, 10, 6, 8, 0, 9, 4, 7, 3, 1, 5],
    eo: [0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1],
};

/// Reflection through the plane separating the L and R faces. Reflected
/// corner twists are stored as plain twists, which keeps multiplication
/// uniform at the cost of treating some twisted states as asymmetric.
const MIRROR_RL: CubieCube = CubieCube {
    cp: [1, 0, 3, 2, 5, 4, 7, 6],
    co: [0; 8],
    ep: [0, 3, 2, 1, 4, 7, 6, 5, 9, 8, 11, 10],
    eo: [0; 12],
};

/// Quarter rotation of the whole cube about the UD axis. The U and D layers
/// move like face turns; the slice ring is written by hand.
fn rot_ud() -> CubieCube {
    let mut cube = CubieCube::SOLVED;
    cube.ep[8..].copy_from_slice(&[11, 8, 9, 10]);
    for eo in &mut cube.eo[8..] {
        *eo = 1;
    }
    cube.apply_move(Move {
        face: Face::U,
        turn: Turn::Clockwise,
    });
    cube.apply_move(Move {
        face: Face::D,
        turn: Turn::Counterclockwise,
    });
    cube
}

/// Half rotation of the whole cube about the FB axis.
fn rot_fb() -> CubieCube {
    let mut cube = CubieCube::SOLVED;
    cube.ep.swap(1, 7);
    cube.ep.swap(3, 5);
    cube.apply_move(Move {
        face: Face::F,
        turn: Turn::Half,
    });
    cube.apply_move(Move {
        face: Face::B,
        turn: Turn::Half,
    });
    cube
}

fn move_state(m: Move) -> CubieCube {
    let mut cube = CubieCube::SOLVED;
    cube.apply_move(m);
    cube
}

/// Which of the 48 symmetries map a state to itself, and which map it to
/// its inverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymmetryClass {
    symmetries: u64,
    anti_symmetries: u64,
}

impl SymmetryClass {
    #[must_use]
    pub fn is_symmetric_under(&self, symmetry: usize) -> bool {
        self.symmetries >> symmetry & 1 == 1
    }

    #[must_use]
    pub fn is_anti_symmetric_under(&self, symmetry: usize) -> bool {
        self.anti_symmetries >> symmetry & 1 == 1
    }

    /// Whether the three URF search rotations would explore identical trees.
    #[must_use]
    pub fn has_long_diagonal_symmetry(&self) -> bool {
        LONG_DIAGONAL_ROTATIONS
            .iter()
            .any(|&symmetry| self.is_symmetric_under(symmetry))
    }

    /// Whether searching the inverse state would explore an identical tree.
    #[must_use]
    pub fn has_anti_symmetry(&self) -> bool {
        self.anti_symmetries != 0
    }
}

pub struct SymmetryGroup {
    cubes: Box<[CubieCube]>,
    urf_remap: [[Move; 18]; 3],
}

impl SymmetryGroup {
    /// Generates the 48 symmetries as products of the four base symmetries
    /// and tabulates how URF rotations relabel face turns.
    #[must_use]
    pub fn new() -> SymmetryGroup {
        let rot_ud = rot_ud();
        let rot_fb = rot_fb();
        let mut cubes = Vec::with_capacity(SYMMETRY_COUNT);
        let mut cube = CubieCube::SOLVED;
        for _urf in 0..3 {
            for _fb in 0..2 {
                for _ud in 0..4 {
                    for _lr in 0..2 {
                        cubes.push(cube);
                        cube = cube.multiply(&MIRROR_RL);
                    }
                    cube = cube.multiply(&rot_ud);
                }
                cube = cube.multiply(&rot_fb);
            }
            cube = cube.multiply(&ROT_URF);
        }
        debug_assert_eq!(cubes.len(), SYMMETRY_COUNT);

        let mut urf_remap = [[Move {
            face: Face::U,
            turn: Turn::Clockwise,
        }; 18]; 3];
        let mut urf_power = CubieCube::SOLVED;
        for remap in &mut urf_remap {
            let unrotate = urf_power.inverse();
            for m in ALL_MOVES {
                let conjugated = urf_power.multiply(&move_state(m)).multiply(&unrotate);
                remap[m.index()] = ALL_MOVES
                    .into_iter()
                    .find(|&image| move_state(image) == conjugated)
                    .expect("whole-cube rotations permute the face turns");
            }
            urf_power = urf_power.multiply(&ROT_URF);
        }

        SymmetryGroup {
            cubes: cubes.into_boxed_slice(),
            urf_remap,
        }
    }

    /// Relabels a state through the given symmetry.
    #[must_use]
    pub fn conjugate(&self, cube: &CubieCube, symmetry: usize) -> CubieCube {
        let sym = &self.cubes[symmetry];
        sym.inverse().multiply(cube).multiply(sym)
    }

    /// Relabels a state through the URF rotation. Three applications return
    /// the original state.
    #[must_use]
    pub fn rotate_urf(&self, cube: &CubieCube) -> CubieCube {
        self.conjugate(cube, URF_ROTATION)
    }

    /// The face turn that, applied in the unrotated frame, matches `m`
    /// applied to a state rotated `rotations` times by
    /// [`Self::rotate_urf`].
    #[must_use]
    pub fn remap_move_after_rotation(&self, m: Move, rotations: usize) -> Move {
        self.urf_remap[rotations][m.index()]
    }

    #[must_use]
    pub fn classify(&self, cube: &CubieCube) -> SymmetryClass {
        let inverse = cube.inverse();
        let mut symmetries = 0u64;
        let mut anti_symmetries = 0u64;
        for symmetry in 0..SYMMETRY_COUNT {
            let conjugated = self.conjugate(cube, symmetry);
            if conjugated == *cube {
                symmetries |= 1 << symmetry;
            }
            if conjugated == inverse {
                anti_symmetries |= 1 << symmetry;
            }
        }
        SymmetryClass {
            symmetries,
            anti_symmetries,
        }
    }
}

impl Default for SymmetryGroup {
    fn default() -> Self {
        Self::new()
    }
}
