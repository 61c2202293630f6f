//! Piece-level cube representation: permutations and orientations of the
//! eight corners and twelve edges.

use crate::facelet::{CORNER_FACELETS, EDGE_FACELETS, FaceletCube};
use crate::moves::{FACES, Face, Move, Turn};
use std::sync::LazyLock;
use thiserror::Error;

pub const CORNER_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;
/// Edges at index `SLICE_THRESHOLD` and above belong to the E slice between
/// the U and D layers.
pub const SLICE_THRESHOLD: usize = 8;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("No corner piece shows faces {0}, {1}, {2}")]
    CornerNotFound(Face, Face, Face),
    #[error("No edge piece shows faces {0}, {1}")]
    EdgeNotFound(Face, Face),
    #[error("Not all eight corner pieces are present")]
    MissingCorner,
    #[error("Not all twelve edge pieces are present")]
    MissingEdge,
    #[error("Corner twists do not sum to a multiple of three")]
    CornerOrientationSum,
    #[error("Edge flips do not sum to an even number")]
    EdgeOrientationSum,
    #[error("Corner and edge permutation parities differ")]
    ParityMismatch,
}

/// A cube described by where each piece sits and how it is twisted or
/// flipped.
///
/// Corners are indexed ULB, UBR, URF, UFL, DBL, DRB, DFR, DLF and edges UB,
/// UR, UF, UL, DB, DR, DF, DL, BL, BR, FR, FL, matching [`CORNER_FACELETS`]
/// and [`EDGE_FACELETS`]. `cp[i]` is the piece sitting at position `i`, and
/// `co[i]`/`eo[i]` how far it is twisted or flipped relative to its home
/// orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubieCube {
    pub cp: [u8; CORNER_COUNT],
    pub co: [u8; CORNER_COUNT],
    pub ep: [u8; EDGE_COUNT],
    pub eo: [u8; EDGE_COUNT],
}

/// The cubie-level effect of turning each face clockwise once, indexed by
/// [`Face`].
pub static MOVE_CUBES: LazyLock<[CubieCube; 6]> = LazyLock::new(|| {
    std::array::from_fn(|face| {
        let mut facelets = FaceletCube::SOLVED;
        facelets.apply_move(Move {
            face: FACES[face],
            turn: Turn::Clockwise,
        });
        CubieCube::try_from(&facelets)
            .expect("a single face turn of the solved cube is a valid state")
    })
});

impl CubieCube {
    pub const SOLVED: CubieCube = CubieCube {
        cp: [0, 1, 2, 3, 4, 5, 6, 7],
        co: [0; CORNER_COUNT],
        ep: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        eo: [0; EDGE_COUNT],
    };

    /// Composes two cube states: the result is `rhs` applied after `self`.
    #[must_use]
    pub fn multiply(&self, rhs: &CubieCube) -> CubieCube {
        let mut product = CubieCube::SOLVED;
        for i in 0..CORNER_COUNT {
            product.cp[i] = self.cp[rhs.cp[i] as usize];
            product.co[i] = (self.co[rhs.cp[i] as usize] + rhs.co[i]) % 3;
        }
        for i in 0..EDGE_COUNT {
            product.ep[i] = self.ep[rhs.ep[i] as usize];
            product.eo[i] = (self.eo[rhs.ep[i] as usize] + rhs.eo[i]) % 2;
        }
        product
    }

    #[must_use]
    pub fn inverse(&self) -> CubieCube {
        let mut inverse = CubieCube::SOLVED;
        for i in 0..CORNER_COUNT {
            inverse.cp[self.cp[i] as usize] = i as u8;
            inverse.co[self.cp[i] as usize] = (3 - self.co[i]) % 3;
        }
        for i in 0..EDGE_COUNT {
            inverse.ep[self.ep[i] as usize] = i as u8;
            inverse.eo[self.ep[i] as usize] = self.eo[i];
        }
        inverse
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == CubieCube::SOLVED
    }

    pub fn apply_move(&mut self, m: Move) {
        for _ in 0..=m.turn as usize {
            *self = self.multiply(&MOVE_CUBES[m.face as usize]);
        }
    }

    pub fn apply_algorithm(&mut self, moves: &[Move]) {
        for &m in moves {
            self.apply_move(m);
        }
    }

    /// Checks that this state is reachable from the solved cube by face
    /// turns.
    ///
    /// # Errors
    ///
    /// The first violated invariant, checked in the order missing pieces,
    /// twist sum, flip sum, permutation parity.
    pub fn verify(&self) -> Result<(), StateError> {
        for piece in 0..CORNER_COUNT as u8 {
            if !self.cp.contains(&piece) {
                return Err(StateError::MissingCorner);
            }
        }
        for piece in 0..EDGE_COUNT as u8 {
            if !self.ep.contains(&piece) {
                return Err(StateError::MissingEdge);
            }
        }
        if self.co.iter().sum::<u8>() % 3 != 0 {
            return Err(StateError::CornerOrientationSum);
        }
        if self.eo.iter().sum::<u8>() % 2 != 0 {
            return Err(StateError::EdgeOrientationSum);
        }
        if permutation_parity(&self.cp) != permutation_parity(&self.ep) {
            return Err(StateError::ParityMismatch);
        }
        Ok(())
    }

    /// A uniformly random reachable cube state.
    #[must_use]
    pub fn random_state() -> CubieCube {
        let mut cube = CubieCube::SOLVED;
        fastrand::shuffle(&mut cube.ep);
        fastrand::shuffle(&mut cube.cp);
        if permutation_parity(&cube.cp) != permutation_parity(&cube.ep) {
            cube.cp.swap(0, 1);
        }
        let mut twist_sum = 0;
        for co in &mut cube.co[..CORNER_COUNT - 1] {
            *co = fastrand::u8(..3);
            twist_sum += *co;
        }
        cube.co[CORNER_COUNT - 1] = (3 - twist_sum % 3) % 3;
        let mut flip_sum = 0;
        for eo in &mut cube.eo[..EDGE_COUNT - 1] {
            *eo = fastrand::u8(..2);
            flip_sum += *eo;
        }
        cube.eo[EDGE_COUNT - 1] = flip_sum % 2;
        cube
    }
}

fn permutation_parity(permutation: &[u8]) -> usize {
    let mut inversions = 0;
    for (i, &a) in permutation.iter().enumerate() {
        inversions += permutation[i + 1..].iter().filter(|&&b| b < a).count();
    }
    inversions % 2
}

fn corner_identity(piece: usize) -> [Face; 3] {
    CORNER_FACELETS[piece].map(|facelet| FACES[facelet / 9])
}

fn edge_identity(piece: usize) -> [Face; 2] {
    EDGE_FACELETS[piece].map(|facelet| FACES[facelet / 9])
}

/// Identifies which corner piece shows the given stickers, and how far it is
/// twisted. A twist of one turns the piece clockwise, so sticker `j` shows
/// the face that is home to sticker `(j + 3 - twist) % 3`.
fn corner_piece(shown: [Face; 3]) -> Option<(u8, u8)> {
    for piece in 0..CORNER_COUNT {
        let home = corner_identity(piece);
        for twist in 0..3 {
            if (0..3).all(|j| shown[j] == home[(j + 3 - twist) % 3]) {
                return Some((piece as u8, twist as u8));
            }
        }
    }
    None
}

fn edge_piece(shown: [Face; 2]) -> Option<(u8, u8)> {
    for piece in 0..EDGE_COUNT {
        let home = edge_identity(piece);
        for flip in 0..2 {
            if (0..2).all(|j| shown[j] == home[(j + flip) % 2]) {
                return Some((piece as u8, flip as u8));
            }
        }
    }
    None
}

impl TryFrom<&FaceletCube> for CubieCube {
    type Error = StateError;

    /// Reads the piece at each position off its stickers. Fails only when a
    /// sticker combination belongs to no piece; sums and parity are left to
    /// [`CubieCube::verify`].
    fn try_from(facelets: &FaceletCube) -> Result<CubieCube, StateError> {
        let mut cube = CubieCube::SOLVED;
        for (position, stickers) in CORNER_FACELETS.into_iter().enumerate() {
            let shown = stickers.map(|facelet| facelets.facelet(facelet));
            let (piece, twist) = corner_piece(shown)
                .ok_or(StateError::CornerNotFound(shown[0], shown[1], shown[2]))?;
            cube.cp[position] = piece;
            cube.co[position] = twist;
        }
        for (position, stickers) in EDGE_FACELETS.into_iter().enumerate() {
            let shown = stickers.map(|facelet| facelets.facelet(facelet));
            let (piece, flip) =
                edge_piece(shown).ok_or(StateError::EdgeNotFound(shown[0], shown[1]))?;
            cube.ep[position] = piece;
            cube.eo[position] = flip;
        }
        Ok(cube)
    }
}

impl From<&CubieCube> for FaceletCube {
    fn from(cube: &CubieCube) -> FaceletCube {
        let mut facelets = FaceletCube::SOLVED;
        for (position, stickers) in CORNER_FACELETS.into_iter().enumerate() {
            let home = corner_identity(cube.cp[position] as usize);
            for (j, facelet) in stickers.into_iter().enumerate() {
                facelets.set_facelet(facelet, home[(j + 3 - cube.co[position] as usize) % 3]);
            }
        }
        for (position, stickers) in EDGE_FACELETS.into_iter().enumerate() {
            let home = edge_identity(cube.ep[position] as usize);
            for (j, facelet) in stickers.into_iter().enumerate() {
                facelets.set_facelet(facelet, home[(j + cube.eo[position] as usize) % 2]);
            }
        }
        facelets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{ALL_MOVES, parse_algorithm};

    #[test]
    fn test_move_cubes_are_valid_states() {
        for cube in MOVE_CUBES.iter() {
            cube.verify().unwrap();
            assert!(!cube.is_solved());
        }
    }

    #[test]
    fn test_u_move_cube() {
        let u = MOVE_CUBES[Face::U as usize];
        assert_eq!(u.cp, [3, 0, 1, 2, 4, 5, 6, 7]);
        assert_eq!(u.co, [0; 8]);
        assert_eq!(u.ep, [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(u.eo, [0; 12]);
    }

    #[test]
    fn test_r_move_twists_the_urf_corner() {
        let r = MOVE_CUBES[Face::R as usize];
        assert_eq!(r.cp[2], 6);
        assert_eq!(r.co[2], 2);
    }

    #[test]
    fn test_multiply_by_inverse_is_identity() {
        for cube in MOVE_CUBES.iter() {
            assert_eq!(cube.multiply(&cube.inverse()), CubieCube::SOLVED);
            assert_eq!(cube.inverse().multiply(cube), CubieCube::SOLVED);
            assert_eq!(cube.inverse().inverse(), *cube);
        }
    }

    #[test]
    fn test_move_orders() {
        for m in ALL_MOVES {
            let expected_order = if m.turn == Turn::Half { 2 } else { 4 };
            let mut cube = CubieCube::SOLVED;
            for repetition in 1..=expected_order {
                cube.apply_move(m);
                assert_eq!(cube.is_solved(), repetition == expected_order);
            }
        }
    }

    #[test]
    fn test_move_then_inverted_move_is_identity() {
        for m in ALL_MOVES {
            let mut cube = CubieCube::random_state();
            let before = cube;
            cube.apply_move(m);
            cube.apply_move(m.inverted());
            assert_eq!(cube, before);
        }
    }

    #[test]
    fn test_sexy_move_has_order_six() {
        let sexy = parse_algorithm("R U R' U'").unwrap();
        let mut cube = CubieCube::SOLVED;
        for repetition in 1..=6 {
            cube.apply_algorithm(&sexy);
            assert_eq!(cube.is_solved(), repetition == 6);
        }
    }

    #[test]
    fn test_verify_catches_each_invariant() {
        let mut duplicated_corner = CubieCube::SOLVED;
        duplicated_corner.cp[0] = 1;
        assert_eq!(duplicated_corner.verify(), Err(StateError::MissingCorner));

        let mut duplicated_edge = CubieCube::SOLVED;
        duplicated_edge.ep[0] = 1;
        assert_eq!(duplicated_edge.verify(), Err(StateError::MissingEdge));

        let mut twisted = CubieCube::SOLVED;
        twisted.co[0] = 1;
        assert_eq!(twisted.verify(), Err(StateError::CornerOrientationSum));

        let mut flipped = CubieCube::SOLVED;
        flipped.eo[0] = 1;
        assert_eq!(flipped.verify(), Err(StateError::EdgeOrientationSum));

        let mut swapped = CubieCube::SOLVED;
        swapped.cp.swap(0, 1);
        assert_eq!(swapped.verify(), Err(StateError::ParityMismatch));

        assert_eq!(CubieCube::SOLVED.verify(), Ok(()));
    }

    #[test]
    fn test_facelet_round_trip() {
        for _ in 0..100 {
            let cube = CubieCube::random_state();
            cube.verify().unwrap();
            let facelets = FaceletCube::from(&cube);
            assert_eq!(CubieCube::try_from(&facelets), Ok(cube));
        }
    }

    #[test]
    fn test_twisted_corners_render_to_known_facelets() {
        let mut cube = CubieCube::SOLVED;
        cube.co[0] = 1;
        cube.co[1] = 2;
        cube.verify().unwrap();
        let facelets = FaceletCube::from(&cube);
        assert_eq!(
            facelets.to_string(),
            "BUBUUUUUUULLLLLLLLFFFFFFFFFRRURRRRRRRBLBBBBBBDDDDDDDDD"
        );
        assert_eq!(CubieCube::try_from(&facelets), Ok(cube));
    }

    #[test]
    fn test_scrambled_facelet_string_is_a_valid_state() {
        let facelets: FaceletCube = "lflburfldfdrllururuflbffdlrbburrdublbudrbdufdfubrdlbdf"
            .parse()
            .unwrap();
        let cube = CubieCube::try_from(&facelets).unwrap();
        cube.verify().unwrap();
        assert!(!cube.is_solved());
    }

    #[test]
    fn test_unknown_pieces_are_rejected() {
        let solved = "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD";
        let mut chars = solved.chars().collect::<Vec<_>>();
        chars.swap(9, 51);
        let facelets: FaceletCube = chars.iter().collect::<String>().parse().unwrap();
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(StateError::CornerNotFound(Face::U, Face::D, Face::B))
        );

        let mut chars = solved.chars().collect::<Vec<_>>();
        chars.swap(10, 52);
        let facelets: FaceletCube = chars.iter().collect::<String>().parse().unwrap();
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(StateError::EdgeNotFound(Face::U, Face::D))
        );
    }

    #[test]
    fn test_random_state_is_well_distributed() {
        let states = (0..20).map(|_| CubieCube::random_state()).collect::<Vec<_>>();
        for state in &states {
            state.verify().unwrap();
        }
        assert!(states.iter().any(|state| !state.is_solved()));
    }
}
