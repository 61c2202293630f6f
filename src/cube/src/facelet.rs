//! Sticker-level cube representation and the 54-character facelet string
//! format.

use crate::moves::{FACES, Face, Move};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const FACELET_COUNT: usize = 54;

/// Facelet positions of each corner piece, orientation-reference sticker
/// first. The reference sticker is the one on the U or D face; the other two
/// follow clockwise around the corner.
pub const CORNER_FACELETS: [[usize; 3]; 8] = [
    [0, 9, 38],  // ULB
    [2, 36, 29], // UBR
    [8, 27, 20], // URF
    [6, 18, 11], // UFL
    [51, 44, 15], // DBL
    [53, 35, 42], // DRB
    [47, 26, 33], // DFR
    [45, 17, 24], // DLF
];

/// Facelet positions of each edge piece, orientation-reference sticker first.
pub const EDGE_FACELETS: [[usize; 2]; 12] = [
    [1, 37],  // UB
    [5, 28],  // UR
    [7, 19],  // UF
    [3, 10],  // UL
    [52, 43], // DB
    [50, 34], // DR
    [46, 25], // DF
    [48, 16], // DL
    [41, 12], // BL
    [39, 32], // BR
    [23, 30], // FR
    [21, 14], // FL
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FaceletError {
    #[error("Expected {expected} facelets, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Facelet {0:?} does not match any center")]
    UnknownFacelet(char),
    #[error("Each face must have exactly nine facelets")]
    UnevenFaceletCounts,
}

/// A cube described by the face each of its 54 stickers shows, in U, L, F,
/// R, B, D face order, row-major within a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceletCube {
    facelets: [Face; FACELET_COUNT],
}

impl FaceletCube {
    pub const SOLVED: FaceletCube = {
        let mut facelets = [Face::U; FACELET_COUNT];
        let mut i = 0;
        while i < FACELET_COUNT {
            facelets[i] = FACES[i / 9];
            i += 1;
        }
        FaceletCube { facelets }
    };

    #[must_use]
    pub fn facelet(&self, position: usize) -> Face {
        self.facelets[position]
    }

    pub(crate) fn set_facelet(&mut self, position: usize, face: Face) {
        self.facelets[position] = face;
    }

    /// Turns `face` a quarter turn clockwise, as seen looking at that face.
    fn quarter(&mut self, face: Face) {
        let old = *self;
        let at = |face: Face, row: usize, col: usize| face as usize * 9 + row * 3 + col;
        for row in 0..3 {
            for col in 0..3 {
                self.facelets[at(face, row, col)] = old.facelets[at(face, 2 - col, row)];
            }
        }
        use Face::{B, D, F, L, R, U};
        for i in 0..3 {
            match face {
                U => {
                    self.facelets[at(L, 0, i)] = old.facelets[at(F, 0, i)];
                    self.facelets[at(F, 0, i)] = old.facelets[at(R, 0, i)];
                    self.facelets[at(R, 0, i)] = old.facelets[at(B, 0, i)];
                    self.facelets[at(B, 0, i)] = old.facelets[at(L, 0, i)];
                }
                D => {
                    self.facelets[at(F, 2, i)] = old.facelets[at(L, 2, i)];
                    self.facelets[at(R, 2, i)] = old.facelets[at(F, 2, i)];
                    self.facelets[at(B, 2, i)] = old.facelets[at(R, 2, i)];
                    self.facelets[at(L, 2, i)] = old.facelets[at(B, 2, i)];
                }
                F => {
                    self.facelets[at(U, 2, i)] = old.facelets[at(L, 2 - i, 2)];
                    self.facelets[at(L, i, 2)] = old.facelets[at(D, 0, i)];
                    self.facelets[at(D, 0, i)] = old.facelets[at(R, 2 - i, 0)];
                    self.facelets[at(R, i, 0)] = old.facelets[at(U, 2, i)];
                }
                B => {
                    self.facelets[at(U, 0, i)] = old.facelets[at(R, i, 2)];
                    self.facelets[at(L, i, 0)] = old.facelets[at(U, 0, 2 - i)];
                    self.facelets[at(D, 2, i)] = old.facelets[at(L, i, 0)];
                    self.facelets[at(R, i, 2)] = old.facelets[at(D, 2, 2 - i)];
                }
                R => {
                    self.facelets[at(U, i, 2)] = old.facelets[at(F, i, 2)];
                    self.facelets[at(F, i, 2)] = old.facelets[at(D, i, 2)];
                    self.facelets[at(D, i, 2)] = old.facelets[at(B, 2 - i, 0)];
                    self.facelets[at(B, i, 0)] = old.facelets[at(U, 2 - i, 2)];
                }
                L => {
                    self.facelets[at(U, i, 0)] = old.facelets[at(B, 2 - i, 2)];
                    self.facelets[at(F, i, 0)] = old.facelets[at(U, i, 0)];
                    self.facelets[at(D, i, 0)] = old.facelets[at(F, i, 0)];
                    self.facelets[at(B, i, 2)] = old.facelets[at(D, 2 - i, 0)];
                }
            }
        }
    }

    pub fn apply_move(&mut self, m: Move) {
        for _ in 0..=m.turn as usize {
            self.quarter(m.face);
        }
    }

    /// Renders the stickers as an unfolded net, U on top, D on the bottom,
    /// and the L F R B band in the middle.
    #[must_use]
    pub fn net(&self) -> String {
        let mut net = String::new();
        let row = |face: Face, row: usize| {
            (0..3)
                .map(|col| self.facelets[face as usize * 9 + row * 3 + col].letter())
                .collect::<String>()
        };
        for r in 0..3 {
            net.push_str("    ");
            net.push_str(&row(Face::U, r));
            net.push('\n');
        }
        for r in 0..3 {
            for face in [Face::L, Face::F, Face::R, Face::B] {
                net.push_str(&row(face, r));
                net.push(' ');
            }
            net.pop();
            net.push('\n');
        }
        for r in 0..3 {
            net.push_str("    ");
            net.push_str(&row(Face::D, r));
            net.push('\n');
        }
        net
    }
}

impl FromStr for FaceletCube {
    type Err = FaceletError;

    /// Facelets are matched against the six center characters rather than
    /// fixed letters, so any consistent labelling parses.
    fn from_str(s: &str) -> Result<FaceletCube, FaceletError> {
        let chars = s.chars().collect_vec();
        if chars.len() != FACELET_COUNT {
            return Err(FaceletError::WrongLength {
                expected: FACELET_COUNT,
                actual: chars.len(),
            });
        }
        let centers: [char; 6] = std::array::from_fn(|face| chars[face * 9 + 4]);
        let mut facelets = [Face::U; FACELET_COUNT];
        for (facelet, &c) in facelets.iter_mut().zip(&chars) {
            let face = centers
                .iter()
                .position(|&center| center == c)
                .ok_or(FaceletError::UnknownFacelet(c))?;
            *facelet = FACES[face];
        }
        for face in FACES {
            if facelets.iter().filter(|&&f| f == face).count() != 9 {
                return Err(FaceletError::UnevenFaceletCounts);
            }
        }
        Ok(FaceletCube { facelets })
    }
}

impl fmt::Display for FaceletCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for facelet in self.facelets {
            write!(f, "{}", facelet.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{ALL_MOVES, Turn};

    const SOLVED_FACELETS: &str = "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD";

    #[test]
    fn test_solved_round_trip() {
        let cube: FaceletCube = SOLVED_FACELETS.parse().unwrap();
        assert_eq!(cube, FaceletCube::SOLVED);
        assert_eq!(cube.to_string(), SOLVED_FACELETS);
    }

    #[test]
    fn test_u_turn_moves_the_top_band() {
        let mut cube = FaceletCube::SOLVED;
        cube.apply_move("U".parse().unwrap());
        assert_eq!(
            cube.to_string(),
            "UUUUUUUUUFFFLLLLLLRRRFFFFFFBBBRRRRRRLLLBBBBBBDDDDDDDDD"
        );
    }

    #[test]
    fn test_every_face_turn_has_order_four() {
        for face in FACES {
            let mut cube = FaceletCube::SOLVED;
            for _ in 0..4 {
                cube.apply_move(Move {
                    face,
                    turn: Turn::Clockwise,
                });
            }
            assert_eq!(cube, FaceletCube::SOLVED);
        }
    }

    #[test]
    fn test_half_turn_is_two_quarter_turns() {
        for face in FACES {
            let mut once = FaceletCube::SOLVED;
            once.apply_move(Move {
                face,
                turn: Turn::Half,
            });
            let mut twice = FaceletCube::SOLVED;
            for _ in 0..2 {
                twice.apply_move(Move {
                    face,
                    turn: Turn::Clockwise,
                });
            }
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_moves_permute_facelets() {
        for m in ALL_MOVES {
            let mut cube = FaceletCube::SOLVED;
            cube.apply_move(m);
            for face in FACES {
                assert_eq!(
                    (0..FACELET_COUNT)
                        .filter(|&i| cube.facelet(i) == face)
                        .count(),
                    9
                );
            }
        }
    }

    #[test]
    fn test_parse_matches_against_centers() {
        let cube: FaceletCube = "uuuuuuuuulllllllllfffffffffrrrrrrrrrbbbbbbbbbddddddddd"
            .parse()
            .unwrap();
        assert_eq!(cube, FaceletCube::SOLVED);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "UUU".parse::<FaceletCube>().unwrap_err(),
            FaceletError::WrongLength {
                expected: 54,
                actual: 3
            }
        );
        let unknown = format!("X{}", &SOLVED_FACELETS[1..]);
        assert_eq!(
            unknown.parse::<FaceletCube>().unwrap_err(),
            FaceletError::UnknownFacelet('X')
        );
        let uneven = format!("L{}", &SOLVED_FACELETS[1..]);
        assert_eq!(
            uneven.parse::<FaceletCube>().unwrap_err(),
            FaceletError::UnevenFaceletCounts
        );
    }

    #[test]
    fn test_net_shape() {
        let net = FaceletCube::SOLVED.net();
        assert_eq!(net.lines().count(), 9);
        assert_eq!(net.lines().next().unwrap(), "    UUU");
        assert_eq!(net.lines().nth(3).unwrap(), "LLL FFF RRR BBB");
    }
}
