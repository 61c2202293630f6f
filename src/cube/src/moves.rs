//! Faces, turn amounts, and WCA move notation.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the six faces, in facelet-string order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    U = 0,
    L = 1,
    F = 2,
    R = 3,
    B = 4,
    D = 5,
}

pub const FACES: [Face; 6] = [Face::U, Face::L, Face::F, Face::R, Face::B, Face::D];

impl Face {
    /// Letter used in facelet strings and move tokens.
    #[must_use]
    pub fn letter(self) -> char {
        b"ULFRBD"[self as usize] as char
    }

    #[must_use]
    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::L => Face::R,
            Face::F => Face::B,
            Face::R => Face::L,
            Face::B => Face::F,
            Face::D => Face::U,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Turn amount of a move. The discriminant is one less than the number of
/// clockwise quarter turns it stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Turn {
    Clockwise = 0,
    Half = 1,
    Counterclockwise = 2,
}

pub const TURNS: [Turn; 3] = [Turn::Clockwise, Turn::Half, Turn::Counterclockwise];

impl Turn {
    fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Half => "2",
            Turn::Counterclockwise => "'",
        }
    }
}

/// A single face turn in WCA notation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

/// All 18 face turns, face-major, clockwise/half/counter-clockwise within a
/// face. `ALL_MOVES[m.index()] == m` for every move.
pub const ALL_MOVES: [Move; 18] = {
    let mut moves = [Move {
        face: Face::U,
        turn: Turn::Clockwise,
    }; 18];
    let mut face = 0;
    while face < 6 {
        let mut turn = 0;
        while turn < 3 {
            moves[face * 3 + turn] = Move {
                face: FACES[face],
                turn: TURNS[turn],
            };
            turn += 1;
        }
        face += 1;
    }
    moves
};

impl Move {
    #[must_use]
    pub fn index(self) -> usize {
        self.face as usize * 3 + self.turn as usize
    }

    /// The move undoing this one.
    #[must_use]
    pub fn inverted(self) -> Move {
        let turn = match self.turn {
            Turn::Clockwise => Turn::Counterclockwise,
            Turn::Half => Turn::Half,
            Turn::Counterclockwise => Turn::Clockwise,
        };
        Move {
            face: self.face,
            turn,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Empty move token")]
    Empty,
    #[error("Unknown face letter {0:?}")]
    UnknownFace(char),
    #[error("Unknown turn suffix {0:?}")]
    UnknownTurn(String),
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(token: &str) -> Result<Move, MoveParseError> {
        let mut chars = token.chars();
        let letter = chars.next().ok_or(MoveParseError::Empty)?;
        let face = FACES
            .into_iter()
            .find(|face| face.letter() == letter)
            .ok_or(MoveParseError::UnknownFace(letter))?;
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "2" => Turn::Half,
            "'" => Turn::Counterclockwise,
            suffix => return Err(MoveParseError::UnknownTurn(suffix.to_owned())),
        };
        Ok(Move { face, turn })
    }
}

/// Parses a whitespace-separated sequence of WCA move tokens.
///
/// # Errors
///
/// [`MoveParseError`] for the first token that is not a face letter with an
/// optional `2` or `'` suffix.
pub fn parse_algorithm(algorithm: &str) -> Result<Vec<Move>, MoveParseError> {
    algorithm.split_whitespace().map(Move::from_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_move_tokens_round_trip() {
        for (i, m) in ALL_MOVES.into_iter().enumerate() {
            assert_eq!(m.index(), i);
            assert_eq!(m.to_string().parse::<Move>(), Ok(m));
        }
    }

    #[test]
    fn test_inverted_is_an_involution() {
        for m in ALL_MOVES {
            assert_eq!(m.inverted().inverted(), m);
            assert_eq!(m.inverted().face, m.face);
        }
    }

    #[test]
    fn test_opposite_faces_pair_up() {
        for face in FACES {
            assert_ne!(face.opposite(), face);
            assert_eq!(face.opposite().opposite(), face);
        }
    }

    #[test]
    fn test_parse_algorithm() {
        let moves = parse_algorithm("R U R' U2").unwrap();
        assert_eq!(moves.iter().map(Move::to_string).join(" "), "R U R' U2");
        assert_eq!(parse_algorithm(""), Ok(vec![]));
        assert_eq!(
            parse_algorithm("R X").unwrap_err(),
            MoveParseError::UnknownFace('X')
        );
        assert_eq!(
            parse_algorithm("R2'").unwrap_err(),
            MoveParseError::UnknownTurn("2'".to_owned())
        );
    }
}
