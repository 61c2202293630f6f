//! Two-phase solving for the 3x3x3 cube.
//!
//! Phase 1 searches with all eighteen face turns for a sequence bringing the
//! cube into the subgroup generated by U, D, F2, B2, R2 and L2. Phase 2
//! finishes the solve without leaving that subgroup, so the two sequences
//! concatenate into a full solution. Both phases run iterative-deepening A*
//! over pruning tables that are generated once and cached on disk, and every
//! query fans out over rotated and inverted instances of the same state
//! searched in parallel.

pub mod coords;
pub mod search;
pub mod tables;

use cube::cubie::{CubieCube, StateError};
use cube::facelet::{FaceletCube, FaceletError};
use thiserror::Error;

pub use search::{Solutions, Solver};
pub use tables::{SearchTables, TableError};

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// Why a facelet string was rejected.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Facelets(#[from] FaceletError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Parses a facelet string and checks that it describes a reachable state.
///
/// # Errors
///
/// Returns an error when the string is not a well-formed facelet description
/// or when the pieces it describes cannot be reached by face turns.
pub fn validate(facelets: &str) -> Result<CubieCube, SolveError> {
    let facelet_cube: FaceletCube = facelets.parse()?;
    let cube = CubieCube::try_from(&facelet_cube)?;
    cube.verify()?;
    Ok(cube)
}

/// Returns the facelet string of a uniformly random reachable state.
#[must_use]
pub fn random_scramble() -> String {
    FaceletCube::from(&CubieCube::random_state()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED_FACELETS: &str = "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD";

    #[test]
    fn validate_accepts_solved() {
        assert_eq!(validate(SOLVED_FACELETS).unwrap(), CubieCube::SOLVED);
    }

    #[test]
    fn validate_rejects_malformed_strings() {
        assert!(matches!(validate("UUU"), Err(SolveError::Facelets(_))));
    }

    #[test]
    fn validate_rejects_twisted_corner() {
        let mut cube = CubieCube::SOLVED;
        cube.co[0] = 1;
        let facelets = FaceletCube::from(&cube).to_string();
        assert!(matches!(
            validate(&facelets),
            Err(SolveError::State(StateError::CornerOrientationSum))
        ));
    }

    #[test]
    fn random_scrambles_validate() {
        for _ in 0..20 {
            validate(&random_scramble()).unwrap();
        }
    }
}
