//! State algebra for the 3×3 cube: facelet and cubie level representations,
//! move application, and the 48-element symmetry group.

pub mod cubie;
pub mod facelet;
pub mod moves;
pub mod symmetry;
