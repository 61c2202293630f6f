//! Pruning and move tables, generated once and cached on disk.
//!
//! Pruning tables map a coordinate to the exact number of moves needed to
//! bring that coordinate back to its solved value, which is an admissible
//! lower bound on the distance of the full state. Move tables map a phase 2
//! permutation coordinate directly to its successor so the inner search
//! never touches a [`CubieCube`].

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use cube::cubie::CubieCube;
use cube::moves::{ALL_MOVES, FACES, Face, Move, Turn};
use log::{debug, info};
use thiserror::Error;

use crate::coords::{
    CORNER_ORI_COUNT, CORNER_PERM_COUNT, Coords, EDGE_ORI_SLICE_COUNT, EDGE_PERM_COUNT,
};
use crate::{start, success, working};

/// Moves that stay inside the phase 2 subgroup, in face order.
pub const PHASE2_MOVES: [Move; 10] = [
    Move { face: Face::U, turn: Turn::Clockwise },
    Move { face: Face::U, turn: Turn::Half },
    Move { face: Face::U, turn: Turn::Counterclockwise },
    Move { face: Face::L, turn: Turn::Half },
    Move { face: Face::F, turn: Turn::Half },
    Move { face: Face::R, turn: Turn::Half },
    Move { face: Face::B, turn: Turn::Half },
    Move { face: Face::D, turn: Turn::Clockwise },
    Move { face: Face::D, turn: Turn::Half },
    Move { face: Face::D, turn: Turn::Counterclockwise },
];

/// Whether a move stays inside the phase 2 subgroup.
#[must_use]
pub fn is_phase2_move(m: Move) -> bool {
    m.turn == Turn::Half || matches!(m.face, Face::U | Face::D)
}

const UNVISITED: u8 = 0xff;

/// Errors reading or writing cached tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cached table {} holds {actual} bytes, expected {expected}", path.display())]
    Corrupt {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

/// Distance-to-solved lower bounds over one coordinate.
pub struct PruningTable {
    table: Box<[u8]>,
}

impl PruningTable {
    /// Generates the table by breadth-first search from the solved state.
    /// Every address is reachable, so the table comes back fully filled.
    fn generate(size: usize, moves: &[Move], rank: impl Fn(&CubieCube) -> usize) -> PruningTable {
        let mut table = vec![UNVISITED; size].into_boxed_slice();
        table[rank(&CubieCube::SOLVED)] = 0;

        let mut frontier = vec![CubieCube::SOLVED];
        let mut visited = 1;
        let mut depth: u8 = 1;

        while !frontier.is_empty() {
            let mut next = Vec::new();
            for cube in &frontier {
                for &m in moves {
                    let mut child = *cube;
                    child.apply_move(m);
                    let id = rank(&child);
                    if table[id] == UNVISITED {
                        table[id] = depth;
                        visited += 1;
                        next.push(child);
                    }
                }
            }
            debug!(working!("Filled {} of {} addresses at depth {}"), visited, size, depth);
            frontier = next;
            depth += 1;
        }
        debug_assert_eq!(visited, size);

        PruningTable { table }
    }

    /// Number of moves needed to solve this coordinate.
    #[must_use]
    pub fn lower_bound(&self, id: usize) -> u8 {
        self.table[id]
    }

    fn load(path: &Path, size: usize) -> Result<Option<PruningTable>, TableError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TableError::Io { path: path.to_owned(), source: e }),
        };
        if bytes.len() != size {
            return Err(TableError::Corrupt {
                path: path.to_owned(),
                expected: size,
                actual: bytes.len(),
            });
        }
        Ok(Some(PruningTable { table: bytes.into_boxed_slice() }))
    }

    fn save(&self, path: &Path) -> Result<(), TableError> {
        fs::write(path, &self.table)
            .map_err(|e| TableError::Io { path: path.to_owned(), source: e })
    }
}

/// Coordinate transitions under one generator per face.
///
/// The stored generator is the clockwise quarter turn for U and D and the
/// half turn for the other faces, whose quarter turns leave the subgroup.
/// Other turn amounts chain lookups of the generator.
pub struct MoveTable {
    entries: [Box<[u32]>; 6],
}

impl MoveTable {
    fn generate(size: usize, rank: impl Fn(&CubieCube) -> usize) -> MoveTable {
        let mut entries: [Box<[u32]>; 6] =
            std::array::from_fn(|_| vec![0; size].into_boxed_slice());

        let mut queue = VecDeque::new();
        queue.push_back(CubieCube::SOLVED);
        let mut seen = vec![false; size].into_boxed_slice();
        seen[rank(&CubieCube::SOLVED)] = true;

        while let Some(current) = queue.pop_front() {
            let id = rank(&current);
            for face in FACES {
                let turn = if matches!(face, Face::U | Face::D) {
                    Turn::Clockwise
                } else {
                    Turn::Half
                };
                let mut child = current;
                child.apply_move(Move { face, turn });
                let child_id = rank(&child);
                entries[face as usize][id] = child_id as u32;
                if !seen[child_id] {
                    seen[child_id] = true;
                    queue.push_back(child);
                }
            }
        }
        debug_assert!(seen.iter().all(|&reached| reached));

        MoveTable { entries }
    }

    /// Applies a phase 2 move to a coordinate.
    #[must_use]
    pub fn apply(&self, id: usize, m: Move) -> usize {
        debug_assert!(is_phase2_move(m));
        let entries = &self.entries[m.face as usize];
        if !matches!(m.face, Face::U | Face::D) {
            return entries[id] as usize;
        }
        let mut id = id;
        for _ in 0..=m.turn as usize {
            id = entries[id] as usize;
        }
        id
    }

    fn load(path: &Path, size: usize) -> Result<Option<MoveTable>, TableError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TableError::Io { path: path.to_owned(), source: e }),
        };
        let expected = FACES.len() * size * size_of::<u32>();
        if bytes.len() != expected {
            return Err(TableError::Corrupt {
                path: path.to_owned(),
                expected,
                actual: bytes.len(),
            });
        }
        let entries = std::array::from_fn(|face| {
            bytes[face * size * size_of::<u32>()..(face + 1) * size * size_of::<u32>()]
                .chunks_exact(size_of::<u32>())
                .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect()
        });
        Ok(Some(MoveTable { entries }))
    }

    fn save(&self, path: &Path) -> Result<(), TableError> {
        let mut bytes =
            Vec::with_capacity(FACES.len() * self.entries[0].len() * size_of::<u32>());
        for face in &self.entries {
            for &id in face {
                bytes.extend_from_slice(&id.to_le_bytes());
            }
        }
        fs::write(path, bytes).map_err(|e| TableError::Io { path: path.to_owned(), source: e })
    }
}

/// Every lookup table the search needs.
pub struct SearchTables {
    pub coords: Coords,
    pub corner_ori: PruningTable,
    pub edge_ori: PruningTable,
    pub corner_perm: PruningTable,
    pub edge_perm: PruningTable,
    pub corner_moves: MoveTable,
    pub edge_moves: MoveTable,
}

impl SearchTables {
    /// Loads all tables from `dir`, generating and caching any that are
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the cache directory cannot be created or a
    /// cached table cannot be read, written or has the wrong size.
    pub fn load_or_build(dir: &Path) -> Result<SearchTables, TableError> {
        fs::create_dir_all(dir)
            .map_err(|e| TableError::Io { path: dir.to_owned(), source: e })?;

        let coords = Coords::new();

        let corner_ori = Self::pruning_table(
            &dir.join("corner_ori"),
            CORNER_ORI_COUNT,
            &ALL_MOVES,
            Coords::corner_ori,
            "corner orientation",
        )?;
        let edge_ori = Self::pruning_table(
            &dir.join("edge_ori"),
            EDGE_ORI_SLICE_COUNT,
            &ALL_MOVES,
            |cube| coords.edge_ori_slice(cube),
            "edge orientation",
        )?;
        let corner_perm = Self::pruning_table(
            &dir.join("corner_perm"),
            CORNER_PERM_COUNT,
            &PHASE2_MOVES,
            Coords::corner_perm,
            "corner permutation",
        )?;
        let edge_perm = Self::pruning_table(
            &dir.join("edge_perm"),
            EDGE_PERM_COUNT,
            &PHASE2_MOVES,
            Coords::edge_perm,
            "edge permutation",
        )?;
        let corner_moves = Self::move_table(
            &dir.join("move_cp"),
            CORNER_PERM_COUNT,
            Coords::corner_perm,
            "corner permutation",
        )?;
        let edge_moves = Self::move_table(
            &dir.join("move_ep"),
            EDGE_PERM_COUNT,
            Coords::edge_perm,
            "edge permutation",
        )?;

        Ok(SearchTables {
            coords,
            corner_ori,
            edge_ori,
            corner_perm,
            edge_perm,
            corner_moves,
            edge_moves,
        })
    }

    fn pruning_table(
        path: &Path,
        size: usize,
        moves: &[Move],
        rank: impl Fn(&CubieCube) -> usize,
        description: &str,
    ) -> Result<PruningTable, TableError> {
        if let Some(table) = PruningTable::load(path, size)? {
            return Ok(table);
        }
        info!(start!("Generating {} pruning tables..."), description);
        let now = Instant::now();
        let table = PruningTable::generate(size, moves, rank);
        table.save(path)?;
        info!(
            success!("Generated {} pruning tables in {:.3}s"),
            description,
            now.elapsed().as_secs_f64()
        );
        Ok(table)
    }

    fn move_table(
        path: &Path,
        size: usize,
        rank: impl Fn(&CubieCube) -> usize,
        description: &str,
    ) -> Result<MoveTable, TableError> {
        if let Some(table) = MoveTable::load(path, size)? {
            return Ok(table);
        }
        info!(start!("Generating {} move tables..."), description);
        let now = Instant::now();
        let table = MoveTable::generate(size, rank);
        table.save(path)?;
        info!(
            success!("Generated {} move tables in {:.3}s"),
            description,
            now.elapsed().as_secs_f64()
        );
        Ok(table)
    }
}
