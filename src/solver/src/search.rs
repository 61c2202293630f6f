//! Parallel two-phase IDA* search.
//!
//! A query fans out over up to six instances of the same state, one per
//! surviving URF rotation and search direction. Every instance runs the
//! same two-phase search: iterative-deepening over all eighteen moves until
//! the orientation tables report the subgroup has been reached, then a
//! nested deepening over the ten subgroup moves on permutation coordinates
//! alone. Solutions are mapped back into the frame of the queried state
//! before they are reported.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use cube::cubie::CubieCube;
use cube::moves::{ALL_MOVES, Face, Move};
use cube::symmetry::SymmetryGroup;
use fxhash::FxHashSet;
use itertools::iproduct;
use log::{Level, debug, info, log_enabled};

use crate::coords::Coords;
use crate::tables::{PHASE2_MOVES, SearchTables, TableError, is_phase2_move};
use crate::{SolveError, start, validate, working};

/// Whether `next` may follow `prev` on a search path. Turning the same face
/// twice never helps, and of each opposite-face pair only one order is
/// explored since the turns commute.
fn allowed_successor(prev: Move, next: Move) -> bool {
    use Face::{B, D, F, L, R, U};
    prev.face != next.face && !matches!((prev.face, next.face), (B, F) | (R, L) | (U, D))
}

/// State shared by every instance of one query.
struct SharedSearch {
    /// Length that any further solution must beat. Doubles as the record of
    /// whether anything has been found yet.
    bound: AtomicUsize,
    /// Set once the consumer asks the workers to stop.
    cancel: AtomicBool,
    /// Rendered solutions already sent to the consumer.
    reported: Mutex<FxHashSet<String>>,
}

impl SharedSearch {
    fn new() -> SharedSearch {
        SharedSearch {
            bound: AtomicUsize::new(usize::MAX),
            cancel: AtomicBool::new(false),
            reported: Mutex::new(FxHashSet::default()),
        }
    }

    /// Cancellation only takes effect once a solution exists, so that a
    /// cancelled query still yields an answer.
    fn stop_requested(&self) -> bool {
        self.cancel.load(Ordering::Relaxed) && self.bound.load(Ordering::Relaxed) != usize::MAX
    }

    /// Makes every gate fail so workers exit at their next poll.
    fn abandon(&self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.bound.store(0, Ordering::Relaxed);
    }

    /// Forwards a rendered solution if it is strictly shorter than every
    /// solution reported so far, and tightens the shared bound to match.
    fn report(&self, rendered: String, length: usize, sender: &Sender<String>) {
        let mut reported = self.reported.lock().expect("search workers do not panic");
        if length >= self.bound.load(Ordering::Relaxed) {
            return;
        }
        if reported.insert(rendered.clone()) {
            self.bound.fetch_min(length, Ordering::Relaxed);
            // The consumer may have hung up already.
            let _ = sender.send(rendered);
        }
    }
}

/// One rotated and possibly inverted copy of the query, searched by one
/// worker thread.
struct SearchInstance {
    tables: Arc<SearchTables>,
    symmetries: Arc<SymmetryGroup>,
    shared: Arc<SharedSearch>,
    sender: Sender<String>,
    start: CubieCube,
    rotations: usize,
    inverted: bool,
    moves1: Vec<Move>,
    moves2: Vec<Move>,
    nodes_visited: u64,
}

impl SearchInstance {
    fn run(mut self) {
        let now = Instant::now();
        let mut depth = 0;
        while depth < self.shared.bound.load(Ordering::Relaxed) && !self.shared.stop_requested() {
            debug!(working!("Searching depth {}..."), depth);
            let start = self.start;
            self.phase1(&start, depth);
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                self.nodes_visited,
                now.elapsed().as_secs_f64()
            );
            depth += 1;
        }
    }

    fn phase1(&mut self, current: &CubieCube, togo: usize) {
        if self.shared.stop_requested() {
            return;
        }
        if log_enabled!(Level::Debug) {
            self.nodes_visited += 1;
        }
        let corner = self.tables.corner_ori.lower_bound(Coords::corner_ori(current));
        let edge = self
            .tables
            .edge_ori
            .lower_bound(self.tables.coords.edge_ori_slice(current));
        let cost = usize::from(corner.max(edge));
        if cost == 0 {
            self.transition(current);
        } else if cost <= togo {
            for m in ALL_MOVES {
                if self
                    .moves1
                    .last()
                    .is_some_and(|&prev| !allowed_successor(prev, m))
                {
                    continue;
                }
                let mut child = *current;
                child.apply_move(m);
                self.moves1.push(m);
                self.phase1(&child, togo - 1);
                self.moves1.pop();
            }
        }
    }

    /// Runs phase 2 to increasing depths under the shared bound. The state
    /// is already inside the subgroup here.
    fn transition(&mut self, current: &CubieCube) {
        // A phase 1 prefix ending in a subgroup move reaches a state that a
        // shorter prefix already transitioned from.
        if self.moves1.last().is_some_and(|&m| is_phase2_move(m)) {
            return;
        }
        let ranks = (Coords::corner_perm(current), Coords::edge_perm(current));
        let mut depth = 0;
        while self.moves1.len() + depth < self.shared.bound.load(Ordering::Relaxed)
            && !self.shared.stop_requested()
        {
            self.phase2(ranks, depth);
            depth += 1;
        }
    }

    fn phase2(&mut self, ranks: (usize, usize), togo: usize) {
        if self.shared.stop_requested() {
            return;
        }
        if log_enabled!(Level::Debug) {
            self.nodes_visited += 1;
        }
        let (corner, edge) = ranks;
        let cost = usize::from(
            self.tables
                .corner_perm
                .lower_bound(corner)
                .max(self.tables.edge_perm.lower_bound(edge)),
        );
        if cost == 0 {
            self.emit();
        } else if cost <= togo {
            for m in PHASE2_MOVES {
                let prev = self.moves2.last().or(self.moves1.last());
                if prev.is_some_and(|&prev| !allowed_successor(prev, m)) {
                    continue;
                }
                let next = (
                    self.tables.corner_moves.apply(corner, m),
                    self.tables.edge_moves.apply(edge, m),
                );
                self.moves2.push(m);
                self.phase2(next, togo - 1);
                self.moves2.pop();
            }
        }
    }

    /// Maps the current move path back into the frame of the queried state
    /// and reports it.
    fn emit(&self) {
        let mut moves: Vec<Move> = self.moves1.iter().chain(&self.moves2).copied().collect();
        if self.inverted {
            moves.reverse();
            for m in &mut moves {
                *m = m.inverted();
            }
        }
        for m in &mut moves {
            *m = self.symmetries.remap_move_after_rotation(*m, self.rotations);
        }

        let mut rendered = String::new();
        for m in &moves {
            let _ = write!(rendered, "{m} ");
        }
        let _ = write!(rendered, "({})", moves.len());
        self.shared.report(rendered, moves.len(), &self.sender);
    }
}

/// Hands out parallel two-phase searches over shared tables.
pub struct Solver {
    tables: Arc<SearchTables>,
    symmetries: Arc<SymmetryGroup>,
}

impl Solver {
    /// Loads or generates the lookup tables cached under `table_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error when a cached table can neither be read nor rebuilt.
    pub fn from_table_dir(table_dir: &Path) -> Result<Solver, TableError> {
        Ok(Solver {
            tables: Arc::new(SearchTables::load_or_build(table_dir)?),
            symmetries: Arc::new(SymmetryGroup::new()),
        })
    }

    /// Validates a facelet string and starts solving it.
    ///
    /// # Errors
    ///
    /// Returns an error when the string does not describe a reachable state;
    /// no search is started in that case.
    pub fn solve(&self, facelets: &str) -> Result<Solutions, SolveError> {
        Ok(self.solve_cube(&validate(facelets)?))
    }

    /// Starts parallel symmetry-reduced searches for `cube`.
    ///
    /// States self-symmetric under a long-diagonal rotation skip the two
    /// rotated instances, and states equivalent to their own inverse skip
    /// the inverse direction.
    #[must_use]
    pub fn solve_cube(&self, cube: &CubieCube) -> Solutions {
        let class = self.symmetries.classify(cube);
        let rotation_choices: &[usize] = if class.has_long_diagonal_symmetry() {
            &[0]
        } else {
            &[0, 1, 2]
        };
        let inversion_choices: &[bool] = if class.has_anti_symmetry() {
            &[false]
        } else {
            &[false, true]
        };

        let shared = Arc::new(SharedSearch::new());
        let (sender, receiver) = unbounded();

        let mut workers = Vec::new();
        for (&rotation, &inverted) in iproduct!(rotation_choices, inversion_choices) {
            let mut start = *cube;
            for _ in 0..rotation {
                start = self.symmetries.rotate_urf(&start);
            }
            if inverted {
                start = start.inverse();
            }
            let instance = SearchInstance {
                tables: Arc::clone(&self.tables),
                symmetries: Arc::clone(&self.symmetries),
                shared: Arc::clone(&shared),
                sender: sender.clone(),
                start,
                rotations: rotation,
                inverted,
                moves1: Vec::new(),
                moves2: Vec::new(),
                nodes_visited: 0,
            };
            workers.push(thread::spawn(move || instance.run()));
        }
        info!(start!("Searching with {} parallel instances"), workers.len());

        Solutions {
            receiver,
            shared,
            workers,
        }
    }
}

/// Streaming handle over the solutions of one query.
///
/// Iteration blocks until the next solution arrives and ends once every
/// worker has wound down. Each solution is strictly shorter than the one
/// before it.
pub struct Solutions {
    receiver: Receiver<String>,
    shared: Arc<SharedSearch>,
    workers: Vec<JoinHandle<()>>,
}

impl Solutions {
    /// Asks the workers to stop. Takes effect once at least one solution
    /// has been found.
    pub fn cancel(&self) {
        self.shared.cancel.store(true, Ordering::Relaxed);
    }

    /// The channel solutions arrive on, for consumers that need timeouts.
    #[must_use]
    pub fn receiver(&self) -> &Receiver<String> {
        &self.receiver
    }
}

impl Iterator for Solutions {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.receiver.recv().ok()
    }
}

impl Drop for Solutions {
    fn drop(&mut self) {
        self.shared.abandon();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
