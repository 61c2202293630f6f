use std::sync::OnceLock;

use cube::cubie::CubieCube;
use cube::moves::{Move, parse_algorithm};
use itertools::Itertools;
use solver::{Solver, random_scramble, validate};

const SOLVED_FACELETS: &str = "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD";
const SCRAMBLE: &str = "lflburfldfdrllururuflbffdlrbburrdublbudrbdufdfubrdlbdf";

fn shared_solver() -> &'static Solver {
    static SOLVER: OnceLock<Solver> = OnceLock::new();
    SOLVER.get_or_init(|| {
        let dir = std::env::temp_dir().join("twophase-tables-test");
        Solver::from_table_dir(&dir).unwrap()
    })
}

/// Replays a rendered solution against `start` and returns its length.
fn check_solution(start: &CubieCube, rendered: &str) -> usize {
    let (algorithm, length) = rendered.rsplit_once('(').unwrap();
    let length: usize = length.strip_suffix(')').unwrap().parse().unwrap();
    let moves = parse_algorithm(algorithm).unwrap();
    assert_eq!(moves.len(), length);
    let mut cube = *start;
    cube.apply_algorithm(&moves);
    assert!(cube.is_solved(), "{rendered} does not solve the state");
    length
}

#[test_log::test]
fn solved_states_report_an_empty_solution() {
    let solutions = shared_solver().solve(SOLVED_FACELETS).unwrap();
    assert_eq!(solutions.collect_vec(), ["(0)"]);
}

#[test_log::test]
fn single_turn_scrambles_end_at_the_inverse_turn() {
    let mut cube = CubieCube::SOLVED;
    cube.apply_move("R".parse::<Move>().unwrap());
    let solutions = shared_solver().solve_cube(&cube);
    let all = solutions.collect_vec();
    let lengths = all.iter().map(|s| check_solution(&cube, s)).collect_vec();
    assert!(lengths.windows(2).all(|pair| pair[1] < pair[0]));
    assert_eq!(all.last().unwrap(), "R' (1)");
}

#[test_log::test]
fn scrambled_states_solve_and_keep_improving() {
    let start = validate(SCRAMBLE).unwrap();
    let mut solutions = shared_solver().solve_cube(&start);
    let first = solutions.next().unwrap();
    let mut lengths = vec![check_solution(&start, &first)];
    solutions.cancel();
    for rendered in &mut solutions {
        lengths.push(check_solution(&start, &rendered));
    }
    assert!(lengths.windows(2).all(|pair| pair[1] < pair[0]));
}

#[test_log::test]
fn cancelling_early_still_yields_a_solution() {
    let start = validate(SCRAMBLE).unwrap();
    let solutions = shared_solver().solve_cube(&start);
    solutions.cancel();
    let all = solutions.collect_vec();
    assert!(!all.is_empty());
    for rendered in &all {
        check_solution(&start, rendered);
    }
}

#[test_log::test]
fn random_scrambles_solve() {
    let facelets = random_scramble();
    let start = validate(&facelets).unwrap();
    let mut solutions = shared_solver().solve(&facelets).unwrap();
    let first = solutions.next().unwrap();
    check_solution(&start, &first);
    solutions.cancel();
    for rendered in &mut solutions {
        check_solution(&start, &rendered);
    }
}

#[test]
fn solve_rejects_malformed_input() {
    assert!(shared_solver().solve("UUU").is_err());
}
