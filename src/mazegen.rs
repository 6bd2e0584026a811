use rand::Rng;

use crate::maze::{Cell, Maze, Pos};
use crate::path::a_star;

const WALL_PROB: f64 = 0.3;
const BONUS_PROB: f64 = 0.05;
const TRAP_PROB: f64 = 0.05;

/// Random wall layout: each cell is Wall with probability 0.3, then the
/// corner itself and its two orthogonal neighbors are forced Open at both
/// start corners so neither token ever spawns walled in.
pub fn generate_layout(size: usize, rng: &mut impl Rng) -> Maze {
    let mut maze = Maze::new(size);
    for row in 0..size {
        for col in 0..size {
            if rng.gen::<f64>() < WALL_PROB {
                maze.set(Pos::new(row, col), Cell::Wall);
            }
        }
    }

    let n = size - 1;
    for pos in [
        Pos::new(0, 0),
        Pos::new(0, 1),
        Pos::new(1, 0),
        Pos::new(n, n),
        Pos::new(n, n - 1),
        Pos::new(n - 1, n),
    ] {
        maze.set(pos, Cell::Open);
    }
    maze
}

/// Scatter Bonus and Trap tiles over the interior (the border ring is left
/// alone, which also keeps the corner clearances intact). The two draws are
/// sequential: the Trap draw only happens for cells that failed the Bonus
/// draw, so the effective Trap rate is 0.95 * 0.05.
pub fn scatter_items(maze: &mut Maze, rng: &mut impl Rng) {
    let size = maze.size();
    for row in 1..size - 1 {
        for col in 1..size - 1 {
            let pos = Pos::new(row, col);
            if rng.gen::<f64>() < BONUS_PROB {
                maze.set(pos, Cell::Bonus);
            } else if rng.gen::<f64>() < TRAP_PROB {
                maze.set(pos, Cell::Trap);
            }
        }
    }
}

/// Keep rolling candidate mazes until one connects the two corners.
/// Unbounded retry; with 70% of cells open a 10x10 grid converges in a
/// handful of attempts.
pub fn generate_solvable(size: usize, rng: &mut impl Rng) -> Maze {
    loop {
        let mut maze = generate_layout(size, rng);
        scatter_items(&mut maze, rng);
        if !a_star(&maze, maze.top_left(), maze.bottom_right()).is_empty() {
            return maze;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn corner_clearance_survives_any_layout() {
        // StepRng(0, 0) draws 0.0 forever, so every cell wants to be a Wall.
        let mut rng = StepRng::new(0, 0);
        let maze = generate_layout(10, &mut rng);
        for pos in [
            Pos::new(0, 0),
            Pos::new(0, 1),
            Pos::new(1, 0),
            Pos::new(9, 9),
            Pos::new(9, 8),
            Pos::new(8, 9),
        ] {
            assert_eq!(maze.get(pos), Cell::Open);
        }
    }

    #[test]
    fn corner_clearance_across_seeds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generate_layout(10, &mut rng);
            for pos in [
                Pos::new(0, 0),
                Pos::new(0, 1),
                Pos::new(1, 0),
                Pos::new(9, 9),
                Pos::new(9, 8),
                Pos::new(8, 9),
            ] {
                assert_ne!(maze.get(pos), Cell::Wall, "seed {seed} walled a corner");
            }
        }
    }

    #[test]
    fn bonus_draw_shadows_trap_draw() {
        // All-zero draws succeed the Bonus check on every interior cell,
        // so the Trap branch is never reached.
        let mut rng = StepRng::new(0, 0);
        let mut maze = Maze::new(10);
        scatter_items(&mut maze, &mut rng);
        let mut bonuses = 0;
        for row in 0..10 {
            for col in 0..10 {
                let cell = maze.get(Pos::new(row, col));
                assert_ne!(cell, Cell::Trap);
                if cell == Cell::Bonus {
                    assert!((1..9).contains(&row) && (1..9).contains(&col));
                    bonuses += 1;
                }
            }
        }
        assert_eq!(bonuses, 64, "every interior cell becomes Bonus");
    }

    #[test]
    fn border_ring_never_gets_items() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut maze = Maze::new(10);
            scatter_items(&mut maze, &mut rng);
            for i in 0..10 {
                for pos in [
                    Pos::new(0, i),
                    Pos::new(9, i),
                    Pos::new(i, 0),
                    Pos::new(i, 9),
                ] {
                    assert_eq!(maze.get(pos), Cell::Open);
                }
            }
        }
    }

    #[test]
    fn item_rates_are_plausible() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut maze = Maze::new(50);
        scatter_items(&mut maze, &mut rng);
        let mut bonuses = 0;
        let mut traps = 0;
        for row in 1..49 {
            for col in 1..49 {
                match maze.get(Pos::new(row, col)) {
                    Cell::Bonus => bonuses += 1,
                    Cell::Trap => traps += 1,
                    _ => {}
                }
            }
        }
        // 2304 interior cells; expectation ~115 bonuses, ~109 traps.
        assert!((60..180).contains(&bonuses), "bonuses = {bonuses}");
        assert!((50..170).contains(&traps), "traps = {traps}");
    }

    #[test]
    fn factory_output_is_always_solvable() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let maze = generate_solvable(10, &mut rng);
            let path = a_star(&maze, maze.top_left(), maze.bottom_right());
            assert!(!path.is_empty(), "seed {seed} produced an unsolvable maze");
            assert_eq!(*path.last().unwrap(), maze.bottom_right());
        }
    }
}
