use std::collections::VecDeque;

use crate::agent::Agent;
use crate::maze::{manhattan, Maze, Pos};
use crate::path::a_star;

/// Candidate next cells for the opponent: the first step of the shortest
/// path toward its goal, then any traversable 4-neighbors not already
/// listed. A fully cut-off opponent (no path to its corner) gets no
/// candidates and stays put for the tick.
pub fn candidate_moves(maze: &Maze, from: Pos, goal: Pos) -> Vec<Pos> {
    let path = a_star(maze, from, goal);
    if path.is_empty() {
        return Vec::new();
    }
    let mut candidates = vec![path[0]];
    for next in maze.neighbors(from) {
        if !candidates.contains(&next) {
            candidates.push(next);
        }
    }
    candidates
}

/// Depth-limited alternating search. The opponent maximizes; each of its
/// moves carries a 10x goal-distance-improvement bonus and a -1 penalty
/// for re-entering a recently visited cell (the goal itself is exempt).
/// The human minimizes with no such shaping. Leaves are scored by
/// `d(human, human_goal) - d(opponent, opponent_goal)`, so positive values
/// favor the opponent.
pub fn minimax(
    maze: &Maze,
    depth: u32,
    maximizing: bool,
    opponent: Pos,
    human: Pos,
    recent: &VecDeque<Pos>,
) -> f64 {
    let opponent_goal = maze.top_left();
    let human_goal = maze.bottom_right();

    if depth == 0 || opponent == opponent_goal || human == human_goal {
        return manhattan(human, human_goal) as f64 - manhattan(opponent, opponent_goal) as f64;
    }

    if maximizing {
        let mut best = f64::NEG_INFINITY;
        for next in maze.neighbors(opponent) {
            let gain = manhattan(opponent, opponent_goal) as f64
                - manhattan(next, opponent_goal) as f64;
            let penalty = if recent.contains(&next) && next != opponent_goal {
                -1.0
            } else {
                0.0
            };
            let value =
                minimax(maze, depth - 1, false, next, human, recent) + 10.0 * gain + penalty;
            if value > best {
                best = value;
            }
        }
        best
    } else {
        let mut best = f64::INFINITY;
        for next in maze.neighbors(human) {
            let value = minimax(maze, depth - 1, true, opponent, next, recent);
            if value < best {
                best = value;
            }
        }
        best
    }
}

/// Pick the opponent's next cell, or None when it has no candidates.
/// If the goal corner is one step away, take it without searching.
/// Otherwise each candidate is scored by the search value for the human's
/// best reply plus the same distance bonus and recency penalty the deeper
/// plies use; ties keep the earliest candidate in enumeration order.
pub fn choose_move(maze: &Maze, opponent: &Agent, human: Pos, depth: u32) -> Option<Pos> {
    let goal = maze.top_left();
    let candidates = candidate_moves(maze, opponent.pos, goal);
    if candidates.is_empty() {
        return None;
    }

    if candidates.contains(&goal) {
        return Some(goal);
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best = opponent.pos;
    for &candidate in &candidates {
        let gain =
            manhattan(opponent.pos, goal) as f64 - manhattan(candidate, goal) as f64;
        let penalty = if opponent.recently_visited(candidate) && candidate != goal {
            -1.0
        } else {
            0.0
        };
        let score = minimax(maze, depth, false, candidate, human, opponent.recent())
            + 10.0 * gain
            + penalty;
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    #[test]
    fn path_step_leads_candidate_list() {
        let maze = Maze::new(4);
        let candidates = candidate_moves(&maze, Pos::new(3, 3), maze.top_left());
        // A* first step (Up, by enumeration order) is listed first, the
        // remaining neighbors follow without duplicates.
        assert_eq!(candidates[0], Pos::new(2, 3));
        assert!(candidates.contains(&Pos::new(3, 2)));
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn boxed_in_opponent_has_no_candidates() {
        let mut maze = Maze::new(4);
        maze.set(Pos::new(2, 3), Cell::Wall);
        maze.set(Pos::new(3, 2), Cell::Wall);
        assert!(candidate_moves(&maze, Pos::new(3, 3), maze.top_left()).is_empty());
    }

    #[test]
    fn goal_in_reach_short_circuits_the_search() {
        // Walls everywhere except a corridor so the only candidate from
        // (0,1) is the goal itself.
        let mut maze = Maze::new(4);
        for row in 0..4 {
            for col in 0..4 {
                maze.set(Pos::new(row, col), Cell::Wall);
            }
        }
        maze.set(Pos::new(0, 0), Cell::Open);
        maze.set(Pos::new(0, 1), Cell::Open);
        let opponent = Agent::new(Pos::new(0, 1));
        let chosen = choose_move(&maze, &opponent, Pos::new(3, 3), 2);
        assert_eq!(chosen, Some(Pos::new(0, 0)));
    }

    #[test]
    fn open_grid_opponent_heads_for_its_corner() {
        let maze = Maze::new(6);
        let opponent = Agent::new(Pos::new(5, 5));
        let chosen = choose_move(&maze, &opponent, Pos::new(0, 0), 2).unwrap();
        // Either orthogonal step shrinks the distance; the pick must.
        assert_eq!(manhattan(chosen, maze.top_left()), 9);
    }

    #[test]
    fn recency_penalty_breaks_ties_between_equal_moves() {
        // On an open grid both Up and Left from (3,3) shrink the goal
        // distance equally and see the same search value. Up comes first
        // in enumeration order and would win the tie, unless it was
        // recently visited.
        let maze = Maze::new(10);
        let mut opponent = Agent::new(Pos::new(2, 3));
        opponent.record_position();
        opponent.pos = Pos::new(3, 3);

        let chosen = choose_move(&maze, &opponent, Pos::new(5, 5), 1).unwrap();
        assert_eq!(chosen, Pos::new(3, 2), "penalized cell must lose the tie");

        opponent.clear_recent();
        let chosen = choose_move(&maze, &opponent, Pos::new(5, 5), 1).unwrap();
        assert_eq!(chosen, Pos::new(2, 3), "without history the path step wins");
    }

    #[test]
    fn leaf_value_measures_relative_advantage() {
        let maze = Maze::new(10);
        let recent = VecDeque::new();
        let value = minimax(&maze, 0, true, Pos::new(9, 9), Pos::new(0, 0), &recent);
        assert_eq!(value, 0.0);
        let value = minimax(&maze, 0, true, Pos::new(1, 0), Pos::new(0, 0), &recent);
        assert_eq!(value, 17.0);
    }
}
