use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::maze::{manhattan, Dir, Maze, Pos};

/// Frontier entry. Ordered so the heap pops the lowest f-score first,
/// breaking ties by insertion order for deterministic paths.
struct Node {
    f: usize,
    seq: usize,
    pos: Pos,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A* over the grid: 4-connected, every non-Wall cell costs 1, Manhattan
/// heuristic. Returns the path from `start` to `goal` excluding `start`
/// (the first element is the first step to take), or an empty Vec when
/// `goal` is unreachable.
pub fn a_star(maze: &Maze, start: Pos, goal: Pos) -> Vec<Pos> {
    let n = maze.size();
    let idx = |p: Pos| p.row * n + p.col;

    let mut g = vec![usize::MAX; n * n];
    let mut came_from: Vec<Option<Pos>> = vec![None; n * n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;

    g[idx(start)] = 0;
    heap.push(Node {
        f: manhattan(start, goal),
        seq,
        pos: start,
    });

    while let Some(node) = heap.pop() {
        let current = node.pos;
        if current == goal {
            let mut path = Vec::new();
            let mut cur = current;
            while let Some(prev) = came_from[idx(cur)] {
                path.push(cur);
                cur = prev;
            }
            path.reverse();
            return path;
        }

        for dir in Dir::ALL {
            let next = match maze.step(current, dir) {
                Some(p) => p,
                None => continue,
            };
            if !maze.traversable(next) {
                continue;
            }
            let tentative = g[idx(current)] + 1;
            if tentative < g[idx(next)] {
                g[idx(next)] = tentative;
                came_from[idx(next)] = Some(current);
                seq += 1;
                heap.push(Node {
                    f: tentative + manhattan(next, goal),
                    seq,
                    pos: next,
                });
            }
        }
    }

    Vec::new()
}
