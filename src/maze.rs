#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Fixed enumeration order; candidate and tie-break ordering depend on it.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// (row, col) offset.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Open,
    Wall,
    Bonus,
    Trap,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

pub fn manhattan(a: Pos, b: Pos) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// Square grid of cells, row-major. Replaced wholesale on a shift,
/// mutated in place when a token consumes a Bonus or Trap tile.
#[derive(Clone)]
pub struct Maze {
    size: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Open; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Human start / opponent goal.
    pub fn top_left(&self) -> Pos {
        Pos::new(0, 0)
    }

    /// Opponent start / human goal.
    pub fn bottom_right(&self) -> Pos {
        Pos::new(self.size - 1, self.size - 1)
    }

    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.row * self.size + pos.col]
    }

    pub fn set(&mut self, pos: Pos, cell: Cell) {
        self.cells[pos.row * self.size + pos.col] = cell;
    }

    /// Wall blocks movement; Open, Bonus and Trap do not.
    pub fn traversable(&self, pos: Pos) -> bool {
        self.get(pos) != Cell::Wall
    }

    /// One cell over in `dir`, or None at the edge of the grid.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dr, dc) = dir.delta();
        let row = pos.row as isize + dr;
        let col = pos.col as isize + dc;
        if row < 0 || col < 0 || row >= self.size as isize || col >= self.size as isize {
            return None;
        }
        Some(Pos::new(row as usize, col as usize))
    }

    /// In-bounds traversable 4-neighbors, always in Up, Down, Left, Right order.
    pub fn neighbors(&self, pos: Pos) -> Vec<Pos> {
        let mut out = Vec::with_capacity(4);
        for dir in Dir::ALL {
            if let Some(next) = self.step(pos, dir) {
                if self.traversable(next) {
                    out.push(next);
                }
            }
        }
        out
    }
}
