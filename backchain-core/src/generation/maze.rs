//! 3D voxel maze via recursive backtracking.
//!
//! Every cell starts with all six walls; the walk removes exactly one wall
//! pair per newly visited cell, so the result is a spanning tree over the
//! grid: fully connected with no cycles.

use serde::{Deserialize, Serialize};

use super::rng::Lcg;

/// Wall direction. `North`/`South` are +z/-z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    Up,
    Down,
    North,
    South,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::North,
        Direction::South,
    ];

    pub fn offset(self) -> (i64, i64, i64) {
        match self {
            Direction::East => (1, 0, 0),
            Direction::West => (-1, 0, 0),
            Direction::Up => (0, 1, 0),
            Direction::Down => (0, -1, 0),
            Direction::North => (0, 0, 1),
            Direction::South => (0, 0, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

const ALL_WALLS: u8 = 0b11_1111;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze3D {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    /// Wall bitmask per cell, indexed x-major then y then z
    walls: Vec<u8>,
}

impl Maze3D {
    fn closed(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
            walls: vec![ALL_WALLS; width * height * depth],
        }
    }

    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.height + y) * self.depth + z
    }

    fn neighbor(&self, cell: (usize, usize, usize), dir: Direction) -> Option<(usize, usize, usize)> {
        let (dx, dy, dz) = dir.offset();
        let nx = cell.0 as i64 + dx;
        let ny = cell.1 as i64 + dy;
        let nz = cell.2 as i64 + dz;
        let inside = (0..self.width as i64).contains(&nx)
            && (0..self.height as i64).contains(&ny)
            && (0..self.depth as i64).contains(&nz);
        inside.then_some((nx as usize, ny as usize, nz as usize))
    }

    /// Whether the wall of `(x, y, z)` facing `dir` is still standing.
    /// Out-of-range cells report every wall present.
    pub fn has_wall(&self, x: usize, y: usize, z: usize, dir: Direction) -> bool {
        if x >= self.width || y >= self.height || z >= self.depth {
            return true;
        }
        self.walls[self.index(x, y, z)] & dir.bit() != 0
    }

    fn open(&mut self, cell: (usize, usize, usize), dir: Direction, next: (usize, usize, usize)) {
        let a = self.index(cell.0, cell.1, cell.2);
        let b = self.index(next.0, next.1, next.2);
        self.walls[a] &= !dir.bit();
        self.walls[b] &= !dir.opposite().bit();
    }

    /// Number of open wall pairs between adjacent cells
    pub fn passage_count(&self) -> usize {
        let mut count = 0;
        for x in 0..self.width {
            for y in 0..self.height {
                for z in 0..self.depth {
                    // count each passage once, from its lower cell
                    for dir in [Direction::East, Direction::Up, Direction::North] {
                        if self.neighbor((x, y, z), dir).is_some() && !self.has_wall(x, y, z, dir) {
                            count += 1;
                        }
                    }
                }
            }
        }
        count
    }

    /// Cells reachable from the origin through open walls
    pub fn reachable_count(&self) -> usize {
        if self.walls.is_empty() {
            return 0;
        }
        let mut seen = vec![false; self.walls.len()];
        let mut stack = vec![(0usize, 0usize, 0usize)];
        seen[0] = true;
        let mut count = 0;
        while let Some(cell) = stack.pop() {
            count += 1;
            for dir in Direction::ALL {
                if self.has_wall(cell.0, cell.1, cell.2, dir) {
                    continue;
                }
                if let Some(next) = self.neighbor(cell, dir) {
                    let i = self.index(next.0, next.1, next.2);
                    if !seen[i] {
                        seen[i] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    /// Connected and acyclic
    pub fn is_perfect(&self) -> bool {
        let cells = self.cell_count();
        cells == 0 || (self.reachable_count() == cells && self.passage_count() == cells - 1)
    }
}

/// Carve a perfect maze over a `width × height × depth` grid from `seed`
pub fn generate_3d_maze(width: usize, height: usize, depth: usize, seed: u64) -> Maze3D {
    let mut maze = Maze3D::closed(width, height, depth);
    if maze.cell_count() == 0 {
        return maze;
    }

    let mut rng = Lcg::new(seed);
    let mut visited = vec![false; maze.cell_count()];
    let mut stack = Vec::new();
    let mut current = (0usize, 0usize, 0usize);
    visited[0] = true;

    loop {
        let unvisited: Vec<(Direction, (usize, usize, usize))> = Direction::ALL
            .iter()
            .filter_map(|&dir| maze.neighbor(current, dir).map(|n| (dir, n)))
            .filter(|&(_, n)| !visited[maze.index(n.0, n.1, n.2)])
            .collect();

        if let Some(&(dir, next)) = rng.pick(&unvisited) {
            stack.push(current);
            maze.open(current, dir, next);
            visited[maze.index(next.0, next.1, next.2)] = true;
            current = next;
        } else if let Some(previous) = stack.pop() {
            current = previous;
        } else {
            break;
        }
    }
    maze
}
