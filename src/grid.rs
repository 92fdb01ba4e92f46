use cvd_common::{Cell, Census, Species};
use rayon::prelude::*;

/// Fixed-size 2D lattice of cells, stored row-major.
///
/// Row 0 is the top (gas inlet), row `nx - 1` the bottom boundary the film
/// grows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    nx: usize,
    ny: usize,
    cells: Vec<Cell>,
}

/// Which solid species are present around a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolidNeighbors {
    pub a: bool,
    pub b: bool,
}

impl SolidNeighbors {
    #[inline]
    pub fn has(&self, species: Species) -> bool {
        match species {
            Species::A => self.a,
            Species::B => self.b,
        }
    }
}

impl Lattice {
    /// All-empty lattice of `nx` rows by `ny` columns.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            cells: vec![Cell::Empty; nx * ny],
        }
    }

    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline(always)]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.nx && j < self.ny);
        i * self.ny + j
    }

    #[inline]
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.nx && j < self.ny
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Cell {
        self.cells[self.index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, cell: Cell) {
        let idx = self.index(i, j);
        self.cells[idx] = cell;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn row(&self, i: usize) -> &[Cell] {
        let start = i * self.ny;
        &self.cells[start..start + self.ny]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.ny)
    }

    /// Overwrites this lattice with `other`. Both must have the same shape.
    pub fn copy_from(&mut self, other: &Lattice) {
        debug_assert_eq!((self.nx, self.ny), (other.nx, other.ny));
        self.cells.copy_from_slice(&other.cells);
    }

    /// Calls `f` for every cell in the 3x3 block centred on `(i, j)`, clipped
    /// at the lattice edges. The centre cell is included.
    #[inline]
    pub fn for_each_neighbor<F>(&self, i: usize, j: usize, mut f: F)
    where
        F: FnMut(Cell),
    {
        let row_lo = i.saturating_sub(1);
        let row_hi = (i + 1).min(self.nx - 1);
        let col_lo = j.saturating_sub(1);
        let col_hi = (j + 1).min(self.ny - 1);

        for r in row_lo..=row_hi {
            let row = self.row(r);
            for &cell in &row[col_lo..=col_hi] {
                f(cell);
            }
        }
    }

    /// Solid species present in the clipped 3x3 neighborhood of `(i, j)`.
    pub fn solid_neighbors(&self, i: usize, j: usize) -> SolidNeighbors {
        let mut found = SolidNeighbors::default();
        self.for_each_neighbor(i, j, |cell| match cell {
            Cell::SolidA => found.a = true,
            Cell::SolidB => found.b = true,
            _ => {}
        });
        found
    }

    /// Population by state, counted in parallel over rows.
    pub fn census(&self) -> Census {
        self.cells
            .par_chunks(self.ny)
            .map(|row| {
                let mut census = Census::default();
                for cell in row {
                    match cell {
                        Cell::Empty => census.empty += 1,
                        Cell::GasA => census.gas_a += 1,
                        Cell::GasB => census.gas_b += 1,
                        Cell::SolidA => census.solid_a += 1,
                        Cell::SolidB => census.solid_b += 1,
                    }
                }
                census
            })
            .reduce(Census::default, Census::merge)
    }

    /// Copy with all gas cleared: only the deposited film remains.
    pub fn film(&self) -> Lattice {
        Lattice {
            nx: self.nx,
            ny: self.ny,
            cells: self
                .cells
                .iter()
                .map(|&c| if c.is_gas() { Cell::Empty } else { c })
                .collect(),
        }
    }

    /// Row-major cell codes, the external encoding used by snapshots.
    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.code()).collect()
    }
}
