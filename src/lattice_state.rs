use crate::grid::Lattice;

/// Per-cell flag: a gas particle moved into this cell during the current
/// step's transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedMask {
    ny: usize,
    flags: Vec<bool>,
}

impl MovedMask {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            ny,
            flags: vec![false; nx * ny],
        }
    }

    #[inline]
    pub fn mark(&mut self, i: usize, j: usize) {
        self.flags[i * self.ny + j] = true;
    }

    #[inline]
    pub fn is_marked(&self, i: usize, j: usize) -> bool {
        self.flags[i * self.ny + j]
    }

    pub fn marked_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn clear(&mut self) {
        self.flags.fill(false);
    }
}

/// Double-buffered lattice plus the moved mask.
///
/// During a step `current` is the committed state of the previous step and is
/// only read; every stage writes into `next`. [`LatticeState::swap_buffers`]
/// commits the step.
#[derive(Debug, Clone)]
pub struct LatticeState {
    // --- Ping-Pong Buffers ---
    pub current: Lattice,
    pub next: Lattice,

    pub moved: MovedMask,
}

impl LatticeState {
    /// All-empty buffers and an all-false mask.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            current: Lattice::new(nx, ny),
            next: Lattice::new(nx, ny),
            moved: MovedMask::new(nx, ny),
        }
    }

    /// Loads `next` with a copy of `current` so unchanged cells carry over.
    pub fn begin_step(&mut self) {
        self.next.copy_from(&self.current);
    }

    /// Commits the step: `next` becomes `current` and the mask is reset.
    pub fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.moved.clear();
    }
}
