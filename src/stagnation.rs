use crate::lattice_state::LatticeState;
use cvd_common::Cell;

/// True once the warm-up period is over. `step` is 1-based.
#[inline]
pub fn is_active(step: u32, max_idle_steps: u32) -> bool {
    step > max_idle_steps
}

/// Clears gas that sat still during this step's transport.
///
/// A cell is cleared in `next` when `current` held gas there and nothing moved
/// into it this step. Only the most recent step is looked at; `max_idle_steps`
/// gates the stage as a whole rather than counting idle steps per particle.
/// Does nothing while `step <= max_idle_steps`.
///
/// Returns the number of cells cleared.
pub fn remove_stagnant(state: &mut LatticeState, step: u32, max_idle_steps: u32) -> usize {
    if !is_active(step, max_idle_steps) {
        return 0;
    }

    let LatticeState { current, next, moved } = state;
    let mut removed = 0;

    for i in 0..current.nx() {
        for j in 0..current.ny() {
            if current.get(i, j).is_gas() && !moved.is_marked(i, j) {
                next.set(i, j, Cell::Empty);
                removed += 1;
            }
        }
    }
    removed
}
