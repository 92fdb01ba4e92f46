use crate::lattice_state::LatticeState;
use crate::random::RandomSource;
use cvd_common::Cell;

/// One synchronized random-walk step for every gas particle of `current`.
///
/// Rows are swept from `nx - 2` up to 0 so a cell vacated lower down is free
/// for the row above within the same step. Each particle draws a lateral
/// offset in {-1, 0, +1} and moves one row down onto `(i + 1, j + offset)`
/// when that cell of `next` is empty and in bounds; otherwise it stays.
/// Successful moves are recorded in the moved mask.
///
/// Returns the number of particles moved.
pub fn advance<R: RandomSource + ?Sized>(state: &mut LatticeState, rng: &mut R) -> usize {
    let LatticeState { current, next, moved } = state;
    let nx = current.nx();
    let ny = current.ny() as isize;
    let mut moves = 0;

    if nx < 2 {
        return 0;
    }

    for i in (0..nx - 1).rev() {
        for j in 0..current.ny() {
            let source = current.get(i, j);
            if !source.is_gas() {
                continue;
            }

            let target_j = j as isize + rng.lateral_offset();
            if target_j < 0 || target_j >= ny {
                continue;
            }
            let target_j = target_j as usize;

            if next.get(i + 1, target_j) != Cell::Empty {
                continue;
            }
            next.set(i + 1, target_j, source);
            next.set(i, j, Cell::Empty);
            moved.mark(i + 1, target_j);
            moves += 1;
        }
    }
    moves
}
