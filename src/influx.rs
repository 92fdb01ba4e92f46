use crate::grid::Lattice;
use crate::random::RandomSource;
use cvd_common::{Cell, SimParams, Species};

/// Injects fresh gas into row 0 of `next`.
///
/// Each column independently receives a particle with probability
/// `influx_rate`; the particle is gas B with probability `b_ratio`, gas A
/// otherwise. Empty and gas cells are overwritten. Solids are terminal and
/// keep their value, though the draws are still made.
///
/// Returns the number of particles written.
pub fn inject<R: RandomSource + ?Sized>(
    next: &mut Lattice,
    params: &SimParams,
    rng: &mut R,
) -> usize {
    let b_ratio = params.b_ratio();
    let mut injected = 0;

    for j in 0..next.ny() {
        if rng.uniform() >= params.influx_rate {
            continue;
        }
        let species = if rng.uniform() < b_ratio { Species::B } else { Species::A };

        if next.get(0, j).is_solid() {
            continue;
        }
        next.set(0, j, Cell::gas(species));
        injected += 1;
    }
    injected
}
