use crate::grid::{Lattice, SolidNeighbors};
use crate::random::RandomSource;
use cvd_common::{Cell, StickingCoefficients};

/// Sticking probability that applies to `cell` at row `i`, or `None` when
/// the cell is not gas or has nothing to stick to.
///
/// Precedence: bottom row, then a solid of the other species, then a solid of
/// the same species. The checks are exclusive; a gas next to both solid
/// species only ever uses the cross-species coefficient.
pub fn capture_probability(
    cell: Cell,
    i: usize,
    nx: usize,
    around: SolidNeighbors,
    sticking: &StickingCoefficients,
) -> Option<f64> {
    if !cell.is_gas() {
        return None;
    }
    let species = cell.species()?;

    if i == nx - 1 {
        Some(sticking.boundary(species))
    } else if around.has(species.other()) {
        Some(sticking.cross(species))
    } else if around.has(species) {
        Some(sticking.same(species))
    } else {
        None
    }
}

/// Row-major sweep over `next`, promoting gas cells to solid in place.
///
/// Neighborhoods are read from `next` as it is being updated, so a cell that
/// solidified earlier in the sweep already counts as solid for the cells
/// after it. A random draw is made only when a capture rule applies.
///
/// Returns the number of cells solidified.
pub fn solidify<R: RandomSource + ?Sized>(
    next: &mut Lattice,
    sticking: &StickingCoefficients,
    rng: &mut R,
) -> usize {
    let nx = next.nx();
    let mut solidified = 0;

    for i in 0..nx {
        for j in 0..next.ny() {
            let cell = next.get(i, j);
            if !cell.is_gas() {
                continue;
            }
            let around = next.solid_neighbors(i, j);
            let Some(p) = capture_probability(cell, i, nx, around, sticking) else {
                continue;
            };
            if rng.uniform() < p {
                next.set(i, j, cell.solidified());
                solidified += 1;
            }
        }
    }
    solidified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceSource;

    fn only(field: &str) -> StickingCoefficients {
        let mut s = StickingCoefficients::uniform(0.0);
        match field {
            "a" => s.prob_a = 1.0,
            "b" => s.prob_b = 1.0,
            "ab" => s.prob_ab = 1.0,
            "ba" => s.prob_ba = 1.0,
            "aa" => s.prob_aa = 1.0,
            "bb" => s.prob_bb = 1.0,
            _ => unreachable!(),
        }
        s
    }

    #[test]
    fn cross_species_takes_precedence() {
        let both = SolidNeighbors { a: true, b: true };
        let s = StickingCoefficients {
            prob_a: 0.1,
            prob_b: 0.2,
            prob_ab: 0.3,
            prob_ba: 0.4,
            prob_aa: 0.5,
            prob_bb: 0.6,
        };
        assert_eq!(capture_probability(Cell::GasA, 0, 3, both, &s), Some(0.3));
        assert_eq!(capture_probability(Cell::GasB, 0, 3, both, &s), Some(0.4));
        // bottom row wins over any neighbor
        assert_eq!(capture_probability(Cell::GasA, 2, 3, both, &s), Some(0.1));
        assert_eq!(capture_probability(Cell::GasB, 2, 3, both, &s), Some(0.2));
        assert_eq!(capture_probability(Cell::SolidA, 2, 3, both, &s), None);
        assert_eq!(capture_probability(Cell::GasA, 0, 3, SolidNeighbors::default(), &s), None);
    }

    #[test]
    fn gas_a_between_both_solids_uses_prob_ab_only() {
        let mut lattice = Lattice::new(3, 3);
        lattice.set(1, 0, Cell::SolidA);
        lattice.set(1, 2, Cell::SolidB);
        lattice.set(1, 1, Cell::GasA);

        let mut blocked = lattice.clone();
        assert_eq!(solidify(&mut blocked, &only("aa"), &mut SequenceSource::constant(0.5, 0)), 0);
        assert_eq!(blocked.get(1, 1), Cell::GasA);

        assert_eq!(solidify(&mut lattice, &only("ab"), &mut SequenceSource::constant(0.5, 0)), 1);
        assert_eq!(lattice.get(1, 1), Cell::SolidA);
    }

    #[test]
    fn gas_b_between_both_solids_uses_prob_ba_only() {
        let mut lattice = Lattice::new(3, 3);
        lattice.set(0, 0, Cell::SolidA);
        lattice.set(0, 2, Cell::SolidB);
        lattice.set(0, 1, Cell::GasB);

        let mut blocked = lattice.clone();
        solidify(&mut blocked, &only("bb"), &mut SequenceSource::constant(0.5, 0));
        assert_eq!(blocked.get(0, 1), Cell::GasB);

        solidify(&mut lattice, &only("ba"), &mut SequenceSource::constant(0.5, 0));
        assert_eq!(lattice.get(0, 1), Cell::SolidB);
    }

    #[test]
    fn bottom_row_capture() {
        let mut lattice = Lattice::new(2, 2);
        lattice.set(1, 0, Cell::GasA);
        lattice.set(1, 1, Cell::GasB);
        solidify(&mut lattice, &only("a"), &mut SequenceSource::constant(0.5, 0));
        assert_eq!(lattice.row(1), &[Cell::SolidA, Cell::GasB]);
    }

    #[test]
    fn isolated_gas_consumes_no_draws() {
        let mut lattice = Lattice::new(3, 3);
        lattice.set(0, 0, Cell::GasA);
        lattice.set(2, 2, Cell::GasB);
        // the only draw belongs to the bottom-row particle
        let mut rng = SequenceSource::new([0.0], []).with_fallback(0.99, 0);
        let n = solidify(&mut lattice, &StickingCoefficients::uniform(0.5), &mut rng);
        assert_eq!(n, 1);
        assert_eq!(lattice.get(0, 0), Cell::GasA);
        assert_eq!(lattice.get(2, 2), Cell::SolidB);
    }

    #[test]
    fn earlier_solidification_seeds_later_cells() {
        // (0,1) sticks to the solid at (0,0); (0,2) is out of reach of
        // (0,0) and only sticks because (0,1) turned solid earlier in the
        // same sweep.
        let mut lattice = Lattice::new(3, 3);
        lattice.set(0, 0, Cell::SolidA);
        lattice.set(0, 1, Cell::GasA);
        lattice.set(0, 2, Cell::GasA);

        let n = solidify(&mut lattice, &only("aa"), &mut SequenceSource::constant(0.5, 0));
        assert_eq!(n, 2);
        assert_eq!(lattice.row(0), &[Cell::SolidA, Cell::SolidA, Cell::SolidA]);
    }
}
