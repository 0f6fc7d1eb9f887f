use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Accumulated potential energy and virial of a set of Lennard-Jones pairs.
///
/// When `overlap` is set the configuration contains a hard-core clash and `pot`/`vir` carry no
/// meaning. Combining anything with an overlapping result yields an overlapping result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyResult {
    pub pot: f64,
    pub vir: f64,
    pub overlap: bool,
}

impl EnergyResult {
    pub fn new(pot: f64, vir: f64) -> Self {
        Self {
            pot,
            vir,
            overlap: false,
        }
    }

    pub fn overlapping() -> Self {
        Self {
            pot: 0.0,
            vir: 0.0,
            overlap: true,
        }
    }

    #[inline]
    pub fn is_overlap(&self) -> bool {
        self.overlap
    }
}

impl Add for EnergyResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        if self.overlap || rhs.overlap {
            return Self::overlapping();
        }
        Self::new(self.pot + rhs.pot, self.vir + rhs.vir)
    }
}

impl AddAssign for EnergyResult {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for EnergyResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, term| acc + term)
    }
}
