//! Mineral kinds, resource vectors and planetary reserves.

use crate::constants::MINERAL_SIZE_FACTOR;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Number of mineral kinds in the game
pub const MINERAL_COUNT: usize = 8;

/// The eight mineable resources, in ledger order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mineral {
    Duranium,
    Neutronium,
    Tritanium,
    Corundium,
    Corbomite,
    Sorium,
    Gallicite,
    Uridium,
}

impl Mineral {
    pub const ALL: [Mineral; MINERAL_COUNT] = [
        Mineral::Duranium,
        Mineral::Neutronium,
        Mineral::Tritanium,
        Mineral::Corundium,
        Mineral::Corbomite,
        Mineral::Sorium,
        Mineral::Gallicite,
        Mineral::Uridium,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Mineral::Duranium => "Duranium",
            Mineral::Neutronium => "Neutronium",
            Mineral::Tritanium => "Tritanium",
            Mineral::Corundium => "Corundium",
            Mineral::Corbomite => "Corbomite",
            Mineral::Sorium => "Sorium",
            Mineral::Gallicite => "Gallicite",
            Mineral::Uridium => "Uridium",
        }
    }
}

impl fmt::Display for Mineral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One quantity per mineral kind.
///
/// Entries are kept non-negative between operations. Spending is
/// all-or-nothing: callers check [`ResourceVector::is_sufficient`] first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceVector(pub [f64; MINERAL_COUNT]);

impl ResourceVector {
    pub const ZERO: Self = Self([0.0; MINERAL_COUNT]);

    pub fn new(values: [f64; MINERAL_COUNT]) -> Self {
        Self(values)
    }

    /// Same quantity of every mineral
    pub fn splat(value: f64) -> Self {
        Self([value; MINERAL_COUNT])
    }

    /// True iff every component of `self` covers the matching component of `required`
    pub fn is_sufficient(&self, required: &ResourceVector) -> bool {
        self.0.iter().zip(required.0.iter()).all(|(have, need)| have >= need)
    }

    pub fn add(&mut self, other: &ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b;
        }
    }

    /// Subtract `other`, clamping every entry at zero.
    pub fn deduct(&mut self, other: &ResourceVector) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a = (*a - b).max(0.0);
        }
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v <= 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mineral, f64)> + '_ {
        Mineral::ALL.iter().map(move |m| (*m, self.0[m.index()]))
    }
}

impl Index<Mineral> for ResourceVector {
    type Output = f64;
    fn index(&self, mineral: Mineral) -> &f64 {
        &self.0[mineral.index()]
    }
}

impl IndexMut<Mineral> for ResourceVector {
    fn index_mut(&mut self, mineral: Mineral) -> &mut f64 {
        &mut self.0[mineral.index()]
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// Mineable reserves of a planet: remaining quantity and accessibility per mineral
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Minerals {
    pub quantity: ResourceVector,
    /// Fraction of the per-mine rate that can be extracted (0.0 - 1.0)
    pub accessibility: ResourceVector,
}

impl Minerals {
    /// Seed the reserves of a planet from its mass.
    ///
    /// Homeworlds always get a large quantity and good accessibility of every
    /// mineral; other bodies may lack any mineral entirely.
    pub fn randomized(mass: f64, homeworld: bool, rng: &mut impl Rng) -> Self {
        let mut minerals = Self::default();

        if homeworld {
            for m in Mineral::ALL {
                let mut quantity = (rng.gen_range(100_000..200_000) / 10_000 * 10_000) as f64;
                while rng.gen::<f64>() > 0.2 {
                    quantity += rng.gen_range(10_000..20_000) as f64;
                }
                minerals.quantity[m] = quantity;
                minerals.accessibility[m] = rng.gen_range(4..=10) as f64 / 10.0;
            }
            return minerals;
        }

        let richness = rng.gen::<f64>().min(mass / MINERAL_SIZE_FACTOR);
        for m in Mineral::ALL {
            if rng.gen::<f64>() < richness {
                continue;
            }
            let mut quantity = 0.0;
            while rng.gen::<f64>() > 0.5 {
                quantity += rng.gen_range(0.0..100_000.0);
            }
            minerals.quantity[m] = quantity;
            if quantity > 0.0 {
                minerals.accessibility[m] = rng.gen_range(1..=10) as f64 / 10.0;
            }
        }
        minerals
    }

    /// Extract one day's worth of minerals.
    ///
    /// Each mineral yields `min(accessibility * productivity, reserve)`; the
    /// reserve shrinks by exactly what is returned.
    pub fn mine_tick(&mut self, productivity: f64) -> ResourceVector {
        let mut extracted = ResourceVector::ZERO;
        for i in 0..MINERAL_COUNT {
            let reserve = self.quantity.0[i];
            let amount = (self.accessibility.0[i] * productivity.max(0.0)).min(reserve).max(0.0);
            extracted.0[i] = amount;
            self.quantity.0[i] = (reserve - amount).max(0.0);
        }
        extracted
    }

    /// Minerals with a nonzero quantity or accessibility
    pub fn present(&self) -> Vec<Mineral> {
        Mineral::ALL
            .into_iter()
            .filter(|m| self.quantity[*m] != 0.0 || self.accessibility[*m] != 0.0)
            .collect()
    }
}
