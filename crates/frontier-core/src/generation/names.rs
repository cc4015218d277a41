//! Name generation utilities

use rand::Rng;
use std::collections::HashSet;

/// Random draws before falling back to numbered names
const MAX_NAME_ATTEMPTS: usize = 1_000;

/// Generate a system name that is not yet in `used`, and record it.
///
/// Once random draws keep colliding, a used name gets a `-n` suffix.
pub fn generate_system_name(used: &mut HashSet<String>, rng: &mut impl Rng) -> String {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let name = random_system_name(rng);
        if used.insert(name.clone()) {
            return name;
        }
    }

    let base = random_system_name(rng);
    log::debug!("System names exhausted, numbering {}", base);
    // At most used.len() suffixes can collide
    let mut suffix = 2;
    loop {
        let name = format!("{}-{}", base, suffix);
        if used.insert(name.clone()) {
            return name;
        }
        suffix += 1;
    }
}

fn random_system_name(rng: &mut impl Rng) -> String {
    let prefix = SYSTEM_PREFIXES[rng.gen_range(0..SYSTEM_PREFIXES.len())];
    format!("{} {}", prefix, rng.gen_range(100..1000))
}

/// Name of the `index`-th planet (0-based) of a system
pub fn planet_name(system_name: &str, index: usize) -> String {
    match ROMAN_NUMERALS.get(index) {
        Some(numeral) => format!("{} {}", system_name, numeral),
        None => format!("{} {}", system_name, index + 1),
    }
}

// Catalogue prefixes of real nearby stars
static SYSTEM_PREFIXES: &[&str] = &[
    "Wolf", "Luyten", "Gliese", "HIP", "HD", "WX", "Cygni", "Alpha", "HR", "EQ", "Struve",
    "Lalande", "GJ", "SCR",
];

static ROMAN_NUMERALS: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X"];
