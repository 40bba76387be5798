use itertools::Itertools;
use phf::{Map, phf_map};
use std::collections::BTreeMap;

/// Mass assumed for elements missing from the table, in Daltons (carbon).
pub const FALLBACK_MASS: f64 = 12.0;

#[rustfmt::skip]
static ATOMIC_MASSES: Map<&'static str, f64> = phf_map! {
    "H"  => 1.008,
    "C"  => 12.011,
    "N"  => 14.007,
    "O"  => 15.999,
    "S"  => 32.065,
    "P"  => 30.974,
    "F"  => 18.998,
    "Cl" => 35.453,
};

// Elements listed first in a formula, in this order; the rest follow alphabetically.
const FORMULA_ORDER: [&str; 10] = ["C", "H", "N", "O", "S", "P", "F", "Cl", "Br", "I"];

pub fn atomic_mass(symbol: &str) -> f64 {
    ATOMIC_MASSES.get(symbol).copied().unwrap_or(FALLBACK_MASS)
}

/// Molecular formula such as `C9H10N2`; a count of one is left implicit.
pub fn molecular_formula<S: AsRef<str>>(symbols: &[S]) -> String {
    let counts: BTreeMap<&str, usize> = symbols
        .iter()
        .map(|s| s.as_ref())
        .counts()
        .into_iter()
        .collect();

    let ordered = FORMULA_ORDER
        .iter()
        .filter_map(|&element| counts.get(element).map(|&count| (element, count)));
    let remaining = counts
        .iter()
        .map(|(&element, &count)| (element, count))
        .filter(|&(element, _)| !FORMULA_ORDER.contains(&element));

    ordered
        .chain(remaining)
        .map(|(element, count)| match count {
            1 => element.to_string(),
            n => format!("{}{}", element, n),
        })
        .collect()
}

/// Distinct element symbols in alphabetical order.
pub fn element_types<S: AsRef<str>>(symbols: &[S]) -> Vec<String> {
    symbols
        .iter()
        .map(|s| s.as_ref().to_string())
        .sorted()
        .dedup()
        .collect()
}
