use phf::{Map, phf_map};

static ATOMIC_NUMBERS: Map<&'static str, u32> = phf_map! {
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25,
    "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Ga" => 31, "Ge" => 32,
    "As" => 33, "Se" => 34, "Br" => 35, "Kr" => 36,
};

// Closed noble-gas shells, as (atomic number, doubly occupied core orbitals).
const CORE_SHELLS: [(u32, usize); 3] = [(36, 18), (18, 9), (10, 5)];

/// Normalizes an element label such as `"h"`, `"CL"` or `"C1"` to its symbol form.
///
/// Trailing digits are dropped so that numbered labels from geometry files
/// (`"H1"`, `"H2"`) resolve to the same element.
pub fn normalize_symbol(label: &str) -> String {
    let letters: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let mut chars = letters.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Returns the atomic number for an element label, if the element is known.
pub fn atomic_number(label: &str) -> Option<u32> {
    ATOMIC_NUMBERS.get(normalize_symbol(label).as_str()).copied()
}

/// Number of spatial orbitals treated as chemical core for an element.
///
/// Hydrogen and helium have no core; second-row elements freeze 1s, third-row
/// elements freeze 1s2s2p, and so on along the closed noble-gas shells.
pub fn core_orbitals(atomic_number: u32) -> usize {
    CORE_SHELLS
        .iter()
        .find(|(shell_z, _)| atomic_number > *shell_z)
        .map(|(_, orbitals)| *orbitals)
        .unwrap_or(if atomic_number > 2 { 1 } else { 0 })
}
