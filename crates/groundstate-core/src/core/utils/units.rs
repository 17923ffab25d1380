/// Bohr radius in Angstrom (CODATA 2018).
pub const BOHR_IN_ANGSTROM: f64 = 0.529177210903;

/// Conversion factor from Angstrom to bohr.
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / BOHR_IN_ANGSTROM;

/// Conversion factor from atomic units of dipole moment to Debye.
pub const AU_TO_DEBYE: f64 = 2.541746473;
