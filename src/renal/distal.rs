//! Distal nephron excretion chain.
//!
//! Fixed fractional changes along the distal tubule and collecting duct,
//! applied to the whole-kidney flow leaving the ascending limb. Each factor is
//! `(1 + fraction)`: negative fractions are reabsorption, positive secretion.

/// Sodium: distal tubule, connecting tubule, cortical, outer and inner
/// medullary collecting duct.
pub const SODIUM: [f64; 5] = [-0.40, -0.36, -0.19, 0.25, -0.71];
/// Potassium, same segments.
pub const POTASSIUM: [f64; 5] = [0.86, 5.60, -0.06, -0.42, -0.65];
/// Water, same segments.
pub const WATER: [f64; 5] = [-0.10, -0.42, -0.63, -0.54, -0.77];

/// Whole-kidney excretion rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Excretion {
    pub sodium: f64,
    pub potassium: f64,
    pub volume: f64,
}

/// Product of `(1 + f)` over a segment table.
pub fn transfer(fractions: &[f64]) -> f64 {
    through(1.0, fractions)
}

/// Carries `load` through each segment in turn.
pub fn through(load: f64, fractions: &[f64]) -> f64 {
    fractions.iter().fold(load, |acc, f| acc * (1.0 + f))
}

/// Runs the chain for a distal flow `volume` at NaCl concentration `ci`, with
/// plasma potassium and sodium setting the K/Na ratio of the delivered load.
/// Results are floored at zero.
pub fn excrete(volume: f64, ci: f64, cke: f64, cna: f64) -> Excretion {
    let sodium = volume * ci;
    let potassium = sodium * cke / cna;
    Excretion {
        sodium: through(sodium, &SODIUM).max(0.0),
        potassium: through(potassium, &POTASSIUM).max(0.0),
        volume: through(volume, &WATER).max(0.0),
    }
}
