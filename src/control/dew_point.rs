//! Dew point estimation (Magnus formula).
//!
//! Used as a proxy for absolute moisture content when comparing inside and
//! outside air.  Coefficients are the Alduchov–Eskridge set, valid roughly
//! for −40 °C … +50 °C.

const MAGNUS_A: f32 = 17.625;
const MAGNUS_B: f32 = 243.04; // °C

/// Dew point in °C for the given relative humidity (%) and temperature (°C).
///
/// `relative_humidity <= 0` has no dew point: the logarithm is undefined and
/// the result is non-finite.  Callers compare the result directly, so a
/// non-finite value simply makes every comparison false.
pub fn dew_point(relative_humidity: f32, temperature: f32) -> f32 {
    let gamma =
        (MAGNUS_A * temperature) / (MAGNUS_B + temperature) + (relative_humidity / 100.0).ln();
    (MAGNUS_B * gamma) / (MAGNUS_A - gamma)
}
