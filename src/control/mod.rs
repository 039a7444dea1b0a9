//! Control-law building blocks: psychrometrics and threshold hysteresis.

pub mod dew_point;
pub mod hysteresis;
