//! Physical and acquisition constants shared by the builders.

pub const PI: f64 = std::f64::consts::PI;
pub const DEG_TO_RAD: f64 = PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// arccos(1/sqrt(3)), the angle at which the second-rank anisotropy averages out.
pub const MAGIC_ANGLE_RAD: f64 = 0.955_316_618_124_509_3;
pub const MAGIC_ANGLE_DEG: f64 = 54.735_610_317_245_35;

pub const DEFAULT_MAGNETIC_FLUX_DENSITY: &str = "9.4 T";
pub const DEFAULT_NUMBER_OF_POINTS: i64 = 1024;
