// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// The one tolerance of the kernel.
///
/// Plane classification, polygon splitting, duplicate-vertex removal,
/// canonicalization and T-junction detection all compare against this value,
/// so seams never appear from two passes rounding differently.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// The one tolerance of the kernel.
///
/// Plane classification, polygon splitting, duplicate-vertex removal,
/// canonicalization and T-junction detection all compare against this value,
/// so seams never appear from two passes rounding differently.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-5;

/// Default number of segments per full turn for curved primitives, twist steps
/// and revolutions.
pub const DEFAULT_RESOLUTION_3D: usize = 12;

// Pi
/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;

// Frac Pi 2
/// π/2
#[cfg(feature = "f32")]
pub const FRAC_PI_2: Real = core::f32::consts::FRAC_PI_2;
/// π/2
#[cfg(feature = "f64")]
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

// Tau
/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;
