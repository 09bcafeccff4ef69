//! Device equalization: profiles, EQ curve derivation and application

pub mod device_eq;
pub mod eq_curve;
pub mod profile;

pub use device_eq::{DeviceComparison, DeviceEqualizer, EqualizerState};
pub use eq_curve::EqCurve;
pub use profile::DeviceProfile;
