//! Index builders consumed by the ByteMind website

pub mod sme;
pub mod tefi;

pub use sme::SmeBuilder;
pub use tefi::TefiBuilder;
