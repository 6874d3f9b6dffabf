//! Intellivision system core.
//!
//! Owns the shared bus, the CP-1610, and the attached devices, and fixes
//! the one ordering rule the whole machine depends on: per host tick the
//! bus counter advances first, then the CPU (which asserts phases at slot
//! 0), then every other device in registration order. Video, audio and
//! controller hardware attach through the same [`intv_bus::BusDevice`]
//! contract without changes here.

mod intellivision;

pub use intellivision::Intellivision;
