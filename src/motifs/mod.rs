//! Oligomer encodings, values and rolling builders.

pub mod builder;
pub mod compact;
pub mod encodings;
pub mod iupac;

pub use builder::{CompactBuilder, IupacBuilder};
pub use compact::CompactMotif;
pub use iupac::IupacMotif;
