//! Concrete panel drivers

pub mod qyeg0213rws800;

pub use qyeg0213rws800::Qyeg0213Rws800;
