//! Numerical primitives for the aeronomy engine.

pub mod interp;
pub mod special;
pub mod table;
