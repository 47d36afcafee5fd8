//! Variables module
//!
//! Placeholder interpolation for request text, fed by caller overrides and
//! the active environment.

pub mod substitution;

pub use substitution::{
    find_placeholders, interpolate, substitute, unresolved_placeholders, VariableContext,
};
