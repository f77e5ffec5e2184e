//! Asset discovery inside problem files
//!
//! [`scan`] finds raw references and [`dequote`] turns each one into a path
//! relative to the referencing problem file.

pub mod dequote;
pub mod parser;

pub use dequote::{dequote, DequoteError};
pub use parser::{scan, AssetReference, AssetReferences, QuoteStyle, ReferenceForm};
