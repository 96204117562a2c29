//! Database access

mod queries;

pub use queries::*;
