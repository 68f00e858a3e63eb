//! Domain types for the metro route planner.
//!
//! Station and line identifiers are only produced by the naming-grammar
//! functions in this module, so code that receives them can trust that they
//! are canonical.

mod error;
mod station;

pub use error::QueryError;
pub use station::{CanonicalId, LineId, LineSet, ParseError, canonicalize, parse_lines};
