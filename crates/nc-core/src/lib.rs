//! nc-core: shared foundation for the neighbourhood calculator.
//!
//! Contains:
//! - units (uom SI energy/length/area types + constructors)
//! - numeric (Real + float guards and helpers)
//! - gas (greenhouse gases tracked by the engine)
//! - year (emissions-factor year span and index clamping)
//! - error (shared error types)

pub mod error;
pub mod gas;
pub mod numeric;
pub mod units;
pub mod year;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use gas::Gas;
pub use numeric::*;
pub use year::{MAX_YEAR, MIN_YEAR, Year, YearSpan, ensure_year, parse_year};
