//! nc-units: unit conversion for energy-source quantities.
//!
//! Provides:
//! - A registry of energy, length and area units anchored to SI base units
//!   (J, m, m²), with factors taken from `uom`
//! - Per-fuel volumetric/mass units (`Lgasoline`, `kgpropane`, ...) anchored
//!   to joules by a source's conversion value
//! - Source-aware unit resolution, so a bare `L` entered against `diesel`
//!   resolves to `Ldiesel` without string guessing at calculation time
//! - Text helpers for display units (`"kWh/yr"` -> `"kWh"`)
//!
//! # Example
//!
//! ```
//! use nc_units::{FuelUnit, UnitRegistry};
//!
//! let mut units = UnitRegistry::with_builtins();
//! units
//!     .register_fuel(&FuelUnit::new("gasoline", "L/yr", "Lgasoline", 35e6))
//!     .unwrap();
//!
//! let mj = units.convert_for_source("gasoline", 10.0, "L/yr", "MJ").unwrap();
//! assert!((mj - 350.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod fuel;
pub mod registry;
pub mod text;

pub use error::{UnitError, UnitResult};
pub use fuel::{FuelUnit, mpg_to_l_per_100km};
pub use registry::{Dimension, UnitDef, UnitRegistry};
pub use text::{split_value_and_unit, strip_per_year, strip_units};
