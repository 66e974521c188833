//! Greenhouse gases tracked by the calculator.

use core::fmt;
use core::str::FromStr;

use crate::CoreError;

/// A greenhouse gas with its own emissions-factor column.
///
/// Ordering follows reporting order (CO2 first), so `BTreeMap<Gas, _>`
/// iterates the way result tables are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gas {
    CO2,
    CH4,
    N2O,
}

impl Gas {
    pub const ALL: [Gas; 3] = [Gas::CO2, Gas::CH4, Gas::N2O];

    pub fn symbol(self) -> &'static str {
        match self {
            Gas::CO2 => "CO2",
            Gas::CH4 => "CH4",
            Gas::N2O => "N2O",
        }
    }

    /// CO2 is the reference gas and never carries a GWP weighting.
    pub fn is_reference(self) -> bool {
        matches!(self, Gas::CO2)
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Gas {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Gas::ALL
            .into_iter()
            .find(|g| g.symbol().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::UnknownGas {
                symbol: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_symbols_case_insensitive() {
        assert_eq!("co2".parse::<Gas>().unwrap(), Gas::CO2);
        assert_eq!(" N2O ".parse::<Gas>().unwrap(), Gas::N2O);
        assert!(matches!(
            "SF6".parse::<Gas>(),
            Err(CoreError::UnknownGas { symbol }) if symbol == "SF6"
        ));
    }

    #[test]
    fn only_co2_is_reference() {
        assert!(Gas::CO2.is_reference());
        assert!(!Gas::CH4.is_reference());
        assert!(!Gas::N2O.is_reference());
    }

    #[test]
    fn ordering_puts_co2_first() {
        let mut gases = vec![Gas::N2O, Gas::CO2, Gas::CH4];
        gases.sort();
        assert_eq!(gases, Gas::ALL.to_vec());
    }
}
