use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Negative value for {what}: {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Unknown greenhouse gas symbol '{symbol}'")]
    UnknownGas { symbol: String },

    #[error("Invalid year span: start {start} is after end {end}")]
    InvalidYearSpan { start: i32, end: i32 },

    #[error("Year {year} is outside {min}-{max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Could not parse year from '{text}'")]
    InvalidYear { text: String },
}
