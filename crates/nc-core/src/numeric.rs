use crate::CoreError;

/// Floating point type used throughout the calculator
pub type Real = f64;

/// Grams in one metric tonne.
pub const GRAMS_PER_TONNE: Real = 1e6;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and `>= 0`. Energy shares, VKT and floor areas go through this.
pub fn ensure_non_negative(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(CoreError::Negative { what, value: v });
    }
    Ok(v)
}

#[inline]
pub fn grams_to_tonnes(grams: Real) -> Real {
    grams / GRAMS_PER_TONNE
}

/// `share` percent (0-100) of `whole`.
#[inline]
pub fn percent_of(share: Real, whole: Real) -> Real {
    (share / 100.0) * whole
}
