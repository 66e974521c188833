// nc-core/src/units.rs

use uom::si::f64::{Area as UomArea, Energy as UomEnergy, Length as UomLength};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Energy = UomEnergy;
pub type Length = UomLength;

#[inline]
pub fn joules(v: f64) -> Energy {
    use uom::si::energy::joule;
    Energy::new::<joule>(v)
}

#[inline]
pub fn mj(v: f64) -> Energy {
    use uom::si::energy::megajoule;
    Energy::new::<megajoule>(v)
}

#[inline]
pub fn gj(v: f64) -> Energy {
    use uom::si::energy::gigajoule;
    Energy::new::<gigajoule>(v)
}

#[inline]
pub fn kwh(v: f64) -> Energy {
    use uom::si::energy::kilowatt_hour;
    Energy::new::<kilowatt_hour>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn km(v: f64) -> Length {
    use uom::si::length::kilometer;
    Length::new::<kilometer>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

/// Energy expressed in megajoules, the engine's common energy unit.
#[inline]
pub fn in_mj(e: Energy) -> f64 {
    use uom::si::energy::megajoule;
    e.get::<megajoule>()
}

/// Energy expressed in joules, the anchor of every energy unit.
#[inline]
pub fn in_joules(e: Energy) -> f64 {
    use uom::si::energy::joule;
    e.get::<joule>()
}

#[inline]
pub fn in_meters(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn in_square_meters(a: Area) -> f64 {
    use uom::si::area::square_meter;
    a.get::<square_meter>()
}

pub mod constants {
    use super::*;

    /// Megajoules in one kilowatt-hour.
    #[inline]
    pub fn mj_per_kwh() -> f64 {
        in_mj(kwh(1.0))
    }
}
