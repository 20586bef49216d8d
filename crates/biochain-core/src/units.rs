//! Compile-time unit safety for supply chain quantities.
//!
//! Prevents mixing incompatible units like biomass mass and fuel volume.
//!
//! Production targets are stated in liters while every flow and capacity in
//! the optimization model is in megagrams, so the two never meet without a
//! [`LitersPerMegagram`] yield in between. The newtypes are
//! `#[repr(transparent)]` and serialize as plain numbers.
//!
//! # Usage
//!
//! ```
//! use biochain_core::units::{Liters, LitersPerMegagram, Megagrams};
//!
//! let yield_rate = LitersPerMegagram(232.0);
//! let goal = Liters(500_000_000.0);
//!
//! // Volume targets become mass targets through the yield
//! let biomass: Megagrams = yield_rate.to_biomass(goal);
//! assert!((biomass.value() - 2_155_172.41).abs() < 0.01);
//!
//! // This would NOT compile - different units
//! // let wrong = biomass + goal;
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

macro_rules! unit_newtype {
    ($type:ident, $symbol:literal) => {
        impl $type {
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            #[inline]
            pub fn min(self, other: Self) -> Self {
                $type(self.0.min(other.0))
            }
        }

        impl Add for $type {
            type Output = $type;
            fn add(self, rhs: $type) -> $type {
                $type(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = $type;
            fn sub(self, rhs: $type) -> $type {
                $type(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = $type;
            fn mul(self, factor: f64) -> $type {
                $type(self.0 * factor)
            }
        }

        /// Ratio of two quantities of the same unit
        impl Div for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> f64 {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2} {}", self.0, $symbol)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = $type>>(iter: I) -> $type {
                iter.fold($type(0.0), |acc, x| acc + x)
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a $type>>(iter: I) -> $type {
                iter.copied().sum()
            }
        }
    };
}

/// Biomass mass in megagrams (Mg, metric tonnes)
///
/// Every flow, supply, and capacity in the planning model is expressed in Mg.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megagrams(pub f64);

unit_newtype!(Megagrams, "Mg");

/// Fuel volume in liters (L)
///
/// Facility output and production targets are quoted in liters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Liters(pub f64);

unit_newtype!(Liters, "L");

/// Route length in kilometers (km)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilometers(pub f64);

unit_newtype!(Kilometers, "km");

/// Facility yield: liters of fuel produced per megagram of biomass.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct LitersPerMegagram(pub f64);

impl LitersPerMegagram {
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Biomass required to produce `volume`: `volume / yield`
    #[inline]
    pub fn to_biomass(self, volume: Liters) -> Megagrams {
        Megagrams(volume.0 / self.0)
    }

    /// Fuel produced from `mass`: `mass × yield`
    #[inline]
    pub fn to_fuel(self, mass: Megagrams) -> Liters {
        Liters(mass.0 * self.0)
    }
}

impl Default for LitersPerMegagram {
    fn default() -> Self {
        Self(232.0)
    }
}

impl std::fmt::Display for LitersPerMegagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} L/Mg", self.0)
    }
}

impl Kilometers {
    /// Cost of hauling one megagram over this distance at `rate` per Mg·km.
    #[inline]
    pub fn haul_cost(self, rate_per_mg_km: f64) -> f64 {
        self.0 * rate_per_mg_km
    }
}
