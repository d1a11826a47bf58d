// Copyright 2021 CoD Technologies Corp.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Quantum rounding.

use crate::convert::is_finite;
use break_eternity::Decimal;
use std::fmt;

/// How a mantissa is rounded: to the nearest multiple of a quantum.
///
/// The quantum is either a fixed value or computed from the value being
/// rounded. The computed form is what makes constant *relative* precision
/// possible: a quantum that scales with the value rounds to a fixed number
/// of significant figures, while a fixed quantum rounds to a fixed number
/// of fractional places.
///
/// A quantum of zero (or any non-positive quantum) disables rounding.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{round_to, Decimal, Rounding};
///
/// let cents = Rounding::from(0.01);
/// assert_eq!(round_to(Decimal::from_number(1.237), &cents), Decimal::from_number(1.24));
///
/// let sig3 = Rounding::significant_figures(3, Decimal::ten());
/// assert_eq!(round_to(Decimal::from_number(12345.0), &sig3), Decimal::from_number(12300.0));
/// ```
pub enum Rounding {
    /// Round to the nearest multiple of this quantum.
    Fixed(Decimal),
    /// Compute the quantum from the value being rounded.
    Computed(Box<dyn Fn(Decimal) -> Decimal>),
}

impl Rounding {
    /// Rounding that leaves values untouched.
    #[inline]
    pub fn none() -> Rounding {
        Rounding::Fixed(Decimal::zero())
    }

    /// Rounds to `figures` significant figures in `base`.
    ///
    /// The quantum is `base^(floor(log_base |value|) - figures + 1)`, so it
    /// rides along with the magnitude of the value.
    pub fn significant_figures(figures: u32, base: Decimal) -> Rounding {
        Rounding::Computed(Box::new(move |value: Decimal| {
            if value == Decimal::zero() || !is_finite(value) {
                return Decimal::zero();
            }
            let place = value.abs().log(base).floor();
            base.pow(place - Decimal::from_number(figures.saturating_sub(1) as f64))
        }))
    }

    /// Returns the quantum used for `value`.
    #[inline]
    pub fn quantum_for(&self, value: Decimal) -> Decimal {
        match self {
            Rounding::Fixed(quantum) => *quantum,
            Rounding::Computed(quantum_fn) => quantum_fn(value),
        }
    }

    /// Method form of [`round_to`].
    #[inline]
    pub fn apply(&self, value: Decimal) -> Decimal {
        round_to(value, self)
    }
}

impl Default for Rounding {
    #[inline]
    fn default() -> Rounding {
        Rounding::none()
    }
}

impl From<Decimal> for Rounding {
    #[inline]
    fn from(quantum: Decimal) -> Rounding {
        Rounding::Fixed(quantum)
    }
}

impl From<f64> for Rounding {
    #[inline]
    fn from(quantum: f64) -> Rounding {
        Rounding::Fixed(Decimal::from_number(quantum))
    }
}

impl fmt::Debug for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounding::Fixed(quantum) => f.debug_tuple("Fixed").field(quantum).finish(),
            Rounding::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Rounds `value` to the nearest multiple of the rounding quantum.
///
/// Non-finite values, and quanta that are non-positive or non-finite,
/// return `value` unchanged. Ties round away from zero, matching the
/// underlying `round` semantics, so repeated rounding is idempotent.
#[inline]
pub fn round_to(value: Decimal, rounding: &Rounding) -> Decimal {
    if !is_finite(value) {
        return value;
    }

    let quantum = rounding.quantum_for(value);
    if quantum <= Decimal::zero() || !is_finite(quantum) {
        return value;
    }

    (value / quantum).round() * quantum
}
