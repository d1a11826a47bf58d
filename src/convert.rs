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

//! Conversion between caller inputs and the internal magnitude type.

use crate::error::SplitError;
use break_eternity::Decimal;
use std::convert::TryFrom;

/// A value that can be adapted into a [`Decimal`] magnitude.
///
/// Every decomposition call starts from one adaptation; afterwards the
/// magnitude is immutable and all operations return new values. NaN and
/// infinities are numeric-like and convert losslessly so callers can
/// propagate "undefined" through further arithmetic; anything that is not
/// numeric-like fails with [`SplitError::InvalidInput`].
pub trait ToMagnitude {
    /// Converts this value into a magnitude.
    fn to_magnitude(&self) -> Result<Decimal, SplitError>;
}

/// Adapts any supported input into a [`Decimal`] magnitude.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::to_magnitude;
///
/// let n = to_magnitude(&2357_i32).unwrap();
/// assert_eq!(n.to_number(), 2357.0);
///
/// let huge = to_magnitude(&"1e500").unwrap();
/// assert!(huge > n);
///
/// assert!(to_magnitude(&"grape").is_err());
/// ```
#[inline]
pub fn to_magnitude<T: ToMagnitude + ?Sized>(value: &T) -> Result<Decimal, SplitError> {
    value.to_magnitude()
}

impl ToMagnitude for Decimal {
    #[inline]
    fn to_magnitude(&self) -> Result<Decimal, SplitError> {
        Ok(*self)
    }
}

macro_rules! impl_to_magnitude_primitive {
    ($($ty: ty), * $(,)?) => {
        $(
            impl ToMagnitude for $ty {
                #[inline]
                fn to_magnitude(&self) -> Result<Decimal, SplitError> {
                    Ok(Decimal::from_number(*self as f64))
                }
            }
        )*
    };
}

impl_to_magnitude_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToMagnitude for str {
    #[inline]
    fn to_magnitude(&self) -> Result<Decimal, SplitError> {
        Decimal::try_from(self).map_err(|_| SplitError::InvalidInput)
    }
}

impl ToMagnitude for String {
    #[inline]
    fn to_magnitude(&self) -> Result<Decimal, SplitError> {
        self.as_str().to_magnitude()
    }
}

impl<'a, T: ToMagnitude + ?Sized> ToMagnitude for &'a T {
    #[inline]
    fn to_magnitude(&self) -> Result<Decimal, SplitError> {
        (**self).to_magnitude()
    }
}

/// NaN compares equal to NaN in the underlying representation, which makes
/// these checks cheap.
#[inline]
pub(crate) fn is_nan(value: Decimal) -> bool {
    value == Decimal::nan()
}

#[inline]
pub(crate) fn is_infinite(value: Decimal) -> bool {
    value == Decimal::inf() || value == Decimal::neg_inf()
}

#[inline]
pub(crate) fn is_finite(value: Decimal) -> bool {
    !is_nan(value) && !is_infinite(value)
}
