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

//! Mantissa/exponent decomposition for numbers far beyond floating-point
//! range, up to tetration scale.
//!
//! Formatting a huge number starts by splitting it into a handful of
//! bounded pieces: a mantissa and one exponent-like component per
//! hyperoperator level, under a configurable base, rounding policy and
//! exponent step lattice. This crate is that splitting core; rendering the
//! pieces into strings is left to its callers. Magnitude arithmetic comes
//! from [`break_eternity`], whose [`Decimal`] is re-exported here.
//!
//! ## Usage
//!
//! Scientific decomposition:
//!
//! ```
//! use hypersplit_rs::{scientifify, Decimal};
//!
//! let (m, e) = scientifify(Decimal::from_number(2357.0), Decimal::ten()).unwrap();
//! assert!(m.eq_tolerance(&Decimal::from_number(2.357), 1e-9));
//! assert_eq!(e, Decimal::from_number(3.0));
//! ```
//!
//! Engineering-style exponent lattices:
//!
//! ```
//! use hypersplit_rs::{scientifify_with, Decimal, Rounding, StepList};
//!
//! let eng = StepList::single(Decimal::from_number(3.0)).unwrap();
//! let (m, e) = scientifify_with(
//!     Decimal::from_number(23570.0),
//!     Decimal::ten(),
//!     &Rounding::none(),
//!     Decimal::zero(),
//!     &eng,
//!     Decimal::one(),
//! )
//! .unwrap();
//! assert!(m.eq_tolerance(&Decimal::from_number(23.57), 1e-9));
//! assert_eq!(e, Decimal::from_number(3.0));
//! ```
//!
//! Tetration-scale values split one hyperoperator level up, or across the
//! whole cascade:
//!
//! ```
//! use hypersplit_rs::{hyperscientifify, hypersplit, Decimal, HypersplitConfig};
//!
//! let tower = Decimal::ten().tetrate(Some(3.0), None);
//! let (m, h) = hyperscientifify(tower, Decimal::ten()).unwrap();
//! assert!(m.eq_tolerance(&Decimal::one(), 1e-9));
//! assert_eq!(h, Decimal::from_number(3.0));
//!
//! let config = HypersplitConfig::new(Decimal::ten());
//! let (m, e, t, p) = hypersplit(tower, &config).unwrap();
//! assert_eq!(
//!     (e, t, p),
//!     (Decimal::one(), Decimal::two(), Decimal::zero())
//! );
//! assert!(m.eq_tolerance(&Decimal::one(), 1e-9));
//! ```
//!
//! Inverses with no closed form go through the bracket search:
//!
//! ```
//! use hypersplit_rs::{inverse_factorial, Decimal};
//!
//! // x!! == 720 at x == 3.
//! let x = inverse_factorial(Decimal::from_number(720.0), Decimal::two());
//! assert!(x.eq_tolerance(&Decimal::from_number(3.0), 1e-6));
//! ```

mod convert;
mod error;
mod hyper;
mod hypersplit;
mod round;
mod scientific;
mod solve;
mod steps;

pub use break_eternity::Decimal;

pub use crate::convert::{to_magnitude, ToMagnitude};
pub use crate::error::SplitError;
pub use crate::hyper::{
    hyperscientifify, hyperscientifify_with, iterated_exp_mult, iterated_mult_log, mult_slog,
};
pub use crate::hypersplit::{hypersplit, recompose, HypersplitConfig};
pub use crate::round::{round_to, Rounding};
pub use crate::scientific::{scientifify, scientifify_with};
pub use crate::solve::{
    factorial_slog, factorial_slog_with, inverse_factorial, iterated_factorial, iterated_polygon,
    iterated_polygon_root, linear_sroot, polygon, polygon_root, solve_increasing,
};
pub use crate::steps::{StepCoeffs, StepList, STEP_SLOTS};
