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

//! Split error definitions.

use thiserror::Error;

/// An error which can be returned when a decomposition is misconfigured.
///
/// Configuration problems are rejected up front and never silently
/// corrected. Domain problems (a target outside an inverse function's
/// range) and precision exhaustion are not errors; they are reported
/// in-band as NaN or clamped results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// The input cannot be interpreted as a magnitude.
    #[error("input is not numeric")]
    InvalidInput,
    /// The base is unusable for a power decomposition (non-positive or one).
    #[error("invalid decomposition base")]
    InvalidBase,
    /// Tetration in this base converges, so hyperexponents cannot grow.
    #[error("tetration does not diverge for this base")]
    ConvergentBase,
    /// A step list must contain at least one step.
    #[error("step list is empty")]
    EmptyStepList,
    /// Steps must be positive finite values.
    #[error("invalid step size")]
    InvalidStep,
    /// More steps than a coefficient array can hold.
    #[error("too many step sizes")]
    TooManySteps,
    /// A level ceiling must be a positive finite value.
    #[error("invalid level maximum")]
    InvalidMaximum,
    /// The mantissa lower bound must be a positive finite value.
    #[error("invalid mantissa minimum")]
    InvalidMinimum,
    /// An exponent multiplier must be a positive finite value.
    #[error("invalid exponent multiplier")]
    InvalidMultiplier,
}
