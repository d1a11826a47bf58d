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

//! Hyper-scientific decomposition and scaled iterated exponentials.

use crate::convert::{is_finite, is_nan};
use crate::error::SplitError;
use crate::round::{round_to, Rounding};
use crate::scientific::{Correction, Verdict, CORRECTION_LIMIT, EXPONENT_SENTINEL};
use crate::steps::StepList;
use break_eternity::Decimal;

/// e^(1/e). Tetration converges for bases at or below this value, so no
/// hyperexponent can be extracted there.
pub(crate) const TETRATION_CONVERGENCE_LIMIT: f64 = 1.444667861009766;

/// Applies `x -> mult * base^x` to `payload`, `height` times.
///
/// Iterating a scaled exponential is conjugate to plain tetration:
/// `mult * base^x = B^(x / mult) * mult` with `B = base^mult`, so the whole
/// iteration collapses to one tetration in base `B` on `payload / mult`.
/// Fractional heights inherit the underlying linear approximation; negative
/// heights iterate the scaled logarithm instead.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{iterated_exp_mult, Decimal};
///
/// let two = Decimal::two();
/// // 2*10^(2*10^1) = 2e20
/// let v = iterated_exp_mult(Decimal::ten(), Decimal::one(), two, two);
/// assert!(v.eq_tolerance(&Decimal::from_number(2e20), 1e-9));
/// ```
pub fn iterated_exp_mult(
    base: Decimal,
    payload: Decimal,
    height: Decimal,
    mult: Decimal,
) -> Decimal {
    if mult == Decimal::one() {
        return base.tetrate(Some(height.to_number()), Some(payload));
    }
    let conjugate_base = base.pow(mult);
    conjugate_base.tetrate(Some(height.to_number()), Some(payload / mult)) * mult
}

/// Applies `x -> log_base(x / mult)`, the inverse of one scaled
/// exponentiation, to `value`, `times` times.
pub fn iterated_mult_log(value: Decimal, base: Decimal, times: Decimal, mult: Decimal) -> Decimal {
    if mult == Decimal::one() {
        return value.iteratedlog(base, times.to_number());
    }
    let conjugate_base = base.pow(mult);
    (value / mult).iteratedlog(conjugate_base, times.to_number()) * mult
}

/// Super-logarithm of `value` under the scaled exponential: the height at
/// which `iterated_exp_mult(base, 1, height, mult)` reaches `value`.
pub fn mult_slog(value: Decimal, base: Decimal, mult: Decimal) -> Decimal {
    if mult == Decimal::one() {
        return value.slog(Some(base));
    }
    let conjugate_base = base.pow(mult);
    (value / mult).slog(Some(conjugate_base))
}

/// Splits `value` into `(mantissa, hyperexponent)` in `base` with default
/// options.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{hyperscientifify, Decimal};
///
/// // A tower of three tens.
/// let tower = Decimal::ten().tetrate(Some(3.0), None);
/// let (m, h) = hyperscientifify(tower, Decimal::ten()).unwrap();
/// assert!(m.eq_tolerance(&Decimal::one(), 1e-9));
/// assert_eq!(h, Decimal::from_number(3.0));
/// ```
#[inline]
pub fn hyperscientifify(value: Decimal, base: Decimal) -> Result<(Decimal, Decimal), SplitError> {
    hyperscientifify_with(
        value,
        base,
        &Rounding::none(),
        Decimal::zero(),
        &StepList::default(),
        Decimal::one(),
        Decimal::one(),
    )
}

/// Splits `value` into `(mantissa, hyperexponent)` such that iterating the
/// scaled exponential `x -> exp_mult * base^x` on the mantissa
/// `hyperexponent / hyperexp_mult` times reconstructs `value`, with the
/// hyperexponent on the step lattice and the mantissa within the
/// iterated-exponential band starting at tower height
/// `hyper_mantissa_power`.
///
/// Bases whose scaled tetration converges (`base^exp_mult` at or below
/// e^(1/e)) are rejected: raising the hyperexponent would stop increasing
/// the value, which breaks the decomposition.
///
/// Values in the band `(1/B, B)` around 1, where `B = base^exp_mult`, skip
/// the super-logarithm entirely (it is unstable near the fixed point of
/// tetration) and come back with hyperexponent 0 as-is, bypassing the
/// mantissa-power range.
pub fn hyperscientifify_with(
    value: Decimal,
    base: Decimal,
    rounding: &Rounding,
    hyper_mantissa_power: Decimal,
    steps: &StepList,
    exp_mult: Decimal,
    hyperexp_mult: Decimal,
) -> Result<(Decimal, Decimal), SplitError> {
    if !is_finite(base) || base <= Decimal::zero() || base == Decimal::one() {
        return Err(SplitError::InvalidBase);
    }
    if !is_finite(exp_mult) || exp_mult <= Decimal::zero() {
        return Err(SplitError::InvalidMultiplier);
    }
    if !is_finite(hyperexp_mult) || hyperexp_mult <= Decimal::zero() {
        return Err(SplitError::InvalidMultiplier);
    }
    let eff_base = if exp_mult == Decimal::one() {
        base
    } else {
        base.pow(exp_mult)
    };
    if eff_base <= Decimal::from_number(TETRATION_CONVERGENCE_LIMIT) {
        return Err(SplitError::ConvergentBase);
    }

    if is_nan(value) {
        return Ok((Decimal::nan(), Decimal::nan()));
    }
    if value == Decimal::zero() {
        return Ok((Decimal::zero(), Decimal::zero()));
    }
    if value == Decimal::inf() {
        return Ok((Decimal::inf(), Decimal::inf()));
    }
    if value == Decimal::neg_inf() {
        return Ok((Decimal::neg_inf(), Decimal::inf()));
    }
    if value < Decimal::zero() {
        let (mantissa, hyperexponent) = hyperscientifify_with(
            -value,
            base,
            rounding,
            hyper_mantissa_power,
            steps,
            exp_mult,
            hyperexp_mult,
        )?;
        return Ok((-mantissa, hyperexponent));
    }

    if value > eff_base.recip() && value < eff_base {
        return Ok((round_to(value, rounding), Decimal::zero()));
    }

    let slog_value = mult_slog(value, base, exp_mult);
    let mut hyperexponent =
        steps.current_step_value((slog_value - hyper_mantissa_power) * hyperexp_mult);
    let mut unrounded = iterated_mult_log(value, base, hyperexponent / hyperexp_mult, exp_mult);
    let mut mantissa = round_to(unrounded, rounding);

    if hyperexponent.abs() > Decimal::from_number(EXPONENT_SENTINEL) {
        return Ok((mantissa, hyperexponent));
    }

    let lower = iterated_exp_mult(base, Decimal::one(), hyper_mantissa_power, exp_mult);
    let mut state = Correction::Seeking;
    let mut last_move_up: Option<bool> = None;
    let mut budget = CORRECTION_LIMIT;

    while state != Correction::Settled && budget > 0 {
        budget -= 1;

        let gap = (steps.next_step_value(hyperexponent) - hyperexponent) / hyperexp_mult;
        let upper =
            iterated_exp_mult(base, Decimal::one(), hyper_mantissa_power + gap, exp_mult);
        let verdict = if mantissa >= upper {
            Verdict::Over
        } else if mantissa < lower {
            Verdict::Under
        } else {
            Verdict::InBounds
        };

        if verdict == Verdict::InBounds {
            state = Correction::Settled;
            continue;
        }
        if state == Correction::DirectionReversed {
            mantissa = lower;
            state = Correction::Settled;
            continue;
        }

        let move_up = verdict == Verdict::Over;
        hyperexponent = if move_up {
            steps.next_step_value(hyperexponent)
        } else {
            steps.previous_step_value(hyperexponent)
        };
        if last_move_up == Some(!move_up) {
            state = Correction::DirectionReversed;
        }
        last_move_up = Some(move_up);

        let rescaled = iterated_mult_log(value, base, hyperexponent / hyperexp_mult, exp_mult);
        if rescaled == unrounded {
            state = Correction::Settled;
        }
        unrounded = rescaled;
        mantissa = round_to(unrounded, rounding);
    }

    Ok((mantissa, hyperexponent))
}
