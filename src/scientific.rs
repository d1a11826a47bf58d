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

//! Scientific decomposition.

use crate::convert::{is_finite, is_nan};
use crate::error::SplitError;
use crate::round::{round_to, Rounding};
use crate::steps::StepList;
use break_eternity::Decimal;

/// Exponents beyond this magnitude are treated as effectively infinite and
/// skip boundary refinement; it matches the largest float the underlying
/// representation keeps exact to the unit.
pub(crate) const EXPONENT_SENTINEL: f64 = 9e15;

/// Hard cap on boundary-correction moves. Rounding can only push a
/// mantissa across a handful of lattice steps; hitting this cap means the
/// rounding quantum and the step list are fighting each other, and the
/// current estimate is returned as-is.
pub(crate) const CORRECTION_LIMIT: u32 = 32;

/// Boundary-correction progress.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Correction {
    /// Still walking the exponent in one direction.
    Seeking,
    /// The walk has gone both up and down; one more violation means the
    /// mantissa sits on a rounding/lattice conflict and gets clamped.
    DirectionReversed,
    /// The mantissa is in bounds (or clamped, or at a fixed point).
    Settled,
}

/// Bound-violation verdict for one correction iteration.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    InBounds,
    Over,
    Under,
}

/// Splits `value` into `(mantissa, exponent)` in `base` with default
/// options: no rounding, canonical mantissa range, integer exponents.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{scientifify, Decimal};
///
/// let (m, e) = scientifify(Decimal::from_number(2357.0), Decimal::ten()).unwrap();
/// assert!(m.eq_tolerance(&Decimal::from_number(2.357), 1e-9));
/// assert_eq!(e, Decimal::from_number(3.0));
/// ```
#[inline]
pub fn scientifify(value: Decimal, base: Decimal) -> Result<(Decimal, Decimal), SplitError> {
    scientifify_with(
        value,
        base,
        &Rounding::none(),
        Decimal::zero(),
        &StepList::default(),
        Decimal::one(),
    )
}

/// Splits `value` into `(mantissa, exponent)` such that
/// `mantissa * base^(exponent / exp_mult)` reconstructs `value` within the
/// rounding tolerance, the exponent lies on the step lattice, and the
/// mantissa lies in `[base^mantissa_power, base^(mantissa_power + gap))`
/// where `gap` is the distance to the next lattice point divided by
/// `exp_mult`.
///
/// Bases between 0 and 1 are decreasing, so the mantissa interval flips to
/// `(base^(mantissa_power + gap), base^mantissa_power]`. Bases that are
/// non-positive or exactly 1 are rejected, as are non-positive exponent
/// multipliers.
///
/// Zero, NaN and infinities return directly; negative values decompose as
/// their absolute value with the mantissa negated.
pub fn scientifify_with(
    value: Decimal,
    base: Decimal,
    rounding: &Rounding,
    mantissa_power: Decimal,
    steps: &StepList,
    exp_mult: Decimal,
) -> Result<(Decimal, Decimal), SplitError> {
    if !is_finite(base) || base <= Decimal::zero() || base == Decimal::one() {
        return Err(SplitError::InvalidBase);
    }
    if !is_finite(exp_mult) || exp_mult <= Decimal::zero() {
        return Err(SplitError::InvalidMultiplier);
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
        let (mantissa, exponent) =
            scientifify_with(-value, base, rounding, mantissa_power, steps, exp_mult)?;
        return Ok((-mantissa, exponent));
    }

    // The function m -> m * base^e is increasing in e for base > 1 and
    // decreasing for base < 1; the bound comparisons invert accordingly.
    let increasing = base > Decimal::one();

    let mut exponent =
        steps.current_step_value((value.log(base) - mantissa_power) * exp_mult);
    let mut unrounded = value / base.pow(exponent / exp_mult);
    let mut mantissa = round_to(unrounded, rounding);

    if exponent.abs() > Decimal::from_number(EXPONENT_SENTINEL) {
        return Ok((mantissa, exponent));
    }

    let lower = base.pow(mantissa_power);
    let mut state = Correction::Seeking;
    let mut last_move_up: Option<bool> = None;
    let mut budget = CORRECTION_LIMIT;

    while state != Correction::Settled && budget > 0 {
        budget -= 1;

        let gap = (steps.next_step_value(exponent) - exponent) / exp_mult;
        let upper = base.pow(mantissa_power + gap);
        let verdict = if increasing {
            if mantissa >= upper {
                Verdict::Over
            } else if mantissa < lower {
                Verdict::Under
            } else {
                Verdict::InBounds
            }
        } else if mantissa <= upper {
            Verdict::Over
        } else if mantissa > lower {
            Verdict::Under
        } else {
            Verdict::InBounds
        };

        if verdict == Verdict::InBounds {
            state = Correction::Settled;
            continue;
        }
        if state == Correction::DirectionReversed {
            // Rounding keeps pushing the mantissa off both edges; it sits
            // exactly on a lattice boundary, so clamp it there.
            mantissa = lower;
            state = Correction::Settled;
            continue;
        }

        let move_up = verdict == Verdict::Over;
        exponent = if move_up {
            steps.next_step_value(exponent)
        } else {
            steps.previous_step_value(exponent)
        };
        if last_move_up == Some(!move_up) {
            state = Correction::DirectionReversed;
        }
        last_move_up = Some(move_up);

        let rescaled = value / base.pow(exponent / exp_mult);
        if rescaled == unrounded {
            // Fixed point: the remaining violation is float noise.
            state = Correction::Settled;
        }
        unrounded = rescaled;
        mantissa = round_to(unrounded, rounding);
    }

    Ok((mantissa, exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: f64) -> Decimal {
        Decimal::from_number(n)
    }

    fn split(value: f64) -> (Decimal, Decimal) {
        scientifify(dec(value), Decimal::ten()).unwrap()
    }

    #[test]
    fn test_plain_scientific() {
        let (m, e) = split(2357.0);
        assert!(m.eq_tolerance(&dec(2.357), 1e-9));
        assert_eq!(e, dec(3.0));

        let (m, e) = split(1.0);
        assert!(m.eq_tolerance(&dec(1.0), 1e-9));
        assert_eq!(e, dec(0.0));

        let (m, e) = split(0.0123);
        assert!(m.eq_tolerance(&dec(1.23), 1e-9));
        assert_eq!(e, dec(-2.0));
    }

    #[test]
    fn test_negative_value() {
        let (m, e) = split(-2357.0);
        assert!(m.eq_tolerance(&dec(-2.357), 1e-9));
        assert_eq!(e, dec(3.0));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(split(0.0), (Decimal::zero(), Decimal::zero()));

        let (m, e) = scientifify(Decimal::nan(), Decimal::ten()).unwrap();
        assert_eq!(m, Decimal::nan());
        assert_eq!(e, Decimal::nan());

        let (m, e) = scientifify(Decimal::inf(), Decimal::ten()).unwrap();
        assert_eq!(m, Decimal::inf());
        assert_eq!(e, Decimal::inf());

        let (m, e) = scientifify(Decimal::neg_inf(), Decimal::ten()).unwrap();
        assert_eq!(m, Decimal::neg_inf());
        assert_eq!(e, Decimal::inf());
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            scientifify(dec(5.0), Decimal::one()).unwrap_err(),
            SplitError::InvalidBase
        );
        assert_eq!(
            scientifify(dec(5.0), dec(-2.0)).unwrap_err(),
            SplitError::InvalidBase
        );
        assert_eq!(
            scientifify_with(
                dec(5.0),
                Decimal::ten(),
                &Rounding::none(),
                Decimal::zero(),
                &StepList::default(),
                Decimal::zero(),
            )
            .unwrap_err(),
            SplitError::InvalidMultiplier
        );
    }

    #[test]
    fn test_engineering_steps() {
        let eng = StepList::single(dec(3.0)).unwrap();

        let (m, e) = scientifify_with(
            dec(2357.0),
            Decimal::ten(),
            &Rounding::none(),
            Decimal::zero(),
            &eng,
            Decimal::one(),
        )
        .unwrap();
        assert!(m.eq_tolerance(&dec(2.357), 1e-9));
        assert_eq!(e, dec(3.0));

        // An exponent of 4 is off the lattice and drops back to 3.
        let (m, e) = scientifify_with(
            dec(23570.0),
            Decimal::ten(),
            &Rounding::none(),
            Decimal::zero(),
            &eng,
            Decimal::one(),
        )
        .unwrap();
        assert!(m.eq_tolerance(&dec(23.57), 1e-9));
        assert_eq!(e, dec(3.0));
    }

    #[test]
    fn test_mantissa_power() {
        let (m, e) = scientifify_with(
            dec(2357.0),
            Decimal::ten(),
            &Rounding::none(),
            Decimal::one(),
            &StepList::default(),
            Decimal::one(),
        )
        .unwrap();
        assert!(m.eq_tolerance(&dec(23.57), 1e-9));
        assert_eq!(e, dec(2.0));
    }

    #[test]
    fn test_exp_multiplier() {
        let (m, e) = scientifify_with(
            dec(2357.0),
            Decimal::ten(),
            &Rounding::none(),
            Decimal::zero(),
            &StepList::default(),
            dec(2.0),
        )
        .unwrap();
        // The returned exponent lives on the doubled scale.
        assert_eq!(e, dec(6.0));
        assert!(m.eq_tolerance(&dec(2.357), 1e-9));
    }

    #[test]
    fn test_fractional_base() {
        let (m, e) = scientifify(dec(0.04), dec(0.1)).unwrap();
        assert_eq!(e, dec(1.0));
        assert!(m.eq_tolerance(&dec(0.4), 1e-9));
        assert!((m * dec(0.1).pow(e)).eq_tolerance(&dec(0.04), 1e-9));
    }

    #[test]
    fn test_rounding_pushes_across_boundary() {
        let sig2 = Rounding::significant_figures(2, Decimal::ten());
        let (m, e) = scientifify_with(
            dec(999.99),
            Decimal::ten(),
            &sig2,
            Decimal::zero(),
            &StepList::default(),
            Decimal::one(),
        )
        .unwrap();
        assert!(m.eq_tolerance(&dec(1.0), 1e-9));
        assert_eq!(e, dec(3.0));
    }

    #[test]
    fn test_boundary_clamp_is_deterministic() {
        // A rounding quantum of 3 leaves no representable mantissa for 11:
        // at exponent 1 the mantissa rounds to 0, at exponent 0 it rounds
        // to 12. The loop reverses once, then clamps.
        let coarse = Rounding::from(3.0);
        let first = scientifify_with(
            dec(11.0),
            Decimal::ten(),
            &coarse,
            Decimal::zero(),
            &StepList::default(),
            Decimal::one(),
        )
        .unwrap();
        assert_eq!(first, (dec(1.0), dec(1.0)));

        let second = scientifify_with(
            dec(11.0),
            Decimal::ten(),
            &coarse,
            Decimal::zero(),
            &StepList::default(),
            Decimal::one(),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_across_magnitudes() {
        for k in -20..=20 {
            let value = dec(3.7) * Decimal::ten().pow(dec(k as f64));
            let (m, e) = scientifify(value, Decimal::ten()).unwrap();
            let rebuilt = m * Decimal::ten().pow(e);
            assert!(
                rebuilt.eq_tolerance(&value, 1e-9),
                "round trip failed at 3.7e{}",
                k
            );
        }
    }

    #[test]
    fn test_exponent_on_lattice() {
        let steps = StepList::new(vec![dec(5.0), dec(2.0)]).unwrap();
        for v in &[1.0, 47.0, 3.1e9, 7.7e22] {
            let (_, e) = scientifify_with(
                dec(*v),
                Decimal::ten(),
                &Rounding::none(),
                Decimal::zero(),
                &steps,
                Decimal::one(),
            )
            .unwrap();
            assert_eq!(steps.current_step_value(e), e);
        }
    }

    #[test]
    fn test_huge_exponent_skips_refinement() {
        let value = Decimal::from_components(1, 2, 100.0);
        let (m, e) = scientifify(value, Decimal::ten()).unwrap();
        assert!(e > Decimal::from_number(EXPONENT_SENTINEL));
        assert!(!is_nan(m));
    }
}
