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

//! Bracket-search inverses of functions with no closed-form inverse.

use crate::convert::is_nan;
use break_eternity::Decimal;

/// Relative width at which a bisection bracket counts as converged.
const SOLVE_TOLERANCE: f64 = 1e-15;

/// Iteration cap across both search phases. Hitting it returns the current
/// estimate rather than failing.
const SOLVE_LIMIT: u32 = 200;

/// Input where the factorial curve bottoms out; the increasing branch
/// starts here.
const FACTORIAL_MIN_INPUT: f64 = 0.461632144968362;

/// Finds `x` with `forward(x) == target` for an increasing `forward`.
///
/// Two phases: from `seed`, the stride doubles in the direction of the
/// target until the comparison flips, then every move halves the stride,
/// which bisects the bracket the flip established. The search stops when
/// the stride is within a relative tolerance of the position or the
/// iteration budget runs out, returning the best estimate either way.
///
/// A NaN from `forward` reads as "below the target" so that probes past
/// the lower edge of the forward function's domain turn the search around
/// instead of derailing it. Callers are expected to reject targets outside
/// the forward range before searching.
pub fn solve_increasing<F>(forward: F, target: Decimal, seed: Decimal) -> Decimal
where
    F: Fn(Decimal) -> Decimal,
{
    if is_nan(target) || is_nan(seed) {
        return Decimal::nan();
    }

    let compare_below = |x: Decimal| -> Option<bool> {
        let fx = forward(x);
        if is_nan(fx) {
            return Some(true);
        }
        if fx == target {
            None
        } else {
            Some(fx < target)
        }
    };

    let mut x = seed;
    let mut going_up = match compare_below(x) {
        None => return x,
        Some(below) => below,
    };
    let mut step = Decimal::one();
    let mut reversed = false;

    for _ in 0..SOLVE_LIMIT {
        let next = if going_up { x + step } else { x - step };
        let below = match compare_below(next) {
            None => return next,
            Some(below) => below,
        };
        x = next;

        if below != going_up {
            reversed = true;
            going_up = below;
            step = step / Decimal::two();
        } else if reversed {
            step = step / Decimal::two();
        } else {
            step = step * Decimal::two();
        }

        if reversed {
            let scale = x.abs().max(Decimal::one());
            if step / scale < Decimal::from_number(SOLVE_TOLERANCE) {
                break;
            }
        }
    }
    x
}

/// Applies the factorial to `value`, `height` times.
///
/// Fractional heights blend the last application linearly, the same
/// approximation the tetration primitives use for fractional heights.
/// Negative heights invert instead.
pub fn iterated_factorial(value: Decimal, height: Decimal) -> Decimal {
    if is_nan(value) || is_nan(height) {
        return Decimal::nan();
    }
    if height < Decimal::zero() {
        return inverse_factorial(value, -height);
    }

    let whole = height.floor();
    let fraction = height - whole;
    let mut result = value;
    let mut applied = Decimal::zero();
    while applied < whole {
        result = result.factorial();
        applied = applied + Decimal::one();
        if is_nan(result) || result == Decimal::inf() || applied > Decimal::from_number(100.0) {
            return result;
        }
    }
    if fraction > Decimal::zero() {
        result = result + (result.factorial() - result) * fraction;
    }
    result
}

/// Finds `x` with `iterated_factorial(x, height) == value` on the
/// increasing branch of the factorial curve.
///
/// Targets below the curve's minimum have no preimage there and come back
/// as NaN.
pub fn inverse_factorial(value: Decimal, height: Decimal) -> Decimal {
    if is_nan(value) || is_nan(height) {
        return Decimal::nan();
    }
    if height == Decimal::zero() {
        return value;
    }
    if height < Decimal::zero() {
        return iterated_factorial(value, -height);
    }

    let branch_start = Decimal::from_number(FACTORIAL_MIN_INPUT);
    if value < iterated_factorial(branch_start, height) {
        return Decimal::nan();
    }
    solve_increasing(
        |x| iterated_factorial(x.max(branch_start), height),
        value,
        Decimal::two(),
    )
}

/// How many factorial applications take 3 to `value`.
#[inline]
pub fn factorial_slog(value: Decimal) -> Decimal {
    factorial_slog_with(value, Decimal::from_number(3.0))
}

/// How many factorial applications take `base` to `value`, fractional via
/// the blended iterated factorial.
///
/// Bases at or below 2 are fixed points or shrink under the factorial, so
/// no application count reaches anywhere; those come back as NaN, as do
/// non-positive targets.
pub fn factorial_slog_with(value: Decimal, base: Decimal) -> Decimal {
    if is_nan(value) || is_nan(base) {
        return Decimal::nan();
    }
    if base <= Decimal::two() || value <= Decimal::zero() {
        return Decimal::nan();
    }
    solve_increasing(
        |height| iterated_factorial(base, height),
        value,
        Decimal::zero(),
    )
}

/// The `n`-th `sides`-gonal number, `((s-2)n^2 - (s-4)n) / 2`, for real `n`.
pub fn polygon(n: Decimal, sides: Decimal) -> Decimal {
    if is_nan(n) || is_nan(sides) || sides < Decimal::from_number(3.0) {
        return Decimal::nan();
    }
    let s2 = sides - Decimal::two();
    let s4 = sides - Decimal::from_number(4.0);
    (s2 * n * n - s4 * n) / Decimal::two()
}

/// Which `n` makes `value` the `n`-th `sides`-gonal number; the quadratic
/// has a closed-form root.
pub fn polygon_root(value: Decimal, sides: Decimal) -> Decimal {
    if is_nan(value) || is_nan(sides) || sides < Decimal::from_number(3.0) {
        return Decimal::nan();
    }
    let s2 = sides - Decimal::two();
    let s4 = sides - Decimal::from_number(4.0);
    let discriminant = Decimal::from_number(8.0) * s2 * value + s4 * s4;
    (discriminant.sqrt() + s4) / (Decimal::two() * s2)
}

/// Applies the `sides`-gonal function to `seed`, `height` times, with the
/// same fractional-height blending as [`iterated_factorial`].
pub fn iterated_polygon(seed: Decimal, height: Decimal, sides: Decimal) -> Decimal {
    if is_nan(seed) || is_nan(height) || is_nan(sides) {
        return Decimal::nan();
    }
    if height < Decimal::zero() {
        return iterated_polygon_root(seed, -height, sides);
    }

    let whole = height.floor();
    let fraction = height - whole;
    let mut result = seed;
    let mut applied = Decimal::zero();
    while applied < whole {
        result = polygon(result, sides);
        applied = applied + Decimal::one();
        if is_nan(result) || result == Decimal::inf() || applied > Decimal::from_number(100.0) {
            return result;
        }
    }
    if fraction > Decimal::zero() {
        result = result + (polygon(result, sides) - result) * fraction;
    }
    result
}

/// Finds the `x` that reaches `value` after `height` applications of the
/// `sides`-gonal function.
///
/// 1 is a fixed point of every polygonal function, so targets below 1 sit
/// under the increasing branch and come back as NaN.
pub fn iterated_polygon_root(value: Decimal, height: Decimal, sides: Decimal) -> Decimal {
    if is_nan(value) || is_nan(height) || is_nan(sides) || sides < Decimal::from_number(3.0) {
        return Decimal::nan();
    }
    if value < Decimal::one() {
        return Decimal::nan();
    }
    solve_increasing(
        |x| iterated_polygon(x.max(Decimal::one()), height, sides),
        value,
        Decimal::two(),
    )
}

/// The height-`height` super-root of `value` under the linear
/// approximation of tetration: the `x` with `x^^height == value`.
///
/// Only the increasing branch `x >= 1` is searched, so `value < 1` or a
/// height below 1 is NaN.
pub fn linear_sroot(value: Decimal, height: Decimal) -> Decimal {
    if is_nan(value) || is_nan(height) {
        return Decimal::nan();
    }
    if height < Decimal::one() || value < Decimal::one() {
        return Decimal::nan();
    }
    let height = height.to_number();
    solve_increasing(
        |x| x.max(Decimal::one()).tetrate(Some(height), None),
        value,
        Decimal::two(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: f64) -> Decimal {
        Decimal::from_number(n)
    }

    #[test]
    fn test_solve_cube() {
        let root = solve_increasing(|x| x.pow(dec(3.0)), dec(27.0), Decimal::one());
        assert!(root.eq_tolerance(&dec(3.0), 1e-9));
    }

    #[test]
    fn test_solve_from_above() {
        // Seed far above the root, so phase one walks downward first.
        let root = solve_increasing(|x| x.pow(dec(3.0)), dec(27.0), dec(40.0));
        assert!(root.eq_tolerance(&dec(3.0), 1e-9));
    }

    #[test]
    fn test_solve_nan_target() {
        assert!(is_nan(solve_increasing(|x| x, Decimal::nan(), dec(1.0))));
    }

    #[test]
    fn test_iterated_factorial() {
        assert!(iterated_factorial(dec(3.0), dec(1.0)).eq_tolerance(&dec(6.0), 1e-6));
        assert!(iterated_factorial(dec(3.0), dec(2.0)).eq_tolerance(&dec(720.0), 1e-6));
        assert_eq!(iterated_factorial(dec(5.0), dec(0.0)), dec(5.0));

        // A fractional height lands between the whole-height values.
        let half = iterated_factorial(dec(3.0), dec(1.5));
        assert!(half > dec(6.0) && half < dec(720.0));
    }

    #[test]
    fn test_inverse_factorial() {
        // x!! == 720 at x == 3.
        let x = inverse_factorial(dec(720.0), dec(2.0));
        assert!(x.eq_tolerance(&dec(3.0), 1e-6));

        let x = inverse_factorial(dec(120.0), Decimal::one());
        assert!(x.eq_tolerance(&dec(5.0), 1e-6));

        let huge = inverse_factorial(dec(1e100), Decimal::one());
        assert!(iterated_factorial(huge, Decimal::one()).eq_tolerance(&dec(1e100), 1e-6));
    }

    #[test]
    fn test_inverse_factorial_below_minimum() {
        // The factorial curve never dips below ~0.8856 on the increasing
        // branch.
        assert!(is_nan(inverse_factorial(dec(0.5), Decimal::one())));
        assert!(!is_nan(inverse_factorial(dec(0.9), Decimal::one())));
    }

    #[test]
    fn test_factorial_slog() {
        assert!(factorial_slog(dec(6.0)).eq_tolerance(&Decimal::one(), 1e-6));
        assert!(factorial_slog(dec(720.0)).eq_tolerance(&Decimal::two(), 1e-6));

        let mid = factorial_slog(dec(100.0));
        assert!(mid > Decimal::one() && mid < Decimal::two());

        assert!(is_nan(factorial_slog_with(dec(100.0), Decimal::two())));
        assert!(is_nan(factorial_slog(dec(-5.0))));
    }

    #[test]
    fn test_polygon() {
        // Triangular numbers.
        assert_eq!(polygon(dec(3.0), dec(3.0)), dec(6.0));
        assert_eq!(polygon(dec(36.0), dec(3.0)), dec(666.0));
        // Squares.
        assert_eq!(polygon(dec(7.0), dec(4.0)), dec(49.0));
        // Pentagonal.
        assert_eq!(polygon(dec(5.0), dec(5.0)), dec(35.0));

        assert!(is_nan(polygon(dec(3.0), dec(2.0))));
    }

    #[test]
    fn test_polygon_root() {
        assert!(polygon_root(dec(666.0), dec(3.0)).eq_tolerance(&dec(36.0), 1e-9));
        assert!(polygon_root(dec(49.0), dec(4.0)).eq_tolerance(&dec(7.0), 1e-9));
        assert!(polygon_root(dec(35.0), dec(5.0)).eq_tolerance(&dec(5.0), 1e-9));
    }

    #[test]
    fn test_iterated_polygon() {
        // polygon(polygon(3)) = polygon(6) = 21 for triangles.
        assert_eq!(iterated_polygon(dec(3.0), dec(2.0), dec(3.0)), dec(21.0));
        assert_eq!(iterated_polygon(dec(3.0), dec(0.0), dec(3.0)), dec(3.0));
    }

    #[test]
    fn test_iterated_polygon_root() {
        let x = iterated_polygon_root(dec(21.0), dec(2.0), dec(3.0));
        assert!(x.eq_tolerance(&dec(3.0), 1e-6));

        assert!(is_nan(iterated_polygon_root(dec(0.5), dec(2.0), dec(3.0))));
    }

    #[test]
    fn test_linear_sroot() {
        // x^x == 256 at x == 4.
        let x = linear_sroot(dec(256.0), dec(2.0));
        assert!(x.eq_tolerance(&dec(4.0), 1e-6));

        // x^x^x == 3^3^3.
        let x = linear_sroot(dec(7625597484987.0), dec(3.0));
        assert!(x.eq_tolerance(&dec(3.0), 1e-6));

        assert!(is_nan(linear_sroot(dec(0.5), dec(2.0))));
        assert!(is_nan(linear_sroot(dec(100.0), dec(0.5))));
    }

    #[test]
    fn test_solver_determinism() {
        let a = inverse_factorial(dec(720.0), dec(2.0));
        let b = inverse_factorial(dec(720.0), dec(2.0));
        assert_eq!(a, b);
    }
}
