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

//! Exponent step lattices.

use crate::convert::is_finite;
use crate::error::SplitError;
use break_eternity::Decimal;
use stack_buf::StackVec;

/// Maximum number of step sizes in a [`StepList`].
pub const STEP_SLOTS: usize = 8;

/// Coefficient array of a lattice point, most significant step first.
pub type StepCoeffs = StackVec<Decimal, STEP_SLOTS>;

/// An ordered set of allowed exponent increments.
///
/// A step list defines a lattice of allowed exponent positions: every value
/// reachable by greedily stacking the steps in descending order, mirrored
/// into the negatives. Decompositions snap their exponents onto this
/// lattice, so a single-element list `[1]` allows every integer exponent,
/// `[3]` produces engineering notation, and irregular lists like `[5, 2]`
/// produce mixed grids.
///
/// The list is normalized once at construction (sorted descending,
/// deduplicated, validated) and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{Decimal, StepList};
///
/// let eng = StepList::single(Decimal::from_number(3.0)).unwrap();
/// assert_eq!(eng.current_step_value(Decimal::from_number(10.0)), Decimal::from_number(9.0));
/// assert_eq!(eng.next_step_value(Decimal::from_number(10.0)), Decimal::from_number(12.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct StepList {
    steps: Vec<Decimal>,
}

impl StepList {
    /// Creates a step list from the given step sizes.
    ///
    /// Steps are sorted into descending order and deduplicated. Empty
    /// input, non-positive or non-finite steps, and more than
    /// [`STEP_SLOTS`] distinct steps are configuration errors.
    pub fn new(steps: Vec<Decimal>) -> Result<StepList, SplitError> {
        if steps.is_empty() {
            return Err(SplitError::EmptyStepList);
        }

        for step in &steps {
            if !is_finite(*step) || *step <= Decimal::zero() {
                return Err(SplitError::InvalidStep);
            }
        }

        let mut steps = steps;
        steps.sort_by(|a, b| b.cmp(a));
        steps.dedup();

        if steps.len() > STEP_SLOTS {
            return Err(SplitError::TooManySteps);
        }

        Ok(StepList { steps })
    }

    /// Creates a single-step list.
    #[inline]
    pub fn single(step: Decimal) -> Result<StepList, SplitError> {
        StepList::new(vec![step])
    }

    /// The normalized step sizes, descending.
    #[inline]
    pub fn steps(&self) -> &[Decimal] {
        &self.steps
    }

    /// The coefficient array of the greatest lattice point at or below
    /// `value` (greedy change-making over the steps).
    ///
    /// Negative values delegate to the positive case and negate the
    /// coefficients; non-finite values saturate the first coefficient.
    pub fn current_step(&self, value: Decimal) -> StepCoeffs {
        if !is_finite(value) {
            return self.saturated(value);
        }
        let point = self.current_step_value(value);
        self.coeffs_of(point)
    }

    /// The greatest lattice point at or below `value`.
    pub fn current_step_value(&self, value: Decimal) -> Decimal {
        if !is_finite(value) {
            return value;
        }
        if value == Decimal::zero() {
            return Decimal::zero();
        }
        if value > Decimal::zero() {
            combine(&self.steps, &greedy(&self.steps, value))
        } else {
            -self.ceil_value(-value)
        }
    }

    /// The coefficient array one lattice unit above [`current_step`].
    ///
    /// [`current_step`]: StepList::current_step
    pub fn next_step(&self, value: Decimal) -> StepCoeffs {
        if !is_finite(value) {
            return self.saturated(value);
        }
        self.coeffs_of(self.next_step_value(value))
    }

    /// The least lattice point strictly above `value`.
    pub fn next_step_value(&self, value: Decimal) -> Decimal {
        if !is_finite(value) {
            return value;
        }
        if value >= Decimal::zero() {
            successor(&self.steps, value)
        } else {
            -greatest_below(&self.steps, -value)
        }
    }

    /// The coefficient array one lattice unit below [`current_step`].
    ///
    /// [`current_step`]: StepList::current_step
    pub fn previous_step(&self, value: Decimal) -> StepCoeffs {
        if !is_finite(value) {
            return self.saturated(value);
        }
        self.coeffs_of(self.previous_step_value(value))
    }

    /// The greatest lattice point strictly below [`current_step_value`].
    ///
    /// For values not on the lattice this is one unit below the snapped
    /// point, so `previous_step_value(next_step_value(v))` recovers
    /// `current_step_value(v)`.
    ///
    /// [`current_step_value`]: StepList::current_step_value
    pub fn previous_step_value(&self, value: Decimal) -> Decimal {
        if !is_finite(value) {
            return value;
        }
        if value == Decimal::zero() {
            return -successor(&self.steps, Decimal::zero());
        }
        if value > Decimal::zero() {
            let point = combine(&self.steps, &greedy(&self.steps, value));
            if point == Decimal::zero() {
                -successor(&self.steps, Decimal::zero())
            } else {
                greatest_below(&self.steps, point)
            }
        } else {
            -successor(&self.steps, self.ceil_value(-value))
        }
    }

    /// Reconstructs the lattice value of a coefficient array.
    pub fn step_value(&self, coeffs: &[Decimal]) -> Decimal {
        let mut value = Decimal::zero();
        for (coeff, step) in coeffs.iter().zip(self.steps.iter()) {
            value = value + *coeff * *step;
        }
        value
    }

    /// Least lattice point at or above `value` (positive `value` only).
    fn ceil_value(&self, value: Decimal) -> Decimal {
        let point = combine(&self.steps, &greedy(&self.steps, value));
        if point == value {
            point
        } else {
            successor(&self.steps, value)
        }
    }

    fn coeffs_of(&self, point: Decimal) -> StepCoeffs {
        let mut coeffs = StepCoeffs::new();
        let raw = greedy(&self.steps, point.abs());
        let negative = point < Decimal::zero();
        for c in raw.iter().take(self.steps.len()) {
            coeffs.push(if negative { -*c } else { *c });
        }
        coeffs
    }

    fn saturated(&self, value: Decimal) -> StepCoeffs {
        let mut coeffs = StepCoeffs::new();
        coeffs.push(value);
        for _ in 1..self.steps.len() {
            coeffs.push(Decimal::zero());
        }
        coeffs
    }
}

impl Default for StepList {
    /// The unrestricted lattice: every integer.
    #[inline]
    fn default() -> StepList {
        StepList {
            steps: vec![Decimal::one()],
        }
    }
}

/// Greedy mixed-radix decomposition of a non-negative value.
fn greedy(steps: &[Decimal], value: Decimal) -> [Decimal; STEP_SLOTS] {
    let mut coeffs = [Decimal::zero(); STEP_SLOTS];
    let mut rem = value;
    for (i, step) in steps.iter().enumerate() {
        let quotient = rem / *step;
        let mut coeff = quotient.floor();
        // The reciprocal-based division can land a hair under an exact
        // multiple; the tolerant equality snaps it back up.
        if coeff + Decimal::one() == quotient {
            coeff = coeff + Decimal::one();
        }
        if coeff > Decimal::zero() {
            coeffs[i] = coeff;
            rem = rem - coeff * *step;
            if rem < Decimal::zero() {
                rem = Decimal::zero();
            }
        }
    }
    coeffs
}

fn combine(steps: &[Decimal], coeffs: &[Decimal; STEP_SLOTS]) -> Decimal {
    let mut value = Decimal::zero();
    for (step, coeff) in steps.iter().zip(coeffs.iter()) {
        value = value + *coeff * *step;
    }
    value
}

/// Least lattice point strictly above a non-negative value.
///
/// Scans positions least to most significant; bumping position `i` and
/// zeroing everything after it always lands above `value` because the
/// greedy remainder at `i` is below `steps[i]`.
fn successor(steps: &[Decimal], value: Decimal) -> Decimal {
    let cur = greedy(steps, value);
    let mut best: Option<Decimal> = None;
    for i in (0..steps.len()).rev() {
        let mut cand = [Decimal::zero(); STEP_SLOTS];
        cand[..i].copy_from_slice(&cur[..i]);
        cand[i] = cur[i] + Decimal::one();
        let v = combine(steps, &cand);
        if v > value && best.map_or(true, |b| v < b) {
            best = Some(v);
        }
    }
    best.unwrap_or_else(|| value + steps[steps.len() - 1])
}

/// Greatest lattice point strictly below a positive value.
///
/// Off-lattice values snap down directly. On-lattice values decrement one
/// coefficient and refill the less significant positions as high as
/// canonicity allows, keeping the largest candidate.
fn greatest_below(steps: &[Decimal], value: Decimal) -> Decimal {
    if steps.is_empty() || value <= Decimal::zero() {
        return Decimal::zero();
    }

    let cur = greedy(steps, value);
    let snapped = combine(steps, &cur);
    if snapped < value {
        return snapped;
    }

    let mut best = Decimal::zero();
    for i in 0..steps.len() {
        if cur[i] <= Decimal::zero() {
            continue;
        }
        let mut prefix = Decimal::zero();
        for j in 0..i {
            prefix = prefix + cur[j] * steps[j];
        }
        prefix = prefix + (cur[i] - Decimal::one()) * steps[i];

        // The lower positions may refill up to (but not including) the
        // decremented step; any more and the array would no longer be
        // greedy-canonical.
        let cand = prefix + greatest_below(&steps[(i + 1)..], steps[i]);
        if cand > best {
            best = cand;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: f64) -> Decimal {
        Decimal::from_number(n)
    }

    fn list(steps: &[f64]) -> StepList {
        StepList::new(steps.iter().map(|s| dec(*s)).collect()).unwrap()
    }

    #[test]
    fn test_new_normalizes() {
        let s = StepList::new(vec![dec(2.0), dec(5.0), dec(2.0)]).unwrap();
        assert_eq!(s.steps(), &[dec(5.0), dec(2.0)]);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert_eq!(StepList::new(vec![]).unwrap_err(), SplitError::EmptyStepList);
        assert_eq!(StepList::single(dec(0.0)).unwrap_err(), SplitError::InvalidStep);
        assert_eq!(StepList::single(dec(-3.0)).unwrap_err(), SplitError::InvalidStep);
        assert_eq!(StepList::single(Decimal::nan()).unwrap_err(), SplitError::InvalidStep);

        let too_many: Vec<Decimal> = (1..=9).map(|n| dec(n as f64)).collect();
        assert_eq!(StepList::new(too_many).unwrap_err(), SplitError::TooManySteps);
    }

    #[test]
    fn test_unit_lattice() {
        let s = StepList::default();
        assert_eq!(s.current_step_value(dec(3.7)), dec(3.0));
        assert_eq!(s.next_step_value(dec(3.7)), dec(4.0));
        assert_eq!(s.previous_step_value(dec(3.7)), dec(2.0));
        assert_eq!(s.current_step_value(dec(-3.7)), dec(-4.0));
        assert_eq!(s.next_step_value(dec(-3.7)), dec(-3.0));
        assert_eq!(s.previous_step_value(dec(-3.7)), dec(-5.0));
    }

    #[test]
    fn test_engineering_lattice() {
        let s = list(&[3.0]);
        assert_eq!(s.current_step_value(dec(10.0)), dec(9.0));
        assert_eq!(s.next_step_value(dec(10.0)), dec(12.0));
        assert_eq!(s.previous_step_value(dec(10.0)), dec(6.0));
        assert_eq!(s.current_step_value(dec(9.0)), dec(9.0));
        assert_eq!(s.next_step_value(dec(9.0)), dec(12.0));
        assert_eq!(s.previous_step_value(dec(9.0)), dec(6.0));
        assert_eq!(s.current_step_value(dec(-4.0)), dec(-6.0));
    }

    #[test]
    fn test_mixed_lattice() {
        // Lattice of [5, 2]: 0, 2, 4, 5, 7, 9, 10, 12, 14, 15, ...
        let s = list(&[5.0, 2.0]);
        assert_eq!(s.current_step_value(dec(9.5)), dec(9.0));
        assert_eq!(s.next_step_value(dec(9.5)), dec(10.0));
        assert_eq!(s.next_step_value(dec(4.0)), dec(5.0));
        assert_eq!(s.previous_step_value(dec(10.0)), dec(9.0));
        assert_eq!(s.previous_step_value(dec(5.0)), dec(4.0));
        assert_eq!(s.next_step_value(dec(0.0)), dec(2.0));
        assert_eq!(s.previous_step_value(dec(0.0)), dec(-2.0));
    }

    #[test]
    fn test_coefficients_round_trip() {
        let s = list(&[5.0, 2.0]);
        let coeffs = s.current_step(dec(13.0));
        assert_eq!(coeffs.as_slice(), &[dec(2.0), dec(1.0)]);
        assert_eq!(s.step_value(coeffs.as_slice()), dec(12.0));

        let neg = s.current_step(dec(-12.0));
        assert_eq!(neg.as_slice(), &[dec(-2.0), dec(-1.0)]);
        assert_eq!(s.step_value(neg.as_slice()), dec(-12.0));
    }

    #[test]
    fn test_adjacency_property() {
        // previous(next(v)) == current(v) for off-lattice v.
        for s in &[list(&[1.0]), list(&[3.0]), list(&[5.0, 2.0]), list(&[7.0, 3.0, 1.0])] {
            for v in &[0.5, 2.5, 9.5, 11.1, 26.9] {
                let v = dec(*v);
                let next = s.next_step_value(v);
                assert!(next > s.current_step_value(v));
                assert_eq!(s.previous_step_value(next), s.current_step_value(v));
            }
        }
    }

    #[test]
    fn test_negation_symmetry() {
        let s = list(&[5.0, 2.0]);
        for v in &[0.5, 4.0, 9.5, 10.0, 26.9] {
            let v = dec(*v);
            assert_eq!(s.current_step_value(-v), -s.ceil_value(v));
            assert_eq!(s.next_step_value(-v), -greatest_below(s.steps(), v));
        }
    }

    #[test]
    fn test_huge_values() {
        let s = StepList::default();
        let huge = Decimal::from_mantissa_exponent(1.0, 30.0);
        // Integers at this scale are already lattice points.
        assert_eq!(s.current_step_value(huge), huge);
    }

    #[test]
    fn test_non_finite_passthrough() {
        let s = StepList::default();
        assert_eq!(s.current_step_value(Decimal::inf()), Decimal::inf());
        assert_eq!(s.next_step_value(Decimal::nan()), Decimal::nan());
        assert_eq!(s.current_step(Decimal::inf()).as_slice()[0], Decimal::inf());
    }
}
