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

//! Full multi-level decomposition.

use crate::convert::{is_finite, is_nan};
use crate::error::SplitError;
use crate::hyper::{iterated_exp_mult, iterated_mult_log, mult_slog, TETRATION_CONVERGENCE_LIMIT};
use crate::round::{round_to, Rounding};
use crate::scientific::scientifify_with;
use crate::steps::StepList;
use break_eternity::Decimal;

/// Bound on per-level reduction walks. Every reduction strips a logarithm
/// or a super-logarithm, so anything this bound cuts off is a tower more
/// than 64 levels past its ceiling; the cascade then settles one level up.
const LEVEL_LIMIT: u32 = 64;

/// Configuration of a [`hypersplit`] cascade.
///
/// `maximums` are the ceilings of the mantissa, exponent and tetration
/// components; the pentation component has no ceiling. A component that
/// reaches its ceiling rolls over into the next level up, and a level whose
/// ceiling does not exceed its own multiplier is disabled outright, pushing
/// its load upward. `original_maximums` replace `maximums` for a level
/// while every level above it is still zero, so the first components of a
/// decomposition may be granted more room than later ones.
///
/// `minnum` is the lower edge of the mantissa-only range: values in
/// `[minnum, mantissa maximum)` come back as a bare rounded mantissa.
#[derive(Debug)]
pub struct HypersplitConfig {
    /// Decomposition base, shared by every level.
    pub base: Decimal,
    /// Ceilings of the mantissa, exponent and tetration components.
    pub maximums: [Decimal; 3],
    /// First-use ceilings, applied while all higher components are zero.
    pub original_maximums: [Decimal; 3],
    /// Lower edge of the mantissa-only range.
    pub minnum: Decimal,
    /// Mantissa rounding policy.
    pub rounding: Rounding,
    /// Exponent step lattice.
    pub steps: StepList,
    /// Tetration step lattice.
    pub hyper_steps: StepList,
    /// Pentation step lattice.
    pub penta_steps: StepList,
    /// Scale of the exponent component.
    pub exp_mult: Decimal,
    /// Scale of the tetration component.
    pub hyperexp_mult: Decimal,
    /// Scale of the pentation component.
    pub penta_mult: Decimal,
}

impl HypersplitConfig {
    /// A default cascade in `base`: every ceiling equals the base, no
    /// rounding, unrestricted integer lattices, unit multipliers.
    pub fn new(base: Decimal) -> HypersplitConfig {
        HypersplitConfig {
            base,
            maximums: [base; 3],
            original_maximums: [base; 3],
            minnum: Decimal::one(),
            rounding: Rounding::none(),
            steps: StepList::default(),
            hyper_steps: StepList::default(),
            penta_steps: StepList::default(),
            exp_mult: Decimal::one(),
            hyperexp_mult: Decimal::one(),
            penta_mult: Decimal::one(),
        }
    }

    fn validate(&self) -> Result<(), SplitError> {
        if !is_finite(self.base) || self.base <= Decimal::one() {
            return Err(SplitError::InvalidBase);
        }
        for mult in &[self.exp_mult, self.hyperexp_mult, self.penta_mult] {
            if !is_finite(*mult) || *mult <= Decimal::zero() {
                return Err(SplitError::InvalidMultiplier);
            }
        }
        // The pentation level has no ceiling, so a cascade can always reach
        // tetration territory; the base has to make tetration diverge.
        let eff_base = if self.exp_mult == Decimal::one() {
            self.base
        } else {
            self.base.pow(self.exp_mult)
        };
        if eff_base <= Decimal::from_number(TETRATION_CONVERGENCE_LIMIT) {
            return Err(SplitError::ConvergentBase);
        }
        for max in self.maximums.iter().chain(self.original_maximums.iter()) {
            if !is_finite(*max) || *max <= Decimal::zero() {
                return Err(SplitError::InvalidMaximum);
            }
        }
        if !is_finite(self.minnum) || self.minnum <= Decimal::zero() {
            return Err(SplitError::InvalidMinimum);
        }
        if self.minnum >= self.maximums[0] || self.minnum >= self.original_maximums[0] {
            return Err(SplitError::InvalidMinimum);
        }
        Ok(())
    }

    fn exponent_enabled(&self) -> bool {
        self.maximums[1] > self.exp_mult
    }

    fn tetration_enabled(&self) -> bool {
        self.maximums[2] > self.hyperexp_mult
    }
}

/// One pass below the pentation level: mantissa, exponent and tetration.
enum LowerSplit {
    Fits(Decimal, Decimal, Decimal),
    Overflow,
}

/// Decomposes `value` into `(mantissa, exponent, tetration, pentation)`.
///
/// Applying the levels top down reconstructs the value: start from the
/// mantissa, multiply by `base^(exponent / exp_mult)`, iterate the scaled
/// exponential `tetration / hyperexp_mult` times, then apply the scaled
/// tower `pentation / penta_mult` times (see [`recompose`]).
///
/// Each reduction inside the cascade replaces the value by a scaled
/// logarithm or super-logarithm of itself, so the magnitude strictly
/// decreases on the way down; the walks are additionally bounded, and an
/// exhausted budget settles one level up rather than failing.
///
/// Zero, NaN and infinities map onto all four components directly.
/// Negative values decompose as their absolute value with the mantissa
/// negated. Positive values below `minnum` use a negative exponent when
/// the exponent level is enabled; with the exponent level disabled they
/// decompose as their reciprocal with every component negated.
///
/// # Examples
///
/// ```
/// use hypersplit_rs::{hypersplit, Decimal, HypersplitConfig};
///
/// let config = HypersplitConfig::new(Decimal::ten());
/// let (m, e, t, p) = hypersplit(Decimal::from_number(1e15), &config).unwrap();
/// assert!(m.eq_tolerance(&Decimal::from_number(1.5), 1e-9));
/// assert_eq!(e, Decimal::one());
/// assert_eq!(t, Decimal::one());
/// assert_eq!(p, Decimal::zero());
/// ```
pub fn hypersplit(
    value: Decimal,
    config: &HypersplitConfig,
) -> Result<(Decimal, Decimal, Decimal, Decimal), SplitError> {
    config.validate()?;

    if is_nan(value) {
        let nan = Decimal::nan();
        return Ok((nan, nan, nan, nan));
    }
    if value == Decimal::zero() {
        let zero = Decimal::zero();
        return Ok((zero, zero, zero, zero));
    }
    if value == Decimal::inf() || value == Decimal::neg_inf() {
        return Ok((value, Decimal::inf(), Decimal::inf(), Decimal::inf()));
    }
    if value < Decimal::zero() {
        let (m, e, t, p) = hypersplit(-value, config)?;
        return Ok((-m, e, t, p));
    }
    if value < Decimal::one() && value < config.minnum && !config.exponent_enabled() {
        let (m, e, t, p) = hypersplit(value.recip(), config)?;
        return Ok((m.recip(), -e, -t, -p));
    }

    let mut x = value;
    let mut pentation = Decimal::zero();

    for _ in 0..LEVEL_LIMIT {
        if let LowerSplit::Fits(m, e, t) =
            split_lower_levels(x, config, pentation == Decimal::zero(), false)?
        {
            // The pentation component walks in multiplier units; keep
            // reducing until it lands on its lattice.
            if config.penta_steps.current_step_value(pentation) == pentation {
                return Ok((m, e, t, pentation));
            }
        }
        x = mult_slog(x, config.base, config.exp_mult);
        pentation = pentation + config.penta_mult;
    }

    // Budget exhausted: settle with whatever the lower levels hold now.
    match split_lower_levels(x, config, false, true)? {
        LowerSplit::Fits(m, e, t) => Ok((m, e, t, pentation)),
        LowerSplit::Overflow => unreachable!("forced split always fits"),
    }
}

/// Recomposes the four components of a [`hypersplit`] back into a value.
pub fn recompose(
    mantissa: Decimal,
    exponent: Decimal,
    tetration: Decimal,
    pentation: Decimal,
    config: &HypersplitConfig,
) -> Decimal {
    let mut x = mantissa * config.base.pow(exponent / config.exp_mult);
    if tetration != Decimal::zero() {
        x = iterated_exp_mult(
            config.base,
            x,
            tetration / config.hyperexp_mult,
            config.exp_mult,
        );
    }
    let mut count = pentation / config.penta_mult;
    for _ in 0..LEVEL_LIMIT {
        if count >= Decimal::one() {
            x = iterated_exp_mult(config.base, Decimal::one(), x, config.exp_mult);
            count = count - Decimal::one();
        } else if count <= Decimal::neg_one() {
            x = mult_slog(x, config.base, config.exp_mult);
            count = count + Decimal::one();
        } else {
            break;
        }
    }
    x
}

/// Splits everything below the pentation level. `higher_zero` selects the
/// first-use ceilings; `force` ignores ceilings and disabled levels so an
/// exhausted cascade can still settle.
fn split_lower_levels(
    x: Decimal,
    config: &HypersplitConfig,
    higher_zero: bool,
    force: bool,
) -> Result<LowerSplit, SplitError> {
    let mut y = x;
    let mut tetration = Decimal::zero();
    let mut last_fit: Option<(Decimal, Decimal)> = None;

    for _ in 0..LEVEL_LIMIT {
        let first_use = higher_zero && tetration == Decimal::zero();
        if let Some((m, e)) = split_mantissa_exponent(y, config, first_use, force)? {
            last_fit = Some((m, e));
            if config.hyper_steps.current_step_value(tetration) == tetration {
                let t_cap = if higher_zero {
                    config.original_maximums[2]
                } else {
                    config.maximums[2]
                };
                if force || tetration < t_cap {
                    return Ok(LowerSplit::Fits(m, e, tetration));
                }
                return Ok(LowerSplit::Overflow);
            }
            // Off the tetration lattice: take one more reduction.
        }
        if !force && !config.tetration_enabled() {
            return Ok(LowerSplit::Overflow);
        }
        // Reduction: one scaled logarithm. This strictly shrinks y, so the
        // walk always makes progress toward the mantissa window.
        y = iterated_mult_log(y, config.base, Decimal::one(), config.exp_mult);
        tetration = tetration + config.hyperexp_mult;
    }

    if force {
        let (m, e) = last_fit.unwrap_or((round_to(y, &config.rounding), Decimal::zero()));
        return Ok(LowerSplit::Fits(m, e, tetration));
    }
    Ok(LowerSplit::Overflow)
}

/// Splits the mantissa and exponent components, or reports that the
/// exponent component would cross its ceiling.
fn split_mantissa_exponent(
    y: Decimal,
    config: &HypersplitConfig,
    first_use: bool,
    force: bool,
) -> Result<Option<(Decimal, Decimal)>, SplitError> {
    // A NaN here means an earlier reduction left the domain (a log of a
    // negative remainder); surface it instead of walking further.
    if is_nan(y) {
        return Ok(Some((Decimal::nan(), Decimal::zero())));
    }

    let mantissa_cap = if first_use {
        config.original_maximums[0]
    } else {
        config.maximums[0]
    };
    let exponent_cap = if first_use {
        config.original_maximums[1]
    } else {
        config.maximums[1]
    };

    if y >= config.minnum && y < mantissa_cap {
        return Ok(Some((round_to(y, &config.rounding), Decimal::zero())));
    }
    if !config.exponent_enabled() && !force {
        return Ok(None);
    }

    let (m, e) = scientifify_with(
        y,
        config.base,
        &config.rounding,
        Decimal::zero(),
        &config.steps,
        config.exp_mult,
    )?;
    if force || e < exponent_cap {
        Ok(Some((m, e)))
    } else {
        Ok(None)
    }
}
