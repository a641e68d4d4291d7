//! CBS — the consumption tax introduced by the VAT reform.
//!
//! During the transition the nominal rate is a statutory parameter that
//! changes year over year (0.9% in the test phase, converging toward the
//! steady-state rate), so it is always supplied by the caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationError, check_base};
use crate::core::Rate;

/// Immutable result of a CBS assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbsAssessment {
    /// Base after reduction, if any.
    pub base: Decimal,
    /// Nominal rate applied.
    pub rate: Rate,
    /// Nominal tax on the (possibly reduced) base.
    pub value: Decimal,
    /// Portion of `value` carried forward rather than due now.
    /// Reported separately, never subtracted from `value`.
    pub deferred: Decimal,
}

impl CbsAssessment {
    /// Cash amount due immediately: nominal tax minus the deferred portion.
    pub fn due(&self) -> Decimal {
        self.value - self.deferred
    }
}

/// Compute CBS for one line.
///
/// Reduction and deferral compose independently: the tax is computed on the
/// reduced base, then the deferral percentage applies to that tax value.
pub fn calculate(
    base: Decimal,
    rate: Rate,
    reduction: Option<Rate>,
    deferral: Option<Rate>,
) -> Result<CbsAssessment, CalculationError> {
    check_base(base)?;

    let effective = match reduction {
        Some(reduction) => base * reduction.complement(),
        None => base,
    };
    let value = rate.of(effective);
    let deferred = match deferral {
        Some(deferral) => deferral.of(value),
        None => Decimal::ZERO,
    };

    Ok(CbsAssessment {
        base: effective,
        rate,
        value,
        deferred,
    })
}
