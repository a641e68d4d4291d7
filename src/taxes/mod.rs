//! Indirect-tax calculators.
//!
//! Each calculator is a pure function of `(base, situation/rates)` returning
//! an immutable assessment. No shared state, no I/O; safe to call
//! concurrently and repeatedly for the same inputs. Rates are always
//! parameters supplied by the caller's rate-matrix lookup; nothing here
//! hardcodes a statutory value.

pub mod cbs;
pub mod icms;
pub mod seletivo;
pub mod simples;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::RateOutOfRange;

/// Errors shared by the four calculators.
///
/// Out-of-range input is always a hard failure — results never silently
/// clamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CalculationError {
    /// Base amounts must be non-negative for every tax.
    #[error("base amount {0} is negative")]
    NegativeBase(Decimal),

    /// A situation code that mandates a rate was supplied without one.
    #[error("situation code {code} requires {field}")]
    MissingRate {
        code: &'static str,
        field: &'static str,
    },

    /// Raw situation code not in the regime's enumeration.
    #[error("unknown situation code '{0}'")]
    UnknownSituationCode(String),

    /// A percentage input fell outside `[0, 100]`.
    #[error(transparent)]
    Rate(#[from] RateOutOfRange),

    /// NCM does not belong to any selective-tax category.
    #[error("NCM {0} is not subject to the selective tax")]
    NotSelective(String),
}

pub(crate) fn check_base(base: Decimal) -> Result<(), CalculationError> {
    if base.is_sign_negative() {
        return Err(CalculationError::NegativeBase(base));
    }
    Ok(())
}
