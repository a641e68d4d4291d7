//! Standard-regime ICMS calculator.
//!
//! The CST (tax-situation code) selects the formula. Each [`Cst`] variant
//! carries exactly the rates its code requires, so a missing-rate condition
//! is only possible when reconstructing from raw collaborator data via
//! [`Cst::from_parts`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationError, check_base};
use crate::core::Rate;

/// Standard-regime tax-situation code (CST), one variant per supported code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cst {
    /// CST 00: fully taxed at the nominal rate.
    FullyTaxed { rate: Rate },
    /// CST 10: taxed, with the substitution regime collecting a second
    /// amount on a marked-up presumed resale base.
    TaxedWithSubstitution {
        rate: Rate,
        st_rate: Rate,
        /// Presumed value-added markup (MVA) applied to the base.
        markup: Rate,
    },
    /// CST 20: taxed on a reduced base.
    ReducedBase { rate: Rate, reduction: Rate },
    /// CST 40: exempt; tax is deterministically zero.
    Exempt,
    /// CST 51: deferred; collection shifts downstream, tax here is zero.
    Deferred,
}

impl Cst {
    /// The two-digit code as carried on the document.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FullyTaxed { .. } => "00",
            Self::TaxedWithSubstitution { .. } => "10",
            Self::ReducedBase { .. } => "20",
            Self::Exempt => "40",
            Self::Deferred => "51",
        }
    }

    /// Reconstruct from raw lookup data (code plus optional rates).
    ///
    /// This is where the "missing rate for this code" class of errors
    /// surfaces; once a `Cst` exists, its fields are complete.
    pub fn from_parts(
        code: &str,
        rate: Option<Rate>,
        reduction: Option<Rate>,
        st_rate: Option<Rate>,
        markup: Option<Rate>,
    ) -> Result<Self, CalculationError> {
        match code {
            "00" => Ok(Self::FullyTaxed {
                rate: rate.ok_or(CalculationError::MissingRate {
                    code: "00",
                    field: "rate",
                })?,
            }),
            "10" => Ok(Self::TaxedWithSubstitution {
                rate: rate.ok_or(CalculationError::MissingRate {
                    code: "10",
                    field: "rate",
                })?,
                st_rate: st_rate.ok_or(CalculationError::MissingRate {
                    code: "10",
                    field: "st_rate",
                })?,
                markup: markup.ok_or(CalculationError::MissingRate {
                    code: "10",
                    field: "markup",
                })?,
            }),
            "20" => Ok(Self::ReducedBase {
                rate: rate.ok_or(CalculationError::MissingRate {
                    code: "20",
                    field: "rate",
                })?,
                reduction: reduction.ok_or(CalculationError::MissingRate {
                    code: "20",
                    field: "reduction",
                })?,
            }),
            "40" => Ok(Self::Exempt),
            "51" => Ok(Self::Deferred),
            other => Err(CalculationError::UnknownSituationCode(other.into())),
        }
    }
}

/// Immutable result of a standard-regime assessment.
///
/// A line edit requires recomputation; the result is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmsAssessment {
    /// Base after reduction, if any.
    pub base: Decimal,
    /// Nominal rate applied (zero for exempt/deferred).
    pub rate: Rate,
    /// Tax on the (possibly reduced) base.
    pub value: Decimal,
    /// Substitution base (base × (1 + markup)), CST 10 only.
    pub st_base: Option<Decimal>,
    /// Substitution tax on the marked-up base, CST 10 only.
    pub st_value: Option<Decimal>,
}

impl IcmsAssessment {
    /// Normal tax plus substitution tax, when present.
    pub fn total(&self) -> Decimal {
        self.value + self.st_value.unwrap_or(Decimal::ZERO)
    }
}

/// Compute ICMS for one line under the standard regime.
pub fn calculate(base: Decimal, situation: &Cst) -> Result<IcmsAssessment, CalculationError> {
    check_base(base)?;

    match situation {
        Cst::FullyTaxed { rate } => Ok(IcmsAssessment {
            base,
            rate: *rate,
            value: rate.of(base),
            st_base: None,
            st_value: None,
        }),

        Cst::ReducedBase { rate, reduction } => {
            let effective = base * reduction.complement();
            Ok(IcmsAssessment {
                base: effective,
                rate: *rate,
                value: rate.of(effective),
                st_base: None,
                st_value: None,
            })
        }

        Cst::TaxedWithSubstitution {
            rate,
            st_rate,
            markup,
        } => {
            let st_base = base * (Decimal::ONE + markup.fraction());
            Ok(IcmsAssessment {
                base,
                rate: *rate,
                value: rate.of(base),
                st_base: Some(st_base),
                st_value: Some(st_rate.of(st_base)),
            })
        }

        // Zero regardless of any rate the lookup may have supplied.
        Cst::Exempt | Cst::Deferred => Ok(IcmsAssessment {
            base,
            rate: Rate::ZERO,
            value: Decimal::ZERO,
            st_base: None,
            st_value: None,
        }),
    }
}

/// Interstate rate differential (DIFAL): destination internal rate minus the
/// interstate rate, applied to the base and clamped at zero.
///
/// Owed on interstate sales to a non-reseller; the split between origin and
/// destination treasuries is the caller's concern.
pub fn rate_differential(base: Decimal, interstate: Rate, internal: Rate) -> Result<Decimal, CalculationError> {
    check_base(base)?;
    let difference = internal.of(base) - interstate.of(base);
    Ok(difference.max(Decimal::ZERO))
}
