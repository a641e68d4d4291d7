//! Simplified-regime (Simples Nacional) credit calculator.
//!
//! Under this regime the tax itself is settled through the unified monthly
//! payment; what the document carries is the ICMS credit the downstream
//! buyer may claim, keyed by CSOSN.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationError, check_base};
use crate::core::Rate;

/// Simplified-regime tax-situation code (CSOSN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Csosn {
    /// CSOSN 101: taxed with credit transfer; `credit_rate` is the
    /// percentage the buyer may claim, well below the standard rate.
    WithCredit { credit_rate: Rate },
    /// CSOSN 102: taxed without credit transfer.
    WithoutCredit,
    /// CSOSN 300: immune.
    Immune,
}

impl Csosn {
    /// The three-digit code as carried on the document.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WithCredit { .. } => "101",
            Self::WithoutCredit => "102",
            Self::Immune => "300",
        }
    }

    /// Reconstruct from raw lookup data.
    pub fn from_parts(code: &str, credit_rate: Option<Rate>) -> Result<Self, CalculationError> {
        match code {
            "101" => Ok(Self::WithCredit {
                credit_rate: credit_rate.ok_or(CalculationError::MissingRate {
                    code: "101",
                    field: "credit_rate",
                })?,
            }),
            "102" => Ok(Self::WithoutCredit),
            "300" => Ok(Self::Immune),
            other => Err(CalculationError::UnknownSituationCode(other.into())),
        }
    }
}

/// Immutable result of a simplified-regime assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplesAssessment {
    pub base: Decimal,
    /// Credit rate applied (zero when no credit transfers).
    pub rate: Rate,
    /// Claimable credit value.
    pub credit: Decimal,
}

/// Compute the transferable credit for one line.
pub fn calculate(base: Decimal, situation: &Csosn) -> Result<SimplesAssessment, CalculationError> {
    check_base(base)?;

    match situation {
        Csosn::WithCredit { credit_rate } => Ok(SimplesAssessment {
            base,
            rate: *credit_rate,
            credit: credit_rate.of(base),
        }),
        // Zero regardless of any rate the lookup may have supplied.
        Csosn::WithoutCredit | Csosn::Immune => Ok(SimplesAssessment {
            base,
            rate: Rate::ZERO,
            credit: Decimal::ZERO,
        }),
    }
}
