//! Imposto Seletivo — excise tax on specific goods.
//!
//! Applicability is decided by NCM tariff heading ranges; the predicate is
//! exposed separately from the calculator so callers can pre-filter lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CalculationError, check_base};
use crate::core::{Ncm, Rate};

/// Goods categories subject to the selective tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExciseCategory {
    AlcoholicBeverages,
    Tobacco,
    Vehicles,
    Ores,
    Petroleum,
}

impl ExciseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlcoholicBeverages => "bebidas alcoólicas",
            Self::Tobacco => "fumo e derivados",
            Self::Vehicles => "veículos",
            Self::Ores => "minérios",
            Self::Petroleum => "petróleo e derivados",
        }
    }
}

/// NCM heading ranges per category (inclusive).
const EXCISE_RANGES: &[(u16, u16, ExciseCategory)] = &[
    (2203, 2208, ExciseCategory::AlcoholicBeverages),
    (2401, 2404, ExciseCategory::Tobacco),
    (2601, 2621, ExciseCategory::Ores),
    (2709, 2715, ExciseCategory::Petroleum),
    (8702, 8711, ExciseCategory::Vehicles),
];

/// Category the NCM falls under, if any. Pure predicate, usable
/// independently of the calculator.
pub fn excise_category(ncm: &Ncm) -> Option<ExciseCategory> {
    let heading = ncm.heading();
    EXCISE_RANGES
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&heading))
        .map(|(_, _, category)| *category)
}

/// Immutable result of a selective-tax assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExciseAssessment {
    pub category: ExciseCategory,
    pub base: Decimal,
    pub rate: Rate,
    pub value: Decimal,
}

/// Compute the selective tax for one line.
///
/// Fails when the base is negative or the NCM is outside every excise range.
pub fn calculate(base: Decimal, rate: Rate, ncm: &Ncm) -> Result<ExciseAssessment, CalculationError> {
    check_base(base)?;

    let category =
        excise_category(ncm).ok_or_else(|| CalculationError::NotSelective(ncm.to_string()))?;

    Ok(ExciseAssessment {
        category,
        base,
        rate,
        value: rate.of(base),
    })
}
