//! Fiscal document aggregate and lifecycle state machine.
//!
//! The entity enforces edit/transition legality itself: lines can only be
//! mutated while DRAFT, and an illegal transition fails without touching
//! state. Wall-clock rules (the legal cancellation window) stay with the
//! caller — the entity only knows state legality.
//!
//! Lifecycle: DRAFT → PENDING → {AUTHORIZED, REJECTED}; AUTHORIZED → CANCELLED.

mod store;

pub use store::{AuthorityOutcome, DocumentStore, StoreError};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{AccessKey, Cfop, Ncm};
use crate::taxes::cbs::CbsAssessment;
use crate::taxes::icms::{Cst, IcmsAssessment};
use crate::taxes::seletivo::ExciseAssessment;
use crate::taxes::simples::{Csosn, SimplesAssessment};

/// Errors reported by the document entity. State is left unchanged on
/// every failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("cannot {action} a document in status {from:?}")]
    InvalidTransition {
        from: DocumentStatus,
        action: &'static str,
    },

    #[error("cannot submit a document with no lines")]
    EmptyDocument,

    #[error("document is not editable in status {0:?}")]
    NotEditable(DocumentStatus),

    #[error("line quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("unit price must not be negative, got {0}")]
    NegativeUnitPrice(Decimal),

    #[error("no line at index {0}")]
    NoSuchLine(usize),

    #[error("a line must carry exactly one regime's situation code")]
    AmbiguousRegime,
}

/// Document lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Draft,
    Pending,
    Authorized,
    Rejected,
    Cancelled,
}

/// Fiscal document types and their fixed model codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// NF-e, model 55.
    Invoice,
    /// CT-e, model 57.
    Waybill,
    /// MDF-e, model 58.
    TransportManifest,
    /// Municipal service invoice. No federal model code exists;
    /// 99 is used as an internal sentinel outside the official table.
    ServiceInvoice,
}

impl DocumentKind {
    /// Two-digit model code used in access-key composition.
    pub fn model_code(&self) -> &'static str {
        match self {
            Self::Invoice => "55",
            Self::Waybill => "57",
            Self::TransportManifest => "58",
            Self::ServiceInvoice => "99",
        }
    }
}

/// The tax-situation code a line carries — exactly one regime.
///
/// The two enumerations are disjoint; carrying both or neither is
/// unrepresentable here. [`TaxSituation::exactly_one`] guards the
/// boundary where raw collaborator data may still carry either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxSituation {
    /// Standard regime (CST).
    Standard(Cst),
    /// Simplified regime (CSOSN).
    Simplified(Csosn),
}

impl TaxSituation {
    /// Build from raw data that may carry either regime's code.
    /// Fails unless exactly one is present.
    pub fn exactly_one(
        standard: Option<Cst>,
        simplified: Option<Csosn>,
    ) -> Result<Self, DocumentError> {
        match (standard, simplified) {
            (Some(cst), None) => Ok(Self::Standard(cst)),
            (None, Some(csosn)) => Ok(Self::Simplified(csosn)),
            _ => Err(DocumentError::AmbiguousRegime),
        }
    }

    /// The raw code string ("00".."51" or "101".."300").
    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard(cst) => cst.code(),
            Self::Simplified(csosn) => csosn.code(),
        }
    }
}

/// Computed tax results attached to a line, one per tax type.
/// All absent until the caller runs the calculators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTaxes {
    pub icms: Option<IcmsAssessment>,
    pub simples: Option<SimplesAssessment>,
    pub cbs: Option<CbsAssessment>,
    pub selective: Option<ExciseAssessment>,
}

/// One merchandise line. Owned exclusively by its parent document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub description: String,
    pub ncm: Ncm,
    pub cfop: Cfop,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub situation: TaxSituation,
    pub taxes: LineTaxes,
}

impl DocumentLine {
    /// Build a line, checking quantity and price signs.
    pub fn new(
        description: impl Into<String>,
        ncm: Ncm,
        cfop: Cfop,
        quantity: Decimal,
        unit_price: Decimal,
        situation: TaxSituation,
    ) -> Result<Self, DocumentError> {
        if quantity <= Decimal::ZERO {
            return Err(DocumentError::NonPositiveQuantity(quantity));
        }
        if unit_price.is_sign_negative() {
            return Err(DocumentError::NegativeUnitPrice(unit_price));
        }
        Ok(Self {
            description: description.into(),
            ncm,
            cfop,
            quantity,
            unit_price,
            situation,
            taxes: LineTaxes::default(),
        })
    }

    /// Merchandise value: quantity × unit price.
    pub fn net_amount(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Aggregate totals, recomputed on every line mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line net amounts.
    pub merchandise_total: Decimal,
    /// Sum of normal ICMS values.
    pub icms_total: Decimal,
    /// Sum of substitution-tax values.
    pub icms_st_total: Decimal,
    /// Sum of Simples Nacional transferable credits.
    pub simples_credit_total: Decimal,
    /// Sum of nominal CBS values.
    pub cbs_total: Decimal,
    /// Sum of deferred CBS portions.
    pub cbs_deferred_total: Decimal,
    /// Sum of selective-tax values.
    pub selective_total: Decimal,
}

/// The fiscal document aggregate.
///
/// Single-writer: concurrent mutation of one instance must be serialized by
/// the caller; the `version` counter supports optimistic saves through
/// [`DocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalDocument {
    id: String,
    kind: DocumentKind,
    series: u16,
    number: u32,
    status: DocumentStatus,
    issue_date: NaiveDate,
    lines: Vec<DocumentLine>,
    totals: DocumentTotals,
    access_key: Option<AccessKey>,
    protocol: Option<String>,
    rejection_reason: Option<String>,
    cancellation_reason: Option<String>,
    version: u64,
}

impl FiscalDocument {
    /// Create a document in DRAFT.
    pub fn new(
        id: impl Into<String>,
        kind: DocumentKind,
        series: u16,
        number: u32,
        issue_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            series,
            number,
            status: DocumentStatus::Draft,
            issue_date,
            lines: Vec::new(),
            totals: DocumentTotals::default(),
            access_key: None,
            protocol: None,
            rejection_reason: None,
            cancellation_reason: None,
            version: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn series(&self) -> u16 {
        self.series
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn totals(&self) -> &DocumentTotals {
        &self.totals
    }

    /// Assigned on authorization, absent before.
    pub fn access_key(&self) -> Option<&AccessKey> {
        self.access_key.as_ref()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Optimistic-lock counter; bumped by the persistence collaborator on
    /// every successful save.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record a successful save (persistence collaborators call this).
    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    /// True iff the document accepts line mutation.
    pub fn is_editable(&self) -> bool {
        self.status == DocumentStatus::Draft
    }

    fn require_editable(&self) -> Result<(), DocumentError> {
        if self.is_editable() {
            Ok(())
        } else {
            Err(DocumentError::NotEditable(self.status))
        }
    }

    /// Append a line and recompute totals. DRAFT only.
    pub fn add_line(&mut self, line: DocumentLine) -> Result<(), DocumentError> {
        self.require_editable()?;
        self.lines.push(line);
        self.recompute_totals();
        Ok(())
    }

    /// Remove the line at `index` and recompute totals. DRAFT only.
    pub fn remove_line(&mut self, index: usize) -> Result<DocumentLine, DocumentError> {
        self.require_editable()?;
        if index >= self.lines.len() {
            return Err(DocumentError::NoSuchLine(index));
        }
        let line = self.lines.remove(index);
        self.recompute_totals();
        Ok(line)
    }

    /// Attach computed tax results to the line at `index`. DRAFT only.
    ///
    /// Results are immutable once produced; editing a line means running
    /// the calculators again and attaching a fresh set.
    pub fn attach_taxes(&mut self, index: usize, taxes: LineTaxes) -> Result<(), DocumentError> {
        self.require_editable()?;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(DocumentError::NoSuchLine(index))?;
        line.taxes = taxes;
        self.recompute_totals();
        Ok(())
    }

    /// DRAFT → PENDING. Requires at least one line.
    pub fn submit(&mut self) -> Result<(), DocumentError> {
        if self.status != DocumentStatus::Draft {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                action: "submit",
            });
        }
        if self.lines.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }
        self.status = DocumentStatus::Pending;
        Ok(())
    }

    /// PENDING → AUTHORIZED. Assigns the access key and authority protocol.
    pub fn authorize(
        &mut self,
        key: AccessKey,
        protocol: impl Into<String>,
    ) -> Result<(), DocumentError> {
        if self.status != DocumentStatus::Pending {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                action: "authorize",
            });
        }
        self.access_key = Some(key);
        self.protocol = Some(protocol.into());
        self.status = DocumentStatus::Authorized;
        Ok(())
    }

    /// PENDING → REJECTED. Retains the authority's reason for audit.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), DocumentError> {
        if self.status != DocumentStatus::Pending {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                action: "reject",
            });
        }
        self.rejection_reason = Some(reason.into());
        self.status = DocumentStatus::Rejected;
        Ok(())
    }

    /// AUTHORIZED → CANCELLED. The legal cancellation window is enforced
    /// by the caller, not here.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), DocumentError> {
        if self.status != DocumentStatus::Authorized {
            return Err(DocumentError::InvalidTransition {
                from: self.status,
                action: "cancel",
            });
        }
        self.cancellation_reason = Some(reason.into());
        self.status = DocumentStatus::Cancelled;
        Ok(())
    }

    /// Consume a transmission collaborator's outcome.
    pub fn apply_outcome(&mut self, outcome: AuthorityOutcome) -> Result<(), DocumentError> {
        match outcome {
            AuthorityOutcome::Authorized {
                access_key,
                protocol,
            } => self.authorize(access_key, protocol),
            AuthorityOutcome::Rejected { code, reason } => {
                self.reject(format!("{code}: {reason}"))
            }
        }
    }

    fn recompute_totals(&mut self) {
        let mut totals = DocumentTotals::default();
        for line in &self.lines {
            totals.merchandise_total += line.net_amount();
            if let Some(icms) = &line.taxes.icms {
                totals.icms_total += icms.value;
                totals.icms_st_total += icms.st_value.unwrap_or(Decimal::ZERO);
            }
            if let Some(simples) = &line.taxes.simples {
                totals.simples_credit_total += simples.credit;
            }
            if let Some(cbs) = &line.taxes.cbs {
                totals.cbs_total += cbs.value;
                totals.cbs_deferred_total += cbs.deferred;
            }
            if let Some(selective) = &line.taxes.selective {
                totals.selective_total += selective.value;
            }
        }
        self.totals = totals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessKeyParts, Rate};
    use rust_decimal_macros::dec;

    fn issue_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn situation() -> TaxSituation {
        TaxSituation::Standard(Cst::FullyTaxed {
            rate: Rate::new(dec!(18)).unwrap(),
        })
    }

    fn line(price: Decimal) -> DocumentLine {
        DocumentLine::new(
            "Mercadoria",
            Ncm::parse("25232910").unwrap(),
            Cfop::parse("5102").unwrap(),
            dec!(10),
            price,
            situation(),
        )
        .unwrap()
    }

    fn access_key() -> AccessKey {
        AccessKeyParts {
            uf_code: 35,
            issued: issue_date(),
            issuer: "12345678000195".into(),
            model: "55".into(),
            series: 1,
            number: 42,
            emission_type: 1,
            random_code: 12345678,
        }
        .compose()
        .unwrap()
    }

    fn draft() -> FiscalDocument {
        FiscalDocument::new("DOC-1", DocumentKind::Invoice, 1, 42, issue_date())
    }

    #[test]
    fn new_document_is_editable_draft() {
        let doc = draft();
        assert_eq!(doc.status(), DocumentStatus::Draft);
        assert!(doc.is_editable());
        assert_eq!(doc.version(), 0);
    }

    #[test]
    fn add_line_recomputes_totals() {
        let mut doc = draft();
        doc.add_line(line(dec!(32.50))).unwrap();
        assert_eq!(doc.totals().merchandise_total, dec!(325.00));
        doc.add_line(line(dec!(10))).unwrap();
        assert_eq!(doc.totals().merchandise_total, dec!(425.00));
    }

    #[test]
    fn remove_line_recomputes_totals() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();
        doc.add_line(line(dec!(20))).unwrap();
        doc.remove_line(0).unwrap();
        assert_eq!(doc.totals().merchandise_total, dec!(200));
        assert_eq!(
            doc.remove_line(5),
            Err(DocumentError::NoSuchLine(5))
        );
    }

    #[test]
    fn attach_taxes_feeds_tax_totals() {
        let mut doc = draft();
        doc.add_line(line(dec!(100))).unwrap();
        let icms = crate::taxes::icms::calculate(
            dec!(1000),
            &Cst::FullyTaxed {
                rate: Rate::new(dec!(18)).unwrap(),
            },
        )
        .unwrap();
        doc.attach_taxes(0, LineTaxes { icms: Some(icms), ..Default::default() })
            .unwrap();
        assert_eq!(doc.totals().icms_total, dec!(180));
    }

    #[test]
    fn submit_requires_lines() {
        let mut doc = draft();
        assert_eq!(doc.submit(), Err(DocumentError::EmptyDocument));
        assert_eq!(doc.status(), DocumentStatus::Draft);
    }

    #[test]
    fn full_lifecycle() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();
        doc.submit().unwrap();
        assert_eq!(doc.status(), DocumentStatus::Pending);

        doc.authorize(access_key(), "135260000000001").unwrap();
        assert_eq!(doc.status(), DocumentStatus::Authorized);
        assert!(doc.access_key().is_some());
        assert_eq!(doc.protocol(), Some("135260000000001"));

        // authorized documents are frozen
        assert_eq!(
            doc.add_line(line(dec!(10))),
            Err(DocumentError::NotEditable(DocumentStatus::Authorized))
        );
        assert_eq!(doc.lines().len(), 1);

        doc.cancel("pedido cancelado pelo cliente").unwrap();
        assert_eq!(doc.status(), DocumentStatus::Cancelled);
        assert_eq!(doc.cancellation_reason(), Some("pedido cancelado pelo cliente"));
    }

    #[test]
    fn mutation_after_submit_fails_and_preserves_lines() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();
        doc.submit().unwrap();

        assert!(matches!(
            doc.add_line(line(dec!(10))),
            Err(DocumentError::NotEditable(DocumentStatus::Pending))
        ));
        assert!(matches!(
            doc.remove_line(0),
            Err(DocumentError::NotEditable(DocumentStatus::Pending))
        ));
        assert!(matches!(
            doc.attach_taxes(0, LineTaxes::default()),
            Err(DocumentError::NotEditable(DocumentStatus::Pending))
        ));
        assert_eq!(doc.lines().len(), 1);
    }

    #[test]
    fn reject_retains_reason() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();
        doc.submit().unwrap();
        doc.reject("539: duplicidade de NF-e").unwrap();
        assert_eq!(doc.status(), DocumentStatus::Rejected);
        assert_eq!(doc.rejection_reason(), Some("539: duplicidade de NF-e"));
    }

    #[test]
    fn illegal_transitions_fail_without_side_effects() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();

        // cannot authorize or cancel a draft
        assert!(doc.authorize(access_key(), "p").is_err());
        assert!(doc.cancel("x").is_err());
        assert_eq!(doc.status(), DocumentStatus::Draft);
        assert!(doc.access_key().is_none());

        doc.submit().unwrap();
        // cannot cancel pending, cannot re-submit
        assert!(doc.cancel("x").is_err());
        assert!(doc.submit().is_err());
        assert_eq!(doc.status(), DocumentStatus::Pending);

        doc.reject("denied").unwrap();
        // rejected is terminal
        assert!(doc.submit().is_err());
        assert!(doc.authorize(access_key(), "p").is_err());
        assert!(doc.cancel("x").is_err());
        assert_eq!(doc.status(), DocumentStatus::Rejected);
    }

    #[test]
    fn apply_outcome_routes_to_transitions() {
        let mut doc = draft();
        doc.add_line(line(dec!(10))).unwrap();
        doc.submit().unwrap();
        doc.apply_outcome(AuthorityOutcome::Rejected {
            code: "204".into(),
            reason: "duplicidade".into(),
        })
        .unwrap();
        assert_eq!(doc.rejection_reason(), Some("204: duplicidade"));
    }

    #[test]
    fn line_validation() {
        assert!(matches!(
            DocumentLine::new(
                "x",
                Ncm::parse("25232910").unwrap(),
                Cfop::parse("5102").unwrap(),
                dec!(0),
                dec!(1),
                situation(),
            ),
            Err(DocumentError::NonPositiveQuantity(_))
        ));
        assert!(matches!(
            DocumentLine::new(
                "x",
                Ncm::parse("25232910").unwrap(),
                Cfop::parse("5102").unwrap(),
                dec!(1),
                dec!(-1),
                situation(),
            ),
            Err(DocumentError::NegativeUnitPrice(_))
        ));
    }

    #[test]
    fn exactly_one_regime() {
        let cst = Cst::Exempt;
        let csosn = Csosn::Immune;
        assert!(TaxSituation::exactly_one(Some(cst.clone()), None).is_ok());
        assert!(TaxSituation::exactly_one(None, Some(csosn.clone())).is_ok());
        assert_eq!(
            TaxSituation::exactly_one(Some(cst), Some(csosn)),
            Err(DocumentError::AmbiguousRegime)
        );
        assert_eq!(
            TaxSituation::exactly_one(None, None),
            Err(DocumentError::AmbiguousRegime)
        );
    }

    #[test]
    fn model_codes() {
        assert_eq!(DocumentKind::Invoice.model_code(), "55");
        assert_eq!(DocumentKind::Waybill.model_code(), "57");
        assert_eq!(DocumentKind::TransportManifest.model_code(), "58");
    }
}
