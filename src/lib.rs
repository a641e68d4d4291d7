//! # fisco
//!
//! Brazilian fiscal compliance engine: fiscal document lifecycle,
//! indirect-tax calculation (ICMS, Simples Nacional credit, CBS, Imposto
//! Seletivo), and SPED structural validation.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Identifiers (access key, CFOP, NCM) are validated at construction; an
//! invalid value cannot exist once parsed.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fisco::core::{Cfop, Ncm, Rate};
//! use fisco::document::*;
//! use fisco::taxes::icms::{self, Cst};
//! use rust_decimal_macros::dec;
//!
//! let issue = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
//! let mut doc = FiscalDocument::new("NF-001", DocumentKind::Invoice, 1, 42, issue);
//!
//! let situation = Cst::FullyTaxed { rate: Rate::new(dec!(18)).unwrap() };
//! let line = DocumentLine::new(
//!     "Cimento CP-II 50kg",
//!     Ncm::parse("25232910").unwrap(),
//!     Cfop::parse("5102").unwrap(),
//!     dec!(100),
//!     dec!(32.50),
//!     TaxSituation::Standard(situation.clone()),
//! ).unwrap();
//!
//! let assessment = icms::calculate(line.net_amount(), &situation).unwrap();
//!
//! doc.add_line(line).unwrap();
//! doc.attach_taxes(0, LineTaxes { icms: Some(assessment), ..LineTaxes::default() }).unwrap();
//! doc.submit().unwrap();
//!
//! assert_eq!(doc.status(), DocumentStatus::Pending);
//! assert_eq!(doc.totals().merchandise_total, dec!(3250.00));
//! assert_eq!(doc.totals().icms_total, dec!(585.00));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`core`] | Validated identifiers (access key, CFOP, NCM), rate newtype, mod-11 checksum |
//! | [`taxes`] | Pure calculators: ICMS/ST, Simples Nacional credit, CBS, Imposto Seletivo |
//! | [`document`] | Fiscal document aggregate and lifecycle state machine |
//! | [`sped`] | Structural validator for SPED pipe-delimited filings |

pub mod core;
pub mod document;
pub mod sped;
pub mod taxes;

// Re-export the identifier types at crate root for convenience
pub use crate::core::{AccessKey, AccessKeyParts, Cfop, Ncm, Rate};
