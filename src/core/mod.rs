//! Validated fiscal identifiers and numeric primitives.
//!
//! Everything here follows "parse, don't validate": a constructed value is
//! guaranteed well-formed, so downstream code never re-checks formats.

pub mod checksum;
mod error;
mod identifiers;
mod rate;

pub use error::IdentifierError;
pub use identifiers::{AccessKey, AccessKeyParts, Cfop, Ncm};
pub use rate::{Rate, RateOutOfRange};
