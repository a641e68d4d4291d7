use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::checksum::{ACCESS_KEY_WEIGHTS, mod11_check_digit};
use super::error::IdentifierError;

/// 44-digit fiscal access key uniquely naming a document instance.
///
/// Layout: UF (2) + issue year/month (4) + issuer CNPJ (14) + model (2) +
/// series (3) + number (9) + emission type (1) + random code (8) +
/// mod-11 check digit (1). The check digit is verified on every
/// construction path, so an `AccessKey` value is always consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessKey(String);

impl AccessKey {
    /// Parse a 44-digit key, verifying length, digit content, and check digit.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let value = value.trim();
        if value.len() != 44 {
            return Err(IdentifierError::InvalidLength {
                expected: 44,
                found: value.len(),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NotNumeric(value.into()));
        }

        let digits: Vec<u8> = value.bytes().map(|b| b - b'0').collect();
        let expected = mod11_check_digit(&digits[..43], &ACCESS_KEY_WEIGHTS);
        let found = digits[43];
        if expected != found {
            return Err(IdentifierError::CheckDigitMismatch { expected, found });
        }

        Ok(AccessKey(value.into()))
    }

    /// The full 44-digit key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Federative-unit code (first 2 digits).
    pub fn uf(&self) -> &str {
        &self.0[0..2]
    }

    /// Issue year/month as AAMM (digits 3–6).
    pub fn year_month(&self) -> &str {
        &self.0[2..6]
    }

    /// Issuer tax ID (CNPJ, digits 7–20).
    pub fn issuer(&self) -> &str {
        &self.0[6..20]
    }

    /// Document model code (digits 21–22).
    pub fn model(&self) -> &str {
        &self.0[20..22]
    }

    /// Series (digits 23–25).
    pub fn series(&self) -> &str {
        &self.0[22..25]
    }

    /// Document number (digits 26–34).
    pub fn number(&self) -> &str {
        &self.0[25..34]
    }

    /// Emission-type code (digit 35).
    pub fn emission_type(&self) -> u8 {
        self.0.as_bytes()[34] - b'0'
    }

    /// Random numeric code (digits 36–43).
    pub fn random_code(&self) -> &str {
        &self.0[35..43]
    }

    /// Mod-11 check digit (digit 44).
    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[43] - b'0'
    }
}

impl TryFrom<String> for AccessKey {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccessKey::parse(&value)
    }
}

impl From<AccessKey> for String {
    fn from(key: AccessKey) -> String {
        key.0
    }
}

impl std::fmt::Display for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Components from which an [`AccessKey`] is composed.
///
/// [`compose`](Self::compose) derives the check digit, so composing twice
/// from identical parts always yields identical keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyParts {
    /// IBGE federative-unit code (11–53).
    pub uf_code: u8,
    /// Issue date; only year and month enter the key.
    pub issued: NaiveDate,
    /// Issuer CNPJ, exactly 14 digits.
    pub issuer: String,
    /// Document model code, exactly 2 digits (e.g. "55").
    pub model: String,
    /// Document series (0–999).
    pub series: u16,
    /// Document number (1–999 999 999).
    pub number: u32,
    /// Emission-type code (1–9).
    pub emission_type: u8,
    /// Random numeric code (0–99 999 999).
    pub random_code: u32,
}

impl AccessKeyParts {
    /// Compose the 44-digit key, deriving the mod-11 check digit.
    pub fn compose(&self) -> Result<AccessKey, IdentifierError> {
        if !(11..=53).contains(&self.uf_code) {
            return Err(IdentifierError::ComponentOutOfRange {
                field: "uf_code",
                value: u64::from(self.uf_code),
            });
        }
        if self.issuer.len() != 14 {
            return Err(IdentifierError::InvalidLength {
                expected: 14,
                found: self.issuer.len(),
            });
        }
        if !self.issuer.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NotNumeric(self.issuer.clone()));
        }
        if self.model.len() != 2 {
            return Err(IdentifierError::InvalidLength {
                expected: 2,
                found: self.model.len(),
            });
        }
        if !self.model.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NotNumeric(self.model.clone()));
        }
        if self.series > 999 {
            return Err(IdentifierError::ComponentOutOfRange {
                field: "series",
                value: u64::from(self.series),
            });
        }
        if self.number == 0 || self.number > 999_999_999 {
            return Err(IdentifierError::ComponentOutOfRange {
                field: "number",
                value: u64::from(self.number),
            });
        }
        if !(1..=9).contains(&self.emission_type) {
            return Err(IdentifierError::ComponentOutOfRange {
                field: "emission_type",
                value: u64::from(self.emission_type),
            });
        }
        if self.random_code > 99_999_999 {
            return Err(IdentifierError::ComponentOutOfRange {
                field: "random_code",
                value: u64::from(self.random_code),
            });
        }

        let payload = format!(
            "{:02}{:02}{:02}{}{}{:03}{:09}{}{:08}",
            self.uf_code,
            self.issued.year() % 100,
            self.issued.month(),
            self.issuer,
            self.model,
            self.series,
            self.number,
            self.emission_type,
            self.random_code,
        );
        debug_assert_eq!(payload.len(), 43);

        let digits: Vec<u8> = payload.bytes().map(|b| b - b'0').collect();
        let dv = mod11_check_digit(&digits, &ACCESS_KEY_WEIGHTS);

        Ok(AccessKey(format!("{payload}{dv}")))
    }
}

/// 4-digit operation-nature code (CFOP).
///
/// The first digit encodes the operation group: 1–3 are entries
/// (intra-state, inter-state, cross-border), 5–7 the matching exits.
/// Immutable once assigned to a document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cfop(u16);

impl Cfop {
    /// Parse a 4-digit CFOP, checking the operation group.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let value = value.trim();
        if value.len() != 4 {
            return Err(IdentifierError::InvalidLength {
                expected: 4,
                found: value.len(),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NotNumeric(value.into()));
        }

        let first = value.as_bytes()[0] as char;
        if !matches!(first, '1' | '2' | '3' | '5' | '6' | '7') {
            return Err(IdentifierError::InvalidCfopGroup(first));
        }

        // 4 ascii digits always fit u16
        Ok(Cfop(value.parse().unwrap_or(0)))
    }

    /// The numeric code.
    pub fn code(&self) -> u16 {
        self.0
    }

    /// True for entry operations (first digit 1–3).
    pub fn is_inbound(&self) -> bool {
        self.0 < 4000
    }

    /// True for inter-state operations (first digit 2 or 6).
    pub fn is_interstate(&self) -> bool {
        matches!(self.0 / 1000, 2 | 6)
    }

    /// True for cross-border operations (first digit 3 or 7).
    pub fn is_international(&self) -> bool {
        matches!(self.0 / 1000, 3 | 7)
    }
}

impl TryFrom<String> for Cfop {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cfop::parse(&value)
    }
}

impl From<Cfop> for String {
    fn from(cfop: Cfop) -> String {
        format!("{:04}", cfop.0)
    }
}

impl std::fmt::Display for Cfop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// 8-digit merchandise classification code (NCM).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ncm(String);

impl Ncm {
    /// Parse an 8-digit NCM.
    pub fn parse(value: &str) -> Result<Self, IdentifierError> {
        let value = value.trim();
        if value.len() != 8 {
            return Err(IdentifierError::InvalidLength {
                expected: 8,
                found: value.len(),
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NotNumeric(value.into()));
        }
        Ok(Ncm(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tariff heading: the first 4 digits, the granularity of the
    /// excise-applicability ranges.
    pub fn heading(&self) -> u16 {
        self.0[..4].parse().unwrap_or(0)
    }

    /// Tariff chapter: the first 2 digits.
    pub fn chapter(&self) -> u8 {
        self.0[..2].parse().unwrap_or(0)
    }
}

impl TryFrom<String> for Ncm {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ncm::parse(&value)
    }
}

impl From<Ncm> for String {
    fn from(ncm: Ncm) -> String {
        ncm.0
    }
}

impl std::fmt::Display for Ncm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
