//! Structural validator for SPED pipe-delimited filings.
//!
//! The validator scans the whole file and collects every finding — it never
//! short-circuits, so one run surfaces all defects. ERROR means the filing
//! authority's own validator will reject the file; WARNING flags a
//! plausibly-wrong value worth a human's attention.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Register opening the file (and block 0).
pub const FILE_OPENING: &str = "0000";
/// Register closing the whole file, carrying the declared record count.
pub const FILE_CLOSING: &str = "9999";

const DELIMITER: char = '|';

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Layout-breaking: the filing authority will reject the file.
    Error,
    /// Plausibly wrong but not layout-breaking.
    Warning,
}

/// Structured finding kinds, so callers assert on the kind rather than on
/// message substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FindingKind {
    /// Record not wrapped in the block delimiter.
    MalformedRecord,
    /// Opening record `0000` carries fewer than 3 fields.
    ShortOpeningRecord,
    /// Closing record `9999` carries fewer than 2 fields.
    ShortClosingRecord,
    /// 8-digit field read as ddmmyyyy with an implausible day or month.
    ImplausibleDate,
    /// Declared record count in `9999` differs from the actual count.
    DeclaredCountMismatch,
    /// File closing record `9999` absent.
    MissingFileClosing,
    /// A block appears without its opening record (`X001`).
    MissingBlockOpening,
    /// A block appears without its closing record (`X990`).
    MissingBlockClosing,
    /// One of the mandatory blocks 0/9 is absent.
    MissingMandatoryBlock,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    /// 1-based line number, absent for whole-file findings.
    pub line: Option<usize>,
    /// Register code the finding refers to, when known.
    pub register: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            line: None,
            register: None,
            message: message.into(),
        }
    }

    fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            line: None,
            register: None,
            message: message.into(),
        }
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    fn on_register(mut self, register: impl Into<String>) -> Self {
        self.register = Some(register.into());
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        match (self.line, &self.register) {
            (Some(line), Some(register)) => {
                write!(f, "[{severity}] line {line} ({register}): {}", self.message)
            }
            (Some(line), None) => write!(f, "[{severity}] line {line}: {}", self.message),
            (None, Some(register)) => write!(f, "[{severity}] ({register}): {}", self.message),
            (None, None) => write!(f, "[{severity}] {}", self.message),
        }
    }
}

/// Line and record statistics gathered during the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStats {
    /// Non-blank lines seen.
    pub total_lines: usize,
    /// Well-delimited records parsed.
    pub record_count: usize,
    /// Occurrences per register code.
    pub register_counts: BTreeMap<String, usize>,
    /// Block identifiers that appeared (first character of 4-char registers).
    pub blocks: BTreeSet<char>,
}

/// Full validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingReport {
    pub findings: Vec<Finding>,
    pub stats: FilingStats,
}

impl FilingReport {
    /// True iff no ERROR-severity finding was collected.
    pub fn is_valid(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|f| f.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }
}

/// Validate the structure of a full filing text.
pub fn validate(text: &str) -> FilingReport {
    let mut findings = Vec::new();
    let mut stats = FilingStats::default();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        stats.total_lines += 1;

        if line.len() < 2 || !line.starts_with(DELIMITER) || !line.ends_with(DELIMITER) {
            findings.push(
                Finding::error(
                    FindingKind::MalformedRecord,
                    "record must start and end with the '|' delimiter",
                )
                .at_line(line_number),
            );
            continue;
        }

        let fields: Vec<&str> = line[1..line.len() - 1].split(DELIMITER).collect();
        let register = fields[0];
        if register.is_empty() {
            findings.push(
                Finding::error(FindingKind::MalformedRecord, "record has no register code")
                    .at_line(line_number),
            );
            continue;
        }

        stats.record_count += 1;
        *stats.register_counts.entry(register.into()).or_insert(0) += 1;
        if register.len() == 4 {
            stats.blocks.insert(register.chars().next().unwrap());
        }

        if register == FILE_OPENING && fields.len() < 3 {
            findings.push(
                Finding::error(
                    FindingKind::ShortOpeningRecord,
                    format!("opening record carries {} fields, at least 3 required", fields.len()),
                )
                .at_line(line_number)
                .on_register(FILE_OPENING),
            );
        }
        if register == FILE_CLOSING && fields.len() < 2 {
            findings.push(
                Finding::error(
                    FindingKind::ShortClosingRecord,
                    "closing record must declare the total record count",
                )
                .at_line(line_number)
                .on_register(FILE_CLOSING),
            );
        }

        // Any 8-digit numeric field is opportunistically read as ddmmyyyy.
        for field in &fields[1..] {
            if field.len() == 8 && field.bytes().all(|b| b.is_ascii_digit()) {
                let day: u8 = field[0..2].parse().unwrap_or(0);
                let month: u8 = field[2..4].parse().unwrap_or(0);
                if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
                    findings.push(
                        Finding::warning(
                            FindingKind::ImplausibleDate,
                            format!("field '{field}' looks like a date with implausible day/month"),
                        )
                        .at_line(line_number)
                        .on_register(register),
                    );
                }
            }
        }
    }

    // Whole-file checks after the scan.
    match stats.register_counts.get(FILE_CLOSING) {
        None => findings.push(
            Finding::error(
                FindingKind::MissingFileClosing,
                "file closing record is absent",
            )
            .on_register(FILE_CLOSING),
        ),
        Some(_) => {
            // Cross-check the declared total when it parses.
            if let Some(declared) = declared_record_count(text) {
                if declared != stats.record_count {
                    findings.push(
                        Finding::warning(
                            FindingKind::DeclaredCountMismatch,
                            format!(
                                "closing record declares {declared} records, file has {}",
                                stats.record_count
                            ),
                        )
                        .on_register(FILE_CLOSING),
                    );
                }
            }
        }
    }

    for mandatory in ['0', '9'] {
        if !stats.blocks.contains(&mandatory) {
            findings.push(Finding::error(
                FindingKind::MissingMandatoryBlock,
                format!("mandatory block '{mandatory}' is absent"),
            ));
        }
    }

    for &block in &stats.blocks {
        let opening = format!("{block}001");
        let closing = format!("{block}990");
        if !stats.register_counts.contains_key(&opening) {
            findings.push(
                Finding::error(
                    FindingKind::MissingBlockOpening,
                    format!("block '{block}' has no opening record"),
                )
                .on_register(opening),
            );
        }
        if !stats.register_counts.contains_key(&closing) {
            findings.push(
                Finding::error(
                    FindingKind::MissingBlockClosing,
                    format!("block '{block}' has no closing record"),
                )
                .on_register(closing),
            );
        }
    }

    FilingReport { findings, stats }
}

/// Second field of the `9999` record, when present and numeric.
fn declared_record_count(text: &str) -> Option<usize> {
    text.lines()
        .map(str::trim)
        .filter(|l| l.starts_with(DELIMITER) && l.ends_with(DELIMITER) && l.len() >= 2)
        .map(|l| l[1..l.len() - 1].split(DELIMITER).collect::<Vec<_>>())
        .find(|fields| fields.first() == Some(&FILE_CLOSING))
        .and_then(|fields| fields.get(1).and_then(|v| v.parse().ok()))
}
