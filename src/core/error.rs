use thiserror::Error;

/// Errors raised while parsing or composing fiscal identifiers.
///
/// Identifiers are validated at construction, so an [`IdentifierError`] is
/// the only way a malformed code can surface — constructed values are
/// always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentifierError {
    /// Value has the wrong number of characters.
    #[error("expected {expected} digits, got {found}")]
    InvalidLength { expected: usize, found: usize },

    /// Value contains a non-digit character.
    #[error("'{0}' contains non-digit characters")]
    NotNumeric(String),

    /// Access key check digit does not match the mod-11 derivation.
    #[error("check digit mismatch: key carries {found}, derivation requires {expected}")]
    CheckDigitMismatch { expected: u8, found: u8 },

    /// CFOP first digit outside {1, 2, 3, 5, 6, 7}.
    #[error("CFOP first digit '{0}' is not a valid operation group")]
    InvalidCfopGroup(char),

    /// Access key component outside its fixed-width range.
    #[error("{field} value {value} does not fit its field")]
    ComponentOutOfRange { field: &'static str, value: u64 },
}
