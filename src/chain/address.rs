use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A ledger account address in its canonical `0x` + 40 hex chars form.
///
/// Stored lowercased so two spellings of the same account compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must start with 0x: {0:?}")]
    MissingPrefix(String),
    #[error("address must be 0x followed by 40 hex chars, got {0} chars")]
    BadLength(usize),
    #[error("address contains a non-hex char: {0:?}")]
    BadChar(char),
}

impl Address {
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let rest = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        if rest.len() != 40 {
            return Err(AddressError::BadLength(s.len()));
        }
        if let Some(c) = rest.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AddressError::BadChar(c));
        }

        Ok(Self(format!("0x{}", rest.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shorten to the fixed display form `0x1234...abcd` (13 chars).
    ///
    /// Lossy on purpose: the full address stays available via `as_str`.
    pub fn shorten(&self) -> String {
        let hex = &self.0[2..];
        format!("0x{}...{}", &hex[..4], &hex[hex.len() - 4..])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}
