use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::JarError;

const HEX_DIGITS: usize = 40;

/// A `0x`-prefixed 20 byte hex address, kept lowercase.
/// Identifies wallets, deployed jar contracts and token contracts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(value: &str) -> bool {
        let Some(digits) = value.strip_prefix("0x") else {
            return false;
        };

        digits.len() == HEX_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl FromStr for Address {
    type Err = JarError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if !Self::is_valid(value) {
            return Err(JarError::InvalidAddress(value.to_owned()));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse().map_err(|err: JarError| de::Error::custom(err.to_string()))
    }
}
