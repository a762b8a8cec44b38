use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::TokenAmount;

/// Token amount that travels through JSON as a decimal string,
/// so values above 2^53 survive JavaScript consumers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U128(pub TokenAmount);

impl From<TokenAmount> for U128 {
    fn from(value: TokenAmount) -> Self {
        Self(value)
    }
}

impl From<U128> for TokenAmount {
    fn from(value: U128) -> Self {
        value.0
    }
}

impl Serialize for U128 {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U128 {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        Ok(Self(
            str::parse::<TokenAmount>(&s).map_err(|err| de::Error::custom(err.to_string()))?,
        ))
    }
}
