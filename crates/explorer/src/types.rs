use alloy_primitives::{Address, Bytes, TxHash, U256};
use serde::{de::Error as _, Deserialize, Deserializer};

/// One entry of the explorer's `txlist` answer.
///
/// Explorers return every field as a string, so numeric fields are parsed
/// here rather than left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTransaction {
    pub hash: TxHash,
    /// Empty for contract creations
    #[serde(default, deserialize_with = "optional_address")]
    pub to: Option<Address>,
    #[serde(deserialize_with = "decimal_u256")]
    pub value: U256,
    #[serde(default)]
    pub input: Bytes,
    #[serde(default, deserialize_with = "error_flag")]
    pub is_error: bool,
    #[serde(rename = "timeStamp", deserialize_with = "decimal_u64")]
    pub timestamp: u64,
}

/// Envelope shared by all etherscan-compatible endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub result: serde_json::Value,
}

fn optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(D::Error::custom),
    }
}

fn decimal_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    U256::from_str_radix(raw.trim(), 10).map_err(D::Error::custom)
}

fn decimal_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(D::Error::custom)
}

fn error_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim() == "1")
}
