//! JSON-CDC values exchanged with the execution engine.
//!
//! Script arguments are encoded as JSON-CDC documents and script results
//! come back decoded into [`Value`]. Only the subset of the format used by
//! the account scripts is modelled.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::Address;

/// A JSON-CDC value: `{"type": "<Type>", "value": <payload>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Void,
    Bool(bool),
    #[serde(with = "u64_string")]
    UInt64(u64),
    String(String),
    #[serde(with = "address_hex")]
    Address(Address),
    Optional(Option<Box<Value>>),
    Array(Vec<Value>),
    Struct(Composite),
}

/// Struct payload: a qualified type id and ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composite {
    pub id: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Value {
    /// The JSON-CDC type tag of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Void => "Void",
            Self::Bool(_) => "Bool",
            Self::UInt64(_) => "UInt64",
            Self::String(_) => "String",
            Self::Address(_) => "Address",
            Self::Optional(_) => "Optional",
            Self::Array(_) => "Array",
            Self::Struct(_) => "Struct",
        }
    }

    /// Encode as a JSON-CDC document.
    pub fn encode(&self) -> Result<Vec<u8>, ValueError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a JSON-CDC document.
    pub fn decode(bytes: &[u8]) -> Result<Self, ValueError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn into_u64(self) -> Result<u64, ValueError> {
        match self {
            Self::UInt64(v) => Ok(v),
            other => Err(unexpected("UInt64", &other)),
        }
    }

    fn into_string(self) -> Result<String, ValueError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(unexpected("String", &other)),
        }
    }

    fn into_array(self) -> Result<Vec<Value>, ValueError> {
        match self {
            Self::Array(values) => Ok(values),
            other => Err(unexpected("Array", &other)),
        }
    }
}

impl Composite {
    /// Remove and return a field by name.
    pub fn take_field(&mut self, name: &'static str) -> Result<Value, ValueError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or(ValueError::MissingField(name))?;
        Ok(self.fields.swap_remove(index).value)
    }
}

fn unexpected(expected: &'static str, got: &Value) -> ValueError {
    ValueError::UnexpectedType {
        expected,
        got: got.type_name(),
    }
}

/// Result of the account enumeration script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountInfo {
    /// Storage usage the chain itself reports for the account.
    pub storage_used: u64,
    /// Names of the contracts deployed to the account.
    pub contracts: Vec<String>,
}

impl TryFrom<Value> for AccountInfo {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut composite = match value {
            Value::Struct(c) => c,
            other => return Err(unexpected("Struct", &other)),
        };
        let storage_used = composite.take_field("storageUsed")?.into_u64()?;
        let contracts = composite
            .take_field("contracts")?
            .into_array()?
            .into_iter()
            .map(Value::into_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            storage_used,
            contracts,
        })
    }
}

impl From<AccountInfo> for Value {
    fn from(info: AccountInfo) -> Self {
        Value::Struct(Composite {
            id: "s.AccountInfo".into(),
            fields: vec![
                Field {
                    name: "storageUsed".into(),
                    value: Value::UInt64(info.storage_used),
                },
                Field {
                    name: "contracts".into(),
                    value: Value::Array(info.contracts.into_iter().map(Value::String).collect()),
                },
            ],
        })
    }
}

/// UInt64 payloads are carried as decimal strings.
mod u64_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom(format!("invalid UInt64 {raw:?}")))
    }
}

/// Address payloads are `0x`-prefixed hex strings.
mod address_hex {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::types::Address;

    pub fn serialize<S: Serializer>(value: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.hex_with_prefix())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_hex(&raw).map_err(D::Error::custom)
    }
}
