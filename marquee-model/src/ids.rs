use std::fmt::{self, Display, Formatter};

/// Identifier issued by the remote service. Depending on the record it is
/// either numeric (catalog ids) or an opaque string (account records).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RecordId {
    Numeric(i64),
    Text(String),
}

impl RecordId {
    /// Compares by rendered value, so `550` and `"550"` are the same record.
    pub fn matches(&self, other: &str) -> bool {
        match self {
            RecordId::Numeric(n) => other.trim().parse::<i64>() == Ok(*n),
            RecordId::Text(s) => s == other,
        }
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Numeric(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Numeric(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}
