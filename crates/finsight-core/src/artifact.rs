use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Logical category of a cached artifact.
///
/// The well-known variants carry a static cache policy (see
/// [`ArtifactType::policy`]); anything else parses to `Custom` and shares the
/// insights policy and namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactType {
    Insights,
    Recommendations,
    Patterns,
    Predictions,
    FinancialSummary,
    XeroData,
    Custom(String),
}

impl ArtifactType {
    /// Snake-case wire name of this artifact type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Insights => "insights",
            Self::Recommendations => "recommendations",
            Self::Patterns => "patterns",
            Self::Predictions => "predictions",
            Self::FinancialSummary => "financial_summary",
            Self::XeroData => "xero_data",
            Self::Custom(name) => name,
        }
    }

    /// Whether this type is an authoritative input feeding the derived types.
    ///
    /// Writes to a source type arm a cascading invalidation of insights,
    /// recommendations and patterns once the written entry's TTL elapses.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::XeroData | Self::FinancialSummary)
    }

    /// The types recomputed from source data, in cascade order.
    pub fn derived() -> [Self; 3] {
        [Self::Insights, Self::Recommendations, Self::Patterns]
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "insights" => Ok(Self::Insights),
            "recommendations" => Ok(Self::Recommendations),
            "patterns" => Ok(Self::Patterns),
            "predictions" => Ok(Self::Predictions),
            "financial_summary" => Ok(Self::FinancialSummary),
            "xero_data" => Ok(Self::XeroData),
            other => {
                let mut chars = other.chars();
                let valid = matches!(chars.next(), Some('a'..='z'))
                    && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'));
                if valid {
                    Ok(Self::Custom(other.to_string()))
                } else {
                    Err(CoreError::invalid_artifact_type(other))
                }
            }
        }
    }
}

impl Serialize for ArtifactType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArtifactType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ArtifactType::from_str(&s).map_err(serde::de::Error::custom)
    }
}
