use crate::artifact::ArtifactType;
use std::time::Duration;

/// Static cache policy for one artifact type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypePolicy {
    /// Default time-to-live for shared-tier entries of this type.
    pub ttl: Duration,
    /// Namespace prefix for generated keys.
    pub key_prefix: &'static str,
    /// Whether hits of this type are eligible for local-tier placement.
    pub promotable: bool,
}

const INSIGHTS: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(300),
    key_prefix: "insights:",
    promotable: true,
};

const RECOMMENDATIONS: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(600),
    key_prefix: "recommendations:",
    promotable: true,
};

const PATTERNS: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(1800),
    key_prefix: "patterns:",
    promotable: false,
};

const PREDICTIONS: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(3600),
    key_prefix: "predictions:",
    promotable: false,
};

const FINANCIAL_SUMMARY: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(900),
    key_prefix: "financial_summary:",
    promotable: false,
};

const XERO_DATA: TypePolicy = TypePolicy {
    ttl: Duration::from_secs(1200),
    key_prefix: "xero_data:",
    promotable: false,
};

impl ArtifactType {
    /// Look up the static policy for this artifact type.
    ///
    /// Custom types fall back to the insights policy, prefix included, so
    /// unknown types share the insights namespace.
    pub fn policy(&self) -> &'static TypePolicy {
        match self {
            Self::Insights | Self::Custom(_) => &INSIGHTS,
            Self::Recommendations => &RECOMMENDATIONS,
            Self::Patterns => &PATTERNS,
            Self::Predictions => &PREDICTIONS,
            Self::FinancialSummary => &FINANCIAL_SUMMARY,
            Self::XeroData => &XERO_DATA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let cases = [
            (ArtifactType::Insights, 300, "insights:", true),
            (ArtifactType::Recommendations, 600, "recommendations:", true),
            (ArtifactType::Patterns, 1800, "patterns:", false),
            (ArtifactType::Predictions, 3600, "predictions:", false),
            (
                ArtifactType::FinancialSummary,
                900,
                "financial_summary:",
                false,
            ),
            (ArtifactType::XeroData, 1200, "xero_data:", false),
        ];

        for (artifact, ttl_secs, prefix, promotable) in cases {
            let policy = artifact.policy();
            assert_eq!(policy.ttl, Duration::from_secs(ttl_secs), "{artifact}");
            assert_eq!(policy.key_prefix, prefix, "{artifact}");
            assert_eq!(policy.promotable, promotable, "{artifact}");
        }
    }

    #[test]
    fn test_custom_falls_back_to_insights() {
        let custom = ArtifactType::Custom("budget_forecast".to_string());
        assert_eq!(custom.policy(), ArtifactType::Insights.policy());
        assert_eq!(custom.policy().key_prefix, "insights:");
    }

    #[test]
    fn test_only_derived_hot_types_promotable() {
        for artifact in ArtifactType::derived() {
            if matches!(artifact, ArtifactType::Patterns) {
                assert!(!artifact.policy().promotable);
            } else {
                assert!(artifact.policy().promotable);
            }
        }
        assert!(!ArtifactType::XeroData.policy().promotable);
        assert!(!ArtifactType::FinancialSummary.policy().promotable);
    }
}
