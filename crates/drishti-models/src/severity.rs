//! Severity levels and risk classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordinal severity of a single frame-level anomaly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the severity as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parse a severity label leniently.
    ///
    /// Unrecognized or empty labels default to `Low`, so a detector that
    /// invents its own wording never breaks aggregation.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    /// All severity levels, lowest first.
    pub fn all() -> [Severity; 4] {
        [Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of anomalies per severity level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    #[serde(flatten)]
    counts: BTreeMap<Severity, u32>,
}

impl SeverityBreakdown {
    /// Create an empty breakdown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one anomaly at the given severity.
    pub fn record(&mut self, severity: Severity) {
        *self.counts.entry(severity).or_insert(0) += 1;
    }

    /// Count for a single severity level.
    pub fn count(&self, severity: Severity) -> u32 {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    /// Total anomalies counted across all levels.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// True if no anomalies have been recorded.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over `(severity, count)` pairs with non-zero counts,
    /// lowest severity first.
    pub fn iter(&self) -> impl Iterator<Item = (Severity, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, c)| **c > 0)
            .map(|(s, c)| (*s, *c))
    }
}

impl FromIterator<Severity> for SeverityBreakdown {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for severity in iter {
            breakdown.record(severity);
        }
        breakdown
    }
}

/// Summary-level risk classification derived from the severity distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Returns the risk level as an upper-case string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Classify a severity distribution into an overall risk level.
    ///
    /// Rules are evaluated in fixed priority order, first match wins:
    /// 1. any critical       -> CRITICAL
    /// 2. any high           -> HIGH
    /// 3. more than 2 medium -> HIGH
    /// 4. any medium         -> MEDIUM
    /// 5. more than 5 low    -> MEDIUM
    /// 6. otherwise          -> LOW
    pub fn from_breakdown(breakdown: &SeverityBreakdown) -> Self {
        if breakdown.count(Severity::Critical) > 0 {
            Self::Critical
        } else if breakdown.count(Severity::High) > 0 {
            Self::High
        } else if breakdown.count(Severity::Medium) > 2 {
            Self::High
        } else if breakdown.count(Severity::Medium) > 0 {
            Self::Medium
        } else if breakdown.count(Severity::Low) > 5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(pairs: &[(Severity, u32)]) -> SeverityBreakdown {
        let mut b = SeverityBreakdown::new();
        for (severity, count) in pairs {
            for _ in 0..*count {
                b.record(*severity);
            }
        }
        b
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Severity::parse_lenient("critical"), Severity::Critical);
        assert_eq!(Severity::parse_lenient(" HIGH "), Severity::High);
        assert_eq!(Severity::parse_lenient("medium"), Severity::Medium);
        assert_eq!(Severity::parse_lenient("low"), Severity::Low);
        assert_eq!(Severity::parse_lenient("severe"), Severity::Low);
        assert_eq!(Severity::parse_lenient(""), Severity::Low);
    }

    #[test]
    fn test_breakdown_totals() {
        let b = breakdown(&[(Severity::High, 2), (Severity::Low, 3)]);
        assert_eq!(b.count(Severity::High), 2);
        assert_eq!(b.count(Severity::Low), 3);
        assert_eq!(b.count(Severity::Critical), 0);
        assert_eq!(b.total(), 5);
        assert!(!b.is_empty());
        assert!(SeverityBreakdown::new().is_empty());
    }

    #[test]
    fn test_breakdown_iter_order() {
        let b = breakdown(&[(Severity::Critical, 1), (Severity::Low, 2)]);
        let pairs: Vec<_> = b.iter().collect();
        assert_eq!(pairs, vec![(Severity::Low, 2), (Severity::Critical, 1)]);
    }

    #[test]
    fn test_risk_level_rules() {
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::Critical, 1)])),
            RiskLevel::Critical
        );
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::High, 1)])),
            RiskLevel::High
        );
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::Medium, 3)])),
            RiskLevel::High
        );
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::Medium, 1)])),
            RiskLevel::Medium
        );
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::Low, 6)])),
            RiskLevel::Medium
        );
        assert_eq!(
            RiskLevel::from_breakdown(&breakdown(&[(Severity::Low, 2)])),
            RiskLevel::Low
        );
        assert_eq!(
            RiskLevel::from_breakdown(&SeverityBreakdown::new()),
            RiskLevel::Low
        );
    }

    #[test]
    fn test_critical_wins_over_lower_levels() {
        let b = breakdown(&[
            (Severity::Critical, 1),
            (Severity::High, 4),
            (Severity::Medium, 10),
        ]);
        assert_eq!(RiskLevel::from_breakdown(&b), RiskLevel::Critical);
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let json = serde_json::to_string(&RiskLevel::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
    }
}
