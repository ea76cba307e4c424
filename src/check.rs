//! Check definitions and result types.
//!
//! This module provides:
//! - `CheckStatus` enum representing the verdict of a single probe
//! - `CheckKind` enum tagging which audience a check belongs to
//! - `CheckResult` struct produced by one probe invocation
//! - `HealthReport` struct aggregating results into an overall status
//! - `HealthCheck` trait implemented by every probe
//!
//! # Status Semantics
//!
//! - **Up**: the probed dependency or condition is operational
//! - **Down**: the probed dependency or condition is not operational
//!
//! A report is `Down` as soon as any constituent result is `Down`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitals::check::{CheckResult, HealthReport};
//!
//! let db = CheckResult::up("database").with_data("pool_size", 10i64);
//! let report = HealthReport::from_checks(vec![db]);
//! assert!(report.is_up());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::BoxError;

// ═══════════════════════════════════════════════════════════════════════════════
// Check Status
// ═══════════════════════════════════════════════════════════════════════════════

/// Verdict of a single check or of a whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    /// The probed dependency is operational
    Up,
    /// The probed dependency is not operational
    Down,
}

impl CheckStatus {
    /// Check if the status is up.
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Combine two statuses, returning the worse one.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Up, Self::Up) => Self::Up,
            _ => Self::Down,
        }
    }

    /// Convert to HTTP status code.
    pub fn to_http_status(&self) -> u16 {
        match self {
            Self::Up => 200,
            Self::Down => 503,
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Check Kind
// ═══════════════════════════════════════════════════════════════════════════════

/// Which audience a check answers to.
///
/// Readiness gates traffic, liveness gates restarts. A check tagged `Both`
/// participates in either evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Should this instance keep running
    Liveness,
    /// Should this instance receive traffic
    Readiness,
    /// Participates in both evaluations
    Both,
}

impl CheckKind {
    /// Merge an existing kind with a newly registered one.
    ///
    /// Equal kinds keep the kind; differing kinds widen to `Both`. Only the
    /// kind merges: the check instance stored alongside is always the newly
    /// registered one.
    pub fn merge(self, new: Self) -> Self {
        if self == new {
            new
        } else {
            Self::Both
        }
    }

    /// Whether an entry of this kind is selected by the given filter.
    ///
    /// A `Both` filter selects everything; a `Liveness` or `Readiness` filter
    /// selects entries of its own kind plus entries tagged `Both`.
    pub fn matches(self, filter: Self) -> bool {
        filter == Self::Both || self == filter || self == Self::Both
    }
}

impl Default for CheckKind {
    fn default() -> Self {
        Self::Readiness
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Liveness => write!(f, "liveness"),
            Self::Readiness => write!(f, "readiness"),
            Self::Both => write!(f, "both"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Check Result
// ═══════════════════════════════════════════════════════════════════════════════

/// Scalar value attached to a check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    /// Text attachment
    String(String),
    /// Numeric attachment
    Int(i64),
    /// Flag attachment
    Bool(bool),
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Immutable outcome of one probe invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name
    pub name: String,

    /// Verdict
    pub status: CheckStatus,

    /// Additional scalar attachments, omitted from JSON when empty
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, DataValue>,
}

impl CheckResult {
    /// Create an up result.
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Up,
            data: BTreeMap::new(),
        }
    }

    /// Create a down result.
    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Down,
            data: BTreeMap::new(),
        }
    }

    /// Attach a scalar datum.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the verdict.
    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = status;
        self
    }

    /// Check if the result is up.
    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Health Check Trait
// ═══════════════════════════════════════════════════════════════════════════════

/// Capability implemented by every probe.
///
/// A probe reports the state of one dependency or internal condition. An
/// unreachable or unhealthy dependency is the expected outcome and must be
/// reported as a `Down` result; `Err` is reserved for a malfunction of the
/// probe itself and aborts the evaluation it runs in.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Probe once and report the outcome.
    async fn check(&self) -> Result<CheckResult, BoxError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Health Report
// ═══════════════════════════════════════════════════════════════════════════════

/// Aggregated outcome of one evaluation.
///
/// The order of `checks` carries no meaning; consumers look results up by
/// name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Overall verdict, down if any constituent result is down
    pub status: CheckStatus,

    /// Individual results
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    /// Aggregate individual results into a report.
    ///
    /// Zero results aggregate to `Up`.
    pub fn from_checks(checks: Vec<CheckResult>) -> Self {
        let status = checks
            .iter()
            .fold(CheckStatus::Up, |acc, check| acc.combine(check.status));

        Self { status, checks }
    }

    /// Get a result by check name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|check| check.name == name)
    }

    /// Check if the overall verdict is up.
    pub fn is_up(&self) -> bool {
        self.status.is_up()
    }

    /// Get the HTTP status code for this report.
    pub fn http_status(&self) -> u16 {
        self.status.to_http_status()
    }
}

impl Default for HealthReport {
    fn default() -> Self {
        Self::from_checks(Vec::new())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_combine() {
        assert_eq!(CheckStatus::Up.combine(CheckStatus::Up), CheckStatus::Up);
        assert_eq!(CheckStatus::Up.combine(CheckStatus::Down), CheckStatus::Down);
        assert_eq!(CheckStatus::Down.combine(CheckStatus::Up), CheckStatus::Down);
        assert_eq!(CheckStatus::Down.combine(CheckStatus::Down), CheckStatus::Down);
    }

    #[test]
    fn test_status_http_codes() {
        assert_eq!(CheckStatus::Up.to_http_status(), 200);
        assert_eq!(CheckStatus::Down.to_http_status(), 503);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&CheckStatus::Up).unwrap(), "\"UP\"");
        assert_eq!(serde_json::to_string(&CheckStatus::Down).unwrap(), "\"DOWN\"");

        let status: CheckStatus = serde_json::from_str("\"DOWN\"").unwrap();
        assert_eq!(status, CheckStatus::Down);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", CheckStatus::Up), "UP");
        assert_eq!(format!("{}", CheckStatus::Down), "DOWN");
    }

    #[test]
    fn test_kind_merge_equal_keeps_kind() {
        assert_eq!(
            CheckKind::Readiness.merge(CheckKind::Readiness),
            CheckKind::Readiness
        );
        assert_eq!(
            CheckKind::Liveness.merge(CheckKind::Liveness),
            CheckKind::Liveness
        );
        assert_eq!(CheckKind::Both.merge(CheckKind::Both), CheckKind::Both);
    }

    #[test]
    fn test_kind_merge_differing_widens_to_both() {
        assert_eq!(
            CheckKind::Readiness.merge(CheckKind::Liveness),
            CheckKind::Both
        );
        assert_eq!(
            CheckKind::Liveness.merge(CheckKind::Readiness),
            CheckKind::Both
        );
        assert_eq!(CheckKind::Readiness.merge(CheckKind::Both), CheckKind::Both);
        assert_eq!(CheckKind::Both.merge(CheckKind::Liveness), CheckKind::Both);
    }

    #[test]
    fn test_kind_matches_both_filter_selects_all() {
        assert!(CheckKind::Liveness.matches(CheckKind::Both));
        assert!(CheckKind::Readiness.matches(CheckKind::Both));
        assert!(CheckKind::Both.matches(CheckKind::Both));
    }

    #[test]
    fn test_kind_matches_specific_filter() {
        assert!(CheckKind::Liveness.matches(CheckKind::Liveness));
        assert!(!CheckKind::Liveness.matches(CheckKind::Readiness));
        assert!(CheckKind::Readiness.matches(CheckKind::Readiness));
        assert!(!CheckKind::Readiness.matches(CheckKind::Liveness));
        assert!(CheckKind::Both.matches(CheckKind::Liveness));
        assert!(CheckKind::Both.matches(CheckKind::Readiness));
    }

    #[test]
    fn test_kind_default_is_readiness() {
        assert_eq!(CheckKind::default(), CheckKind::Readiness);
    }

    #[test]
    fn test_kind_parses_lowercase() {
        let kind: CheckKind = serde_json::from_str("\"liveness\"").unwrap();
        assert_eq!(kind, CheckKind::Liveness);
        let kind: CheckKind = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(kind, CheckKind::Both);
        assert!(serde_json::from_str::<CheckKind>("\"LIVENESS\"").is_err());
    }

    #[test]
    fn test_data_value_serialization() {
        assert_eq!(
            serde_json::to_string(&DataValue::from("free")).unwrap(),
            "\"free\""
        );
        assert_eq!(serde_json::to_string(&DataValue::from(42i64)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&DataValue::from(true)).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_result_builders() {
        let result = CheckResult::up("database").with_data("pool_size", 10i64);
        assert!(result.is_up());
        assert_eq!(result.name, "database");
        assert_eq!(result.data.get("pool_size"), Some(&DataValue::Int(10)));

        let result = CheckResult::down("redis").with_data("error", "refused");
        assert!(!result.is_up());
    }

    #[test]
    fn test_result_data_omitted_when_empty() {
        let json = serde_json::to_value(CheckResult::up("database")).unwrap();
        assert_eq!(json["name"], "database");
        assert_eq!(json["status"], "UP");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_result_data_present_when_set() {
        let result = CheckResult::down("gateway").with_data("url", "DOWN");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["data"]["url"], "DOWN");
    }

    #[test]
    fn test_result_roundtrip_without_data() {
        let parsed: CheckResult =
            serde_json::from_str(r#"{"name":"database","status":"UP"}"#).unwrap();
        assert_eq!(parsed, CheckResult::up("database"));
    }

    #[test]
    fn test_report_up_when_all_up() {
        let report = HealthReport::from_checks(vec![
            CheckResult::up("database"),
            CheckResult::up("redis"),
        ]);
        assert!(report.is_up());
        assert_eq!(report.http_status(), 200);
    }

    #[test]
    fn test_report_down_when_any_down() {
        let report = HealthReport::from_checks(vec![
            CheckResult::up("database"),
            CheckResult::down("redis"),
            CheckResult::up("disk"),
        ]);
        assert_eq!(report.status, CheckStatus::Down);
        assert_eq!(report.http_status(), 503);
    }

    #[test]
    fn test_report_empty_is_up() {
        let report = HealthReport::from_checks(Vec::new());
        assert!(report.is_up());
        assert!(report.checks.is_empty());
    }

    #[test]
    fn test_report_get_by_name() {
        let report = HealthReport::from_checks(vec![
            CheckResult::up("database"),
            CheckResult::down("redis"),
        ]);
        assert!(report.get("database").is_some());
        assert!(report.get("redis").map(|c| !c.is_up()).unwrap_or(false));
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = HealthReport::from_checks(vec![
            CheckResult::up("database").with_data("pool_size", 10i64)
        ]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["checks"][0]["name"], "database");
        assert_eq!(json["checks"][0]["status"], "UP");
        assert_eq!(json["checks"][0]["data"]["pool_size"], 10);
    }

    #[test]
    fn test_empty_report_serialization() {
        let json = serde_json::to_value(HealthReport::default()).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["checks"], serde_json::json!([]));
    }
}
