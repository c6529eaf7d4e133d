use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// A single compliance or well-architected check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub category: String,
    pub passed: bool,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recommendation: String,
}

/// The outcome of running one compliance/well-architected framework against
/// an ArchSpec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub framework: String,
    pub passed: bool,
    pub score: f64,
    pub checks: Vec<ValidationCheck>,
}

impl ValidationResult {
    /// `passed_checks / total_checks`, or 1.0 when there are no checks.
    pub fn score_from_checks(checks: &[ValidationCheck]) -> f64 {
        if checks.is_empty() {
            return 1.0;
        }
        let passed = checks.iter().filter(|c| c.passed).count();
        passed as f64 / checks.len() as f64
    }
}
