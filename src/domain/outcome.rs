//! Installation outcome types
//!
//! One `InstallationResult` is created per attempted module and never
//! mutated afterwards; the fields are private and only readable.

use std::collections::BTreeSet;

use serde::Serialize;

/// Outcome of one module installation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationResult {
    module: String,
    success: bool,
    message: String,
}

impl InstallationResult {
    /// Create a successful result
    pub fn succeeded(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(module.into(), true, message.into())
    }

    /// Create a failed result
    pub fn failed(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(module.into(), false, message.into())
    }

    fn new(module: String, success: bool, message: String) -> Self {
        let message = if message.trim().is_empty() {
            if success {
                format!("Module '{module}' installed")
            } else {
                format!("Module '{module}' failed without a message")
            }
        } else {
            message
        };
        Self {
            module,
            success,
            message,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Ordered results of one installation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallationReport {
    results: Vec<InstallationResult>,
    /// Audit entries that could not be written during the run
    pub audit_failures: usize,
}

impl InstallationReport {
    pub fn new(results: Vec<InstallationResult>, audit_failures: usize) -> Self {
        Self {
            results,
            audit_failures,
        }
    }

    /// Results in plan order, one per attempted module
    pub fn results(&self) -> &[InstallationResult] {
        &self.results
    }

    /// Modules eligible for a caller-initiated retry: exactly the failed ones
    pub fn retry_set(&self) -> BTreeSet<String> {
        self.results
            .iter()
            .filter(|r| !r.success())
            .map(|r| r.module().to_string())
            .collect()
    }

    /// True when every attempted module succeeded (vacuously true for an empty run)
    pub fn is_success(&self) -> bool {
        self.results.iter().all(InstallationResult::success)
    }

    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.succeeded_count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_is_replaced() {
        let ok = InstallationResult::succeeded("crm", "   ");
        assert_eq!(ok.message(), "Module 'crm' installed");

        let failed = InstallationResult::failed("crm", "");
        assert!(!failed.message().is_empty());
        assert!(!failed.success());
    }

    #[test]
    fn test_retry_set_is_exactly_failed_modules() {
        let report = InstallationReport::new(
            vec![
                InstallationResult::succeeded("employees", "Created 2 tables"),
                InstallationResult::failed("crm", "table crm_clients: disk full"),
                InstallationResult::failed("visits", "missing prerequisite data"),
            ],
            0,
        );
        let expected: BTreeSet<String> = ["crm", "visits"].iter().map(|s| s.to_string()).collect();
        assert_eq!(report.retry_set(), expected);
        assert!(!report.is_success());
        assert_eq!(report.succeeded_count(), 1);
        assert_eq!(report.failed_count(), 2);
    }

    #[test]
    fn test_retry_set_empty_iff_success() {
        let report = InstallationReport::new(
            vec![InstallationResult::succeeded("employees", "ok")],
            0,
        );
        assert!(report.retry_set().is_empty());
        assert!(report.is_success());
        assert!(InstallationReport::default().is_success());
    }
}
