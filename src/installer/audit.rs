//! Append-only installation audit log
//!
//! One line per attempted module:
//!
//! ```text
//! 2026-03-14 09:26:53 | SUCCESS | crm | user=admin | Created 3 tables
//! 2026-03-14 09:26:53 | FAILED | visits | user=admin | table crm_visits: disk full
//! ```
//!
//! The log is never truncated or rewritten. Line breaks inside messages are
//! flattened so each attempt stays on exactly one line.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Timelike};
use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::InstallationResult;
use crate::error::{Result, audit};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = " | ";
const USER_PREFIX: &str = "user=";

/// Outcome column of an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Success => "SUCCESS",
            AuditStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(AuditStatus::Success),
            "FAILED" => Ok(AuditStatus::Failed),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// One recorded installation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub module: String,
    pub status: AuditStatus,
    pub user_id: String,
    pub message: String,
}

impl AuditEntry {
    /// Entry stamped with the current local time, to the second
    pub fn new(
        module: impl Into<String>,
        status: AuditStatus,
        user_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            module: module.into(),
            status,
            user_id: user_id.into(),
            message: message.into(),
        }
    }

    pub fn from_result(result: &InstallationResult, user_id: &str) -> Self {
        let status = if result.success() {
            AuditStatus::Success
        } else {
            AuditStatus::Failed
        };
        Self::new(result.module(), status, user_id, result.message())
    }

    /// Render as a single log line without the trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{USER_PREFIX}{}{SEPARATOR}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.status,
            self.module,
            self.user_id,
            flatten(&self.message)
        )
    }

    /// Parse one log line
    pub fn parse_line(line: &str) -> Result<Self> {
        let fail = |reason: &str| audit::parse_failed(line, reason);

        let mut fields = line.trim_end_matches(['\r', '\n']).splitn(5, SEPARATOR);
        let (Some(timestamp), Some(status), Some(module), Some(user), Some(message)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(fail("expected 5 fields"));
        };

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| fail(e.to_string().as_str()))?;
        let status = status.parse::<AuditStatus>().map_err(|e| fail(e.as_str()))?;
        let user_id = user
            .strip_prefix(USER_PREFIX)
            .ok_or_else(|| fail("missing user= field"))?;

        Ok(Self {
            timestamp,
            module: module.to_string(),
            status,
            user_id: user_id.to_string(),
            message: message.to_string(),
        })
    }
}

fn flatten(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Destination for audit entries
pub trait AuditSink: Send {
    fn append(&mut self, entry: &AuditEntry) -> Result<()>;
}

/// Audit log stored as a text file
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every well-formed entry, oldest first
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn read_entries(&self) -> Result<Vec<AuditEntry>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(crate::file_error_context!(
                    "Failed to read audit log",
                    self.path.display(),
                    e
                ));
            }
        };

        let mut entries = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match AuditEntry::parse_line(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(line = number + 1, error = %e, "skipping audit line"),
            }
        }
        Ok(entries)
    }
}

impl AuditSink for FileAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        let to_error = |e: std::io::Error| audit::write_failed(self.path.display().to_string(), e.to_string());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_error)?;
        writeln!(file, "{}", entry.to_line()).map_err(to_error)?;
        Ok(())
    }
}

/// In-memory sink; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
    failure: Option<String>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose appends always fail with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            entries: Arc::default(),
            failure: Some(reason.into()),
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

impl AuditSink for MemoryAuditLog {
    fn append(&mut self, entry: &AuditEntry) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(audit::write_failed("memory", reason));
        }
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ModsmithError;
    use tempfile::TempDir;

    #[test]
    fn test_line_format() {
        let mut entry = AuditEntry::new("crm", AuditStatus::Success, "admin", "Created 3 tables");
        entry.timestamp = NaiveDateTime::parse_from_str("2026-03-14 09:26:53", TIMESTAMP_FORMAT)
            .expect("timestamp");
        assert_eq!(
            entry.to_line(),
            "2026-03-14 09:26:53 | SUCCESS | crm | user=admin | Created 3 tables"
        );
    }

    #[test]
    fn test_parse_line() {
        let entry = AuditEntry::parse_line(
            "2026-03-14 09:26:53 | FAILED | visits | user=jane | step 2 | constraint violated",
        )
        .expect("parse");
        assert_eq!(entry.status, AuditStatus::Failed);
        assert_eq!(entry.module, "visits");
        assert_eq!(entry.user_id, "jane");
        assert_eq!(entry.message, "step 2 | constraint violated");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for line in [
            "",
            "2026-03-14 09:26:53 | SUCCESS | crm",
            "yesterday | SUCCESS | crm | user=a | ok",
            "2026-03-14 09:26:53 | MAYBE | crm | user=a | ok",
            "2026-03-14 09:26:53 | SUCCESS | crm | admin | ok",
        ] {
            let err = AuditEntry::parse_line(line).expect_err("line should not parse");
            assert!(matches!(err, ModsmithError::AuditParseFailed { .. }));
        }
    }

    #[test]
    fn test_multiline_message_is_flattened() {
        let entry = AuditEntry::new("crm", AuditStatus::Failed, "admin", "first\n  second\r\n");
        let line = entry.to_line();
        assert!(!line.contains('\n'));
        assert!(line.ends_with("| first second"));
    }

    #[test]
    fn test_file_log_appends() {
        let temp = TempDir::new().expect("tempdir");
        let mut log = FileAuditLog::new(temp.path().join("install.log"));
        log.append(&AuditEntry::new("employees", AuditStatus::Success, "admin", "ok"))
            .expect("append");
        log.append(&AuditEntry::new("crm", AuditStatus::Failed, "admin", "boom"))
            .expect("append");

        let entries = log.read_entries().expect("read");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].module, "employees");
        assert_eq!(entries[1].status, AuditStatus::Failed);

        // Re-opening never truncates
        let mut reopened = FileAuditLog::new(log.path());
        reopened
            .append(&AuditEntry::new("visits", AuditStatus::Success, "admin", "ok"))
            .expect("append");
        assert_eq!(log.read_entries().expect("read").len(), 3);
    }

    #[test]
    fn test_file_log_skips_malformed_lines() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("install.log");
        std::fs::write(
            &path,
            "not an audit line\n2026-03-14 09:26:53 | SUCCESS | crm | user=admin | ok\n",
        )
        .expect("write");
        let entries = FileAuditLog::new(&path).read_entries().expect("read");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unwritable_log() {
        let temp = TempDir::new().expect("tempdir");
        let mut log = FileAuditLog::new(temp.path().join("missing").join("install.log"));
        let err = log
            .append(&AuditEntry::new("crm", AuditStatus::Success, "admin", "ok"))
            .expect_err("missing directory");
        assert!(matches!(err, ModsmithError::AuditWriteFailed { .. }));
    }

    #[test]
    fn test_memory_log_shares_entries() {
        let log = MemoryAuditLog::new();
        let mut sink = log.clone();
        sink.append(&AuditEntry::new("crm", AuditStatus::Success, "admin", "ok"))
            .expect("append");
        assert_eq!(log.entries().len(), 1);
        assert!(
            MemoryAuditLog::failing("read-only")
                .append(&AuditEntry::new("crm", AuditStatus::Success, "admin", "ok"))
                .is_err()
        );
    }
}
