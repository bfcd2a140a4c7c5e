//! Audit log errors

impl_error_constructors! {
    AuditWriteFailed as write_failed(path, reason),
    AuditParseFailed as parse_failed(line, reason),
}
