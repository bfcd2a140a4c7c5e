//! Configuration errors

impl_error_constructors! {
    ConfigNotFound as not_found(path),
    ConfigParseFailed as parse_failed(path, reason),
    ConfigInvalid as invalid(message),
    ConfigReadFailed as read_failed(path, reason),
}
