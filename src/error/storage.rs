//! Storage backend errors
//!
//! An unreachable backend is always an error, never "not installed".

impl_error_constructors! {
    StorageUnavailable as unavailable(location, reason),
    StorageCorrupt as corrupt(location, reason),
    StorageWriteFailed as write_failed(location, reason),
}
