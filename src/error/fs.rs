//! File system errors

impl_error_constructors! {
    FileNotFound as not_found(path),
    FileReadFailed as read_failed(path, reason),
    FileWriteFailed as write_failed(path, reason),
    IoError as io_error(message),
}
