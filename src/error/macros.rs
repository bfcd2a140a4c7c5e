//! Error constructor macros for consistent error values
//!
//! Each error domain submodule exposes small constructor functions
//! (`deps::not_found(..)`, `config::invalid(..)`) instead of building enum
//! variants inline at every call site.

/// Generates constructor functions for [`ModsmithError`](super::ModsmithError)
/// variants whose fields are all `String`.
///
/// # Example
/// ```rust,ignore
/// impl_error_constructors! {
///     ModuleNotFound as not_found(name),
///     CatalogInvalid as catalog_invalid(message),
/// }
/// ```
macro_rules! impl_error_constructors {
    ($( $variant:ident as $fn_name:ident ( $($field:ident),* ) ),+ $(,)?) => {
        $(
            #[doc = concat!("Creates a `", stringify!($variant), "` error")]
            pub fn $fn_name($($field: impl Into<String>),*) -> $crate::error::ModsmithError {
                $crate::error::ModsmithError::$variant { $($field: $field.into()),* }
            }
        )+
    };
}

/// Macro for adding context to file operations
///
/// # Example
/// ```rust,ignore
/// let text = std::fs::read_to_string(path)
///     .map_err(|e| file_error_context!("Failed to read audit log", path.display(), e))?;
/// ```
#[macro_export]
macro_rules! file_error_context {
    ($operation:expr, $path:expr, $err:expr) => {
        $crate::error::ModsmithError::FileReadFailed {
            path: $path.to_string(),
            reason: format!("{}: {}", $operation, $err),
        }
    };
}
