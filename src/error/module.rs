//! Module registry and catalog errors

impl_error_constructors! {
    ModuleNotFound as not_found(name),
    InvalidModuleName as invalid_name(name),
    CatalogInvalid as catalog_invalid(message),
}
