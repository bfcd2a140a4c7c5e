//! Catalog shipped with the binary

/// Built-in catalog document (`registry/catalog.yaml`)
pub const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");
