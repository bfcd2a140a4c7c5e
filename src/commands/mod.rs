//! Command implementations for the Modsmith CLI

pub mod audit;
pub mod check;
pub mod completions;
pub mod helpers;
pub mod install;
pub mod list;
pub mod menu;
pub mod plan;
pub mod show;
pub mod status;
pub mod version;
