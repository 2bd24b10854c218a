//! Exit codes for the CLI

/// Configuration or repository validation failed
pub const CONFIG_ERROR: i32 = 2;

/// Some components could not be planned
pub const COMPONENT_FAILURE: i32 = 3;
