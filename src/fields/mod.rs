//! Custom field extraction configuration
//!
//! Operators register extra regex-based fields in a TOML file. This module:
//! - Defines the built-in catalog and the reserved field names
//! - Creates a default field file on first use
//! - Validates, compiles, and merges selected fields into a [`FieldRegistry`]
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::fields::{ensure_config_file, load_field_config, FieldRegistry};
//!
//! let registry = FieldRegistry::new();
//! let path = ensure_config_file().unwrap();
//! load_field_config(&path, "email", &registry).unwrap();
//! assert!(registry.contains("email"));
//! ```

mod bootstrap;
mod catalog;
mod loader;
mod registry;
mod types;

pub use bootstrap::{default_config_path, ensure_config_file, ensure_config_file_at};
pub use catalog::{default_fields, is_reserved, reserved_names, EMAIL_PATTERN};
pub use loader::{
    decode_field_config, is_valid_field_name, load_field_config, load_validated_field_config,
    split_field_names, validate_definitions, validate_field_config,
};
pub use registry::{FieldMatch, FieldRegistry, FieldSet};
pub use types::{FieldConfigFile, FieldDefinition, FieldKind};
