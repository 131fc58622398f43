use crate::fields::catalog::is_reserved;
use crate::fields::registry::FieldRegistry;
use crate::fields::types::{FieldConfigFile, FieldDefinition};
use crate::FieldError;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Reads and decodes a field configuration file
///
/// An empty file decodes to an empty list.
pub fn decode_field_config(path: &Path) -> Result<Vec<FieldDefinition>, FieldError> {
    let content = std::fs::read_to_string(path).map_err(|source| FieldError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: FieldConfigFile = toml::from_str(&content).map_err(|source| FieldError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(file.fields)
}

/// Checks a field name against `[A-Za-z0-9_-]+`
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validates field names in file order, stopping at the first violation
pub fn validate_definitions(definitions: &[FieldDefinition]) -> Result<(), FieldError> {
    let mut seen = HashSet::new();

    for definition in definitions {
        let name = &definition.name;

        if !is_valid_field_name(name) {
            return Err(FieldError::InvalidName(name.clone()));
        }

        if is_reserved(name) {
            return Err(FieldError::Reserved(name.clone()));
        }

        if !seen.insert(name.as_str()) {
            return Err(FieldError::Duplicate(name.clone()));
        }
    }

    Ok(())
}

/// Validates a field configuration file without touching any registry
///
/// # Errors
///
/// * `FieldError::Read` / `FieldError::Decode` - The file cannot be read or decoded
/// * `FieldError::InvalidName` - A name is outside `[A-Za-z0-9_-]+`
/// * `FieldError::Reserved` - A name collides with a built-in field
/// * `FieldError::Duplicate` - A name appears twice in the file
pub fn validate_field_config(path: &Path) -> Result<(), FieldError> {
    let definitions = decode_field_config(path)?;
    validate_definitions(&definitions)
}

/// Splits a field selection on commas, semicolons, and whitespace
pub fn split_field_names(selected: &str) -> impl Iterator<Item = &str> {
    selected
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Compiles a field configuration file and activates the selected fields
///
/// Every pattern in the file is compiled before anything is merged, so a bad
/// pattern leaves the registry untouched. Selected names that the file does
/// not define are skipped. Names are not checked here; run
/// [`validate_field_config`] first for operator-supplied files, or use
/// [`load_validated_field_config`].
///
/// # Returns
///
/// The names that were activated, in selection order
pub fn load_field_config(
    path: &Path,
    selected: &str,
    registry: &FieldRegistry,
) -> Result<Vec<String>, FieldError> {
    let definitions = decode_field_config(path)?;

    let mut all_fields = HashMap::new();
    for mut definition in definitions {
        definition.compile()?;
        all_fields.insert(definition.name.clone(), definition);
    }

    let mut activated = Vec::new();
    let mut incoming = Vec::new();
    for name in split_field_names(selected) {
        if activated.iter().any(|active| active == name) {
            continue;
        }
        match all_fields.get(name) {
            Some(definition) => {
                incoming.push(definition.clone());
                activated.push(name.to_string());
            }
            None => {
                tracing::debug!("Selected field {} is not defined in {}", name, path.display());
            }
        }
    }

    registry.merge(incoming);
    tracing::debug!("Activated fields from {}: {:?}", path.display(), activated);
    Ok(activated)
}

/// Validates a field configuration file, then loads it
pub fn load_validated_field_config(
    path: &Path,
    selected: &str,
    registry: &FieldRegistry,
) -> Result<Vec<String>, FieldError> {
    validate_field_config(path)?;
    load_field_config(path, selected, registry)
}
