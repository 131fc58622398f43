use crate::fields::catalog::default_fields;
use crate::fields::types::FieldConfigFile;
use crate::FieldError;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "~/.config/sumi-harvest/field-config.toml";

/// Per-user location of the field configuration file
pub fn default_config_path() -> Result<PathBuf, FieldError> {
    let expanded = shellexpand::tilde(DEFAULT_CONFIG_PATH);
    if expanded.starts_with('~') {
        return Err(FieldError::HomeDir);
    }
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Makes sure the per-user field configuration file exists
pub fn ensure_config_file() -> Result<PathBuf, FieldError> {
    ensure_config_file_at(&default_config_path()?)
}

/// Makes sure a field configuration file exists at `path`
///
/// An existing file is returned as is, without validation. Otherwise the
/// parent directory is created and the default catalog is written. When the
/// write fails, the partial file is removed; the directory stays.
pub fn ensure_config_file_at(path: &Path) -> Result<PathBuf, FieldError> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_config_dir(parent).map_err(|source| FieldError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string(&FieldConfigFile {
        fields: default_fields(),
    })?;

    if let Err(source) = std::fs::write(path, content) {
        if path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!("Could not remove partial field config {}: {}", path.display(), e);
            }
        }
        return Err(FieldError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!("Created default field config at {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn create_config_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o775)
        .create(dir)
}

#[cfg(not(unix))]
fn create_config_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}
