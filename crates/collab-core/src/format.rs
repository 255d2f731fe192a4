//! File formats, chosen by extension

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Supported file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl FileFormat {
    /// Format for a path's extension
    ///
    /// # Errors
    /// `ConfigError::UnsupportedFormat` for any other extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse text in this format
    ///
    /// # Errors
    /// Returns the format's parse error
    pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, ConfigError> {
        Ok(match self {
            Self::Json => serde_json::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Toml => toml::from_str(text)?,
        })
    }

    /// Render a value in this format
    ///
    /// # Errors
    /// `ConfigError::Serialization` if the value has no representation
    pub fn render<T: Serialize>(self, value: &T) -> Result<String, ConfigError> {
        match self {
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|e| ConfigError::Serialization(e.to_string())),
            Self::Yaml => {
                serde_yaml::to_string(value).map_err(|e| ConfigError::Serialization(e.to_string()))
            }
            Self::Toml => {
                toml::to_string_pretty(value).map_err(|e| ConfigError::Serialization(e.to_string()))
            }
        }
    }
}

/// Read and parse a file, format by extension
pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&text)
}

/// Render and write a file, format by extension
pub(crate) fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let text = FileFormat::from_path(path)?.render(value)?;
    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_by_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.YML")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a.toml")).unwrap(), FileFormat::Toml);
        assert!(matches!(
            FileFormat::from_path(Path::new("a.ini")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }
}
