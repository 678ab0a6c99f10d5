//! Definition files.
//!
//! A definition file declares a usage template and a list of options, in
//! YAML or JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! usage: "$0 -s [num] -t [int|string]"
//! options:
//!   - key: s
//!     alias: size
//!     help: Number of randomly generated items
//!     required: true
//!     pattern: '/\d+/'
//!     patternMsg: size must be a number
//!   - key: t
//!     alias: type
//!     help: Type of items to be generated
//!     required: true
//!     prompt: true
//!     pattern: '^(int|string)$'
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::definition::{OptionConfig, OptionDefinition};
use crate::error::{ConfigurationError, Result};
use crate::getopt::Getopt;

/// Usage template plus option configurations, in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefinitionFile {
    /// Usage template; `$0` is replaced with the program name.
    #[serde(default)]
    pub usage: Option<String>,
    /// Options to register.
    #[serde(default)]
    pub options: Vec<OptionConfig>,
}

impl DefinitionFile {
    /// Loads a definition file, picking the format from the extension
    /// (`.json`, `.yaml` or `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigurationError::IoError) if the file cannot be
    /// read, [`JsonError`](ConfigurationError::JsonError) or
    /// [`YamlError`](ConfigurationError::YamlError) if parsing fails, and
    /// [`UnsupportedFormat`](ConfigurationError::UnsupportedFormat) for any
    /// other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                Ok(serde_json::from_reader(reader)?)
            }
            Some("yaml" | "yml") => {
                let reader = BufReader::new(std::fs::File::open(path)?);
                Ok(serde_yaml::from_reader(reader)?)
            }
            _ => Err(ConfigurationError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Registers every option with `getopt` and applies the usage template.
    ///
    /// Stops at the first invalid option; options before it stay registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use optdecl_core::{DefinitionFile, Getopt};
    ///
    /// let file = DefinitionFile::from_yaml_str(
    ///     "usage: \"$0 -n [num]\"\noptions:\n  - key: n\n    default: 3\n",
    /// )
    /// .unwrap();
    ///
    /// let mut getopt = Getopt::new(["count"]);
    /// file.apply(&mut getopt).unwrap();
    /// assert_eq!(getopt.usage(), "count -n [num]");
    /// assert_eq!(getopt.get("n").and_then(|v| v.as_str()), Some("3"));
    /// ```
    pub fn apply(&self, getopt: &mut Getopt) -> Result<()> {
        for option in &self.options {
            getopt.register_option(option.clone())?;
        }
        if let Some(usage) = &self.usage {
            getopt.set_usage(usage);
        }
        Ok(())
    }

    /// Checks every option without registering anything, collecting all
    /// configuration errors.
    pub fn validate(&self) -> Vec<ConfigurationError> {
        self.options
            .iter()
            .cloned()
            .filter_map(|option| OptionDefinition::new(option).err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
usage: "php $0 -s [num] -t [int|string]"
options:
  - arg: s
    alias: size
    help: Number of randomly generated item
    required: true
    pattern: '/\d+/'
    patternMsg: size must be a number
  - arg: t
    alias: type
    help: Type of items to be generated
    required: true
    prompt: true
    pattern: '/(int|string)/'
    patternMsg: type must be either "int" or "string"
    requiredMsg: type is required
"#
    }

    #[test]
    fn test_parse_yaml_definitions() {
        let file = DefinitionFile::from_yaml_str(sample_yaml()).unwrap();
        assert_eq!(file.options.len(), 2);
        assert_eq!(file.options[0].key.as_deref(), Some("s"));
        assert_eq!(file.options[1].required_message.as_deref(), Some("type is required"));
        assert!(file.validate().is_empty());
    }

    #[test]
    fn test_apply_registers_in_order() {
        let file = DefinitionFile::from_yaml_str(sample_yaml()).unwrap();
        let mut getopt = Getopt::new(["gen.php"]);
        file.apply(&mut getopt).unwrap();

        let keys: Vec<_> = getopt.definitions().map(|def| def.key()).collect();
        assert_eq!(keys, vec!["s", "t"]);
        assert_eq!(getopt.usage(), "php gen.php -s [num] -t [int|string]");
    }

    #[test]
    fn test_validate_collects_errors() {
        let file = DefinitionFile::from_json_str(
            r#"{"options": [{"help": "no key"}, {"key": "n", "pattern": "("}, {"key": "ok"}]}"#,
        )
        .unwrap();

        let errors = file.validate();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ConfigurationError::MissingKey));
        assert!(matches!(errors[1], ConfigurationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("opts.yml");
        std::fs::File::create(&yaml_path)
            .unwrap()
            .write_all(sample_yaml().as_bytes())
            .unwrap();
        assert_eq!(DefinitionFile::load(&yaml_path).unwrap().options.len(), 2);

        let json_path = dir.path().join("opts.json");
        std::fs::write(&json_path, r#"{"options": [{"key": "v"}]}"#).unwrap();
        assert_eq!(DefinitionFile::load(&json_path).unwrap().options.len(), 1);

        let toml_path = dir.path().join("opts.toml");
        std::fs::write(&toml_path, "").unwrap();
        assert!(matches!(
            DefinitionFile::load(&toml_path),
            Err(ConfigurationError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            DefinitionFile::load(dir.path().join("missing.json")),
            Err(ConfigurationError::IoError(_))
        ));
    }
}
