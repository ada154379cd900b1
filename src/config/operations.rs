//! Options loading, validation, and compilation.

use super::model::Options;
use super::types::ProcessorConfig;
use crate::context::{GENERATOR_TEMPLATE_VARS, OUTPUT_TEMPLATE_VARS};
use crate::error::{CogError, Result};
use crate::template::check_template;
use regex::Regex;
use std::path::Path;
use std::time::Duration;

impl Options {
    /// Load options from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Options)` - Successfully loaded and validated options
    /// * `Err(CogError::Config)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CogError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse options from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document, but an empty file means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let options: Options = serde_yaml::from_str(yaml)
            .map_err(|e| CogError::Config(format!("failed to parse config YAML: {}", e)))?;

        options.validate()?;
        Ok(options)
    }

    /// Serialize options to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CogError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate option values.
    ///
    /// Validation rules:
    /// - marker patterns must be non-empty (except the optional output-start)
    ///   and must compile
    /// - temp file templates may only reference their known variables
    /// - `timeout_seconds` must be positive when set
    pub fn validate(&self) -> Result<()> {
        self.compile().map(|_| ())
    }

    /// Validate and compile into the immutable processor configuration.
    pub fn compile(&self) -> Result<ProcessorConfig> {
        let gen_start = compile_marker("gen_start", &self.gen_start)?;
        let gen_end = compile_marker("gen_end", &self.gen_end)?;
        let out_end = compile_marker("out_end", &self.out_end)?;
        let out_start = match self.out_start.as_deref() {
            None | Some("") => None,
            Some(pattern) => Some(compile_marker("out_start", pattern)?),
        };

        check_template(&self.gen_file, GENERATOR_TEMPLATE_VARS).map_err(|e| {
            CogError::Config(format!(
                "config validation failed: gen_file template '{}': {}",
                self.gen_file, e
            ))
        })?;
        check_template(&self.out_file, OUTPUT_TEMPLATE_VARS).map_err(|e| {
            CogError::Config(format!(
                "config validation failed: out_file template '{}': {}",
                self.out_file, e
            ))
        })?;

        if self.timeout_seconds == Some(0) {
            return Err(CogError::Config(
                "config validation failed: timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let command = self
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(ProcessorConfig {
            gen_start,
            gen_end,
            out_start,
            out_end,
            use_eof: self.use_eof,
            excise: self.excise,
            retain: self.retain,
            gen_file: self.gen_file.clone(),
            out_file: self.out_file.clone(),
            command,
            args: self.args.clone(),
            timeout: self.timeout_seconds.map(Duration::from_secs),
        })
    }
}

fn compile_marker(name: &str, pattern: &str) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(CogError::Config(format!(
            "config validation failed: {} must not be empty",
            name
        )));
    }
    Regex::new(pattern).map_err(|e| {
        CogError::Config(format!(
            "invalid regex pattern for {}: '{}' - {}",
            name, pattern, e
        ))
    })
}
