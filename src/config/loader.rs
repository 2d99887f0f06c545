//! Rule document loader
//!
//! A rule document can be written as TOML, JSON or YAML. Each format is a
//! [`RuleDocumentSource`]; the source is picked from the file extension.
//!
//! Loading:
//! 1. Picks the source for the file extension
//! 2. Reads the file
//! 3. Substitutes `${VAR}` placeholders from the environment
//! 4. Parses the document
//! 5. Validates it

use super::rules::RuleDocument;
use crate::domain::errors::AnonymizerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// Supported rule document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl RuleFormat {
    /// Detects the format from a file extension
    ///
    /// # Errors
    ///
    /// Programmatic rule modules (`.js`, `.ts`) and unknown extensions are
    /// rejected with a configuration error.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| {
                AnonymizerError::Configuration(format!(
                    "Rule document {} has no file extension; expected .toml, .json, .yaml or .yml",
                    path.display()
                ))
            })?;

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "js" | "ts" | "mjs" => Err(AnonymizerError::Configuration(format!(
                "Programmatic rule modules (.{extension}) are not supported; export the rules as TOML, JSON or YAML"
            ))),
            other => Err(AnonymizerError::Configuration(format!(
                "Unsupported rule document format '.{other}'; expected .toml, .json, .yaml or .yml"
            ))),
        }
    }
}

impl fmt::Display for RuleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFormat::Toml => f.write_str("toml"),
            RuleFormat::Json => f.write_str("json"),
            RuleFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// A format that can produce a [`RuleDocument`]
pub trait RuleDocumentSource {
    /// Format handled by this source
    fn format(&self) -> RuleFormat;

    /// Parses already-substituted document text
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not a valid document.
    fn parse_str(&self, contents: &str) -> Result<RuleDocument>;

    /// Reads and parses the document at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a `${VAR}` placeholder
    /// references a missing variable, or parsing fails.
    fn parse(&self, path: &Path) -> Result<RuleDocument> {
        let contents = read_document(path)?;
        let contents = substitute_env_vars(&contents)?;
        self.parse_str(&contents).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to parse {} rule document {}: {}",
                self.format(),
                path.display(),
                e
            ))
        })
    }
}

/// TOML rule documents
pub struct TomlSource;

/// JSON rule documents
pub struct JsonSource;

/// YAML rule documents
pub struct YamlSource;

impl RuleDocumentSource for TomlSource {
    fn format(&self) -> RuleFormat {
        RuleFormat::Toml
    }

    fn parse_str(&self, contents: &str) -> Result<RuleDocument> {
        Ok(toml::from_str(contents)?)
    }
}

impl RuleDocumentSource for JsonSource {
    fn format(&self) -> RuleFormat {
        RuleFormat::Json
    }

    fn parse_str(&self, contents: &str) -> Result<RuleDocument> {
        Ok(serde_json::from_str(contents)?)
    }
}

impl RuleDocumentSource for YamlSource {
    fn format(&self) -> RuleFormat {
        RuleFormat::Yaml
    }

    fn parse_str(&self, contents: &str) -> Result<RuleDocument> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Returns the source for a format
pub fn source_for(format: RuleFormat) -> Box<dyn RuleDocumentSource> {
    match format {
        RuleFormat::Toml => Box::new(TomlSource),
        RuleFormat::Json => Box::new(JsonSource),
        RuleFormat::Yaml => Box::new(YamlSource),
    }
}

/// Loads and validates a rule document
///
/// # Errors
///
/// Returns an error if:
/// - The extension is not a supported format
/// - File cannot be read
/// - Environment variable substitution fails
/// - Parsing fails
/// - Validation fails
///
/// # Examples
///
/// ```no_run
/// use anonymizer::config::loader::load_rules;
///
/// let rules = load_rules("anonymizer.toml").expect("Failed to load rules");
/// println!("{} tables", rules.tables.len());
/// ```
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleDocument> {
    let path = path.as_ref();
    let source = source_for(RuleFormat::from_path(path)?);
    let rules = source.parse(path)?;

    rules.validate().map_err(|e| {
        AnonymizerError::Validation(format!(
            "Rule document {} is invalid: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(
        path = %path.display(),
        format = %source.format(),
        tables = rules.tables.len(),
        before_queries = rules.before_queries.len(),
        after_queries = rules.after_queries.len(),
        "Rule document loaded"
    );

    Ok(rules)
}

fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AnonymizerError::Configuration(format!(
            "Rule document not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        AnonymizerError::Configuration(format!(
            "Failed to read rule document {}: {}",
            path.display(),
            e
        ))
    })
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    substitute_vars_with(input, |name| std::env::var(name).ok())
}

fn substitute_vars_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AnonymizerError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match lookup(var_name) {
                Some(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                None => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}
