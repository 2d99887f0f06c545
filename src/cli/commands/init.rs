//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! rule document.

use crate::config::RuleFormat;
use clap::{Args, ValueEnum};
use std::fs;
use std::path::Path;

/// Output format of the sample document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleFormat {
    Toml,
    Json,
    Yaml,
}

impl SampleFormat {
    fn default_file(self) -> &'static str {
        match self {
            SampleFormat::Toml => "anonymizer.toml",
            SampleFormat::Json => "anonymizer.json",
            SampleFormat::Yaml => "anonymizer.yaml",
        }
    }

    fn from_rule_format(format: RuleFormat) -> Self {
        match format {
            RuleFormat::Toml => SampleFormat::Toml,
            RuleFormat::Json => SampleFormat::Json,
            RuleFormat::Yaml => SampleFormat::Yaml,
        }
    }
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the rule document
    #[arg(short, long)]
    pub output: Option<String>,

    /// Document format; inferred from --output when omitted
    #[arg(long, value_enum)]
    pub format: Option<SampleFormat>,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let format = match self.resolve_format() {
            Ok(format) => format,
            Err(e) => {
                println!("❌ {e}");
                return Ok(2);
            }
        };
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| format.default_file().to_string());

        tracing::info!(output = %output, format = ?format, "Initializing rule document");

        println!("📝 Initializing anonymizer rule document");
        println!();

        if Path::new(&output).exists() && !self.force {
            println!("❌ Rule document already exists: {output}");
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&output, sample_document(format)) {
            Ok(_) => {
                println!("✅ Rule document created: {output}");
                println!();
                println!("Next steps:");
                println!("  1. Edit {output} to match your schema");
                println!("  2. Set the connection variables (or put them in .env):");
                println!("     - ANONYMIZER_LOCAL_DATABASE");
                println!("     - ANONYMIZER_LOCAL_USERNAME");
                println!("     - ANONYMIZER_LOCAL_PASSWORD");
                println!("  3. Check it: anonymizer --config {output} validate");
                println!("  4. Run it:   anonymizer --config {output} run");
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to create rule document: {e}");
                Ok(5)
            }
        }
    }

    fn resolve_format(&self) -> crate::domain::Result<SampleFormat> {
        match (self.format, &self.output) {
            (Some(format), _) => Ok(format),
            (None, Some(output)) => {
                RuleFormat::from_path(Path::new(output)).map(SampleFormat::from_rule_format)
            }
            (None, None) => Ok(SampleFormat::Toml),
        }
    }
}

/// Sample rule document in `format`
pub fn sample_document(format: SampleFormat) -> &'static str {
    match format {
        SampleFormat::Toml => SAMPLE_TOML,
        SampleFormat::Json => SAMPLE_JSON,
        SampleFormat::Yaml => SAMPLE_YAML,
    }
}

const SAMPLE_TOML: &str = r#"# Anonymizer rule document
#
# Runs beforeQueries, then every table rule, then afterQueries.
# ${VAR} placeholders are replaced from the environment.

beforeQueries = [
    "SET FOREIGN_KEY_CHECKS = 0",
]

afterQueries = [
    "SET FOREIGN_KEY_CHECKS = 1",
]

[[tables]]
tableName = "users"
primaryKey = "id"
batchSize = 1000
where = "email NOT LIKE '%@example.com'"

[[tables.columns]]
column = "first_name"
generator = "firstName"

[[tables.columns]]
column = "last_name"
generator = "lastName"

[[tables.columns]]
column = "email"
generator = "email"

[[tables.columns]]
column = "phone"
generator = "phoneNumber"
generatorArgs = { locale = "fr_FR" }

[[tables]]
tableName = "orders"
primaryKey = "order_id"

[[tables.columns]]
column = "shipping_address"
generator = "streetAddress"

[[tables.columns]]
column = "notes"
generator = "null"
"#;

const SAMPLE_JSON: &str = r#"{
  "beforeQueries": ["SET FOREIGN_KEY_CHECKS = 0"],
  "afterQueries": ["SET FOREIGN_KEY_CHECKS = 1"],
  "tables": [
    {
      "tableName": "users",
      "primaryKey": "id",
      "batchSize": 1000,
      "where": "email NOT LIKE '%@example.com'",
      "columns": [
        { "column": "first_name", "generator": "firstName" },
        { "column": "last_name", "generator": "lastName" },
        { "column": "email", "generator": "email" },
        { "column": "phone", "generator": "phoneNumber", "generatorArgs": { "locale": "fr_FR" } }
      ]
    },
    {
      "tableName": "orders",
      "primaryKey": "order_id",
      "columns": [
        { "column": "shipping_address", "generator": "streetAddress" },
        { "column": "notes", "generator": "null" }
      ]
    }
  ]
}
"#;

const SAMPLE_YAML: &str = r#"# Anonymizer rule document
beforeQueries:
  - SET FOREIGN_KEY_CHECKS = 0

afterQueries:
  - SET FOREIGN_KEY_CHECKS = 1

tables:
  - tableName: users
    primaryKey: id
    batchSize: 1000
    where: "email NOT LIKE '%@example.com'"
    columns:
      - column: first_name
        generator: firstName
      - column: last_name
        generator: lastName
      - column: email
        generator: email
      - column: phone
        generator: phoneNumber
        generatorArgs:
          locale: fr_FR

  - tableName: orders
    primaryKey: order_id
    columns:
      - column: shipping_address
        generator: streetAddress
      - column: notes
        generator: "null"
"#;
