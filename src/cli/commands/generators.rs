//! Generators command implementation
//!
//! Prints the generator catalog and the supported locales.

use crate::core::generator::{GeneratorKind, Locale};
use clap::Args;

/// Arguments for the generators command
#[derive(Args, Debug)]
pub struct GeneratorsArgs {
    /// Only list locale-aware generators
    #[arg(long)]
    pub locale_aware: bool,
}

impl GeneratorsArgs {
    /// Execute the generators command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("{}", self.render());
        Ok(0)
    }

    /// Renders the listing
    pub fn render(&self) -> String {
        let kinds: Vec<GeneratorKind> = GeneratorKind::ALL
            .into_iter()
            .filter(|kind| !self.locale_aware || kind.is_locale_aware())
            .collect();
        let width = kinds.iter().map(|k| k.id().len()).max().unwrap_or(0);

        let mut out = String::from("Generators:\n");
        for kind in kinds {
            let args = kind.accepted_args();
            let args = if args.is_empty() {
                String::new()
            } else {
                format!(" [{}]", args.join(", "))
            };
            out.push_str(&format!(
                "  {:<width$}  {}{}\n",
                kind.id(),
                kind.description(),
                args
            ));
        }

        out.push_str("\nLocales:\n");
        for locale in Locale::ALL {
            let marker = if locale == Locale::default() {
                " (default)"
            } else {
                ""
            };
            out.push_str(&format!("  {}{}\n", locale.as_str(), marker));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_generator() {
        let listing = GeneratorsArgs {
            locale_aware: false,
        }
        .render();
        for kind in GeneratorKind::ALL {
            assert!(listing.contains(kind.id()), "missing {}", kind.id());
        }
        assert!(listing.contains("en (default)"));
        assert!(listing.contains("ja_JP"));
    }

    #[test]
    fn test_render_locale_aware_only() {
        let listing = GeneratorsArgs { locale_aware: true }.render();
        assert!(listing.contains("firstName"));
        assert!(!listing.contains("  uuid "));
    }
}
