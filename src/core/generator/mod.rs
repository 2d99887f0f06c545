//! Value generator adapter
//!
//! Turns a [`ColumnRule`] into synthetic values. Rules are resolved once per
//! table with [`ValueGenerator::resolve`], which rejects unknown generator
//! names and malformed arguments before any row is touched. Resolved columns
//! then produce one value per row through [`ValueGenerator::generate`].
//!
//! Text values come from the `fake` crate's locale-generic fakers; numbers,
//! booleans, dates and coordinates are drawn directly from the run's RNG.
//!
//! ```rust
//! use anonymizer::config::ColumnRule;
//! use anonymizer::core::generator::{Locale, ValueGenerator};
//!
//! let mut generator = ValueGenerator::new(Locale::En, Some(7));
//! let column = generator.resolve(&ColumnRule::new("email", "email")).unwrap();
//! let value = generator.generate(&column);
//! assert!(value.as_text().unwrap().contains('@'));
//! ```

pub mod catalog;
pub mod locale;

pub use catalog::GeneratorKind;
pub use locale::Locale;

use crate::config::ColumnRule;
use crate::domain::{GeneratorError, SqlValue};
use catalog::args;
use chrono::{Duration, Utc};
use fake::faker::address::raw::{
    BuildingNumber, CityName, CountryName, PostCode, StateName, StreetName, ZipCode,
};
use fake::faker::company::raw::CompanyName;
use fake::faker::creditcard::raw::CreditCardNumber;
use fake::faker::internet::raw::{
    FreeEmail, IPv4, IPv6, MACAddress, Password, SafeEmail, UserAgent, Username,
};
use fake::faker::lorem::raw::{Paragraph, Sentence, Word};
use fake::faker::name::raw::{FirstName, LastName, Name, NameWithTitle, Title};
use fake::faker::phone_number::raw::{CellNumber, PhoneNumber};
use fake::locales::{Data, EN, FR_FR, JA_JP, ZH_CN, ZH_TW};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::ops::RangeInclusive;

const DEFAULT_NUMBER_RANGE: RangeInclusive<i64> = 0..=99_999;
const DEFAULT_PASSWORD_LENGTH: RangeInclusive<i64> = 8..=16;
const DEFAULT_SENTENCE_WORDS: RangeInclusive<i64> = 4..=10;
const DEFAULT_PARAGRAPH_SENTENCES: RangeInclusive<i64> = 3..=6;
const DEFAULT_DAYS_BACK: i64 = 3650;
/// Upper bound for `password` length and `sentence`/`paragraph` counts
pub const MAX_TEXT_SPAN: i64 = 4096;
/// Upper bound for `daysBack`, about a thousand years
pub const MAX_DAYS_BACK: i64 = 365_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// A column rule whose generator and arguments have been checked
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Target column
    pub column: String,
    /// Generator
    pub kind: GeneratorKind,
    /// Effective locale (run locale unless overridden)
    pub locale: Locale,
    /// Bounds for `number`, or length/count bounds for text generators
    pub range: Option<RangeInclusive<i64>>,
    /// Fixed value for `constant`
    pub constant: Option<SqlValue>,
    /// Look-back window for `date`
    pub days_back: Option<i64>,
}

/// Produces synthetic column values for one run
pub struct ValueGenerator {
    rng: StdRng,
    locale: Locale,
}

impl ValueGenerator {
    /// Creates a generator for `locale`
    ///
    /// With a seed the generated sequence is reproducible.
    pub fn new(locale: Locale, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, locale }
    }

    /// Run locale
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Resolves a column rule
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::UnknownGenerator`] if the generator name is not in
    ///   the catalog
    /// - [`GeneratorError::UnsupportedLocale`] for an unknown `locale` argument
    /// - [`GeneratorError::InvalidGeneratorArgs`] for unknown keys, values of
    ///   the wrong shape, or bounds past [`MAX_TEXT_SPAN`] / [`MAX_DAYS_BACK`]
    pub fn resolve(&self, rule: &ColumnRule) -> Result<ResolvedColumn, GeneratorError> {
        let kind: GeneratorKind = rule.generator.parse()?;
        let accepted = kind.accepted_args();

        if let Some(unknown) = rule
            .generator_args
            .keys()
            .find(|key| !accepted.contains(&key.as_str()))
        {
            return Err(GeneratorError::invalid_args(
                kind.id(),
                if accepted.is_empty() {
                    format!("unexpected argument '{unknown}' (takes no arguments)")
                } else {
                    format!(
                        "unexpected argument '{unknown}' (accepted: {})",
                        accepted.join(", ")
                    )
                },
            ));
        }

        let locale = match rule.generator_args.get(args::LOCALE) {
            None => self.locale,
            Some(Value::String(name)) => name.parse()?,
            Some(_) => {
                return Err(GeneratorError::invalid_args(
                    kind.id(),
                    "locale must be a string",
                ))
            }
        };

        let text_span = 1..=MAX_TEXT_SPAN;
        let range = match kind {
            GeneratorKind::Number => {
                Some(bounds(kind, rule, DEFAULT_NUMBER_RANGE, i64::MIN..=i64::MAX)?)
            }
            GeneratorKind::Password => Some(bounds(kind, rule, DEFAULT_PASSWORD_LENGTH, text_span)?),
            GeneratorKind::Sentence => Some(bounds(kind, rule, DEFAULT_SENTENCE_WORDS, text_span)?),
            GeneratorKind::Paragraph => {
                Some(bounds(kind, rule, DEFAULT_PARAGRAPH_SENTENCES, text_span)?)
            }
            _ => None,
        };

        let constant = match kind {
            GeneratorKind::Constant => {
                let raw = rule.generator_args.get(args::VALUE).ok_or_else(|| {
                    GeneratorError::invalid_args(kind.id(), "missing required argument 'value'")
                })?;
                Some(scalar(kind, raw)?)
            }
            _ => None,
        };

        let days_back = match kind {
            GeneratorKind::Date => Some(match rule.generator_args.get(args::DAYS_BACK) {
                None => DEFAULT_DAYS_BACK,
                Some(value) => match value.as_i64() {
                    Some(days) if (1..=MAX_DAYS_BACK).contains(&days) => days,
                    _ => {
                        return Err(GeneratorError::invalid_args(
                            kind.id(),
                            format!("daysBack must be an integer between 1 and {MAX_DAYS_BACK}"),
                        ))
                    }
                },
            }),
            _ => None,
        };

        Ok(ResolvedColumn {
            column: rule.column.clone(),
            kind,
            locale,
            range,
            constant,
            days_back,
        })
    }

    /// Resolves every column rule of a table, failing on the first bad one
    ///
    /// # Errors
    ///
    /// Returns the failing column name with its [`GeneratorError`].
    pub fn resolve_all(
        &self,
        rules: &[ColumnRule],
    ) -> Result<Vec<ResolvedColumn>, (String, GeneratorError)> {
        rules
            .iter()
            .map(|rule| self.resolve(rule).map_err(|e| (rule.column.clone(), e)))
            .collect()
    }

    /// Produces one value
    pub fn generate(&mut self, column: &ResolvedColumn) -> SqlValue {
        let rng = &mut self.rng;
        match column.kind {
            GeneratorKind::Null => SqlValue::Null,
            GeneratorKind::Constant => column.constant.clone().unwrap_or(SqlValue::Null),
            GeneratorKind::Boolean => SqlValue::Bool(rng.gen_bool(0.5)),
            GeneratorKind::Number => {
                SqlValue::Int(rng.gen_range(column.range.clone().unwrap_or(DEFAULT_NUMBER_RANGE)))
            }
            GeneratorKind::Uuid => {
                SqlValue::Text(uuid::Builder::from_random_bytes(rng.gen()).into_uuid().to_string())
            }
            GeneratorKind::Latitude => SqlValue::Float(round6(rng.gen_range(-90.0..=90.0))),
            GeneratorKind::Longitude => SqlValue::Float(round6(rng.gen_range(-180.0..=180.0))),
            GeneratorKind::Date => {
                let days = column.days_back.unwrap_or(DEFAULT_DAYS_BACK).clamp(1, MAX_DAYS_BACK);
                let window = days.saturating_mul(SECONDS_PER_DAY);
                let now = Utc::now();
                let at = Duration::try_seconds(rng.gen_range(0..=window))
                    .and_then(|back| now.checked_sub_signed(back))
                    .unwrap_or(now);
                SqlValue::Text(at.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            kind => {
                let text = match column.locale {
                    Locale::En => fake_text(kind, EN, column, rng),
                    Locale::FrFr => fake_text(kind, FR_FR, column, rng),
                    Locale::ZhCn => fake_text(kind, ZH_CN, column, rng),
                    Locale::ZhTw => fake_text(kind, ZH_TW, column, rng),
                    Locale::JaJp => fake_text(kind, JA_JP, column, rng),
                };
                SqlValue::Text(text)
            }
        }
    }
}

/// Locale-generic text fakers
fn fake_text<L: Data + Copy>(
    kind: GeneratorKind,
    l: L,
    column: &ResolvedColumn,
    rng: &mut StdRng,
) -> String {
    let span = |default: RangeInclusive<i64>| {
        let range = column.range.clone().unwrap_or(default);
        let clamp = |n: i64| n.clamp(1, MAX_TEXT_SPAN) as usize;
        clamp(*range.start())..clamp(*range.end()) + 1
    };

    match kind {
        GeneratorKind::FirstName => FirstName(l).fake_with_rng(rng),
        GeneratorKind::LastName => LastName(l).fake_with_rng(rng),
        GeneratorKind::FullName => Name(l).fake_with_rng(rng),
        GeneratorKind::NameWithTitle => NameWithTitle(l).fake_with_rng(rng),
        GeneratorKind::Title => Title(l).fake_with_rng(rng),
        GeneratorKind::Username => Username(l).fake_with_rng(rng),
        GeneratorKind::Email => SafeEmail(l).fake_with_rng(rng),
        GeneratorKind::FreeEmail => FreeEmail(l).fake_with_rng(rng),
        GeneratorKind::Password => Password(l, span(DEFAULT_PASSWORD_LENGTH)).fake_with_rng(rng),
        GeneratorKind::PhoneNumber => PhoneNumber(l).fake_with_rng(rng),
        GeneratorKind::CellNumber => CellNumber(l).fake_with_rng(rng),
        GeneratorKind::StreetName => StreetName(l).fake_with_rng(rng),
        GeneratorKind::StreetAddress => {
            let number: String = BuildingNumber(l).fake_with_rng(rng);
            let street: String = StreetName(l).fake_with_rng(rng);
            format!("{number} {street}")
        }
        GeneratorKind::BuildingNumber => BuildingNumber(l).fake_with_rng(rng),
        GeneratorKind::City => CityName(l).fake_with_rng(rng),
        GeneratorKind::State => StateName(l).fake_with_rng(rng),
        GeneratorKind::ZipCode => ZipCode(l).fake_with_rng(rng),
        GeneratorKind::PostCode => PostCode(l).fake_with_rng(rng),
        GeneratorKind::Country => CountryName(l).fake_with_rng(rng),
        GeneratorKind::CompanyName => CompanyName(l).fake_with_rng(rng),
        GeneratorKind::Ipv4 => IPv4(l).fake_with_rng(rng),
        GeneratorKind::Ipv6 => IPv6(l).fake_with_rng(rng),
        GeneratorKind::MacAddress => MACAddress(l).fake_with_rng(rng),
        GeneratorKind::UserAgent => UserAgent(l).fake_with_rng(rng),
        GeneratorKind::CreditCardNumber => CreditCardNumber(l).fake_with_rng(rng),
        GeneratorKind::Word => Word(l).fake_with_rng(rng),
        GeneratorKind::Sentence => Sentence(l, span(DEFAULT_SENTENCE_WORDS)).fake_with_rng(rng),
        GeneratorKind::Paragraph => {
            Paragraph(l, span(DEFAULT_PARAGRAPH_SENTENCES)).fake_with_rng(rng)
        }
        GeneratorKind::Latitude
        | GeneratorKind::Longitude
        | GeneratorKind::Uuid
        | GeneratorKind::Number
        | GeneratorKind::Boolean
        | GeneratorKind::Date
        | GeneratorKind::Constant
        | GeneratorKind::Null => String::new(),
    }
}

/// Reads `min`/`max`, falling back to `default` for whichever is unset
///
/// Both bounds must fall within `allowed`.
fn bounds(
    kind: GeneratorKind,
    rule: &ColumnRule,
    default: RangeInclusive<i64>,
    allowed: RangeInclusive<i64>,
) -> Result<RangeInclusive<i64>, GeneratorError> {
    let read = |key: &str, fallback: i64| match rule.generator_args.get(key) {
        None => Ok(fallback),
        Some(value) => value.as_i64().ok_or_else(|| {
            GeneratorError::invalid_args(kind.id(), format!("{key} must be an integer"))
        }),
    };

    let min = read(args::MIN, *default.start())?;
    let max = read(args::MAX, (*default.end()).max(min))?;

    if min < *allowed.start() {
        return Err(GeneratorError::invalid_args(
            kind.id(),
            format!("min must be at least {}", allowed.start()),
        ));
    }
    if max > *allowed.end() {
        return Err(GeneratorError::invalid_args(
            kind.id(),
            format!("max must be at most {}", allowed.end()),
        ));
    }
    if min > max {
        return Err(GeneratorError::invalid_args(
            kind.id(),
            format!("min ({min}) must not exceed max ({max})"),
        ));
    }
    Ok(min..=max)
}

fn scalar(kind: GeneratorKind, raw: &Value) -> Result<SqlValue, GeneratorError> {
    match raw {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Bool(*b)),
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_f64().map(SqlValue::Float))
            .ok_or_else(|| GeneratorError::invalid_args(kind.id(), "value is out of range")),
        Value::Array(_) | Value::Object(_) => Err(GeneratorError::invalid_args(
            kind.id(),
            "value must be a string, number, boolean or null",
        )),
    }
}

fn round6(x: f64) -> f64 {
    (x * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generator() -> ValueGenerator {
        ValueGenerator::new(Locale::En, Some(42))
    }

    #[test]
    fn test_unknown_generator() {
        let err = generator()
            .resolve(&ColumnRule::new("email", "bogus"))
            .unwrap_err();
        assert_eq!(err, GeneratorError::UnknownGenerator("bogus".to_string()));
    }

    #[test]
    fn test_locale_override() {
        let column = generator()
            .resolve(&ColumnRule::new("name", "firstName").with_arg("locale", json!("fr_FR")))
            .unwrap();
        assert_eq!(column.locale, Locale::FrFr);
    }

    #[test]
    fn test_unsupported_locale_override() {
        let err = generator()
            .resolve(&ColumnRule::new("name", "firstName").with_arg("locale", json!("xx")))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::UnsupportedLocale(_)));
    }

    #[test]
    fn test_unexpected_argument() {
        let err = generator()
            .resolve(&ColumnRule::new("email", "email").with_arg("domain", json!("x.io")))
            .unwrap_err();
        assert!(err.to_string().contains("unexpected argument 'domain'"));
    }

    #[test]
    fn test_number_bounds() {
        let mut generator = generator();
        let column = generator
            .resolve(
                &ColumnRule::new("age", "number")
                    .with_arg("min", json!(18))
                    .with_arg("max", json!(20)),
            )
            .unwrap();
        for _ in 0..50 {
            match generator.generate(&column) {
                SqlValue::Int(n) => assert!((18..=20).contains(&n)),
                other => panic!("expected an integer, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = generator()
            .resolve(
                &ColumnRule::new("age", "number")
                    .with_arg("min", json!(5))
                    .with_arg("max", json!(1)),
            )
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidGeneratorArgs { .. }));
    }

    #[test]
    fn test_password_length() {
        let mut generator = generator();
        let column = generator
            .resolve(
                &ColumnRule::new("secret", "password")
                    .with_arg("min", json!(12))
                    .with_arg("max", json!(12)),
            )
            .unwrap();
        let value = generator.generate(&column);
        assert_eq!(value.as_text().unwrap().chars().count(), 12);
    }

    #[test]
    fn test_oversized_lengths_rejected() {
        for kind in ["password", "sentence", "paragraph"] {
            let err = generator()
                .resolve(&ColumnRule::new("col", kind).with_arg("max", json!(i64::MAX)))
                .unwrap_err();
            assert!(
                err.to_string().contains("max must be at most 4096"),
                "{kind}: {err}"
            );
        }

        let mut generator = generator();
        let column = generator
            .resolve(
                &ColumnRule::new("body", "paragraph")
                    .with_arg("min", json!(1))
                    .with_arg("max", json!(MAX_TEXT_SPAN)),
            )
            .unwrap();
        assert!(column.range.is_some());
    }

    #[test]
    fn test_days_back_bounds() {
        let err = generator()
            .resolve(&ColumnRule::new("born", "date").with_arg("daysBack", json!(200_000_000)))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidGeneratorArgs { .. }));

        let err = generator()
            .resolve(&ColumnRule::new("born", "date").with_arg("daysBack", json!(0)))
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidGeneratorArgs { .. }));

        let mut generator = generator();
        let column = generator
            .resolve(&ColumnRule::new("born", "date").with_arg("daysBack", json!(MAX_DAYS_BACK)))
            .unwrap();
        for _ in 0..20 {
            let value = generator.generate(&column);
            assert_eq!(value.as_text().unwrap().len(), "2000-01-01 00:00:00".len());
        }
    }

    #[test]
    fn test_constant_requires_value() {
        let err = generator()
            .resolve(&ColumnRule::new("status", "constant"))
            .unwrap_err();
        assert!(err.to_string().contains("'value'"));

        let mut generator = generator();
        let column = generator
            .resolve(&ColumnRule::new("status", "constant").with_arg("value", json!("redacted")))
            .unwrap();
        assert_eq!(generator.generate(&column), SqlValue::from("redacted"));
    }

    #[test]
    fn test_null_generator() {
        let mut generator = generator();
        let column = generator.resolve(&ColumnRule::new("notes", "null")).unwrap();
        assert!(generator.generate(&column).is_null());
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let rule = ColumnRule::new("name", "fullName");
        let mut a = ValueGenerator::new(Locale::En, Some(1));
        let mut b = ValueGenerator::new(Locale::En, Some(1));
        let column = a.resolve(&rule).unwrap();
        let first: Vec<SqlValue> = (0..5).map(|_| a.generate(&column)).collect();
        let second: Vec<SqlValue> = (0..5).map(|_| b.generate(&column)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_all_names_failing_column() {
        let rules = vec![
            ColumnRule::new("email", "email"),
            ColumnRule::new("nickname", "bogus"),
        ];
        let (column, err) = generator().resolve_all(&rules).unwrap_err();
        assert_eq!(column, "nickname");
        assert!(matches!(err, GeneratorError::UnknownGenerator(_)));
    }

    #[test]
    fn test_every_generator_produces_a_value() {
        let mut generator = generator();
        for kind in GeneratorKind::ALL {
            let mut rule = ColumnRule::new("col", kind.id());
            if kind == GeneratorKind::Constant {
                rule = rule.with_arg("value", json!(1));
            }
            let column = generator.resolve(&rule).unwrap();
            let value = generator.generate(&column);
            if kind != GeneratorKind::Null {
                assert!(!value.is_null(), "{kind} produced NULL");
            }
        }
    }
}
