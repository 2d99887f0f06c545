//! Generator catalog
//!
//! Every generator a column rule can name. Names are camelCase and matched
//! exactly.

use crate::domain::GeneratorError;
use std::fmt;
use std::str::FromStr;

/// Argument keys understood by the generators
pub mod args {
    /// Per-column locale override
    pub const LOCALE: &str = "locale";
    /// Lower bound (value, length or count depending on the generator)
    pub const MIN: &str = "min";
    /// Upper bound, inclusive
    pub const MAX: &str = "max";
    /// Fixed value for `constant`
    pub const VALUE: &str = "value";
    /// How far back `date` may go
    pub const DAYS_BACK: &str = "daysBack";
}

/// A named value generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Given name
    FirstName,
    /// Family name
    LastName,
    /// Given and family name
    FullName,
    /// Full name preceded by a title
    NameWithTitle,
    /// Honorific such as `Dr.`
    Title,
    /// Login handle
    Username,
    /// Address on a reserved example domain
    Email,
    /// Address on a free mail provider
    FreeEmail,
    /// Random password, length from `min`/`max`
    Password,
    /// Landline number
    PhoneNumber,
    /// Mobile number
    CellNumber,
    /// Street name without number
    StreetName,
    /// Building number and street
    StreetAddress,
    /// Building number
    BuildingNumber,
    /// City name
    City,
    /// State or region
    State,
    /// US-style zip code
    ZipCode,
    /// Postal code
    PostCode,
    /// Country name
    Country,
    /// Latitude in degrees, six decimals
    Latitude,
    /// Longitude in degrees, six decimals
    Longitude,
    /// Company name
    CompanyName,
    /// IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// MAC address
    MacAddress,
    /// Browser user agent string
    UserAgent,
    /// Card number with a valid checksum
    CreditCardNumber,
    /// Single lorem word
    Word,
    /// Lorem sentence, word count from `min`/`max`
    Sentence,
    /// Lorem paragraph, sentence count from `min`/`max`
    Paragraph,
    /// Random v4 UUID
    Uuid,
    /// Integer between `min` and `max`
    Number,
    /// `true` or `false`
    Boolean,
    /// Timestamp within the last `daysBack` days
    Date,
    /// The fixed `value` argument
    Constant,
    /// SQL `NULL`
    Null,
}

impl GeneratorKind {
    /// The full catalog, in listing order
    pub const ALL: [GeneratorKind; 36] = [
        GeneratorKind::FirstName,
        GeneratorKind::LastName,
        GeneratorKind::FullName,
        GeneratorKind::NameWithTitle,
        GeneratorKind::Title,
        GeneratorKind::Username,
        GeneratorKind::Email,
        GeneratorKind::FreeEmail,
        GeneratorKind::Password,
        GeneratorKind::PhoneNumber,
        GeneratorKind::CellNumber,
        GeneratorKind::StreetName,
        GeneratorKind::StreetAddress,
        GeneratorKind::BuildingNumber,
        GeneratorKind::City,
        GeneratorKind::State,
        GeneratorKind::ZipCode,
        GeneratorKind::PostCode,
        GeneratorKind::Country,
        GeneratorKind::Latitude,
        GeneratorKind::Longitude,
        GeneratorKind::CompanyName,
        GeneratorKind::Ipv4,
        GeneratorKind::Ipv6,
        GeneratorKind::MacAddress,
        GeneratorKind::UserAgent,
        GeneratorKind::CreditCardNumber,
        GeneratorKind::Word,
        GeneratorKind::Sentence,
        GeneratorKind::Paragraph,
        GeneratorKind::Uuid,
        GeneratorKind::Number,
        GeneratorKind::Boolean,
        GeneratorKind::Date,
        GeneratorKind::Constant,
        GeneratorKind::Null,
    ];

    /// Name used in rule documents
    pub fn id(self) -> &'static str {
        match self {
            GeneratorKind::FirstName => "firstName",
            GeneratorKind::LastName => "lastName",
            GeneratorKind::FullName => "fullName",
            GeneratorKind::NameWithTitle => "nameWithTitle",
            GeneratorKind::Title => "title",
            GeneratorKind::Username => "username",
            GeneratorKind::Email => "email",
            GeneratorKind::FreeEmail => "freeEmail",
            GeneratorKind::Password => "password",
            GeneratorKind::PhoneNumber => "phoneNumber",
            GeneratorKind::CellNumber => "cellNumber",
            GeneratorKind::StreetName => "streetName",
            GeneratorKind::StreetAddress => "streetAddress",
            GeneratorKind::BuildingNumber => "buildingNumber",
            GeneratorKind::City => "city",
            GeneratorKind::State => "state",
            GeneratorKind::ZipCode => "zipCode",
            GeneratorKind::PostCode => "postCode",
            GeneratorKind::Country => "country",
            GeneratorKind::Latitude => "latitude",
            GeneratorKind::Longitude => "longitude",
            GeneratorKind::CompanyName => "companyName",
            GeneratorKind::Ipv4 => "ipv4",
            GeneratorKind::Ipv6 => "ipv6",
            GeneratorKind::MacAddress => "macAddress",
            GeneratorKind::UserAgent => "userAgent",
            GeneratorKind::CreditCardNumber => "creditCardNumber",
            GeneratorKind::Word => "word",
            GeneratorKind::Sentence => "sentence",
            GeneratorKind::Paragraph => "paragraph",
            GeneratorKind::Uuid => "uuid",
            GeneratorKind::Number => "number",
            GeneratorKind::Boolean => "boolean",
            GeneratorKind::Date => "date",
            GeneratorKind::Constant => "constant",
            GeneratorKind::Null => "null",
        }
    }

    /// One-line description for `anonymizer generators`
    pub fn description(self) -> &'static str {
        match self {
            GeneratorKind::FirstName => "Given name",
            GeneratorKind::LastName => "Family name",
            GeneratorKind::FullName => "Given and family name",
            GeneratorKind::NameWithTitle => "Full name with a title prefix",
            GeneratorKind::Title => "Honorific (Mr., Dr., ...)",
            GeneratorKind::Username => "Login name",
            GeneratorKind::Email => "Address on a reserved example domain",
            GeneratorKind::FreeEmail => "Address on a free-mail provider domain",
            GeneratorKind::Password => "Random password; min/max set the length",
            GeneratorKind::PhoneNumber => "Landline phone number",
            GeneratorKind::CellNumber => "Mobile phone number",
            GeneratorKind::StreetName => "Street name",
            GeneratorKind::StreetAddress => "Building number and street name",
            GeneratorKind::BuildingNumber => "Building number",
            GeneratorKind::City => "City name",
            GeneratorKind::State => "State or region name",
            GeneratorKind::ZipCode => "Zip code",
            GeneratorKind::PostCode => "Postal code",
            GeneratorKind::Country => "Country name",
            GeneratorKind::Latitude => "Latitude in degrees",
            GeneratorKind::Longitude => "Longitude in degrees",
            GeneratorKind::CompanyName => "Company name",
            GeneratorKind::Ipv4 => "IPv4 address",
            GeneratorKind::Ipv6 => "IPv6 address",
            GeneratorKind::MacAddress => "MAC address",
            GeneratorKind::UserAgent => "Browser user agent",
            GeneratorKind::CreditCardNumber => "Card number with a valid checksum",
            GeneratorKind::Word => "Single lorem word",
            GeneratorKind::Sentence => "Lorem sentence; min/max set the word count",
            GeneratorKind::Paragraph => "Lorem paragraph; min/max set the sentence count",
            GeneratorKind::Uuid => "Random UUID (v4)",
            GeneratorKind::Number => "Integer between min and max (default 0..=99999)",
            GeneratorKind::Boolean => "true or false",
            GeneratorKind::Date => "Timestamp within the last daysBack days (default 3650)",
            GeneratorKind::Constant => "The fixed `value` argument",
            GeneratorKind::Null => "SQL NULL",
        }
    }

    /// Whether the generator draws from a locale data set
    pub fn is_locale_aware(self) -> bool {
        !matches!(
            self,
            GeneratorKind::Latitude
                | GeneratorKind::Longitude
                | GeneratorKind::Uuid
                | GeneratorKind::Number
                | GeneratorKind::Boolean
                | GeneratorKind::Date
                | GeneratorKind::Constant
                | GeneratorKind::Null
        )
    }

    /// Argument keys accepted in `generatorArgs`
    pub fn accepted_args(self) -> &'static [&'static str] {
        match self {
            GeneratorKind::Number => &[args::MIN, args::MAX],
            GeneratorKind::Password | GeneratorKind::Sentence | GeneratorKind::Paragraph => {
                &[args::LOCALE, args::MIN, args::MAX]
            }
            GeneratorKind::Constant => &[args::VALUE],
            GeneratorKind::Date => &[args::DAYS_BACK],
            kind if kind.is_locale_aware() => &[args::LOCALE],
            _ => &[],
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| GeneratorError::UnknownGenerator(s.to_string()))
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
