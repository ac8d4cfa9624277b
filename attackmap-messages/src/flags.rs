/// Neutral flag shown for countries outside the lookup table.
pub const FALLBACK_FLAG: &str = "\u{1F3F3}\u{FE0F}";

/// Offset from an uppercase ASCII letter to its regional indicator symbol.
pub const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

const COUNTRY_CODES: &[(&str, &str)] = &[
    ("United States", "US"),
    ("Russia", "RU"),
    ("China", "CN"),
    ("India", "IN"),
    ("Brazil", "BR"),
    ("Germany", "DE"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Japan", "JP"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("South Korea", "KR"),
    ("Netherlands", "NL"),
    ("Iran", "IR"),
    ("Turkey", "TR"),
    ("Vietnam", "VN"),
    ("Poland", "PL"),
    ("Ukraine", "UA"),
    ("Taiwan", "TW"),
    ("Romania", "RO"),
];

/// Resolves country names to flag emoji.
pub struct FlagResolver;

impl FlagResolver {
    /// Two-letter ISO code for a known country name.
    pub fn country_code(country: &str) -> Option<&'static str> {
        COUNTRY_CODES
            .iter()
            .find(|(name, _)| *name == country)
            .map(|(_, code)| *code)
    }

    /// Flag for `country`, or [`FALLBACK_FLAG`] when the name is unknown.
    pub fn resolve(country: &str) -> String {
        match Self::country_code(country) {
            Some(code) => Self::code_to_flag(code),
            None => FALLBACK_FLAG.to_string(),
        }
    }

    /// Compose the two regional indicator symbols for an ISO code.
    pub fn code_to_flag(code: &str) -> String {
        code.chars()
            .map(|c| c.to_ascii_uppercase())
            .filter_map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
            .collect()
    }

    /// Every country name the resolver knows.
    pub fn known_countries() -> impl Iterator<Item = &'static str> {
        COUNTRY_CODES.iter().map(|(name, _)| *name)
    }
}
