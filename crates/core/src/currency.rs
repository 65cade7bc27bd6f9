//! Reference set of valid currency codes.
//!
//! The set is built once at startup (from the bundled ISO 4217 list or from a
//! file) and shared read-only for the lifetime of the process.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::CoreError;

/// Active ISO 4217 alphabetic codes, including fund and precious-metal codes.
pub const ISO_4217_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW",
    "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD",
    "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF",
    "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];

/// Immutable set of currency codes used by the `currency_code` constraint.
///
/// Membership is case-sensitive: `"usd"` is not a member even when `"USD"` is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCodeSet {
    codes: BTreeSet<String>,
}

impl ReferenceCodeSet {
    /// The bundled ISO 4217 list.
    pub fn iso4217() -> Self {
        Self {
            codes: ISO_4217_CODES.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Build a set from explicit codes. Each code must be three uppercase
    /// ASCII letters and the set must not be empty.
    pub fn from_codes<I, S>(codes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for code in codes {
            let code = code.as_ref();
            if !is_code_shaped(code) {
                return Err(CoreError::Configuration(format!(
                    "invalid currency code '{code}' in reference set"
                )));
            }
            set.insert(code.to_string());
        }
        if set.is_empty() {
            return Err(CoreError::Configuration(
                "reference currency code set is empty".to_string(),
            ));
        }
        Ok(Self { codes: set })
    }

    /// Parse codes separated by whitespace or commas. Lines starting with `#`
    /// are comments.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let codes = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
            .filter(|code| !code.is_empty());
        Self::from_codes(codes)
    }

    /// Load codes from a file. An unreadable or malformed file is a
    /// configuration error.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Configuration(format!(
                "cannot read currency code file {}: {e}",
                path.display()
            ))
        })?;
        Self::parse(&text)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn is_code_shaped(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
