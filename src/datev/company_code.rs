//! Company code (Buchungskreis) resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lookup::{COMPANY_CODE_FIELD, CustomFields};
use super::messages::{self, MessageContext};
use crate::core::MessageLog;

/// A DATEV company code, 0 to 99.
///
/// Displayed zero padded to two digits (`7` -> `"07"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CompanyCode(u8);

impl CompanyCode {
    pub const MAX: u8 = 99;

    /// Parse a free-text override from a customer or customer group.
    ///
    /// Accepts exactly two ASCII digits, so `"07"` is valid but `"7"`,
    /// `" 7"` and `"+7"` are not.
    pub fn parse_override(value: &str) -> Result<Self, InvalidCompanyCode> {
        let bytes = value.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidCompanyCode::NotTwoDigits {
                value: value.to_string(),
            });
        }
        Ok(Self((bytes[0] - b'0') * 10 + (bytes[1] - b'0')))
    }

    /// Check a numeric default from the sales channel configuration.
    pub fn from_default(value: i64) -> Result<Self, InvalidCompanyCode> {
        match u8::try_from(value) {
            Ok(v) if v <= Self::MAX => Ok(Self(v)),
            _ => Err(InvalidCompanyCode::OutOfRange { value }),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for CompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl TryFrom<i64> for CompanyCode {
    type Error = InvalidCompanyCode;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_default(value)
    }
}

impl From<CompanyCode> for u8 {
    fn from(code: CompanyCode) -> Self {
        code.0
    }
}

/// Why a company code was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidCompanyCode {
    /// A text override that is not exactly two digits.
    NotTwoDigits { value: String },
    /// A numeric default outside 0..=99.
    OutOfRange { value: i64 },
}

impl fmt::Display for InvalidCompanyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTwoDigits { value } => {
                write!(f, "company code '{value}' must consist of exactly two digits")
            }
            Self::OutOfRange { value } => {
                write!(f, "company code {value} must be between 0 and 99")
            }
        }
    }
}

impl std::error::Error for InvalidCompanyCode {}

/// Where the resolved company code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompanyCodeSource {
    Customer,
    CustomerGroup,
    SalesChannel,
}

/// Customer and customer group overrides, highest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyCodeOverrides {
    pub customer: Option<String>,
    pub customer_group: Option<String>,
}

impl CompanyCodeOverrides {
    /// Raw overrides. `Some("")` is kept as a present value and is rejected
    /// by [`resolve_company_code`]; use `None` for "not configured".
    pub fn new(customer: Option<&str>, customer_group: Option<&str>) -> Self {
        Self {
            customer: customer.map(str::to_string),
            customer_group: customer_group.map(str::to_string),
        }
    }

    /// Read the overrides from customer and customer group custom fields.
    ///
    /// Empty custom field values are treated as not configured.
    pub fn from_custom_fields(
        customer: Option<&CustomFields>,
        customer_group: Option<&CustomFields>,
    ) -> Self {
        Self {
            customer: customer.and_then(|f| f.text(COMPANY_CODE_FIELD)),
            customer_group: customer_group.and_then(|f| f.text(COMPANY_CODE_FIELD)),
        }
    }
}

/// Outcome of [`resolve_company_code`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyCodeResolution {
    /// `None` when every candidate was absent or invalid.
    pub company_code: Option<CompanyCode>,
    pub source: Option<CompanyCodeSource>,
    pub messages: MessageLog,
}

/// Resolve the company code of an accounting document.
///
/// Precedence is customer > customer group > sales channel default. The
/// first present override is checked; if it is valid, lower levels are
/// never looked at. Each rejected value adds exactly one warning and
/// resolution continues with the next level. An empty string is a present,
/// invalid value here; custom fields drop empty values earlier, in
/// [`CompanyCodeOverrides::from_custom_fields`].
///
/// ```
/// use kontierung::datev::*;
///
/// let context = MessageContext::new("invoice", "1000", "10001", "Storefront");
/// let overrides = CompanyCodeOverrides::new(Some("abc"), Some("15"));
///
/// let resolution = resolve_company_code(7, &overrides, &context);
/// assert_eq!(resolution.company_code.map(CompanyCode::value), Some(15));
/// assert_eq!(resolution.messages.len(), 1);
/// ```
pub fn resolve_company_code(
    default_company_code: i64,
    overrides: &CompanyCodeOverrides,
    context: &MessageContext<'_>,
) -> CompanyCodeResolution {
    let mut log = MessageLog::new();

    let candidates = [
        (CompanyCodeSource::Customer, overrides.customer.as_deref()),
        (
            CompanyCodeSource::CustomerGroup,
            overrides.customer_group.as_deref(),
        ),
    ];

    for (source, value) in candidates {
        let Some(value) = value else {
            continue;
        };
        match CompanyCode::parse_override(value) {
            Ok(code) => {
                return CompanyCodeResolution {
                    company_code: Some(code),
                    source: Some(source),
                    messages: log,
                };
            }
            Err(_) => log.push(messages::company_code_override_invalid(
                source, value, context,
            )),
        }
    }

    match CompanyCode::from_default(default_company_code) {
        Ok(code) => CompanyCodeResolution {
            company_code: Some(code),
            source: Some(CompanyCodeSource::SalesChannel),
            messages: log,
        },
        Err(_) => {
            log.push(messages::default_company_code_invalid(
                default_company_code,
                context,
            ));
            CompanyCodeResolution {
                company_code: None,
                source: None,
                messages: log,
            }
        }
    }
}
