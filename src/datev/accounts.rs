//! SKR03 / SKR04 revenue accounts.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Standard German chart of accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ChartOfAccounts {
    /// Standardkontenrahmen 03 (most common for SMBs).
    #[default]
    SKR03,
    /// Standardkontenrahmen 04 (used by larger companies, Bilanzrecht).
    SKR04,
}

impl ChartOfAccounts {
    /// SKR identifier for the EXTF header.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SKR03 => "03",
            Self::SKR04 => "04",
        }
    }
}

/// Revenue account for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountMapping {
    /// Revenue account (Erlöskonto).
    pub revenue_account: u32,
    /// Whether the revenue account is an Automatikkonto
    /// (auto-applies tax, so BU-Schlüssel can be omitted).
    pub is_automatik: bool,
}

/// Determine the revenue account for a tax rate; `None` means untaxed.
pub fn revenue_account(chart: ChartOfAccounts, tax_rate: Option<Decimal>) -> AccountMapping {
    let (standard, reduced, other, untaxed) = match chart {
        ChartOfAccounts::SKR03 => (8400, 8300, 8000, 8200),
        ChartOfAccounts::SKR04 => (4400, 4300, 4000, 4200),
    };

    match tax_rate {
        Some(rate) if rate == dec!(19) => AccountMapping {
            revenue_account: standard,
            is_automatik: true,
        },
        Some(rate) if rate == dec!(7) => AccountMapping {
            revenue_account: reduced,
            is_automatik: true,
        },
        // Other rates book to generic revenue
        Some(_) => AccountMapping {
            revenue_account: other,
            is_automatik: false,
        },
        None => AccountMapping {
            revenue_account: untaxed,
            is_automatik: false,
        },
    }
}

/// BU-Schlüssel (tax posting key) for non-Automatik revenue accounts.
///
/// 3 = USt 19%, 2 = USt 7%. Other rates have no standard key.
pub fn bu_key(tax_rate: Option<Decimal>) -> Option<u8> {
    match tax_rate {
        Some(rate) if rate == dec!(19) => Some(3),
        Some(rate) if rate == dec!(7) => Some(2),
        _ => None,
    }
}
