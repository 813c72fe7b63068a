//! DATEV EXTF export of accounting documents (Buchungsstapel, format 700).
//!
//! One batch holds the revenue postings of any number of documents. The
//! batch header names a single chart of accounts, so every exported
//! document must have been generated against the same chart.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::accounts::{self, ChartOfAccounts};
use super::document::{AccountingDocument, RevenuePosting};
use crate::core::KontierungError;

const HEADER_FIELDS: usize = 31;
const ROW_FIELDS: usize = 120;

// 1-based DATEV field numbers of a Buchungsstapel row.
const AMOUNT: usize = 1;
const SIDE: usize = 2;
const ACCOUNT: usize = 7;
const CONTRA_ACCOUNT: usize = 8;
const BU_KEY: usize = 9;
const DOCUMENT_DATE: usize = 10;
const DOCUMENT_FIELD_1: usize = 11;
const POSTING_TEXT: usize = 14;
const KOST1: usize = 37;
const KOST2: usize = 38;

/// Export settings of one DATEV client.
///
/// Missing fields deserialize to their defaults.
///
/// ```
/// use chrono::NaiveDate;
/// use kontierung::datev::ExtfConfig;
///
/// let config = ExtfConfig::new(12345, 99999, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .with_label("Erlöse Juni")
///     .locked();
/// assert!(config.lock_postings);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtfConfig {
    /// Beraternummer.
    pub consultant_number: u32,
    /// Mandantennummer.
    pub client_number: u32,
    pub fiscal_year_start: NaiveDate,
    /// Length of G/L account numbers (Sachkontenlänge).
    pub account_length: u8,
    /// Debitor every revenue posting is booked against.
    pub debitor_account: u32,
    /// Batch label shown in DATEV, at most 30 characters are written.
    pub label: String,
    /// At most 25 characters are written.
    pub exported_by: String,
    /// Mark the batch as final (Festschreibung) on import.
    pub lock_postings: bool,
    /// Header timestamp; the current local time if unset.
    pub created_at: Option<NaiveDateTime>,
}

impl Default for ExtfConfig {
    fn default() -> Self {
        Self {
            consultant_number: 1001,
            client_number: 1,
            fiscal_year_start: NaiveDate::default(),
            account_length: 4,
            debitor_account: 10000,
            label: "Erlöse".into(),
            exported_by: String::new(),
            lock_postings: false,
            created_at: None,
        }
    }
}

impl ExtfConfig {
    pub fn new(consultant_number: u32, client_number: u32, fiscal_year_start: NaiveDate) -> Self {
        Self {
            consultant_number,
            client_number,
            fiscal_year_start,
            ..Self::default()
        }
    }

    pub fn with_debitor_account(mut self, account: u32) -> Self {
        self.debitor_account = account;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_exported_by(mut self, name: impl Into<String>) -> Self {
        self.exported_by = name.into();
        self
    }

    pub fn locked(mut self) -> Self {
        self.lock_postings = true;
        self
    }

    /// Fix the header timestamp, for reproducible output.
    pub fn created_at(mut self, at: NaiveDateTime) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Write the revenue postings of `documents` as one EXTF Buchungsstapel.
///
/// Rows use the debitor as account and the revenue account as contra
/// account; cost centers go into KOST1 and KOST2. Lines end in CRLF; the
/// caller encodes to ISO-8859-1 if needed.
///
/// Fails with [`KontierungError::Export`] when `documents` is empty or the
/// documents were generated against different charts of accounts.
pub fn to_extf(
    documents: &[AccountingDocument],
    config: &ExtfConfig,
) -> Result<String, KontierungError> {
    let header = BatchHeader::for_documents(documents, config)?;

    let mut out = String::new();
    push_line(&mut out, header.fields());
    push_line(&mut out, column_names());

    let mut rows = 0;
    for (document, posting) in documents
        .iter()
        .flat_map(|d| d.postings.iter().map(move |p| (d, p)))
        .filter(|(_, p)| !p.amount.is_zero())
    {
        push_line(&mut out, row(document, posting, config));
        rows += 1;
    }

    debug!(
        documents = documents.len(),
        rows,
        chart = header.chart.code(),
        "EXTF batch written"
    );
    Ok(out)
}

/// What the batch header needs to know about the exported documents.
struct BatchHeader<'a> {
    config: &'a ExtfConfig,
    chart: ChartOfAccounts,
    first_date: NaiveDate,
    last_date: NaiveDate,
    created_at: NaiveDateTime,
}

impl<'a> BatchHeader<'a> {
    fn for_documents(
        documents: &[AccountingDocument],
        config: &'a ExtfConfig,
    ) -> Result<Self, KontierungError> {
        let Some(first) = documents.first() else {
            return Err(KontierungError::Export("no documents to export".into()));
        };

        if let Some(other) = documents.iter().find(|d| d.chart != first.chart) {
            return Err(KontierungError::Export(format!(
                "documents use different charts of accounts: {} is SKR{}, {} is SKR{}",
                first.reference.document_number,
                first.chart.code(),
                other.reference.document_number,
                other.chart.code(),
            )));
        }

        let dates = documents.iter().map(|d| d.reference.date);
        Ok(Self {
            config,
            chart: first.chart,
            first_date: dates.clone().min().unwrap_or(first.reference.date),
            last_date: dates.max().unwrap_or(first.reference.date),
            created_at: config
                .created_at
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
        })
    }

    fn fields(&self) -> Vec<String> {
        let config = self.config;
        let mut fields = vec![String::new(); HEADER_FIELDS];
        let mut set = |number: usize, value: String| fields[number - 1] = value;

        set(1, quoted("EXTF"));
        set(2, "700".into());
        set(3, "21".into());
        set(4, quoted("Buchungsstapel"));
        set(5, "13".into());
        set(6, self.created_at.format("%Y%m%d%H%M%S000").to_string());
        set(8, quoted("RE"));
        set(9, quoted(&truncate(&config.exported_by, 25)));
        set(10, quoted(""));
        set(11, config.consultant_number.to_string());
        set(12, config.client_number.to_string());
        set(13, date_field(config.fiscal_year_start));
        set(14, config.account_length.to_string());
        set(15, date_field(self.first_date));
        set(16, date_field(self.last_date));
        set(17, quoted(&truncate(&config.label, 30)));
        set(18, quoted(""));
        // Buchungstyp 1 = Finanzbuchführung, Rechnungslegungszweck 0
        set(19, "1".into());
        set(20, "0".into());
        set(21, u8::from(config.lock_postings).to_string());
        set(22, quoted("EUR"));
        set(24, quoted(""));
        set(27, quoted(self.chart.code()));
        set(31, quoted(""));
        fields
    }
}

fn column_names() -> Vec<String> {
    let mut names = vec![String::new(); ROW_FIELDS];
    for (number, name) in [
        (AMOUNT, "Umsatz (ohne Soll/Haben-Kz)"),
        (SIDE, "Soll/Haben-Kennzeichen"),
        (3, "WKZ Umsatz"),
        (4, "Kurs"),
        (5, "Basisumsatz"),
        (6, "WKZ Basisumsatz"),
        (ACCOUNT, "Konto"),
        (CONTRA_ACCOUNT, "Gegenkonto (ohne BU-Schlüssel)"),
        (BU_KEY, "BU-Schlüssel"),
        (DOCUMENT_DATE, "Belegdatum"),
        (DOCUMENT_FIELD_1, "Belegfeld 1"),
        (12, "Belegfeld 2"),
        (13, "Skonto"),
        (POSTING_TEXT, "Buchungstext"),
        (KOST1, "KOST1 - Kostenstelle"),
        (KOST2, "KOST2 - Kostenstelle"),
    ] {
        names[number - 1] = name.to_string();
    }
    names
}

fn row(document: &AccountingDocument, posting: &RevenuePosting, config: &ExtfConfig) -> Vec<String> {
    let mut fields = vec![String::new(); ROW_FIELDS];
    let mut set = |number: usize, value: String| fields[number - 1] = value;

    // Revenue debits the debitor; negative postings are credited.
    let side = if posting.amount.is_sign_negative() { "H" } else { "S" };

    set(AMOUNT, amount_field(posting.amount));
    set(SIDE, quoted(side));
    set(ACCOUNT, config.debitor_account.to_string());
    set(CONTRA_ACCOUNT, posting.revenue_account.to_string());
    if let Some(key) = accounts::bu_key(posting.tax_rate).filter(|_| !posting.is_automatik) {
        set(BU_KEY, key.to_string());
    }
    set(DOCUMENT_DATE, document.reference.date.format("%d%m").to_string());
    set(
        DOCUMENT_FIELD_1,
        quoted(&truncate(&document.reference.document_number, 36)),
    );
    set(POSTING_TEXT, quoted(&truncate(&posting_text(document), 60)));
    if let Some(cost_center) = &posting.cost_center_1 {
        set(KOST1, quoted(cost_center.as_str()));
    }
    if let Some(cost_center) = &posting.cost_center_2 {
        set(KOST2, quoted(cost_center.as_str()));
    }
    fields
}

/// Order number, plus the company code (`BK nn`) when one was resolved.
fn posting_text(document: &AccountingDocument) -> String {
    match document.company_code {
        Some(code) => format!("{} BK {code}", document.order_number),
        None => document.order_number.clone(),
    }
}

fn push_line(out: &mut String, fields: Vec<String>) {
    out.push_str(&fields.join(";"));
    out.push_str("\r\n");
}

/// Unsigned amount with two decimals and a decimal comma.
fn amount_field(amount: Decimal) -> String {
    let mut rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string().replace('.', ",")
}

fn date_field(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_use_decimal_comma() {
        assert_eq!(amount_field(dec!(1190)), "1190,00");
        assert_eq!(amount_field(dec!(24.95)), "24,95");
        assert_eq!(amount_field(dec!(-20.5)), "20,50");
    }

    #[test]
    fn amounts_round_half_away_from_zero() {
        assert_eq!(amount_field(dec!(123.456)), "123,46");
        assert_eq!(amount_field(dec!(0.125)), "0,13");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("Lager München", 11), "Lager Münch");
    }

    #[test]
    fn column_names_cover_the_full_row() {
        let names = column_names();
        assert_eq!(names.len(), ROW_FIELDS);
        assert_eq!(names[KOST1 - 1], "KOST1 - Kostenstelle");
        assert_eq!(names[KOST2 - 1], "KOST2 - Kostenstelle");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ExtfConfig =
            serde_json::from_str(r#"{ "consultantNumber": 29098, "clientNumber": 55003 }"#)
                .unwrap();
        assert_eq!(config.consultant_number, 29098);
        assert_eq!(config.debitor_account, 10000);
        assert_eq!(config.account_length, 4);
        assert!(!config.lock_postings);
    }
}
