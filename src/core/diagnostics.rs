//! Bilingual diagnostic messages collected during document generation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How much attention a diagnostic needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, nothing to fix.
    Info,
    /// Configuration should be fixed; a fallback was applied.
    Warning,
}

/// A text in German and English.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub de: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(de: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            de: de.into(),
            en: en.into(),
        }
    }
}

/// A non-fatal, user-facing note attached to a generated document.
///
/// The metadata map is ordered, so serialized messages are byte-stable
/// across runs with identical inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    code: String,
    severity: Severity,
    text: LocalizedText,
    meta: BTreeMap<String, String>,
}

impl DiagnosticMessage {
    /// Create a message without metadata.
    pub fn new(code: impl Into<String>, severity: Severity, text: LocalizedText) -> Self {
        Self {
            code: code.into(),
            severity,
            text,
            meta: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry (e.g. the rejected value or an entity name).
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Stable machine-readable code, e.g. `COMPANY_CODE_CUSTOMER_INVALID`.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn text(&self) -> &LocalizedText {
        &self.text
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    /// Look up a single metadata value.
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.text.en)
    }
}

/// Append-only, ordered sink for diagnostic messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog {
    messages: Vec<DiagnosticMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: DiagnosticMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticMessage> {
        self.messages.iter()
    }

    /// Messages with [`Severity::Warning`].
    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages
            .iter()
            .filter(|m| m.severity == Severity::Warning)
    }

    pub fn into_vec(self) -> Vec<DiagnosticMessage> {
        self.messages
    }
}

impl Extend<DiagnosticMessage> for MessageLog {
    fn extend<T: IntoIterator<Item = DiagnosticMessage>>(&mut self, iter: T) {
        self.messages.extend(iter);
    }
}

impl IntoIterator for MessageLog {
    type Item = DiagnosticMessage;
    type IntoIter = std::vec::IntoIter<DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(code: &str) -> DiagnosticMessage {
        DiagnosticMessage::new(
            code,
            Severity::Warning,
            LocalizedText::new("Warnung", "Warning"),
        )
    }

    #[test]
    fn display_uses_code_and_english_text() {
        assert_eq!(warning("SOME_CODE").to_string(), "[SOME_CODE] Warning");
    }

    #[test]
    fn meta_is_ordered_by_key() {
        let msg = warning("X")
            .with_meta("value", "abc")
            .with_meta("orderNumber", "10001");
        let keys: Vec<_> = msg.meta().keys().map(String::as_str).collect();
        assert_eq!(keys, ["orderNumber", "value"]);
        assert_eq!(msg.meta_value("value"), Some("abc"));
        assert_eq!(msg.meta_value("missing"), None);
    }

    #[test]
    fn log_keeps_insertion_order() {
        let mut log = MessageLog::new();
        log.push(warning("B"));
        log.push(DiagnosticMessage::new(
            "A",
            Severity::Info,
            LocalizedText::new("Hinweis", "Note"),
        ));
        log.extend([warning("C")]);

        let codes: Vec<_> = log.iter().map(DiagnosticMessage::code).collect();
        assert_eq!(codes, ["B", "A", "C"]);
        assert_eq!(log.warnings().count(), 2);
        assert_eq!(log.into_vec().len(), 3);
    }
}
