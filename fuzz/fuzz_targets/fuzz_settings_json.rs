#![no_main]

use kontierung::datev::{CompanyCodeOverrides, CustomFields, InMemorySettings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine, panics are bugs.
        let _ = InMemorySettings::from_json(s);
        if let Ok(value) = serde_json::from_str(s) {
            let fields = CustomFields::from_value(value);
            let _ = CompanyCodeOverrides::from_custom_fields(Some(&fields), None);
        }
    }
});
