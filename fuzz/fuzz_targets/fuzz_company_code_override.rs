#![no_main]

use kontierung::datev::{CompanyCodeOverrides, MessageContext, resolve_company_code};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, i64)| {
    let (customer, group, default) = input;
    let context = MessageContext::new("invoice", "1", "1", "fuzz");
    let overrides = CompanyCodeOverrides::new(Some(customer), Some(group));
    let r = resolve_company_code(default, &overrides, &context);
    // One message per rejected level, at most three levels.
    assert!(r.messages.len() <= 3);
    if let Some(code) = r.company_code {
        assert!(code.value() <= 99);
    }
});
