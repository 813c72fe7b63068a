#![no_main]

use kontierung::datev::CostCenter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(Some(cc)) = CostCenter::parse(s) {
            assert!(cc.as_str().len() <= CostCenter::MAX_LENGTH);
            assert_eq!(cc.as_str(), s);
        }
    }
});
