// fuzz_targets/parser.rs
#![no_main]

use gofront::{parse_reader, ParseOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let opts = ParseOptions::default().with_max_nesting_depth(64);
    if let Ok(file) = parse_reader(data, "fuzz.go", opts) {
        // Printed output must parse again.
        let printed = file.to_string();
        if let Err(e) = parse_reader(printed.as_bytes(), "printed.go", opts) {
            panic!("reparse of printed file failed: {e}\n{printed}");
        }
    }
});
