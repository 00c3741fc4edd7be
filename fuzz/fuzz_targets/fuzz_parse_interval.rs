#![no_main]
use hestia::sample::SamplingInterval;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(interval) = text.parse::<SamplingInterval>() {
        assert!(interval.minutes() > 0);
        let again: SamplingInterval = interval.to_string().parse().expect("PTnM parses");
        assert_eq!(interval, again);
    }
});
