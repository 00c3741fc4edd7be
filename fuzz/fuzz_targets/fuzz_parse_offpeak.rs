#![no_main]
use hestia::tariff::OffpeakSchedule;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Anything that parses must survive a display/parse round trip
    if let Ok(schedule) = text.parse::<OffpeakSchedule>() {
        let again: OffpeakSchedule = schedule
            .to_string()
            .parse()
            .expect("displayed schedule parses");
        assert_eq!(schedule, again);
    }
});
