#![no_main]
use libfuzzer_sys::fuzz_target;

use covview::analyze::file_metrics;

fuzz_target!(|data: &[u8]| {
    // Whatever the profile claims, classification must not panic and the
    // line tallies must add up.
    let Ok(profiles) = covview::parsers::gocover::parse(data) else {
        return;
    };
    let source = "line\n".repeat(64);
    for profile in &profiles {
        let metrics = file_metrics(profile, profile.file_name.clone(), &source);
        let c = metrics.counters;
        assert_eq!(
            c.tracked_lines,
            c.covered_lines + c.partial_lines + c.missed_lines
        );
    }
});
