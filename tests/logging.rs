//! Kept apart from the other integration tests so that the logger installed
//! here is the first one in the process.
use dfeval::ThroughputOpts;
use log::LevelFilter;

#[test]
fn log_option_sets_the_level() {
    let opts = ThroughputOpts::from_parameters(&["--log", "debug"]).unwrap();
    opts.init_logging();
    assert_eq!(log::max_level(), LevelFilter::Debug);
    // a second logger is refused without touching the level
    ThroughputOpts::from_parameters(&["--log", "error"])
        .unwrap()
        .init_logging();
    assert_eq!(log::max_level(), LevelFilter::Debug);
}
