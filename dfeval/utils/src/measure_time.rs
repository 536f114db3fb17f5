use std::time::Instant;

/// Run `f` and log how long it took under `name`.
///
/// Durations over five seconds are logged as warnings, everything else at
/// the info level.
pub fn measure_time<T, F>(name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    if elapsed.as_secs() > 5 {
        log::warn!("{name}: {}ms", elapsed.as_millis());
    } else {
        log::info!("{name}: {}ms", elapsed.as_millis());
    }
    out
}
