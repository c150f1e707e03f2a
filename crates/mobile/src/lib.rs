mod logging;
pub mod service;

uniffi::setup_scaffolding!();

/// Route Rust logs to logcat (or stderr off Android). Safe to call repeatedly.
#[uniffi::export]
pub fn init_logging() {
    logging::setup_logging();
}

/// Log panics, with a backtrace, through the same tracing subscriber as
/// everything else. Call this once at startup from Kotlin/Swift.
#[uniffi::export]
pub fn init_panic_handler() {
    logging::setup_logging();
    std::panic::set_hook(Box::new(logging::panic_hook));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_handler_survives_reinstall() {
        init_logging();
        init_panic_handler();
        init_panic_handler();

        let result = std::panic::catch_unwind(|| panic!("trail layer exploded"));
        assert!(result.is_err());

        let _ = std::panic::take_hook();
    }
}
