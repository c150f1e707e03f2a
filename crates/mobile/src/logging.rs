use std::panic::PanicHookInfo;
use std::sync::Once;

use tracing_subscriber::{
    filter::FilterFn, fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt,
};

fn ours(module_path: Option<&str>) -> bool {
    module_path.unwrap_or_default().starts_with("trailhead")
}

pub(crate) fn setup_logging() {
    static LOGGING_SETUP: Once = Once::new();

    LOGGING_SETUP.call_once(|| {
        let filter = FilterFn::new(|meta| ours(meta.module_path()));

        #[cfg(target_os = "android")]
        {
            use tracing_logcat::{LogcatMakeWriter, LogcatTag};

            let tag = LogcatTag::Fixed("Trailhead-Rust".to_owned());
            match LogcatMakeWriter::new(tag) {
                Ok(writer) => {
                    let layer = tracing_subscriber::fmt::layer()
                        .event_format(Format::default().with_level(false).without_time())
                        .with_writer(writer)
                        .with_ansi(false);
                    let _ = tracing_subscriber::registry()
                        .with(layer)
                        .with(filter)
                        .try_init();
                }
                Err(e) => eprintln!("failed to initialize logcat writer: {e:?}"),
            }
        }

        #[cfg(not(target_os = "android"))]
        {
            let layer = tracing_subscriber::fmt::layer()
                .event_format(Format::default().without_time())
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(layer)
                .with(filter)
                .try_init();
        }

        std::panic::set_hook(Box::new(panic_hook));
    })
}

pub(crate) fn panic_hook(info: &PanicHookInfo) {
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("{info}\n{backtrace}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_filter() {
        assert!(ours(Some("trailhead_core::fetch")));
        assert!(ours(Some("trailhead_trails::cache")));
        assert!(!ours(Some("reqwest::connect")));
        assert!(!ours(None));
    }
}
