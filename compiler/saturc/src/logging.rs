use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// The filter comes from `SATUR_LOG`, falling back to `RUST_LOG`
/// (e.g. `SATUR_LOG=saturc=debug,satur_parse=trace`). Set `SATUR_LOG_TREE`
/// for indented, span-nested output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("SATUR_LOG").or_else(|_| std::env::var("RUST_LOG"));
        // Only initialize if a filter is set
        let Ok(directives) = directives else {
            return;
        };
        let filter = EnvFilter::new(directives);

        if std::env::var_os("SATUR_LOG_TREE").is_some() {
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
