use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

/// Installs the fmt subscriber, honouring `RUST_LOG` on top of `info`.
/// Does nothing if the host already installed one.
pub fn init() {
    let filter = match "info".parse::<Directive>() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    let _ = fmt().with_env_filter(filter).try_init();
}
