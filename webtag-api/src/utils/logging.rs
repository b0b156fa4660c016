pub fn setup_console_log() {
    setup_log(None)
}

/// Console logging, plus a daily rolling `webtag.log` under `log_dir` when given.
pub fn setup_log(log_dir: Option<&str>) {
    use std::io;
    use tracing_subscriber::{prelude::*, EnvFilter};

    let mut layers = vec![tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(io::stdout)
        .boxed()];

    if let Some(dir) = log_dir {
        let file_log = tracing_appender::rolling::daily(dir, "webtag.log");
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_log)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(EnvFilter::from_default_env())
        .init();
}
