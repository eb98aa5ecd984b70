use crate::config::Environment;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "taskflow=debug,tower_http=debug,info",
        Environment::Staging => "taskflow=debug,tower_http=info,info",
        Environment::Prod => "taskflow=info,tower_http=info,warn",
    }
}

pub fn init_logging(env: &Environment) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(env).into());

    // Closing spans carry the duration of each instrumented record service call
    let span_events = if env.is_dev() {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_span_events(span_events)
        .with_file(env.is_dev())
        .with_line_number(env.is_dev());

    if matches!(env, Environment::Prod) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.pretty())
            .init();
    }

    tracing::info!(env = ?env, "Logging initialized");
}
