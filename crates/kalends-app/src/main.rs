use clap::Parser;
use kalends_app::agenda::Agenda;
use kalends_app::cli::{Args, Query};
use kalends_app::render::{render_day, render_range};
use kalends_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let query = args.query()?;
    let agenda = Agenda::load(&args.agenda_path(&config))?;

    let output = match query {
        Query::Range { from, to } => {
            let items = agenda.occurrences(from, to)?;
            tracing::info!(%from, %to, occurrences = items.len(), "Listing range");
            render_range(&items, &config.display)?
        }
        Query::Day(date) => {
            let names = agenda.events_on(date)?;
            tracing::info!(%date, events = names.len(), "Listing day");
            render_day(&names)
        }
    };
    print!("{output}");

    Ok(())
}
