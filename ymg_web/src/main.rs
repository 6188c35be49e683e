pub mod config;
pub mod handlers;
pub mod reading;

use snafu::{ResultExt, Whatever};
use tracing::{debug, info};

use crate::{config::Config, handlers::ServerState};

#[snafu::report]
#[tokio::main]
async fn main() -> Result<(), Whatever> {
    init_tracing();

    let config = Config::from_env().whatever_context("bad configuration")?;

    let pool = ymg_dict::connect(&config.database_url)
        .await
        .whatever_context("failed to open dictionary")?;
    if let Some(seed) = &config.dict_seed {
        ymg_dict::import_seed(&pool, seed)
            .await
            .whatever_context("failed to seed dictionary")?;
    }
    debug!("dictionary initialised");

    let mecab = ymg_mecab::Mecab::new(config.mecab_path.clone());
    let app = handlers::router(ServerState { pool, mecab });

    let addr = format!("0.0.0.0:{}", config.port);
    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .whatever_context("failed to bind port")?;
    axum::serve(listener, app)
        .await
        .whatever_context("axum could not start")?;

    Ok(())
}

/// Initialise the [`tracing`] library with setup appropriate for this
/// application.
fn init_tracing() {
    use time::{macros::format_description, UtcOffset};
    use tracing::metadata::LevelFilter;
    use tracing_subscriber::{filter::EnvFilter, fmt::time::OffsetTime, prelude::*};

    let offset = UtcOffset::current_local_offset().expect("failed to get local offset");
    let timer = OffsetTime::new(
        offset,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );

    let mut tracing_layers = Vec::new();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_level(true)
        .pretty()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy(),
        )
        .boxed();
    tracing_layers.push(fmt_layer);
    tracing_subscriber::registry().with(tracing_layers).init();
    debug!("tracing initialised");
}
