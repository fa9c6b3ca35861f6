// src/runner.rs
//
// Wiring for the binary: config, logging, storage and the HTTP client are
// built once here and handed to whichever command runs.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tokio::sync::watch;
use tracing::info;

use crate::cli::{Args, Command, HELP};
use crate::config::Config;
use crate::core::{Fetch, HttpFetcher};
use crate::log;
use crate::poller::MarketPoller;
use crate::scheduler::Scheduler;
use crate::scrape::{Scraper, Urls};
use crate::store::{SqliteStore, Store};

pub async fn run(args: Args) -> Result<()> {
    if args.command == Command::Help {
        println!("{HELP}");
        return Ok(());
    }

    let cfg = Config::load(args.config.as_deref()).wrap_err("loading configuration")?;
    log::init(cfg.log_file.as_deref()).wrap_err("opening log file")?;

    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::connect(&cfg.database_url)
            .await
            .wrap_err_with(|| format!("opening database {}", cfg.database_url))?,
    );
    let fetch: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&cfg).wrap_err("building HTTP client")?);

    match args.command {
        Command::Serve => serve(&cfg, fetch, store).await,
        Command::Scrape { ocean, kind } => {
            let job = Scraper::new(&cfg, fetch, store).run_job(ocean, kind).await?;
            println!("{}", job.id);
            Ok(())
        }
        Command::Poll => {
            let poller = MarketPoller::new(fetch, store, Urls::new(&cfg.host), cfg.ocean_list()?);
            let summary = poller.run().await?;
            println!("{}", summary.imported);
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

async fn serve(cfg: &Config, fetch: Arc<dyn Fetch>, store: Arc<dyn Store>) -> Result<()> {
    let scheduler = Scheduler::new(cfg, fetch, store)?;
    let (stop, stopped) = watch::channel(false);
    let running = tokio::spawn(scheduler.run(stopped));

    info!("scheduler running; Ctrl-C to stop");
    tokio::signal::ctrl_c().await.wrap_err("waiting for Ctrl-C")?;
    info!("Ctrl-C received");
    let _ = stop.send(true);

    running.await.wrap_err("scheduler task")?;
    Ok(())
}
