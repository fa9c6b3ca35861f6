// src/bin/cli.rs
use color_eyre::eyre::eyre;
use yoweb_scrape::{cli, runner};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::parse_args(std::env::args().skip(1)).map_err(|e| eyre!("{e}\n\n{}", cli::HELP))?;
    runner::run(args).await
}
