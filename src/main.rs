// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, build the logger and API client, and
//   hand them to the dispatcher.
// - Usage problems exit with status 1; anything else surfaces as an error.

use std::io;
use std::process;

use anyhow::Context;
use clap::Parser;
use gh_keys::api::ApiClient;
use gh_keys::cli::Options;
use gh_keys::dispatch::{Dispatcher, Exit};
use gh_keys::logging::Logger;

fn main() -> anyhow::Result<()> {
    let opts = Options::parse();
    let logger = Logger::new(opts.debug);

    let client = ApiClient::new(opts.client_config(), logger.clone())
        .context("Failed to build HTTP client")?;
    let mut dispatcher = Dispatcher::new(&client, &logger, io::stdout().lock());
    let exit = dispatcher
        .run(&opts)
        .context("GitHub key request failed")?;
    drop(dispatcher);

    if exit != Exit::Success {
        process::exit(exit.code());
    }
    Ok(())
}
