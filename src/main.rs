use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use maxvalue_check::cli::Cli;
use maxvalue_check::config::{self, AppConfig};
use maxvalue_check::db::{
    ConnectionFactory, MysqlConnectionFactory, MysqlResultsStore, MysqlSchemaEnumerator,
    ResultsStore,
};
use maxvalue_check::{logging, report, run_check, LogObserver, Status};
use std::process;
use std::sync::Arc;
use tracing::{debug, error};

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let config = match config::load_configuration(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR {}", err);
            println!("{}", report::render_unknown(&err));
            process::exit(Status::Unknown.exit_code());
        }
    };

    let _guard = logging::init_logger(&config.logging);
    debug!("config: {:?}", config.filter);

    let status = match run(&config) {
        Ok(status) => status,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("ERROR {:#}", err);
            println!("{}", report::render_unknown(&format!("{:#}", err)));
            Status::Unknown
        }
    };

    process::exit(status.exit_code());
}

fn run(config: &AppConfig) -> anyhow::Result<Status> {
    let database_url = config
        .connection
        .database_url()
        .context("Error building database url")?;
    let factory: Arc<dyn ConnectionFactory> =
        Arc::new(MysqlConnectionFactory::new(database_url.clone()));
    let enumerator = MysqlSchemaEnumerator::new(database_url);

    // Without a reachable results database the check still runs, unpersisted.
    let mut store = match &config.results {
        Some(results) => match MysqlResultsStore::connect(results) {
            Ok(store) => Some(store),
            Err(err) => {
                error!("Error connecting to results database: {}", err);
                None
            }
        },
        None => None,
    };

    let outcome = run_check(
        config,
        &enumerator,
        factory,
        store.as_mut().map(|s| s as &mut dyn ResultsStore),
        Arc::new(LogObserver::new()),
    );

    if let Some(summary) = &outcome.summary {
        for message in &summary.errors {
            eprintln!("ERROR {}", message);
        }
    }
    println!("{}", outcome.output);

    Ok(outcome.status)
}
