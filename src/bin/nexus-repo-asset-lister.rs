extern crate chrono;
extern crate dotenv;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate nexus_repo_asset_lister;

use std::env;
use std::io::{self, Write};
use std::process;

use chrono::Local;
use env_logger::Builder;
use failure::Error;
use log::LevelFilter;
use nexus_repo_asset_lister::cli::Args;
use nexus_repo_asset_lister::{Client, Config, Driver, ListingFailure};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::from_env_args();

    if let Err(e) = run(&args) {
        if let Some(listing_failure) = e.downcast_ref::<ListingFailure>() {
            let mut stderr = io::stderr();
            if let Err(report_err) = listing_failure.display(&mut stderr) {
                error!("Unable to report the failures, {}", report_err);
            }
        } else {
            eprintln!("Error: {}", e);

            for cause in e.iter_chain().skip(1) {
                eprintln!("\tCaused By: {}", cause);
            }
        }

        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    initialize_logging(args)?;
    let cfg = args.config()?;

    if log_enabled!(log::Level::Debug) {
        for line in format!("{:#?}", cfg).lines() {
            debug!("{}", line);
        }
    }

    print_banner(&cfg);

    let client = Client::with_config(&cfg)?;
    let driver = Driver::with_config(client, &cfg);
    let summary = driver.run()?;

    info!(
        "Wrote {} asset identities for {} repositories",
        summary.total_identities(),
        summary.repositories.len()
    );

    Ok(())
}

fn print_banner(cfg: &Config) {
    let rule = "⬢⬡".repeat(42);

    println!("{}", rule);
    println!();
    println!("\tNexus Repository Asset Lister");
    println!();
    println!("\tRunning on:\t\t{}/{}", env::consts::OS, env::consts::ARCH);
    println!("\tVersion:\t\t{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("{}", rule);
    println!();
    println!("Collecting Assets from: {}", cfg.url);
    println!();
}

fn initialize_logging(args: &Args) -> Result<(), Error> {
    let mut builder = Builder::new();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    builder.filter(Some("nexus_repo_asset_lister"), level);

    if let Ok(filter) = env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }

    builder.format(|out, record| match record.line() {
        Some(line) => writeln!(
            out,
            "{} [{:5}] ({}#{}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            line,
            record.args()
        ),
        None => writeln!(
            out,
            "{} [{:5}] ({}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        ),
    });

    builder.try_init()?;

    Ok(())
}
