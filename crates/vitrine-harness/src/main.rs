#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use tracing_subscriber::EnvFilter;
use vitrine_harness::config::HELP_TEXT;
use vitrine_harness::{Command, HarnessConfig};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so a stdout trace stays valid JSON lines.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let config = match HarnessConfig::from_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{HELP_TEXT}");
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Run with --help for usage information.");
            process::exit(2);
        }
    };

    let result = match &config.trace_file {
        Some(path) => File::create(path)
            .map_err(vitrine::Error::from)
            .and_then(|file| vitrine_harness::run(&config, &mut BufWriter::new(file))),
        None => vitrine_harness::run(&config, &mut io::stdout().lock()),
    };

    if let Err(err) = result {
        tracing::error!(%err, "harness run failed");
        let _ = io::stderr().flush();
        process::exit(1);
    }
}
