//! `indexdb [COMMAND_FILE] [DATA_FILE]`
//!
//! Loads the record file into a fresh index, runs the command script against
//! it, and prints one line per command.

use std::io::{self, Write};
use std::process::ExitCode;

use indexdb::command::{Script, Session};
use indexdb::common::config::Config;
use indexdb::{BTree, RandomRecordIds, RecordFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indexdb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> indexdb::Result<()> {
    let config = Config::from_env()?.with_args(std::env::args().skip(1));
    tracing::info!(
        command_file = %config.command_file.display(),
        data_file = %config.data_file.display(),
        "starting"
    );

    let text = std::fs::read_to_string(&config.command_file)?;
    let script = Script::parse(&text)?;
    let tree = BTree::new(script.degree)?;

    let file = RecordFile::open_or_create(&config.data_file)?;
    let records = file.load()?;

    let ids = match config.record_id_seed {
        Some(seed) => RandomRecordIds::with_seed(seed),
        None => RandomRecordIds::new(),
    };

    let mut session = Session::new(tree, file, ids);
    session.load(&records);

    let outcomes = session.run_script(&script)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for outcome in &outcomes {
        writeln!(out, "{}", outcome)?;
    }
    out.flush()?;

    tracing::info!(
        degree = script.degree,
        entries = session.tree().len(),
        stats = %session.tree().stats(),
        "finished"
    );
    Ok(())
}
