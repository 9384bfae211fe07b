use std::path::PathBuf;

use clap::Parser;
use log::info;
use sqlx::AnyPool;

use library_batch::export::run_export;

/// Exports every row of the `Library` table to a delimited flat file.
#[derive(Parser)]
#[command(name = "export", version, about)]
struct Args {
    /// Path of the file to write, created or truncated on each run
    #[arg(long = "output-file")]
    output_file: PathBuf,

    /// Connection string of the relational source, e.g. sqlite://library.db
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    sqlx::any::install_default_drivers();
    let pool = AnyPool::connect(&args.database_url).await?;

    let execution = run_export(&pool, &args.output_file)?;

    info!(
        "Export to {} finished in {:?}",
        args.output_file.display(),
        execution.duration
    );

    Ok(())
}
