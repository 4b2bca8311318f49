// src/main.rs

use pagewatch::{cli, logging, run, RunSummary};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run_main().await {
        Ok(summary) if summary.all_succeeded() => {}
        Ok(_) => std::process::exit(2),
        Err(err) => {
            eprintln!("pagewatch error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunSummary> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
