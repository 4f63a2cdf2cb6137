// src/main.rs

use cronwrap::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("cronwrap error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    let cfg = config::load_from_env()?;
    logging::init_logging(&cfg)?;
    run(args, cfg).await
}
