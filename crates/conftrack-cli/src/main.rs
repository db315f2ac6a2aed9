use conftrack_cli::{init_tracing, parse_args, run};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let config = parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    init_tracing();

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
