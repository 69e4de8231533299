use clap::Parser;
use rc0_hook::{cli_error_status, init_logging, run, CliInput};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliInput::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let status = cli_error_status(&err);
            if status == 0 {
                let _ = err.print();
            } else {
                init_logging(false);
                tracing::error!("{}", err);
            }
            return ExitCode::from(status);
        }
    };
    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
