use std::process::ExitCode;

use clap::Parser;
use sms_send::cli::Cli;
use sms_send::report::Reporter;
use sms_send::telemetry::{self, LoggingConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(&LoggingConfig::from_verbosity(cli.verbose));

    let mut reporter = Reporter::stdio(cli.raw);
    ExitCode::from(sms_send::run(&cli, None, &mut reporter).await)
}
