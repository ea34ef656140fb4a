use colored::Colorize;
use leakprobe::{ScanArgs, command_argument_builder, handle_scan, init_logging};
use leakprobe_core::print_banner;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = command_argument_builder().get_matches();
    let args = ScanArgs::from_matches(&matches);

    init_logging(args.verbose, args.quiet);

    if !args.quiet {
        print_banner();
    }

    match handle_scan(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
