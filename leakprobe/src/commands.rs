use crate::CLAP_STYLING;
use clap::{ArgAction, arg};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("leakprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("leakprobe")
        .about(
            "Scans for the presence of publicly accessible files that commonly contain \
            sensitive information.",
        )
        .styles(CLAP_STYLING)
        .arg_required_else_help(true)
        .arg(
            arg!([URL])
                .help("The URL(s) of the website(s) to scan")
                .num_args(0..)
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-t --"target" <TARGET>)
                .required(false)
                .help("Target URL or host to scan. May be repeated.")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-H --"hosts-file" <PATH>)
                .required(false)
                .help("Path to a newline-delimited file of targets"),
        )
        .arg(
            arg!(-f --"files" <PATH>)
                .required(false)
                .help("List of files to scan (overrides default list)")
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-w --"wordlist" <PATH>)
                .required(false)
                .help("Path to a file of candidate paths, one per line (overrides default list)"),
        )
        .arg(
            arg!(-v --"verbose" "Enable verbose output (debug logging)")
                .required(false)
                .conflicts_with("quiet"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress banner, progress bar and informational logging")
                .required(false),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Output file to save results to"),
        )
        .arg(
            arg!(--"format" <FORMAT>)
                .required(false)
                .help("Report format for --output: text, json, csv, markdown")
                .value_parser(["text", "json", "csv", "markdown", "md"])
                .default_value("text")
                .requires("output"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Timeout for HTTP requests in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("5"),
        )
        .arg(
            arg!(-c --"concurrency" <NUM_WORKERS>)
                .required(false)
                .help("Maximum number of requests in flight")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"user-agent" <USER_AGENT>)
                .required(false)
                .help("Override the User-Agent header"),
        )
        .arg(
            arg!(-k --"insecure" "Accept invalid TLS certificates")
                .required(false),
        )
        .arg(
            arg!(--"no-verify-content" "Report every HTTP 200, without checking the body")
                .required(false),
        )
}
