use clap::Parser;
use smatrend::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
