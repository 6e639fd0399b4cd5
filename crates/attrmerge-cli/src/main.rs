mod cli;
mod compare_cmd;
mod merge_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Merge {
            ref file,
            ref options,
            ref format,
            ref output,
        } => merge_cmd::run(file, options, format, output.as_deref()),
        cli::Commands::Compare {
            ref file_a,
            ref file_b,
            ref options,
        } => compare_cmd::run(file_a, file_b, options),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
