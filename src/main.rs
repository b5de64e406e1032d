mod cli;
mod lib;
mod load;

use load::error::Record;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli::args::build().get_matches();
    let mut errs = Record::new();
    cli::command::run(&matches, &mut errs);
    eprint!("{}", errs);
    if errs.is_fatal() {
        std::process::exit(1);
    }
}
