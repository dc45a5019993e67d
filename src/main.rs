//! chron - binary entry point

use chronicle::cli;
use chronicle::ui::output;

fn main() {
    if let Err(e) = cli::run() {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }
}
