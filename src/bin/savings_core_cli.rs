use std::{env, process};

use savings_core::{cli::run_cli, init};

fn main() {
    if env::args().skip(1).any(|arg| arg == "--version" || arg == "-V") {
        println!("savings_core_cli {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init();
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
