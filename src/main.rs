use colored::Colorize;
use std::io::{self, IsTerminal};
use std::process;

fn main() {
    if !io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = paque::cli::run() {
        eprintln!("{} - {}", "ERROR".red(), e);
        process::exit(1);
    }
}
