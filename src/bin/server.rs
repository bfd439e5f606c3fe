//! reelgen server binary.
//! Run with: cargo run --bin reelgen-server

use std::process::ExitCode;

use reelgen::start_reelgen;

fn main() -> ExitCode {
    start_reelgen::run()
}
