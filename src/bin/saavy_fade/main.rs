//! saavy-fade - play a test tone through the fade filter
//!
//! Run with: cargo run --bin saavy-fade -- --fade-in-ms 500 --fade-out-ms 1500
//!
//! Keys: [I] fade in, [O] fade out, [Q] quit.

mod app;
mod ui;

use app::{Args, FadeApp};
use clap::Parser;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // stderr only; redirect it when running the TUI (2>fade.log)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    FadeApp::new(args).run()
}
