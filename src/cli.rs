use clap::Parser;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "trw", version = VERSION, about = "Test Run Results Watcher TUI")]
pub struct Cli {
    /// Base URL of the test results API
    #[arg(short, long, default_value = "http://localhost:3000/api")]
    pub base_url: String,

    /// Write debug logs to the state directory
    #[arg(short, long)]
    pub verbose: bool,
}
