use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "predmarket",
    about = "Prediction market creation host (JSON lines over stdio)"
)]
struct Cli {
    /// Directory holding app_config.json and markets.sqlite
    #[arg(long, env = "PREDMARKET_DATA_DIR", default_value = "predmarket-data")]
    data_dir: PathBuf,
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    predmarket_lib::run(cli.data_dir)
}
