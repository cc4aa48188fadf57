//! Runs the terminal block generator image with X11 forwarding.

use qet_tb_tools::cli::{self, LauncherArgs};
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let exit_code = match cli::run_launcher(LauncherArgs::parse_args()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
