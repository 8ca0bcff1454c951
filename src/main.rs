//! HyperMonet icon pack builder.
//!
//! Renders SVG icons into a Monet themed HyperOS icon pack and packages it
//! as a Magisk module.

use hypermonet_iconpack::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Progress is reported at info level unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
