//! Geo Shift Spy - command-line entry point

use geoshift::cli::{CliApp, exit_codes};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        // Only warn if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let code = match CliApp::new().await {
        Ok(app) => app.run().await,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::for_error(&e)
        }
    };

    std::process::exit(code);
}
