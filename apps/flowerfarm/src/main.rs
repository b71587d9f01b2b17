//! # Flower Farm Entry Point
//!
//! ## Startup Sequence
//! 1. Parse command line
//! 2. Load configuration (defaults → TOML → environment)
//! 3. Initialize tracing (logging)
//! 4. Open the database and apply the schema
//! 5. Run the requested command and print its JSON result

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    flowerfarm_app::run().await
}
