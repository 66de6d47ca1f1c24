#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Connects a single test client to the Proxima server.
//!
//! ```text
//! test_client [USERNAME] [--url URL]
//! ```

use clap::Parser;
use proxima_harness::{
    CancellationToken, Client, DEFAULT_URL, cli, config::DEFAULT_USERNAME,
};

/// Register with the Proxima server and print the scripts it sends
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display name to register with
    #[arg(value_name = "USERNAME", default_value = DEFAULT_USERNAME)]
    username: String,

    /// WebSocket endpoint of the Proxima server
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    proxima_logging::init(Some("proxima_test_client.log")).expect("Failed to initialize FreeLog");

    let token = CancellationToken::new();
    cli::cancel_on_interrupt(token.clone());

    println!("Connecting to {} as {}", args.url, args.username);
    println!("(Press Ctrl+C to stop)\n");

    let outcome = Client::new(args.url, args.username)
        .with_cancellation_token(token)
        .run()
        .await;

    let status = cli::report(std::slice::from_ref(&outcome));
    println!("\nClient stopped");

    std::process::exit(status);
}
