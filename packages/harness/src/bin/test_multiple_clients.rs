#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Connects several independent test clients to the Proxima server.
//!
//! ```text
//! test_multiple_clients [COUNT] [--variant compact|ready] [--url URL]
//! ```

use clap::Parser;
use proxima_harness::{
    CancellationToken, DEFAULT_URL, FanOut, Variant, cli, config::DEFAULT_CLIENT_COUNT,
};

/// Run several Proxima test clients at once
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[allow(clippy::cast_possible_wrap)]
struct Args {
    /// Number of clients to connect
    #[arg(
        value_name = "COUNT",
        default_value_t = DEFAULT_CLIENT_COUNT as i64,
        allow_negative_numbers = true
    )]
    count: i64,

    /// Naming, handshake, and script display preset
    #[arg(long, value_enum, default_value_t = Variant::Compact)]
    variant: Variant,

    /// WebSocket endpoint of the Proxima server
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let Some(count) = cli::client_count(args.count) else {
        eprintln!("Error: Number of clients must be at least 1");
        std::process::exit(1);
    };

    let fanout = match FanOut::new(args.url.as_str(), count, args.variant) {
        Ok(fanout) => fanout,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    proxima_logging::init(Some("proxima_test_multiple_clients.log"))
        .expect("Failed to initialize FreeLog");

    let token = CancellationToken::new();
    cli::cancel_on_interrupt(token.clone());

    println!("WebSocket Multiple Client Test");
    println!("Connecting {count} client(s) to {}", args.url);
    println!("Press Ctrl+C to stop\n");

    let outcomes = fanout.run(token).await;

    let status = cli::report(&outcomes);
    println!("\nClients stopped");

    std::process::exit(status);
}
