//! nvtext Server Binary
//!
//! Serves the line protocol over TCP against a file-backed device image.

use std::sync::Arc;

use clap::Parser;
use parking_lot::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use nvtext::network::Server;
use nvtext::{Config, FileDevice, RecordStore};

/// nvtext Server
#[derive(Parser, Debug)]
#[command(name = "nvtext-server")]
#[command(about = "TCP line-protocol server for an nvtext record store")]
#[command(version)]
struct Args {
    /// Device image path
    #[arg(short, long, default_value = "./nvtext.img")]
    image: String,

    /// Device capacity in bytes when creating a new image
    #[arg(short, long, default_value = "1024")]
    capacity: usize,

    /// Bound on the number of records (unlimited if omitted)
    #[arg(long)]
    max_records: Option<usize>,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(long, default_value = "64")]
    max_connections: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nvtext=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("nvtext server v{}", nvtext::VERSION);
    tracing::info!("Device image: {}", args.image);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .image_path(&args.image)
        .capacity(args.capacity)
        .max_records(args.max_records)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .build();

    let device = match FileDevice::open_or_create(&config.image_path, config.capacity) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Failed to open device image: {}", e);
            std::process::exit(1);
        }
    };

    // Bring-up: validates the sequence, auto-initializes on corruption
    let mut store = match RecordStore::open(device) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    };
    store.set_max_records(config.max_records);

    let store = Arc::new(Mutex::new(store));
    let server = Server::new(config, store);

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
