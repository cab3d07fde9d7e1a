//! nvtext CLI
//!
//! One-shot record operations on a device image, plus an interactive
//! console speaking the same line protocol as the TCP server.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use nvtext::console::Session;
use nvtext::{FileDevice, RecordStore, Result};

/// nvtext CLI
#[derive(Parser, Debug)]
#[command(name = "nvtext-cli")]
#[command(about = "CLI for an nvtext record store image")]
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

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a record at a 1-based position
    Set {
        /// The position to write (1-based)
        position: usize,

        /// The record content
        text: String,
    },

    /// Read the record at a position
    Get {
        /// The position to read (1-based)
        position: usize,
    },

    /// Show all records with their addresses and lengths
    List,

    /// Show the record count
    Count,

    /// Reset the store to the empty sequence
    Init {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Interactive console on stdin/stdout
    Console,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let device = FileDevice::open_or_create(args.image.as_ref(), args.capacity)?;
    let mut store = RecordStore::open(device)?;
    store.set_max_records(args.max_records);

    match args.command {
        Commands::Set { position, text } => {
            store.write(position, text.as_bytes())?;
            store.sync()?;
        }
        Commands::Get { position } => {
            let content = store.read(position)?;
            println!("{}", String::from_utf8_lossy(&content));
        }
        Commands::List => {
            let entries = store.entries()?;
            println!("Number of strings: {}", entries.len());
            for entry in entries {
                println!(
                    "{:>3} @ {:<5} len {:<3} {}",
                    entry.position,
                    entry.address,
                    entry.content.len(),
                    String::from_utf8_lossy(&entry.content)
                );
            }
        }
        Commands::Count => {
            println!("{}", store.check()?);
        }
        Commands::Init { yes } => {
            if yes || confirm_on_terminal()? {
                store.init()?;
                store.sync()?;
                println!("Store initialized");
            } else {
                println!("Cancelled");
            }
        }
        Commands::Console => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Session::new(stdin.lock(), stdout.lock()).run(&mut store)?;
            store.sync()?;
        }
    }

    Ok(())
}

/// Ask y/n on the terminal; only a leading `y` confirms.
fn confirm_on_terminal() -> Result<bool> {
    print!("This erases all records. Are you sure? (y/n) ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_start().as_bytes().first() == Some(&b'y'))
}
