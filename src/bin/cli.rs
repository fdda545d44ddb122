//! FieldKV CLI
//!
//! Command-line interface for a file-backed FieldKV store.

use std::ops::ControlFlow;

use clap::{Parser, Subcommand};
use fieldkv::{Config, Field, FieldStore, FileStore, MalformedPolicy, Record, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// FieldKV CLI
#[derive(Parser, Debug)]
#[command(name = "fieldkv-cli")]
#[command(about = "Store, read and query field records")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./fieldkv_data")]
    data_dir: String,

    /// Fail a scan on the first undecodable record instead of skipping it
    #[arg(long)]
    abort_on_malformed: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a record under a key
    Put {
        /// The key to set
        key: String,

        /// Fields as NAME=VALUE (split on the first '=')
        #[arg(required = true)]
        fields: Vec<Field>,
    },

    /// Print the record stored under a key
    Get {
        /// The key to get
        key: String,
    },

    /// List keys whose record has a field NAME equal to VALUE
    Find {
        name: String,
        value: String,
    },

    /// Print every record in key order
    Scan,

    /// Store three sample customers, read them back and query by name
    Demo,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fieldkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let policy = if args.abort_on_malformed {
        MalformedPolicy::Abort
    } else {
        MalformedPolicy::Skip
    };

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .malformed_policy(policy)
        .build();

    let db = FieldStore::open(config)?;
    tracing::debug!("Opened {}", db.store().table_path().display());

    match args.command {
        Commands::Put { key, fields } => {
            db.put(key.as_bytes(), &Record::from(fields))?;
            println!("OK");
        }
        Commands::Get { key } => {
            print_record(&db.get(key.as_bytes())?);
        }
        Commands::Find { name, value } => {
            for key in db.find_keys_by_field(name.as_bytes(), value.as_bytes())? {
                println!("{}", String::from_utf8_lossy(&key));
            }
        }
        Commands::Scan => {
            let stats = db.scan(|key, record| {
                println!("[{}]", String::from_utf8_lossy(key));
                print_record(record);
                ControlFlow::Continue(())
            })?;
            tracing::info!("Scanned {} records ({} skipped)", stats.scanned, stats.skipped);
        }
        Commands::Demo => demo(&db)?,
    }

    db.into_inner().close()
}

fn demo(db: &FieldStore<FileStore>) -> Result<()> {
    let customers = [
        (
            "k_1",
            Record::new()
                .with_field("name", "Customer#000000001")
                .with_field("address", "IVhzIApeRb")
                .with_field("phone", "25-989-741-2988"),
        ),
        (
            "k_2",
            Record::new()
                .with_field("name", "Customer#000000002")
                .with_field("address", "N3qjPOETGc")
                .with_field("phone", "12-345-678-9012"),
        ),
        // Separator-like bytes are safe: lengths are explicit
        (
            "k_3",
            Record::new()
                .with_field("name", "Customer=000000003")
                .with_field("address", "N3qj;POETGc")
                .with_field("phone", "12-345-678-9012"),
        ),
    ];

    for (key, record) in &customers {
        db.put(key.as_bytes(), record)?;
    }

    for (key, _) in &customers {
        println!("Deserialized fields for key {}:", key);
        print_record(&db.get(key.as_bytes())?);
        println!();
    }

    let (name, value) = ("name", "Customer#000000001");
    println!("Found keys for field {} = {}:", name, value);
    for key in db.find_keys_by_field(name.as_bytes(), value.as_bytes())? {
        println!("{}", String::from_utf8_lossy(&key));
    }

    Ok(())
}

fn print_record(record: &Record) {
    for field in record {
        println!(
            "{}: {}",
            String::from_utf8_lossy(&field.name),
            String::from_utf8_lossy(&field.value)
        );
    }
}
