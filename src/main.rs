//! POLYKV - Interactive Shell
//! Line-oriented front end over the service facade.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use polykv::config::Config;
use polykv::engine::service::RegistryService;
use polykv::reply::{self, Reply};

#[derive(Parser, Debug)]
#[command(name = "polykv")]
#[command(about = "Multi-database in-memory key-value store")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of databases (overrides the configuration file)
    #[arg(short, long)]
    databases: Option<u16>,
}

fn load_config(args: &Args) -> polykv::error::Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(match args.databases {
        Some(count) => config.with_number_of_databases(count),
        None => config,
    })
}

fn parse_db(raw: &str) -> Option<u16> {
    raw.parse().ok()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Failed to load configuration: {}", err);
            std::process::exit(1);
        }
    };

    let service = RegistryService::open(&config);

    println!();
    println!("  POLYKV - {} databases", service.manager().count());
    println!();
    println!("  Commands:");
    println!("    set <db> <key> <value>  - Store a string value");
    println!("    get <db> <key>          - Retrieve a value");
    println!("    del <db> <key>          - Delete a key");
    println!("    info                    - Show database statistics");
    println!("    exit                    - Quit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("polykv> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(err) => {
                log::error!("Failed to read input: {}", err);
                break;
            }
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let command = parts[0].to_lowercase();
        let db = parts.get(1).and_then(|raw| parse_db(raw));

        let outcome: Option<Reply> = match (command.as_str(), db) {
            ("set" | "put", Some(db)) if parts.len() >= 4 => {
                Some(reply::set(&service, db, parts[2], &parts[3..].join(" ")))
            }
            ("set" | "put", _) => {
                println!("  Usage: set <db> <key> <value>");
                None
            }
            ("get", Some(db)) if parts.len() == 3 => Some(reply::get(&service, db, parts[2])),
            ("get", _) => {
                println!("  Usage: get <db> <key>");
                None
            }
            ("del" | "delete", Some(db)) if parts.len() == 3 => {
                Some(reply::delete(&service, db, parts[2]))
            }
            ("del" | "delete", _) => {
                println!("  Usage: del <db> <key>");
                None
            }
            ("info" | "stats", _) => {
                let manager = service.manager();
                for index in 0..manager.count() {
                    let keys = manager.len(index).unwrap_or(0);
                    let state = match manager.is_initialized(index) {
                        Ok(true) => "",
                        _ => " (untouched)",
                    };
                    println!("  db {}: {} keys{}", index, keys, state);
                }
                println!("{}", manager.metrics().report());
                None
            }
            ("exit" | "quit" | "q", _) => {
                println!("  Shutting down POLYKV...");
                break;
            }
            _ => {
                println!("  Unknown command: '{}'. Type 'exit' to quit.", parts[0]);
                None
            }
        };

        if let Some(outcome) = outcome {
            println!("  {}", outcome);
        }
    }
}
