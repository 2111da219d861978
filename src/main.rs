use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wasm_memscan::cli::{execute, parse_command, Outcome};
use wasm_memscan::config::{validate_config, Config, ConfigLoader};
use wasm_memscan::memory::{share, VecMemory};
use wasm_memscan::Inspector;

#[derive(Parser)]
#[command(name = "wasm-memscan")]
#[command(about = "Scan, watch and edit WebAssembly linear memory")]
struct Args {
    #[arg(short, long, default_value = "memscan.toml")]
    config: PathBuf,

    /// Raw linear memory dump to load instead of an empty memory
    #[arg(short, long)]
    dump: Option<PathBuf>,

    /// Initial page count of the empty memory
    #[arg(short, long)]
    pages: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match ConfigLoader::new(&args.config).load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    };
    validate_config(&config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(false)
        .init();

    info!("Starting wasm-memscan v{}", env!("CARGO_PKG_VERSION"));

    let memory = match &args.dump {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading memory dump {}", path.display()))?;
            info!("Loaded {} byte dump from {}", bytes.len(), path.display());
            VecMemory::from_bytes(bytes).with_max_pages(config.memory.max_pages)
        }
        None => VecMemory::new(
            args.pages.unwrap_or(config.memory.initial_pages),
            config.memory.max_pages,
        )?,
    };

    let mut inspector = Inspector::new(&config)?;
    inspector.attach(share(memory))?;
    println!("{}", inspector.status());
    println!("Type 'help' for commands.");

    // Ctrl-C interrupts a running command, or leaves the shell at the prompt
    let busy = Arc::new(AtomicBool::new(false));
    let (quit_tx, mut quit_rx) = mpsc::unbounded_channel();
    {
        let busy = Arc::clone(&busy);
        let cancel = inspector.cancel_handle();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if busy.load(Ordering::SeqCst) {
                    warn!("Interrupting the running command");
                    cancel.cancel();
                } else if quit_tx.send(()).is_err() {
                    break;
                }
            }
        });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = quit_rx.recv() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        busy.store(true, Ordering::SeqCst);
        inspector.interaction_started();
        let outcome = tokio::task::block_in_place(|| execute(&mut inspector, command));
        inspector.interaction_ended();
        busy.store(false, Ordering::SeqCst);

        match outcome {
            Ok(Outcome::Print(output)) => {
                for line in output {
                    println!("{}", line);
                }
            }
            Ok(Outcome::Quit) => break,
            Err(e) => error!("{}", e),
        }
    }

    info!("Shutting down wasm-memscan");
    Ok(())
}
