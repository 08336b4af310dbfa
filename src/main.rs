use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use cryptoguard::artifacts;
use cryptoguard::panel;
use cryptoguard::server::DEFAULT_ARTIFACTS_DIR;

#[derive(Parser)]
#[command(
    name = "cryptoguard",
    about = "Transaction forensics dashboard over a pre-trained illicit-activity classifier."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard web service
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,

        /// Directory holding the training-export artifacts
        #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
        artifacts_dir: PathBuf,
    },

    /// Score one simulated transaction from the terminal
    Scan {
        /// Directory holding the training-export artifacts
        #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
        artifacts_dir: PathBuf,

        /// Simulate the massive-attack scenario
        #[arg(long)]
        attack: bool,

        /// Path to a JSON object of slider values keyed by top-feature name.
        /// Defaults to the mode's background value for every top feature.
        #[arg(long)]
        values: Option<PathBuf>,

        /// Output format: json or summary
        #[arg(long, default_value = "summary")]
        format: String,
    },
}

fn cmd_serve(bind: String, artifacts_dir: PathBuf) -> Result<()> {
    use cryptoguard::server::{run_server, ServerConfig};

    let bind_addr = bind
        .parse()
        .wrap_err_with(|| format!("Invalid bind address: {}", bind))?;

    let config = ServerConfig {
        bind_addr,
        artifacts_dir,
    };

    eprintln!("Starting CryptoGuard dashboard...");
    eprintln!("Artifacts dir: {}", config.artifacts_dir.display());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_server(config))?;

    Ok(())
}

fn cmd_scan(
    artifacts_dir: PathBuf,
    attack: bool,
    values_path: Option<PathBuf>,
    format: String,
) -> Result<i32> {
    let bundle = artifacts::load(&artifacts_dir).map_err(|e| eyre!(e))?;

    // Slider values from file, or the mode's background for every top feature
    let slider_values: HashMap<String, f64> = if let Some(path) = values_path {
        let content = fs::read_to_string(&path)?;
        let values: HashMap<String, f64> = serde_json::from_str(&content)?;
        panel::validate_slider_values(&values)?;
        values
    } else {
        let background = panel::background_value(attack);
        bundle
            .top_features
            .iter()
            .map(|name| (name.clone(), background))
            .collect()
    };

    let verdict = cryptoguard::run_scan(&bundle, attack, &slider_values)?;

    match format.as_str() {
        "json" => {
            let result = serde_json::json!({
                "success": true,
                "verdict": verdict,
                "model_hash": bundle.model_hash,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            println!("Transaction Scan Results");
            println!("========================");
            println!(
                "Mode:        {}",
                if attack { "MASSIVE ATTACK" } else { "normal" }
            );
            println!();
            println!("Verdict:     {}", verdict.headline);
            println!("Probability: {}", verdict.probability_display);
            println!();
            println!("Model Hash: {}", bundle.model_hash);
        }
    }

    if verdict.label.is_illicit() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cryptoguard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            bind,
            artifacts_dir,
        } => cmd_serve(bind, artifacts_dir),
        Commands::Scan {
            artifacts_dir,
            attack,
            values,
            format,
        } => match cmd_scan(artifacts_dir, attack, values, format) {
            Ok(code) => {
                if code != 0 {
                    std::process::exit(code);
                }
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
