use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use conveyor_logic::circuit_config::{load_json_config, CircuitFactory};
use conveyor_logic::console::{run_console, summarize, ConsoleConfig};
use conveyor_logic::systems::conveyor_station::{sorted_count, ConveyorStation, Product};

/// Conveyor Logic - drive a sorting station from a wired gate circuit
#[derive(Parser, Debug)]
#[command(name = "conveyor_logic")]
#[command(version)]
#[command(about = "Signal propagation and gate evaluation for a conveyor sorting station", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed products through the beam and print one line per tick
    Simulate {
        /// Level configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Product as a comma-separated property list, e.g. `square,red,izzo`.
        /// Defaults to the products listed in the configuration.
        #[arg(short, long, value_name = "PROPS")]
        product: Vec<String>,

        /// Empty ticks after each product
        #[arg(short, long, default_value_t = 1)]
        gap: usize,
    },
    /// Interactive terminal monitor
    Console {
        /// Level configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Console display options (JSON)
        #[arg(long, value_name = "FILE")]
        console_config: Option<PathBuf>,

        /// Write log events to stderr while the console is open
        #[arg(long)]
        log: bool,
    },
}

fn init_tracing() {
    let default_level = "conveyor_logic=info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            config,
            product,
            gap,
        } => {
            init_tracing();
            let level = load_json_config(&config)?;
            let mut station = CircuitFactory::new().create_from_config(&level)?;
            let from_level = product.is_empty();
            let products = if from_level {
                level.products.clone()
            } else {
                product
                    .iter()
                    .map(|p| Product::from_properties(&p.split(',').collect::<Vec<_>>()))
                    .collect()
            };
            simulate(&mut station, products, gap, from_level);
        }
        Command::Console {
            config,
            console_config,
            log,
        } => {
            if log {
                init_tracing();
            }
            let station = CircuitFactory::new().create_from_json(&config)?;
            let console_config = match console_config {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => ConsoleConfig::default(),
            };
            run_console(station, console_config)?;
        }
    }

    Ok(())
}

/// `score` prints how many products ended up where the level expects.
fn simulate(station: &mut ConveyorStation, mut products: Vec<Product>, gap: usize, score: bool) {
    println!("{} - {}", station.name(), station.description());
    if let Some(sensor) = station.sensor() {
        println!("sensor channels: {}", sensor.channels().join(", "));
    }

    for product in products.iter_mut() {
        print_tick(station, Some(product));
        for _ in 0..gap {
            print_tick(station, None);
        }
    }

    if score {
        println!("sorted correctly: {}/{}", sorted_count(&products), products.len());
    }
}

fn print_tick(station: &mut ConveyorStation, product: Option<&mut Product>) {
    let label = product
        .as_deref()
        .map(|p| p.properties().join(","))
        .unwrap_or_default();
    let outcome = station.tick(product);
    let channels: String = station
        .sensor()
        .map(|s| s.values(station.circuit()).iter().map(|v| v.to_char()).collect())
        .unwrap_or_default();
    println!("{}  sensor [{}]  {}", summarize(&outcome), channels, label);
}
