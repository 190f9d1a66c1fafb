//! metronome - slider controller for a Pure Data metronome patch

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use metronome::config;
use metronome::mapping::{Curve, StepValueMapper, STEP_RANGE};
use metronome::patch::{listen, FudiSink, PatchSink, TraceListener};
use metronome::session::{Command, Session};
use metronome::ui::{self, App};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config: config_path,
            connect,
            log_file,
        } => {
            // stderr would scribble over the UI
            if let Some(path) = &log_file {
                init_file_tracing(path)?;
            }

            let cfg = config::load_or_default(config_path.as_deref())?;
            let address = connect.or_else(|| cfg.patch.address.clone());
            let sink: Box<dyn PatchSink> = match address {
                Some(address) => connect_patch(&address)?,
                None => {
                    info!("no patch address, running dry");
                    Box::new(FudiSink::new(io::sink()))
                }
            };

            let mut session = Session::new(&cfg, sink);
            session.start()?;

            let mut app = App::new(session);
            ui::run(&mut app)?;

            // leave the patch silent
            app.session.set_paused(true)?;
        }

        Commands::Script {
            config: config_path,
            connect,
        } => {
            init_tracing();

            let cfg = config::load_or_default(config_path.as_deref())?;
            let address = connect.or_else(|| cfg.patch.address.clone());
            let sink: Box<dyn PatchSink> = match address {
                Some(address) => connect_patch(&address)?,
                None => Box::new(FudiSink::new(io::stdout())),
            };

            let mut session = Session::new(&cfg, sink);
            session.start()?;

            for (number, line) in io::stdin().lock().lines().enumerate() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let result = line
                    .parse::<Command>()
                    .map_err(anyhow::Error::from)
                    .and_then(|command| Ok(command.apply(&mut session)?));
                if let Err(e) = result {
                    warn!(line = number + 1, "{}", e);
                }
            }

            let readout = session.readout();
            info!(
                volume = %readout.volume,
                tempo = %readout.tempo,
                bpm = %readout.bpm,
                "script finished"
            );
        }

        Commands::Map {
            min,
            max,
            linear,
            step,
            value,
        } => {
            let curve = if linear { Curve::Linear } else { Curve::Logarithmic };
            let mut mapper = StepValueMapper::new(min, max, min, curve);

            println!(
                "{:?} {} .. {} over {} steps",
                mapper.curve(),
                mapper.minimum(),
                mapper.maximum(),
                STEP_RANGE
            );
            if let Some(step) = step {
                println!("step {} -> {}", step, mapper.value_from_step(step));
            } else if let Some(value) = value {
                mapper.set_value(value);
                println!("{} -> step {}", value, mapper.step_from_value());
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    for (name, settings) in [("Volume", cfg.volume()), ("Tempo", cfg.tempo())] {
                        let mapper = settings.mapper();
                        println!(
                            "  {}: {} .. {} ({:?}), starts at {}",
                            name,
                            mapper.minimum(),
                            mapper.maximum(),
                            mapper.curve(),
                            mapper.value()
                        );
                        println!(
                            "    silent at zero: {}, clamp typed values: {}",
                            settings.policy.silent_at_zero, settings.policy.clamp_on_set
                        );
                    }
                    println!("  Accent: {}", cfg.accent);
                    println!("  Sub-accent: {}", cfg.sub_accent);
                    println!("  Presets (ms): {:?}", cfg.presets);
                    println!("  Receive prefix: {:?}", cfg.patch.prefix);
                    match &cfg.patch.address {
                        Some(address) => println!("  Patch address: {}", address),
                        None => println!("  Patch address: none (dry run)"),
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../metronome.example.json");

            let path = "metronome.json";
            if std::path::Path::new(path).exists() {
                println!("metronome.json already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created metronome.json with example configuration.");
            }
        }
    }

    Ok(())
}

/// Log to stderr, filtered by RUST_LOG (default: info)
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// Log to `path` instead of the terminal
fn init_file_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Connect to the patch and log whatever it sends back
fn connect_patch(address: &str) -> Result<Box<dyn PatchSink>> {
    let sink = FudiSink::connect(address)
        .with_context(|| format!("connecting to patch at {}", address))?;
    let reader = sink
        .get_ref()
        .try_clone()
        .context("cloning patch connection")?;
    listen(reader, TraceListener).context("starting patch listener")?;
    Ok(Box::new(sink))
}
