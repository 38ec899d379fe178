use clap::{Parser, Subcommand};
use lab::advisory::LOADING_MESSAGE;
use lab::command::HELP;
use lab::view::render;
use lab::{
    execute, Catalog, Command, Flow, LabConfig, ProjectStore, ProviderKind, Session, Tutor,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "mecamaster")]
#[command(about = "Guided mechatronics design lab with a language-model tutor")]
struct Cli {
    /// Configuration file (defaults to ./mecamaster.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Work on a project interactively
    Session {
        /// Override the provider from the configuration file
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,
    },
    /// List the component catalog
    Catalog,
    /// Check that the tutor's model provider is reachable
    Health {
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = LabConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Session { provider: None }) {
        Commands::Session { provider } => {
            let config = apply_override(config, provider);
            run_session(&config).await?;
        }
        Commands::Catalog => {
            list_catalog(&Catalog::standard());
        }
        Commands::Health { provider } => {
            let config = apply_override(config, provider);
            health_check(&config).await?;
        }
    }

    Ok(())
}

fn apply_override(config: LabConfig, provider: Option<ProviderKind>) -> LabConfig {
    match provider {
        Some(provider) => config.with_provider(provider),
        None => config,
    }
}

async fn run_session(config: &LabConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = config.build_provider()?;
    let tutor = Tutor::new(provider, config.tutor_models());
    info!(
        "Tutor ready ({} / {})",
        tutor.provider_name(),
        tutor.models().reasoning
    );

    let store = ProjectStore::new(Arc::new(Catalog::standard()));
    let mut session = Session::new(store, Arc::new(tutor));

    println!("MecaMaster Lab - Plataforma Educativa de Mecatrónica");
    println!("Type 'help' for commands, 'quit' or 'exit' to leave.\n");
    println!("{}", render(session.store()));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Help {
            println!("{}", HELP);
            continue;
        }

        if matches!(
            command,
            Command::Ask(_) | Command::Quick(_) | Command::Analyze(_) | Command::GenerateCode
        ) {
            println!("{}", LOADING_MESSAGE);
        }

        match execute(&mut session, command).await {
            Ok(Flow::Quit) => {
                println!("¡Hasta luego!");
                break;
            }
            Ok(Flow::ReadCode) => {
                println!("Escribe el código; termina con una línea que contenga solo '.'");
                let mut code = Vec::new();
                for line in lines.by_ref() {
                    let line = line?;
                    if line.trim() == "." {
                        break;
                    }
                    code.push(line);
                }
                session.store_mut().set_arduino_code(code.join("\n"));
            }
            Ok(Flow::Continue) => {}
            Err(e) => {
                println!("{}", e);
                continue;
            }
        }

        println!("{}", render(session.store()));
    }

    Ok(())
}

fn list_catalog(catalog: &Catalog) {
    println!("Available components:");
    for component in catalog.iter() {
        println!(
            "  - {} {} ({}) ${:.2}",
            component.id, component.name, component.category, component.cost
        );
        for (label, value) in &component.specifications {
            println!("      {}: {}", label, value);
        }
    }
}

async fn health_check(config: &LabConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Performing health check...");
    let provider = config.build_provider()?;

    match provider.health_check().await {
        Ok(()) => {
            println!(
                "✓ Health check passed. {} is reachable.",
                provider.provider_name()
            );
            info!("Health check successful");
        }
        Err(e) => {
            println!("✗ Health check failed: {}", e);
            error!("Health check failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
