//! spec-registry: operator CLI for the profile & context registry.
//!
//! # Architecture Overview
//!
//! ```text
//!   spec.conf ──▶ config::loader ──▶ config::validation ──▶ ConfigDocument
//!                                                              │
//!                                                              ▼
//!                         ┌────────────── SharedResolver (ArcSwap) ─────────────┐
//!                         │   Resolver = ProfileRegistry + ContextRegistry      │
//!                         └─────────────────────────────────────────────────────┘
//!                              ▲                     │
//!        config::watcher ──────┘ (reload)            ▼
//!        lifecycle::signals (SIGHUP)        RoutingTarget / listings
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use spec_registry::config::loader::{load_config, resolve_config_path, LoadOptions};
use spec_registry::config::watcher::ConfigWatcher;
use spec_registry::lifecycle::signals::{shutdown_signal, ReloadSignal};
use spec_registry::observability::logging::{init_logging, LogFormat};
use spec_registry::registry::listing::{self, ListFormat, NameKind};
use spec_registry::{Resolver, SharedResolver};

#[derive(Parser)]
#[command(name = "spec-registry")]
#[command(about = "Resolve spectro service profiles and contexts", long_about = None)]
struct Cli {
    /// Config file (default: search spec.conf locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Host name whose profile becomes the default
    #[arg(long, global = true, env = "SPEC_REGISTRY_HOST")]
    host: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration
    Check,
    /// Resolve a routing target
    Resolve {
        #[arg(short, long)]
        profile: Option<String>,
        #[arg(short = 'x', long)]
        context: Option<String>,
        #[arg(short = 'k', long)]
        catalog: Option<String>,
    },
    /// List profiles, or show one profile's public view
    Profiles {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// List contexts, or show one context
    Contexts {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// List the catalogs of a context
    Catalogs {
        #[arg(short = 'x', long)]
        context: Option<String>,
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// Check whether a profile or context name exists
    Validate {
        #[arg(value_enum)]
        what: NameKind,
        value: String,
    },
    /// Keep the configuration loaded and reload it on change or SIGHUP
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let path = resolve_config_path(cli.config.as_deref())?;
    let options = LoadOptions { host: cli.host };

    // Refuse to do anything with a broken document.
    let document = load_config(&path, &options)?;
    tracing::info!(
        path = ?path,
        port = document.port,
        profiles = document.profiles.len(),
        contexts = document.contexts.len(),
        "Configuration loaded"
    );
    let shared = SharedResolver::from_document(document);

    match cli.command {
        Commands::Check => {
            let resolver = shared.snapshot();
            let doc = resolver.document();
            println!(
                "OK: port {}, {} profiles, {} contexts",
                doc.port,
                doc.profiles.len(),
                doc.contexts.len()
            );
        }
        Commands::Resolve {
            profile,
            context,
            catalog,
        } => {
            match shared.resolve(profile.as_deref(), context.as_deref(), catalog.as_deref()) {
                Ok(target) => println!("{}", serde_json::to_string_pretty(&target)?),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Commands::Profiles { name, format } => {
            let resolver = shared.snapshot();
            match name.as_deref().filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("none")) {
                None => print_listing(listing::list_profiles(resolver.profiles(), format)?),
                Some(n) => {
                    let view = listing::public_profile(resolver.profiles(), Some(n))?;
                    println!("{}", serde_json::to_string(&view)?);
                }
            }
        }
        Commands::Contexts { name, format } => {
            let resolver = shared.snapshot();
            match name.as_deref().filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("none")) {
                None => print_listing(listing::list_contexts(resolver.contexts(), format)?),
                Some(n) => println!("{}", listing::describe_context(resolver.contexts(), Some(n))?),
            }
        }
        Commands::Catalogs { context, format } => {
            let resolver = shared.snapshot();
            let out = listing::list_catalogs(resolver.contexts(), context.as_deref(), format)?;
            print_listing(out);
        }
        Commands::Validate { what, value } => {
            let resolver = shared.snapshot();
            if resolver.validate(what, &value) {
                println!("OK");
            } else {
                println!("Error");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Watch => watch(&shared, &path, &options).await?,
    }

    Ok(ExitCode::SUCCESS)
}

fn print_listing(out: String) {
    if out.ends_with('\n') {
        print!("{}", out);
    } else {
        println!("{}", out);
    }
}

async fn watch(
    shared: &SharedResolver,
    path: &std::path::Path,
    options: &LoadOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let (watcher, mut updates) = ConfigWatcher::new(path, options.clone());
    // Dropping the handle stops notifications.
    let _handle = watcher.run()?;
    let mut hangup = ReloadSignal::new()?;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    log_default_target(&shared.snapshot());

    loop {
        tokio::select! {
            Some(document) = updates.recv() => {
                shared.replace(document);
                log_default_target(&shared.snapshot());
            }
            Some(()) = hangup.recv() => {
                tracing::info!("SIGHUP received, reloading configuration");
                if shared.reload_from_path(path, options).is_ok() {
                    log_default_target(&shared.snapshot());
                }
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

fn log_default_target(resolver: &Resolver) {
    match resolver.resolve(None, None, None) {
        Ok(target) => tracing::info!(
            endpoint = %target.endpoint,
            catalog = %target.context.catalog,
            "Default routing target"
        ),
        Err(e) => tracing::warn!("Default routing target unavailable: {}", e),
    }
}
