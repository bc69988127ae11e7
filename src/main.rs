use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use spa_router::config::load_config;
use spa_router::history::{Action, LocationKey};
use spa_router::observability::init_logging;
use spa_router::routing::{RouteDef, RouteTable};
use spa_router::view::MemoryContainer;
use spa_router::{App, Controller, ControllerContext, ControllerType, Loaded, Location};

#[derive(Parser)]
#[command(name = "route-check")]
#[command(about = "Inspect and exercise a router configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the compiled routes in match order
    Routes,
    /// Show which route each path matches
    Match {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Navigate through the paths with placeholder controllers
    Simulate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
struct MatchReport {
    path: String,
    route: Option<String>,
    controller: Option<String>,
    params: std::collections::BTreeMap<String, String>,
}

/// Renders the controller identifier and the matched path.
struct Placeholder {
    id: String,
}

impl Controller for Placeholder {
    fn render(&self, ctx: &ControllerContext) -> String {
        format!("<div data-controller=\"{}\">{}</div>", self.id, ctx.location().path())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    init_logging(&config.observability)?;

    tracing::debug!(config = %cli.config.display(), routes = config.routes.len(), "Configuration loaded");

    match cli.command {
        Commands::Routes => {
            let table = compile(&config.routes)?;
            let rows: Vec<_> = table
                .iter()
                .map(|route| {
                    json!({
                        "pattern": route.pattern().source(),
                        "controller": route.controller().id(),
                        "name": route.name(),
                    })
                })
                .collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (index, route) in table.iter().enumerate() {
                    println!(
                        "{:>3}  {:<30} {}",
                        index,
                        route.pattern().source(),
                        route.controller().id().unwrap_or("-")
                    );
                }
            }
        }
        Commands::Match { paths } => {
            let table = compile(&config.routes)?;
            let reports: Vec<MatchReport> = paths.iter().map(|path| report(&table, path)).collect();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for r in &reports {
                    match (&r.route, &r.controller) {
                        (Some(route), controller) => println!(
                            "{} → {} ({}) {:?}",
                            r.path,
                            route,
                            controller.as_deref().unwrap_or("-"),
                            r.params
                        ),
                        (None, _) => println!("{} → no route", r.path),
                    }
                }
            }
        }
        Commands::Simulate { paths } => {
            let app = App::builder()
                .config(config)
                .container_handle(Arc::new(MemoryContainer::new("#root")))
                .loader(|id: &str| {
                    let id = id.to_string();
                    Loaded::ready(ControllerType::new(id.clone(), move |_| Placeholder { id: id.clone() }))
                })
                .build()?;
            let mut events = app.subscribe();
            app.start(false).await?;

            for path in &paths {
                let result = app.navigate(path).await;
                let html = app.container().html();
                if cli.json {
                    let event = events.try_recv().ok();
                    println!(
                        "{}",
                        json!({
                            "path": path,
                            "ok": result.is_ok(),
                            "error": result.as_ref().err().map(ToString::to_string),
                            "html": html,
                            "event": event,
                        })
                    );
                } else {
                    match result {
                        Ok(_) => println!("{} → {}", path, html),
                        Err(e) => println!("{} → error: {}", path, e),
                    }
                }
            }
            app.stop();
        }
    }

    Ok(())
}

fn compile(routes: &[spa_router::config::RouteConfig]) -> Result<RouteTable, spa_router::AppError> {
    RouteTable::compile(routes.iter().cloned().map(RouteDef::from), true).map_err(spa_router::AppError::Validation)
}

/// Match the pathname of `path`; query and fragment do not take part.
fn report(table: &RouteTable, path: &str) -> MatchReport {
    let matched = Location::parse(path, Action::Push, LocationKey(0))
        .ok()
        .and_then(|location| table.match_path(&location.pathname).ok());
    match matched {
        Some(m) => MatchReport {
            path: path.to_string(),
            route: Some(m.route.pattern().source().to_string()),
            controller: m.route.controller().id().map(str::to_string),
            params: m.params.into_iter().collect(),
        },
        None => MatchReport {
            path: path.to_string(),
            route: None,
            controller: None,
            params: Default::default(),
        },
    }
}
