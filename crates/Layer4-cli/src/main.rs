//! genro CLI - Main entry point
//!
//! 예제 Library를 게시한 뒤 등록 결과를 확인합니다.
//!
//! ```text
//! genro classes
//! genro routes [--json]
//! genro tabs
//! genro schemas
//! genro call /shelf count_books --args '{"shelf_code": "A1"}'
//! ```

mod library;

use anyhow::Context;
use clap::{Parser, Subcommand};
use genro_core::Publisher;
use genro_foundation::PublisherConfig;
use library::Library;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// genro - inspect what genro-api publishes
#[derive(Parser, Debug)]
#[command(name = "genro")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Load publisher settings from this file instead of the global/project layers
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List published classes with their base paths
    Classes,
    /// List REST routes in registration order
    Routes {
        /// Print route specs as JSON
        #[arg(long)]
        json: bool,
    },
    /// List UI tabs in display order
    Tabs,
    /// Print model JSON schemas
    Schemas,
    /// Invoke a published method
    Call {
        /// Class base path (e.g. /library)
        base_path: String,
        /// Method name
        method: String,
        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config = match &args.config {
        Some(path) => PublisherConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => PublisherConfig::load().context("failed to load publisher config")?,
    };

    let mut publisher = Publisher::new(config);
    let library = Library::with_sample_data()?;
    publisher.publish(Arc::new(library))?;
    publisher.publish_settings()?;

    match args.command {
        Command::Classes => print_classes(&publisher),
        Command::Routes { json } => print_routes(&publisher, json)?,
        Command::Tabs => print_tabs(&publisher),
        Command::Schemas => {
            println!("{}", serde_json::to_string_pretty(&publisher.schemas())?);
        }
        Command::Call {
            base_path,
            method,
            args,
        } => {
            let value: serde_json::Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let result = publisher.invoke(&base_path, &method, &value)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn print_classes(publisher: &Publisher) {
    let config = publisher.config();
    println!("\n{} v{} ({})\n", config.title, config.version, config.bind_address());
    println!("{:<20} {:<20} {:<8} {:<8} {:<10}", "Class", "Base path", "REST", "UI", "Registered");
    println!("{}", "-".repeat(70));

    for entry in publisher.registry().entries() {
        println!(
            "{:<20} {:<20} {:<8} {:<8} {:<10}",
            entry.class_name,
            entry.base_path,
            entry.rest_methods.len(),
            entry.ui_methods.len(),
            entry.registered_at.format("%H:%M:%S")
        );
    }
}

fn print_routes(publisher: &Publisher, json: bool) -> anyhow::Result<()> {
    let routes = publisher.rest_routes();

    if json {
        println!("{}", serde_json::to_string_pretty(&routes)?);
        return Ok(());
    }

    if routes.is_empty() {
        println!("REST is disabled.");
        return Ok(());
    }

    let mut tag = "";
    for route in &routes {
        if route.tag != tag {
            tag = &route.tag;
            println!("\n[{}]", tag);
        }
        println!("  {:<7} {:<40} {}", route.verb.as_str(), route.path, route.summary);
    }

    if let Some(docs) = publisher.config().docs_url() {
        println!("\nDocs: http://{}{}", publisher.config().bind_address(), docs);
    }
    Ok(())
}

fn print_tabs(publisher: &Publisher) {
    let tabs = publisher.ui_tabs();
    if tabs.is_empty() {
        println!("UI is disabled.");
        return;
    }

    for tab in tabs {
        let indent = "  ".repeat(tab.depth);
        println!("{}{} ({})", indent, tab.label, tab.base_path);
        for form in &tab.forms {
            let fields: Vec<String> = form
                .fields
                .iter()
                .map(|f| {
                    if f.required {
                        f.name.clone()
                    } else {
                        format!("[{}]", f.name)
                    }
                })
                .collect();
            println!("{}  - {}({})", indent, form.name, fields.join(", "));
        }
    }

    println!("\nAdmin: http://{}{}", publisher.config().bind_address(), publisher.config().admin_path);
}
