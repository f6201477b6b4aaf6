use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipe_costing::app_config::{AppConfig, LogFormat};
use recipe_costing::calculator::{evaluate, format_result};
use recipe_costing::catalog::PurchaseCatalog;
use recipe_costing::error_tracking::{AppError, ErrorCode, ErrorTracker};
use recipe_costing::recipe_form::RecipeForm;
use recipe_costing::recipe_model::{Recipe, PLACEHOLDER};

#[derive(Parser)]
#[command(name = "recipe-costing", version, about = "Recipe ratio and cost calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an arithmetic expression
    Calc {
        expression: String,
    },
    /// Print the ingredient table and costs of a recipe file
    Cost {
        /// Recipe document in JSON
        recipe: PathBuf,
        /// Purchase catalog (JSON array) used by --attach
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Attach a catalog purchase to a row, as ROW=PURCHASE_ID
        #[arg(long = "attach", value_name = "ROW=PURCHASE_ID")]
        attachments: Vec<String>,
        /// Commit a weight edit, as ROW=WEIGHT; applied in order
        #[arg(long = "edit", value_name = "ROW=WEIGHT")]
        edits: Vec<String>,
        /// Hold ratios while editing weights
        #[arg(long)]
        lock: bool,
        /// Override the portion count
        #[arg(long)]
        portion: Option<String>,
        /// Print the edited recipe and cost summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the newest tracked errors
    Errors {
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Command {
    fn context(&self) -> &'static str {
        match self {
            Command::Calc { .. } => "calc",
            Command::Cost { .. } => "cost",
            Command::Errors { .. } => "errors",
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    let cli = Cli::parse();
    let tracker = ErrorTracker::from_config(&config);
    tracker.install_panic_hook();
    info!(environment = config.environment.as_str(), "Starting recipe-costing");

    let context = cli.command.context();
    run(cli.command, &tracker).map_err(|err| anyhow::Error::new(tracker.handle_error(err, context)))
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn run(command: Command, tracker: &ErrorTracker) -> Result<()> {
    match command {
        Command::Calc { expression } => {
            let value = evaluate(&expression)?;
            println!("{}", format_result(value));
        }
        Command::Cost {
            recipe,
            catalog,
            attachments,
            edits,
            lock,
            portion,
            json,
        } => {
            let data = fs::read_to_string(&recipe)
                .with_context(|| format!("Failed to read recipe {}", recipe.display()))?;
            let recipe: Recipe = serde_json::from_str(&data).context("Failed to parse recipe")?;
            let mut form = RecipeForm::from_recipe(recipe);
            form.set_locked(lock);

            if !attachments.is_empty() {
                let path = catalog.ok_or_else(|| anyhow!("--attach requires --catalog"))?;
                let catalog = PurchaseCatalog::load_json(&path)?;
                for attachment in &attachments {
                    let (row, id) = parse_assignment(attachment)?;
                    let purchase = catalog.require(id)?.clone();
                    form.attach_purchase(row, purchase)?;
                }
            }

            for edit in &edits {
                let (row, weight) = parse_assignment(edit)?;
                let outcome = form.commit_weight(row, weight)?;
                if !outcome.is_applied() {
                    let err = AppError::new(
                        format!("Weight edit '{}' was not applied: {:?}", edit, outcome),
                        ErrorCode::ValidationError,
                    );
                    tracker.track(&err, "cost");
                }
            }

            if let Some(portion) = portion {
                form.set_portion(&portion);
            }

            if json {
                let summary = form.cost_summary();
                let output = serde_json::json!({
                    "recipe": form.recipe(),
                    "summary": summary,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_table(&form);
            }
        }
        Command::Errors { limit } => {
            let entries = tracker.recent(limit)?;
            if entries.is_empty() {
                println!("No tracked errors");
            }
            for entry in entries {
                println!(
                    "{} [{}] {} ({}): {}",
                    entry.timestamp.to_rfc3339(),
                    entry.code,
                    entry.status_code,
                    entry.context,
                    entry.message
                );
            }
        }
    }
    Ok(())
}

/// Split `ROW=VALUE`
fn parse_assignment(text: &str) -> Result<(usize, &str)> {
    let (row, value) = text
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected ROW=VALUE, got '{}'", text))?;
    let row = row
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid row number in '{}'", text))?;
    Ok((row, value.trim()))
}

fn print_table(form: &RecipeForm) {
    let recipe = form.recipe();
    let ratios = form.ratio_labels();
    let summary = form.cost_summary();
    let costs = summary.line_cost_labels();

    println!("{}", recipe.recipe_name);
    println!("{:<4}{:<20}{:>10}{:>8}{:>10}", "#", "item", "weight", "ratio", "cost");
    for (index, item) in recipe.recipe_items.iter().enumerate() {
        let weight = match item.weight_value() {
            Some(_) => format!("{}{}", item.original_weight, item.original_weight_unit.display_name()),
            None => PLACEHOLDER.to_string(),
        };
        println!(
            "{:<4}{:<20}{:>10}{:>8}{:>10}",
            index, item.name, weight, ratios[index], costs[index]
        );
    }
    println!("Total cost: {}", summary.total_label());
    println!("Cost per portion: {}", summary.per_portion_label());
}
