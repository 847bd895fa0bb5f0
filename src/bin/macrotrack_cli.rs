// ABOUTME: Command-line front end exercising the reconciliation service end to end
// ABOUTME: Lists, shows, creates, and deletes plans; works offline via the mirror
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrotrack

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use macrotrack_client::http_client::initialize_shared_client;
use macrotrack_client::models::{NewMealPlan, NutritionTargets};
use macrotrack_client::{ClientConfig, LocalCache, MealService, ReconciliationService};

#[derive(Parser)]
#[command(name = "macrotrack-cli", about = "Macrotrack meal-plan client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List meal plans, falling back to the local mirror when offline
    List {
        /// Only plans with this active state
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show one plan by id (server id or local-...)
    Show {
        /// Plan identifier
        id: String,
    },
    /// Create a plan; degrades to a local-only record when offline
    Create {
        /// Plan name
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Create the plan as inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a plan from both stores
    Delete {
        /// Plan identifier
        id: String,
    },
    /// List the selectable meal catalog
    Meals,
    /// Stash nutrition targets for the plan form, or show the stashed ones
    Targets {
        /// Daily kilocalories
        #[arg(long)]
        calories: Option<f64>,
        /// Daily protein grams
        #[arg(long)]
        protein: Option<f64>,
        /// Daily carbohydrate grams
        #[arg(long)]
        carbs: Option<f64>,
        /// Daily fat grams
        #[arg(long)]
        fat: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    initialize_shared_client(&config);

    let cli = Cli::parse();
    match cli.command {
        Command::List { active } => {
            let service = ReconciliationService::new(&config)?;
            let listing = service.get_all(active).await;
            if listing.from_local_storage {
                eprintln!(
                    "backend unreachable, showing local mirror ({})",
                    listing.error.unwrap_or_default()
                );
            }
            println!("{}", serde_json::to_string_pretty(&listing.meal_plans)?);
        }
        Command::Show { id } => {
            let service = ReconciliationService::new(&config)?;
            let plan = service.get_by_id(&id, true).await?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Create {
            name,
            description,
            inactive,
        } => {
            let service = ReconciliationService::new(&config)?;
            let plan = service
                .create(NewMealPlan {
                    plan_name: name,
                    description,
                    is_active: Some(!inactive),
                    ..NewMealPlan::default()
                })
                .await?;
            if plan.local_only {
                eprintln!("backend unreachable, plan saved locally as {}", plan.id);
            }
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Delete { id } => {
            let service = ReconciliationService::new(&config)?;
            let deleted = service.delete(&id).await?;
            println!("deleted: {deleted}");
        }
        Command::Meals => {
            let service = MealService::new(&config)?;
            let listing = service.get_all().await;
            if listing.from_local_storage {
                eprintln!("backend unreachable, showing local mirror");
            }
            println!("{}", serde_json::to_string_pretty(&listing.meals)?);
        }
        Command::Targets {
            calories,
            protein,
            carbs,
            fat,
        } => {
            let cache = LocalCache::new(config.data_dir.clone())?;
            match (calories, protein, carbs, fat) {
                (Some(calories), Some(protein), Some(carbs), Some(fat)) => {
                    cache.store_targets(&NutritionTargets {
                        calories,
                        protein_g: protein,
                        carbs_g: carbs,
                        fat_g: fat,
                    })?;
                    println!("targets stashed for the plan form");
                }
                _ => match cache.take_targets() {
                    Some(targets) => {
                        println!("{}", serde_json::to_string_pretty(&targets)?);
                    }
                    None => println!("no stashed targets"),
                },
            }
        }
    }

    Ok(())
}
