//! Geodash CLI
//!
//! Command-line interface for Geodash operations:
//! - List indicators, countries, and places
//! - Recompute charts from the server cache
//! - Trigger and inspect refreshes
//! - Inspect a local pollution CSV

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geodash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dashboard data service for indicator maps and air-quality series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8050", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the indicator catalog
    Indicators,

    /// List countries from the current snapshot
    Countries,

    /// List pollution place names
    Places,

    /// Recompute the choropleth for an indicator and year range
    Choropleth {
        /// Indicator code (e.g., EN.ATM.CO2E.KT)
        indicator: String,
        /// First year (inclusive)
        #[arg(long, default_value = "2005")]
        start: i32,
        /// Last year (inclusive)
        #[arg(long, default_value = "2016")]
        end: i32,
    },

    /// Recompute the pollution lines for selected places
    Pollution {
        /// Place names (repeat for multiple)
        places: Vec<String>,
    },

    /// Trigger a snapshot refresh now
    Refresh,

    /// Show server health and refresh status
    Status,

    /// Inspect a local pollution CSV without a server
    Inspect {
        /// Path to the CSV file
        path: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Indicators => {
            let data = get_json(&client, &format!("{}/api/v1/indicators", cli.api_url)).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if let Some(indicators) = data["indicators"].as_array() {
                for ind in indicators {
                    println!(
                        "{:<18} {}",
                        ind["code"].as_str().unwrap_or(""),
                        ind["label"].as_str().unwrap_or("")
                    );
                }
            }
        }

        Commands::Countries => {
            let data = get_json(&client, &format!("{}/api/v1/countries", cli.api_url)).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if let Some(countries) = data["countries"].as_array() {
                for c in countries {
                    println!(
                        "{:<6} {}",
                        c["iso3c"].as_str().unwrap_or(""),
                        c["country"].as_str().unwrap_or("")
                    );
                }
                println!();
                println!(
                    "{} countries, fetched {}",
                    countries.len(),
                    data["fetched_at"].as_str().unwrap_or("unknown")
                );
            }
        }

        Commands::Places => {
            let data = get_json(&client, &format!("{}/api/v1/places", cli.api_url)).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if let Some(places) = data["places"].as_array() {
                for place in places {
                    println!("{}", place.as_str().unwrap_or(""));
                }
            }
        }

        Commands::Choropleth {
            indicator,
            start,
            end,
        } => {
            let body = serde_json::json!({
                "indicator": indicator,
                "start_year": start,
                "end_year": end,
            });

            let data = post_json(
                &client,
                &format!("{}/api/v1/charts/choropleth", cli.api_url),
                &body,
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!(
                    "{} ({}-{})",
                    data["label"].as_str().unwrap_or(""),
                    data["start_year"],
                    data["end_year"]
                );
                println!();
                if let Some(regions) = data["regions"].as_array() {
                    for region in regions {
                        println!(
                            "{:<6} {:<40} {:>14.2}",
                            region["iso3c"].as_str().unwrap_or(""),
                            region["country"].as_str().unwrap_or(""),
                            region["value"].as_f64().unwrap_or(f64::NAN)
                        );
                    }
                }
            }
        }

        Commands::Pollution { places } => {
            let body = serde_json::json!({ "places": places });
            let data = post_json(
                &client,
                &format!("{}/api/v1/charts/pollution", cli.api_url),
                &body,
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if let Some(series) = data["series"].as_array() {
                if series.is_empty() {
                    println!("(empty figure)");
                }
                for s in series {
                    println!("{}:", s["place"].as_str().unwrap_or(""));
                    if let Some(points) = s["points"].as_array() {
                        for p in points {
                            println!(
                                "  {}  {:>10.2}",
                                p["date"].as_str().unwrap_or(""),
                                p["value"].as_f64().unwrap_or(f64::NAN)
                            );
                        }
                    }
                }
            }
        }

        Commands::Refresh => {
            let data = post_json(
                &client,
                &format!("{}/api/v1/refresh", cli.api_url),
                &serde_json::json!({}),
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_refresh_state(&data);
            }
        }

        Commands::Status => {
            let health = get_json(&client, &format!("{}/health", cli.api_url)).await?;
            let refresh =
                get_json(&client, &format!("{}/api/v1/refresh/status", cli.api_url)).await?;

            if cli.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "health": health,
                        "refresh": refresh,
                    }))?
                );
            } else {
                println!("Geodash v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Status:    {}", health["status"].as_str().unwrap_or("unknown"));
                println!("Cache:     {}", health["cache"].as_str().unwrap_or("unknown"));
                println!(
                    "Pollution: {}",
                    health["pollution"].as_str().unwrap_or("unknown")
                );
                if let Some(uptime) = health["uptime_seconds"].as_u64() {
                    println!("Uptime:    {}s", uptime);
                }
                println!();
                print_refresh_state(&refresh);
            }
        }

        Commands::Inspect { path } => {
            let table = geodash::dataset::PollutionTable::from_path(&path)?;
            let report = table.report();

            println!("{}", path.display());
            println!();
            println!("Rows loaded:  {}", report.rows_loaded);
            println!("Rows skipped: {}", report.rows_skipped);
            println!("Places:       {}", table.places().len());
            for error in report.errors.iter().take(10) {
                println!("  {}", error);
            }
        }

        Commands::Config { output } => {
            let content = geodash::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote config to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// GET a JSON endpoint, exiting with the server's error text on failure
async fn get_json(client: &reqwest::Client, url: &str) -> anyhow::Result<serde_json::Value> {
    let response = client.get(url).send().await?;
    read_json(response).await
}

/// POST a JSON body, exiting with the server's error text on failure
async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let response = client.post(url).json(body).send().await?;
    read_json(response).await
}

async fn read_json(response: reqwest::Response) -> anyhow::Result<serde_json::Value> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed ({}): {}", status, text);
        std::process::exit(1);
    }
    Ok(response.json().await?)
}

fn print_refresh_state(data: &serde_json::Value) {
    println!(
        "Populated:    {}",
        data["populated"].as_bool().unwrap_or(false)
    );
    println!(
        "Last refresh: {}",
        data["last_refresh"].as_str().unwrap_or("never")
    );
    println!(
        "Next refresh: {}",
        data["next_refresh"].as_str().unwrap_or("not scheduled")
    );
    println!("Errors:       {}", data["error_count"].as_u64().unwrap_or(0));
    if let Some(status) = data.get("last_status") {
        if !status.is_null() {
            println!("Last status:  {}", status);
        }
    }
}
