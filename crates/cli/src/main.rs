use anyhow::Context;
use clap::{Parser, Subcommand};
use nestegg_core::catalog::Catalog;
use nestegg_core::domain::contract::CriteriaRequest;
use nestegg_core::domain::recommendation::{Criteria, Recommendation};
use nestegg_core::quotes::cache::QuoteCache;
use nestegg_core::quotes::{Quote, QuoteSource};
use std::collections::BTreeMap;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod format;

#[derive(Debug, Parser)]
#[command(name = "nestegg_cli", about = "Suggest a diversified basket for an amount, horizon and risk level")]
struct Args {
    /// Instrument catalog JSON file. Overrides NESTEGG_CATALOG_PATH.
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend holdings and allocations.
    Recommend {
        /// Amount to invest, in dollars.
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// short, mid or long (the "-term" suffix is accepted).
        #[arg(long)]
        horizon: String,

        /// low, medium or high.
        #[arg(long)]
        risk: String,

        /// Also show a price for each recommended holding.
        #[arg(long)]
        quotes: bool,
    },
    /// Describe the horizon and risk choices.
    Info,
    /// Show prices for the given tickers.
    Quotes {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = nestegg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(path) = args.catalog.clone() {
        settings.catalog_path = Some(path);
    }

    let result = run(&args, &settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run(args: &Args, settings: &nestegg_core::config::Settings) -> anyhow::Result<()> {
    match &args.command {
        Command::Recommend {
            amount,
            horizon,
            risk,
            quotes,
        } => {
            let criteria = CriteriaRequest {
                amount: *amount,
                horizon: horizon.clone(),
                risk: risk.clone(),
            }
            .validate_and_into_criteria()
            .context("invalid investment criteria")?;

            let catalog = Catalog::from_settings(settings)?;
            let recommendations = nestegg_core::engine::recommend(&catalog, &criteria);

            let prices = if *quotes && !recommendations.is_empty() {
                let cache = QuoteCache::from_settings(settings)?;
                let symbols: Vec<String> = recommendations
                    .iter()
                    .map(|r| r.instrument.symbol.clone())
                    .collect();
                cache.get_quotes(&symbols).await
            } else {
                BTreeMap::new()
            };

            if args.json {
                let out = serde_json::json!({
                    "criteria": criteria,
                    "items": recommendations,
                    "quotes": prices,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_recommendations(&criteria, &recommendations, &prices);
            }
        }
        Command::Info => {
            let horizons = nestegg_core::info::time_period_info();
            let risks = nestegg_core::info::risk_level_info();
            if args.json {
                let out = serde_json::json!({"horizons": horizons, "risk_levels": risks});
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Horizons");
                for (horizon, info) in &horizons {
                    println!("  {horizon:<6} {:<10} {}", info.duration, info.description);
                }
                println!();
                println!("Risk levels");
                for (risk, info) in &risks {
                    println!("  {risk:<6} {}", info.expected_return);
                    println!("         {}", info.description);
                    println!("         {}", info.volatility);
                }
            }
        }
        Command::Quotes { symbols } => {
            let cache = QuoteCache::from_settings(settings)?;
            let quotes = cache.get_quotes(symbols).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quotes)?);
            } else {
                for symbol in symbols {
                    match quotes.get(symbol) {
                        Some(q) => println!("{:<6} {}", symbol.to_ascii_uppercase(), quote_line(q)),
                        None => println!("{:<6} unavailable", symbol.to_ascii_uppercase()),
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_recommendations(
    criteria: &Criteria,
    recommendations: &[Recommendation],
    prices: &BTreeMap<String, Quote>,
) {
    println!(
        "{} over a {} term horizon at {} risk",
        format::currency(criteria.amount),
        criteria.horizon,
        criteria.risk
    );

    if recommendations.is_empty() {
        println!(
            "No suitable investments match these criteria. \
             Try a larger amount or a higher risk tolerance."
        );
        return;
    }

    println!();
    for (idx, rec) in recommendations.iter().enumerate() {
        let i = &rec.instrument;
        println!(
            "{:>2}. {:<6} {:<44} {:>3}%  {:>14}",
            idx + 1,
            i.symbol,
            i.name,
            rec.allocation_percentage,
            format::currency(rec.recommended_amount)
        );
        println!("    {} | {} risk | min {}", i.sector, i.risk, format::currency(i.minimum_investment));
        if let Some(q) = prices.get(&i.symbol) {
            println!("    {}", quote_line(q));
        }
        println!("    {}", rec.rationale);
    }
}

fn quote_line(q: &Quote) -> String {
    let mut line = format!(
        "{} ({})",
        format::currency(q.current_price),
        format::signed_percentage(q.change_percent)
    );
    if let Some(volume) = q.volume {
        line.push_str(&format!(" vol {}", format::compact(volume as f64)));
    }
    if q.source == QuoteSource::Fallback {
        line.push_str(" [placeholder]");
    }
    line
}

fn init_sentry(settings: &nestegg_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
