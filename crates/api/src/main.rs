use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use nestegg_core::catalog::Catalog;
use nestegg_core::domain::contract::CriteriaRequest;
use nestegg_core::domain::instrument::{Horizon, Instrument, RiskLevel};
use nestegg_core::domain::recommendation::{Criteria, Recommendation};
use nestegg_core::info::{HorizonInfo, RiskLevelInfo};
use nestegg_core::quotes::cache::QuoteCache;
use nestegg_core::quotes::Quote;

const MAX_QUOTE_SYMBOLS: usize = 25;
const NO_MATCH_MESSAGE: &str =
    "No suitable investments match these criteria. Try a larger amount or a higher risk tolerance.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = nestegg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = match build_state(&settings) {
        Ok(state) => state,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "api startup failed");
            return Err(e);
        }
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_state(settings: &nestegg_core::config::Settings) -> anyhow::Result<AppState> {
    let catalog = Catalog::from_settings(settings)?;
    let quotes = QuoteCache::from_settings(settings)?;
    Ok(AppState {
        catalog: Arc::new(catalog),
        quotes,
    })
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/recommendations", post(create_recommendations))
        .route("/instruments", get(list_instruments))
        .route("/instruments/:symbol", get(get_instrument))
        .route("/info/horizons", get(get_time_period_info))
        .route("/info/risk-levels", get(get_risk_level_info))
        .route("/quotes", get(get_quotes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    quotes: QuoteCache,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: error.into(),
        }),
    )
}

#[derive(Debug, Serialize)]
struct ApiRecommendations {
    request_id: Uuid,
    generated_at: DateTime<Utc>,
    criteria: Criteria,
    items: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn create_recommendations(
    State(state): State<AppState>,
    Json(request): Json<CriteriaRequest>,
) -> ApiResult<ApiRecommendations> {
    let criteria = request
        .validate_and_into_criteria()
        .map_err(|e| bad_request(format!("{e:#}")))?;

    let request_id = Uuid::new_v4();
    let items = nestegg_core::engine::recommend(&state.catalog, &criteria);

    tracing::info!(
        %request_id,
        amount = criteria.amount,
        horizon = %criteria.horizon,
        risk = %criteria.risk,
        items = items.len(),
        "recommendations computed"
    );

    let message = items.is_empty().then(|| NO_MATCH_MESSAGE.to_string());

    Ok(Json(ApiRecommendations {
        request_id,
        generated_at: Utc::now(),
        criteria,
        items,
        message,
    }))
}

async fn list_instruments(State(state): State<AppState>) -> Json<Vec<Instrument>> {
    Json(state.catalog.instruments().to_vec())
}

async fn get_instrument(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Instrument>, StatusCode> {
    state
        .catalog
        .get(&symbol)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_time_period_info() -> Json<BTreeMap<Horizon, HorizonInfo>> {
    Json(nestegg_core::info::time_period_info())
}

async fn get_risk_level_info() -> Json<BTreeMap<RiskLevel, RiskLevelInfo>> {
    Json(nestegg_core::info::risk_level_info())
}

#[derive(Debug, Deserialize)]
struct QuotesQuery {
    symbols: String,
}

async fn get_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> ApiResult<BTreeMap<String, Quote>> {
    let symbols = parse_symbols(&query.symbols).map_err(bad_request)?;
    Ok(Json(state.quotes.get_quotes(&symbols).await))
}

fn parse_symbols(raw: &str) -> Result<Vec<String>, String> {
    let mut symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    symbols.sort();
    symbols.dedup();

    if symbols.is_empty() {
        return Err("symbols must list at least one ticker".to_string());
    }
    if symbols.len() > MAX_QUOTE_SYMBOLS {
        return Err(format!(
            "at most {MAX_QUOTE_SYMBOLS} symbols per request (got {})",
            symbols.len()
        ));
    }
    Ok(symbols)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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

#[cfg(test)]
mod tests {
    use super::*;
    use nestegg_core::config::Settings;

    fn test_state() -> AppState {
        let settings = Settings {
            sentry_dsn: None,
            catalog_path: None,
            quote_provider_base_url: Some("http://127.0.0.1:9".to_string()),
        };
        build_state(&settings).unwrap()
    }

    fn request(amount: f64, horizon: &str, risk: &str) -> CriteriaRequest {
        CriteriaRequest {
            amount,
            horizon: horizon.to_string(),
            risk: risk.to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_non_positive_amount_at_the_boundary() {
        let res = create_recommendations(State(test_state()), Json(request(0.0, "long", "high"))).await;
        let (status, Json(body)) = res.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("greater than zero"));
    }

    #[tokio::test]
    async fn returns_full_allocation_for_valid_request() {
        let Json(body) = create_recommendations(
            State(test_state()),
            Json(request(10_000.0, "long-term", "high")),
        )
        .await
        .unwrap();

        assert_eq!(body.items.len(), 7);
        assert_eq!(
            body.items.iter().map(|r| r.allocation_percentage).sum::<u32>(),
            100
        );
        assert!(body.message.is_none());
    }

    #[tokio::test]
    async fn empty_result_carries_a_hint_not_an_error() {
        let Json(body) = create_recommendations(State(test_state()), Json(request(1.0, "long", "low")))
            .await
            .unwrap();

        assert!(body.items.is_empty());
        assert_eq!(body.message.as_deref(), Some(NO_MATCH_MESSAGE));
    }

    #[tokio::test]
    async fn looks_up_instrument_case_insensitively() {
        let Json(vti) = get_instrument(State(test_state()), Path("vti".to_string()))
            .await
            .unwrap();
        assert_eq!(vti.symbol, "VTI");

        let missing = get_instrument(State(test_state()), Path("NOPE".to_string())).await;
        assert_eq!(missing.unwrap_err(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn parses_and_bounds_symbol_lists() {
        assert_eq!(
            parse_symbols(" vti, BND ,,vti").unwrap(),
            vec!["BND".to_string(), "VTI".to_string()]
        );
        assert!(parse_symbols(" , ").is_err());

        let many = (0..=MAX_QUOTE_SYMBOLS)
            .map(|n| format!("S{n}"))
            .collect::<Vec<_>>()
            .join(",");
        assert!(parse_symbols(&many).is_err());
    }
}
