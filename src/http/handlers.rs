//! HTTP handlers for the REST API.
//!
//! Each handler parses the request, fetches the raw batches it needs
//! from the upstream clients and delegates to the service layer.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;

use super::dto::{
    CmeDto, EventListResponse, EventQuery, FlaggedReportResponse, GroupResponse, HealthResponse,
    InterestingEventDto, RegionActivityDto, RegionReportResponse, SameTimeResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{CmeEvent, DateRange, FlareEvent};
use crate::services::{
    build_region_report, find_same_time_pairs, render_region_report, FieldRegistry, FlareAnalyzer,
    SortDirection, CME_REGISTRY, FLARE_REGISTRY,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn apply_query<T>(
    registry: &FieldRegistry<T>,
    mut events: Vec<T>,
    query: &EventQuery,
) -> Result<Vec<T>, AppError> {
    events = registry.filter(events, &query.filters)?;
    if let Some(field) = &query.order_by {
        let direction = SortDirection::parse(query.direction.as_deref())?;
        registry.order(&mut events, field, direction)?;
    }
    Ok(events)
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    })
}

/// GET /v1/events/{kind}
///
/// List flares or CMEs in a date range, with optional `filter=`
/// predicates and `orderBy`/`direction` sorting.
pub async fn list_events(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> HandlerResult<serde_json::Value> {
    let query = EventQuery::from_pairs(pairs)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let body = match kind.as_str() {
        "flares" => {
            let flares: Vec<FlareEvent> = state.donki.fetch_flares(range.start, range.end).await?;
            let events = apply_query(&FLARE_REGISTRY, flares, &query)?;
            let total = events.len();
            serde_json::to_value(EventListResponse { events, total })
        }
        "cmes" => {
            let cmes: Vec<CmeEvent> = state.donki.fetch_cmes(range.start, range.end).await?;
            let events = apply_query(&CME_REGISTRY, cmes, &query)?;
            let total = events.len();
            let events: Vec<CmeDto> = events.into_iter().map(Into::into).collect();
            serde_json::to_value(EventListResponse { events, total })
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown event kind {other:?}: expected \"flares\" or \"cmes\""
            )))
        }
    };

    body.map(Json)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// GET /v1/events/{kind}/group/{field}
///
/// Count events per distinct value of one field, after filtering.
pub async fn group_events(
    State(state): State<AppState>,
    Path((kind, field)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> HandlerResult<GroupResponse> {
    let query = EventQuery::from_pairs(pairs)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let groups = match kind.as_str() {
        "flares" => {
            let flares = state.donki.fetch_flares(range.start, range.end).await?;
            let flares = FLARE_REGISTRY.filter(flares, &query.filters)?;
            FLARE_REGISTRY.group_counts(&flares, &field)?
        }
        "cmes" => {
            let cmes = state.donki.fetch_cmes(range.start, range.end).await?;
            let cmes = CME_REGISTRY.filter(cmes, &query.filters)?;
            CME_REGISTRY.group_counts(&cmes, &field)?
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "unknown event kind {other:?}: expected \"flares\" or \"cmes\""
            )))
        }
    };

    let total = groups.values().sum();
    Ok(Json(GroupResponse { field, groups, total }))
}

/// GET /v1/report/flagged
///
/// Run the correlation and scoring engine over the range and return the
/// flagged events, most surprising first.
pub async fn flagged_report(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> HandlerResult<FlaggedReportResponse> {
    let query = EventQuery::from_pairs(pairs)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let (flares, cmes, sunspots) = tokio::try_join!(
        state.donki.fetch_flares(range.start, range.end),
        state.donki.fetch_cmes(range.start, range.end),
        async {
            // Missing sunspot data degrades the scores, it does not
            // fail the report.
            Ok::<_, crate::client::ClientError>(state.noaa.fetch_sunspots().await.unwrap_or_default())
        },
    )?;

    let analyzer = FlareAnalyzer::new(state.config.analysis.clone());
    let flagged = analyzer.analyze_events(&flares, &cmes, &sunspots);

    let events: Vec<InterestingEventDto> = flagged
        .iter()
        .map(|event| InterestingEventDto::from_event(event, &state.config.analysis))
        .collect();
    let total = events.len();
    Ok(Json(FlaggedReportResponse { events, total }))
}

/// GET /v1/report/sametime
///
/// Flare/CME pairs that started at nearly the same time.
pub async fn sametime_report(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> HandlerResult<SameTimeResponse> {
    let query = EventQuery::from_pairs(pairs)?;
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

    let (flares, cmes) = tokio::try_join!(
        state.donki.fetch_flares(range.start, range.end),
        state.donki.fetch_cmes(range.start, range.end),
    )?;

    let pairs = find_same_time_pairs(&flares, &cmes);
    let total = pairs.len();
    Ok(Json(SameTimeResponse { pairs, total }))
}

/// GET /v1/report/regions
///
/// Per-active-region activity rollup over the trailing 30 days, as a
/// rendered markdown table plus the structured rows behind it.
pub async fn regions_report(State(state): State<AppState>) -> HandlerResult<RegionReportResponse> {
    let now = Utc::now();
    let range = DateRange {
        start: now - chrono::Duration::days(30),
        end: now,
    };

    let (regions, sunspots, flares, cmes) = tokio::try_join!(
        state.noaa.fetch_solar_regions(),
        state.noaa.fetch_sunspots(),
        state.donki.fetch_flares(range.start, range.end),
        state.donki.fetch_cmes(range.start, range.end),
    )?;
    // The flux summary is decoration; its failure must not sink the report.
    let flux = state.noaa.fetch_flux().await.ok();

    let report = build_region_report(&regions, &sunspots, &flares, &cmes, now);
    let rendered = render_region_report(&report, flux.as_ref());
    let rows: Vec<RegionActivityDto> = report.iter().map(Into::into).collect();

    Ok(Json(RegionReportResponse {
        report: rendered,
        regions: rows,
    }))
}
