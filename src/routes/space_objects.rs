use actix_web::{web, HttpResponse, Responder};
use crate::core::{validate_range, AggregateError, Aggregator, ValidationError, DATE_FORMAT};
use crate::models::{
    DateRange, ErrorResponse, HealthResponse, SpaceObjectsQuery, DROPPED_ENTRIES_HEADER,
    EFFECTIVE_END_DATE_HEADER, SPAN_TRUNCATED_HEADER,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
}

/// Configure all space-object routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/space_objects", web::get().to(space_objects_by_query))
        .route("/space_objects/{start_date}/{end_date}", web::get().to(space_objects_by_path));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Space objects sorted by closest approach
///
/// GET /space_objects?start_date=2023-01-01&end_date=2023-01-20
///
/// Response: JSON array of
/// ```json
/// {
///   "name": "string",
///   "size_estimate": {},
///   "closest_encounter_time": "2023-Jan-01 12:00",
///   "closest_encounter_distance": {"kilometers": "string", "...": "..."}
/// }
/// ```
async fn space_objects_by_query(
    state: web::Data<AppState>,
    query: web::Query<SpaceObjectsQuery>,
) -> HttpResponse {
    tracing::info!(
        "/space_objects GET start_date={:?}, end_date={:?}",
        query.start_date,
        query.end_date
    );

    match query.date_range() {
        Ok(range) => respond(&state, range).await,
        Err(e) => validation_failed(e),
    }
}

/// Same as the query form, with dates as path segments
///
/// GET /space_objects/{start_date}/{end_date}
async fn space_objects_by_path(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (start_date, end_date) = path.into_inner();
    tracing::info!("/space_objects/{}/{} GET", start_date, end_date);

    match validate_range(&start_date, &end_date) {
        Ok(range) => respond(&state, range).await,
        Err(e) => validation_failed(e),
    }
}

async fn respond(state: &AppState, range: DateRange) -> HttpResponse {
    match state.aggregator.space_objects(range).await {
        Ok(outcome) => {
            tracing::info!(
                "Returning {} space objects for {} ({} requests, {} dropped)",
                outcome.objects.len(),
                outcome.effective,
                outcome.requests,
                outcome.dropped
            );

            let mut response = HttpResponse::Ok();
            response.insert_header((DROPPED_ENTRIES_HEADER, outcome.dropped.to_string()));
            if outcome.truncated {
                response.insert_header((SPAN_TRUNCATED_HEADER, "true"));
                response.insert_header((
                    EFFECTIVE_END_DATE_HEADER,
                    outcome.effective.end.format(DATE_FORMAT).to_string(),
                ));
            }
            response.json(outcome.objects)
        }
        Err(e) => {
            tracing::error!("Failed to aggregate space objects for {}: {}", range, e);
            let error = match &e {
                AggregateError::Upstream { .. } => "NeoWs request failed",
                AggregateError::DataShape(_) => "Malformed NeoWs data",
            };
            HttpResponse::BadGateway().json(ErrorResponse {
                error: error.to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

fn validation_failed(e: ValidationError) -> HttpResponse {
    tracing::info!("Validation failed: {}", e);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: e.to_string(),
        message: e.detail(),
        status_code: 400,
    })
}
