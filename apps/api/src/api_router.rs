use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use backoffice_core::AppError;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let not_allowed = handlers::method_not_allowed_handler;

    let api_routes = Router::new()
        .route(
            "/api/admin-activity",
            get(handlers::activity::list_activity_handler)
                .post(handlers::activity::log_activity_handler)
                .fallback(not_allowed),
        )
        .route(
            "/api/products",
            get(handlers::products::list_products_handler).fallback(not_allowed),
        )
        .route(
            "/api/diagnostics/errors",
            get(handlers::diagnostics::error_summary_handler)
                .post(handlers::diagnostics::capture_error_report_handler)
                .delete(handlers::diagnostics::clear_error_reports_handler)
                .fallback(not_allowed),
        )
        .route(
            "/api/diagnostics/errors/reports",
            get(handlers::diagnostics::error_reports_handler).fallback(not_allowed),
        );

    let router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes);

    Ok(with_layers(router, frontend_url)?.with_state(app_state))
}

/// Wraps routes in the panic, trace and CORS layers every endpoint shares.
pub(crate) fn with_layers<S>(router: Router<S>, frontend_url: &str) -> Result<Router<S>, AppError>
where
    S: Clone + Send + Sync + 'static,
{
    Ok(router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?))
}

/// Handler panics were already captured by the panic hook; answer with an envelope.
fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError(AppError::Internal("request handler panicked".to_owned())).into_response()
}
