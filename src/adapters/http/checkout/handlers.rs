//! HTTP handlers for checkout endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::checkout::{
    DispatchStepEventCommand, DispatchStepEventHandler, GetCheckoutViewHandler,
    GetCheckoutViewQuery, StartCheckoutCommand, StartCheckoutHandler,
};
use crate::domain::checkout::{CheckoutError, CheckoutView, NavigationPaths, StepEvent};
use crate::domain::foundation::{CheckoutId, CourseId, DomainError, Locale};
use crate::ports::{CheckoutRepository, CourseLookup, EventPublisher};

use super::dto::{CheckoutResponse, ErrorResponse, StartCheckoutRequest, StepEventResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for checkout endpoints.
///
/// Cloned per request. The dispatch handler is shared so that step events
/// for live checkouts are applied one at a time.
#[derive(Clone)]
pub struct CheckoutAppState {
    pub checkout_repository: Arc<dyn CheckoutRepository>,
    pub course_lookup: Arc<dyn CourseLookup>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub default_locale: Locale,
    dispatcher: Arc<DispatchStepEventHandler>,
}

impl CheckoutAppState {
    pub fn new(
        checkout_repository: Arc<dyn CheckoutRepository>,
        course_lookup: Arc<dyn CourseLookup>,
        event_publisher: Arc<dyn EventPublisher>,
        paths: NavigationPaths,
        default_locale: Locale,
    ) -> Self {
        let dispatcher = Arc::new(DispatchStepEventHandler::new(
            checkout_repository.clone(),
            event_publisher.clone(),
            paths,
        ));
        Self {
            checkout_repository,
            course_lookup,
            event_publisher,
            default_locale,
            dispatcher,
        }
    }

    pub fn start_checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(
            self.checkout_repository.clone(),
            self.course_lookup.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn get_checkout_view_handler(&self) -> GetCheckoutViewHandler {
        GetCheckoutViewHandler::new(self.checkout_repository.clone())
    }

    pub fn dispatch_step_event_handler(&self) -> Arc<DispatchStepEventHandler> {
        self.dispatcher.clone()
    }

    fn resolve_locale(&self, code: Option<&str>) -> Locale {
        code.and_then(|c| c.parse().ok())
            .unwrap_or(self.default_locale)
    }
}

fn parse_checkout_id(raw: &str) -> Result<CheckoutId, CheckoutApiError> {
    raw.parse()
        .map_err(|_| CheckoutError::validation("checkout_id", format!("'{}' is not a valid id", raw)).into())
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/checkout/:id - Current checkout view
pub async fn get_checkout(
    State(state): State<CheckoutAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let checkout_id = parse_checkout_id(&id)?;
    let view = state
        .get_checkout_view_handler()
        .handle(GetCheckoutViewQuery { checkout_id })
        .await?;

    Ok(Json(CheckoutResponse { checkout_id, view }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/checkout - Start a checkout and resolve its course
pub async fn start_checkout(
    State(state): State<CheckoutAppState>,
    Json(request): Json<StartCheckoutRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let course_id = CourseId::new(request.course_id).map_err(DomainError::from)?;
    let cmd = StartCheckoutCommand {
        course_id,
        locale: state.resolve_locale(request.locale.as_deref()),
    };

    let result = state.start_checkout_handler().handle(cmd).await?;

    let response = CheckoutResponse {
        checkout_id: result.checkout_id,
        view: result.view,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/checkout/:id/events - Dispatch a step event
pub async fn dispatch_step_event(
    State(state): State<CheckoutAppState>,
    Path(id): Path<String>,
    Json(event): Json<StepEvent>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let checkout_id = parse_checkout_id(&id)?;
    let result = state
        .dispatch_step_event_handler()
        .handle(DispatchStepEventCommand { checkout_id, event })
        .await?;

    let view = match result.view {
        CheckoutView::Exited { .. } => None,
        view => Some(view),
    };
    Ok(Json(StepEventResponse {
        outcome: result.outcome,
        view,
        redirect_to: result.redirect_to,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts checkout errors to HTTP responses.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for CheckoutApiError {
    fn from(err: DomainError) -> Self {
        Self(CheckoutError::from(err))
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            CheckoutError::NotFound(_) => StatusCode::NOT_FOUND,
            CheckoutError::InvalidState { .. } => StatusCode::CONFLICT,
            CheckoutError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            CheckoutError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = match &self.0 {
            CheckoutError::ValidationFailed { field, .. } => ErrorResponse::with_details(
                self.0.code().to_string(),
                self.0.message(),
                serde_json::json!({ "field": field }),
            ),
            other => ErrorResponse::new(other.code().to_string(), other.message()),
        };
        (status, Json(body)).into_response()
    }
}
