use std::sync::atomic::{AtomicU64, Ordering};

use shared::{
    domain::Combination,
    protocol::{FilterOutcome, FilterRequest},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod error;
pub mod form;
pub mod render;
pub mod transport;
pub mod validation;

pub use error::{Action, CoordinatorError, ErrorCategory, TransportError, ValidationError};
pub use form::{Field, FormSource, FormState, ResultsSurface};
pub use render::{RenderOptions, RenderedResults, ResultsBody};
pub use transport::{FilterService, HttpFilterService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was the newest so far; state and surface were updated.
    Applied(RenderedResults),
    /// A later-issued request already landed; this response was dropped.
    Superseded,
}

#[derive(Default)]
struct CoordinatorState {
    current_combinations: Vec<Combination>,
    applied_ticket: u64,
}

/// Mediates between form input, the filtering service and the results
/// surface.
///
/// Every issued request takes a ticket. A successful response is applied
/// only when its ticket is newer than the last applied one, so overlapping
/// actions always settle on the most recently issued request rather than
/// the one that happened to finish last. Failures never touch state.
pub struct RequestCoordinator<S: FilterService> {
    service: S,
    options: RenderOptions,
    issued: AtomicU64,
    state: Mutex<CoordinatorState>,
}

impl<S: FilterService> RequestCoordinator<S> {
    pub fn new(service: S) -> Self {
        Self::with_render_options(service, RenderOptions::default())
    }

    pub fn with_render_options(service: S, options: RenderOptions) -> Self {
        Self {
            service,
            options,
            issued: AtomicU64::new(0),
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        self.options
    }

    /// Last successfully applied combination list.
    pub async fn current_combinations(&self) -> Vec<Combination> {
        self.state.lock().await.current_combinations.clone()
    }

    pub async fn generate<F, U>(&self, form: &F, surface: &U) -> Result<Outcome, CoordinatorError>
    where
        F: FormSource + ?Sized,
        U: ResultsSurface + ?Sized,
    {
        let result = match validation::generation_request(form) {
            Ok(request) => self.dispatch(Action::Generate, request, surface).await,
            Err(err) => Err(err.into()),
        };
        report_failure(result, surface)
    }

    /// `kind` is taken as typed by the user; unknown kinds fail validation.
    pub async fn apply_filter<F, U>(
        &self,
        kind: &str,
        form: &F,
        surface: &U,
    ) -> Result<Outcome, CoordinatorError>
    where
        F: FormSource + ?Sized,
        U: ResultsSurface + ?Sized,
    {
        let result = match validation::filter_request(kind, form) {
            Ok(request) => self.dispatch(Action::ApplyFilter, request, surface).await,
            Err(err) => Err(err.into()),
        };
        report_failure(result, surface)
    }

    async fn dispatch<U>(
        &self,
        action: Action,
        request: FilterRequest,
        surface: &U,
    ) -> Result<Outcome, CoordinatorError>
    where
        U: ResultsSurface + ?Sized,
    {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            ticket,
            ?action,
            total_numbers = request.total_numbers,
            choose = request.choose,
            filter = request.filters.as_ref().map_or("none", |f| f.kind().as_str()),
            "issuing filter request"
        );

        let outcome = self
            .service
            .submit(&request)
            .await
            .map_err(|source| CoordinatorError::from_transport(action, source))?;
        let matches = match outcome {
            FilterOutcome::Matched(matches) => matches,
            FilterOutcome::Rejected { error } => {
                return Err(CoordinatorError::Server { message: error })
            }
        };

        let mut state = self.state.lock().await;
        if ticket <= state.applied_ticket {
            debug!(
                ticket,
                applied_ticket = state.applied_ticket,
                "dropping response superseded by a newer request"
            );
            return Ok(Outcome::Superseded);
        }

        let rendered = render::render_results(&matches, request.total_numbers, self.options);
        state.applied_ticket = ticket;
        state.current_combinations = matches.combinations;
        info!(
            ticket,
            total = matches.total,
            received = state.current_combinations.len(),
            "filter response applied"
        );
        surface.render(&rendered);
        surface.set_total(rendered.total);
        Ok(Outcome::Applied(rendered))
    }
}

fn report_failure<U>(
    result: Result<Outcome, CoordinatorError>,
    surface: &U,
) -> Result<Outcome, CoordinatorError>
where
    U: ResultsSurface + ?Sized,
{
    if let Err(err) = &result {
        match err.category() {
            ErrorCategory::Validation => debug!(error = %err, "input rejected"),
            category => warn!(?category, error = %err, "action failed"),
        }
        surface.alert(&err.to_string());
    }
    result
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
