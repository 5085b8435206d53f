//! Process-level attachment points feeding the error aggregator.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::future::Future;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use backoffice_application::ErrorAggregator;
use backoffice_core::{AppError, AppResult};
use backoffice_domain::{ErrorKind, ErrorReport};
use tokio::task::JoinHandle;
use tracing::{error, warn};

/// Agent recorded on reports raised inside this process.
pub const PROCESS_AGENT: &str = concat!("backoffice-api/", env!("CARGO_PKG_VERSION"));

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installed panic hook and supervised-task spawner.
///
/// At most one instance exists per process. Dropping or tearing it down
/// restores the panic hook that was active before installation.
pub struct DiagnosticHooks {
    aggregator: Arc<ErrorAggregator>,
    previous_hook: Option<Arc<PanicHook>>,
}

impl DiagnosticHooks {
    /// Chains a capturing panic hook in front of the current one.
    pub fn install(aggregator: Arc<ErrorAggregator>) -> AppResult<Self> {
        if INSTALLED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::Conflict(
                "diagnostic hooks are already installed".to_owned(),
            ));
        }

        let previous_hook: Arc<PanicHook> = Arc::new(panic::take_hook());
        let chained_hook = Arc::clone(&previous_hook);
        let sink = Arc::clone(&aggregator);
        panic::set_hook(Box::new(move |info| {
            sink.capture(report_from_panic(info));
            chained_hook(info);
        }));

        Ok(Self {
            aggregator,
            previous_hook: Some(previous_hook),
        })
    }

    /// Spawns a task whose `Err` outcome is captured as a rejected operation.
    pub fn spawn_supervised<F>(&self, label: &'static str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = AppResult<()>> + Send + 'static,
    {
        let aggregator = Arc::clone(&self.aggregator);
        tokio::spawn(async move {
            if let Err(failure) = task.await {
                error!(task = label, error = %failure, "supervised task failed");
                aggregator.capture(
                    ErrorReport::new(ErrorKind::RejectedPromise, failure.to_string())
                        .with_source_url(format!("task:{label}"))
                        .with_agent_string(PROCESS_AGENT),
                );
            }
        })
    }

    /// Restores the previous panic hook and allows a fresh install.
    pub fn teardown(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if thread::panicking() {
            warn!("diagnostic hooks left installed while unwinding");
            return;
        }

        let Some(previous_hook) = self.previous_hook.take() else {
            return;
        };

        // Dropping the capturing hook releases its clone of the previous one.
        drop(panic::take_hook());
        match Arc::try_unwrap(previous_hook) {
            Ok(hook) => panic::set_hook(hook),
            Err(shared) => panic::set_hook(Box::new(move |info| shared(info))),
        }
        INSTALLED.store(false, Ordering::SeqCst);
    }
}

impl Drop for DiagnosticHooks {
    fn drop(&mut self) {
        self.restore();
    }
}

fn report_from_panic(info: &PanicHookInfo<'_>) -> ErrorReport {
    let payload = info.payload();
    let message = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with non-string payload".to_owned());

    let source_url = info
        .location()
        .map(|location| format!("{}:{}:{}", location.file(), location.line(), location.column()))
        .unwrap_or_default();

    let mut report = ErrorReport::new(ErrorKind::Runtime, message)
        .with_source_url(source_url)
        .with_agent_string(PROCESS_AGENT);

    let backtrace = Backtrace::capture();
    if backtrace.status() == BacktraceStatus::Captured {
        report = report.with_stack(backtrace.to_string());
    }

    if let Some(thread_name) = thread::current().name() {
        report = report.with_context(serde_json::json!({ "thread": thread_name }));
    }

    report
}

#[cfg(test)]
mod tests {
    use std::panic;
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use backoffice_application::ErrorAggregator;
    use backoffice_core::AppError;
    use backoffice_domain::ErrorKind;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::DiagnosticHooks;
    use crate::api_router::with_layers;

    async fn exploding_handler() -> &'static str {
        panic!("catalog index out of range")
    }

    // Panic hooks are process-global, so every install lives in this one test.
    #[tokio::test]
    async fn hooks_capture_panics_and_failed_tasks_and_install_once() {
        let aggregator = Arc::new(ErrorAggregator::new());
        let Ok(hooks) = DiagnosticHooks::install(Arc::clone(&aggregator)) else {
            panic!("first install rejected");
        };

        let second = DiagnosticHooks::install(Arc::new(ErrorAggregator::new()));
        assert!(matches!(second, Err(AppError::Conflict(_))));

        let outcome = panic::catch_unwind(|| {
            panic!("cannot read properties of undefined");
        });
        assert!(outcome.is_err());

        let task = hooks.spawn_supervised("nightly-sync", async {
            Err(AppError::Internal("store unreachable".to_owned()))
        });
        assert!(task.await.is_ok());
        let succeeded = hooks.spawn_supervised("noop", async { Ok(()) });
        assert!(succeeded.await.is_ok());

        let reports = aggregator.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind, ErrorKind::Runtime);
        assert_eq!(reports[0].message, "cannot read properties of undefined");
        assert_eq!(reports[1].kind, ErrorKind::RejectedPromise);
        assert_eq!(reports[1].source_url, "task:nightly-sync");

        let Ok(router) = with_layers(
            Router::new().route("/explode", get(exploding_handler)),
            "http://localhost:3000",
        ) else {
            panic!("router failed to build");
        };
        let Ok(request) = Request::builder().uri("/explode").body(Body::empty()) else {
            panic!("request failed to build");
        };
        let Ok(response) = router.oneshot(request).await else {
            panic!("router service failed");
        };
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        assert_eq!(
            body,
            json!({ "success": false, "error": "internal error: request handler panicked" })
        );

        let reports = aggregator.reports();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].kind, ErrorKind::Runtime);
        assert_eq!(reports[2].message, "catalog index out of range");

        hooks.teardown();

        let outcome = panic::catch_unwind(|| {
            panic!("after teardown");
        });
        assert!(outcome.is_err());
        assert_eq!(aggregator.reports().len(), 3);

        let Ok(reinstalled) = DiagnosticHooks::install(Arc::clone(&aggregator)) else {
            panic!("install after teardown rejected");
        };
        reinstalled.teardown();
    }
}
