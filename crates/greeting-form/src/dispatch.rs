//! Submit-event dispatch.
//!
//! Each submit runs the handler's prologue inline and then spawns the rest
//! as its own tokio task. Submissions are never serialized, debounced or
//! cancelled, so overlapping replies land on the page in completion order.

use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::FormConfig;
use crate::event::SubmitEvent;
use crate::handler::SubmissionHandler;
use crate::page::{FormPage, SharedPage};
use crate::transport::HttpTransport;
use crate::types::{FormError, FormResult};

/// Handle to one fired submission.
pub struct Submission {
    /// Id of the submit event.
    pub id: Uuid,
    /// Whether the page navigated away (default action not prevented).
    pub navigated: bool,
    /// The in-flight request/update task.
    pub task: JoinHandle<FormResult<()>>,
}

impl Submission {
    /// Wait for the submission's task to finish.
    pub async fn wait(self) -> FormResult<()> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(FormError::TaskFailed(e.to_string())),
        }
    }
}

/// Fires submit events for one form and runs its handler.
pub struct FormDispatcher {
    handler: Arc<SubmissionHandler>,
}

impl FormDispatcher {
    /// Attach a handler to the form it is configured for.
    pub async fn attach(handler: SubmissionHandler) -> FormResult<Self> {
        let form_id = handler.config().form_id.clone();
        if !handler.page().lock().await.has_form(&form_id) {
            return Err(FormError::ElementNotFound(format!("form '{form_id}'")));
        }

        tracing::info!(form = %form_id, "Submission handler attached");
        Ok(Self {
            handler: Arc::new(handler),
        })
    }

    /// Build an HTTP-backed dispatcher for `page` from configuration.
    pub async fn from_config(config: FormConfig, page: FormPage) -> FormResult<Self> {
        let transport = HttpTransport::from_config(&config)?.into_ptr();
        let handler = SubmissionHandler::new(config, transport, page.into_shared());
        Self::attach(handler).await
    }

    pub fn page(&self) -> &SharedPage {
        self.handler.page()
    }

    pub fn config(&self) -> &FormConfig {
        self.handler.config()
    }

    /// Fire the form's submit event.
    ///
    /// Failures inside the spawned task are logged as unhandled and carried
    /// in the task's result; they never touch the page.
    pub async fn submit(&self) -> Submission {
        let mut event = SubmitEvent::new(&self.handler.config().form_id);
        let id = event.id();
        let prologue = self.handler.handle(&mut event).await;
        let navigated = event.navigates();

        let task = match prologue {
            Ok(pending) => tokio::spawn(async move {
                let result = pending.complete().await;
                if let Err(e) = &result {
                    tracing::error!(submission = %id, "Unhandled failure in submit handler: {e}");
                }
                result
            }),
            Err(e) => {
                tracing::error!(submission = %id, "Unhandled failure in submit handler: {e}");
                tokio::spawn(std::future::ready(Err(e)))
            }
        };

        Submission {
            id,
            navigated,
            task,
        }
    }

    /// Type `value` into the input field, then submit.
    pub async fn submit_with(&self, value: impl Into<String>) -> FormResult<Submission> {
        let input_id = &self.handler.config().input_id;
        self.page().lock().await.set_value(input_id, value)?;
        Ok(self.submit().await)
    }

    /// Current text of the display element.
    pub async fn display_text(&self) -> Option<String> {
        let display_id = &self.handler.config().display_id;
        self.page().lock().await.text(display_id).map(str::to_string)
    }
}
