//! Submission handler: one submit event in, one request out, one text write.

use std::sync::Arc;

use uuid::Uuid;

use crate::config::FormConfig;
use crate::event::SubmitEvent;
use crate::page::SharedPage;
use crate::transport::TransportPtr;
use crate::types::{FormError, FormResult, GreetingReply, NamePayload};

/// Handler bound to one form's submit event.
pub struct SubmissionHandler {
    config: Arc<FormConfig>,
    transport: TransportPtr,
    page: SharedPage,
}

impl SubmissionHandler {
    pub fn new(config: FormConfig, transport: TransportPtr, page: SharedPage) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            page,
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    /// Run the event-dispatch part of the handler.
    ///
    /// Default navigation is prevented before anything else, then the input
    /// value is captured as it is at this moment. The returned
    /// [`PendingSubmission`] carries the rest of the work.
    pub async fn handle(&self, event: &mut SubmitEvent) -> FormResult<PendingSubmission> {
        event.prevent_default();

        // Only `input`/`textarea` ids count. A browser would read `.value` of
        // any other element as undefined and still post `{}`; here no request
        // is sent.
        let name = {
            let page = self.page.lock().await;
            page.value(&self.config.input_id)
                .map(str::to_string)
                .ok_or_else(|| {
                    FormError::ElementNotFound(format!("field '{}'", self.config.input_id))
                })?
        };

        tracing::debug!(submission = %event.id(), form = event.form_id(), "Captured input value");

        Ok(PendingSubmission {
            id: event.id(),
            name,
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            page: Arc::clone(&self.page),
        })
    }
}

/// The asynchronous remainder of one submission.
pub struct PendingSubmission {
    id: Uuid,
    name: String,
    config: Arc<FormConfig>,
    transport: TransportPtr,
    page: SharedPage,
}

impl PendingSubmission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Value captured from the input field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send the captured value, wait for the reply, and write the greeting.
    ///
    /// The page lock is only taken for the final write, never across the
    /// network exchange.
    pub async fn complete(self) -> FormResult<()> {
        let body = NamePayload::new(self.name).to_body()?;
        tracing::debug!(submission = %self.id, endpoint = %self.config.endpoint, "Posting submission");

        let reply = self.transport.post_json(&self.config.endpoint, body).await?;
        let greeting = GreetingReply::parse(&reply.body)?;
        let text = greeting.display_text();

        self.page
            .lock()
            .await
            .set_text(&self.config.display_id, text)?;

        tracing::info!(submission = %self.id, status = reply.status, "Greeting updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::FormPage;
    use crate::transport::{SubmitTransport, TransportReply};
    use std::sync::Mutex as StdMutex;

    /// Records requests and answers each with a fixed reply.
    struct FixedTransport {
        reply: TransportReply,
        seen: StdMutex<Vec<(String, String)>>,
    }

    impl FixedTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: TransportReply {
                    status,
                    body: body.to_string(),
                },
                seen: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl SubmitTransport for FixedTransport {
        async fn post_json(&self, path: &str, body: String) -> FormResult<TransportReply> {
            self.seen.lock().unwrap().push((path.to_string(), body));
            Ok(self.reply.clone())
        }
    }

    fn handler_with(transport: Arc<FixedTransport>, html: &str) -> SubmissionHandler {
        let page = FormPage::parse(html).into_shared();
        SubmissionHandler::new(FormConfig::default(), transport, page)
    }

    #[tokio::test]
    async fn test_handle_prevents_default_and_captures_value() {
        let transport = FixedTransport::new(200, r#"{"message":"hi"}"#);
        let handler = handler_with(transport, crate::DEFAULT_PAGE);
        handler.page().lock().await.set_value("name", "Alice").unwrap();

        let mut event = SubmitEvent::new("userForm");
        let pending = handler.handle(&mut event).await.unwrap();
        assert!(event.default_prevented());
        assert_eq!(pending.name(), "Alice");
        assert_eq!(pending.id(), event.id());
    }

    #[tokio::test]
    async fn test_value_is_captured_at_submit_time() {
        let transport = FixedTransport::new(200, r#"{"message":"hi"}"#);
        let handler = handler_with(transport.clone(), crate::DEFAULT_PAGE);
        handler.page().lock().await.set_value("name", "Alice").unwrap();

        let pending = handler.handle(&mut SubmitEvent::new("userForm")).await.unwrap();
        handler.page().lock().await.set_value("name", "Changed").unwrap();
        pending.complete().await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0], ("/submit".to_string(), r#"{"name":"Alice"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_missing_input_still_prevents_default() {
        let transport = FixedTransport::new(200, r#"{"message":"hi"}"#);
        let handler = handler_with(transport, r#"<form id="userForm"></form><p id="greeting"></p>"#);

        let mut event = SubmitEvent::new("userForm");
        let err = handler.handle(&mut event).await.err().unwrap();
        assert!(matches!(err, FormError::ElementNotFound(_)));
        assert!(!event.navigates());
    }

    #[tokio::test]
    async fn test_non_field_input_id_sends_nothing() {
        let transport = FixedTransport::new(200, r#"{"message":"hi"}"#);
        let handler = handler_with(
            transport.clone(),
            r#"<form id="userForm"><div id="name">Alice</div></form><p id="greeting"></p>"#,
        );

        let mut event = SubmitEvent::new("userForm");
        let err = handler.handle(&mut event).await.err().unwrap();
        assert!(matches!(err, FormError::ElementNotFound(_)));
        assert!(event.default_prevented());
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_writes_message() {
        let transport = FixedTransport::new(200, r#"{"message":"Hello, Alice!"}"#);
        let handler = handler_with(transport, crate::DEFAULT_PAGE);

        let pending = handler.handle(&mut SubmitEvent::new("userForm")).await.unwrap();
        pending.complete().await.unwrap();
        assert_eq!(handler.page().lock().await.text("greeting"), Some("Hello, Alice!"));
    }

    #[tokio::test]
    async fn test_error_status_is_not_inspected() {
        let transport = FixedTransport::new(500, r#"{"message":"still shown"}"#);
        let handler = handler_with(transport, crate::DEFAULT_PAGE);

        let pending = handler.handle(&mut SubmitEvent::new("userForm")).await.unwrap();
        pending.complete().await.unwrap();
        assert_eq!(handler.page().lock().await.text("greeting"), Some("still shown"));
    }

    #[tokio::test]
    async fn test_unparseable_body_leaves_page_untouched() {
        let transport = FixedTransport::new(200, "Internal Server Error");
        let handler = handler_with(transport, crate::DEFAULT_PAGE);
        handler.page().lock().await.set_text("greeting", "before").unwrap();

        let pending = handler.handle(&mut SubmitEvent::new("userForm")).await.unwrap();
        let err = pending.complete().await.unwrap_err();
        assert!(matches!(err, FormError::Json(_)));
        assert_eq!(handler.page().lock().await.text("greeting"), Some("before"));
    }

    #[tokio::test]
    async fn test_missing_display_element_fails_after_request() {
        let transport = FixedTransport::new(200, r#"{"message":"hi"}"#);
        let handler = handler_with(
            transport.clone(),
            r#"<form id="userForm"><input id="name"></form>"#,
        );

        let pending = handler.handle(&mut SubmitEvent::new("userForm")).await.unwrap();
        let err = pending.complete().await.unwrap_err();
        assert!(matches!(err, FormError::ElementNotFound(_)));
        assert_eq!(transport.seen.lock().unwrap().len(), 1);
    }
}
