//! greeting-form — posts a form field as JSON and renders the returned greeting.
//!
//! A [`FormPage`] stands in for the browser document. Firing a submit event
//! through a [`FormDispatcher`] runs the [`SubmissionHandler`]: default
//! navigation is prevented, the `name` field is sent to `POST /submit`, and
//! the reply's `message` overwrites the `greeting` element's text.

pub mod config;
pub mod dispatch;
pub mod event;
pub mod handler;
pub mod page;
pub mod transport;
pub mod types;

pub use config::{resolve_base_url, FormConfig};
pub use dispatch::{FormDispatcher, Submission};
pub use event::SubmitEvent;
pub use handler::{PendingSubmission, SubmissionHandler};
pub use page::{FormPage, PageElement, SharedPage, DEFAULT_PAGE};
pub use transport::{HttpTransport, SubmitTransport, TransportPtr, TransportReply};
pub use types::*;
