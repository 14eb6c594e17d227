//! Submit event fired by the dispatcher.

use uuid::Uuid;

/// A form submission event.
///
/// The form's default action (navigating to the form target) runs unless a
/// handler calls [`SubmitEvent::prevent_default`].
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    id: Uuid,
    form_id: String,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
            default_prevented: false,
        }
    }

    /// Identifier used to correlate log lines for one submission.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether dispatching this event ends in a page navigation.
    pub fn navigates(&self) -> bool {
        !self.default_prevented
    }
}
