//! In-process page model the submission handler reads from and writes to.
//!
//! Markup is parsed once with `scraper`; every element carrying an `id`
//! becomes addressable by that id, the way `getElementById` resolves it
//! (first element in document order wins).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use scraper::{Html, Selector};
use tokio::sync::Mutex;

use crate::types::{FormError, FormResult};

/// Markup with the `userForm` form, `name` input and `greeting` element.
pub const DEFAULT_PAGE: &str = include_str!("../static/index.html");

/// Page shared between the dispatcher and in-flight submissions.
pub type SharedPage = Arc<Mutex<FormPage>>;

/// An addressable element of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub id: String,
    /// Lower-case tag name (`form`, `input`, `p`, ...).
    pub tag: String,
    /// Current value for form fields (`input`, `textarea`), `None` otherwise.
    pub value: Option<String>,
    /// Rendered text content.
    pub text: String,
}

impl PageElement {
    fn is_field(&self) -> bool {
        self.value.is_some()
    }
}

/// Document model indexed by element id.
#[derive(Debug, Clone, Default)]
pub struct FormPage {
    elements: HashMap<String, PageElement>,
    order: Vec<String>,
}

impl FormPage {
    /// Parse markup into a page.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let mut page = Self::default();
        let Ok(id_sel) = Selector::parse("[id]") else {
            return page;
        };
        for el in document.select(&id_sel) {
            let Some(id) = el.value().attr("id") else {
                continue;
            };
            if page.elements.contains_key(id) {
                continue;
            }

            let tag = el.value().name().to_ascii_lowercase();
            let text = el.text().collect::<Vec<_>>().join("").trim().to_string();
            let value = match tag.as_str() {
                "input" => Some(el.value().attr("value").unwrap_or("").to_string()),
                "textarea" => Some(el.text().collect::<String>()),
                _ => None,
            };

            page.order.push(id.to_string());
            page.elements.insert(
                id.to_string(),
                PageElement {
                    id: id.to_string(),
                    tag,
                    value,
                    text,
                },
            );
        }

        tracing::debug!("Parsed page with {} addressable elements", page.order.len());
        page
    }

    /// Read and parse markup from a file.
    pub fn load(path: impl AsRef<Path>) -> FormResult<Self> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path).map_err(|e| {
            FormError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read page {}: {e}", path.display()),
            ))
        })?;
        Ok(Self::parse(&html))
    }

    /// The embedded default page.
    pub fn default_page() -> Self {
        Self::parse(DEFAULT_PAGE)
    }

    /// Wrap the page for sharing with submission tasks.
    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    /// Get an element by id.
    pub fn element(&self, id: &str) -> Option<&PageElement> {
        self.elements.get(id)
    }

    /// All addressable elements in document order.
    pub fn elements(&self) -> Vec<&PageElement> {
        self.order
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect()
    }

    /// Whether a `<form>` with this id exists.
    pub fn has_form(&self, id: &str) -> bool {
        self.element(id).is_some_and(|el| el.tag == "form")
    }

    /// Current value of a form field. `None` if the id is missing or not a field.
    pub fn value(&self, id: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.value.as_deref())
    }

    /// Set the value of a form field, as typing into it would.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> FormResult<()> {
        match self.elements.get_mut(id) {
            Some(el) if el.is_field() => {
                el.value = Some(value.into());
                Ok(())
            }
            _ => Err(FormError::ElementNotFound(format!("field '{id}'"))),
        }
    }

    /// Current text content of an element.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.element(id).map(|el| el.text.as_str())
    }

    /// Overwrite the text content of an element.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> FormResult<()> {
        let el = self
            .elements
            .get_mut(id)
            .ok_or_else(|| FormError::ElementNotFound(format!("element '{id}'")))?;
        el.text = text.into();
        Ok(())
    }
}
