use crate::page::{ElementHandle, Page, HIDDEN_CLASS, UPDATE_FORM_ID, UPDATE_TRIGGER_ID};

/// Reveals the update form in place of its trigger.
///
/// Forward-only: there is no operation that hides the form again. A missing
/// trigger or form is skipped silently.
#[derive(Debug, Clone, Default)]
pub struct FormToggle {
    trigger: Option<ElementHandle>,
    form: Option<ElementHandle>,
}

impl FormToggle {
    pub fn new(trigger: Option<ElementHandle>, form: Option<ElementHandle>) -> Self {
        Self { trigger, form }
    }

    pub fn from_page(page: &Page) -> Self {
        Self::new(page.element(UPDATE_TRIGGER_ID), page.element(UPDATE_FORM_ID))
    }

    /// Whether `id` names this toggle's trigger.
    pub fn is_trigger(&self, id: &str) -> bool {
        self.trigger
            .as_ref()
            .is_some_and(|t| t.borrow().id() == id)
    }

    pub fn show_update_form(&self) {
        if let Some(trigger) = &self.trigger {
            trigger.borrow_mut().add_class(HIDDEN_CLASS);
        }
        if let Some(form) = &self.form {
            form.borrow_mut().remove_class(HIDDEN_CLASS);
        }
        tracing::debug!("update form shown");
    }

    pub fn form_visible(&self) -> bool {
        self.form.as_ref().is_some_and(|f| !f.borrow().is_hidden())
    }
}
