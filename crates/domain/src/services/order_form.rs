//! Order authoring session.
//!
//! Holds the administrator's raw input together with the selected template and
//! collaborator match, and keeps the resolved form state in sync with them.

use crate::errors::DomainError;
use crate::models::{Collaborator, OrderDraft, OrderField, OrderTemplate};
use crate::services::template_resolution::{
    resolve_order_form, FormResolutionInput, ResolvedForm,
};

/// An order form being filled in.
#[derive(Debug, Clone)]
pub struct OrderForm {
    input: FormResolutionInput,
    resolved: ResolvedForm,
}

impl OrderForm {
    /// Starts a session from an initial draft with no template or collaborator.
    pub fn new(draft: OrderDraft) -> Self {
        let input = FormResolutionInput {
            draft,
            ..Default::default()
        };
        let resolved = resolve_order_form(&input);
        Self { input, resolved }
    }

    /// Current resolved state.
    pub fn resolved(&self) -> &ResolvedForm {
        &self.resolved
    }

    pub fn template(&self) -> Option<&OrderTemplate> {
        self.input.template.as_ref()
    }

    pub fn collaborator(&self) -> Option<&Collaborator> {
        self.input.collaborator.as_ref()
    }

    /// Sets the collaborator matched for the draft's CPF (or clears the match).
    pub fn set_collaborator(&mut self, collaborator: Option<Collaborator>) {
        self.input.collaborator = collaborator;
        self.refresh();
    }

    /// Switches the selected template.
    ///
    /// When a template was already selected, every non-identity field is reset
    /// to empty first, whether or not that template mentioned it. Nothing typed
    /// under the old selection carries over. Selecting `None` leaves all fields
    /// visible and editable. The first selection keeps the draft as entered.
    pub fn select_template(&mut self, template: Option<OrderTemplate>) {
        if self.input.template.take().is_some() {
            for field in OrderField::ALL.iter().filter(|f| !f.is_identity()) {
                self.input.draft.set(*field, "");
            }
        }
        self.input.template = template;
        self.refresh();
    }

    /// Edits a field, rejecting locked and hidden ones.
    pub fn set_field(&mut self, field: OrderField, value: impl Into<String>) -> Result<(), DomainError> {
        if !self.resolved.is_visible(field) {
            return Err(DomainError::FieldHidden(field));
        }
        if self.resolved.is_locked(field) {
            return Err(DomainError::FieldLocked(field));
        }
        self.input.draft.set(field, value);
        self.refresh();
        Ok(())
    }

    /// Sets the issue date. Dates are never template-governed.
    pub fn set_issue_date(&mut self, date: chrono::NaiveDate) {
        self.input.draft.issue_date = Some(date);
        self.refresh();
    }

    /// Consumes the session and returns the resolved values.
    pub fn into_values(self) -> OrderDraft {
        self.resolved.values
    }

    fn refresh(&mut self) {
        self.resolved = resolve_order_form(&self.input);
    }
}
