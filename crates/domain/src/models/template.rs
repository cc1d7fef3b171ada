//! Order template domain model.
//!
//! A template is a named, per-unit set of field defaults. Each field either
//! supplies fixed content, leaves the field open for editing, or switches it off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;
use crate::models::OrderField;

/// A single field definition within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplateField {
    /// Order field identifier this entry governs (e.g. `obrigacoes`).
    #[validate(regex(path = "*FIELD_ID_REGEX", message = "Field id must be alphanumeric camelCase"))]
    pub id: String,
    #[validate(length(min = 1, max = 255, message = "Label must be 1-255 characters"))]
    pub label: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Content must be at most 5000 characters"))]
    pub content: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TemplateField {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            content: String::new(),
            active: true,
        }
    }

    /// The order field this entry refers to, if the id is known.
    pub fn order_field(&self) -> Option<OrderField> {
        OrderField::from_id(&self.id)
    }

    /// Active with non-blank content: the template dictates the value.
    pub fn supplies_content(&self) -> bool {
        self.active && !self.content.trim().is_empty()
    }
}

/// Order template domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTemplate {
    pub id: Uuid,
    #[serde(rename = "filial")]
    pub unit: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub fields: Vec<TemplateField>,
    pub created_at: DateTime<Utc>,
}

impl OrderTemplate {
    /// Creates a template, falling back to [`default_fields`] when none are given.
    pub fn new(
        unit: String,
        name: String,
        fields: Option<Vec<TemplateField>>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let fields = fields.unwrap_or_else(default_fields);
        ensure_valid_fields(&fields)?;
        Ok(Self {
            id: Uuid::new_v4(),
            unit,
            name,
            fields,
            created_at: now,
        })
    }

    /// Looks up the template entry for an order field.
    pub fn field(&self, field: OrderField) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.id == field.id())
    }
}

/// The default field set offered when creating a template.
pub fn default_fields() -> Vec<TemplateField> {
    [
        OrderField::Obligations,
        OrderField::Prohibitions,
        OrderField::Penalties,
        OrderField::Acknowledgment,
        OrderField::AccidentProcedure,
    ]
    .iter()
    .map(|field| TemplateField::new(field.id(), field.label()))
    .collect()
}

/// Fails on the first repeated field id or on a required field switched off.
pub fn ensure_valid_fields(fields: &[TemplateField]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.id.as_str()) {
            return Err(DomainError::DuplicateFieldId(field.id.clone()));
        }
        if let Some(order_field) = field.order_field() {
            if !field.active && order_field.is_required() {
                return Err(DomainError::RequiredFieldInactive(order_field));
            }
        }
    }
    Ok(())
}

fn validate_template_fields(fields: &[TemplateField]) -> Result<(), validator::ValidationError> {
    ensure_valid_fields(fields).map_err(|e| {
        validator::ValidationError::new(e.code())
            .with_message(std::borrow::Cow::Owned(e.to_string()))
    })
}

/// Request to create a template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[serde(rename = "filial")]
    #[validate(length(min = 1, max = 255, message = "Filial must be 1-255 characters"))]
    pub unit: String,
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 255, message = "Nome must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "A template can have at most 50 fields"))]
    #[validate(custom(function = "validate_template_fields"))]
    #[validate(nested)]
    pub fields: Option<Vec<TemplateField>>,
}

/// Request to update a template. Omitted properties are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[serde(rename = "filial")]
    #[validate(length(min = 1, max = 255, message = "Filial must be 1-255 characters"))]
    pub unit: Option<String>,
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 255, message = "Nome must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 50, message = "A template can have at most 50 fields"))]
    #[validate(custom(function = "validate_template_fields"))]
    #[validate(nested)]
    pub fields: Option<Vec<TemplateField>>,
}

/// Query parameters for listing templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesQuery {
    #[serde(rename = "filial")]
    pub unit: Option<String>,
}

/// Response for listing templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTemplatesResponse {
    pub data: Vec<OrderTemplate>,
}

// camelCase identifiers such as `termoRecebimento`
lazy_static::lazy_static! {
    pub static ref FIELD_ID_REGEX: regex::Regex = regex::Regex::new(r"^[a-z][A-Za-z0-9]{0,63}$").unwrap();
}
