//! Template resolution for order forms.
//!
//! Decides, for every text field of an order being authored, its value and
//! whether it is editable, locked or hidden. Layers are applied in order:
//! 1. Draft values typed by the administrator
//! 2. Collaborator directory match (identity and unit)
//! 3. Selected template

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Collaborator, OrderDraft, OrderField, OrderTemplate};

/// Where the resolved value of a field came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Draft,
    Collaborator,
    Template,
    /// Switched off by the template; value cleared.
    Disabled,
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Collaborator => write!(f, "collaborator"),
            Self::Template => write!(f, "template"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Input for form resolution.
#[derive(Debug, Clone, Default)]
pub struct FormResolutionInput {
    pub draft: OrderDraft,
    /// Directory entry matching the draft's CPF, if any
    pub collaborator: Option<Collaborator>,
    pub template: Option<OrderTemplate>,
}

/// Resolved form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedForm {
    pub values: OrderDraft,
    pub locked: BTreeSet<OrderField>,
    pub hidden: BTreeSet<OrderField>,
    pub sources: BTreeMap<OrderField, FieldSource>,
}

/// Per-field view of a resolved form, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub id: OrderField,
    pub label: String,
    pub value: String,
    pub locked: bool,
    pub visible: bool,
    pub source: FieldSource,
}

impl ResolvedForm {
    fn from_draft(draft: OrderDraft) -> Self {
        Self {
            values: draft,
            locked: BTreeSet::new(),
            hidden: BTreeSet::new(),
            sources: OrderField::ALL
                .iter()
                .map(|field| (*field, FieldSource::Draft))
                .collect(),
        }
    }

    pub fn is_locked(&self, field: OrderField) -> bool {
        self.locked.contains(&field)
    }

    pub fn is_visible(&self, field: OrderField) -> bool {
        !self.hidden.contains(&field)
    }

    /// Visible and not locked.
    pub fn is_editable(&self, field: OrderField) -> bool {
        self.is_visible(field) && !self.is_locked(field)
    }

    pub fn get(&self, field: OrderField) -> &str {
        self.values.get(field)
    }

    pub fn get_source(&self, field: OrderField) -> FieldSource {
        self.sources
            .get(&field)
            .copied()
            .unwrap_or(FieldSource::Draft)
    }

    /// Fields shown on the form, in form order.
    pub fn visible_fields(&self) -> Vec<OrderField> {
        OrderField::ALL
            .iter()
            .copied()
            .filter(|field| self.is_visible(*field))
            .collect()
    }

    /// Field states for rendering. Labels come from the template when it names the field.
    pub fn field_states(&self, template: Option<&OrderTemplate>) -> Vec<FieldState> {
        OrderField::ALL
            .iter()
            .map(|field| FieldState {
                id: *field,
                label: template
                    .and_then(|t| t.field(*field))
                    .map(|f| f.label.clone())
                    .unwrap_or_else(|| field.label().to_string()),
                value: self.get(*field).to_string(),
                locked: self.is_locked(*field),
                visible: self.is_visible(*field),
                source: self.get_source(*field),
            })
            .collect()
    }
}

/// Resolve the form state for an order draft.
///
/// Collaborator layer: name, role and unit are copied from the directory and
/// locked together with the CPF.
///
/// Template layer, per field:
/// - unknown ids are ignored
/// - identity fields and fields already locked by the collaborator are left alone
/// - inactive fields are hidden and cleared, except required ones which stay as drafted
/// - active fields with content overwrite the draft and are locked
/// - active fields without content stay editable
pub fn resolve_order_form(input: &FormResolutionInput) -> ResolvedForm {
    let mut result = ResolvedForm::from_draft(input.draft.clone());

    // 1. Collaborator identity
    if let Some(collaborator) = &input.collaborator {
        let identity = [
            (OrderField::Collaborator, collaborator.name.as_str()),
            (OrderField::Cpf, collaborator.cpf.as_str()),
            (OrderField::Role, collaborator.role.as_str()),
            (OrderField::Unit, collaborator.unit.as_str()),
        ];
        for (field, value) in identity {
            result.values.set(field, value);
            result.locked.insert(field);
            result.sources.insert(field, FieldSource::Collaborator);
        }
    }

    // 2. Template
    if let Some(template) = &input.template {
        for template_field in &template.fields {
            let Some(field) = template_field.order_field() else {
                continue;
            };
            if field.is_identity() || result.is_locked(field) {
                continue;
            }

            if !template_field.active {
                if field.is_required() {
                    continue;
                }
                result.values.set(field, "");
                result.hidden.insert(field);
                result.sources.insert(field, FieldSource::Disabled);
            } else if template_field.supplies_content() {
                result.values.set(field, template_field.content.clone());
                result.locked.insert(field);
                result.sources.insert(field, FieldSource::Template);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_fields, TemplateField};
    use chrono::Utc;

    fn template_with(fields: Vec<TemplateField>) -> OrderTemplate {
        OrderTemplate::new("Rio Centro".into(), "Modelo".into(), Some(fields), Utc::now()).unwrap()
    }

    fn field(id: &str, content: &str, active: bool) -> TemplateField {
        TemplateField {
            id: id.to_string(),
            label: id.to_string(),
            content: content.to_string(),
            active,
        }
    }

    fn sample_draft() -> OrderDraft {
        OrderDraft {
            company: "Empresa A Ltda".into(),
            unit: "Tijuca".into(),
            collaborator: "Fulano".into(),
            cpf: "123.456.789-00".into(),
            role: "Auxiliar".into(),
            obligations: "Digitado".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_empty_input() {
        let result = resolve_order_form(&FormResolutionInput::default());
        assert!(result.locked.is_empty());
        assert!(result.hidden.is_empty());
        assert_eq!(result.visible_fields(), OrderField::ALL.to_vec());
        assert_eq!(result.values, OrderDraft::default());
    }

    #[test]
    fn test_resolve_without_template_keeps_draft() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            ..Default::default()
        };
        let result = resolve_order_form(&input);
        assert_eq!(result.values, sample_draft());
        assert_eq!(result.get_source(OrderField::Obligations), FieldSource::Draft);
        assert!(OrderField::ALL.iter().all(|f| result.is_editable(*f)));
    }

    #[test]
    fn test_collaborator_prefills_and_locks_identity() {
        let input = FormResolutionInput {
            draft: OrderDraft {
                cpf: "12345678900".into(),
                ..Default::default()
            },
            collaborator: Some(Collaborator::new(
                "João da Silva",
                "123.456.789-00",
                "Auxiliar Administrativo",
                "Rio Centro",
            )),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Collaborator), "João da Silva");
        assert_eq!(result.get(OrderField::Role), "Auxiliar Administrativo");
        assert_eq!(result.get(OrderField::Unit), "Rio Centro");
        assert_eq!(result.get(OrderField::Cpf), "123.456.789-00");
        for field in [
            OrderField::Collaborator,
            OrderField::Cpf,
            OrderField::Role,
            OrderField::Unit,
        ] {
            assert!(result.is_locked(field));
            assert_eq!(result.get_source(field), FieldSource::Collaborator);
        }
        assert!(!result.is_locked(OrderField::Company));
    }

    #[test]
    fn test_active_field_with_content_is_locked() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template_with(vec![field("obrigacoes", "Usar EPIs", true)])),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Obligations), "Usar EPIs");
        assert!(result.is_locked(OrderField::Obligations));
        assert!(result.is_visible(OrderField::Obligations));
        assert_eq!(result.get_source(OrderField::Obligations), FieldSource::Template);
    }

    #[test]
    fn test_active_field_without_content_stays_editable() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template_with(vec![field("obrigacoes", "   ", true)])),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Obligations), "Digitado");
        assert!(result.is_editable(OrderField::Obligations));
        assert_eq!(result.get_source(OrderField::Obligations), FieldSource::Draft);
    }

    #[test]
    fn test_inactive_field_is_hidden_and_cleared() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template_with(vec![field("obrigacoes", "Ignorado", false)])),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert!(!result.is_visible(OrderField::Obligations));
        assert!(!result.visible_fields().contains(&OrderField::Obligations));
        assert_eq!(result.get(OrderField::Obligations), "");
        assert_eq!(result.get_source(OrderField::Obligations), FieldSource::Disabled);
    }

    #[test]
    fn test_inactive_required_fields_keep_drafted_values() {
        // Stored before required fields could not be switched off
        let mut template = template_with(vec![
            field("empresa", "", true),
            field("filial", "", true),
        ]);
        for entry in &mut template.fields {
            entry.active = false;
        }
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Company), "Empresa A Ltda");
        assert_eq!(result.get(OrderField::Unit), "Tijuca");
        assert!(result.is_editable(OrderField::Company));
        assert!(result.hidden.is_empty());
        assert!(result.values.ensure_complete().is_ok());
    }

    #[test]
    fn test_identity_fields_never_overridden() {
        let mut template = template_with(vec![
            field("colaborador", "Impostor", true),
            field("cpf", "999.999.999-99", true),
            field("funcao", "Diretor", true),
        ]);
        template.fields[2].active = false;
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Collaborator), "Fulano");
        assert_eq!(result.get(OrderField::Cpf), "123.456.789-00");
        assert_eq!(result.get(OrderField::Role), "Auxiliar");
        assert!(result.is_editable(OrderField::Collaborator));
        assert!(result.is_visible(OrderField::Role));
    }

    #[test]
    fn test_collaborator_unit_wins_over_template() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            collaborator: Some(Collaborator::new("Ana", "12345678900", "Técnica", "Ipanema")),
            template: Some(template_with(vec![field("filial", "Tijuca", true)])),
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.get(OrderField::Unit), "Ipanema");
        assert_eq!(result.get_source(OrderField::Unit), FieldSource::Collaborator);
    }

    #[test]
    fn test_unknown_field_ids_ignored() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template_with(vec![field("observacoes", "x", false)])),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert!(result.hidden.is_empty());
        assert!(result.locked.is_empty());
        assert_eq!(result.values, sample_draft());
    }

    #[test]
    fn test_default_template_changes_nothing() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template_with(default_fields())),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        assert_eq!(result.values, sample_draft());
        assert!(result.locked.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let input = FormResolutionInput {
            draft: sample_draft(),
            collaborator: Some(Collaborator::new("Ana", "12345678900", "Técnica", "Ipanema")),
            template: Some(template_with(vec![
                field("riscos", "Ruído", true),
                field("epis", "", false),
                field("penalidades", "", true),
            ])),
        };

        let first = resolve_order_form(&input);
        let second = resolve_order_form(&input);
        assert_eq!(first, second);

        let again = resolve_order_form(&FormResolutionInput {
            draft: first.values.clone(),
            ..input
        });
        assert_eq!(again.values, first.values);
    }

    #[test]
    fn test_field_states_use_template_labels() {
        let template = template_with(vec![TemplateField {
            id: "riscos".into(),
            label: "Riscos da Atividade".into(),
            content: "Ruído".into(),
            active: true,
        }]);
        let input = FormResolutionInput {
            draft: sample_draft(),
            template: Some(template.clone()),
            ..Default::default()
        };

        let result = resolve_order_form(&input);
        let states = result.field_states(Some(&template));
        assert_eq!(states.len(), OrderField::ALL.len());
        let risks = states.iter().find(|s| s.id == OrderField::Risks).unwrap();
        assert_eq!(risks.label, "Riscos da Atividade");
        assert!(risks.locked);
        let ppe = states.iter().find(|s| s.id == OrderField::Ppe).unwrap();
        assert_eq!(ppe.label, "EPIs");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(FieldSource::Template.to_string(), "template");
        assert_eq!(FieldSource::Disabled.to_string(), "disabled");
    }
}
