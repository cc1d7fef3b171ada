//! Order template repository.

use chrono::Utc;
use domain::models::template::{ensure_valid_fields, UpdateTemplateRequest};
use domain::models::{OrderTemplate, TemplateField};
use domain::DomainError;
use uuid::Uuid;

use crate::metrics::{record_store_sizes, StoreTimer};
use crate::store::{Store, StoreState};

/// Repository for order templates.
#[derive(Clone)]
pub struct TemplateRepository {
    store: Store,
}

impl TemplateRepository {
    /// Creates a new TemplateRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a template for a known unit.
    pub async fn create(
        &self,
        unit: String,
        name: String,
        fields: Option<Vec<TemplateField>>,
    ) -> Result<OrderTemplate, DomainError> {
        let timer = StoreTimer::new("create_template");

        let mut state = self.store.write().await;
        ensure_known_unit(&state, &unit)?;
        let template = OrderTemplate::new(unit, name, fields, Utc::now())?;
        state.templates.push(template.clone());
        record_store_sizes(&state);

        timer.record();
        Ok(template)
    }

    /// Apply the provided changes to a template.
    ///
    /// Orders already authored from it are not affected.
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateTemplateRequest,
    ) -> Result<OrderTemplate, DomainError> {
        let timer = StoreTimer::new("update_template");

        let mut state = self.store.write().await;
        if let Some(unit) = &changes.unit {
            ensure_known_unit(&state, unit)?;
        }
        if let Some(fields) = &changes.fields {
            ensure_valid_fields(fields)?;
        }

        let template = state
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::NotFound("Template"))?;
        if let Some(unit) = changes.unit {
            template.unit = unit;
        }
        if let Some(name) = changes.name {
            template.name = name;
        }
        if let Some(fields) = changes.fields {
            template.fields = fields;
        }
        let updated = template.clone();

        timer.record();
        Ok(updated)
    }

    /// Delete a template.
    pub async fn delete(&self, id: Uuid) -> Result<OrderTemplate, DomainError> {
        let timer = StoreTimer::new("delete_template");

        let mut state = self.store.write().await;
        let index = state
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(DomainError::NotFound("Template"))?;
        let removed = state.templates.remove(index);
        record_store_sizes(&state);

        timer.record();
        Ok(removed)
    }

    /// Find a template by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Option<OrderTemplate> {
        let timer = StoreTimer::new("find_template_by_id");
        let result = self
            .store
            .read()
            .await
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned();
        timer.record();
        result
    }

    /// First template created for a unit.
    pub async fn find_by_unit(&self, unit: &str) -> Option<OrderTemplate> {
        let timer = StoreTimer::new("find_template_by_unit");
        let result = self
            .store
            .read()
            .await
            .templates
            .iter()
            .find(|t| t.unit == unit)
            .cloned();
        timer.record();
        result
    }

    /// List templates, optionally for a single unit, in creation order.
    pub async fn list(&self, unit: Option<&str>) -> Vec<OrderTemplate> {
        let timer = StoreTimer::new("list_templates");
        let result = self
            .store
            .read()
            .await
            .templates
            .iter()
            .filter(|t| unit.map_or(true, |u| t.unit == u))
            .cloned()
            .collect();
        timer.record();
        result
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.templates.len()
    }
}

fn ensure_known_unit(state: &StoreState, unit: &str) -> Result<(), DomainError> {
    if state.units.iter().any(|u| u == unit) {
        Ok(())
    } else {
        Err(DomainError::UnknownUnit(unit.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::default_fields;

    fn repo() -> TemplateRepository {
        TemplateRepository::new(Store::new(vec![
            "Rio Centro".into(),
            "Tijuca".into(),
        ]))
    }

    #[tokio::test]
    async fn test_create_with_default_fields() {
        let repo = repo();
        let template = repo
            .create("Rio Centro".into(), "Modelo Padrão".into(), None)
            .await
            .unwrap();
        assert_eq!(template.fields, default_fields());
        assert_eq!(repo.find_by_id(template.id).await, Some(template));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_unit() {
        let repo = repo();
        let result = repo.create("Niterói".into(), "Modelo".into(), None).await;
        assert_eq!(result, Err(DomainError::UnknownUnit("Niterói".into())));
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_properties() {
        let repo = repo();
        let template = repo
            .create("Rio Centro".into(), "Modelo".into(), None)
            .await
            .unwrap();

        let mut fields = default_fields();
        fields[0].content = "Usar EPIs".into();
        let updated = repo
            .update(
                template.id,
                UpdateTemplateRequest {
                    name: Some("Modelo Revisado".into()),
                    fields: Some(fields.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Modelo Revisado");
        assert_eq!(updated.unit, "Rio Centro");
        assert_eq!(updated.fields, fields);
    }

    #[tokio::test]
    async fn test_update_rejects_duplicate_ids_and_unknown_unit() {
        let repo = repo();
        let template = repo
            .create("Rio Centro".into(), "Modelo".into(), None)
            .await
            .unwrap();

        let duplicate = vec![
            TemplateField::new("riscos", "Riscos"),
            TemplateField::new("riscos", "Riscos"),
        ];
        let result = repo
            .update(
                template.id,
                UpdateTemplateRequest {
                    fields: Some(duplicate),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(result, Err(DomainError::DuplicateFieldId("riscos".into())));

        let result = repo
            .update(
                template.id,
                UpdateTemplateRequest {
                    unit: Some("Leblon".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(result, Err(DomainError::UnknownUnit("Leblon".into())));
    }

    #[tokio::test]
    async fn test_find_by_unit_and_list() {
        let repo = repo();
        let rio = repo
            .create("Rio Centro".into(), "A".into(), None)
            .await
            .unwrap();
        repo.create("Tijuca".into(), "B".into(), None).await.unwrap();

        assert_eq!(repo.find_by_unit("Rio Centro").await.map(|t| t.id), Some(rio.id));
        assert!(repo.find_by_unit("Méier").await.is_none());
        assert_eq!(repo.list(None).await.len(), 2);
        assert_eq!(repo.list(Some("Tijuca")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo();
        let template = repo
            .create("Rio Centro".into(), "A".into(), None)
            .await
            .unwrap();
        repo.delete(template.id).await.unwrap();
        assert!(repo.find_by_id(template.id).await.is_none());
        assert_eq!(
            repo.delete(template.id).await,
            Err(DomainError::NotFound("Template"))
        );
    }
}
