//! Collaborator directory repository.

use domain::models::Collaborator;
use domain::services::CollaboratorFilter;
use domain::DomainError;
use shared::cpf::{format_cpf, has_valid_length, same_cpf};
use shared::pagination::{paginate, Page, PageRequest};

use crate::metrics::StoreTimer;
use crate::store::Store;

/// Repository for the collaborator directory.
#[derive(Clone)]
pub struct CollaboratorRepository {
    store: Store,
}

impl CollaboratorRepository {
    /// Creates a new CollaboratorRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Find a collaborator by CPF, ignoring formatting.
    pub async fn find_by_cpf(&self, cpf: &str) -> Option<Collaborator> {
        let timer = StoreTimer::new("find_collaborator_by_cpf");
        let result = self
            .store
            .read()
            .await
            .collaborators
            .iter()
            .find(|c| same_cpf(&c.cpf, cpf))
            .cloned();
        timer.record();
        result
    }

    /// Search the directory in stored order, one page at a time.
    pub async fn search(&self, filter: &CollaboratorFilter, page: PageRequest) -> Page<Collaborator> {
        let timer = StoreTimer::new("search_collaborators");
        let matched: Vec<Collaborator> = self
            .store
            .read()
            .await
            .collaborators
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        timer.record();
        paginate(matched, page)
    }

    /// Insert a collaborator, replacing any entry with the same CPF.
    pub async fn insert(&self, mut collaborator: Collaborator) -> Result<Collaborator, DomainError> {
        if !has_valid_length(&collaborator.cpf) {
            return Err(DomainError::InvalidCpf);
        }
        collaborator.cpf = format_cpf(&collaborator.cpf);

        let mut state = self.store.write().await;
        match state
            .collaborators
            .iter_mut()
            .find(|c| same_cpf(&c.cpf, &collaborator.cpf))
        {
            Some(existing) => *existing = collaborator.clone(),
            None => state.collaborators.push(collaborator.clone()),
        }
        Ok(collaborator)
    }

    /// Distinct roles, sorted.
    pub async fn roles(&self) -> Vec<String> {
        let state = self.store.read().await;
        let mut roles: Vec<String> = state.collaborators.iter().map(|c| c.role.clone()).collect();
        roles.sort();
        roles.dedup();
        roles
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.collaborators.len()
    }
}
