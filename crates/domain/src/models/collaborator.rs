//! Collaborator directory model.

use serde::{Deserialize, Serialize};
use shared::pagination::{PageLink, Pagination};
use validator::Validate;

/// A person who can be the subject of a service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Collaborator {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, max = 255, message = "Nome must be 1-255 characters"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_cpf"))]
    pub cpf: String,
    #[serde(rename = "funcao")]
    #[validate(length(min = 1, max = 255, message = "Funcao must be 1-255 characters"))]
    pub role: String,
    #[serde(rename = "filial")]
    #[validate(length(min = 1, max = 255, message = "Filial must be 1-255 characters"))]
    pub unit: String,
}

impl Collaborator {
    pub fn new(
        name: impl Into<String>,
        cpf: impl AsRef<str>,
        role: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cpf: shared::cpf::format_cpf(cpf.as_ref()),
            role: role.into(),
            unit: unit.into(),
        }
    }
}

/// Query parameters for searching the directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollaboratorsQuery {
    pub cpf: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "funcao")]
    pub role: Option<String>,
    #[serde(rename = "filial")]
    pub unit: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response for directory searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCollaboratorsResponse {
    pub data: Vec<Collaborator>,
    pub pagination: Pagination,
    pub links: Vec<PageLink>,
    /// Distinct roles in the directory, sorted, for filter dropdowns.
    pub roles: Vec<String>,
}
