//! Filtering for the order list and the collaborator directory.

use shared::cpf::normalize_cpf;

use crate::models::order::ListOrdersQuery;
use crate::models::collaborator::ListCollaboratorsQuery;
use crate::models::{Collaborator, OrderStatus, ServiceOrder};

/// Criteria for the order list. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive substring of the collaborator name
    pub name: Option<String>,
    /// Substring of the CPF, formatted or digits only
    pub cpf: Option<String>,
    /// Exact unit
    pub unit: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        contains_ignore_case(&order.collaborator, self.name.as_deref())
            && cpf_contains(&order.cpf, self.cpf.as_deref())
            && equals(&order.unit, self.unit.as_deref())
            && self.status.map_or(true, |status| order.status == status)
    }

    /// Filters and sorts by order number.
    pub fn apply<'a, I>(&self, orders: I) -> Vec<ServiceOrder>
    where
        I: IntoIterator<Item = &'a ServiceOrder>,
    {
        let mut matched: Vec<ServiceOrder> = orders
            .into_iter()
            .filter(|order| self.matches(order))
            .cloned()
            .collect();
        matched.sort_by(|a, b| compare_numbers(&a.number, &b.number));
        matched
    }
}

impl From<&ListOrdersQuery> for OrderFilter {
    fn from(query: &ListOrdersQuery) -> Self {
        Self {
            name: non_blank(query.name.as_deref()),
            cpf: non_blank(query.cpf.as_deref()),
            unit: non_blank(query.unit.as_deref()),
            status: query.status,
        }
    }
}

/// Criteria for the collaborator directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorFilter {
    pub cpf: Option<String>,
    pub name: Option<String>,
    /// Case-insensitive substring of the role
    pub role: Option<String>,
    pub unit: Option<String>,
}

impl CollaboratorFilter {
    pub fn matches(&self, collaborator: &Collaborator) -> bool {
        cpf_contains(&collaborator.cpf, self.cpf.as_deref())
            && contains_ignore_case(&collaborator.name, self.name.as_deref())
            && contains_ignore_case(&collaborator.role, self.role.as_deref())
            && equals(&collaborator.unit, self.unit.as_deref())
    }
}

impl From<&ListCollaboratorsQuery> for CollaboratorFilter {
    fn from(query: &ListCollaboratorsQuery) -> Self {
        Self {
            cpf: non_blank(query.cpf.as_deref()),
            name: non_blank(query.name.as_deref()),
            role: non_blank(query.role.as_deref()),
            unit: non_blank(query.unit.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn equals(value: &str, expected: Option<&str>) -> bool {
    expected.map_or(true, |expected| value == expected)
}

fn cpf_contains(cpf: &str, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    if cpf.contains(needle) {
        return true;
    }
    let digits = normalize_cpf(needle);
    !digits.is_empty() && normalize_cpf(cpf).contains(&digits)
}

fn compare_numbers(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
