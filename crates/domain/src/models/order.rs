//! Service order (Ordem de Servico) domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::cpf::{format_cpf, has_valid_length};
use shared::pagination::{PageLink, Pagination};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;
use crate::services::signature_capture::{PointerEvent, SurfaceDescriptor};

/// Lifecycle status of a service order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "assinada")]
    Signed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Signed => "assinada",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(Self::Pending),
            "assinada" => Ok(Self::Signed),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

/// Text fields of an order that a form can edit or a template can govern.
///
/// Serialized with the field identifiers used by templates and clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderField {
    #[serde(rename = "empresa")]
    Company,
    #[serde(rename = "filial")]
    Unit,
    #[serde(rename = "colaborador")]
    Collaborator,
    #[serde(rename = "cpf")]
    Cpf,
    #[serde(rename = "funcao")]
    Role,
    #[serde(rename = "riscos")]
    Risks,
    #[serde(rename = "epis")]
    Ppe,
    #[serde(rename = "obrigacoes")]
    Obligations,
    #[serde(rename = "proibicoes")]
    Prohibitions,
    #[serde(rename = "penalidades")]
    Penalties,
    #[serde(rename = "termoRecebimento")]
    Acknowledgment,
    #[serde(rename = "procedimentosAcidente")]
    AccidentProcedure,
}

impl OrderField {
    /// All fields in form order.
    pub const ALL: [OrderField; 12] = [
        Self::Company,
        Self::Unit,
        Self::Collaborator,
        Self::Cpf,
        Self::Role,
        Self::Risks,
        Self::Ppe,
        Self::Obligations,
        Self::Prohibitions,
        Self::Penalties,
        Self::Acknowledgment,
        Self::AccidentProcedure,
    ];

    /// Narrative sections in document order.
    pub const SECTIONS: [OrderField; 7] = [
        Self::Risks,
        Self::Ppe,
        Self::Obligations,
        Self::Prohibitions,
        Self::Penalties,
        Self::Acknowledgment,
        Self::AccidentProcedure,
    ];

    /// Field identifier as used by templates.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Company => "empresa",
            Self::Unit => "filial",
            Self::Collaborator => "colaborador",
            Self::Cpf => "cpf",
            Self::Role => "funcao",
            Self::Risks => "riscos",
            Self::Ppe => "epis",
            Self::Obligations => "obrigacoes",
            Self::Prohibitions => "proibicoes",
            Self::Penalties => "penalidades",
            Self::Acknowledgment => "termoRecebimento",
            Self::AccidentProcedure => "procedimentosAcidente",
        }
    }

    /// Form label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Company => "Empresa",
            Self::Unit => "Filial",
            Self::Collaborator => "Nome do Colaborador",
            Self::Cpf => "CPF",
            Self::Role => "Função",
            Self::Risks => "Riscos",
            Self::Ppe => "EPIs",
            Self::Obligations => "Obrigações do Colaborador",
            Self::Prohibitions => "Proibições",
            Self::Penalties => "Penalidades",
            Self::Acknowledgment => "Termo de Recebimento",
            Self::AccidentProcedure => "Procedimentos em Caso de Acidente",
        }
    }

    /// Section heading used in printable documents.
    pub fn document_title(&self) -> &'static str {
        match self {
            Self::Risks => "Riscos Identificados",
            Self::Ppe => "Equipamentos de Proteção Individual (EPIs)",
            Self::Acknowledgment => "Termo de Recebimento e Compromisso",
            other => other.label(),
        }
    }

    /// Looks a field up by its identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.id() == id)
    }

    /// Identity fields are never overridden or hidden by a template.
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Collaborator | Self::Cpf | Self::Role)
    }

    /// Required on every order. A template may fill these but never disable them.
    pub fn is_required(&self) -> bool {
        self.is_identity() || matches!(self, Self::Company | Self::Unit)
    }

    /// Sections that are always printed, even when empty.
    pub fn is_always_printed(&self) -> bool {
        matches!(self, Self::Risks | Self::Ppe)
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Editable contents of an order: everything except id, number, status and signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderDraft {
    #[serde(rename = "empresa")]
    #[validate(length(max = 255, message = "Empresa must be at most 255 characters"))]
    pub company: String,
    #[serde(rename = "filial")]
    #[validate(length(max = 255, message = "Filial must be at most 255 characters"))]
    pub unit: String,
    #[serde(rename = "colaborador")]
    #[validate(length(max = 255, message = "Colaborador must be at most 255 characters"))]
    pub collaborator: String,
    #[validate(length(max = 14, message = "CPF must be at most 14 characters"))]
    pub cpf: String,
    #[serde(rename = "funcao")]
    #[validate(length(max = 255, message = "Funcao must be at most 255 characters"))]
    pub role: String,
    #[serde(rename = "riscos")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub risks: String,
    #[serde(rename = "epis")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub ppe: String,
    #[serde(rename = "obrigacoes")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub obligations: String,
    #[serde(rename = "proibicoes")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub prohibitions: String,
    #[serde(rename = "penalidades")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub penalties: String,
    #[serde(rename = "termoRecebimento")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub acknowledgment: String,
    #[serde(rename = "procedimentosAcidente")]
    #[validate(length(max = 5000, message = "Section must be at most 5000 characters"))]
    pub accident_procedure: String,
    #[serde(rename = "dataEmissao", skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
}

impl OrderDraft {
    /// Returns the value of a text field.
    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Company => &self.company,
            OrderField::Unit => &self.unit,
            OrderField::Collaborator => &self.collaborator,
            OrderField::Cpf => &self.cpf,
            OrderField::Role => &self.role,
            OrderField::Risks => &self.risks,
            OrderField::Ppe => &self.ppe,
            OrderField::Obligations => &self.obligations,
            OrderField::Prohibitions => &self.prohibitions,
            OrderField::Penalties => &self.penalties,
            OrderField::Acknowledgment => &self.acknowledgment,
            OrderField::AccidentProcedure => &self.accident_procedure,
        }
    }

    /// Mutable access to a text field.
    pub fn get_mut(&mut self, field: OrderField) -> &mut String {
        match field {
            OrderField::Company => &mut self.company,
            OrderField::Unit => &mut self.unit,
            OrderField::Collaborator => &mut self.collaborator,
            OrderField::Cpf => &mut self.cpf,
            OrderField::Role => &mut self.role,
            OrderField::Risks => &mut self.risks,
            OrderField::Ppe => &mut self.ppe,
            OrderField::Obligations => &mut self.obligations,
            OrderField::Prohibitions => &mut self.prohibitions,
            OrderField::Penalties => &mut self.penalties,
            OrderField::Acknowledgment => &mut self.acknowledgment,
            OrderField::AccidentProcedure => &mut self.accident_procedure,
        }
    }

    /// Sets a text field. CPF values are reformatted as they are typed.
    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        let value = value.into();
        let value = if field == OrderField::Cpf {
            format_cpf(&value)
        } else {
            value
        };
        *self.get_mut(field) = value;
    }

    /// Checks that the draft can be stored as an order.
    ///
    /// Company, collaborator, CPF, role and unit are required and the CPF must
    /// have eleven digits.
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        for field in [
            OrderField::Company,
            OrderField::Collaborator,
            OrderField::Cpf,
            OrderField::Role,
            OrderField::Unit,
        ] {
            if self.get(field).trim().is_empty() {
                return Err(DomainError::MissingField(field));
            }
        }
        if !has_valid_length(&self.cpf) {
            return Err(DomainError::InvalidCpf);
        }
        Ok(())
    }
}

/// Signature data stamped on an order when it is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSignature {
    #[serde(rename = "assinatura")]
    pub signer: String,
    #[serde(rename = "dataAssinatura")]
    pub signed_at: DateTime<Utc>,
    /// PNG data URL of the hand-drawn signature.
    #[serde(rename = "assinaturaImagem", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Service order domain model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "filial")]
    pub unit: String,
    #[serde(rename = "colaborador")]
    pub collaborator: String,
    pub cpf: String,
    #[serde(rename = "funcao")]
    pub role: String,
    #[serde(rename = "riscos")]
    pub risks: String,
    #[serde(rename = "epis")]
    pub ppe: String,
    #[serde(rename = "obrigacoes")]
    pub obligations: String,
    #[serde(rename = "proibicoes")]
    pub prohibitions: String,
    #[serde(rename = "penalidades")]
    pub penalties: String,
    #[serde(rename = "termoRecebimento")]
    pub acknowledgment: String,
    #[serde(rename = "procedimentosAcidente")]
    pub accident_procedure: String,
    #[serde(rename = "dataEmissao")]
    pub issue_date: NaiveDate,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<OrderSignature>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    /// Creates a pending order from a draft.
    ///
    /// The CPF is stored formatted and a missing issue date defaults to the
    /// creation day.
    pub fn new(number: String, draft: OrderDraft, now: DateTime<Utc>) -> Self {
        let mut order = Self {
            id: Uuid::new_v4(),
            number,
            company: String::new(),
            unit: String::new(),
            collaborator: String::new(),
            cpf: String::new(),
            role: String::new(),
            risks: String::new(),
            ppe: String::new(),
            obligations: String::new(),
            prohibitions: String::new(),
            penalties: String::new(),
            acknowledgment: String::new(),
            accident_procedure: String::new(),
            issue_date: now.date_naive(),
            status: OrderStatus::Pending,
            signature: None,
            created_at: now,
            updated_at: now,
        };
        order.apply_draft(draft, now);
        order
    }

    /// Replaces the editable contents with those of the draft.
    pub fn apply_draft(&mut self, draft: OrderDraft, now: DateTime<Utc>) {
        self.cpf = format_cpf(&draft.cpf);
        self.company = draft.company;
        self.unit = draft.unit;
        self.collaborator = draft.collaborator;
        self.role = draft.role;
        self.risks = draft.risks;
        self.ppe = draft.ppe;
        self.obligations = draft.obligations;
        self.prohibitions = draft.prohibitions;
        self.penalties = draft.penalties;
        self.acknowledgment = draft.acknowledgment;
        self.accident_procedure = draft.accident_procedure;
        if let Some(date) = draft.issue_date {
            self.issue_date = date;
        }
        self.updated_at = now;
    }

    /// Returns the editable contents as a draft.
    pub fn to_draft(&self) -> OrderDraft {
        OrderDraft {
            company: self.company.clone(),
            unit: self.unit.clone(),
            collaborator: self.collaborator.clone(),
            cpf: self.cpf.clone(),
            role: self.role.clone(),
            risks: self.risks.clone(),
            ppe: self.ppe.clone(),
            obligations: self.obligations.clone(),
            prohibitions: self.prohibitions.clone(),
            penalties: self.penalties.clone(),
            acknowledgment: self.acknowledgment.clone(),
            accident_procedure: self.accident_procedure.clone(),
            issue_date: Some(self.issue_date),
        }
    }

    /// Returns the value of a text field.
    pub fn field(&self, field: OrderField) -> &str {
        match field {
            OrderField::Company => &self.company,
            OrderField::Unit => &self.unit,
            OrderField::Collaborator => &self.collaborator,
            OrderField::Cpf => &self.cpf,
            OrderField::Role => &self.role,
            OrderField::Risks => &self.risks,
            OrderField::Ppe => &self.ppe,
            OrderField::Obligations => &self.obligations,
            OrderField::Prohibitions => &self.prohibitions,
            OrderField::Penalties => &self.penalties,
            OrderField::Acknowledgment => &self.acknowledgment,
            OrderField::AccidentProcedure => &self.accident_procedure,
        }
    }

    /// Sections that belong in the printed document, in order.
    ///
    /// Risks and PPE are always included; other sections only when filled in.
    pub fn printable_sections(&self) -> Vec<(OrderField, &str)> {
        OrderField::SECTIONS
            .iter()
            .map(|field| (*field, self.field(*field)))
            .filter(|(field, value)| field.is_always_printed() || !value.trim().is_empty())
            .collect()
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_signed(&self) -> bool {
        self.status == OrderStatus::Signed
    }

    /// Marks the order as signed. Fails if it already was.
    pub fn sign(&mut self, signature: OrderSignature) -> Result<(), DomainError> {
        if self.is_signed() {
            return Err(DomainError::OrderAlreadySigned);
        }
        self.updated_at = signature.signed_at;
        self.status = OrderStatus::Signed;
        self.signature = Some(signature);
        Ok(())
    }

    /// Fails if the order can no longer be edited or deleted.
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.is_signed() {
            Err(DomainError::OrderAlreadySigned)
        } else {
            Ok(())
        }
    }
}

/// Request body shared by order creation, update and form preview.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderFormRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub draft: OrderDraft,
    /// Template applied to the draft before saving.
    pub template_id: Option<Uuid>,
}

/// Request to create pending orders for several collaborators at once.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateOrdersRequest {
    #[validate(length(min = 1, max = 100, message = "Selecione pelo menos um colaborador."))]
    pub cpfs: Vec<String>,
    /// Values shared by every created order. Identity fields are taken from the directory.
    #[serde(flatten)]
    #[validate(nested)]
    pub shared: OrderDraft,
    pub template_id: Option<Uuid>,
}

/// A collaborator for whom no order was created during a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSkippedOrder {
    pub cpf: String,
    pub reason: String,
}

/// Response for bulk order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateOrdersResponse {
    pub created: Vec<ServiceOrder>,
    pub skipped: Vec<BulkSkippedOrder>,
}

/// Query parameters for listing orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub name: Option<String>,
    pub cpf: Option<String>,
    #[serde(rename = "filial")]
    pub unit: Option<String>,
    pub status: Option<OrderStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Response for listing orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersResponse {
    pub data: Vec<ServiceOrder>,
    pub pagination: Pagination,
    pub links: Vec<PageLink>,
}

/// Request sent by the signer to sign their pending order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignOrderRequest {
    /// The signer confirmed reading the whole document.
    #[serde(default)]
    pub confirm_read: bool,
    /// Name to record as signer; defaults to the collaborator's name.
    #[validate(length(min = 1, max = 255, message = "Signer must be 1-255 characters"))]
    pub signer: Option<String>,
    pub surface: SurfaceDescriptor,
    #[validate(length(max = 20000, message = "Too many pointer events"))]
    #[serde(default)]
    pub events: Vec<PointerEvent>,
}
