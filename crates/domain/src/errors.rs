//! Domain error types.

use thiserror::Error;

use crate::models::OrderField;

/// Errors raised by domain rules before any state is mutated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Já existe uma OS pendente para o CPF {cpf}")]
    PendingOrderExists { cpf: String },

    #[error("Esta OS já foi assinada e não pode ser alterada ou excluída")]
    OrderAlreadySigned,

    #[error("Por favor, digite um CPF válido com 11 dígitos.")]
    InvalidCpf,

    #[error("O campo {} é obrigatório", .0.label())]
    MissingField(OrderField),

    #[error("Duplicate template field id: {0}")]
    DuplicateFieldId(String),

    #[error("O campo {} é obrigatório e não pode ser desativado no modelo", .0.label())]
    RequiredFieldInactive(OrderField),

    #[error("O campo {} é definido pelo modelo e não pode ser editado", .0.label())]
    FieldLocked(OrderField),

    #[error("O campo {} está desativado no modelo selecionado", .0.label())]
    FieldHidden(OrderField),

    #[error("Filial desconhecida: {0}")]
    UnknownUnit(String),

    #[error("Adicione sua assinatura antes de confirmar")]
    SignatureMissing,

    #[error("Confirme a leitura do documento e adicione sua assinatura.")]
    ReadNotConfirmed,
}

impl DomainError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::PendingOrderExists { .. } => "pending_order_exists",
            Self::OrderAlreadySigned => "order_already_signed",
            Self::InvalidCpf => "invalid_cpf",
            Self::MissingField(_) => "missing_field",
            Self::DuplicateFieldId(_) => "duplicate_field_id",
            Self::RequiredFieldInactive(_) => "required_field_inactive",
            Self::FieldLocked(_) => "field_locked",
            Self::FieldHidden(_) => "field_hidden",
            Self::UnknownUnit(_) => "unknown_unit",
            Self::SignatureMissing => "signature_missing",
            Self::ReadNotConfirmed => "read_not_confirmed",
        }
    }
}
