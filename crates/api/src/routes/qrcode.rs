//! QR codes pointing collaborators at the signing screen.

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use shared::cpf::{format_cpf, has_valid_length};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::{render_qr_data_url, render_qr_png, render_qr_sheet_html, signature_url};

#[derive(Debug, Default, Deserialize)]
pub struct QrCodeQuery {
    pub cpf: Option<String>,
}

impl QrCodeQuery {
    /// Blank CPFs select the generic entry; complete ones are formatted.
    fn cpf(&self) -> Option<String> {
        let cpf = self.cpf.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some(if has_valid_length(cpf) {
            format_cpf(cpf)
        } else {
            cpf.to_string()
        })
    }
}

/// QR code image for a CPF's signing link.
///
/// GET /api/v1/qrcode
pub async fn qrcode_png(
    State(state): State<AppState>,
    Query(query): Query<QrCodeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let link = signature_url(state.config.public_base_url(), query.cpf().as_deref());
    let png = render_qr_png(&link, state.config.qr_options())?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Printable sheet with the QR code, the CPF and the link.
///
/// GET /api/v1/qrcode/sheet
pub async fn qrcode_sheet(
    State(state): State<AppState>,
    Query(query): Query<QrCodeQuery>,
) -> Result<Html<String>, ApiError> {
    let cpf = query.cpf();
    let link = signature_url(state.config.public_base_url(), cpf.as_deref());
    let qr = render_qr_data_url(&link, state.config.qr_options())?;
    Ok(Html(render_qr_sheet_html(cpf.as_deref(), &link, &qr)))
}
