//! QR codes linking to the signing screen.

use image::{GrayImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use super::documents::DocumentError;

/// Rendering options for QR images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    /// Minimum image width in pixels
    pub size: u32,
    /// Surround the code with the standard four-module quiet zone
    pub quiet_zone: bool,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 200,
            quiet_zone: true,
        }
    }
}

/// Link encoded in the QR code: the signing screen for a CPF, or the
/// generic signer entry when no CPF is given.
pub fn signature_url(public_base_url: &str, cpf: Option<&str>) -> String {
    let base = public_base_url.trim_end_matches('/');
    match cpf.map(str::trim).filter(|c| !c.is_empty()) {
        Some(cpf) => format!("{}/signature/{}", base, urlencoding::encode(cpf)),
        None => format!("{}/signature", base),
    }
}

/// Renders a payload as a black-on-white QR bitmap.
///
/// The renderer scales modules by a whole number of pixels, so the image is at
/// least `options.size` wide and never blurred.
pub fn render_qr(payload: &str, options: QrOptions) -> Result<GrayImage, DocumentError> {
    let code = QrCode::new(payload.as_bytes())?;
    Ok(code
        .render::<Luma<u8>>()
        .quiet_zone(options.quiet_zone)
        .min_dimensions(options.size, options.size)
        .build())
}

/// Renders a payload as PNG bytes.
pub fn render_qr_png(payload: &str, options: QrOptions) -> Result<Vec<u8>, DocumentError> {
    let image = render_qr(payload, options)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders a payload as a PNG data URL for inline `<img>` tags.
pub fn render_qr_data_url(payload: &str, options: QrOptions) -> Result<String, DocumentError> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let png = render_qr_png(payload, options)?;
    Ok(format!(
        "{}{}",
        shared::validation::PNG_DATA_URL_PREFIX,
        STANDARD.encode(png)
    ))
}
