//! Document rendering services.

pub mod documents;
pub mod qr_code;

pub use documents::{render_order_html, render_order_pdf, render_qr_sheet_html, DocumentError};
pub use qr_code::{render_qr, render_qr_data_url, render_qr_png, signature_url, QrOptions};
