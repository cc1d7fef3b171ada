//! Printable order documents.
//!
//! The HTML document is what the admin and the signer print; the PDF carries
//! the same sections in the same order.

use domain::models::{OrderField, ServiceOrder};
use domain::services::signature_capture::decode_data_url;
use domain::services::SignatureError;
use image::{GrayImage, RgbImage};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("QR code error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("PDF error: {0}")]
    Pdf(String),
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

const DOCUMENT_TITLE: &str = "ORDEM DE SERVIÇO";
const SIGNED_BANNER: &str = "DOCUMENTO ASSINADO DIGITALMENTE";
const SIGNATURE_LINE_CAPTION: &str = "Assinatura do Colaborador";

/// Escapes text for HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn pt_br_date(date: chrono::NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

const STYLE: &str = r#"
  body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.4; }
  .header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 20px; margin-bottom: 30px; }
  .title { font-size: 24px; font-weight: bold; margin-bottom: 10px; }
  .info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-bottom: 30px; }
  .label { font-weight: bold; margin-bottom: 5px; }
  .value { border-bottom: 1px solid #ccc; padding-bottom: 2px; }
  .section { margin-bottom: 25px; }
  .section-title { font-size: 16px; font-weight: bold; margin-bottom: 10px; color: #333; }
  .content { border: 1px solid #ccc; padding: 10px; min-height: 60px; background-color: #f9f9f9; white-space: pre-wrap; }
  .signature-section { margin-top: 50px; border-top: 1px solid #333; padding-top: 20px; }
  .signature-line { margin-top: 40px; text-align: center; }
  .line { border-bottom: 1px solid #333; width: 300px; margin: 0 auto 10px; height: 20px; }
  .digital-signature { border: 2px solid #007bff; padding: 15px; margin: 20px auto; width: 400px; text-align: center; background-color: #f8f9fa; border-radius: 5px; }
  .signature-image { border: 1px solid #ddd; margin: 10px auto; display: block; background-color: white; }
  .signature-info { margin-top: 20px; text-align: center; color: #28a745; font-weight: bold; }
  .qr { text-align: center; margin-top: 20px; }
  @media print { body { margin: 0; } }
"#;

/// Renders the printable HTML document for an order.
///
/// `qr_data_url` is the signer link QR shown in the signed block.
pub fn render_order_html(order: &ServiceOrder, qr_data_url: Option<&str>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Ordem de Serviço {} - {}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(&order.number),
        escape_html(&order.collaborator),
        STYLE
    ));

    html.push_str(&format!(
        "<div class=\"header\">\n  <div class=\"title\">{}</div>\n  <div class=\"unit\">{}</div>\n  <div class=\"company\">{}</div>\n  <div class=\"number\">Nº {}</div>\n</div>\n",
        DOCUMENT_TITLE,
        escape_html(&order.unit),
        escape_html(&order.company),
        escape_html(&order.number),
    ));

    html.push_str("<div class=\"info-grid\">\n");
    for (label, value) in [
        ("Colaborador:", order.collaborator.clone()),
        ("CPF:", order.cpf.clone()),
        ("Função:", order.role.clone()),
        ("Data de Emissão:", pt_br_date(order.issue_date)),
    ] {
        html.push_str(&format!(
            "  <div class=\"info-item\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
            label,
            escape_html(&value)
        ));
    }
    html.push_str("</div>\n");

    for (field, value) in order.printable_sections() {
        html.push_str(&format!(
            "<div class=\"section\" data-field=\"{}\">\n  <div class=\"section-title\">{}</div>\n  <div class=\"content\">{}</div>\n</div>\n",
            field.id(),
            field.document_title(),
            escape_html(value)
        ));
    }

    html.push_str("<div class=\"signature-section\">\n");
    match &order.signature {
        Some(signature) => {
            let signed_on = pt_br_date(signature.signed_at.date_naive());
            html.push_str("  <div class=\"digital-signature\">\n");
            html.push_str(&format!(
                "    <div style=\"font-size: 18px; margin-bottom: 10px;\">✓ {}</div>\n",
                SIGNED_BANNER
            ));
            html.push_str(&format!(
                "    <div>Assinado por: <strong>{}</strong></div>\n    <div>Data: {}</div>\n",
                escape_html(&signature.signer),
                signed_on
            ));
            match signature.image.as_deref() {
                Some(image) if image.starts_with(shared::validation::PNG_DATA_URL_PREFIX) => {
                    html.push_str(&format!(
                        "    <img class=\"signature-image\" src=\"{}\" alt=\"Assinatura de {}\">\n",
                        escape_html(image),
                        escape_html(&signature.signer)
                    ));
                }
                _ => {
                    html.push_str(&format!(
                        "    <div><strong>Assinatura Digital:</strong><br><span style=\"font-family: cursive; font-size: 20px; color: #0066cc;\">{}</span></div>\n",
                        escape_html(&signature.signer)
                    ));
                }
            }
            html.push_str("  </div>\n");
            html.push_str(&format!(
                "  <div class=\"signature-info\">Este documento foi assinado digitalmente em {}</div>\n",
                signed_on
            ));
            if let Some(qr) = qr_data_url {
                html.push_str(&format!(
                    "  <div class=\"qr\"><img src=\"{}\" alt=\"QR Code para Assinatura\" width=\"150\" height=\"150\"></div>\n",
                    escape_html(qr)
                ));
            }
        }
        None => {
            html.push_str(&format!(
                "  <div class=\"signature-line\"><div class=\"line\"></div><div>{}</div></div>\n",
                SIGNATURE_LINE_CAPTION
            ));
        }
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Renders the printable QR sheet handed to a collaborator.
pub fn render_qr_sheet_html(cpf: Option<&str>, link: &str, qr_data_url: &str) -> String {
    let cpf_line = match cpf {
        Some(cpf) => format!("<div class=\"cpf-info\">CPF: {}</div>", escape_html(cpf)),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<title>QR Code - Assinatura Digital</title>
<style>
  body {{ font-family: Arial, sans-serif; display: flex; justify-content: center; margin: 40px; }}
  .qr-container {{ text-align: center; border: 2px solid #333; padding: 30px; border-radius: 10px; }}
  .title {{ font-size: 24px; font-weight: bold; margin-bottom: 20px; }}
  .cpf-info {{ font-size: 18px; margin-bottom: 20px; }}
  .instructions {{ max-width: 400px; margin: 20px auto 0; color: #555; }}
  .link {{ font-size: 12px; color: #777; margin-top: 10px; }}
</style>
</head>
<body>
<div class="qr-container">
  <div class="title">QR Code - Assinatura Digital</div>
  {cpf_line}
  <div class="qr-image"><img src="{qr}" alt="QR Code para Assinatura" style="width: 300px; height: 300px;"></div>
  <div class="instructions">Escaneie este QR Code com seu smartphone para acessar o sistema de assinatura digital da Ordem de Serviço.</div>
  <div class="link">Link: {link}</div>
</div>
</body>
</html>
"#,
        cpf_line = cpf_line,
        qr = escape_html(qr_data_url),
        link = escape_html(link),
    )
}

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const PT_TO_MM: f32 = 0.3528;
const SIGNATURE_WIDTH_MM: f32 = 70.0;
const QR_SIZE_MM: f32 = 30.0;

/// Cursor over a multi-page PDF being written top to bottom.
struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, DocumentError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    /// Starts a new page when fewer than `height` millimetres remain.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height >= MARGIN_MM {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * PT_TO_MM * 1.4;
        self.ensure_space(height);
        self.y -= height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * PT_TO_MM * 1.4;
        self.ensure_space(height);
        self.y -= height;
        let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        let max_chars = ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / (size * 0.5 * PT_TO_MM)) as usize;
        for line in wrap_text(text, max_chars) {
            self.line(&line, size, false);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Places an image of `width_mm` at the left margin below the cursor.
    fn image(&mut self, object: ImageXObject, width_mm: f32) {
        let (px_w, px_h) = (object.width.0 as f32, object.height.0 as f32);
        let height_mm = width_mm * px_h / px_w;
        self.ensure_space(height_mm);
        self.y -= height_mm;
        let dpi = px_w / (width_mm / 25.4);
        Image::from(object).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(self.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    fn finish(self) -> Result<Vec<u8>, DocumentError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| DocumentError::Pdf(e.to_string()))
    }
}

fn rgb_object(image: RgbImage) -> ImageXObject {
    let (width, height) = image.dimensions();
    ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    }
}

fn gray_object(image: &GrayImage) -> ImageXObject {
    let (width, height) = image.dimensions();
    ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Greyscale,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: image.as_raw().clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    }
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Renders the order as a PDF.
///
/// `qr` is the signer link QR embedded in the signed block.
pub fn render_order_pdf(order: &ServiceOrder, qr: Option<&GrayImage>) -> Result<Vec<u8>, DocumentError> {
    let mut pdf = PdfWriter::new(&format!("Ordem de Serviço {}", order.number))?;

    pdf.centered(DOCUMENT_TITLE, TITLE_SIZE, true);
    pdf.centered(&order.unit, HEADING_SIZE, false);
    pdf.centered(&format!("{} - Nº {}", order.company, order.number), BODY_SIZE, false);
    pdf.gap(8.0);

    for (label, value) in [
        (OrderField::Collaborator.label(), order.collaborator.clone()),
        (OrderField::Cpf.label(), order.cpf.clone()),
        (OrderField::Role.label(), order.role.clone()),
        ("Data de Emissão", pt_br_date(order.issue_date)),
    ] {
        pdf.line(&format!("{}: {}", label, value), BODY_SIZE, false);
    }
    pdf.gap(6.0);

    for (field, value) in order.printable_sections() {
        pdf.line(field.document_title(), HEADING_SIZE, true);
        pdf.paragraph(value, BODY_SIZE);
        pdf.gap(4.0);
    }

    pdf.gap(8.0);
    match &order.signature {
        Some(signature) => {
            let signed_on = pt_br_date(signature.signed_at.date_naive());
            pdf.line(SIGNED_BANNER, HEADING_SIZE, true);
            pdf.line(&format!("Assinado por: {}", signature.signer), BODY_SIZE, false);
            pdf.line(&format!("Data: {}", signed_on), BODY_SIZE, false);
            if let Some(data_url) = signature.image.as_deref() {
                let image = decode_data_url(data_url)?;
                pdf.gap(2.0);
                pdf.image(rgb_object(image), SIGNATURE_WIDTH_MM);
            }
            pdf.line(
                &format!("Este documento foi assinado digitalmente em {}", signed_on),
                BODY_SIZE,
                false,
            );
            if let Some(qr) = qr {
                pdf.gap(4.0);
                pdf.image(gray_object(qr), QR_SIZE_MM);
            }
        }
        None => {
            pdf.gap(12.0);
            pdf.line("______________________________________", BODY_SIZE, false);
            pdf.line(SIGNATURE_LINE_CAPTION, BODY_SIZE, false);
        }
    }

    pdf.finish()
}
