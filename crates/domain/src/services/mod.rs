//! Domain services for Ordens de Servico.
//!
//! Services contain business logic that operates on domain models.

pub mod order_filter;
pub mod order_form;
pub mod sequence;
pub mod signature_capture;
pub mod template_resolution;

pub use order_filter::{CollaboratorFilter, OrderFilter};
pub use order_form::OrderForm;
pub use sequence::next_order_number;
pub use signature_capture::{
    capture_signature, PointerEvent, SignatureCanvas, SignatureError, SignatureRaster,
    SignatureSink, SignatureSurface, SurfaceDescriptor,
};
pub use template_resolution::{
    resolve_order_form, FieldSource, FieldState, FormResolutionInput, ResolvedForm,
};
