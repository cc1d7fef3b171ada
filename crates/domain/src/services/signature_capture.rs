//! Freehand signature capture.
//!
//! Rasterizes pointer strokes into a black-on-white bitmap. The canvas follows
//! an `Idle -> Drawing -> Idle` state machine and notifies a [`SignatureSink`]
//! synchronously after every committed segment and on clear.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use shared::validation::PNG_DATA_URL_PREFIX;
use std::io::Cursor;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 200;
/// Height of the smaller pad embedded in the document view.
pub const EMBEDDED_HEIGHT: u32 = 150;
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// Errors raised while exporting or importing signature images.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Signature image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Signature image is not a PNG data URL")]
    NotADataUrl,

    #[error("Invalid base64 in signature image: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Logical dimensions and pen of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSurface {
    pub width: u32,
    pub height: u32,
    pub stroke_width: f32,
}

impl SignatureSurface {
    pub fn new(width: u32, height: u32, stroke_width: f32) -> Self {
        Self {
            width,
            height,
            stroke_width,
        }
    }

    /// The 400x150 pad used inside the document view.
    pub fn embedded() -> Self {
        Self::new(DEFAULT_WIDTH, EMBEDDED_HEIGHT, DEFAULT_STROKE_WIDTH)
    }
}

impl Default for SignatureSurface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_STROKE_WIDTH)
    }
}

/// How the client displayed the surface when the events were recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceDescriptor {
    pub display_width: f32,
    pub display_height: f32,
    #[serde(default)]
    pub embedded: bool,
}

/// A position in logical surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A recorded pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
    Clear,
}

/// The current bitmap of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureRaster {
    image: RgbImage,
}

impl SignatureRaster {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, PAPER),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the pixel at `(x, y)` carries ink.
    pub fn is_inked(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| *p == INK)
            .unwrap_or(false)
    }

    /// Number of inked pixels.
    pub fn ink_count(&self) -> usize {
        self.image.pixels().filter(|p| **p == INK).count()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// Encodes the bitmap as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, SignatureError> {
        encode_png(&self.image)
    }

    /// Encodes the bitmap as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> Result<String, SignatureError> {
        Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(self.to_png()?)))
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = PAPER;
        }
    }

    /// Paints a round-capped segment of the given width.
    fn stroke_segment(&mut self, from: Point, to: Point, stroke_width: f32) {
        let radius = (stroke_width / 2.0).max(0.5);
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = ((from.x.max(to.x) + radius).ceil() as u32).min(width - 1);
        let max_y = ((from.y.max(to.y) + radius).ceil() as u32).min(height - 1);

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    self.image.put_pixel(px, py, INK);
                }
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Encodes an RGB image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, SignatureError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image.clone()).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decodes a PNG data URL back into an RGB bitmap.
pub fn decode_data_url(data_url: &str) -> Result<RgbImage, SignatureError> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(SignatureError::NotADataUrl)?;
    let bytes = STANDARD.decode(payload)?;
    Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgb8())
}

/// Receives the canvas content after every change.
///
/// `None` means the canvas was cleared and holds no signature.
pub trait SignatureSink {
    fn on_change(&mut self, raster: Option<&SignatureRaster>);
}

impl<F> SignatureSink for F
where
    F: FnMut(Option<&SignatureRaster>),
{
    fn on_change(&mut self, raster: Option<&SignatureRaster>) {
        self(raster)
    }
}

/// A sink that ignores notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl SignatureSink for NoopSink {
    fn on_change(&mut self, _raster: Option<&SignatureRaster>) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DrawState {
    Idle,
    Drawing { last: Point },
}

/// A signature pad.
pub struct SignatureCanvas<S: SignatureSink = NoopSink> {
    surface: SignatureSurface,
    display: (f32, f32),
    raster: SignatureRaster,
    state: DrawState,
    empty: bool,
    sink: S,
}

impl SignatureCanvas<NoopSink> {
    /// A canvas without a change listener.
    pub fn detached(surface: SignatureSurface) -> Self {
        Self::new(surface, NoopSink)
    }
}

impl<S: SignatureSink> SignatureCanvas<S> {
    /// Creates a blank canvas displayed at its logical size.
    pub fn new(surface: SignatureSurface, sink: S) -> Self {
        Self {
            surface,
            display: (surface.width as f32, surface.height as f32),
            raster: SignatureRaster::blank(surface.width, surface.height),
            state: DrawState::Idle,
            empty: true,
            sink,
        }
    }

    /// Records the size the surface is displayed at, for coordinate scaling.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display = (width, height);
    }

    pub fn surface(&self) -> SignatureSurface {
        self.surface
    }

    /// True until a segment is committed, and again after [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    pub fn raster(&self) -> &SignatureRaster {
        &self.raster
    }

    pub fn into_raster(self) -> SignatureRaster {
        self.raster
    }

    /// Maps display coordinates to logical ones.
    ///
    /// Returns `None` when the surface has no displayed area.
    pub fn map_point(&self, x: f32, y: f32) -> Option<Point> {
        let (display_width, display_height) = self.display;
        if !(display_width > 0.0 && display_height > 0.0) {
            return None;
        }
        Some(Point::new(
            x * self.surface.width as f32 / display_width,
            y * self.surface.height as f32 / display_height,
        ))
    }

    fn contains(&self, p: Point) -> bool {
        p.x >= 0.0
            && p.y >= 0.0
            && p.x <= self.surface.width as f32
            && p.y <= self.surface.height as f32
    }

    /// Starts a stroke. Ignored unless the point lies on the surface.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        match self.map_point(x, y) {
            Some(point) if self.contains(point) => {
                self.state = DrawState::Drawing { last: point };
                true
            }
            _ => false,
        }
    }

    /// Extends the current stroke. Leaving the surface ends the stroke.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let DrawState::Drawing { last } = self.state else {
            return;
        };
        let Some(point) = self.map_point(x, y) else {
            return;
        };
        if !self.contains(point) {
            self.pointer_leave();
            return;
        }

        self.raster
            .stroke_segment(last, point, self.surface.stroke_width);
        self.state = DrawState::Drawing { last: point };
        self.empty = false;
        self.sink.on_change(Some(&self.raster));
    }

    pub fn pointer_up(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Repaints the surface white and signals that no signature is present.
    pub fn clear(&mut self) {
        self.raster.clear();
        self.state = DrawState::Idle;
        self.empty = true;
        self.sink.on_change(None);
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                self.pointer_down(x, y);
            }
            PointerEvent::Move { x, y } => self.pointer_move(x, y),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::Clear => self.clear(),
        }
    }

    /// Feeds a recorded event list through the canvas.
    pub fn replay(&mut self, events: &[PointerEvent]) {
        for event in events {
            self.handle(*event);
        }
    }
}

/// Replays recorded events on a fresh canvas and returns the signature as a
/// PNG data URL, or `None` when nothing was drawn.
pub fn capture_signature(
    surface: SignatureSurface,
    descriptor: &SurfaceDescriptor,
    events: &[PointerEvent],
) -> Result<Option<String>, SignatureError> {
    let mut canvas = SignatureCanvas::detached(surface);
    canvas.set_display_size(descriptor.display_width, descriptor.display_height);
    canvas.replay(events);

    if canvas.is_empty() {
        return Ok(None);
    }
    canvas.raster().to_data_url().map(Some)
}
