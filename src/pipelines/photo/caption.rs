// SPDX-License-Identifier: GPL-3.0-only

//! Caption text
//!
//! Captions are laid out as a one-line SVG `<text>` element and rasterized
//! with resvg, then blended onto the card. The card itself is never
//! transformed, so text always reads left to right even though the photo
//! above it is mirrored.

use crate::constants::caption as defaults;
use crate::errors::PhotoError;
use image::RgbaImage;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// A caption that is known to contain visible text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    /// Trim `raw`; blank input means "no caption"
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn text(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Caption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Font and placement of caption text
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub font_family: String,
    pub font_size: f32,
    /// Any SVG color value
    pub color: String,
    /// Baseline distance from the bottom edge of the card
    pub baseline_offset: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_family: defaults::FONT_FAMILY.to_string(),
            font_size: defaults::FONT_SIZE,
            color: defaults::COLOR.to_string(),
            baseline_offset: defaults::BASELINE_OFFSET,
        }
    }
}

/// System fonts are scanned once per process
fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "Loaded system fonts for captions");
            Arc::new(db)
        })
        .clone()
}

/// Font lookup that never comes back empty-handed while any face is loaded
///
/// The requested families are tried first, then the generic families, then
/// whatever face the database holds first.
fn caption_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(name) => Family::Name(name),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|face| face.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

/// Draws captions onto composed cards
#[derive(Clone)]
pub struct CaptionRenderer {
    style: CaptionStyle,
    fonts: Arc<usvg::fontdb::Database>,
}

impl CaptionRenderer {
    pub fn new(style: CaptionStyle) -> Self {
        Self {
            style,
            fonts: system_fonts(),
        }
    }

    /// Renderer drawing from `fonts` instead of the system fonts
    pub fn with_fonts(style: CaptionStyle, fonts: Arc<usvg::fontdb::Database>) -> Self {
        Self { style, fonts }
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Draw `caption` horizontally centered, baseline near the bottom edge
    ///
    /// Fails when no installed font can render the text.
    pub fn draw(&self, canvas: &mut RgbaImage, caption: &Caption) -> Result<(), PhotoError> {
        if self.fonts.is_empty() {
            return Err(PhotoError::CaptureFailed(
                "no fonts available to draw the caption".to_string(),
            ));
        }

        let (width, height) = canvas.dimensions();
        let svg = self.layout(width, height, caption);

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            font_resolver: caption_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| PhotoError::CaptureFailed(format!("caption layout failed: {}", e)))?;
        // Text without a usable face is dropped from the tree
        if tree.root().children().is_empty() {
            return Err(PhotoError::CaptureFailed(format!(
                "no font could render caption '{}'",
                caption.text()
            )));
        }

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| PhotoError::CaptureFailed("failed to allocate caption layer".into()))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        blend_premultiplied(canvas, pixmap.data());
        debug!(caption = caption.text(), "Caption drawn");
        Ok(())
    }

    /// SVG document holding just the caption text
    fn layout(&self, width: u32, height: u32, caption: &Caption) -> String {
        let x = width as f32 / 2.0;
        let y = height.saturating_sub(self.style.baseline_offset);
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" fill="{color}" text-anchor="middle">{text}</text>"#,
                "</svg>"
            ),
            w = width,
            h = height,
            x = x,
            y = y,
            family = escape_xml(&self.style.font_family),
            size = self.style.font_size,
            color = escape_xml(&self.style.color),
            text = escape_xml(caption.text()),
        )
    }
}

impl Default for CaptionRenderer {
    fn default() -> Self {
        Self::new(CaptionStyle::default())
    }
}

impl std::fmt::Debug for CaptionRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionRenderer")
            .field("style", &self.style)
            .field("font_faces", &self.fonts.len())
            .finish()
    }
}

/// Source-over blend of a premultiplied RGBA layer onto an opaque canvas
fn blend_premultiplied(canvas: &mut RgbaImage, layer: &[u8]) {
    for (dst, src) in canvas.pixels_mut().zip(layer.chunks_exact(4)) {
        let alpha = src[3] as u32;
        if alpha == 0 {
            continue;
        }
        let inv = 255 - alpha;
        for c in 0..3 {
            let blended = src[c] as u32 + (dst[c] as u32 * inv + 127) / 255;
            dst[c] = blended.min(255) as u8;
        }
        let out_alpha = alpha + (dst[3] as u32 * inv + 127) / 255;
        dst[3] = out_alpha.min(255) as u8;
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
