// SPDX-License-Identifier: GPL-3.0-only

//! Visual filters
//!
//! Filters are named presets that resolve to a filter expression in the CSS
//! filter-function syntax, e.g. `sepia(100%)` or the Polaroid composite
//! `brightness(110%) contrast(90%) saturate(80%) sepia(20%)`. The same
//! expression is shown on the preview and interpreted here when a frame is
//! drawn, so the captured photo looks like what was on screen.

use crate::errors::PhotoError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Selectable filter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// No effect
    #[default]
    None,
    /// Black & white
    Grayscale,
    /// Warm brownish tint
    Sepia,
    /// Inverted colors
    Invert,
    /// Soft, slightly faded instant-film look
    Polaroid,
}

impl FilterKind {
    /// All presets, in menu order
    pub const ALL: [FilterKind; 5] = [
        FilterKind::None,
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Invert,
        FilterKind::Polaroid,
    ];

    /// Name used to select the preset
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Sepia => "sepia",
            FilterKind::Invert => "invert",
            FilterKind::Polaroid => "polaroid",
        }
    }

    /// Menu label
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterKind::None => "Normal",
            FilterKind::Grayscale => "Black & White",
            FilterKind::Sepia => "Sepia",
            FilterKind::Invert => "Invert",
            FilterKind::Polaroid => "Polaroid",
        }
    }

    /// The effect expression this preset stands for
    pub fn expression(&self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Grayscale => "grayscale(100%)",
            FilterKind::Sepia => "sepia(100%)",
            FilterKind::Invert => "invert(100%)",
            FilterKind::Polaroid => "brightness(110%) contrast(90%) saturate(80%) sepia(20%)",
        }
    }

    /// Look a preset up by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a selected filter name to its effect expression
///
/// Preset names map to their fixed expressions; any other value is passed
/// through unchanged and treated as an expression of its own.
pub fn resolve(name: &str) -> String {
    match FilterKind::from_name(name) {
        Some(kind) => kind.expression().to_string(),
        None => name.to_string(),
    }
}

/// One filter primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Grayscale(f32),
    Sepia(f32),
    Saturate(f32),
    /// Rotation in degrees
    HueRotate(f32),
    Brightness(f32),
    Contrast(f32),
    Invert(f32),
    Opacity(f32),
    /// Gaussian blur radius in pixels
    Blur(f32),
}

/// A parsed chain of filter primitives, applied left to right
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterExpression {
    ops: Vec<FilterOp>,
}

impl FilterExpression {
    /// The no-op expression
    pub fn identity() -> Self {
        Self::default()
    }

    /// Parse `expression`, falling back to identity when it is not understood
    pub fn lenient(expression: &str) -> Self {
        match expression.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(expression, error = %e, "Ignoring unsupported filter");
                Self::identity()
            }
        }
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every primitive to `image` in place
    pub fn apply(&self, image: &mut RgbaImage) {
        for op in &self.ops {
            match *op {
                FilterOp::Blur(radius) => {
                    if radius > 0.0 {
                        // A CSS blur radius is the standard deviation of the kernel
                        *image = image::imageops::blur(image, radius);
                    }
                }
                op => apply_pointwise(image, op),
            }
        }
    }
}

impl FromStr for FilterExpression {
    type Err = PhotoError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let trimmed = expression.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::identity());
        }

        let mut ops = Vec::new();
        let mut rest = trimmed;
        while !rest.is_empty() {
            let open = rest.find('(').ok_or_else(|| {
                PhotoError::FilterFailed(format!("expected '(' in '{}'", rest))
            })?;
            let close = rest[open..]
                .find(')')
                .map(|i| open + i)
                .ok_or_else(|| PhotoError::FilterFailed(format!("unclosed '(' in '{}'", rest)))?;

            let name = rest[..open].trim().to_ascii_lowercase();
            let arg = rest[open + 1..close].trim();
            ops.push(parse_op(&name, arg)?);

            rest = rest[close + 1..].trim_start();
        }

        Ok(Self { ops })
    }
}

fn parse_op(name: &str, arg: &str) -> Result<FilterOp, PhotoError> {
    let op = match name {
        "grayscale" => FilterOp::Grayscale(parse_amount(arg, 1.0)?.min(1.0)),
        "sepia" => FilterOp::Sepia(parse_amount(arg, 1.0)?.min(1.0)),
        "invert" => FilterOp::Invert(parse_amount(arg, 1.0)?.min(1.0)),
        "opacity" => FilterOp::Opacity(parse_amount(arg, 1.0)?.min(1.0)),
        "saturate" => FilterOp::Saturate(parse_amount(arg, 1.0)?),
        "brightness" => FilterOp::Brightness(parse_amount(arg, 1.0)?),
        "contrast" => FilterOp::Contrast(parse_amount(arg, 1.0)?),
        "hue-rotate" => FilterOp::HueRotate(parse_angle(arg)?),
        "blur" => FilterOp::Blur(parse_length(arg)?),
        other => {
            return Err(PhotoError::FilterFailed(format!(
                "unknown filter function '{}'",
                other
            )));
        }
    };
    Ok(op)
}

/// `50%`, `0.5` or nothing (the default); negative amounts are invalid
fn parse_amount(arg: &str, default: f32) -> Result<f32, PhotoError> {
    if arg.is_empty() {
        return Ok(default);
    }
    let value = match arg.strip_suffix('%') {
        Some(percent) => parse_number(percent)? / 100.0,
        None => parse_number(arg)?,
    };
    if value < 0.0 {
        return Err(PhotoError::FilterFailed(format!("negative amount '{}'", arg)));
    }
    Ok(value)
}

fn parse_angle(arg: &str) -> Result<f32, PhotoError> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    if let Some(v) = arg.strip_suffix("deg") {
        return parse_number(v);
    }
    if let Some(v) = arg.strip_suffix("grad") {
        return Ok(parse_number(v)? * 0.9);
    }
    if let Some(v) = arg.strip_suffix("rad") {
        return Ok(parse_number(v)?.to_degrees());
    }
    if let Some(v) = arg.strip_suffix("turn") {
        return Ok(parse_number(v)? * 360.0);
    }
    // Only a bare zero may omit the unit
    if parse_number(arg)? == 0.0 {
        Ok(0.0)
    } else {
        Err(PhotoError::FilterFailed(format!("angle '{}' needs a unit", arg)))
    }
}

fn parse_length(arg: &str) -> Result<f32, PhotoError> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    let value = match arg.strip_suffix("px") {
        Some(v) => parse_number(v)?,
        None if parse_number(arg)? == 0.0 => 0.0,
        None => {
            return Err(PhotoError::FilterFailed(format!(
                "length '{}' needs a unit",
                arg
            )));
        }
    };
    if value < 0.0 {
        return Err(PhotoError::FilterFailed(format!("negative length '{}'", arg)));
    }
    Ok(value)
}

fn parse_number(s: &str) -> Result<f32, PhotoError> {
    let s = s.trim();
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PhotoError::FilterFailed(format!("invalid number '{}'", s)))
}

type ColorMatrix = [[f32; 3]; 3];

/// Apply a per-pixel primitive, working in 0..1 and clamping after the step
fn apply_pointwise(image: &mut RgbaImage, op: FilterOp) {
    let matrix = color_matrix(op);

    for pixel in image.pixels_mut() {
        let mut r = pixel[0] as f32 / 255.0;
        let mut g = pixel[1] as f32 / 255.0;
        let mut b = pixel[2] as f32 / 255.0;
        let mut a = pixel[3] as f32 / 255.0;

        if let Some(m) = &matrix {
            let (r0, g0, b0) = (r, g, b);
            r = m[0][0] * r0 + m[0][1] * g0 + m[0][2] * b0;
            g = m[1][0] * r0 + m[1][1] * g0 + m[1][2] * b0;
            b = m[2][0] * r0 + m[2][1] * g0 + m[2][2] * b0;
        } else {
            match op {
                FilterOp::Brightness(amount) => {
                    r *= amount;
                    g *= amount;
                    b *= amount;
                }
                FilterOp::Contrast(amount) => {
                    r = (r - 0.5) * amount + 0.5;
                    g = (g - 0.5) * amount + 0.5;
                    b = (b - 0.5) * amount + 0.5;
                }
                FilterOp::Invert(amount) => {
                    r = amount * (1.0 - r) + (1.0 - amount) * r;
                    g = amount * (1.0 - g) + (1.0 - amount) * g;
                    b = amount * (1.0 - b) + (1.0 - amount) * b;
                }
                FilterOp::Opacity(amount) => a *= amount,
                _ => {}
            }
        }

        pixel[0] = to_channel(r);
        pixel[1] = to_channel(g);
        pixel[2] = to_channel(b);
        pixel[3] = to_channel(a);
    }
}

fn to_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Color matrices from the Filter Effects specification
fn color_matrix(op: FilterOp) -> Option<ColorMatrix> {
    match op {
        FilterOp::Grayscale(amount) => {
            let s = 1.0 - amount;
            Some([
                [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
                [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
                [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
            ])
        }
        FilterOp::Sepia(amount) => {
            let s = 1.0 - amount;
            Some([
                [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
                [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
                [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
            ])
        }
        FilterOp::Saturate(s) => Some([
            [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
            [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
        ]),
        FilterOp::HueRotate(degrees) => {
            let (sin, cos) = degrees.to_radians().sin_cos();
            Some([
                [
                    0.213 + cos * 0.787 - sin * 0.213,
                    0.715 - cos * 0.715 - sin * 0.715,
                    0.072 - cos * 0.072 + sin * 0.928,
                ],
                [
                    0.213 - cos * 0.213 + sin * 0.143,
                    0.715 + cos * 0.285 + sin * 0.140,
                    0.072 - cos * 0.072 - sin * 0.283,
                ],
                [
                    0.213 - cos * 0.213 - sin * 0.787,
                    0.715 - cos * 0.715 + sin * 0.715,
                    0.072 + cos * 0.928 + sin * 0.072,
                ],
            ])
        }
        _ => None,
    }
}
