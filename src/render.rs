//! PNG export of a layout proof.
//!
//! There is no glyph shaping here: each estimated line is drawn as a row of
//! word bars using the same average-advance heuristic as the metrics engine,
//! so the image shows measure, leading, alignment and spacing at a glance.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageError, Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::controls::{Alignment, ControlState};
use crate::metrics::{chars_per_line, count_characters, estimate_lines, AVG_CHAR_WIDTH_EM};

pub const DEFAULT_PNG_FILE_NAME: &str = "typography-preview.png";
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Bar height as a fraction of the font size (roughly the x-height).
const BAR_HEIGHT_EM: f64 = 0.5;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas has zero width")]
    EmptyCanvas,
    #[error("Canvas of {width}x{height}px exceeds the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("Failed to save image: {0}")]
    Save(#[from] ImageError),
    #[error("Failed to create output directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOptions {
    pub width_px: u32,
    pub padding_px: u32,
    pub paper: [u8; 4],
}

impl Default for ProofOptions {
    fn default() -> Self {
        Self {
            width_px: 800,
            padding_px: 24,
            paper: [255, 255, 255, 255],
        }
    }
}

/// Heavier weights draw darker bars.
pub fn ink_for_weight(font_weight: u32) -> Rgba<u8> {
    let weight = f64::from(font_weight.clamp(100, 900));
    let shade = (255.0 - weight / 900.0 * 255.0).round() as u8;
    Rgba([shade, shade, shade, 255])
}

/// Splits `text` into rows of at most `per_line` characters, the same way
/// the line estimate counts them.
fn layout_rows(text: &str, per_line: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(per_line.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn fill_rect(canvas: &mut RgbaImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let left = x0.floor().max(0.0) as u32;
    let top = y0.floor().max(0.0) as u32;
    let right = (x1.ceil().max(0.0) as u32).min(width);
    let bottom = (y1.ceil().max(0.0) as u32).min(height);
    for y in top..bottom {
        for x in left..right {
            canvas.put_pixel(x, y, color);
        }
    }
}

fn content_width(options: &ProofOptions) -> f64 {
    let padding = options.padding_px.min(options.width_px / 2);
    f64::from(options.width_px - 2 * padding)
}

/// Number of rows [`render_layout_proof`] draws for this input.
pub fn proof_lines(text: &str, state: &ControlState, options: &ProofOptions) -> usize {
    estimate_lines(
        count_characters(text),
        state.font_size_px.max(1),
        content_width(options),
    )
}

pub fn render_layout_proof(
    text: &str,
    state: &ControlState,
    options: &ProofOptions,
) -> Result<RgbaImage, RenderError> {
    if options.width_px == 0 {
        return Err(RenderError::EmptyCanvas);
    }
    let padding = options.padding_px.min(options.width_px / 2);
    let measure = content_width(options);

    // Geometry needs a drawable size even when the control value is not.
    let font_size_px = state.font_size_px.max(1);
    let font_size = f64::from(font_size_px);
    let line_advance = if state.line_height.is_finite() && state.line_height > 0.0 {
        (font_size * state.line_height).max(1.0)
    } else {
        font_size
    };

    let per_line = chars_per_line(font_size_px, measure) as usize;
    let rows = layout_rows(text, per_line);

    let height = (f64::from(2 * padding) + rows.len() as f64 * line_advance).ceil();
    if options.width_px > MAX_CANVAS_DIM || height > f64::from(MAX_CANVAS_DIM) {
        return Err(RenderError::TooLarge {
            width: options.width_px,
            height: height.min(f64::from(u32::MAX)) as u32,
            max: MAX_CANVAS_DIM,
        });
    }
    let height = height as u32;
    debug!(
        width = options.width_px,
        height,
        rows = rows.len(),
        "rendering layout proof"
    );

    let mut canvas = RgbaImage::from_pixel(options.width_px, height, Rgba(options.paper));
    let ink = ink_for_weight(state.font_weight);
    let advance = (font_size * AVG_CHAR_WIDTH_EM + state.letter_spacing_px).max(0.0);
    let space = (advance + state.word_spacing_px).max(0.0);
    let bar_height = (font_size * BAR_HEIGHT_EM).max(1.0);

    for (index, row) in rows.iter().enumerate() {
        let row = row.trim();
        let glyphs = row.chars().filter(|c| !c.is_whitespace()).count();
        let gaps = row.chars().filter(|c| c.is_whitespace()).count();
        let natural = glyphs as f64 * advance + gaps as f64 * space;
        let slack = (measure - natural).max(0.0);
        let is_last = index + 1 == rows.len();

        let (start, gap_extra) = match state.alignment {
            Alignment::Left => (0.0, 0.0),
            Alignment::Center => (slack / 2.0, 0.0),
            Alignment::Right => (slack, 0.0),
            Alignment::Justify if !is_last && gaps > 0 => (0.0, slack / gaps as f64),
            Alignment::Justify => (0.0, 0.0),
        };

        let top = f64::from(padding) + index as f64 * line_advance + (line_advance - bar_height) / 2.0;
        let mut x = f64::from(padding) + start;
        let mut run_start: Option<f64> = None;
        for ch in row.chars() {
            if ch.is_whitespace() {
                if let Some(begin) = run_start.take() {
                    fill_rect(&mut canvas, begin, top, x, top + bar_height, ink);
                }
                x += space + gap_extra;
            } else {
                run_start.get_or_insert(x);
                x += advance;
            }
        }
        if let Some(begin) = run_start {
            fill_rect(&mut canvas, begin, top, x, top + bar_height, ink);
        }
    }

    Ok(canvas)
}

/// Writes the proof as PNG, creating parent directories as needed.
pub fn save_layout_proof(image: &RgbaImage, path: &Path) -> Result<PathBuf, RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(path.to_path_buf())
}
