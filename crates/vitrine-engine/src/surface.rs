//! The pixel-addressable drawing surface.
//!
//! Each terminal cell carries a 2x4 grid of subpixels (the braille dot
//! layout), so a cols x rows terminal hosts a `cols*2 x rows*4` pixel
//! surface. Paint operations accumulate RGB per pixel with alpha blending
//! plus an additive mode for glows; presentation collapses each cell to a
//! braille glyph over a background color.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use vitrine_core::color::Rgb;

use crate::error::EngineError;

/// Horizontal device-scale factor: subpixels per terminal column.
pub const PIXELS_PER_COL: u16 = 2;
/// Vertical device-scale factor: subpixels per terminal row.
pub const PIXELS_PER_ROW: u16 = 4;

/// Luma headroom a pixel needs over its cell average to light a dot.
const DOT_THRESHOLD: f32 = 0.045;

/// A resizable RGB pixel buffer bound to a terminal area.
///
/// All coordinates handed to paint operations are device pixels with the
/// origin at the top-left. Out-of-bounds painting is silently clipped.
#[derive(Debug, Clone)]
pub struct Surface {
    cols: u16,
    rows: u16,
    pixels: Vec<Rgb>,
}

impl Surface {
    /// Bind a surface to a terminal area. Zero-area surfaces are fatal.
    pub fn new(cols: u16, rows: u16) -> Result<Self, EngineError> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::EmptySurface { cols, rows });
        }
        let len = pixel_len(cols, rows);
        Ok(Self {
            cols,
            rows,
            pixels: vec![Rgb::BLACK; len],
        })
    }

    /// Resize the backing pixel buffer to match the host viewport.
    ///
    /// Never called mid-frame; the engine orders resize, population
    /// rebuild, then the next frame.
    pub fn resize(&mut self, cols: u16, rows: u16) -> Result<(), EngineError> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::EmptySurface { cols, rows });
        }
        self.cols = cols;
        self.rows = rows;
        self.pixels.clear();
        self.pixels.resize(pixel_len(cols, rows), Rgb::BLACK);
        Ok(())
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Surface width in device pixels.
    pub fn width(&self) -> f32 {
        self.pixel_width() as f32
    }

    /// Surface height in device pixels.
    pub fn height(&self) -> f32 {
        self.pixel_height() as f32
    }

    // Widened before multiplying: cols * 2 overflows u16 past 32767 cols.
    fn pixel_width(&self) -> usize {
        self.cols as usize * PIXELS_PER_COL as usize
    }

    fn pixel_height(&self) -> usize {
        self.rows as usize * PIXELS_PER_ROW as usize
    }

    /// Flood the whole surface with one color, erasing the previous frame.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Vertical linear gradient covering the full surface.
    pub fn fill_vertical_gradient(&mut self, top: Rgb, bottom: Rgb) {
        let pw = self.pixel_width();
        let ph = self.pixel_height();
        for py in 0..ph {
            let t = py as f32 / (ph.max(2) - 1) as f32;
            let row = top.lerp(bottom, t);
            let start = py * pw;
            self.pixels[start..start + pw].fill(row);
        }
    }

    /// Alpha-blend one pixel: `dst = dst*(1-a) + color*a`.
    pub fn blend_pixel(&mut self, x: f32, y: f32, color: Rgb, alpha: f32) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = self.pixels[i].lerp(color, alpha.clamp(0.0, 1.0));
        }
    }

    /// Additive blend for glow layers: `dst += color*a`.
    pub fn add_pixel(&mut self, x: f32, y: f32, color: Rgb, alpha: f32) {
        if let Some(i) = self.index_of(x, y) {
            let c = color.scale(alpha.max(0.0));
            let p = self.pixels[i];
            self.pixels[i] = Rgb::new(p.r + c.r, p.g + c.g, p.b + c.b);
        }
    }

    /// Filled disc with a soft one-pixel edge.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let (x0, x1, y0, y1) = self.clip_box(cx, cy, radius);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let cover = (radius - d + 0.5).clamp(0.0, 1.0);
                if cover > 0.0 {
                    self.blend_pixel(px as f32, py as f32, color, alpha * cover);
                }
            }
        }
    }

    /// Circle outline, used by expanding ripples.
    pub fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        line_width: f32,
        color: Rgb,
        alpha: f32,
    ) {
        if radius <= 0.0 {
            return;
        }
        let half = (line_width * 0.5).max(0.5);
        let (x0, x1, y0, y1) = self.clip_box(cx, cy, radius + half);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let cover = (half - (d - radius).abs() + 0.5).clamp(0.0, 1.0);
                if cover > 0.0 {
                    self.blend_pixel(px as f32, py as f32, color, alpha * cover);
                }
            }
        }
    }

    /// Additive radial-gradient glow: full alpha at the center falling to
    /// zero at `radius`.
    pub fn glow(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let (x0, x1, y0, y1) = self.clip_box(cx, cy, radius);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d < radius {
                    let falloff = 1.0 - d / radius;
                    self.add_pixel(px as f32, py as f32, color, alpha * falloff * falloff);
                }
            }
        }
    }

    /// Straight line segment of the given width.
    pub fn line(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        line_width: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + dx * t;
            let y = y0 + dy * t;
            if line_width <= 1.0 {
                self.blend_pixel(x, y, color, alpha);
            } else {
                self.fill_circle(x, y, line_width * 0.5, color, alpha);
            }
        }
    }

    /// Axis-aligned filled rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let x0 = x.max(0.0) as usize;
        let y0 = y.max(0.0) as usize;
        let x1 = ((x + w).min(self.pixel_width() as f32)).max(0.0) as usize;
        let y1 = ((y + h).min(self.pixel_height() as f32)).max(0.0) as usize;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px as f32, py as f32, color, alpha);
            }
        }
    }

    /// Filled rectangle rotated by `angle` radians around its center.
    pub fn fill_rect_rotated(
        &mut self,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let reach = (w * w + h * h).sqrt() * 0.5;
        let (sin, cos) = angle.sin_cos();
        let (x0, x1, y0, y1) = self.clip_box(cx, cy, reach);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - cx;
                let dy = py as f32 - cy;
                // Inverse-rotate the sample point into rect-local space.
                let lx = dx * cos + dy * sin;
                let ly = -dx * sin + dy * cos;
                if lx.abs() <= w * 0.5 && ly.abs() <= h * 0.5 {
                    self.blend_pixel(px as f32, py as f32, color, alpha);
                }
            }
        }
    }

    /// Read one pixel, for tests and cell presentation.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.pixel_width() && y < self.pixel_height() {
            Some(self.pixels[y * self.pixel_width() + x])
        } else {
            None
        }
    }

    fn index_of(&self, x: f32, y: f32) -> Option<usize> {
        let px = x.round();
        let py = y.round();
        if px < 0.0 || py < 0.0 {
            return None;
        }
        let (px, py) = (px as usize, py as usize);
        if px >= self.pixel_width() || py >= self.pixel_height() {
            return None;
        }
        Some(py * self.pixel_width() + px)
    }

    /// Integer bounding box around a center and reach, clipped to bounds.
    fn clip_box(&self, cx: f32, cy: f32, reach: f32) -> (usize, usize, usize, usize) {
        let x0 = (cx - reach).floor().max(0.0) as usize;
        let y0 = (cy - reach).floor().max(0.0) as usize;
        let x1 = ((cx + reach).ceil() as usize).min(self.pixel_width().saturating_sub(1));
        let y1 = ((cy + reach).ceil() as usize).min(self.pixel_height().saturating_sub(1));
        (x0, x1.max(x0), y0, y1.max(y0))
    }

    /// Collapse the pixel buffer into styled terminal lines.
    ///
    /// Pixels noticeably brighter than their cell's average light a braille
    /// dot in the foreground; the remaining pixels become the cell
    /// background, which keeps base gradients visible behind the dots.
    pub fn as_lines(&self) -> Vec<Line<'static>> {
        let pw = self.pixel_width();
        (0..self.rows as usize)
            .map(|cy| {
                let spans: Vec<Span> = (0..self.cols as usize)
                    .map(|cx| self.cell_span(cx, cy, pw))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn cell_span(&self, cx: usize, cy: usize, pw: usize) -> Span<'static> {
        let mut cell = [Rgb::BLACK; 8];
        let mut avg = Rgb::BLACK;
        for dy in 0..PIXELS_PER_ROW as usize {
            for dx in 0..PIXELS_PER_COL as usize {
                let px = cx * PIXELS_PER_COL as usize + dx;
                let py = cy * PIXELS_PER_ROW as usize + dy;
                let c = self.pixels[py * pw + px];
                cell[dy * 2 + dx] = c;
                avg = Rgb::new(avg.r + c.r / 8.0, avg.g + c.g / 8.0, avg.b + c.b / 8.0);
            }
        }

        let mut mask: u8 = 0;
        let mut fg = Rgb::BLACK;
        let mut bg = Rgb::BLACK;
        let mut lit = 0.0f32;
        let mut unlit = 0.0f32;
        for dy in 0..PIXELS_PER_ROW as usize {
            for dx in 0..PIXELS_PER_COL as usize {
                let c = cell[dy * 2 + dx];
                if c.luma() > avg.luma() + DOT_THRESHOLD {
                    mask |= dot_bit(dx, dy);
                    fg = Rgb::new(fg.r + c.r, fg.g + c.g, fg.b + c.b);
                    lit += 1.0;
                } else {
                    bg = Rgb::new(bg.r + c.r, bg.g + c.g, bg.b + c.b);
                    unlit += 1.0;
                }
            }
        }

        let bg = if unlit > 0.0 { bg.scale(1.0 / unlit) } else { avg };
        let (br, bgc, bb) = bg.to_u8();
        let style = Style::new().bg(Color::Rgb(br, bgc, bb));

        if mask == 0 {
            Span::styled(" ", style)
        } else {
            let fg = fg.scale(1.0 / lit);
            let (r, g, b) = fg.to_u8();
            Span::styled(
                braille_char(mask).to_string(),
                style.fg(Color::Rgb(r, g, b)),
            )
        }
    }

    /// Widget for rendering this surface into a ratatui frame.
    pub fn widget(&self) -> SurfaceWidget<'_> {
        SurfaceWidget(self)
    }
}

/// Renders a [`Surface`] as a paragraph of styled cells.
pub struct SurfaceWidget<'a>(&'a Surface);

impl Widget for SurfaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.0.as_lines()).render(area, buf);
    }
}

fn pixel_len(cols: u16, rows: u16) -> usize {
    cols as usize * PIXELS_PER_COL as usize * rows as usize * PIXELS_PER_ROW as usize
}

/// Unicode braille dot for a subpixel position within a cell.
fn dot_bit(dx: usize, dy: usize) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0,
    }
}

fn braille_char(mask: u8) -> char {
    // Braille patterns start at U+2800.
    char::from_u32(0x2800 + mask as u32).unwrap_or(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_surface_is_rejected() {
        assert_eq!(
            Surface::new(0, 24).unwrap_err(),
            EngineError::EmptySurface { cols: 0, rows: 24 }
        );
        assert!(Surface::new(80, 0).is_err());
    }

    #[test]
    fn pixel_dimensions_follow_device_scale() {
        let s = Surface::new(80, 24).unwrap();
        assert_eq!(s.width(), 160.0);
        assert_eq!(s.height(), 96.0);
    }

    #[test]
    fn very_wide_surfaces_do_not_overflow() {
        let s = Surface::new(u16::MAX, 1).unwrap();
        assert_eq!(s.width(), u16::MAX as f32 * PIXELS_PER_COL as f32);
        assert_eq!(s.pixel(s.width() as usize - 1, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn gradient_fill_covers_every_pixel() {
        let mut s = Surface::new(10, 5).unwrap();
        let top = Rgb::new(0.0, 0.0, 1.0);
        let bottom = Rgb::new(1.0, 0.0, 0.0);
        s.fill_vertical_gradient(top, bottom);
        assert_eq!(s.pixel(0, 0), Some(top));
        let last = s.pixel(19, 19).unwrap();
        assert!(last.r > 0.9 && last.b < 0.1);
    }

    #[test]
    fn blending_is_clipped_at_bounds() {
        let mut s = Surface::new(4, 4).unwrap();
        s.blend_pixel(-3.0, 2.0, Rgb::WHITE, 1.0);
        s.blend_pixel(1000.0, 2.0, Rgb::WHITE, 1.0);
        s.fill_circle(-50.0, -50.0, 10.0, Rgb::WHITE, 1.0);
        assert!(s.pixels.iter().all(|p| *p == Rgb::BLACK));
    }

    #[test]
    fn alpha_blend_mixes_toward_source() {
        let mut s = Surface::new(2, 2).unwrap();
        s.fill(Rgb::BLACK);
        s.blend_pixel(1.0, 1.0, Rgb::WHITE, 0.5);
        let p = s.pixel(1, 1).unwrap();
        assert!((p.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut s = Surface::new(4, 4).unwrap();
        s.fill(Rgb::WHITE);
        s.resize(6, 3).unwrap();
        assert_eq!(s.width(), 12.0);
        assert_eq!(s.height(), 12.0);
        assert_eq!(s.pixel(0, 0), Some(Rgb::BLACK));
        assert!(s.resize(0, 3).is_err());
    }

    #[test]
    fn bright_pixel_lights_a_dot_over_the_background() {
        let mut s = Surface::new(2, 1).unwrap();
        s.fill(Rgb::new(0.1, 0.1, 0.1));
        s.blend_pixel(0.0, 0.0, Rgb::WHITE, 1.0);
        let lines = s.as_lines();
        assert_eq!(lines.len(), 1);
        let cell = &lines[0].spans[0];
        // Dot 1 of the braille block.
        assert_eq!(cell.content.as_ref(), "\u{2801}");
        let flat = &lines[0].spans[1];
        assert_eq!(flat.content.as_ref(), " ");
    }
}
