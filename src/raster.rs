use log::debug;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::{Color, StrokeCap};
use crate::mapping::{polar_to_cartesian, Point};
use crate::scene::{CirclePaint, Primitive, PrimitiveSink};

// ============================================================================
// CORE DATA TYPES
// ============================================================================

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    font: Option<&'a Font<'a>>,
}

impl<'a> Canvas<'a> {
    /// `frame` must hold `width * height` RGBA pixels.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
            font: None,
        }
    }

    /// Text primitives are skipped unless a font is attached.
    pub fn with_font(mut self, font: &'a Font<'a>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        self.frame
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = (alpha * color.a as f64 / 255.0).clamp(0.0, 1.0);
        let src = [color.r, color.g, color.b];
        for (channel, value) in dst.iter_mut().zip(src) {
            *channel = (value as f64 * a + *channel as f64 * (1.0 - a)).round() as u8;
        }
        dst[3] = 0xff;
    }

    /// Pixel window covering `min..=max` plus a one pixel margin, clipped to the canvas.
    fn bounds(&self, min: Point, max: Point) -> (i32, i32, i32, i32) {
        let x0 = (min.x.floor() as i32 - 1).max(0);
        let y0 = (min.y.floor() as i32 - 1).max(0);
        let x1 = (max.x.ceil() as i32 + 1).min(self.width as i32 - 1);
        let y1 = (max.y.ceil() as i32 + 1).min(self.height as i32 - 1);
        (x0, y0, x1, y1)
    }
}

impl PrimitiveSink for Canvas<'_> {
    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Circle {
                center,
                radius,
                paint,
                color,
            } => match paint {
                CirclePaint::Fill => draw_disc(self, *center, *radius, *color),
                CirclePaint::Stroke { width } => draw_arc(
                    self,
                    *center,
                    *radius,
                    0.0,
                    360.0,
                    *width,
                    StrokeCap::Butt,
                    *color,
                    1.0,
                ),
            },
            Primitive::Line {
                start,
                end,
                width,
                cap,
                color,
            } => draw_thick_line_aa(self, *start, *end, *width, *cap, *color),
            Primitive::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
                width,
                cap,
                color,
                alpha,
            } => draw_arc(
                self,
                *center,
                *radius,
                *start_angle,
                *sweep_angle,
                *width,
                *cap,
                *color,
                *alpha,
            ),
            Primitive::Text {
                anchor,
                text,
                font_size,
                color,
                ..
            } => match self.font {
                Some(font) => draw_text(self, font, *anchor, text, *font_size, *color),
                None => debug!("no font attached, skipping text {text:?}"),
            },
        }
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_thick_line_aa(
    canvas: &mut Canvas,
    start: Point,
    end: Point,
    thickness: f64,
    cap: StrokeCap,
    color: Color,
) {
    let half = thickness / 2.0;
    let (mut start, mut end) = (start, end);
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = dx.hypot(dy);
    if len <= f64::EPSILON {
        if cap != StrokeCap::Butt {
            draw_disc(canvas, start, half, color);
        }
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    if cap == StrokeCap::Square {
        start = start.offset(-ux * half, -uy * half);
        end = end.offset(ux * half, uy * half);
    }
    let len = start.distance_to(end);

    let reach = half + 1.0;
    let (x0, y0, x1, y1) = canvas.bounds(
        Point::new(start.x.min(end.x) - reach, start.y.min(end.y) - reach),
        Point::new(start.x.max(end.x) + reach, start.y.max(end.y) + reach),
    );
    for y in y0..=y1 {
        for x in x0..=x1 {
            let px = x as f64 - start.x;
            let py = y as f64 - start.y;
            let along = px * ux + py * uy;
            let across = (px * uy - py * ux).abs();
            let aa = match cap {
                StrokeCap::Round => {
                    let t = along.clamp(0.0, len);
                    let dist = (px - t * ux).hypot(py - t * uy);
                    coverage(dist - half)
                }
                StrokeCap::Butt | StrokeCap::Square => {
                    let outside = (-along).max(along - len).max(0.0);
                    coverage(across - half) * (1.0 - outside).clamp(0.0, 1.0)
                }
            };
            if aa > 0.01 {
                canvas.set_pixel(x, y, color, aa);
            }
        }
    }
}

fn draw_disc(canvas: &mut Canvas, center: Point, radius: f64, color: Color) {
    let (x0, y0, x1, y1) = canvas.bounds(
        center.offset(-radius, -radius),
        center.offset(radius, radius),
    );
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dist = (x as f64 - center.x).hypot(y as f64 - center.y);
            let aa = coverage(dist - radius);
            if aa > 0.0 {
                canvas.set_pixel(x, y, color, aa);
            }
        }
    }
}

/// Stroked arc centered on `radius`. A full 360 degree sweep draws a ring.
#[allow(clippy::too_many_arguments)]
fn draw_arc(
    canvas: &mut Canvas,
    center: Point,
    radius: f64,
    start_angle: f64,
    sweep_angle: f64,
    thickness: f64,
    cap: StrokeCap,
    color: Color,
    alpha: f64,
) {
    let half = thickness / 2.0;
    let full_circle = sweep_angle >= 360.0;
    let cap_extension = if cap == StrokeCap::Square && radius > 0.0 {
        (half / radius).to_degrees()
    } else {
        0.0
    };
    let from = start_angle - cap_extension;
    let span = sweep_angle + 2.0 * cap_extension;
    let ends = [
        polar_to_cartesian(start_angle, radius, center),
        polar_to_cartesian(start_angle + sweep_angle, radius, center),
    ];

    let reach = radius + half;
    let (x0, y0, x1, y1) = canvas.bounds(center.offset(-reach, -reach), center.offset(reach, reach));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 - center.x;
            let dy = y as f64 - center.y;
            let dist = dx.hypot(dy);
            let angle = dy.atan2(dx).to_degrees();
            let in_arc = full_circle || (angle - from).rem_euclid(360.0) <= span;

            let mut aa = if in_arc {
                coverage((dist - radius).abs() - half)
            } else {
                0.0
            };
            if cap == StrokeCap::Round && !full_circle {
                let pixel = Point::new(x as f64, y as f64);
                for end in ends {
                    aa = aa.max(coverage(pixel.distance_to(end) - half));
                }
            }
            if aa > 0.01 {
                canvas.set_pixel(x, y, color, aa * alpha);
            }
        }
    }
}

fn draw_text(canvas: &mut Canvas, font: &Font, anchor: Point, text: &str, font_size: f64, color: Color) {
    let scale = Scale::uniform(font_size as f32);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<PositionedGlyph> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let (min_x, max_x, min_y, max_y) = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    );
    if min_x >= max_x || min_y >= max_y {
        return;
    }
    let offset_x = anchor.x.round() as i32 - (max_x - min_x) / 2;
    let offset_y = anchor.y.round() as i32 - (max_y - min_y) / 2;
    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                canvas.set_pixel(px, py, color, v as f64);
            });
        }
    }
}

/// One pixel of anti-aliasing falloff past an edge at signed distance `d`.
fn coverage(d: f64) -> f64 {
    (0.5 - d).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(size: usize) -> Vec<u8> {
        vec![0xff; size * size * 4]
    }

    #[test]
    fn test_disc_fills_center_only() {
        let mut frame = blank(40);
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        canvas.draw(&Primitive::Circle {
            center: Point::new(20.0, 20.0),
            radius: 5.0,
            paint: CirclePaint::Fill,
            color: Color::BLACK,
        });
        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(2, 2), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_ring_leaves_center_untouched() {
        let mut frame = blank(40);
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        canvas.draw(&Primitive::Circle {
            center: Point::new(20.0, 20.0),
            radius: 15.0,
            paint: CirclePaint::Stroke { width: 4.0 },
            color: Color::RED,
        });
        assert_eq!(canvas.pixel(20, 20), Some([0xff, 0xff, 0xff, 0xff]));
        assert_eq!(canvas.pixel(35, 20), Some([0xff, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(20, 5), Some([0xff, 0, 0, 0xff]));
    }

    #[test]
    fn test_arc_respects_sweep_and_alpha() {
        let mut frame = blank(40);
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        // Lower half only: 0 to 180 degrees clockwise on a y-down canvas.
        canvas.draw(&Primitive::Arc {
            center: Point::new(20.0, 20.0),
            radius: 15.0,
            start_angle: 0.0,
            sweep_angle: 180.0,
            width: 4.0,
            cap: StrokeCap::Butt,
            color: Color::BLACK,
            alpha: 0.5,
        });
        assert_eq!(canvas.pixel(20, 35), Some([0x80, 0x80, 0x80, 0xff]));
        assert_eq!(canvas.pixel(20, 5), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_butt_line_stops_at_endpoints() {
        let mut frame = blank(40);
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        canvas.draw(&Primitive::Line {
            start: Point::new(10.0, 20.0),
            end: Point::new(30.0, 20.0),
            width: 6.0,
            cap: StrokeCap::Butt,
            color: Color::BLACK,
        });
        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(20, 22), Some([0, 0, 0, 0xff]));
        assert_eq!(canvas.pixel(7, 20), Some([0xff, 0xff, 0xff, 0xff]));
    }

    #[test]
    fn test_round_line_extends_past_endpoints() {
        let mut frame = blank(40);
        let mut canvas = Canvas::new(&mut frame, 40, 40);
        canvas.draw(&Primitive::Line {
            start: Point::new(10.0, 20.0),
            end: Point::new(30.0, 20.0),
            width: 6.0,
            cap: StrokeCap::Round,
            color: Color::BLACK,
        });
        assert_eq!(canvas.pixel(8, 20), Some([0, 0, 0, 0xff]));
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut frame = blank(20);
        let mut canvas = Canvas::new(&mut frame, 20, 20);
        canvas.draw(&Primitive::Text {
            anchor: Point::new(10.0, 10.0),
            text: "42".to_string(),
            font_size_ratio: 0.05,
            font_size: 12.0,
            color: Color::BLACK,
        });
        assert!(frame.iter().all(|&b| b == 0xff));
    }
}
