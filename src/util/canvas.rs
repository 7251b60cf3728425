//! Drawing surface used to render pose overlays.
//!
//! [`Canvas`] is the narrow interface the visualizer draws through: put an
//! image on the surface, then draw arrows on top of it. [`RasterCanvas`]
//! implements it directly on an [`RgbImage`] so overlays can be written to
//! disk without a plotting backend.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;
use nalgebra::Vector2;

use super::UtilError;

/// Size of a filled triangular arrow head, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Extent across the shaft.
    pub width: f64,
    /// Extent along the shaft, measured back from the tip.
    pub length: f64,
}

impl ArrowHead {
    /// A head `width` pixels wide and one and a half times as long.
    pub fn with_width(width: f64) -> Self {
        Self {
            width,
            length: 1.5 * width,
        }
    }
}

/// A 2D surface that can show an image and draw arrows over it.
///
/// Coordinates are image pixels with the origin at the top-left corner.
pub trait Canvas {
    /// Replaces the surface content with `image`.
    fn blit(&mut self, image: &RgbImage);

    /// Draws a straight arrow from `start` to `end`. Without a head this is a
    /// plain line segment.
    fn draw_arrow(
        &mut self,
        start: Vector2<f64>,
        end: Vector2<f64>,
        color: Rgb<u8>,
        head: Option<ArrowHead>,
    );
}

/// [`Canvas`] backed by an in-memory RGB image.
///
/// Lines are rasterised with Bresenham's algorithm after being clipped to the
/// image. Segments with a non-finite endpoint are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterCanvas {
    image: RgbImage,
}

impl RasterCanvas {
    /// A black canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Writes the canvas to `path`, format chosen by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), UtilError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.image.save(path)?;
        info!("saved canvas to {}", path.display());
        Ok(())
    }

    /// Draws a one pixel wide line segment.
    pub fn draw_line(&mut self, start: Vector2<f64>, end: Vector2<f64>, color: Rgb<u8>) {
        let max_x = self.image.width() as f64 - 1.0;
        let max_y = self.image.height() as f64 - 1.0;
        let Some((p0, p1)) = clip_segment(start, end, max_x, max_y) else {
            return;
        };

        let (mut x0, mut y0) = (p0.x.round() as i64, p0.y.round() as i64);
        let (x1, y1) = (p1.x.round() as i64, p1.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.put_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x0 += sx;
            }
            if e2 < dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_triangle(&mut self, a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>, color: Rgb<u8>) {
        let edge = |p: Vector2<f64>, q: Vector2<f64>, x: f64, y: f64| {
            (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x)
        };
        let area = edge(a, b, c.x, c.y);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        let width = self.image.width() as f64;
        let height = self.image.height() as f64;
        let x_min = a.x.min(b.x).min(c.x).floor().max(0.0) as i64;
        let y_min = a.y.min(b.y).min(c.y).floor().max(0.0) as i64;
        let x_max = a.x.max(b.x).max(c.x).ceil().min(width - 1.0) as i64;
        let y_max = a.y.max(b.y).max(c.y).ceil().min(height - 1.0) as i64;

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let (px, py) = (x as f64, y as f64);
                let w0 = edge(a, b, px, py) * area.signum();
                let w1 = edge(b, c, px, py) * area.signum();
                let w2 = edge(c, a, px, py) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.put_pixel(x, y, color);
                }
            }
        }
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.image.width() as i64 && y < self.image.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }
}

impl From<RgbImage> for RasterCanvas {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl Canvas for RasterCanvas {
    fn blit(&mut self, image: &RgbImage) {
        self.image = image.clone();
    }

    /// The head, when present, ends exactly at `end`.
    fn draw_arrow(
        &mut self,
        start: Vector2<f64>,
        end: Vector2<f64>,
        color: Rgb<u8>,
        head: Option<ArrowHead>,
    ) {
        self.draw_line(start, end, color);

        let Some(head) = head else {
            return;
        };
        let shaft = end - start;
        let length = shaft.norm();
        if !length.is_finite() || length == 0.0 {
            return;
        }
        let dir = shaft / length;
        let normal = Vector2::new(-dir.y, dir.x);
        let base = end - dir * head.length;
        let half = normal * (head.width / 2.0);
        self.fill_triangle(end, base + half, base - half, color);
    }
}

/// Clips a segment to `[0, max_x] × [0, max_y]` (Liang-Barsky).
fn clip_segment(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    max_x: f64,
    max_y: f64,
) -> Option<(Vector2<f64>, Vector2<f64>)> {
    if max_x < 0.0 || max_y < 0.0 {
        return None;
    }
    if !(p0.iter().all(|v| v.is_finite()) && p1.iter().all(|v| v.is_finite())) {
        return None;
    }

    let d = p1 - p0;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-d.x, p0.x),
        (d.x, max_x - p0.x),
        (-d.y, p0.y),
        (d.y, max_y - p0.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((p0 + d * t0, p0 + d * t1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn lit(canvas: &RasterCanvas) -> Vec<(u32, u32)> {
        canvas
            .image()
            .enumerate_pixels()
            .filter(|(_, _, p)| **p != BLACK)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_draw_diagonal_line() {
        let mut canvas = RasterCanvas::new(5, 5);
        canvas.draw_line(Vector2::new(0.0, 0.0), Vector2::new(4.0, 4.0), WHITE);
        assert_eq!(lit(&canvas), vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
    }

    #[test]
    fn test_line_is_clipped_to_image() {
        let mut canvas = RasterCanvas::new(10, 4);
        canvas.draw_line(Vector2::new(-1.0e9, 2.0), Vector2::new(1.0e9, 2.0), WHITE);
        let pixels = lit(&canvas);
        assert_eq!(pixels.len(), 10);
        assert!(pixels.iter().all(|&(_, y)| y == 2));

        let mut canvas = RasterCanvas::new(10, 4);
        canvas.draw_line(Vector2::new(-5.0, -5.0), Vector2::new(-1.0, 20.0), WHITE);
        assert!(lit(&canvas).is_empty());
    }

    #[test]
    fn test_non_finite_segment_is_skipped() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.draw_arrow(
            Vector2::new(f64::NAN, 1.0),
            Vector2::new(4.0, 4.0),
            WHITE,
            Some(ArrowHead::with_width(2.0)),
        );
        canvas.draw_line(Vector2::new(1.0, 1.0), Vector2::new(f64::INFINITY, 1.0), WHITE);
        assert!(lit(&canvas).is_empty());
    }

    #[test]
    fn test_arrow_head_is_filled_at_tip() {
        let mut plain = RasterCanvas::new(40, 40);
        plain.draw_arrow(Vector2::new(5.0, 20.0), Vector2::new(35.0, 20.0), WHITE, None);

        let mut headed = RasterCanvas::new(40, 40);
        headed.draw_arrow(
            Vector2::new(5.0, 20.0),
            Vector2::new(35.0, 20.0),
            WHITE,
            Some(ArrowHead::with_width(10.0)),
        );

        assert_eq!(lit(&plain).len(), 31);
        assert!(lit(&headed).len() > lit(&plain).len());
        // Head spans 5 px either side of the shaft at its base (x = 20).
        assert_eq!(*headed.image().get_pixel(21, 16), WHITE);
        assert_eq!(*headed.image().get_pixel(21, 24), WHITE);
        assert_eq!(*headed.image().get_pixel(36, 20), BLACK);
    }

    #[test]
    fn test_blit_replaces_content() {
        let mut canvas = RasterCanvas::new(2, 2);
        let background = RgbImage::from_pixel(6, 3, Rgb([10, 20, 30]));
        canvas.blit(&background);
        assert_eq!(canvas.image(), &background);
    }

    #[test]
    fn test_save_canvas() {
        let output_path = "output/test_canvas_save.png";
        let mut canvas = RasterCanvas::new(16, 16);
        canvas.draw_arrow(
            Vector2::new(0.0, 0.0),
            Vector2::new(15.0, 15.0),
            Rgb([255, 0, 0]),
            None,
        );
        canvas.save(output_path).unwrap();

        let reloaded = image::open(output_path).unwrap().to_rgb8();
        assert_eq!(&reloaded, canvas.image());
        fs::remove_file(output_path).ok();
    }
}
