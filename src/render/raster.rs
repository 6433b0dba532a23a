use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::geometry::Triangle;
use crate::render::shading::{fog, shade};
use crate::render::View;
use crate::transform::Transform;
use crate::vec3::Point3;
use crate::vec4::Vec4;

/// Rows rasterized by one rayon task.
const BAND_ROWS: usize = 16;

/// Depth of an empty pixel, the far plane in normalized device coordinates.
const CLEAR_DEPTH: f64 = 1.0;

/// A triangle after projection: pixel-space x/y, normalized depth, final color.
#[derive(Copy, Clone, Debug)]
struct Projected {
    points: [Point3; 3],
    color: Rgb<u8>,
    min_y: f64,
    max_y: f64,
}

pub struct Renderer {
    color: RgbImage,
    depth: Vec<f64>,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: RgbImage::new(width, height),
            depth: vec![CLEAR_DEPTH; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.color.dimensions() {
            *self = Renderer::new(width, height);
        }
    }

    /// Tightly packed RGB24 rows.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.color
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.color
    }

    /// Draws one frame and returns how many triangles survived culling.
    pub fn render(&mut self, triangles: &[Triangle], view: &View) -> usize {
        let (width, height) = (self.width() as usize, self.height() as usize);
        if width == 0 || height == 0 {
            return 0;
        }

        let projected: Vec<Projected> = triangles
            .par_iter()
            .filter_map(|triangle| project(triangle, view, width as f64, height as f64))
            .collect();

        let clear = view.clear;
        let row_bytes = width * 3;

        (&mut *self.color)
            .par_chunks_mut(row_bytes * BAND_ROWS)
            .zip(self.depth.par_chunks_mut(width * BAND_ROWS))
            .enumerate()
            .for_each(|(index, (color, depth))| {
                for pixel in color.chunks_mut(3) {
                    pixel.copy_from_slice(&clear.0);
                }
                for d in depth.iter_mut() {
                    *d = CLEAR_DEPTH;
                }

                let first = index * BAND_ROWS;
                let rows = depth.len() / width;
                let mut band = Band {
                    color,
                    depth,
                    width,
                    first,
                    last: first + rows,
                };

                for triangle in &projected {
                    band.fill(triangle);
                }
            });

        projected.len()
    }
}

/// Transforms, culls and shades a triangle. `None` when it is back-facing,
/// touches the near plane or lies entirely past the far plane.
fn project(triangle: &Triangle, view: &View, width: f64, height: f64) -> Option<Projected> {
    let mut eye = *triangle;
    eye.transform(&view.model_view);
    if eye.vertices.iter().any(|v| v.z > -view.near) {
        return None;
    }

    let mut ndc = [Point3::default(); 3];
    for (n, e) in ndc.iter_mut().zip(eye.vertices.iter()) {
        *n = (&view.projection * Vec4::from(*e)).project()?;
    }

    if ndc.iter().all(|n| n.z > CLEAR_DEPTH) {
        return None;
    }

    let area = (ndc[1].x - ndc[0].x) * (ndc[2].y - ndc[0].y) - (ndc[2].x - ndc[0].x) * (ndc[1].y - ndc[0].y);
    if area <= 0.0 {
        return None;
    }

    let normal = eye.normals[0] + eye.normals[1] + eye.normals[2];
    let center = eye.centroid();
    let lit = shade(eye.color, normal, center, &view.light, &view.material);
    let color = fog(lit, view.fog_color, view.fog_density, -center.z);

    let mut points = [Point3::default(); 3];
    for (p, n) in points.iter_mut().zip(ndc.iter()) {
        *p = Point3::new((n.x + 1.0) * 0.5 * width, (1.0 - n.y) * 0.5 * height, n.z);
    }

    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some(Projected {
        points,
        color,
        min_y,
        max_y,
    })
}

/// Horizontal slice of the framebuffer owned by one task.
struct Band<'a> {
    color: &'a mut [u8],
    depth: &'a mut [f64],
    width: usize,
    first: usize,
    last: usize,
}

impl<'a> Band<'a> {
    fn fill(&mut self, triangle: &Projected) {
        let top = triangle.min_y.floor().max(self.first as f64) as usize;
        let bottom = (triangle.max_y.ceil().max(0.0) as usize).min(self.last);
        if top >= bottom {
            return;
        }

        let [a, b, c] = triangle.points;
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as usize).min(self.width);
        if min_x >= max_x {
            return;
        }

        // Projection flips y, so front faces are clockwise here.
        let area = edge(a, c, b);
        if area <= 0.0 {
            return;
        }

        for y in top..bottom {
            let row = (y - self.first) * self.width;
            for x in min_x..max_x {
                let p = Point3::new(x as f64 + 0.5, y as f64 + 0.5, 0.0);
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                if w0 > 0.0 || w1 > 0.0 || w2 > 0.0 {
                    continue;
                }

                let z = (w0 * a.z + w1 * b.z + w2 * c.z) / -area;
                let i = row + x;
                if z < self.depth[i] {
                    self.depth[i] = z;
                    self.color[i * 3..i * 3 + 3].copy_from_slice(&triangle.color.0);
                }
            }
        }
    }
}

/// Twice the signed area of `(a, b, p)` in pixel space.
#[inline]
fn edge(a: Point3, b: Point3, p: Point3) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::frame::Tick;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    fn view() -> View {
        let config = ViewerConfig::default();
        let tick = Tick {
            angle: 0.0,
            fog_density: 0.0,
        };
        let mut view = View::new(&config, &tick, 1.0);
        // Light at the eye so screen-facing triangles are fully lit.
        view.light.position = Point3::default();
        view.material.specular = 0.0;
        view
    }

    /// Counter-clockwise square halves facing +z, at world depth `z`.
    fn quad(z: f64, half: f64, color: Rgb<u8>) -> Vec<Triangle> {
        let p = |x: f64, y: f64| Point3::new(x, y, z);
        vec![
            Triangle::flat([p(-half, -half), p(half, -half), p(half, half)], color),
            Triangle::flat([p(-half, -half), p(half, half), p(-half, half)], color),
        ]
    }

    fn center(renderer: &Renderer) -> Rgb<u8> {
        *renderer.image().get_pixel(renderer.width() / 2, renderer.height() / 2)
    }

    #[test]
    fn front_face_covers_center() {
        let mut renderer = Renderer::new(64, 64);
        let drawn = renderer.render(&quad(0.0, 1.0, RED), &view());

        assert_eq!(2, drawn);
        let pixel = center(&renderer);
        assert!(pixel[0] > 150 && pixel[1] == 0 && pixel[2] == 0, "{:?}", pixel);
        assert_eq!(Rgb([0, 0, 0]), *renderer.image().get_pixel(0, 0));
    }

    #[test]
    fn back_face_is_culled() {
        let mut triangles = quad(0.0, 1.0, RED);
        for t in triangles.iter_mut() {
            t.vertices.swap(1, 2);
        }

        let mut renderer = Renderer::new(64, 64);
        assert_eq!(0, renderer.render(&triangles, &view()));
        assert_eq!(Rgb([0, 0, 0]), center(&renderer));
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let near = quad(1.0, 1.0, BLUE);
        let far = quad(-1.0, 1.0, RED);

        for order in [[&far, &near], [&near, &far]].iter() {
            let triangles: Vec<Triangle> = order.iter().flat_map(|q| q.iter().cloned()).collect();
            let mut renderer = Renderer::new(64, 64);
            renderer.render(&triangles, &view());

            let pixel = center(&renderer);
            assert!(pixel[2] > 0 && pixel[0] == 0, "{:?}", pixel);
        }
    }

    #[test]
    fn triangles_behind_near_plane_are_dropped() {
        // Camera sits at z = 8 with the near plane at z = 6.
        let mut renderer = Renderer::new(64, 64);
        assert_eq!(0, renderer.render(&quad(7.0, 1.0, RED), &view()));
        assert_eq!(0, renderer.render(&quad(20.0, 1.0, RED), &view()));
    }

    #[test]
    fn fog_darkens_distant_faces() {
        let mut thick = view();
        thick.fog_density = 0.5;

        let mut clear = Renderer::new(32, 32);
        clear.render(&quad(0.0, 1.0, RED), &view());
        let mut foggy = Renderer::new(32, 32);
        foggy.render(&quad(0.0, 1.0, RED), &thick);

        assert!(center(&foggy)[0] < center(&clear)[0]);
    }

    #[test]
    fn resize_reallocates() {
        let mut renderer = Renderer::new(8, 8);
        renderer.resize(30, 17);

        assert_eq!((30, 17), renderer.image().dimensions());
        assert_eq!(30 * 17 * 3, renderer.pixels().len());

        // Height not a multiple of the band size.
        renderer.render(&quad(0.0, 4.0, RED), &view());
        assert!(center(&renderer)[0] > 0);
    }
}
