use crate::foundation::core::Rgba8;
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::foundation::math::{mul_div255_u8, unpremultiply_in_place};
use crate::render::backend::RenderProgress;
use crate::render::frame::FrameBuffer;
use crate::scene::camera::Viewpoint;
use crate::scene::document::HomeScene;
use rayon::prelude::*;
use vello_cpu::kurbo::{Affine, BezPath, Point, Rect};

/// Output rows rendered per band.
const BAND_ROWS: u32 = 256;
/// Faces with a corner closer than this (scene units) are not drawn.
const NEAR_PLANE: f64 = 1.0;
/// Projected coordinates are clamped to this magnitude.
const COORD_LIMIT: f64 = 1.0e6;
/// Largest supersampling factor per axis.
pub(crate) const MAX_SCALE: u32 = 16;
/// Blend target for selected blocks.
const SELECTION_TINT: [u8; 3] = [0, 120, 255];

/// Block faces as corner indices with a fixed light factor (out of 255).
const FACES: [([usize; 4], u8); 6] = [
    ([0, 1, 2, 3], 140),
    ([4, 5, 6, 7], 255),
    ([0, 1, 5, 4], 205),
    ([3, 2, 6, 7], 180),
    ([0, 3, 7, 4], 190),
    ([1, 2, 6, 5], 220),
];

struct Face {
    pts: [Point; 4],
    depth: f64,
    min_y: f64,
    max_y: f64,
    color: Rgba8,
}

impl Face {
    fn path(&self) -> BezPath {
        let mut p = BezPath::new();
        p.move_to(self.pts[0]);
        for &pt in &self.pts[1..] {
            p.line_to(pt);
        }
        p.close_path();
        p
    }
}

/// Largest `width * scale` the rasterizer accepts.
pub(crate) fn max_raster_width(scale: u32) -> u32 {
    u32::from(u16::MAX) / scale.clamp(1, MAX_SCALE)
}

/// Draw `scene` from `viewpoint` with `scale` x `scale` supersampling.
///
/// Rendering proceeds in horizontal bands; `progress` receives the completed fraction after
/// each band. The result is straight-alpha RGBA8 at `width` x `height`.
pub(crate) fn rasterize(
    scene: &HomeScene,
    viewpoint: &Viewpoint,
    width: u32,
    height: u32,
    background: Rgba8,
    scale: u32,
    progress: &dyn RenderProgress,
) -> HomeshotResult<FrameBuffer> {
    let scale = scale.clamp(1, MAX_SCALE);
    if width == 0 || height == 0 {
        return Err(HomeshotError::render(format!(
            "cannot rasterize an empty {width}x{height} frame"
        )));
    }
    if width > max_raster_width(scale) {
        return Err(HomeshotError::render(format!(
            "width {width} exceeds the rasterizer limit of {} at {scale}x sampling",
            max_raster_width(scale)
        )));
    }

    let mut out = FrameBuffer::new(width, height)?;
    let band_rows = BAND_ROWS.min(height);
    let src_w = width * scale;
    let band_h = band_rows * scale;
    let faces = project_faces(
        scene,
        viewpoint,
        f64::from(src_w),
        f64::from(height) * f64::from(scale),
    );

    let mut ctx = vello_cpu::RenderContext::new(src_w as u16, band_h as u16);
    let mut pixmap = vello_cpu::Pixmap::new(src_w as u16, band_h as u16);
    let bands = height.div_ceil(band_rows);
    let row_bytes = width as usize * 4;

    for band in 0..bands {
        let y0 = band * band_rows;
        let rows = band_rows.min(height - y0);
        let top = f64::from(y0) * f64::from(scale);
        let bottom = top + f64::from(band_h);

        ctx.reset();
        ctx.set_transform(Affine::IDENTITY);
        ctx.set_paint(paint(background));
        ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(src_w), f64::from(band_h)));

        ctx.set_transform(Affine::translate((0.0, -top)));
        for face in faces.iter().filter(|f| f.max_y >= top && f.min_y <= bottom) {
            ctx.set_paint(paint(face.color));
            ctx.fill_path(&face.path());
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let start = y0 as usize * row_bytes;
        let dst = &mut out.data_mut()[start..start + rows as usize * row_bytes];
        downsample_into(
            pixmap.data_as_u8_slice(),
            src_w as usize,
            scale as usize,
            width as usize,
            dst,
        );
        progress.report((band + 1) as f32 / bands as f32);
    }

    unpremultiply_in_place(out.data_mut());
    Ok(out)
}

fn paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c[0], c[1], c[2], c[3])
}

fn project_faces(scene: &HomeScene, viewpoint: &Viewpoint, w: f64, h: f64) -> Vec<Face> {
    let basis = viewpoint.basis();
    let (half_w, half_h) = (w / 2.0, h / 2.0);
    let focal = half_w / (viewpoint.effective_field_of_view() / 2.0).tan();

    let mut faces = Vec::with_capacity(scene.blocks.len() * FACES.len());
    for (i, block) in scene.blocks.iter().enumerate() {
        let selected = scene.selection.contains(&i);
        let cam = block.corners().map(|c| basis.to_camera(c));
        'faces: for (corners, light) in FACES {
            let mut pts = [Point::ZERO; 4];
            let mut depth = 0.0;
            for (k, &ci) in corners.iter().enumerate() {
                let [cx, cy, cz] = cam[ci];
                if cz <= NEAR_PLANE {
                    continue 'faces;
                }
                pts[k] = Point::new(
                    (half_w + cx * focal / cz).clamp(-COORD_LIMIT, COORD_LIMIT),
                    (half_h - cy * focal / cz).clamp(-COORD_LIMIT, COORD_LIMIT),
                );
                depth += cz;
            }
            let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
            let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
            faces.push(Face {
                pts,
                depth: depth / 4.0,
                min_y,
                max_y,
                color: shade(block.color.rgba8(), light, selected),
            });
        }
    }
    // Painter's order: farthest first.
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces
}

fn shade(base: Rgba8, light: u8, selected: bool) -> Rgba8 {
    let lit = |c: u8| mul_div255_u8(u16::from(c), u16::from(light));
    let mut rgb = [lit(base[0]), lit(base[1]), lit(base[2])];
    if selected {
        for (c, t) in rgb.iter_mut().zip(SELECTION_TINT) {
            *c = ((u16::from(*c) + u16::from(t)) / 2) as u8;
        }
    }
    [rgb[0], rgb[1], rgb[2], base[3]]
}

/// Box-filter `scale` x `scale` blocks of premultiplied `src` into `dst` rows.
fn downsample_into(src: &[u8], src_w: usize, scale: usize, width: usize, dst: &mut [u8]) {
    if scale == 1 {
        let n = dst.len();
        dst.copy_from_slice(&src[..n]);
        return;
    }
    let n = (scale * scale) as u32;
    dst.par_chunks_exact_mut(width * 4)
        .enumerate()
        .for_each(|(row, out)| {
            for x in 0..width {
                let mut sum = [0u32; 4];
                for sy in 0..scale {
                    let base = ((row * scale + sy) * src_w + x * scale) * 4;
                    for px in src[base..base + scale * 4].chunks_exact(4) {
                        for c in 0..4 {
                            sum[c] += u32::from(px[c]);
                        }
                    }
                }
                for c in 0..4 {
                    out[x * 4 + c] = ((sum[c] + n / 2) / n) as u8;
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
