//! Clash detection and repair on a generated MSDF.
//!
//! Two neighbouring pixels clash when at least two of their channels jump by
//! more than the threshold between them: bilinear filtering across such a
//! pair can invent a false edge. Of each clashing pair, the pixel farther
//! from an outline is flagged, and every flagged pixel is collapsed to its
//! median. Detection reads a snapshot of the bitmap; repairs are applied
//! only after a full pass, first for the four direct neighbours, then for
//! the diagonals.

use rayon::prelude::*;
use tracing::debug;

use crate::bitmap::MsdfBitmap;
use crate::math::{Vector2, median};

/// Pixels flagged by each correction pass.
///
/// A flagged pixel that already had equal channels is counted even though
/// collapsing it to its median leaves it unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    pub cardinal: usize,
    pub diagonal: usize,
}

impl CorrectionStats {
    pub fn total(&self) -> usize {
        self.cardinal + self.diagonal
    }
}

/// Whether `a` should be flagged for clashing with its neighbour `b`.
pub fn detect_clash(a: [f32; 3], b: [f32; 3], threshold: f64) -> bool {
    let [mut a0, mut a1, mut a2] = a;
    let [mut b0, mut b1, mut b2] = b;

    // Order channel pairs by decreasing difference.
    if (b0 - a0).abs() < (b1 - a1).abs() {
        std::mem::swap(&mut a0, &mut a1);
        std::mem::swap(&mut b0, &mut b1);
    }
    if (b1 - a1).abs() < (b2 - a2).abs() {
        std::mem::swap(&mut a1, &mut a2);
        std::mem::swap(&mut b1, &mut b2);
        if (b0 - a0).abs() < (b1 - a1).abs() {
            std::mem::swap(&mut a0, &mut a1);
            std::mem::swap(&mut b0, &mut b1);
        }
    }

    (b1 - a1).abs() as f64 >= threshold
        // An already equalized neighbour cannot clash.
        && !(b0 == b1 && b0 == b2)
        // Only the pixel farther from the outline is flagged.
        && (a2 - 0.5).abs() >= (b2 - 0.5).abs()
}

/// Indices of pixels clashing with any of the given neighbours.
fn find_clashes(bitmap: &MsdfBitmap, neighbours: &[(i64, i64, f64)]) -> Vec<usize> {
    let width = bitmap.width() as i64;
    let height = bitmap.height() as i64;
    let pixels = bitmap.pixels();

    (0..pixels.len())
        .into_par_iter()
        .filter(|&i| {
            let x = i as i64 % width;
            let y = i as i64 / width;
            neighbours.iter().any(|&(dx, dy, threshold)| {
                let (nx, ny) = (x + dx, y + dy);
                nx >= 0
                    && nx < width
                    && ny >= 0
                    && ny < height
                    && detect_clash(pixels[i], pixels[(ny * width + nx) as usize], threshold)
            })
        })
        .collect()
}

fn equalize(bitmap: &mut MsdfBitmap, clashes: &[usize]) {
    let pixels = bitmap.pixels_mut();
    for &i in clashes {
        let [r, g, b] = pixels[i];
        pixels[i] = [median(r, g, b); 3];
    }
}

/// Detect and repair channel clashes in place.
///
/// `threshold` is the per-axis clash threshold in normalized channel units,
/// typically `edge_threshold / (scale * range)`. Diagonal neighbours use the
/// sum of both axes.
#[tracing::instrument(
    skip(bitmap),
    name = "msdf.correct",
    fields(width = bitmap.width(), height = bitmap.height())
)]
pub fn correct_errors(bitmap: &mut MsdfBitmap, threshold: Vector2) -> CorrectionStats {
    let cardinal = find_clashes(
        bitmap,
        &[
            (-1, 0, threshold.x),
            (1, 0, threshold.x),
            (0, -1, threshold.y),
            (0, 1, threshold.y),
        ],
    );
    equalize(bitmap, &cardinal);

    let diagonal_threshold = threshold.x + threshold.y;
    let diagonal = find_clashes(
        bitmap,
        &[
            (-1, -1, diagonal_threshold),
            (1, -1, diagonal_threshold),
            (-1, 1, diagonal_threshold),
            (1, 1, diagonal_threshold),
        ],
    );
    equalize(bitmap, &diagonal);

    let stats = CorrectionStats {
        cardinal: cardinal.len(),
        diagonal: diagonal.len(),
    };
    debug!(cardinal = stats.cardinal, diagonal = stats.diagonal, "clashes corrected");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::color_edges_simple;
    use crate::generator::generate_msdf;
    use crate::projection::Projection;
    use crate::shape::{circle, rectangle};
    use pretty_assertions::assert_eq;

    #[test]
    fn two_channel_jump_flags_farther_pixel() {
        let a = [0.9, 0.1, 0.7];
        let b = [0.1, 0.9, 0.6];
        assert!(detect_clash(a, b, 0.5));
        assert!(!detect_clash(b, a, 0.5));
    }

    #[test]
    fn single_channel_jump_is_not_a_clash() {
        assert!(!detect_clash([0.5, 0.5, 0.9], [0.5, 0.5, 0.1], 0.1));
    }

    #[test]
    fn below_threshold_is_not_a_clash() {
        assert!(!detect_clash([0.9, 0.1, 0.7], [0.1, 0.9, 0.6], 0.81));
    }

    #[test]
    fn equalized_neighbour_is_skipped() {
        assert!(!detect_clash([0.9, 0.1, 0.9], [0.3, 0.3, 0.3], 0.1));
    }

    #[test]
    fn cardinal_pass_equalizes_to_median() {
        let mut bitmap = MsdfBitmap::from_pixels(
            3,
            1,
            vec![[0.9, 0.1, 0.7], [0.1, 0.9, 0.6], [0.5, 0.5, 0.5]],
        )
        .unwrap();
        let stats = correct_errors(&mut bitmap, Vector2::new(0.5, 0.5));
        assert_eq!(stats, CorrectionStats { cardinal: 1, diagonal: 0 });
        assert_eq!(bitmap.pixel(0, 0), [0.7, 0.7, 0.7]);
        assert_eq!(bitmap.pixel(1, 0), [0.1, 0.9, 0.6]);

        let again = correct_errors(&mut bitmap, Vector2::new(0.5, 0.5));
        assert_eq!(again.total(), 0);
    }

    #[test]
    fn flagged_equal_pixel_is_counted_but_unchanged() {
        let pixels = vec![[0.9, 0.9, 0.9], [0.1, 0.2, 0.8]];
        let mut bitmap = MsdfBitmap::from_pixels(2, 1, pixels.clone()).unwrap();
        let stats = correct_errors(&mut bitmap, Vector2::new(0.5, 0.5));
        assert_eq!(stats, CorrectionStats { cardinal: 1, diagonal: 0 });
        assert_eq!(bitmap.pixels(), pixels.as_slice());
    }

    #[test]
    fn diagonal_pass_uses_summed_threshold() {
        let flat = [0.5, 0.5, 0.5];
        let pixels = vec![[0.9, 0.1, 0.7], flat, flat, [0.1, 0.9, 0.6]];
        let mut bitmap = MsdfBitmap::from_pixels(2, 2, pixels.clone()).unwrap();
        let stats = correct_errors(&mut bitmap, Vector2::new(0.3, 0.3));
        assert_eq!(stats, CorrectionStats { cardinal: 0, diagonal: 1 });
        assert_eq!(bitmap.pixel(0, 0), [0.7, 0.7, 0.7]);

        // 0.8 apart diagonally is under 0.45 + 0.45.
        let mut bitmap = MsdfBitmap::from_pixels(2, 2, pixels).unwrap();
        assert_eq!(correct_errors(&mut bitmap, Vector2::new(0.45, 0.45)).total(), 0);
    }

    #[test]
    fn correction_is_idempotent() {
        let mut shape = rectangle(Vector2::new(2.0, 2.0), Vector2::new(9.0, 7.0));
        shape.contours.extend(circle(5.0, 9.0, 3.0).contours);
        color_edges_simple(&mut shape, 3.0, 0);
        let mut bitmap = MsdfBitmap::new(24, 24).unwrap();
        let projection = Projection::uniform(2.0, Vector2::ZERO);
        generate_msdf(&mut bitmap, &shape, &projection, 2.0).unwrap();

        let threshold = Vector2::new(1.001 / 4.0, 1.001 / 4.0);
        correct_errors(&mut bitmap, threshold);
        let once = bitmap.clone();
        correct_errors(&mut bitmap, threshold);
        assert_eq!(bitmap, once);
    }
}
