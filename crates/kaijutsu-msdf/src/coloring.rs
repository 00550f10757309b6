//! Edge coloring: assign channel masks so that the edges meeting at a sharp
//! corner never share every channel.
//!
//! Each contour is classified by its corner count. Smooth contours get one
//! color, one-corner "teardrops" get three bands, and everything else gets
//! one color per corner-to-corner spline. All choices come from a 64-bit
//! seed, so the same seed always yields the same coloring.

use tracing::{debug, trace};

use crate::contour::Contour;
use crate::edge::{Edge, EdgeColor};
use crate::math::{Vector2, cross, dot};
use crate::shape::Shape;

/// Starting colors for a fresh switch; indexed by `seed % 3`.
const START_COLORS: [EdgeColor; 3] = [EdgeColor::Cyan, EdgeColor::Magenta, EdgeColor::Yellow];

/// Whether the turn from direction `a` to `b` is sharp.
///
/// Both directions must be normalized. `cross_threshold` is the sine of the
/// angle threshold; reversals (`dot <= 0`) always count as corners.
pub fn is_corner(a: Vector2, b: Vector2, cross_threshold: f64) -> bool {
    dot(a, b) <= 0.0 || cross(a, b).abs() > cross_threshold
}

/// Advance `color` to a different two-channel color, consuming seed bits.
///
/// If `color` shares exactly one channel with `banned`, the result is the
/// complement of that channel, so it overlaps `banned` as little as
/// possible. Black or white restart from a seed-chosen CMY color.
fn switch_color(color: &mut EdgeColor, seed: &mut u64, banned: EdgeColor) {
    let combined = *color & banned;
    if matches!(combined, EdgeColor::Red | EdgeColor::Green | EdgeColor::Blue) {
        *color = combined ^ EdgeColor::White;
        return;
    }
    if matches!(*color, EdgeColor::Black | EdgeColor::White) {
        *color = START_COLORS[(*seed % 3) as usize];
        *seed /= 3;
        return;
    }
    let shifted = (color.bits() as u32) << (1 + (*seed & 1));
    *color = EdgeColor::from_bits(((shifted | shifted >> 3) & 7) as u8);
    *seed >>= 1;
}

/// Indices of edges that start a corner.
fn find_corners(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let Some(last) = contour.edges.last() else {
        return Vec::new();
    };
    let mut corners = Vec::new();
    let mut prev_direction = last.direction(1.0);
    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(
            prev_direction.normalize(),
            edge.direction(0.0).normalize(),
            cross_threshold,
        ) {
            corners.push(index);
        }
        prev_direction = edge.direction(1.0);
    }
    corners
}

/// Band (0, 1 or 2) for edge `i` of `m`, counting from a teardrop corner.
///
/// Spreads the three bands symmetrically, with the middle band centered
/// opposite the corner.
fn teardrop_band(i: usize, m: usize) -> usize {
    // Offset by 3 keeps the value positive before truncation.
    let band = (3.0 + 2.875 * i as f64 / (m - 1) as f64 - 1.4375 + 0.5) as i64 - 3;
    (band + 1) as usize
}

fn color_teardrop(contour: &mut Contour, corner: usize, seed: &mut u64) {
    let mut colors = [EdgeColor::White; 3];
    let mut color = EdgeColor::White;
    switch_color(&mut color, seed, EdgeColor::Black);
    colors[0] = color;
    switch_color(&mut color, seed, EdgeColor::Black);
    colors[2] = color;

    let m = contour.edges.len();
    if m >= 3 {
        for i in 0..m {
            contour.edges[(corner + i) % m].color = colors[teardrop_band(i, m)];
        }
        return;
    }

    // Fewer than three edges cannot carry three colors: split into thirds.
    // Parts are laid out starting from the corner edge.
    let mut parts: Vec<Edge> = Vec::with_capacity(6);
    if m == 1 {
        parts.extend(contour.edges[0].split_in_thirds());
        for (part, color) in parts.iter_mut().zip(colors) {
            part.color = color;
        }
    } else {
        parts.extend(contour.edges[corner].split_in_thirds());
        parts.extend(contour.edges[1 - corner].split_in_thirds());
        for (i, part) in parts.iter_mut().enumerate() {
            part.color = colors[i / 2];
        }
    }
    trace!(edges = m, parts = parts.len(), "teardrop split into thirds");
    contour.edges = parts;
}

fn color_splines(contour: &mut Contour, corners: &[usize], seed: &mut u64) {
    let corner_count = corners.len();
    let start = corners[0];
    let m = contour.edges.len();

    let mut color = EdgeColor::White;
    switch_color(&mut color, seed, EdgeColor::Black);
    let initial_color = color;

    let mut spline = 0;
    for i in 0..m {
        let index = (start + i) % m;
        if spline + 1 < corner_count && corners[spline + 1] == index {
            spline += 1;
            // The last spline wraps around to meet the first one.
            let banned = if spline == corner_count - 1 {
                initial_color
            } else {
                EdgeColor::Black
            };
            switch_color(&mut color, seed, banned);
        }
        contour.edges[index].color = color;
    }
}

/// Color every edge of `shape` for MSDF generation.
///
/// `angle_threshold` is in radians: joins turning by more than this are
/// corners. Identical seeds give identical colorings. The shape is mutated
/// in place and short teardrop contours are re-segmented; coloring a shape
/// twice is not supported.
#[tracing::instrument(skip(shape), name = "msdf.color", fields(contours = shape.contours.len()))]
pub fn color_edges_simple(shape: &mut Shape, angle_threshold: f64, mut seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut total_corners = 0;

    for contour in &mut shape.contours {
        if contour.is_empty() {
            continue;
        }
        let corners = find_corners(contour, cross_threshold);
        total_corners += corners.len();

        match corners.as_slice() {
            [] => {
                let mut color = EdgeColor::White;
                switch_color(&mut color, &mut seed, EdgeColor::Black);
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            }
            [corner] => color_teardrop(contour, *corner, &mut seed),
            _ => color_splines(contour, &corners, &mut seed),
        }
    }

    debug!(edges = shape.edge_count(), corners = total_corners, "edges colored");
}
