//! Signed distance with an orthogonality tie-breaker.

use std::cmp::Ordering;

/// Distance from a query point to an edge, plus a secondary ordering term.
///
/// `distance` carries the side of the edge in its sign. `dot` is the
/// absolute cosine between the edge direction and the direction to the
/// nearest endpoint; it is zero when the closest point lies on the edge
/// proper. Between two edges at equal distance, the one met more
/// perpendicularly (smaller `dot`) is the more trustworthy source of sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    /// Farther than any real distance; the starting value of a min-scan.
    pub const INFINITE: SignedDistance = SignedDistance {
        distance: -f64::MAX,
        dot: 1.0,
    };

    pub const fn new(distance: f64, dot: f64) -> Self {
        Self { distance, dot }
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        Self::INFINITE
    }
}

impl PartialOrd for SignedDistance {
    /// Orders by `|distance|`, then by `dot`. Sign does not participate.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.distance.abs().partial_cmp(&other.distance.abs())? {
            Ordering::Equal => self.dot.partial_cmp(&other.dot),
            ord => Some(ord),
        }
    }
}
