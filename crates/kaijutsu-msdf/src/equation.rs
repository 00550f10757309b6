//! Real-root solvers for quadratic and cubic polynomials.
//!
//! Both solvers write into a caller-owned `[f64; 3]` and report how many
//! leading entries are valid. Near-degenerate leading coefficients fall back
//! down the chain cubic → quadratic → linear → [`Solutions::Infinite`].
//!
//! The thresholds below are inherited from the reference MSDF tooling and
//! must stay bit-identical for matching output.

/// Above this `|b| / |a|` ratio a quadratic is solved as linear.
const QUADRATIC_LINEAR_RATIO: f64 = 1e12;

/// Above this `|b| / |a|` ratio a cubic is solved as quadratic.
const CUBIC_QUADRATIC_RATIO: f64 = 1e6;

/// Relative tolerance for detecting the Cardano double root.
const CUBIC_DOUBLE_ROOT_EPSILON: f64 = 1e-12;

/// Outcome of a root solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Solutions {
    /// The first `n` entries of the output buffer are real roots.
    Finite(usize),
    /// The polynomial is identically zero: every x is a root.
    ///
    /// There is no unique answer, so callers skip the query.
    Infinite,
}

impl Solutions {
    /// Number of usable roots, treating `Infinite` as none.
    pub fn count(self) -> usize {
        match self {
            Solutions::Finite(n) => n,
            Solutions::Infinite => 0,
        }
    }
}

/// Solve `a·x² + b·x + c = 0`.
///
/// With two roots, `(-b + √Δ) / 2a` comes first and `(-b - √Δ) / 2a`
/// second. That is the larger root only when `a > 0`; for `a < 0` the
/// smaller root comes first. Callers that need an order must sort.
pub fn solve_quadratic(x: &mut [f64; 3], a: f64, b: f64, c: f64) -> Solutions {
    if a == 0.0 || b.abs() > QUADRATIC_LINEAR_RATIO * a.abs() {
        if b == 0.0 {
            if c == 0.0 {
                return Solutions::Infinite;
            }
            return Solutions::Finite(0);
        }
        x[0] = -c / b;
        return Solutions::Finite(1);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let root = discriminant.sqrt();
        x[0] = (-b + root) / (2.0 * a);
        x[1] = (-b - root) / (2.0 * a);
        Solutions::Finite(2)
    } else if discriminant == 0.0 {
        x[0] = -b / (2.0 * a);
        Solutions::Finite(1)
    } else {
        Solutions::Finite(0)
    }
}

/// Solve the monic cubic `x³ + a·x² + b·x + c = 0`.
fn solve_cubic_normed(x: &mut [f64; 3], a: f64, b: f64, c: f64) -> Solutions {
    let a2 = a * a;
    let mut q = 1.0 / 9.0 * (a2 - 3.0 * b);
    let r = 1.0 / 54.0 * (a * (2.0 * a2 - 9.0 * b) + 27.0 * c);
    let r2 = r * r;
    let q3 = q * q * q;
    let a = a / 3.0;

    if r2 < q3 {
        // Three real roots: trigonometric form.
        let t = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        q = -2.0 * q.sqrt();
        x[0] = q * (t / 3.0).cos() - a;
        x[1] = q * ((t + 2.0 * std::f64::consts::PI) / 3.0).cos() - a;
        x[2] = q * ((t - 2.0 * std::f64::consts::PI) / 3.0).cos() - a;
        return Solutions::Finite(3);
    }

    // Cardano.
    let sign = if r < 0.0 { 1.0 } else { -1.0 };
    let u = sign * (r.abs() + (r2 - q3).sqrt()).powf(1.0 / 3.0);
    let v = if u == 0.0 { 0.0 } else { q / u };
    x[0] = (u + v) - a;
    if u == v || (u - v).abs() < CUBIC_DOUBLE_ROOT_EPSILON * (u + v).abs() {
        x[1] = -0.5 * (u + v) - a;
        return Solutions::Finite(2);
    }
    Solutions::Finite(1)
}

/// Solve `a·x³ + b·x² + c·x + d = 0`.
///
/// Roots are returned in no particular order.
pub fn solve_cubic(x: &mut [f64; 3], a: f64, b: f64, c: f64, d: f64) -> Solutions {
    if a != 0.0 {
        let bn = b / a;
        if bn.abs() < CUBIC_QUADRATIC_RATIO {
            return solve_cubic_normed(x, bn, c / a, d / a);
        }
    }
    solve_quadratic(x, b, c, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(x: &[f64; 3], n: usize) -> Vec<f64> {
        let mut roots = x[..n].to_vec();
        roots.sort_by(|a, b| a.total_cmp(b));
        roots
    }

    #[test]
    fn quadratic_two_roots_larger_first() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, 1.0, 0.0, -4.0), Solutions::Finite(2));
        assert_eq!(x[0], 2.0);
        assert_eq!(x[1], -2.0);
    }

    #[test]
    fn quadratic_negative_leading_keeps_numerator_order() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, -1.0, 0.0, 4.0), Solutions::Finite(2));
        assert_eq!(x[0], -2.0);
        assert_eq!(x[1], 2.0);
    }

    #[test]
    fn cubic_trigonometric_roots_exact() {
        // Trigonometric branch: a = -6, b = 11 gives q = 1/9 · 3, r = 1/54 · 0.
        let mut x = [0.0; 3];
        assert_eq!(solve_cubic(&mut x, 1.0, -6.0, 11.0, -6.0), Solutions::Finite(3));
        let q: f64 = 1.0 / 9.0 * 3.0;
        let t = 0.0f64.clamp(-1.0, 1.0).acos();
        assert_eq!(x[0], -2.0 * q.sqrt() * (t / 3.0).cos() + 2.0);
    }

    #[test]
    fn quadratic_double_root() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, 1.0, -2.0, 1.0), Solutions::Finite(1));
        assert_eq!(x[0], 1.0);
    }

    #[test]
    fn quadratic_no_real_roots() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, 1.0, 0.0, 1.0), Solutions::Finite(0));
    }

    #[test]
    fn quadratic_degrades_to_linear() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, 0.0, 2.0, -3.0), Solutions::Finite(1));
        assert_eq!(x[0], 1.5);

        // Tiny leading coefficient relative to b.
        assert_eq!(solve_quadratic(&mut x, 1e-14, 2.0, -3.0), Solutions::Finite(1));
        assert_eq!(x[0], 1.5);
    }

    #[test]
    fn quadratic_constant_cases() {
        let mut x = [0.0; 3];
        assert_eq!(solve_quadratic(&mut x, 0.0, 0.0, 0.0), Solutions::Infinite);
        assert_eq!(solve_quadratic(&mut x, 0.0, 0.0, 5.0), Solutions::Finite(0));
        assert_eq!(Solutions::Infinite.count(), 0);
    }

    #[test]
    fn cubic_three_distinct_roots() {
        let mut x = [0.0; 3];
        let n = solve_cubic(&mut x, 1.0, -6.0, 11.0, -6.0).count();
        assert_eq!(n, 3);
        let roots = sorted(&x, n);
        for (root, expected) in roots.iter().zip([1.0, 2.0, 3.0]) {
            assert!((root - expected).abs() < 1e-9, "{root} vs {expected}");
        }
    }

    #[test]
    fn cubic_single_real_root() {
        // (x - 2)(x² + 1)
        let mut x = [0.0; 3];
        let n = solve_cubic(&mut x, 1.0, -2.0, 1.0, -2.0).count();
        assert_eq!(n, 1);
        assert!((x[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_double_root() {
        // (x - 1)²(x + 2) = x³ - 3x + 2
        let mut x = [0.0; 3];
        let n = solve_cubic(&mut x, 1.0, 0.0, -3.0, 2.0).count();
        assert_eq!(n, 2);
        let roots = sorted(&x, n);
        assert!((roots[0] + 2.0).abs() < 1e-9);
        assert!((roots[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_degrades_to_quadratic() {
        let mut x = [0.0; 3];
        assert_eq!(solve_cubic(&mut x, 0.0, 1.0, 0.0, -4.0), Solutions::Finite(2));
        assert_eq!((x[0], x[1]), (2.0, -2.0));

        // Leading coefficient negligible next to b.
        let n = solve_cubic(&mut x, 1e-9, 1.0, 0.0, -4.0).count();
        assert_eq!(n, 2);
    }

    #[test]
    fn cubic_identically_zero() {
        let mut x = [0.0; 3];
        assert_eq!(solve_cubic(&mut x, 0.0, 0.0, 0.0, 0.0), Solutions::Infinite);
    }
}
