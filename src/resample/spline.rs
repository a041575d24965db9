// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Natural cubic spline with zero second derivative at both endpoints.
//! Grounded on `pu/src/sampling.c`'s `natcubsplinecoef`/`natcubspline`,
//! expressed with the standard (non-equispaced) tridiagonal formulation.

/// Second derivatives at each knot (the "M" array), solved via the Thomas
/// algorithm with natural boundary conditions `M[0] = M[n-1] = 0`.
pub fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n < 3 {
        return vec![0.0; n];
    }
    let h: Vec<f64> = (0..n - 1).map(|i| x[i + 1] - x[i]).collect();

    // Tridiagonal system for M[1..n-2]; sub/diag/sup are the three
    // diagonals, rhs the right-hand side.
    let m = n - 2;
    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for k in 0..m {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
    }

    // Thomas algorithm (natural BC means no sub/sup term spills past the
    // ends of this reduced (n-2)-sized system).
    let mut c_prime = vec![0.0; m];
    let mut d_prime = vec![0.0; m];
    c_prime[0] = sup[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];
    for k in 1..m {
        let denom = diag[k] - sub[k] * c_prime[k - 1];
        c_prime[k] = sup[k] / denom;
        d_prime[k] = (rhs[k] - sub[k] * d_prime[k - 1]) / denom;
    }
    let mut inner = vec![0.0; m];
    inner[m - 1] = d_prime[m - 1];
    for k in (0..m - 1).rev() {
        inner[k] = d_prime[k] - c_prime[k] * inner[k + 1];
    }

    let mut second_deriv = vec![0.0; n];
    second_deriv[1..n - 1].copy_from_slice(&inner);
    second_deriv
}

/// Evaluate the spline at a point known to lie in `[x[i], x[i+1]]` with
/// fractional position `t = (v - x[i]) / (x[i+1] - x[i])`.
pub fn evaluate(x: &[f64], y: &[f64], second_deriv: &[f64], i: usize, t: f64) -> f64 {
    if x.len() < 3 {
        // Fewer than 3 points: fall back to linear interpolation (no
        // curvature information is available).
        return y[i] * (1.0 - t) + y[i + 1] * t;
    }
    let h = x[i + 1] - x[i];
    let a = 1.0 - t;
    let b = t;
    let c = (a * a * a - a) * h * h / 6.0;
    let d = (b * b * b - b) * h * h / 6.0;
    a * y[i] + b * y[i + 1] + c * second_deriv[i] + d * second_deriv[i + 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_a_quadratic_exactly_away_from_endpoints() {
        // A natural cubic spline through samples of x^2 is not exact at
        // the very endpoints (natural BC forces zero curvature there),
        // but is very close in the interior.
        let x: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let d2 = second_derivatives(&x, &y);
        let val = evaluate(&x, &y, &d2, 5, 0.5);
        assert!((val - 30.25).abs() < 0.2);
    }
}
