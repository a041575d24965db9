// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Region-partitioned Pierluissi approximation to the Voigt profile,
//! `Psi(x,y) = Re[w(z = x + iy)]`, normalized so that the returned value is
//! directly the line shape (including the `1/alpha_D` prefactor), per
//! §4.E. Grounded bit-for-bit on the algorithm (constants and region
//! boundaries) in `pu/src/voigt.c`.

const SQRT_LN2_PI: f64 = 0.469_718_639_349_825_67;
const TWO_OVER_SQRT_PI: f64 = 1.128_379_167_095_512_57;

const A1: f64 = 0.461_313_50;
const A2: f64 = 0.190_163_50;
const A3: f64 = 0.099_992_16;
const A4: f64 = 1.784_492_70;
const A5: f64 = 0.002_883_894;
const A6: f64 = 5.525_343_70;

const B1: f64 = 0.512_424_24;
const B2: f64 = 0.275_255_10;
const B3: f64 = 0.051_765_36;
const B4: f64 = 2.724_745_00;

const MAX_CONV: usize = 61;

/// `ferf[n] = 1 / (n! * (2n+1))`, the power-series coefficients for
/// Region I.
const FERF: [f64; MAX_CONV] = [
    1.000000000000000000000,
    0.333333333333333333333,
    0.100000000000000000000,
    2.38095238095238095238e-2,
    4.62962962962962962963e-3,
    7.57575757575757575758e-4,
    1.06837606837606837607e-4,
    1.32275132275132275132e-5,
    1.45891690009337068161e-6,
    1.45038522231504687645e-7,
    1.31225329638028050726e-8,
    1.08922210371485733805e-9,
    8.35070279514723959168e-11,
    5.94779401363763503681e-12,
    3.95542951645852576340e-13,
    2.46682701026445692771e-14,
    1.44832646435981372650e-15,
    8.03273501241577360914e-17,
    4.22140728880708823303e-18,
    2.10785519144213582486e-19,
    1.00251649349077191670e-20,
    4.55184675892820028624e-22,
    1.97706475387790517483e-23,
    8.23014929921422135684e-25,
    3.28926034917575173275e-26,
    1.26410789889891635220e-27,
    4.67848351551848577373e-29,
    1.66976179341737202699e-30,
    5.75419164398217177220e-32,
    1.91694286210978253077e-33,
    6.18030758822279613746e-35,
    1.93035720881510785656e-36,
    5.84675500746883629630e-38,
    1.71885606280178362397e-39,
    4.90892396452342296700e-41,
    1.36304126177913957635e-42,
    3.68249351546114573519e-44,
    9.68728023887076175384e-46,
    2.48306909745491159104e-47,
    6.20565791963739670594e-49,
    1.51310794954121709805e-50,
    3.60157930981012591661e-52,
    8.37341968387228154283e-54,
    1.90254122728987952724e-55,
    4.22678975419355257584e-57,
    9.18642950239868569596e-59,
    1.95410258232417110410e-60,
    4.07013527785325672298e-62,
    8.30461450592911058168e-64,
    1.66058051345108993284e-65,
    3.25539546201302778914e-67,
    6.25918411694871134025e-69,
    1.18076183891157008800e-70,
    2.18621042295388572103e-72,
    3.97425272266506578576e-74,
    7.09571739181805357327e-76,
    1.24466597738907071213e-77,
    2.14564844309633852739e-79,
    3.63615636540051474579e-81,
    6.05939744697137480783e-83,
    9.93207019544894768776e-85,
];

fn region1_terms(x: f64) -> usize {
    if x < 1.0 {
        15
    } else {
        (6.842 * x + 8.0) as usize
    }
}

/// Evaluate the normalized Voigt line shape at (x, y), already divided by
/// `alpha_d` (so the caller does not need a separate normalization step).
///
/// - `x = sqrt(ln 2) * |nu - nu0| / alpha_D`
/// - `y = sqrt(ln 2) * alpha_L / alpha_D`
pub fn voigt_value(x: f64, y: f64, alpha_d: f64) -> f64 {
    let x2y2 = x * x - y * y;
    let xy2 = 2.0 * x * y;
    let cosxy = xy2.cos();
    let sinxy = xy2.sin();

    if x < 3.0 && y < 1.8 {
        // Region I: convergent power series.
        let n = region1_terms(x) + 1;
        let mut ar = y;
        let mut ai = -x;
        let mut or = y;
        let mut oi = -x;
        let mut i = 1usize;
        loop {
            let ni = or * xy2 + oi * x2y2;
            let nr = or * x2y2 - oi * xy2;
            if i > n || i >= MAX_CONV {
                break;
            }
            ai += ni * FERF[i];
            ar += nr * FERF[i];
            oi = ni;
            or = nr;
            i += 1;
        }
        SQRT_LN2_PI / alpha_d
            * (-x2y2).exp()
            * (cosxy * (1.0 - ar * TWO_OVER_SQRT_PI) - sinxy * ai * TWO_OVER_SQRT_PI)
    } else if x < 5.0 && y < 5.0 {
        // Region II: 3-term rational approximation.
        let ar = xy2 * xy2;
        let nr = xy2 * x;
        let ni = x2y2 - A2;
        let ai = x2y2 - A4;
        let oi = x2y2 - A6;
        SQRT_LN2_PI / alpha_d
            * (A1 * ((nr - ni * y) / (ni * ni + ar))
                + A3 * ((nr - ai * y) / (ai * ai + ar))
                + A5 * ((nr - oi * y) / (oi * oi + ar)))
    } else {
        // Region III: 2-term rational approximation.
        let ar = xy2 * xy2;
        let nr = xy2 * x;
        let ni = x2y2 - B2;
        let ai = x2y2 - B4;
        SQRT_LN2_PI / alpha_d
            * (B1 * ((nr - ni * y) / (ni * ni + ar)) + B3 * ((nr - ai * y) / (ai * ai + ar)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_peaks_at_line_centre() {
        let alpha_d = 0.01;
        let y = 0.1;
        let centre = voigt_value(0.0, y, alpha_d);
        let off = voigt_value(1.0, y, alpha_d);
        assert!(centre > off);
        assert!(centre > 0.0);
    }

    #[test]
    fn profile_is_symmetric_in_x() {
        let alpha_d = 0.02;
        let y = 0.5;
        let left = voigt_value(-2.0, y, alpha_d);
        let right = voigt_value(2.0, y, alpha_d);
        assert!((left - right).abs() < 1e-9);
    }

    #[test]
    fn profile_decays_far_from_centre() {
        let alpha_d = 0.01;
        let y = 0.1;
        let near = voigt_value(0.5, y, alpha_d);
        let far = voigt_value(40.0, y, alpha_d);
        assert!(far < near);
        assert!(far >= 0.0);
    }
}
