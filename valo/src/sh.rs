use itertools::iproduct;

use crate::{
    capture::{texel_solid_angle, CubeCapture, CubeFace},
    math::{Spectrum, Vec3},
};

/// Number of order-2 spherical harmonic basis functions.
pub const COEFF_COUNT: usize = 9;

// Real SH basis constants up to l = 2
// Ramamoorthi, Hanrahan: An Efficient Representation for Irradiance Environment Maps
const Y_00: f32 = 0.282_095;
const Y_1: f32 = 0.488_603;
const Y_2: f32 = 1.092_548;
const Y_20: f32 = 0.315_392;
const Y_22: f32 = 0.546_274;

// Cosine lobe convolution constants from the same paper
const C_1: f32 = 0.429_043;
const C_2: f32 = 0.511_664;
const C_3: f32 = 0.743_125;
const C_4: f32 = 0.886_227;
const C_5: f32 = 0.247_708;

/// An order-2 spherical harmonic radiance estimate.
///
/// Nine RGB coefficients in the order l00, l1-1, l10, l11, l2-2, l2-1, l20,
/// l21, l22. Always fully defined; zero-initialized and only ever mutated
/// through full-basis accumulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShBasis {
    pub coeffs: [Spectrum<f32>; COEFF_COUNT],
}

/// Evaluates the nine basis functions for a unit direction.
pub fn eval_basis(dir: Vec3<f32>) -> [f32; COEFF_COUNT] {
    debug_assert!((dir.len() - 1.0).abs() < 1e-3);

    let Vec3 { x, y, z } = dir;
    [
        Y_00,
        Y_1 * y,
        Y_1 * z,
        Y_1 * x,
        Y_2 * x * y,
        Y_2 * y * z,
        Y_20 * (3.0 * z * z - 1.0),
        Y_2 * x * z,
        Y_22 * (x * x - y * y),
    ]
}

impl ShBasis {
    pub fn zeros() -> Self {
        Self {
            coeffs: [Spectrum::zeros(); COEFF_COUNT],
        }
    }

    /// Projects a cube capture onto the basis.
    ///
    /// Each texel contributes its radiance weighted by the exact solid angle
    /// it subtends, so the projection of a constant environment carries the
    /// constant in l00 and nothing in the higher bands. Summation order is
    /// fixed by the face enumeration, keeping results reproducible.
    pub fn project(capture: &CubeCapture) -> Self {
        let res = capture.res();
        let mut coeffs = [Spectrum::zeros(); COEFF_COUNT];
        for face in CubeFace::ALL {
            for (y, x) in iproduct!(0..res, 0..res) {
                let dir = face.texel_direction(x, y, res).normalized();
                let weight = texel_solid_angle(x, y, res);
                let radiance = capture.texel(face, x, y);
                let basis = eval_basis(dir);
                for (coeff, b) in coeffs.iter_mut().zip(basis.iter()) {
                    *coeff += radiance * (b * weight);
                }
            }
        }
        Self { coeffs }
    }

    /// Adds `delta * weight` into the running estimate.
    ///
    /// Component-wise addition, so accumulating a set of deltas is
    /// order-independent within float tolerance.
    pub fn accumulate(&mut self, delta: &ShBasis, weight: f32) {
        for (coeff, d) in self.coeffs.iter_mut().zip(delta.coeffs.iter()) {
            *coeff += *d * weight;
        }
    }

    /// Returns the basis scaled by a weight.
    pub fn scaled(&self, weight: f32) -> Self {
        let mut coeffs = self.coeffs;
        for coeff in &mut coeffs {
            *coeff *= weight;
        }
        Self { coeffs }
    }

    /// Reconstructs radiance towards a unit direction.
    pub fn radiance(&self, dir: Vec3<f32>) -> Spectrum<f32> {
        let basis = eval_basis(dir);
        let mut out = Spectrum::zeros();
        for (coeff, b) in self.coeffs.iter().zip(basis.iter()) {
            out += *coeff * *b;
        }
        out
    }

    /// Evaluates irradiance for a surface with the given unit normal.
    ///
    /// Cosine lobe convolution in SH. Ringing can push the result negative
    /// for strongly directional estimates, so components are clamped to zero
    /// to keep accumulated lightmaps monotone.
    pub fn irradiance(&self, n: Vec3<f32>) -> Spectrum<f32> {
        debug_assert!((n.len() - 1.0).abs() < 1e-3);

        let Vec3 { x, y, z } = n;
        let c = &self.coeffs;
        let e = c[8] * (C_1 * (x * x - y * y))
            + c[6] * (C_3 * z * z - C_5)
            + c[0] * C_4
            + (c[4] * (x * y) + c[7] * (x * z) + c[5] * (y * z)) * (2.0 * C_1)
            + (c[3] * x + c[1] * y + c[2] * z) * (2.0 * C_2);
        e.max_zero()
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(Spectrum::is_finite)
    }
}

impl Default for ShBasis {
    fn default() -> Self {
        Self::zeros()
    }
}
