use std::array;

use strum::Display;

use crate::{
    error::BakeError,
    math::{vec3, Spectrum, Vec3},
};

/// The fixed capture order of the six cube faces.
///
/// A probe's capture cameras are this enumeration: one 90° frustum per face,
/// so the six frusta exactly partition the sphere around the probe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    pub fn index(self) -> usize {
        match self {
            CubeFace::PosX => 0,
            CubeFace::NegX => 1,
            CubeFace::PosY => 2,
            CubeFace::NegY => 3,
            CubeFace::PosZ => 4,
            CubeFace::NegZ => 5,
        }
    }

    /// The view direction of the face's capture camera.
    pub fn forward(self) -> Vec3<f32> {
        match self {
            CubeFace::PosX => vec3(1.0, 0.0, 0.0),
            CubeFace::NegX => vec3(-1.0, 0.0, 0.0),
            CubeFace::PosY => vec3(0.0, 1.0, 0.0),
            CubeFace::NegY => vec3(0.0, -1.0, 0.0),
            CubeFace::PosZ => vec3(0.0, 0.0, 1.0),
            CubeFace::NegZ => vec3(0.0, 0.0, -1.0),
        }
    }

    pub fn up(self) -> Vec3<f32> {
        match self {
            CubeFace::PosY => vec3(0.0, 0.0, -1.0),
            CubeFace::NegY => vec3(0.0, 0.0, 1.0),
            _ => vec3(0.0, 1.0, 0.0),
        }
    }

    pub fn right(self) -> Vec3<f32> {
        match self {
            CubeFace::PosX => vec3(0.0, 0.0, -1.0),
            CubeFace::NegX => vec3(0.0, 0.0, 1.0),
            CubeFace::PosY => vec3(1.0, 0.0, 0.0),
            CubeFace::NegY => vec3(1.0, 0.0, 0.0),
            CubeFace::PosZ => vec3(1.0, 0.0, 0.0),
            CubeFace::NegZ => vec3(-1.0, 0.0, 0.0),
        }
    }

    /// The unnormalized direction through the center of the given texel.
    pub fn texel_direction(self, x: u16, y: u16, res: u16) -> Vec3<f32> {
        debug_assert!(x < res && y < res);

        let s = ((x as f32 + 0.5) / (res as f32)) * 2.0 - 1.0;
        let t = ((y as f32 + 0.5) / (res as f32)) * 2.0 - 1.0;
        self.forward() + self.right() * s + self.up() * t
    }
}

// AMD CubeMapGen's exact per-texel solid angle through the area element
// https://www.rorydriscoll.com/2012/01/15/cubemap-texel-solid-angle/
fn area_element(x: f32, y: f32) -> f32 {
    (x * y).atan2((x * x + y * y + 1.0).sqrt())
}

/// The solid angle subtended by a cube face texel.
///
/// Corner and edge texels subtend less than center texels, correcting the
/// distortion of mapping a cube onto the sphere. The sum over all texels of
/// all six faces is 4π.
pub fn texel_solid_angle(x: u16, y: u16, res: u16) -> f32 {
    debug_assert!(x < res && y < res);

    let inv_res = 1.0 / (res as f32);
    let x0 = (x as f32) * 2.0 * inv_res - 1.0;
    let x1 = x0 + 2.0 * inv_res;
    let y0 = (y as f32) * 2.0 * inv_res - 1.0;
    let y1 = y0 + 2.0 * inv_res;
    area_element(x0, y0) - area_element(x0, y1) - area_element(x1, y0) + area_element(x1, y1)
}

/// A six-face environment capture target around a probe.
///
/// Radiance is stored per face in row-major order at a fixed square
/// resolution, matching the synchronous readback of the capture pass.
#[derive(Clone, Debug)]
pub struct CubeCapture {
    res: u16,
    faces: [Vec<Spectrum<f32>>; 6],
}

impl CubeCapture {
    pub fn new(res: u16) -> Self {
        let texel_count = (res as usize) * (res as usize);
        Self {
            res,
            faces: array::from_fn(|_| vec![Spectrum::zeros(); texel_count]),
        }
    }

    pub fn res(&self) -> u16 {
        self.res
    }

    pub fn face(&self, face: CubeFace) -> &[Spectrum<f32>] {
        &self.faces[face.index()]
    }

    /// Clears the face to zero radiance before a fresh draw so stale texels
    /// cannot leak into the new capture.
    pub fn clear_face(&mut self, face: CubeFace) {
        for texel in &mut self.faces[face.index()] {
            *texel = Spectrum::zeros();
        }
    }

    pub fn texel(&self, face: CubeFace, x: u16, y: u16) -> Spectrum<f32> {
        self.faces[face.index()][(y as usize) * (self.res as usize) + (x as usize)]
    }

    pub fn texel_mut(&mut self, face: CubeFace, x: u16, y: u16) -> &mut Spectrum<f32> {
        &mut self.faces[face.index()][(y as usize) * (self.res as usize) + (x as usize)]
    }

    /// Fills every face with a constant radiance.
    pub fn fill(&mut self, radiance: Spectrum<f32>) {
        for face in &mut self.faces {
            for texel in face.iter_mut() {
                *texel = radiance;
            }
        }
    }
}

/// Cube capture target allocation, the seam towards the graphics device.
pub trait CaptureDevice {
    fn alloc_cube_target(&mut self, res: u16) -> Result<CubeCapture, BakeError>;
}

/// CPU-side capture device with an allocation limit.
///
/// The limit keeps runaway resolutions from exhausting memory and doubles as
/// the reachable allocation-failure path.
#[derive(Copy, Clone, Debug)]
pub struct CpuCaptureDevice {
    pub max_res: u16,
}

impl Default for CpuCaptureDevice {
    fn default() -> Self {
        Self { max_res: 256 }
    }
}

impl CaptureDevice for CpuCaptureDevice {
    fn alloc_cube_target(&mut self, res: u16) -> Result<CubeCapture, BakeError> {
        if res == 0 || res > self.max_res {
            return Err(BakeError::ResourceAllocation(format!(
                "cube target resolution {} outside supported range 1..={}",
                res, self.max_res
            )));
        }
        Ok(CubeCapture::new(res))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use itertools::iproduct;

    #[test]
    fn solid_angles_cover_the_sphere() {
        // One face covers 4π/6, all texels of all faces cover 4π
        for res in [1u16, 4, 16] {
            let face_total: f32 = iproduct!(0..res, 0..res)
                .map(|(y, x)| texel_solid_angle(x, y, res))
                .sum();
            assert_relative_eq!(
                face_total,
                4.0 * std::f32::consts::PI / 6.0,
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn corner_texels_subtend_less_than_center() {
        let res = 16u16;
        let corner = texel_solid_angle(0, 0, res);
        let center = texel_solid_angle(res / 2, res / 2, res);
        assert!(corner < center);
    }

    #[test]
    fn texel_directions_stay_in_face_frustum() {
        let res = 8u16;
        for face in CubeFace::ALL {
            for (y, x) in iproduct!(0..res, 0..res) {
                let dir = face.texel_direction(x, y, res).normalized();
                // The face's forward axis dominates for every texel it owns
                assert!(dir.dot(face.forward()) >= 1.0 / (3.0f32).sqrt() - 1e-6);
            }
        }
    }

    #[test]
    fn device_rejects_oversized_targets() {
        let mut device = CpuCaptureDevice { max_res: 32 };
        assert!(device.alloc_cube_target(16).is_ok());
        assert!(device.alloc_cube_target(0).is_err());
        assert!(device.alloc_cube_target(64).is_err());
    }
}
