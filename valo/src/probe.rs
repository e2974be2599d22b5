use itertools::iproduct;

use crate::{
    bounce::SurfaceBounceStore,
    capture::{CaptureDevice, CubeCapture, CubeFace},
    effect::CaptureEffect,
    error::BakeError,
    math::Point3,
    sh::ShBasis,
    surface::Surface,
    valo_trace,
};

/// Interior/exterior classification of a probe.
///
/// Exterior probes are inert placeholders; they never allocate a capture
/// target, never capture and are always considered ready.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InHouse {
    Inside,
    Outside,
}

/// A point sample of the local light environment.
///
/// Owns its cube capture target outright and carries the running SH estimate
/// that damped capture deltas fold into. The six capture cameras are the
/// fixed [`CubeFace`] enumeration, each with a 90° field of view.
pub struct Probe {
    position: Point3<f32>,
    in_house: InHouse,
    target: Option<CubeCapture>,
    sh: ShBasis,
    envelope: f32,
    passes: u32,
    failed: bool,
}

impl Probe {
    pub fn new(position: Point3<f32>, in_house: InHouse) -> Self {
        Self {
            position,
            in_house,
            target: None,
            sh: ShBasis::zeros(),
            envelope: 1.0,
            passes: 0,
            failed: false,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn in_house(&self) -> InHouse {
        self.in_house
    }

    pub fn sh(&self) -> &ShBasis {
        &self.sh
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    pub fn set_envelope(&mut self, envelope: f32) {
        self.envelope = envelope;
    }

    /// `true` if the probe takes part in bounce capture. Exterior probes and
    /// probes whose target allocation failed do not.
    pub fn participates(&self) -> bool {
        self.in_house == InHouse::Inside && !self.failed
    }

    /// Non-participating probes are ready by definition; interior probes are
    /// ready once their capture target exists.
    pub fn is_ready(&self) -> bool {
        !self.participates() || self.target.is_some()
    }

    /// Lazily allocates the cube capture target. Idempotent; a no-op for
    /// probes that do not participate.
    ///
    /// Allocation failure permanently excludes the probe from capture,
    /// equivalent to an exterior classification.
    pub fn prepare_capture_target(
        &mut self,
        device: &mut dyn CaptureDevice,
        res: u16,
    ) -> Result<(), BakeError> {
        if !self.participates() || self.target.is_some() {
            return Ok(());
        }
        match device.alloc_cube_target(res) {
            Ok(target) => {
                self.target = Some(target);
                Ok(())
            }
            Err(why) => {
                self.failed = true;
                Err(why)
            }
        }
    }

    /// One capture-and-project cycle.
    ///
    /// Renders the six faces in fixed order, clearing each before the draw,
    /// with the bounce store's current lightmaps as source radiance. The
    /// projected basis is folded into the running estimate damped by
    /// `damping * envelope` and the folded delta is returned for splatting
    /// into surface lightmaps.
    ///
    /// A non-finite projection is discarded without touching the running
    /// estimate. A capture that sees no geometry yields an all-zero delta,
    /// bounded by the damping weight like any other.
    pub fn capture_and_project(
        &mut self,
        surfaces: &[Surface],
        store: &SurfaceBounceStore,
        effect: &dyn CaptureEffect,
        damping: f32,
    ) -> Result<ShBasis, BakeError> {
        let target = self
            .target
            .as_mut()
            .ok_or_else(|| BakeError::ResourceAllocation("capture target not prepared".into()))?;

        let res = target.res();
        for face in CubeFace::ALL {
            target.clear_face(face);
            for (y, x) in iproduct!(0..res, 0..res) {
                let dir = face.texel_direction(x, y, res).normalized();
                *target.texel_mut(face, x, y) =
                    effect.radiance(self.position, dir, surfaces, store);
            }
            valo_trace!("Probe capture face {} done", face);
        }

        let projected = ShBasis::project(target);
        if !projected.is_finite() {
            return Err(BakeError::NumericDivergence);
        }

        let weight = damping * self.envelope;
        self.sh.accumulate(&projected, weight);
        self.passes += 1;
        Ok(projected.scaled(weight))
    }
}
