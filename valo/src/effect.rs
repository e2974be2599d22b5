use crate::{
    bounce::SurfaceBounceStore,
    math::{Point3, Spectrum, Vec3},
    surface::Surface,
    valo_warn,
};

/// Shades a single capture ray, the seam towards the capture shader.
///
/// Probes drive one call per cube face texel; the effect decides what
/// radiance that texel sees given the current state of the bounce store.
pub trait CaptureEffect {
    fn radiance(
        &self,
        origin: Point3<f32>,
        dir: Vec3<f32>,
        surfaces: &[Surface],
        store: &SurfaceBounceStore,
    ) -> Spectrum<f32>;
}

/// CPU capture effect: raycasts the surface list and samples the hit
/// surface's direct plus accumulated indirect lightmaps as source radiance.
#[derive(Copy, Clone, Debug)]
pub struct LightmapEffect {
    /// Radiance for rays that escape the scene.
    pub background: Spectrum<f32>,
}

impl Default for LightmapEffect {
    fn default() -> Self {
        Self {
            background: Spectrum::zeros(),
        }
    }
}

impl CaptureEffect for LightmapEffect {
    fn radiance(
        &self,
        origin: Point3<f32>,
        dir: Vec3<f32>,
        surfaces: &[Surface],
        store: &SurfaceBounceStore,
    ) -> Spectrum<f32> {
        let mut nearest: Option<(f32, Spectrum<f32>)> = None;
        for surface in surfaces {
            if let Some(hit) = surface.intersect(origin, dir) {
                if nearest.map_or(true, |(t, _)| hit.t < t) {
                    // Entries exist for every built surface, but an ad-hoc
                    // surface list can still miss the store
                    let radiance = match store.radiance_at(surface.id, hit.u, hit.v) {
                        Ok(radiance) => radiance,
                        Err(why) => {
                            valo_warn!(
                                "Capture ray hit surface '{}' without a bounce entry: {}",
                                surface.name,
                                why
                            );
                            Spectrum::zeros()
                        }
                    };
                    nearest = Some((hit.t, radiance));
                }
            }
        }
        nearest.map_or(self.background, |(_, radiance)| radiance)
    }
}
