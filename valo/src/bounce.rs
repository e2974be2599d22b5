use std::collections::HashMap;
use std::f32::consts::FRAC_1_PI;

use itertools::iproduct;

use crate::{
    error::BakeError,
    lightmap::Lightmap,
    math::{Point3, Spectrum},
    sh::ShBasis,
    surface::{Surface, SurfaceId},
};

/// Per-surface lightmap pair: the direct seed and the accumulated indirect
/// term that bounce passes fold new light into.
#[derive(Clone, Debug)]
pub struct SurfaceBounceEntry {
    pub direct: Lightmap,
    pub indirect: Lightmap,
}

/// O(1) lookup of bounce entries by surface identity.
///
/// All entries are allocated at volume build so both lightmaps of every
/// participating surface exist before the first capture reads them.
#[derive(Default)]
pub struct SurfaceBounceStore {
    entries: HashMap<SurfaceId, SurfaceBounceEntry>,
}

impl SurfaceBounceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the lightmap pair for a surface, both cleared to black.
    pub fn insert(&mut self, surface: &Surface) {
        self.entries.insert(
            surface.id,
            SurfaceBounceEntry {
                direct: Lightmap::new(surface.lightmap_res, Spectrum::zeros()),
                indirect: Lightmap::new(surface.lightmap_res, Spectrum::zeros()),
            },
        );
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceBounceEntry> {
        self.entries.get(&id)
    }

    pub fn entry(&self, id: SurfaceId) -> Result<&SurfaceBounceEntry, BakeError> {
        self.entries
            .get(&id)
            .ok_or(BakeError::InvalidSurfaceReference(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the direct seed of a surface.
    ///
    /// The map resolution has to match the entry allocated at build.
    pub fn set_direct(&mut self, id: SurfaceId, map: Lightmap) -> Result<(), BakeError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(BakeError::InvalidSurfaceReference(id))?;
        if map.res() != entry.direct.res() {
            return Err(BakeError::ResourceAllocation(format!(
                "direct lightmap resolution {:?} does not match entry {:?}",
                map.res(),
                entry.direct.res()
            )));
        }
        entry.direct = map;
        Ok(())
    }

    /// The radiance a capture ray sees at a surface UV: direct seed plus the
    /// indirect light accumulated so far. This readback is what makes passes
    /// iterative; pass N's writes become pass N+1's capture input.
    pub fn radiance_at(&self, id: SurfaceId, u: f32, v: f32) -> Result<Spectrum<f32>, BakeError> {
        let entry = self.entry(id)?;
        Ok(entry.direct.sample(u, v) + entry.indirect.sample(u, v))
    }

    /// Splats an SH irradiance estimate additively into a surface's indirect
    /// map. `weight_fn` gives the per-texel interpolation weight for the
    /// contributing probe.
    ///
    /// All texel contributions are computed before any write lands so the
    /// splat never re-reads values written earlier in the same call.
    pub fn apply_irradiance(
        &mut self,
        surface: &Surface,
        basis: &ShBasis,
        weight_fn: &dyn Fn(Point3<f32>) -> f32,
    ) -> Result<(), BakeError> {
        let normal = surface.normal();
        // Lambert fold: outgoing bounced radiance is E/π (albedo handled by
        // the host material)
        let bounced = basis.irradiance(normal) * FRAC_1_PI;

        let res = surface.lightmap_res;
        let mut adds = Vec::with_capacity((res.x as usize) * (res.y as usize));
        for (y, x) in iproduct!(0..res.y, 0..res.x) {
            let weight = weight_fn(surface.texel_center(x, y));
            adds.push((x, y, bounced * weight));
        }

        let entry = self
            .entries
            .get_mut(&surface.id)
            .ok_or(BakeError::InvalidSurfaceReference(surface.id))?;
        for (x, y, delta) in adds {
            entry.indirect.add(x, y, delta);
        }
        Ok(())
    }
}

/// Seed pass renderer, the seam towards the host's direct lighting.
pub trait DirectLightRenderer {
    fn render_direct(&mut self, surface: &Surface) -> Result<Lightmap, BakeError>;
}

/// Direct renderer that fills each surface's map with its emitted radiance.
#[derive(Default)]
pub struct EmissiveRenderer;

impl DirectLightRenderer for EmissiveRenderer {
    fn render_direct(&mut self, surface: &Surface) -> Result<Lightmap, BakeError> {
        Ok(Lightmap::new(surface.lightmap_res, surface.emission))
    }
}
