use std::collections::HashSet;

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::{
    bounce::{DirectLightRenderer, SurfaceBounceStore},
    capture::CaptureDevice,
    effect::CaptureEffect,
    error::BakeError,
    math::{Point3, Vec3},
    probe::{InHouse, Probe},
    surface::Surface,
    valo_debug, valo_info, valo_warn,
};

// Keeps a misconfigured spacing from trying to build a million probes
const MAX_PROBE_COUNT: usize = 65_536;

/// The settings for building a [`Volume`].
#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
pub struct VolumeSettings {
    /// Distance between neighboring grid probes.
    pub probe_spacing: f32,
    /// Per-face resolution of each probe's cube capture target.
    pub capture_res: u16,
    /// How many nearby probes at most shade a single surface texel.
    pub max_probes_per_texel: usize,
    /// Intensity scale applied to every probe's contribution.
    pub probe_envelope: f32,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            probe_spacing: 1.0,
            capture_res: 16,
            max_probes_per_texel: 4,
            probe_envelope: 1.0,
        }
    }
}

/// One probe of an interpolation set with its normalized weight.
#[derive(Copy, Clone, Debug)]
pub struct WeightedProbe {
    pub probe: usize,
    pub weight: f32,
}

/// The probe grid covering the scene interior.
///
/// Owns its probes, the surface list and the bounce store exclusively;
/// nothing is shared across volumes. Probes stay in creation (grid) order so
/// repeated bakes visit them identically.
pub struct Volume {
    settings: VolumeSettings,
    surfaces: Vec<Surface>,
    probes: Vec<Probe>,
    store: SurfaceBounceStore,
}

impl Volume {
    /// Places probes on a grid over the surface bounds, classifies them with
    /// the scene's inside/outside test and allocates bounce store entries
    /// for every surface.
    ///
    /// Surface validation fails fast here so bouncing never encounters a
    /// surface without a store entry. Zero surfaces build an empty volume.
    pub fn build(
        surfaces: Vec<Surface>,
        settings: VolumeSettings,
        is_inside: &dyn Fn(Point3<f32>) -> bool,
    ) -> Result<Self, BakeError> {
        if !(settings.probe_spacing > 0.0) {
            return Err(BakeError::InvalidSettings(format!(
                "probe spacing {} is not positive",
                settings.probe_spacing
            )));
        }
        if settings.max_probes_per_texel == 0 {
            return Err(BakeError::InvalidSettings(
                "max probes per texel is zero".into(),
            ));
        }

        let mut ids = HashSet::new();
        for surface in &surfaces {
            if !ids.insert(surface.id) {
                return Err(BakeError::InvalidSurface {
                    name: surface.name.clone(),
                    reason: format!("duplicate surface id {:?}", surface.id),
                });
            }
            if surface.lightmap_res.x == 0 || surface.lightmap_res.y == 0 {
                return Err(BakeError::InvalidSurface {
                    name: surface.name.clone(),
                    reason: "zero lightmap resolution".into(),
                });
            }
            if surface.area() < 1e-8 {
                return Err(BakeError::InvalidSurface {
                    name: surface.name.clone(),
                    reason: "degenerate geometry".into(),
                });
            }
        }

        let mut store = SurfaceBounceStore::new();
        for surface in &surfaces {
            store.insert(surface);
        }

        let mut probes = Vec::new();
        if let Some((min, max)) = surface_bounds(&surfaces) {
            let spacing = settings.probe_spacing;
            let extent = max - min;
            let nx = (extent.x / spacing).ceil() as usize + 1;
            let ny = (extent.y / spacing).ceil() as usize + 1;
            let nz = (extent.z / spacing).ceil() as usize + 1;
            if nx * ny * nz > MAX_PROBE_COUNT {
                return Err(BakeError::InvalidSettings(format!(
                    "probe grid {}x{}x{} exceeds the {} probe limit",
                    nx, ny, nz, MAX_PROBE_COUNT
                )));
            }

            for (iz, iy, ix) in iproduct!(0..nz, 0..ny, 0..nx) {
                let position = min
                    + Vec3::new(
                        (ix as f32) * spacing,
                        (iy as f32) * spacing,
                        (iz as f32) * spacing,
                    );
                let in_house = if is_inside(position) {
                    InHouse::Inside
                } else {
                    InHouse::Outside
                };
                let mut probe = Probe::new(position, in_house);
                probe.set_envelope(settings.probe_envelope);
                probes.push(probe);
            }
        }

        let interior = probes.iter().filter(|p| p.participates()).count();
        valo_info!(
            "Volume built: {} surfaces, {} probes ({} interior)",
            surfaces.len(),
            probes.len(),
            interior
        );

        Ok(Self {
            settings,
            surfaces,
            probes,
            store,
        })
    }

    pub fn settings(&self) -> VolumeSettings {
        self.settings
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub fn probe(&self, index: usize) -> &Probe {
        &self.probes[index]
    }

    pub fn store(&self) -> &SurfaceBounceStore {
        &self.store
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    pub fn participating_probe_count(&self) -> usize {
        self.probes.iter().filter(|p| p.participates()).count()
    }

    /// `true` once every probe is ready: exterior and failed probes
    /// immediately, interior probes once their capture target exists.
    pub fn is_ready(&self) -> bool {
        self.probes.iter().all(Probe::is_ready)
    }

    /// The nearest interior probes shading a surface texel, with normalized
    /// inverse-distance weights.
    ///
    /// Weights sum to one, degrade to a single probe when only one is in
    /// range and the set is empty when no probe participates at all.
    pub fn assign_probes_to_surface_texel(
        &self,
        _surface: &Surface,
        texel_pos: Point3<f32>,
    ) -> Vec<WeightedProbe> {
        weighted_probes(
            &self.probes,
            self.settings.max_probes_per_texel,
            self.settings.probe_spacing,
            texel_pos,
        )
    }

    /// Seeds every surface's direct lightmap through the host's direct
    /// light renderer. A failed surface is left black and the bake goes on.
    pub(crate) fn seed_direct(
        &mut self,
        renderer: &mut dyn DirectLightRenderer,
    ) -> Result<(), BakeError> {
        for surface in &self.surfaces {
            match renderer.render_direct(surface) {
                Ok(map) => self.store.set_direct(surface.id, map)?,
                Err(why) => {
                    valo_warn!(
                        "Direct seed failed for surface '{}', leaving it unlit: {}",
                        surface.name,
                        why
                    );
                }
            }
        }
        Ok(())
    }

    /// One bounce pass for a single probe: lazy target preparation, capture
    /// and projection against the current lightmaps, then splatting the
    /// damped delta into every surface texel the probe helps shade.
    pub(crate) fn bounce_probe(
        &mut self,
        index: usize,
        device: &mut dyn CaptureDevice,
        effect: &dyn CaptureEffect,
        damping: f32,
    ) -> Result<(), BakeError> {
        let capture_res = self.settings.capture_res;
        let max_probes = self.settings.max_probes_per_texel;
        let spacing = self.settings.probe_spacing;

        let probe = &mut self.probes[index];
        probe.prepare_capture_target(device, capture_res)?;
        let delta = probe.capture_and_project(&self.surfaces, &self.store, effect, damping)?;
        valo_debug!("Probe {} pass {} projected", index, probe.passes());

        let probes = &self.probes;
        for surface in &self.surfaces {
            self.store.apply_irradiance(surface, &delta, &|texel_pos| {
                weighted_probes(probes, max_probes, spacing, texel_pos)
                    .iter()
                    .find(|wp| wp.probe == index)
                    .map_or(0.0, |wp| wp.weight)
            })?;
        }
        Ok(())
    }
}

fn surface_bounds(surfaces: &[Surface]) -> Option<(Point3<f32>, Point3<f32>)> {
    let mut bounds: Option<(Point3<f32>, Point3<f32>)> = None;
    for surface in surfaces {
        let corners = [
            surface.origin,
            surface.origin + surface.edge_u,
            surface.origin + surface.edge_v,
            surface.origin + surface.edge_u + surface.edge_v,
        ];
        for corner in corners {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(corner), max.max(corner)),
                None => (corner, corner),
            });
        }
    }
    bounds
}

fn weighted_probes(
    probes: &[Probe],
    max_probes: usize,
    spacing: f32,
    texel_pos: Point3<f32>,
) -> Vec<WeightedProbe> {
    let mut candidates: Vec<(usize, f32)> = probes
        .iter()
        .enumerate()
        .filter(|(_, p)| p.participates())
        .map(|(i, p)| (i, p.position().dist_sqr(texel_pos)))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    // Prefer probes within interpolation range of the grid, but always keep
    // at least the nearest one
    let range_sqr = (2.0 * spacing) * (2.0 * spacing);
    let in_range = candidates.iter().take_while(|(_, d)| *d <= range_sqr).count();
    candidates.truncate(in_range.max(1).min(max_probes));

    let mut set: Vec<WeightedProbe> = candidates
        .into_iter()
        .map(|(probe, dist_sqr)| WeightedProbe {
            probe,
            // Inverse distance with a small bias so a texel exactly on a
            // probe stays finite
            weight: 1.0 / (dist_sqr.sqrt() + 1e-4),
        })
        .collect();

    let total: f32 = set.iter().map(|wp| wp.weight).sum();
    for wp in &mut set {
        wp.weight /= total;
    }
    set
}
