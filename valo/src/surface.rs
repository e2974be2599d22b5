use crate::math::{Point3, Spectrum, Vec2, Vec3};

/// Stable identity of a lightmapped surface.
///
/// Probes and the bounce store refer to surfaces through this key, never
/// through owning pointers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// A ray hit on a surface in lightmap UV space.
#[derive(Copy, Clone, Debug)]
pub struct SurfaceHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// A lightmapped quad: origin plus two edge vectors.
///
/// The lightmap parametrization is the quad's own UV, standing in for the
/// second UV channel of a full mesh pipeline.
#[derive(Clone, Debug)]
pub struct Surface {
    pub id: SurfaceId,
    pub name: String,
    pub origin: Point3<f32>,
    pub edge_u: Vec3<f32>,
    pub edge_v: Vec3<f32>,
    /// Emitted radiance, the seed for the direct lighting pass.
    pub emission: Spectrum<f32>,
    pub lightmap_res: Vec2<u16>,
}

impl Surface {
    pub fn new(
        id: SurfaceId,
        name: &str,
        origin: Point3<f32>,
        edge_u: Vec3<f32>,
        edge_v: Vec3<f32>,
        emission: Spectrum<f32>,
        lightmap_res: Vec2<u16>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            origin,
            edge_u,
            edge_v,
            emission,
            lightmap_res,
        }
    }

    /// The surface normal, oriented by the winding of the edge vectors.
    pub fn normal(&self) -> Vec3<f32> {
        self.edge_u.cross(self.edge_v).normalized()
    }

    pub fn area(&self) -> f32 {
        self.edge_u.cross(self.edge_v).len()
    }

    /// World-space center of a lightmap texel.
    pub fn texel_center(&self, x: u16, y: u16) -> Point3<f32> {
        debug_assert!(x < self.lightmap_res.x && y < self.lightmap_res.y);

        let u = (x as f32 + 0.5) / (self.lightmap_res.x as f32);
        let v = (y as f32 + 0.5) / (self.lightmap_res.y as f32);
        self.origin + self.edge_u * u + self.edge_v * v
    }

    /// Intersects a ray against the quad, returning the hit with lightmap UV.
    ///
    /// Both sides are visible; captures happen from probe positions inside
    /// the scene so there is no backface culling here.
    pub fn intersect(&self, origin: Point3<f32>, dir: Vec3<f32>) -> Option<SurfaceHit> {
        let n = self.edge_u.cross(self.edge_v);
        let denom = n.dot(dir);
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = n.dot(self.origin - origin) / denom;
        if t <= 1e-4 {
            return None;
        }

        let hit = origin + dir * t;
        let local = hit - self.origin;
        let u = local.dot(self.edge_u) / self.edge_u.len_sqr();
        let v = local.dot(self.edge_v) / self.edge_v.len_sqr();
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(SurfaceHit { t, u, v })
    }
}
