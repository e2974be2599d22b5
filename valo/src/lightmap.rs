use crate::math::{Spectrum, Vec2};

/// A per-surface pixel buffer for baked lighting.
///
/// Stored in row-major RGB order like a film tile. The accumulated indirect
/// map of a bounce entry is only ever updated in place through [`add`], so a
/// partially baked map is always valid to display.
///
/// [`add`]: Lightmap::add
#[derive(Clone, Debug)]
pub struct Lightmap {
    res: Vec2<u16>,
    texels: Vec<Spectrum<f32>>,
}

impl Lightmap {
    pub fn new(res: Vec2<u16>, clear_color: Spectrum<f32>) -> Self {
        let texel_count = (res.x as usize) * (res.y as usize);
        Self {
            res,
            texels: vec![clear_color; texel_count],
        }
    }

    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    pub fn texels(&self) -> &[Spectrum<f32>] {
        &self.texels
    }

    pub fn texel(&self, x: u16, y: u16) -> Spectrum<f32> {
        debug_assert!(x < self.res.x && y < self.res.y);

        self.texels[(y as usize) * (self.res.x as usize) + (x as usize)]
    }

    /// Adds radiance into a texel. Never replaces, only accumulates.
    pub fn add(&mut self, x: u16, y: u16, delta: Spectrum<f32>) {
        debug_assert!(x < self.res.x && y < self.res.y);

        self.texels[(y as usize) * (self.res.x as usize) + (x as usize)] += delta;
    }

    /// Nearest-texel sample at normalized UV, clamped to the edge.
    pub fn sample(&self, u: f32, v: f32) -> Spectrum<f32> {
        let x = ((u * (self.res.x as f32)) as i64).clamp(0, (self.res.x as i64) - 1) as usize;
        let y = ((v * (self.res.y as f32)) as i64).clamp(0, (self.res.y as i64) - 1) as usize;
        self.texels[y * (self.res.x as usize) + x]
    }

    /// Sum over all texels, used to track bake progress.
    pub fn total(&self) -> Spectrum<f32> {
        let mut sum = Spectrum::zeros();
        for texel in &self.texels {
            sum += *texel;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn add_accumulates() {
        let mut map = Lightmap::new(vec2(2, 2), Spectrum::zeros());
        map.add(1, 0, Spectrum::ones());
        map.add(1, 0, Spectrum::ones() * 0.5);
        assert_abs_diff_eq!(map.texel(1, 0), Spectrum::ones() * 1.5);
        assert_abs_diff_eq!(map.texel(0, 0), Spectrum::zeros());
    }

    #[test]
    fn sample_clamps_to_edges() {
        let mut map = Lightmap::new(vec2(2, 1), Spectrum::zeros());
        map.add(0, 0, Spectrum::new(1.0, 0.0, 0.0));
        map.add(1, 0, Spectrum::new(0.0, 1.0, 0.0));

        assert_abs_diff_eq!(map.sample(-0.5, 0.5), Spectrum::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(map.sample(0.25, 0.5), Spectrum::new(1.0, 0.0, 0.0));
        assert_abs_diff_eq!(map.sample(0.75, 0.5), Spectrum::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(map.sample(1.5, 0.5), Spectrum::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn total_sums_texels() {
        let mut map = Lightmap::new(vec2(2, 2), Spectrum::ones());
        map.add(0, 1, Spectrum::ones());
        assert_abs_diff_eq!(map.total(), Spectrum::ones() * 5.0);
    }
}
