#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use valo::error::BakeError;
    use valo::math::{point3, vec2, vec3, Point3, Spectrum};
    use valo::probe::InHouse;
    use valo::surface::{Surface, SurfaceId};
    use valo::volume::{Volume, VolumeSettings};

    fn quad(id: u32, name: &str) -> Surface {
        Surface::new(
            SurfaceId(id),
            name,
            point3(0.0, 0.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 0.0, 2.0),
            Spectrum::zeros(),
            vec2(4, 4),
        )
    }

    #[test]
    fn build_allocates_store_entries_up_front() {
        let surfaces = vec![quad(1, "floor"), quad(2, "deck")];
        let volume = Volume::build(surfaces, VolumeSettings::default(), &|_| true).unwrap();

        for surface in volume.surfaces() {
            let entry = volume.store().entry(surface.id).unwrap();
            assert_eq!(entry.direct.res(), surface.lightmap_res);
            assert_eq!(entry.indirect.res(), surface.lightmap_res);
            assert_abs_diff_eq!(entry.direct.total(), Spectrum::zeros());
            assert_abs_diff_eq!(entry.indirect.total(), Spectrum::zeros());
        }
    }

    #[test]
    fn build_rejects_bad_settings() {
        let settings = VolumeSettings {
            probe_spacing: 0.0,
            ..VolumeSettings::default()
        };
        assert!(matches!(
            Volume::build(vec![quad(1, "floor")], settings, &|_| true),
            Err(BakeError::InvalidSettings(_))
        ));

        let settings = VolumeSettings {
            max_probes_per_texel: 0,
            ..VolumeSettings::default()
        };
        assert!(matches!(
            Volume::build(vec![quad(1, "floor")], settings, &|_| true),
            Err(BakeError::InvalidSettings(_))
        ));
    }

    #[test]
    fn grid_covers_the_surface_bounds() {
        let volume =
            Volume::build(vec![quad(1, "floor")], VolumeSettings::default(), &|_| true).unwrap();

        // 3x1x3 grid over a flat 2x2 quad at unit spacing
        assert_eq!(volume.probe_count(), 9);
        for probe in volume.probes() {
            let p = probe.position();
            assert!((0.0..=2.0).contains(&p.x));
            assert_abs_diff_eq!(p.y, 0.0);
            assert!((0.0..=2.0).contains(&p.z));
        }
    }

    #[test]
    fn classifier_decides_participation() {
        let inside = |p: Point3<f32>| p.z < 1.5;
        let volume =
            Volume::build(vec![quad(1, "floor")], VolumeSettings::default(), &inside).unwrap();

        for probe in volume.probes() {
            match probe.in_house() {
                InHouse::Inside => assert!(probe.position().z < 1.5),
                InHouse::Outside => {
                    assert!(probe.position().z >= 1.5);
                    assert!(!probe.participates());
                }
            }
        }
        assert_eq!(volume.participating_probe_count(), 6);
    }

    #[test]
    fn texel_weights_collapse_to_the_nearest_probes() {
        let volume =
            Volume::build(vec![quad(1, "floor")], VolumeSettings::default(), &|_| true).unwrap();
        let surface = &volume.surfaces()[0];

        // A texel near the surface corner weighs the corner probe heaviest
        let set = volume.assign_probes_to_surface_texel(surface, surface.texel_center(0, 0));
        assert!(!set.is_empty());

        let total: f32 = set.iter().map(|wp| wp.weight).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-5);

        let heaviest = set
            .iter()
            .max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap())
            .unwrap();
        let corner = point3(0.0, 0.0, 0.0);
        let nearest_dist = volume.probe(heaviest.probe).position().dist(corner);
        for wp in &set {
            assert!(volume.probe(wp.probe).position().dist(corner) >= nearest_dist);
        }
    }
}
