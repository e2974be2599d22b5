#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_abs_diff_eq;

    use valo::bounce::{DirectLightRenderer, EmissiveRenderer};
    use valo::capture::CpuCaptureDevice;
    use valo::effect::LightmapEffect;
    use valo::error::BakeError;
    use valo::lightmap::Lightmap;
    use valo::math::{point3, vec2, vec3, Point3, Spectrum};
    use valo::scheduler::{BakeSettings, BakeState, BounceScheduler};
    use valo::surface::{Surface, SurfaceId};
    use valo::volume::{Volume, VolumeSettings};

    // Two facing walls, one emissive, with probes in the gap between them
    fn facing_walls() -> Vec<Surface> {
        vec![
            Surface::new(
                SurfaceId(0),
                "dark_wall",
                point3(0.0, 0.0, 0.0),
                vec3(2.0, 0.0, 0.0),
                vec3(0.0, 2.0, 0.0),
                Spectrum::zeros(),
                vec2(4, 4),
            ),
            Surface::new(
                SurfaceId(1),
                "lit_wall",
                point3(0.0, 0.0, 2.0),
                vec3(2.0, 0.0, 0.0),
                vec3(0.0, 2.0, 0.0),
                Spectrum::ones() * 4.0,
                vec2(4, 4),
            ),
        ]
    }

    fn interior(p: Point3<f32>) -> bool {
        p.x > 0.0 && p.x < 2.0 && p.y > 0.0 && p.y < 2.0 && p.z > 0.0 && p.z < 2.0
    }

    fn small_settings() -> VolumeSettings {
        VolumeSettings {
            capture_res: 4,
            ..VolumeSettings::default()
        }
    }

    fn seeded_bake(max_passes: u32) -> (Volume, BounceScheduler) {
        let mut volume = Volume::build(facing_walls(), small_settings(), &interior).unwrap();
        let settings = BakeSettings {
            max_passes,
            ..BakeSettings::default()
        };
        let mut scheduler = BounceScheduler::new(settings);
        scheduler
            .capture_direct(&mut volume, &mut EmissiveRenderer)
            .unwrap();
        assert_eq!(scheduler.state(), BakeState::Bouncing);
        (volume, scheduler)
    }

    fn indirect_total(volume: &Volume, id: SurfaceId) -> Spectrum<f32> {
        volume.store().entry(id).unwrap().indirect.total()
    }

    #[test]
    fn emissive_wall_lights_the_facing_wall() {
        let (mut volume, mut scheduler) = seeded_bake(16);
        let mut device = CpuCaptureDevice::default();
        let effect = LightmapEffect::default();

        scheduler
            .run_to_convergence(&mut volume, &mut device, &effect)
            .unwrap();

        assert!(scheduler.is_converged());
        assert_eq!(scheduler.passes_completed(), 16);

        let dark = indirect_total(&volume, SurfaceId(0));
        assert!(dark.r > 0.0 && dark.g > 0.0 && dark.b > 0.0);
    }

    #[test]
    fn sliced_run_matches_a_straight_run() {
        let mut device = CpuCaptureDevice::default();
        let effect = LightmapEffect::default();

        let (mut straight, mut scheduler) = seeded_bake(4);
        scheduler
            .run_to_convergence(&mut straight, &mut device, &effect)
            .unwrap();

        let (mut sliced, mut scheduler) = seeded_bake(4);
        while scheduler
            .run_for(&mut sliced, &mut device, &effect, Duration::from_millis(1))
            .unwrap()
        {}
        assert!(scheduler.is_converged());

        // Probes run in creation order regardless of slicing, so the floats
        // land on identical values
        for id in [SurfaceId(0), SurfaceId(1)] {
            assert_abs_diff_eq!(
                indirect_total(&straight, id),
                indirect_total(&sliced, id),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn accumulated_light_never_regresses() {
        let (mut volume, mut scheduler) = seeded_bake(8);
        let mut device = CpuCaptureDevice::default();
        let effect = LightmapEffect::default();

        let mut previous = indirect_total(&volume, SurfaceId(0));
        loop {
            let more = scheduler
                .run_for(&mut volume, &mut device, &effect, Duration::from_millis(2))
                .unwrap();
            let current = indirect_total(&volume, SurfaceId(0));
            assert!(current.r >= previous.r);
            assert!(current.g >= previous.g);
            assert!(current.b >= previous.b);
            previous = current;
            if !more {
                break;
            }
        }
    }

    #[test]
    fn exterior_probes_never_capture() {
        let (mut volume, mut scheduler) = seeded_bake(2);
        let mut device = CpuCaptureDevice::default();
        let effect = LightmapEffect::default();

        scheduler
            .run_to_convergence(&mut volume, &mut device, &effect)
            .unwrap();

        for probe in volume.probes() {
            if !probe.participates() {
                assert_eq!(probe.passes(), 0);
            }
        }
    }

    // Seeds every surface with infinite radiance so captures diverge
    struct OverflowingRenderer;

    impl DirectLightRenderer for OverflowingRenderer {
        fn render_direct(&mut self, surface: &Surface) -> Result<Lightmap, BakeError> {
            Ok(Lightmap::new(
                surface.lightmap_res,
                Spectrum::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            ))
        }
    }

    #[test]
    fn divergent_captures_do_not_poison_the_bake() {
        let mut volume = Volume::build(facing_walls(), small_settings(), &interior).unwrap();
        let mut scheduler = BounceScheduler::new(BakeSettings {
            max_passes: 2,
            ..BakeSettings::default()
        });
        scheduler
            .capture_direct(&mut volume, &mut OverflowingRenderer)
            .unwrap();

        let mut device = CpuCaptureDevice::default();
        let effect = LightmapEffect::default();
        scheduler
            .run_to_convergence(&mut volume, &mut device, &effect)
            .unwrap();

        // Every capture diverged, was dropped and the bake still finished
        assert!(scheduler.is_converged());
        for probe in volume.probes() {
            assert!(probe.sh().is_finite());
            assert_eq!(probe.passes(), 0);
        }
        for id in [SurfaceId(0), SurfaceId(1)] {
            assert_abs_diff_eq!(indirect_total(&volume, id), Spectrum::zeros());
        }
    }

    #[test]
    fn failed_allocations_do_not_stall_the_bake() {
        let mut volume = Volume::build(facing_walls(), small_settings(), &interior).unwrap();
        let mut scheduler = BounceScheduler::new(BakeSettings {
            max_passes: 2,
            ..BakeSettings::default()
        });
        scheduler
            .capture_direct(&mut volume, &mut EmissiveRenderer)
            .unwrap();

        // Device too small for the volume's capture resolution, every probe
        // retires on its first visit
        let mut device = CpuCaptureDevice { max_res: 2 };
        let effect = LightmapEffect::default();
        scheduler
            .run_to_convergence(&mut volume, &mut device, &effect)
            .unwrap();

        assert!(scheduler.is_converged());
        assert_eq!(volume.participating_probe_count(), 0);
        assert_abs_diff_eq!(indirect_total(&volume, SurfaceId(0)), Spectrum::zeros());
    }
}
