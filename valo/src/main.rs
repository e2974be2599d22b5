use std::time::Duration;

use serde::{Deserialize, Serialize};

use valo::{
    bounce::EmissiveRenderer,
    capture::CpuCaptureDevice,
    effect::LightmapEffect,
    expect,
    math::{point3, vec2, vec3, Point3, Spectrum},
    output,
    scheduler::{BakeSettings, BounceScheduler},
    surface::{Surface, SurfaceId},
    valo_info,
    volume::{Volume, VolumeSettings},
};

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        // .level(log::LevelFilter::Debug)
        // .level(log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("valo.log")?)
        .apply()?;
    Ok(())
}

#[derive(Default, Deserialize, Serialize)]
#[serde(default)]
struct BakerSettings {
    volume: VolumeSettings,
    bake: BakeSettings,
}

fn load_settings() -> BakerSettings {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = expect!(std::fs::File::open(&path), "Failed to open settings file");
            let settings = expect!(
                serde_yaml::from_reader(file),
                "Failed to parse settings file"
            );
            valo_info!("Settings loaded from '{}'", path);
            settings
        }
        None => BakerSettings::default(),
    }
}

/// A 2x2x2 room with an emissive panel on one wall.
fn open_room() -> Vec<Surface> {
    let white = Spectrum::zeros();
    let res = vec2(16, 16);
    vec![
        Surface::new(
            SurfaceId(0),
            "floor",
            point3(0.0, 0.0, 0.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 0.0, 2.0),
            white,
            res,
        ),
        Surface::new(
            SurfaceId(1),
            "ceiling",
            point3(0.0, 2.0, 2.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 0.0, -2.0),
            white,
            res,
        ),
        Surface::new(
            SurfaceId(2),
            "back_wall",
            point3(0.0, 0.0, 2.0),
            vec3(2.0, 0.0, 0.0),
            vec3(0.0, 2.0, 0.0),
            white,
            res,
        ),
        Surface::new(
            SurfaceId(3),
            "left_wall",
            point3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 2.0),
            vec3(0.0, 2.0, 0.0),
            white,
            res,
        ),
        Surface::new(
            SurfaceId(4),
            "panel",
            point3(2.0, 0.0, 0.0),
            vec3(0.0, 2.0, 0.0),
            vec3(0.0, 0.0, 2.0),
            Spectrum::ones() * 4.0,
            res,
        ),
    ]
}

fn room_interior(p: Point3<f32>) -> bool {
    p.x > 0.0 && p.x < 2.0 && p.y > 0.0 && p.y < 2.0 && p.z > 0.0 && p.z < 2.0
}

fn main() {
    if let Err(why) = setup_logger() {
        panic!("{}", why);
    };

    let settings = load_settings();
    let mut volume = expect!(
        Volume::build(open_room(), settings.volume, &room_interior),
        "Failed to build the probe volume"
    );

    let mut scheduler = BounceScheduler::new(settings.bake);
    let mut device = CpuCaptureDevice::default();
    let effect = LightmapEffect::default();

    expect!(
        scheduler.capture_direct(&mut volume, &mut EmissiveRenderer),
        "Direct capture failed"
    );

    // Frame-sized slices, the way a host engine would drive the bake
    let slice = Duration::from_millis(8);
    loop {
        let more = expect!(
            scheduler.run_for(&mut volume, &mut device, &effect, slice),
            "Bounce pass failed"
        );
        if !more {
            break;
        }
        valo_info!(
            "Bounce pass {}/{} running",
            scheduler.passes_completed() + 1,
            scheduler.settings().max_passes
        );
    }
    valo_info!(
        "Bake done in {} passes",
        scheduler.passes_completed()
    );

    for surface in volume.surfaces() {
        let path = expect!(output::exr_path(surface), "Failed to build output path");
        expect!(
            output::write_exr(surface, volume.store(), path),
            "Failed to write lightmap"
        );
    }
}
