use std::path::PathBuf;

use chrono::{Datelike, Timelike};

use crate::{bounce::SurfaceBounceStore, surface::Surface, valo_info};

/// Timestamped output path for a surface's baked lightmap, in the current
/// working directory.
pub fn exr_path(surface: &Surface) -> Result<PathBuf, String> {
    match std::env::current_dir() {
        Ok(mut path) => {
            let now = chrono::Local::now();
            let timestamp = format!(
                "{:04}{:02}{:02}_{:02}{:02}{:02}",
                now.year(),
                now.month(),
                now.day(),
                now.hour(),
                now.minute(),
                now.second()
            );
            let filename = format!("{}_{}.exr", surface.name, timestamp);
            path.push(filename);

            Ok(path)
        }
        Err(why) => Err(format!(
            "Error getting current working directory: {:?}",
            why
        )),
    }
}

/// Writes a surface's combined direct plus indirect lightmap as an EXR.
pub fn write_exr(
    surface: &Surface,
    store: &SurfaceBounceStore,
    path: PathBuf,
) -> Result<(), String> {
    let entry = match store.get(surface.id) {
        Some(entry) => entry,
        None => {
            return Err(format!(
                "Surface '{}' has no bounce entry to write",
                surface.name
            ))
        }
    };

    let width = surface.lightmap_res.x as usize;
    let height = surface.lightmap_res.y as usize;
    valo_info!("Writing out EXR for '{}'", surface.name);
    match exr::prelude::write_rgb_file(&path, width, height, |x, y| {
        let direct = entry.direct.texels()[y * width + x];
        let indirect = entry.indirect.texels()[y * width + x];
        let px = direct + indirect;
        (px.r, px.g, px.b)
    }) {
        Ok(_) => {
            valo_info!("EXR written to '{}'", path.to_string_lossy());
            Ok(())
        }
        Err(why) => Err(format!(
            "Error writing EXR to '{}': {:?}",
            path.to_string_lossy(),
            why
        )),
    }
}
