//! Image shown when nothing is selected or no preview can be found

use super::fit_within;
use crate::constants::{PLACEHOLDER_FILENAME, PLACEHOLDER_TEXT};
use crate::utils::rasterize_svg;
use image::RgbaImage;
use resvg::usvg;
use std::path::Path;
use tracing::{debug, warn};

/// `default.png` from the data dir if the user put one there, otherwise generated text.
pub fn load(data_dir: &Path, bounds: (u32, u32)) -> RgbaImage {
    let custom = data_dir.join(PLACEHOLDER_FILENAME);
    if custom.is_file() {
        match image::open(&custom) {
            Ok(img) => {
                debug!(path = %custom.display(), "Using custom placeholder");
                return fit_within(&img, bounds).to_rgba8();
            }
            Err(e) => warn!(error = %e, path = %custom.display(), "Custom placeholder unreadable"),
        }
    }
    generate(PLACEHOLDER_TEXT, bounds)
}

/// Transparent image of `bounds` size with `text` centred on it
pub fn generate(text: &str, (width, height): (u32, u32)) -> RgbaImage {
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{cx}" y="{cy}" font-family="Arial, Helvetica, sans-serif" font-size="20" text-anchor="middle" dominant-baseline="central" fill="#71717a">{text}</text></svg>"##,
        w = width,
        h = height,
        cx = width / 2,
        cy = height / 2,
        text = escape_xml(text),
    );

    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    rasterize_svg(&svg, width, &opt)
        .and_then(|(pixels, w, h)| RgbaImage::from_raw(w, h, pixels))
        .unwrap_or_else(|| {
            warn!("Placeholder rasterization failed, using blank image");
            RgbaImage::new(width, height)
        })
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
