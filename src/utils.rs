//! Utility functions

use crate::constants::APP_NAME;
use resvg::{tiny_skia, usvg};
use std::path::{Path, PathBuf};

// Map pin over a ball, square viewBox for window/taskbar icons
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="2" y="2" width="60" height="60" rx="12" fill="#18181b"/><circle cx="32" cy="36" r="16" fill="none" stroke="#38bdf8" stroke-width="4"/><path d="M32 20v32M16 36h32" stroke="#38bdf8" stroke-width="3"/><path d="M32 6c-6 0-10 4.5-10 10 0 7 10 16 10 16s10-9 10-16c0-5.5-4-10-10-10z" fill="#fb923c"/><circle cx="32" cy="16" r="3.5" fill="#18181b"/></svg>"##;

/// Per-user data folder holding settings, logs and the image cache
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the preview cache directory path
pub fn get_cache_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("imgcache")
}

/// Rasterize an SVG document into a `size`-wide image, keeping its aspect ratio.
/// Returns straight-alpha RGBA pixels with the final dimensions.
pub fn rasterize_svg(svg: &str, size: u32, opt: &usvg::Options) -> Option<(Vec<u8>, u32, u32)> {
    let tree = usvg::Tree::from_str(svg, opt).ok()?;
    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width();
    let height = (svg_size.height() * scale).ceil() as u32;
    let mut pixmap = tiny_skia::Pixmap::new(size, height)?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, height))
}

/// Rasterize the icon SVG to a square image (for window/taskbar icons).
pub fn rasterize_icon(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    rasterize_svg(ICON_SVG, size, &usvg::Options::default())
}

fn premul_to_straight(pixmap: &tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_rasterizes_square() {
        let (pixels, w, h) = rasterize_icon(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
        // Rounded corner stays transparent, centre is painted
        assert_eq!(pixels[3], 0);
        let centre = ((16 * 32 + 16) * 4 + 3) as usize;
        assert_eq!(pixels[centre], 255);
    }

    #[test]
    fn bad_svg_gives_none() {
        assert!(rasterize_svg("<not svg", 10, &usvg::Options::default()).is_none());
    }
}
