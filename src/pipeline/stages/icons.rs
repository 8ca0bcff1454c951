//! SVG rasterization and Monet recoloring.
//!
//! Every rendered package gets a directory holding two layers of identical
//! size: `0.png`, a solid background, and `1.png`, the glyph rendered from
//! `<drawable>.svg`, centered and painted in the foreground color.

use crate::pipeline::{
    error::{ErrorExt, Result, join_blocking},
    report::{IconOutcome, IconResult, RenderReport},
    settings::{Color, IconStyle},
    stages::mapping::MappingEntry,
};
use image::{ImageFormat, RgbaImage, imageops};
use resvg::{tiny_skia, usvg};
use std::{
    io,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

/// File name of the background layer.
pub const BACKGROUND_FILE: &str = "0.png";

/// File name of the foreground layer.
pub const FOREGROUND_FILE: &str = "1.png";

/// Why a single SVG could not be turned into a foreground layer.
///
/// These never abort a run; the package is skipped and reported.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid SVG: {0}")]
    Parse(#[from] usvg::Error),

    #[error("cannot allocate a {0}x{0} pixmap")]
    Canvas(u32),
}

/// Creates the opaque, single-color background layer.
pub fn create_background(size: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(size, size, color.to_rgba(u8::MAX))
}

/// Renders `svg_path` into a foreground layer.
///
/// The SVG is stretched to a `glyph_size` square, copied onto the center of a
/// transparent canvas, and every pixel with non-zero alpha is painted in the
/// foreground color keeping its alpha. Fully transparent pixels are left as
/// they are. A black foreground keeps the rendered colors untouched.
pub fn process_icon(svg_path: &Path, style: &IconStyle) -> std::result::Result<RgbaImage, RenderError> {
    let data = std::fs::read(svg_path).map_err(|source| RenderError::Read {
        path: svg_path.to_path_buf(),
        source,
    })?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())?;

    let glyph_size = style.glyph_size();
    let glyph = rasterize(&tree, glyph_size)?;

    let mut canvas = RgbaImage::new(style.size, style.size);
    let offset = i64::from(style.glyph_offset());
    imageops::replace(&mut canvas, &glyph, offset, offset);

    if !style.foreground.is_black() {
        recolor(&mut canvas, style.foreground);
    }

    Ok(canvas)
}

/// Rasterizes the tree to a `size × size` straight-alpha image.
fn rasterize(tree: &usvg::Tree, size: u32) -> std::result::Result<RgbaImage, RenderError> {
    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or(RenderError::Canvas(size))?;

    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / svg_size.width(),
        size as f32 / svg_size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied color; PNG layers need straight alpha
    let mut image = RgbaImage::new(size, size);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(image)
}

/// Paints every visible pixel in `color`, preserving alpha.
fn recolor(image: &mut RgbaImage, color: Color) {
    for pixel in image.pixels_mut() {
        let alpha = pixel[3];
        if alpha != 0 {
            *pixel = color.to_rgba(alpha);
        }
    }
}

/// A package name usable as a single directory name.
fn is_plain_dir_name(package: &str) -> bool {
    let mut components = Path::new(package).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

/// Renders an icon pair for every mapped package.
///
/// The background is built once and shared. A package whose SVG is missing
/// or whose name is not a plain directory name gets no directory at all. A
/// package whose SVG fails to render keeps its `0.png` but gets no `1.png`.
/// Failures to write the output tree are fatal.
pub async fn generate_icons(
    mapping: &[MappingEntry],
    svg_dir: &Path,
    output_dir: &Path,
    style: &IconStyle,
) -> Result<RenderReport> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .fs_context("creating icon output directory", output_dir)?;

    log::info!("  (2/4) Creating {} background", style.background);
    let background = Arc::new(create_background(style.size, style.background));

    let total = mapping.len();
    log::info!("  (3/4) Found {} icons to process", total);

    let mut report = RenderReport::default();
    let mut generated = 0usize;

    for entry in mapping {
        let svg_path = svg_dir.join(format!("{}.svg", entry.drawable));

        let outcome = if !is_plain_dir_name(&entry.package) {
            IconOutcome::RenderFailed {
                reason: format!("package {:?} is not a valid directory name", entry.package),
            }
        } else if !tokio::fs::try_exists(&svg_path)
            .await
            .fs_context("checking SVG asset", &svg_path)?
        {
            IconOutcome::MissingAsset {
                svg_path: svg_path.clone(),
            }
        } else {
            let background = Arc::clone(&background);
            let icon_dir = output_dir.join(&entry.package);
            let style = *style;
            join_blocking("icon rendering", move || {
                std::fs::create_dir_all(&icon_dir)
                    .fs_context("creating package icon directory", &icon_dir)?;
                background.save_with_format(icon_dir.join(BACKGROUND_FILE), ImageFormat::Png)?;

                // 1.png is only written once the glyph is fully rendered
                match process_icon(&svg_path, &style) {
                    Ok(icon) => {
                        icon.save_with_format(icon_dir.join(FOREGROUND_FILE), ImageFormat::Png)?;
                        Ok(IconOutcome::Generated)
                    }
                    Err(e) => Ok(IconOutcome::RenderFailed {
                        reason: e.to_string(),
                    }),
                }
            })
            .await?
        };

        match &outcome {
            IconOutcome::Generated => {
                generated += 1;
                log::info!(
                    "    ({}/{}) Rendered {} ({})",
                    generated,
                    total,
                    entry.drawable,
                    entry.package
                );
            }
            IconOutcome::MissingAsset { svg_path } => log::warn!(
                "    (err) No SVG for {} ({}): {}",
                entry.drawable,
                entry.package,
                svg_path.display()
            ),
            IconOutcome::RenderFailed { reason } => log::warn!(
                "    (err) Failed {} ({}): {}",
                entry.drawable,
                entry.package,
                reason
            ),
        }

        report.results.push(IconResult {
            package: entry.package.clone(),
            drawable: entry.drawable.clone(),
            outcome,
        });
    }

    log::info!("  (4/4) Icon processing done, {}/{} generated", generated, total);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><rect width="24" height="24" fill="#ff0000"/></svg>"##;

    fn style(foreground: Color) -> IconStyle {
        IconStyle {
            foreground,
            background: Color::rgb(0x1c, 0x23, 0x2b),
            size: 100,
            scale: 0.5,
        }
    }

    fn write_svg(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(format!("{name}.svg"));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn background_is_opaque_solid_color() {
        let bg = create_background(8, Color::rgb(1, 2, 3));
        assert_eq!(bg.dimensions(), (8, 8));
        assert!(bg.pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn glyph_is_centered_and_recolored() {
        let tmp = tempfile::tempdir().unwrap();
        let svg = write_svg(tmp.path(), "square", SQUARE);
        let fg = Color::rgb(0xd1, 0xe2, 0xfc);

        let icon = process_icon(&svg, &style(fg)).unwrap();

        assert_eq!(icon.dimensions(), (100, 100));
        // glyph spans 25..75 on both axes
        for (x, y) in [(25, 25), (50, 50), (74, 74), (25, 74)] {
            let p = icon.get_pixel(x, y);
            assert!(p[3] > 0, "({x},{y}) should be covered");
            assert_eq!(&p.0[..3], &[0xd1, 0xe2, 0xfc]);
        }
        for (x, y) in [(0, 0), (24, 50), (75, 50), (50, 24), (50, 75), (99, 99)] {
            assert_eq!(icon.get_pixel(x, y).0, [0, 0, 0, 0], "({x},{y}) should be empty");
        }
        assert!(
            icon.pixels()
                .filter(|p| p[3] != 0)
                .all(|p| p.0[..3] == [0xd1, 0xe2, 0xfc])
        );
    }

    #[test]
    fn black_foreground_keeps_rendered_colors() {
        let tmp = tempfile::tempdir().unwrap();
        let svg = write_svg(tmp.path(), "square", SQUARE);

        let icon = process_icon(&svg, &style(Color::BLACK)).unwrap();

        assert_eq!(icon.get_pixel(50, 50).0, [255, 0, 0, 255]);
    }

    #[test]
    fn partial_alpha_is_preserved() {
        let tmp = tempfile::tempdir().unwrap();
        let svg = write_svg(
            tmp.path(),
            "faded",
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10" fill="#000" fill-opacity="0.5"/></svg>"##,
        );

        let icon = process_icon(&svg, &style(Color::rgb(10, 20, 30))).unwrap();
        let p = icon.get_pixel(50, 50);

        assert_eq!(&p.0[..3], &[10, 20, 30]);
        assert!((120..=136).contains(&p[3]), "alpha {}", p[3]);
    }

    #[test]
    fn malformed_svg_is_a_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let svg = write_svg(tmp.path(), "broken", "<svg><path d=");

        let err = process_icon(&svg, &style(Color::BLACK)).unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = process_icon(&tmp.path().join("nope.svg"), &style(Color::BLACK)).unwrap_err();
        assert!(matches!(err, RenderError::Read { .. }));
    }

    #[test]
    fn rejects_path_like_package_names() {
        assert!(is_plain_dir_name("com.example.app"));
        assert!(!is_plain_dir_name(".."));
        assert!(!is_plain_dir_name("."));
        assert!(!is_plain_dir_name(""));
        assert!(!is_plain_dir_name("a/b"));
    }

    #[tokio::test]
    async fn generate_writes_pairs_and_skips_failures() {
        let tmp = tempfile::tempdir().unwrap();
        let svg_dir = tmp.path().join("svgs");
        std::fs::create_dir_all(&svg_dir).unwrap();
        write_svg(&svg_dir, "good", SQUARE);
        write_svg(&svg_dir, "broken", "<svg");
        let output = tmp.path().join("output");

        let mapping = [
            MappingEntry {
                name: "Good".into(),
                package: "com.good".into(),
                drawable: "good".into(),
            },
            MappingEntry {
                name: "Broken".into(),
                package: "com.broken".into(),
                drawable: "broken".into(),
            },
            MappingEntry {
                name: "Missing".into(),
                package: "com.missing".into(),
                drawable: "missing".into(),
            },
        ];

        let report = generate_icons(&mapping, &svg_dir, &output, &style(Color::rgb(9, 9, 9)))
            .await
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.generated(), 1);
        assert_eq!(report.outcome("com.good"), Some(&IconOutcome::Generated));
        assert!(matches!(
            report.outcome("com.broken"),
            Some(IconOutcome::RenderFailed { .. })
        ));
        assert!(matches!(
            report.outcome("com.missing"),
            Some(IconOutcome::MissingAsset { .. })
        ));

        let bg = image::open(output.join("com.good").join(BACKGROUND_FILE))
            .unwrap()
            .to_rgba8();
        assert!(bg.pixels().all(|p| p.0 == [0x1c, 0x23, 0x2b, 255]));
        let fg = image::open(output.join("com.good").join(FOREGROUND_FILE))
            .unwrap()
            .to_rgba8();
        assert_eq!(fg.dimensions(), (100, 100));

        assert!(output.join("com.broken").join(BACKGROUND_FILE).is_file());
        assert!(!output.join("com.broken").join(FOREGROUND_FILE).exists());
        assert!(!output.join("com.missing").exists());
    }
}
