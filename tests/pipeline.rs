//! End-to-end pipeline runs against the fixture workspace.

mod common;

use common::{module_archives, stage_workspace, zip_entries, zip_entry};
use hypermonet_iconpack::pipeline::{
    Color, Pipeline, SettingsBuilder,
    report::{IconOutcome, MappingSkipReason},
};
use sha2::{Digest, Sha256};
use std::fs;

const EXPECTED_MAPPER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
  <item name="Chrome" package="com.android.chrome" drawable="chrome"/>
  <item name="Broken" package="com.broken.svg" drawable="broken"/>
  <item name="Example" package="com.example.app" drawable="example"/>
  <item name="Missing" package="org.missing.asset" drawable="not_there"/>
</resources>
"#;

#[tokio::test]
async fn full_run_builds_module_with_embedded_icons() {
    let work = stage_workspace();
    let settings = SettingsBuilder::new().work_dir(work.path()).build().unwrap();

    let report = Pipeline::new(settings.clone()).run().await.unwrap();

    // Mapping
    assert_eq!(report.mapping.items_read, 7);
    assert_eq!(report.mapping.packages, 4);
    let reasons: Vec<_> = report.mapping.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(
        reasons,
        [
            MappingSkipReason::UnparseableComponent,
            MappingSkipReason::MissingDrawable
        ]
    );
    assert_eq!(
        fs::read_to_string(work.path().join("icon_mapper.xml")).unwrap(),
        EXPECTED_MAPPER
    );

    // Rendering
    assert_eq!(report.render.total(), 4);
    assert_eq!(report.render.generated(), 2);
    assert!(matches!(
        report.render.outcome("org.missing.asset"),
        Some(IconOutcome::MissingAsset { .. })
    ));
    assert!(matches!(
        report.render.outcome("com.broken.svg"),
        Some(IconOutcome::RenderFailed { .. })
    ));
    let output = work.path().join("output");
    let mut packages: Vec<_> = fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    packages.sort();
    assert_eq!(packages, ["com.android.chrome", "com.broken.svg", "com.example.app"]);
    // A failed render keeps its background but never gets a foreground
    assert!(output.join("com.broken.svg/0.png").is_file());
    assert!(!output.join("com.broken.svg/1.png").exists());

    let fg = image::open(output.join("com.example.app/1.png")).unwrap().to_rgba8();
    assert_eq!(fg.dimensions(), (432, 432));
    // 172px glyph with a 130px margin
    for (x, y) in [(130, 130), (216, 216), (301, 301)] {
        let p = fg.get_pixel(x, y);
        assert!(p[3] > 0, "({x},{y}) inside glyph");
        assert_eq!(&p.0[..3], &[0xd1, 0xe2, 0xfc]);
    }
    for (x, y) in [(129, 129), (302, 302), (129, 216), (216, 302)] {
        assert_eq!(fg.get_pixel(x, y).0, [0, 0, 0, 0], "({x},{y}) outside glyph");
    }
    let bg = image::open(output.join("com.example.app/0.png")).unwrap().to_rgba8();
    assert!(bg.pixels().all(|p| p.0 == [0x1c, 0x23, 0x2b, 0xff]));

    // Inner archive
    let icons = fs::read(work.path().join("icons_template/icons")).unwrap();
    assert_eq!(fs::read(work.path().join("magisk_template_HyperOS2/icons")).unwrap(), icons);
    assert_eq!(report.icons_archive_size, icons.len() as u64);
    assert_eq!(
        zip_entries(&icons),
        [
            "res/.keep",
            "res/drawable-xxhdpi/com.android.chrome/0.png",
            "res/drawable-xxhdpi/com.android.chrome/1.png",
            "res/drawable-xxhdpi/com.broken.svg/0.png",
            "res/drawable-xxhdpi/com.example.app/0.png",
            "res/drawable-xxhdpi/com.example.app/1.png",
            "transform_config.xml",
        ]
    );
    assert_eq!(
        zip_entry(&icons, "res/drawable-xxhdpi/com.example.app/1.png"),
        fs::read(output.join("com.example.app/1.png")).unwrap()
    );

    // Module archive
    let modules = module_archives(work.path());
    assert_eq!(modules, [report.module.path.clone()]);
    let name = report.module.path.file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix("magisk_module_Lawnicon_HyperMonetTheme_")
        .and_then(|s| s.strip_suffix(".zip"))
        .unwrap();
    assert_eq!(stamp.len(), 15);
    assert_eq!(stamp.as_bytes()[8], b'_');
    assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));

    let module = fs::read(&report.module.path).unwrap();
    assert_eq!(report.module.size, module.len() as u64);
    assert_eq!(report.module.checksum, format!("{:x}", Sha256::digest(&module)));
    assert_eq!(
        zip_entries(&module),
        [
            "META-INF/com/google/android/update-binary",
            "META-INF/com/google/android/updater-script",
            "customize.sh",
            "customize_icons.sh",
            "icons",
            "module.prop",
        ]
    );
    assert_eq!(zip_entry(&module, "icons"), icons);
}

#[tokio::test]
async fn rerun_cleans_and_reproduces_icon_content() {
    let work = stage_workspace();
    let settings = SettingsBuilder::new().work_dir(work.path()).build().unwrap();
    let pipeline = Pipeline::new(settings);

    let first = pipeline.run().await.unwrap();
    let mapper = fs::read(work.path().join("icon_mapper.xml")).unwrap();
    fs::remove_file(&first.module.path).unwrap();

    let second = pipeline.run().await.unwrap();

    assert_eq!(first.icons_digest, second.icons_digest);
    assert_eq!(fs::read(work.path().join("icon_mapper.xml")).unwrap(), mapper);

    let removed: Vec<_> = second
        .clean
        .removed
        .iter()
        .map(|r| r.path.strip_prefix(work.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        removed,
        [
            "output",
            "icons_template/res/drawable-xxhdpi",
            "icons_template/icons",
            "magisk_template_HyperOS2/icons",
            "icon_mapper.xml",
        ]
        .map(std::path::PathBuf::from)
    );
    assert!(first.clean.removed.is_empty());
}

#[tokio::test]
async fn black_foreground_keeps_source_colors() {
    let work = stage_workspace();
    fs::write(
        work.path().join("svgs/example.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" fill="#3366ff"/></svg>"##,
    )
    .unwrap();
    let settings = SettingsBuilder::new()
        .work_dir(work.path())
        .foreground(Color::BLACK)
        .icon_size(100)
        .icon_scale(1.0)
        .build()
        .unwrap();

    Pipeline::new(settings).run().await.unwrap();

    let fg = image::open(work.path().join("output/com.example.app/1.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(fg.dimensions(), (100, 100));
    assert_eq!(fg.get_pixel(50, 50).0, [0x33, 0x66, 0xff, 0xff]);
}

#[tokio::test]
async fn missing_appfilter_aborts_before_packing() {
    let work = stage_workspace();
    fs::remove_file(work.path().join("appfilter.xml")).unwrap();
    let settings = SettingsBuilder::new().work_dir(work.path()).build().unwrap();

    let err = Pipeline::new(settings).run().await.unwrap_err();

    assert!(err.to_string().contains("appfilter.xml"));
    assert!(module_archives(work.path()).is_empty());
    assert!(!work.path().join("output").exists());
}
