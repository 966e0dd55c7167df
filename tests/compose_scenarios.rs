use std::{io::Cursor, path::PathBuf};

use tintmark::{
    AspectRatio, AssetSource, BackgroundRequest, Gallery, LoadResolution, Loader, OutputSize,
    RenderParams, Session, Status, cover_fit, logo_placement, render,
};

const TINT_OVER_BLUE: [u8; 4] = [128, 0, 127, 255];

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn blue_bg(w: u32, h: u32) -> AssetSource {
    AssetSource::memory("bg.png", png(w, h, [0, 0, 255, 255]))
}

fn green_logo(w: u32, h: u32) -> AssetSource {
    AssetSource::memory("logo.png", png(w, h, [0, 255, 0, 255]))
}

fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("scenarios").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn every_ratio_renders_at_fixed_height() {
    let expected = [
        ("1:1", 720),
        ("4:3", 960),
        ("16:9", 1280),
        ("21:9", 1680),
    ];
    let mut session = Session::new(Gallery::new()).unwrap();
    session.upload_background(blue_bg(50, 50)).unwrap();
    for (key, width) in expected {
        let report = session.set_ratio(key).unwrap();
        assert_eq!(report.size, OutputSize { width, height: 720 });
        assert_eq!(session.surface().size(), report.size);
    }
}

#[test]
fn square_without_logo_asks_for_one() {
    let mut session = Session::new(Gallery::new()).unwrap();
    session.set_ratio("1:1").unwrap();
    session.upload_background(blue_bg(300, 200)).unwrap();

    let report = session.report();
    assert_eq!(report.size, OutputSize { width: 720, height: 720 });
    assert!(!report.export_enabled);
    assert_eq!(session.status(), Status::LogoRequired);
    assert_eq!(session.status().message(), "Upload a logo to enable download.");
}

#[test]
fn standard_ratio_logo_flush_top_right_without_padding() {
    let mut session = Session::new(Gallery::new()).unwrap();
    session.set_ratio("4:3").unwrap();
    session.set_padding("0").unwrap();
    session.set_logo_width("20").unwrap();
    session.upload_background(blue_bg(160, 90)).unwrap();
    session.upload_logo(green_logo(400, 100)).unwrap();

    assert!(session.export_enabled());
    assert_eq!(session.status(), Status::Ready);

    // 20% of 960 is 192, so the 400px logo scales by 0.48 to 192x48 at x = 960 - 192.
    let at = logo_placement(400, 100, AspectRatio::Standard.output_size(), 20, 0).unwrap();
    assert_eq!((at.x, at.y, at.width, at.height), (768, 0, 192, 48));

    let s = session.surface();
    assert_eq!(s.pixel(768, 0), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(959, 47), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(767, 0), Some(TINT_OVER_BLUE));
    assert_eq!(s.pixel(959, 48), Some(TINT_OVER_BLUE));
    assert_eq!(s.pixel(0, 719), Some(TINT_OVER_BLUE));
}

#[test]
fn non_numeric_padding_uses_default() {
    let mut session = Session::new(Gallery::new()).unwrap();
    session.set_padding("12").unwrap();
    session.set_padding("twelve").unwrap();
    assert_eq!(session.params().padding_px, 24);

    session.upload_background(blue_bg(16, 9)).unwrap();
    session.upload_logo(green_logo(10, 10)).unwrap();
    let s = session.surface();
    // 16:9 canvas, 10px logo at natural size, 24px in from the top-right corner.
    assert_eq!(s.pixel(1280 - 24 - 10, 24), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(1280 - 24, 24), Some(TINT_OVER_BLUE));
    assert_eq!(s.pixel(1280 - 24 - 10, 23), Some(TINT_OVER_BLUE));
}

#[test]
fn rejected_background_load_leaves_canvas_alone() {
    let mut session = Session::new(Gallery::new()).unwrap();
    session.upload_background(blue_bg(64, 64)).unwrap();
    let before = session.surface().clone();

    let missing = AssetSource::Path(PathBuf::from("target/scenarios/nope/missing.jpg"));
    let resolution = session.upload_background(missing).unwrap();
    assert!(matches!(resolution, LoadResolution::Failed { .. }));
    assert_eq!(session.status(), Status::BackgroundLoadFailed);
    assert_eq!(session.surface(), &before);
}

#[test]
fn unchanged_inputs_render_identical_pixels() {
    let mut session = Session::new(Gallery::new()).unwrap();
    session.upload_background(blue_bg(333, 777)).unwrap();
    session.upload_logo(green_logo(512, 128)).unwrap();
    let first = session.export().unwrap();

    session.set_padding("24").unwrap();
    let second = session.export().unwrap();
    assert_eq!(first, second);

    let (surface, _) = render(session.params()).unwrap();
    assert_eq!(&surface, session.surface());
}

#[test]
fn background_always_covers_canvas() {
    for ratio in AspectRatio::ALL {
        let out = ratio.output_size();
        for (w, h) in [(1, 1), (10, 1000), (1000, 10), (1920, 1080), (999, 1001)] {
            let p = cover_fit(w, h, out);
            assert!(p.width >= out.width && p.height >= out.height);
            assert!(p.covers(out));
        }
    }

    // No transparent pixels survive once a background is drawn.
    let params = RenderParams::default()
        .with_ratio(AspectRatio::Ultrawide)
        .with_background(Some(tintmark::Background::Uploaded {
            name: "tall".into(),
            image: tintmark::decode_image(&png(30, 400, [9, 9, 9, 255])).unwrap(),
        }));
    let (surface, _) = render(&params).unwrap();
    assert!(surface.data().chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn gallery_selection_highlights_entry_and_exports_named_file() {
    let dir = fixture_dir("gallery");
    std::fs::write(dir.join("harbor.png"), png(40, 30, [0, 0, 255, 255])).unwrap();
    std::fs::write(dir.join("forest.png"), png(30, 40, [0, 0, 255, 255])).unwrap();
    std::fs::write(
        dir.join("mark.svg"),
        br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#00ff00"/></svg>"##,
    )
    .unwrap();

    let gallery = Gallery::from_dir(&dir).unwrap();
    let mut session = Session::new(gallery).unwrap();
    assert_eq!(session.select_gallery("harbor").unwrap(), LoadResolution::Applied);
    assert_eq!(session.active_gallery(), Some("harbor"));

    session
        .upload_logo(AssetSource::Path(dir.join("mark.svg")))
        .unwrap()
        .ensure_applied("logo")
        .unwrap();
    assert_eq!(session.logo_label(), "mark.svg");

    let out = session.export_to_dir(&dir.join("out")).unwrap();
    assert_eq!(out.file_name().unwrap(), "composed-1280x720.png");
    let written = image::open(&out).unwrap();
    assert_eq!((written.width(), written.height()), (1280, 720));

    session
        .upload_background(blue_bg(8, 8))
        .unwrap()
        .ensure_applied("background")
        .unwrap();
    assert_eq!(session.active_gallery(), None);
}

#[test]
fn stale_async_load_does_not_overwrite_newer_pick() {
    let mut session = Session::new(Gallery::new()).unwrap();
    let loader = Loader::new();

    let first = session
        .request_background(&loader, BackgroundRequest::Uploaded(blue_bg(4, 4)))
        .unwrap();
    let second = session
        .request_background(
            &loader,
            BackgroundRequest::Uploaded(AssetSource::memory(
                "newer.png",
                png(4, 4, [255, 255, 255, 255]),
            )),
        )
        .unwrap();
    assert!(second.generation() > first.generation());

    let mut resolutions = Vec::new();
    for _ in 0..2 {
        let outcome = loader.recv().unwrap();
        let generation = outcome.ticket.generation();
        resolutions.push((generation, session.finish(outcome).unwrap()));
    }
    resolutions.sort_by_key(|(g, _)| *g);
    assert_eq!(resolutions[0].1, LoadResolution::Superseded);
    assert_eq!(resolutions[1].1, LoadResolution::Applied);
    assert_eq!(
        session.params().background.as_ref().unwrap().name(),
        "newer.png"
    );
}
