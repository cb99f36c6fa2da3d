//! Integration test: feed a backend-shaped JSON result through the viewer
//! and check what ends up on the surface.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use image::{DynamicImage, GrayImage, Luma};
use xccurate_overlay::{
    Completion, Dimensions, LayerKind, OverlayConfig, OverlayError, SegmentationResult,
    SliceResult, Viewer, VisualizationMode,
};

fn png(img: GrayImage) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// A 4x4 slice whose left half is labeled edema and whose core
/// probability is 100% everywhere.
fn slice(index: u32) -> SliceResult {
    let mask = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 2 } else { 0 }]));
    SliceResult {
        slice_index: index,
        original_image: png(GrayImage::from_pixel(4, 4, Luma([100]))),
        combined_mask: png(mask),
        core_probability: Some(png(GrayImage::from_pixel(4, 4, Luma([100])))),
        edema_probability: None,
        enhancing_probability: None,
        ground_truth_image: None,
    }
}

/// Serialize and parse back, so the slices go through the base64 wire form.
fn from_wire(slices: &[SliceResult]) -> Vec<SliceResult> {
    let json = serde_json::to_string(slices).unwrap();
    if !slices.is_empty() {
        assert!(json.contains("\"slice_index\""));
    }
    serde_json::from_str(&json).unwrap()
}

fn viewer() -> Viewer {
    Viewer::new(OverlayConfig {
        surface: Dimensions::new(8, 8),
        ..OverlayConfig::default()
    })
    .unwrap()
}

#[test]
fn combined_then_core_heatmap() {
    let result = SegmentationResult::from_slices(from_wire(&[slice(3)])).unwrap();
    let mut viewer = viewer();

    let request = viewer.receive(result);
    assert_eq!(viewer.render_now(&request).unwrap(), Completion::Drawn);
    let frame = viewer.surface().frame();
    assert_eq!(frame.dimensions(), (8, 8));
    assert_eq!(frame.get_pixel(0, 0).0, [178, 178, 50, 255]);
    assert_eq!(frame.get_pixel(7, 7).0, [100, 100, 100, 255]);

    // 100% core probability paints opaque red everywhere.
    let request = viewer.set_mode(VisualizationMode::Core).unwrap();
    viewer.render_now(&request).unwrap();
    assert!(
        viewer
            .surface()
            .frame()
            .pixels()
            .all(|p| p.0 == [255, 0, 0, 255])
    );
}

#[test]
fn out_of_order_completion_shows_latest_request() {
    let result = SegmentationResult::from_slices(vec![slice(0)]).unwrap();
    let mut viewer = viewer();
    let initial = viewer.receive(result);
    viewer.render_now(&initial).unwrap();

    let r1 = viewer.set_mode(VisualizationMode::Core).unwrap();
    let r2 = viewer.set_mode(VisualizationMode::Combined).unwrap();
    let f1 = r1.render();
    let f2 = r2.render().unwrap();

    assert_eq!(
        viewer.complete(r2.ticket(), Ok(f2.clone())).unwrap(),
        Completion::Drawn
    );
    assert_eq!(viewer.complete(r1.ticket(), f1).unwrap(), Completion::Discarded);
    assert_eq!(viewer.surface().frame().as_raw(), f2.as_raw());
    assert_eq!(viewer.mode(), VisualizationMode::Combined);
}

#[test]
fn empty_result_never_reaches_the_viewer() {
    let parsed = from_wire(&[]);
    assert!(matches!(
        SegmentationResult::from_slices(parsed),
        Err(OverlayError::EmptyResult)
    ));
    assert_eq!(viewer().surface().revision(), 0);
}

#[test]
fn missing_edema_layer_is_reported_without_drawing() {
    let result = SegmentationResult::from_slices(vec![slice(0)]).unwrap();
    let mut viewer = viewer();
    let initial = viewer.receive(result);
    viewer.render_now(&initial).unwrap();
    let revision = viewer.surface().revision();

    let request = viewer.set_mode(VisualizationMode::Edema).unwrap();
    let err = viewer.render_now(&request).unwrap_err();
    assert!(matches!(
        err,
        OverlayError::MissingLayer(LayerKind::EdemaProbability)
    ));
    assert_eq!(viewer.surface().revision(), revision);
}

#[test]
fn slices_are_navigated_in_index_order() {
    let result = SegmentationResult::from_slices(vec![slice(7), slice(2)]).unwrap();
    let mut viewer = viewer();
    viewer.receive(result);
    assert_eq!(viewer.result().unwrap().slice(0).unwrap().slice_index, 2);
    let next = viewer.next_slice().unwrap();
    viewer.render_now(&next).unwrap();
    let shown = viewer.result().unwrap().slice(viewer.position()).unwrap();
    assert_eq!(shown.slice_index, 7);
}
