//! End-to-end tests for the enhancement pipeline on synthetic camera frames
//!
//! Frames are generated in code: a light, slightly noisy background with a
//! block of vertical bars, the way a 1D barcode shows up in a phone preview.

use laser_enhance::utils::binarization::otsu_threshold;
use laser_enhance::utils::grayscale::grayscale;
use laser_enhance::{
    BarcodeRegionDetector, Frame, LaserError, Mode, Pipeline, PipelineConfig, PixelBuffer,
    PixelFormat, ScanConfig, Scanner, Stage, TickOutcome, enhance, extract_scan_lines,
};
use std::time::{Duration, Instant};

const BARS_START: usize = 220;
const BARS_END: usize = 420;
const BARS_TOP: usize = 100;
const BARS_BOTTOM: usize = 380;

fn is_bar(x: usize, y: usize) -> bool {
    (BARS_START..BARS_END).contains(&x)
        && (BARS_TOP..BARS_BOTTOM).contains(&y)
        && ((x - BARS_START) / 3) % 2 == 0
}

fn barcode_frame() -> Frame {
    Frame::from_fn(640, 480, |x, y| {
        if is_bar(x, y) {
            [30, 28, 35, 255]
        } else {
            let noise = ((x * 7 + y * 3) % 9) as u8;
            [176 + noise, 180 + noise, 170 + noise, 255]
        }
    })
}

#[test]
fn test_full_mode_on_uniform_gray() {
    let frame = Frame::filled(640, 480, [128, 128, 128, 255]);
    let enhanced = enhance(&frame, Mode::Full).expect("full mode result");

    assert_eq!(enhanced.buffer.width(), 640);
    assert_eq!(enhanced.buffer.height(), 480);
    assert_eq!(enhanced.offset_y, 0);
    assert!(enhanced.buffer.is_binary());
    for stage in Mode::Full.stages() {
        assert!(enhanced.timings.get(*stage).is_some(), "{} not timed", stage.name());
    }
}

#[test]
fn test_full_mode_separates_bars_from_background() {
    let frame = barcode_frame();
    let original = frame.clone();
    let mut pipeline = Pipeline::new();

    let enhanced = pipeline.run(&frame, Mode::Full).expect("full mode result");
    assert_eq!(frame, original);

    let buf = &enhanced.buffer;
    assert!(buf.is_binary());
    // Middle column of a bar, and a background pixel well away from it
    assert_eq!(buf.get(BARS_START + 1, 240, 0), 0);
    assert_eq!(buf.get(BARS_START + 4, 240, 0), 255);
    assert_eq!(buf.get(50, 50, 0), 255);
    assert_eq!(buf.get(50, 50, 3), 255);

    let threshold = enhanced.threshold.expect("threshold recorded").threshold;
    assert!(threshold > 0 && threshold < 255);

    let region = enhanced.region.expect("region estimated by default");
    assert!(region.has_barcode);
    assert!((BARS_START..=BARS_END).contains(&region.center_x));
    assert!(region.confidence > 0.0 && region.confidence <= 1.0);
}

#[test]
fn test_fast_mode_strip_geometry() {
    let cases = [
        (480, 144, 168),
        (1080, 324, 378),
        (10, 3, 3),
        // round(1.5) = 2
        (5, 2, 1),
    ];
    for (height, rows, offset) in cases {
        let frame = Frame::filled(32, height, [90, 90, 90, 255]);
        let enhanced = enhance(&frame, Mode::Fast).expect("fast mode result");
        assert_eq!(enhanced.buffer.width(), 32);
        assert_eq!(enhanced.buffer.height(), rows, "height {height}");
        assert_eq!(enhanced.offset_y, offset, "height {height}");
        assert!(enhanced.timings.get(Stage::Sharpen).is_none());
        assert!(enhanced.timings.get(Stage::MorphClean).is_none());
    }
}

#[test]
fn test_fast_mode_keeps_bars_in_strip() {
    let frame = barcode_frame();
    let enhanced = enhance(&frame, Mode::Fast).expect("fast mode result");

    assert_eq!(enhanced.offset_y, 168);
    let buf = &enhanced.buffer;
    assert!(buf.is_binary());
    assert_eq!(buf.get(BARS_START + 1, 0, 0), 0);
    assert_eq!(buf.get(BARS_START + 4, 0, 0), 255);
    assert!(enhanced.region.is_some_and(|r| r.has_barcode));
}

#[test]
fn test_degenerate_frames_have_no_result() {
    let mut pipeline = Pipeline::new();

    let empty = Frame::filled(0, 0, [0, 0, 0, 255]);
    assert!(pipeline.run(&empty, Mode::Full).is_none());
    assert!(matches!(
        pipeline.try_run(&empty, Mode::Full),
        Err(LaserError::InvalidFrame { width: 0, height: 0 })
    ));

    let one_row = Frame::filled(20, 1, [0, 0, 0, 255]);
    assert!(matches!(
        pipeline.try_run(&one_row, Mode::Fast),
        Err(LaserError::EmptyStrip { height: 1 })
    ));
    // Full mode still handles it
    assert!(pipeline.run(&one_row, Mode::Full).is_some());
}

#[test]
fn test_region_detector_on_stripes() {
    let mut buf = PixelBuffer::new(500, 60, PixelFormat::Rgba8);
    for y in 0..60 {
        for x in 0..500 {
            let v = if (100..=300).contains(&x) && (x / 2) % 2 == 0 { 0 } else { 255 };
            buf.set_color(x, y, v);
            buf.set(x, y, 3, 255);
        }
    }
    let estimate = BarcodeRegionDetector::default().detect(&buf);
    assert!(estimate.has_barcode);
    assert!((100..=300).contains(&estimate.center_x));

    let blank = PixelBuffer::new(500, 60, PixelFormat::Rgba8);
    assert!(!BarcodeRegionDetector::default().detect(&blank).has_barcode);
}

#[test]
fn test_region_needs_grayscale_for_color_bars() {
    // Bars that differ only in green and blue are invisible to the red channel
    let frame = Frame::from_fn(400, 40, |x, _| {
        if (150..250).contains(&x) && (x / 2) % 2 == 0 {
            [120, 0, 0, 255]
        } else {
            [120, 255, 255, 255]
        }
    });
    let detector = BarcodeRegionDetector::default();

    let rgba = PixelBuffer::from_frame(&frame);
    assert!(!detector.detect(&rgba).has_barcode);

    let mut gray = rgba.clone();
    grayscale(&mut gray);
    let estimate = detector.detect(&gray);
    assert!(estimate.has_barcode);
    assert!((150..250).contains(&estimate.center_x));
}

#[test]
fn test_otsu_between_bimodal_levels() {
    let frame = Frame::from_fn(64, 64, |x, _| {
        let v = if x < 32 { 50 } else { 200 };
        [v, v, v, 255]
    });
    let result = otsu_threshold(&PixelBuffer::from_frame(&frame));
    assert!(result.threshold > 50 && result.threshold <= 200);
}

#[test]
fn test_recycled_buffers_are_reused() {
    let frame = barcode_frame();
    let mut pipeline = Pipeline::new();

    for _ in 0..5 {
        let enhanced = pipeline.run(&frame, Mode::Full).expect("full mode result");
        pipeline.recycle(enhanced);
    }
    let stats = pipeline.pool().stats();
    assert_eq!(stats.allocations, 1);
    assert_eq!(stats.reuses, 4);

    // A strip fits in the full-frame allocation
    let strip = pipeline.run(&frame, Mode::Fast).expect("fast mode result");
    assert_eq!(strip.buffer.height(), 144);
    assert_eq!(pipeline.pool().stats().allocations, 1);
}

#[test]
fn test_results_do_not_depend_on_pool_state() {
    let frame = barcode_frame();
    let fresh = enhance(&frame, Mode::Full).expect("full mode result");

    let mut pipeline = Pipeline::new();
    let noise = Frame::from_fn(640, 480, |x, y| {
        let v = ((x * 13) ^ (y * 29)) as u8;
        [v, v, v, 255]
    });
    let warmup = pipeline.run(&noise, Mode::Full).expect("full mode result");
    pipeline.recycle(warmup);

    let reused = pipeline.run(&frame, Mode::Full).expect("full mode result");
    assert_eq!(reused.buffer, fresh.buffer);
    assert_eq!(reused.threshold, fresh.threshold);
}

#[test]
fn test_contrast_override_changes_output() {
    let frame = Frame::filled(40, 40, [100, 100, 100, 255]);
    let config = PipelineConfig {
        fast_contrast: 0.0,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::with_config(config);
    let enhanced = pipeline.run(&frame, Mode::Fast).expect("fast mode result");
    // Factor 0 flattens to 128, then the uniform image goes white
    assert!(enhanced.buffer.as_bytes().iter().all(|&v| v == 255));
}

#[test]
fn test_scan_lines_from_frame() {
    let frame = barcode_frame();
    let lines = extract_scan_lines(&frame);
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0].offset_y, 240);
    for line in &lines {
        assert_eq!(line.data.width(), 640);
        assert_eq!(line.data.height(), 3);
        let red = line.data.get(BARS_START + 1, 1, 0);
        if is_bar(BARS_START + 1, line.offset_y + 1) {
            assert_eq!(red, 30);
        } else {
            assert!(red >= 176, "line at {} is background", line.offset_y);
        }
    }
}

#[test]
fn test_scanner_paces_ticks() {
    let frame = barcode_frame();
    let mut scanner = Scanner::new(Pipeline::new(), ScanConfig::default());
    let t0 = Instant::now();

    let mut enhanced_ticks = 0;
    // Camera at ~30 fps for one second
    for i in 0..30u64 {
        let now = t0 + Duration::from_millis(i * 33);
        match scanner.tick(Some(&frame), Mode::Fast, now) {
            TickOutcome::Enhanced(result) => {
                enhanced_ticks += 1;
                scanner.recycle(result);
            }
            TickOutcome::Skipped => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    // Ticks land at 0, 132, 264, ... ms
    assert_eq!(enhanced_ticks, 8);
    let stats = scanner.stats();
    assert_eq!(stats.processed, 8);
    assert_eq!(stats.skipped, 22);
}
