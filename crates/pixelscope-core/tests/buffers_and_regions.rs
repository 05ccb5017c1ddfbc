//! Buffer construction, cropping and ROI projection working together.

use pixelscope_core::prelude::*;
use pixelscope_core::with_buffer;

fn checker(w: usize, h: usize) -> PixelBuffer<u16> {
    let data = (0..h)
        .flat_map(|y| (0..w).map(move |x| ((x + y) % 2) as u16 * 1000))
        .collect();
    PixelBuffer::gray(w, h, data).unwrap()
}

#[test]
fn test_shape_errors() {
    let err = PixelBuffer::from_vec(4, 4, 3, vec![0u8; 47]).unwrap_err();
    assert!(err.is_shape_error());
    assert!(err.to_string().contains("48"));

    let err = PixelBuffer::<f32>::from_vec(1, 1, 0, Vec::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidBufferShape { .. }));

    assert!(PixelBuffer::<u8>::filled(2, 2, &[]).is_err());
}

#[test]
fn test_widget_selection_crops_expected_pixels() {
    let img = checker(16, 8);
    // rubber band drawn at 4x zoom from (8, 4) over 20x12 widget pixels
    let roi = Rect::from_widget(8.0, 4.0, 20.0, 12.0, 4.0);
    assert_eq!(roi, Rect::new(2, 1, 5, 3));

    let crop = img.crop(roi).unwrap();
    assert_eq!(crop.shape(), (3, 5, 1));
    assert_eq!(crop.pixel(0, 0), img.pixel(2, 1));
    assert_eq!(crop.min_max(), Some((0.0, 1000.0)));

    let (x, y, w, h) = roi.to_widget(4.0);
    assert_eq!((x, y, w, h), (8, 4, 20, 12));
}

#[test]
fn test_crop_clips_or_rejects() {
    let img = checker(10, 10);
    let clipped = img.crop(Rect::new(8, 8, 10, 10)).unwrap();
    assert_eq!((clipped.width(), clipped.height()), (2, 2));

    let err = img.crop(Rect::new(20, 0, 2, 2)).unwrap_err();
    assert!(matches!(err, Error::InvalidRegion { .. }));
    assert!(!err.is_shape_error());
}

#[test]
fn test_any_buffer_dispatch() {
    let images: Vec<AnyBuffer> = vec![
        PixelBuffer::gray(2, 1, vec![3u8, 250]).unwrap().into(),
        checker(2, 1).into(),
        PixelBuffer::from_vec(1, 1, 2, vec![0.25f32, -1.0]).unwrap().into(),
    ];

    let kinds: Vec<SampleKind> = images.iter().map(AnyBuffer::kind).collect();
    assert_eq!(kinds, [SampleKind::U8, SampleKind::U16, SampleKind::F32]);

    let ranges: Vec<Option<(f64, f64)>> = images.iter().map(|img| with_buffer!(img, b => b.min_max())).collect();
    assert_eq!(ranges[0], Some((3.0, 250.0)));
    assert_eq!(ranges[1], Some((0.0, 1000.0)));
    assert_eq!(ranges[2], Some((-1.0, 0.25)));

    assert_eq!(images[2].pixel_f64(0, 0), Some(vec![0.25, -1.0]));
    assert_eq!(images[2].pixel_f64(1, 0), None);
    assert_eq!(images[0].checked_pixel_f64(1, 0), Ok(vec![250.0]));
    let err = images[0].checked_pixel_f64(-1, 0).unwrap_err();
    assert!(err.is_bounds_error());
    assert_eq!(err.to_string(), "pixel (-1, 0) out of bounds for image 2x1");
    assert!(images[1].as_u8().is_none());
}

#[test]
fn test_gather_reorders_channels() {
    let rgb = PixelBuffer::from_vec(2, 1, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    let bgr = rgb.gather_channels(&[2, 1, 0]).unwrap();
    assert_eq!(bgr.data(), &[3, 2, 1, 6, 5, 4]);
    assert!(rgb.gather_channels(&[3]).unwrap_err().is_shape_error());
}
