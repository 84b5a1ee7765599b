use image::imageops::{self, FilterType};
use image::ImageFormat;
use ndarray::Array3;

use super::error::InferenceError;

/// Sniffs the image format from its magic bytes. Only JPEG and PNG are accepted.
pub fn detect_format(image: &[u8]) -> Result<ImageFormat, InferenceError> {
    if image.is_empty() {
        return Err(InferenceError::EmptyImage);
    }
    match image::guess_format(image) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        Ok(other) => Err(InferenceError::UnsupportedFormat(format!("{:?}", other))),
        Err(_) => Err(InferenceError::UnsupportedFormat("unknown".into())),
    }
}

/// Checks an upload's byte length against the configured limit.
pub fn validate_size(size: usize, limit: usize) -> Result<(), InferenceError> {
    if size > limit {
        return Err(InferenceError::TooLarge { size, limit });
    }
    Ok(())
}

/// Decodes `image`, converts it to 8-bit RGB and resizes it to `size`x`size`.
///
/// The result is laid out height x width x channel with every value scaled
/// into [0, 1].
pub fn preprocess(image: &[u8], size: u32) -> Result<Array3<f32>, InferenceError> {
    if size == 0 {
        return Err(InferenceError::Preprocessing("input size must be non-zero".into()));
    }
    let format = detect_format(image)?;
    let decoded = image::load_from_memory_with_format(image, format)?;
    let rgb = decoded.to_rgb8();
    let resized = imageops::resize(&rgb, size, size, FilterType::CatmullRom);

    let side = size as usize;
    let array = Array3::from_shape_fn((side, side, 3), |(y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    });
    Ok(array)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode test image");
        bytes
    }

    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    fn assert_normalized(array: &Array3<f32>) {
        assert_eq!(array.shape(), &[128, 128, 3]);
        assert!(array.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn any_rgb_size_becomes_128_square() {
        for (w, h) in [(1, 1), (64, 300), (512, 512), (129, 7)] {
            let array = preprocess(&png(w, h), 128).unwrap();
            assert_normalized(&array);
        }
    }

    #[test]
    fn grayscale_and_rgba_become_three_channels() {
        let gray = GrayImage::from_pixel(40, 60, Luma([200]));
        let array = preprocess(&encode(&DynamicImage::ImageLuma8(gray), ImageFormat::Png), 128).unwrap();
        assert_normalized(&array);
        let expected = 200.0 / 255.0;
        assert!((array[[10, 10, 0]] - expected).abs() < 1e-3);
        assert!((array[[10, 10, 0]] - array[[10, 10, 2]]).abs() < 1e-6);

        let rgba = RgbaImage::from_pixel(300, 200, Rgba([255, 0, 0, 10]));
        let array = preprocess(&encode(&DynamicImage::ImageRgba8(rgba), ImageFormat::Png), 128).unwrap();
        assert_normalized(&array);
        assert!((array[[64, 64, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(array[[64, 64, 1]], 0.0);
    }

    #[test]
    fn jpeg_is_accepted() {
        let img = RgbImage::from_pixel(90, 90, Rgb([0, 0, 0]));
        let bytes = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
        assert_eq!(detect_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let array = preprocess(&bytes, 128).unwrap();
        assert_normalized(&array);
    }

    #[test]
    fn sixteen_bit_input_is_scaled_into_unit_range() {
        let img = image::ImageBuffer::from_pixel(32, 32, Luma([u16::MAX]));
        let bytes = encode(&DynamicImage::ImageLuma16(img), ImageFormat::Png);
        let array = preprocess(&bytes, 128).unwrap();
        assert_normalized(&array);
        assert!((array[[0, 0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_other_formats_and_garbage() {
        let img = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        let bmp = encode(&DynamicImage::ImageRgb8(img), ImageFormat::Bmp);
        assert!(matches!(detect_format(&bmp), Err(InferenceError::UnsupportedFormat(f)) if f == "Bmp"));
        assert!(matches!(
            preprocess(b"definitely not an image", 128),
            Err(InferenceError::UnsupportedFormat(_))
        ));
        assert!(matches!(preprocess(&[], 128), Err(InferenceError::EmptyImage)));
    }

    #[test]
    fn truncated_png_fails_to_decode() {
        let bytes = png(50, 50);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(preprocess(truncated, 128), Err(InferenceError::Decode(_))));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_size(10, 10).is_ok());
        assert!(matches!(
            validate_size(11, 10),
            Err(InferenceError::TooLarge { size: 11, limit: 10 })
        ));
    }
}
