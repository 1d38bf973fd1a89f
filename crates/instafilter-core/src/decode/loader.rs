//! Photo decoding with EXIF orientation handling.

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, Orientation, PixelBuffer};

/// Decode a JPEG or PNG photo from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if the data is truncated or corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    Ok(PixelBuffer::from_rgb_image(
        apply_orientation(img, orientation).into_rgb8(),
    ))
}

/// Read and decode a photo from disk.
pub fn decode_file(path: impl AsRef<Path>) -> Result<PixelBuffer, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::IoError(format!("{}: {e}", path.display())))?;
    let buffer = decode_image(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = buffer.width,
        height = buffer.height,
        "decoded source image"
    );
    Ok(buffer)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

/// Returns `Orientation::Normal` if there is no EXIF block or no
/// orientation tag.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    let Ok(exif) = Reader::new().read_from_container(&mut cursor) else {
        return Orientation::Normal;
    };
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_jpeg, encode_png};

    fn checker(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 230 } else { 20 };
                pixels.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        pixels
    }

    #[test]
    fn test_decode_png_is_lossless() {
        let pixels = checker(6, 4);
        let png = encode_png(&pixels, 6, 4).unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.width, 6);
        assert_eq!(decoded.height, 4);
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn test_decode_jpeg_dimensions() {
        let pixels = vec![128u8; 16 * 8 * 3];
        let jpeg = encode_jpeg(&pixels, 16, 8, 90).unwrap();

        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
        assert!(decoded.is_well_formed());
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let png = encode_png(&checker(8, 8), 8, 8).unwrap();
        let result = decode_image(&png[..png.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        let png = encode_png(&checker(2, 2), 2, 2).unwrap();
        assert_eq!(extract_orientation(&png), Orientation::Normal);
    }

    #[test]
    fn test_decode_missing_file() {
        let path = std::env::temp_dir().join("instafilter-does-not-exist.png");
        assert!(matches!(decode_file(&path), Err(DecodeError::IoError(_))));
    }
}
