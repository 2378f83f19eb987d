use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ExtendedColorType, ImageDecoder, ImageFormat};
use lopdf::{Object, Stream, dictionary};

use super::PdfError;

const REENCODE_QUALITY: u8 = 92;

/// JPEG payload ready to be stored as a `DCTDecode` image XObject.
#[derive(Debug, Clone)]
pub(crate) struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub data: Vec<u8>,
}

impl JpegImage {
    /// Read an image file. Gray and RGB JPEGs are kept byte for byte; anything
    /// else (CMYK JPEGs, PNGs saved as `.jpg`) is decoded and re-encoded as RGB.
    pub fn load(path: &Path) -> Result<Self, PdfError> {
        let bytes = fs::read(path).map_err(|source| PdfError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image_err = |source| PdfError::Image {
            path: path.to_path_buf(),
            source,
        };

        if image::guess_format(&bytes).map_err(image_err)? == ImageFormat::Jpeg {
            let decoder = JpegDecoder::new(Cursor::new(bytes.as_slice())).map_err(image_err)?;
            let (width, height) = decoder.dimensions();
            let color_space = match decoder.original_color_type() {
                ExtendedColorType::L8 => Some("DeviceGray"),
                ExtendedColorType::Rgb8 => Some("DeviceRGB"),
                _ => None,
            };
            if let Some(color_space) = color_space {
                return Ok(Self {
                    width,
                    height,
                    color_space,
                    data: bytes,
                });
            }
        }

        tracing::debug!(path = %path.display(), "re-encoding image as RGB JPEG");
        let rgb = image::load_from_memory(&bytes).map_err(image_err)?.to_rgb8();
        let mut data = Vec::new();
        JpegEncoder::new_with_quality(&mut data, REENCODE_QUALITY)
            .encode_image(&rgb)
            .map_err(image_err)?;
        Ok(Self {
            width: rgb.width(),
            height: rgb.height(),
            color_space: "DeviceRGB",
            data,
        })
    }

    pub fn into_stream(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(self.width)),
            "Height" => Object::Integer(i64::from(self.height)),
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "DCTDecode",
        };
        Stream::new(dict, self.data).with_compression(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn rgb_jpegs_are_embedded_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bum.jpg");
        RgbImage::from_pixel(6, 4, Rgb([200, 10, 10])).save(&path).unwrap();

        let image = JpegImage::load(&path).unwrap();
        assert_eq!((image.width, image.height), (6, 4));
        assert_eq!(image.color_space, "DeviceRGB");
        assert_eq!(image.data, fs::read(&path).unwrap());
    }

    #[test]
    fn gray_jpegs_keep_their_colour_space() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ur.jpg");
        GrayImage::from_pixel(3, 3, Luma([90])).save(&path).unwrap();

        let image = JpegImage::load(&path).unwrap();
        assert_eq!(image.color_space, "DeviceGray");
    }

    #[test]
    fn non_jpeg_content_is_reencoded() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("card.png");
        RgbImage::from_pixel(5, 7, Rgb([1, 2, 3])).save(&png).unwrap();
        let disguised = dir.path().join("card.jpg");
        fs::rename(&png, &disguised).unwrap();

        let image = JpegImage::load(&disguised).unwrap();
        assert_eq!((image.width, image.height), (5, 7));
        assert_eq!(
            image::guess_format(&image.data).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn unreadable_files_report_their_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"not an image").unwrap();

        match JpegImage::load(&path) {
            Err(PdfError::Image { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
