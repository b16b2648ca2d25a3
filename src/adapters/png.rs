use anyhow::{Context, Result, bail};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::collaborators::ImageCodec;
use crate::models::{RecordBody, ResourceRecord};

/// Encodes sprite pixels as PNG; every other record encodes to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
  fn encode_png(&self, record: &ResourceRecord) -> Result<Vec<u8>> {
    let RecordBody::Sprite {
      name,
      image: Some(image),
    } = &record.body
    else {
      return Ok(Vec::new());
    };
    if image.width == 0 || image.height == 0 {
      return Ok(Vec::new());
    }

    let Some(expected) = u64::from(image.width)
      .checked_mul(u64::from(image.height))
      .and_then(|pixels| pixels.checked_mul(4))
    else {
      bail!(
        "sprite '{}' is too large to encode: {}x{}",
        name,
        image.width,
        image.height
      );
    };
    if image.rgba.len() as u64 != expected {
      bail!(
        "sprite '{}' has {} bytes of pixels, expected {} for {}x{}",
        name,
        image.rgba.len(),
        expected,
        image.width,
        image.height
      );
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
      .write_image(&image.rgba, image.width, image.height, ExtendedColorType::Rgba8)
      .with_context(|| format!("failed to encode sprite '{name}' as PNG"))?;
    Ok(png)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::SpriteImage;

  fn sprite(image: Option<SpriteImage>) -> ResourceRecord {
    ResourceRecord::new(16, RecordBody::Sprite {
      name: "dot".into(),
      image,
    })
  }

  #[test]
  fn encodes_rgba_sprites() {
    let record = sprite(Some(SpriteImage {
      width: 2,
      height: 1,
      rgba: vec![255, 0, 0, 255, 0, 0, 255, 128],
    }));
    let png = PngCodec.encode_png(&record).unwrap();
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.into_raw(), vec![255, 0, 0, 255, 0, 0, 255, 128]);
  }

  #[test]
  fn sprites_without_pixels_encode_to_nothing() {
    assert!(PngCodec.encode_png(&sprite(None)).unwrap().is_empty());
    let empty = sprite(Some(SpriteImage::default()));
    assert!(PngCodec.encode_png(&empty).unwrap().is_empty());
  }

  #[test]
  fn other_kinds_encode_to_nothing() {
    let record = ResourceRecord::new(1, RecordBody::Mesh { name: "quad".into() });
    assert!(PngCodec.encode_png(&record).unwrap().is_empty());
  }

  #[test]
  fn rejects_mismatched_pixel_buffers() {
    let record = sprite(Some(SpriteImage {
      width: 2,
      height: 2,
      rgba: vec![0; 4],
    }));
    assert!(PngCodec.encode_png(&record).is_err());
  }

  #[test]
  fn rejects_dimensions_whose_buffer_size_overflows() {
    let record = sprite(Some(SpriteImage {
      width: u32::MAX,
      height: u32::MAX,
      rgba: Vec::new(),
    }));
    let err = PngCodec.encode_png(&record).unwrap_err();
    assert!(err.to_string().contains("too large"));
  }
}
