//! Photo down-sampling for display.
//!
//! # Responsibility
//! - Compute an integer sample factor (the rounded bound ratio) from source
//!   and target bounds.
//! - Decode a photo at the reduced resolution.
//!
//! # Invariants
//! - The sample factor is always >= 1; images are never upsampled.
//! - A missing source file is `Ok(None)`, not an error.

use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type PictureResult<T> = Result<T, PictureError>;

#[derive(Debug)]
pub enum PictureError {
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl Display for PictureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { path, source } => {
                write!(f, "failed to decode `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for PictureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Decoded photo plus the factor it was reduced by.
#[derive(Debug, Clone)]
pub struct ScaledPicture {
    pub image: DynamicImage,
    pub sample_size: u32,
}

/// Integer down-sampling factor for fitting `src` into `dest`.
///
/// `round(max(src_h / dest_h, src_w / dest_w))` when the source exceeds the
/// destination in either dimension, otherwise 1. Zero destination bounds are
/// treated as 1.
pub fn sample_size(src_width: u32, src_height: u32, dest_width: u32, dest_height: u32) -> u32 {
    let dest_width = dest_width.max(1);
    let dest_height = dest_height.max(1);
    if src_height <= dest_height && src_width <= dest_width {
        return 1;
    }

    let height_scale = f64::from(src_height) / f64::from(dest_height);
    let width_scale = f64::from(src_width) / f64::from(dest_width);
    (height_scale.max(width_scale).round() as u32).max(1)
}

/// Dimensions of an image decoded at `factor`.
pub fn scaled_dimensions(src_width: u32, src_height: u32, factor: u32) -> (u32, u32) {
    let factor = factor.max(1);
    (
        src_width.div_ceil(factor).max(1),
        src_height.div_ceil(factor).max(1),
    )
}

/// Loads `path` reduced to roughly fit `dest_width` x `dest_height`.
pub fn load_scaled(
    path: impl AsRef<Path>,
    dest_width: u32,
    dest_height: u32,
) -> PictureResult<Option<ScaledPicture>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }

    let decode_error = |source| PictureError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let (src_width, src_height) = image::image_dimensions(path).map_err(decode_error)?;
    let factor = sample_size(src_width, src_height, dest_width, dest_height);
    let decoded = image::open(path).map_err(decode_error)?;

    debug!(
        "event=picture_scale module=picture status=ok src={}x{} dest={}x{} sample_size={}",
        src_width, src_height, dest_width, dest_height, factor
    );

    if factor == 1 {
        return Ok(Some(ScaledPicture {
            image: decoded,
            sample_size: 1,
        }));
    }

    let (width, height) = scaled_dimensions(src_width, src_height, factor);
    Ok(Some(ScaledPicture {
        image: decoded.resize_exact(width, height, FilterType::Triangle),
        sample_size: factor,
    }))
}

#[cfg(test)]
mod tests {
    use super::{sample_size, scaled_dimensions};

    #[test]
    fn source_within_bounds_keeps_full_resolution() {
        assert_eq!(sample_size(800, 600, 1000, 1000), 1);
        assert_eq!(sample_size(1000, 1000, 1000, 1000), 1);
    }

    #[test]
    fn larger_dimension_ratio_wins() {
        assert_eq!(sample_size(4000, 3000, 1000, 1000), 4);
        assert_eq!(sample_size(3000, 4000, 1000, 1000), 4);
    }

    #[test]
    fn ratio_is_rounded_and_never_zero() {
        assert_eq!(sample_size(1100, 900, 1000, 1000), 1);
        assert_eq!(sample_size(2600, 100, 1000, 1000), 3);
        assert_eq!(sample_size(10, 10, 0, 0), 10);
    }

    #[test]
    fn scaled_dimensions_round_up() {
        assert_eq!(scaled_dimensions(4000, 3000, 4), (1000, 750));
        assert_eq!(scaled_dimensions(5, 3, 4), (2, 1));
        assert_eq!(scaled_dimensions(5, 3, 0), (5, 3));
    }
}
