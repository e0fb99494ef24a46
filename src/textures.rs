//! Tonal stroke textures for hatched surface rendering.
//!
//! Eight single-channel tone levels are installed on texture units 0 through
//! 7, each with four explicit mip levels (64, 32, 16 and 8 texels square).
//! Level 0 is the sparsest diagonal hatching; levels darken monotonically and
//! the upper four add cross-hatching. The fragment stage blends neighbouring
//! levels by light intensity.
//!
//! Each level prefers a grayscale base image from `assets/strokes/` when one
//! is present (`tone<level>_<size>.tga`), falling back to a procedural stripe
//! pattern otherwise. The generated mips are authored per size rather than
//! derived by filtering, so strokes stay crisp at every distance.

use std::path::PathBuf;

use gl::types::{GLint, GLsizei, GLuint};
use tracing::{debug, warn};

/// Number of tone levels, one texture unit each.
pub const TONE_LEVELS: usize = 8;
/// Side length of each explicit mip level, finest first.
pub const MIP_SIZES: [u32; 4] = [64, 32, 16, 8];

/// Texel value for paper.
const PAPER: u8 = 0xff;
/// Texel value for ink.
const INK: u8 = 0x00;

/// Diagonal stripe spacing per tone level, in texels at the 64 base size.
const DIAGONAL_SPACING: [u32; TONE_LEVELS] = [32, 16, 8, 4, 4, 4, 4, 4];
/// Anti-diagonal spacing for the cross-hatched upper levels.
const CROSS_SPACING: [Option<u32>; TONE_LEVELS] = [
    None,
    None,
    None,
    None,
    Some(32),
    Some(16),
    Some(8),
    Some(4),
];

/// Where optional hand-drawn tone images live.
const STROKE_DIR: &str = "assets/strokes";

/// GL texture names for the eight tone levels, bound to units 0..8.
///
/// The textures live for the rest of the process; nothing deletes them.
#[derive(Debug)]
pub struct StrokeTextures {
    ids: [GLuint; TONE_LEVELS],
}

impl StrokeTextures {
    /// Create, fill and bind the eight tone textures.
    ///
    /// Unit `i` ends up with tone level `i` bound and configured for
    /// trilinear filtering over the four explicit mips. The active texture
    /// unit is left at the last one touched.
    pub fn install() -> Self {
        let mut ids = [0u32; TONE_LEVELS];

        // SAFETY: the GL context is current; buffers passed to TexImage2D
        // outlive the call and match the advertised dimensions.
        unsafe {
            gl::GenTextures(TONE_LEVELS as GLsizei, ids.as_mut_ptr());
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            for (level, &id) in ids.iter().enumerate() {
                gl::ActiveTexture(gl::TEXTURE0 + level as GLuint);
                gl::BindTexture(gl::TEXTURE_2D, id);

                for (mip, &size) in MIP_SIZES.iter().enumerate() {
                    let texels = tone_level_texels(level, size);
                    gl::TexImage2D(
                        gl::TEXTURE_2D,
                        mip as GLint,
                        gl::R8 as GLint,
                        size as GLsizei,
                        size as GLsizei,
                        0,
                        gl::RED,
                        gl::UNSIGNED_BYTE,
                        texels.as_ptr().cast(),
                    );
                }

                gl::TexParameteri(
                    gl::TEXTURE_2D,
                    gl::TEXTURE_MAX_LEVEL,
                    (MIP_SIZES.len() - 1) as GLint,
                );
                gl::TexParameteri(
                    gl::TEXTURE_2D,
                    gl::TEXTURE_MIN_FILTER,
                    gl::LINEAR_MIPMAP_LINEAR as GLint,
                );
                gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
                gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
                gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            }
        }

        Self { ids }
    }

    /// Re-bind every tone texture to its unit.
    pub fn bind(&self) {
        // SAFETY: the GL context is current and the names were generated by
        // install().
        unsafe {
            for (unit, &id) in self.ids.iter().enumerate() {
                gl::ActiveTexture(gl::TEXTURE0 + unit as GLuint);
                gl::BindTexture(gl::TEXTURE_2D, id);
            }
        }
    }
}

/// Texel data for one mip of one tone level, base image or procedural.
fn tone_level_texels(level: usize, size: u32) -> Vec<u8> {
    base_image(level, size).unwrap_or_else(|| stroke_pattern(level, size))
}

/// Procedural stripe pattern for `level` at `size` texels square.
///
/// Diagonal lines (`x + y` on the spacing grid) carry every level; the upper
/// levels overlay anti-diagonal lines (`x - y`) to read as cross-hatching.
/// Spacing scales with the texel size so each mip keeps the same stroke
/// count; one-texel strokes then cover proportionally more of the coarser
/// mips, darkening distant surfaces. A spacing floor of 2 keeps even the
/// darkest mip from saturating to solid ink.
#[must_use]
pub fn stroke_pattern(level: usize, size: u32) -> Vec<u8> {
    let base = MIP_SIZES[0];
    let diagonal = ((DIAGONAL_SPACING[level] * size) / base).max(2);
    let cross = CROSS_SPACING[level].map(|spacing| ((spacing * size) / base).max(2));

    let mut texels = vec![PAPER; (size * size) as usize];
    for y in 0..size {
        for x in 0..size {
            let on_diagonal = (x + y) % diagonal == 0;
            let on_cross = cross
                .map(|spacing| (x as i64 - y as i64).rem_euclid(spacing as i64) == 0)
                .unwrap_or(false);
            if on_diagonal || on_cross {
                texels[(y * size + x) as usize] = INK;
            }
        }
    }
    texels
}

/// Grayscale base image for `level` at `size`, when one ships with the
/// viewer. Unreadable or wrongly sized images are skipped with a warning.
fn base_image(level: usize, size: u32) -> Option<Vec<u8>> {
    let mut path = PathBuf::from(STROKE_DIR);
    path.push(format!("tone{level}_{size}.tga"));
    if !path.exists() {
        return None;
    }

    let image = match image::open(&path) {
        Ok(image) => image,
        Err(err) => {
            warn!("skipping stroke image `{}`: {err}", path.display());
            return None;
        }
    };

    let gray = image.to_luma8();
    if gray.dimensions() != (size, size) {
        warn!(
            "skipping stroke image `{}`: expected {size}x{size}, got {}x{}",
            path.display(),
            gray.width(),
            gray.height()
        );
        return None;
    }

    debug!("using stroke image `{}`", path.display());
    Some(gray.into_raw())
}
