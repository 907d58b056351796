//! Textures and the bank that owns them.
//!
//! Texels are stored as ARGB8888, row 0 at the top. The rasterizer addresses
//! them linearly with `u + v * width`, where `u` and `v` are already scaled to
//! texel units.

use std::path::Path;

/// Errors raised while decoding, building or looking up textures.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("{len} texels cannot fill a {width}x{height} texture")]
    Dimensions { width: u32, height: u32, len: usize },
    #[error("texel {index} uses palette entry {entry}, but the palette has {size} entries")]
    PaletteIndex { index: usize, entry: u8, size: usize },
    #[error("no texture with id {0}")]
    UnknownId(TextureId),
}

/// Handle to a texture stored in a [`TextureBank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents a 2D texture for texture mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    data: Vec<u32>, // ARGB texels, row-major from the top-left corner.
    width: u32,
    height: u32,
    /// Bits per texel of the source image.
    bpp: u8,
    /// Colour table of palette-indexed sources, kept for palette displays.
    palette: Option<Vec<u32>>,
}

impl Texture {
    /// Wraps already-decoded ARGB texels.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) {
            return Err(TextureError::Dimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            bpp: 32,
            palette: None,
        })
    }

    /// Expands 8-bit palette indices into ARGB texels, keeping the palette.
    pub fn from_indexed(
        width: u32,
        height: u32,
        indices: &[u8],
        palette: Vec<u32>,
    ) -> Result<Self, TextureError> {
        let data = indices
            .iter()
            .enumerate()
            .map(|(index, &entry)| {
                palette
                    .get(entry as usize)
                    .copied()
                    .ok_or(TextureError::PaletteIndex {
                        index,
                        entry,
                        size: palette.len(),
                    })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        let mut texture = Self::from_pixels(width, height, data)?;
        texture.bpp = 8;
        texture.palette = Some(palette);
        Ok(texture)
    }

    // Load a texture from an image file (PNG, BMP, JPG, ...)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();

        Self::from_pixels(width, height, data)
    }

    /// Two-colour checkerboard with square cells of `cell` texels.
    pub fn checkerboard(size: u32, cell: u32, a: u32, b: u32) -> Self {
        let size = size.max(1);
        let cell = cell.max(1);
        let data = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            data,
            width: size,
            height: size,
            bpp: 32,
            palette: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bpp(&self) -> u8 {
        self.bpp
    }

    /// Total number of texels (`width * height`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn palette(&self) -> Option<&[u32]> {
        self.palette.as_deref()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Linear texel index for texel-space coordinates, clamped into the buffer.
    ///
    /// Interpolation can overshoot the last row or column by a fraction of a
    /// step; clamping keeps those samples on the nearest valid texel.
    #[inline]
    pub fn index_at(&self, u: f32, v: f32) -> usize {
        let index = u.floor() as i64 + v.floor() as i64 * self.width as i64;
        index.clamp(0, self.data.len() as i64 - 1) as usize
    }

    /// Nearest texel at texel-space coordinates `(u, v)`.
    #[inline]
    pub fn texel(&self, u: f32, v: f32) -> u32 {
        self.data[self.index_at(u, v)]
    }
}

/// Owns every decoded texture and hands out borrowed views by id.
#[derive(Debug, Default)]
pub struct TextureBank {
    slots: Vec<Option<Texture>>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, texture: Texture) -> TextureId {
        tracing::debug!(
            id = self.slots.len(),
            width = texture.width(),
            height = texture.height(),
            "texture added"
        );
        self.slots.push(Some(texture));
        TextureId(self.slots.len() - 1)
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<TextureId, TextureError> {
        let texture = Texture::from_file(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "texture loaded");
        Ok(self.add(texture))
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Looks up the texture to make current for the next triangles.
    pub fn bind(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.get(id).ok_or(TextureError::UnknownId(id))
    }

    /// Frees a texture. Its id is never reused.
    pub fn remove(&mut self, id: TextureId) -> Option<Texture> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
