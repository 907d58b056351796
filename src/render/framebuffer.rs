//! Frame buffer abstraction for 2D pixel access.
//!
//! The renderer never owns the pixels it draws into. A [`FrameBuffer`] borrows
//! the display's surface for the duration of a frame, together with its size
//! and pitch.

/// A view into a 32-bit colour surface.
///
/// Wraps a 1D slice with width/height/pitch metadata to enable 2D pixel access.
/// This is a borrowed view, not an owning type: create it when a frame starts
/// and drop it before the surface is presented.
///
/// `pitch` is the distance between the starts of two rows, in pixels. Surfaces
/// with padded rows have `pitch > width`.
pub struct FrameBuffer<'a> {
    pixels: &'a mut [u32],
    width: u32,
    height: u32,
    pitch: usize,
}

impl<'a> FrameBuffer<'a> {
    /// Create a view over a tightly packed surface (`pitch == width`).
    pub fn new(pixels: &'a mut [u32], width: u32, height: u32) -> Self {
        Self::with_pitch(pixels, width, height, width as usize)
    }

    /// Create a view over a surface whose rows are `pitch` pixels apart.
    ///
    /// Rows that do not fit in `pixels` are dropped from the view, with a
    /// warning.
    pub fn with_pitch(pixels: &'a mut [u32], width: u32, height: u32, pitch: usize) -> Self {
        let pitch = pitch.max(width as usize);
        let fitting_rows = if pitch == 0 {
            height as usize
        } else {
            // The last row only needs `width` pixels, not a full pitch.
            (pixels.len() + pitch - width as usize) / pitch
        };
        if fitting_rows < height as usize {
            tracing::warn!(
                pixels = pixels.len(),
                width,
                height,
                pitch,
                rows = fitting_rows,
                "surface too small, frame buffer clipped"
            );
        }
        Self {
            pixels,
            width,
            height: height.min(fitting_rows.min(u32::MAX as usize) as u32),
            pitch,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Fill the visible area with `color`, leaving row padding alone.
    pub fn clear(&mut self, color: u32) {
        for y in 0..self.height as usize {
            self.row_mut(y).fill(color);
        }
    }

    /// Set a pixel, silently ignoring out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.pixels[y as usize * self.pitch + x as usize] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.pixels[y as usize * self.pitch + x as usize])
        } else {
            None
        }
    }

    /// The visible pixels of row `y`.
    ///
    /// # Panics
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        assert!(y < self.height as usize, "row {} out of {}", y, self.height);
        let start = y * self.pitch;
        &mut self.pixels[start..start + self.width as usize]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u32] {
        assert!(y < self.height as usize, "row {} out of {}", y, self.height);
        let start = y * self.pitch;
        &self.pixels[start..start + self.width as usize]
    }
}

/// A tightly packed ARGB8888 pixel surface, the display side's back buffer.
pub struct Surface {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32, fill: u32) -> Self {
        Self {
            pixels: vec![fill; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32, fill: u32) {
        self.pixels = vec![fill; width as usize * height as usize];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Borrow the surface as a drawing target for one frame.
    pub fn frame_buffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(&mut self.pixels, self.width, self.height)
    }

    /// The pixels as bytes, in memory order, for uploading.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and a stricter alignment than u8, and the
        // byte length covers exactly the same allocation.
        unsafe {
            std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.pixels.len() * 4)
        }
    }
}
