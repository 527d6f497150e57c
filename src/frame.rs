//! Base and output frame storage.

use crate::colors::{BLACK, Rgb8};

/// The base frame and the rendered output frame of one strip.
///
/// Both frames are `N` pixels long for the lifetime of the store. The base
/// frame is what the rest of the firmware draws; the output frame belongs to
/// the compositor and is rebuilt on every render.
#[derive(Debug, Clone)]
pub struct PixelStore<const N: usize> {
    base: [Rgb8; N],
    output: [Rgb8; N],
}

impl<const N: usize> PixelStore<N> {
    /// Creates a store with both frames black.
    pub const fn new() -> Self {
        Self {
            base: [BLACK; N],
            output: [BLACK; N],
        }
    }

    /// Number of pixels in each frame.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Replaces the base frame.
    ///
    /// Returns the rejected length if `pixels` is not exactly `N` long; the
    /// base frame is left untouched in that case.
    pub fn write_base(&mut self, pixels: &[Rgb8]) -> Result<(), usize> {
        if pixels.len() != N {
            return Err(pixels.len());
        }
        self.base.copy_from_slice(pixels);
        Ok(())
    }

    pub fn base(&self) -> &[Rgb8; N] {
        &self.base
    }

    pub fn output(&self) -> &[Rgb8; N] {
        &self.output
    }

    /// Splits the store into the base frame and a mutable output frame for
    /// a render pass.
    pub(crate) fn split(&mut self) -> (&[Rgb8; N], &mut [Rgb8; N]) {
        (&self.base, &mut self.output)
    }
}

impl<const N: usize> Default for PixelStore<N> {
    fn default() -> Self {
        Self::new()
    }
}
