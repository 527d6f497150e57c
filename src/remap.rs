//! Logical to physical LED remapping.
//!
//! Keyboards rarely wire their LEDs in the order the firmware thinks about
//! them. [`RemapSink`] sits between a device and the real strip driver and
//! moves each logical pixel to its physical position on the chain.

use crate::colors::{BLACK, Rgb8};
use crate::device::LedSink;

/// Map validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapError {
    /// The map has more entries than the chain has LEDs.
    ChainTooShort {
        map_len: usize,
        chain_length: usize,
    },

    /// A map entry points past the end of the chain.
    EntryOutOfRange {
        /// Logical position of the entry.
        position: usize,
        /// The physical index it maps to.
        entry: usize,
        chain_length: usize,
    },
}

impl core::fmt::Display for MapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MapError::ChainTooShort {
                map_len,
                chain_length,
            } => {
                write!(
                    f,
                    "physical chain of {} LEDs is shorter than map of {} entries",
                    chain_length, map_len
                )
            }
            MapError::EntryOutOfRange {
                position,
                entry,
                chain_length,
            } => {
                write!(
                    f,
                    "map entry {} -> {} overflows chain of {} LEDs",
                    position, entry, chain_length
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MapError {}

/// Errors reported by [`RemapSink::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemapSinkError<E> {
    /// The frame length differs from the map length.
    LengthMismatch { expected: usize, actual: usize },

    /// The wrapped strip driver failed.
    Inner(E),
}

impl<E: core::fmt::Display> core::fmt::Display for RemapSinkError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RemapSinkError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "remap expects {} pixels, got {}",
                    expected, actual
                )
            }
            RemapSinkError::Inner(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for RemapSinkError<E> {}

/// Strip adapter applying a remap table.
///
/// `map[i]` is the physical position of logical LED `i`. Physical LEDs no
/// entry maps to are driven black.
///
/// # Type Parameters
/// * `S` - Wrapped strip driver
/// * `P` - Physical chain length
pub struct RemapSink<S, const P: usize> {
    inner: S,
    map: &'static [usize],
    physical: [Rgb8; P],
}

impl<S: LedSink, const P: usize> RemapSink<S, P> {
    /// Wraps `inner`, validating `map` against a chain of `P` LEDs.
    pub fn new(inner: S, map: &'static [usize]) -> Result<Self, MapError> {
        if map.len() > P {
            warn!("remap: chain of {} LEDs < map of {}", P, map.len());
            return Err(MapError::ChainTooShort {
                map_len: map.len(),
                chain_length: P,
            });
        }

        if let Some((position, &entry)) = map.iter().enumerate().find(|&(_, &e)| e >= P) {
            warn!("remap: entry {} -> {} overflows chain ({})", position, entry, P);
            return Err(MapError::EntryOutOfRange {
                position,
                entry,
                chain_length: P,
            });
        }

        Ok(Self {
            inner,
            map,
            physical: [BLACK; P],
        })
    }

    /// Number of logical LEDs, i.e. the frame length this sink accepts.
    pub fn map_len(&self) -> usize {
        self.map.len()
    }

    /// The last frame in physical order.
    pub fn physical(&self) -> &[Rgb8; P] {
        &self.physical
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LedSink, const P: usize> LedSink for RemapSink<S, P> {
    type Error = RemapSinkError<S::Error>;

    fn write(&mut self, pixels: &[Rgb8]) -> Result<(), Self::Error> {
        if pixels.len() != self.map.len() {
            return Err(RemapSinkError::LengthMismatch {
                expected: self.map.len(),
                actual: pixels.len(),
            });
        }

        self.physical.fill(BLACK);
        for (&position, &pixel) in self.map.iter().zip(pixels) {
            self.physical[position] = pixel;
        }

        self.inner
            .write(&self.physical)
            .map_err(RemapSinkError::Inner)
    }
}
