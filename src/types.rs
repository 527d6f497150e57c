//! Core types shared by the registry, compositor and device.

use crate::colors::Rgb8;

/// Number of layer slots a layer overlay carries colors for.
pub const LAYER_SLOTS: usize = 4;

/// Color table of a layer overlay, one entry per layer slot.
pub type LayerColors = [Rgb8; LAYER_SLOTS];

/// A keyboard layer reduced into `0..LAYER_SLOTS`.
///
/// Layers past the last slot wrap around instead of clamping, so layer 4
/// shows the color of layer 0, layer 5 the color of layer 1, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerSlot(u8);

impl LayerSlot {
    /// Wraps a reported layer index into a slot.
    #[inline]
    pub const fn from_layer(layer: u32) -> Self {
        LayerSlot((layer % LAYER_SLOTS as u32) as u8)
    }

    /// Slot index, always `< LAYER_SLOTS`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for LayerSlot {
    fn from(layer: u8) -> Self {
        LayerSlot::from_layer(layer as u32)
    }
}

impl From<LayerSlot> for usize {
    fn from(slot: LayerSlot) -> Self {
        slot.index()
    }
}

/// Whether layer overlays are lit when the device comes up.
///
/// There is no default on purpose: lights on or off at boot is a visible
/// decision every configuration has to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitialLayerState {
    /// Layer overlays start enabled on slot 0.
    Active,

    /// Layer overlays start disabled until the first `set_layer`.
    Inactive,
}

impl InitialLayerState {
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, InitialLayerState::Active)
    }
}

/// Which layer overlays a layer operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerTarget<'a> {
    /// Exactly the overlay with this label. Missing labels are an error.
    Label(&'a str),

    /// Every layer overlay in the registry. Succeeds even if there are none.
    All,
}

impl<'a> From<&'a str> for LayerTarget<'a> {
    fn from(label: &'a str) -> Self {
        LayerTarget::Label(label)
    }
}

/// Observable state of a single overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState<T> {
    /// Overlay is not drawn.
    Disabled,

    /// Overlay is drawn with this color (indicators) or slot (layers).
    Enabled(T),
}

impl<T> OverlayState<T> {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        matches!(self, OverlayState::Enabled(_))
    }
}

/// Configuration validation errors, reported while building the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// An overlay references an LED past the end of the frame.
    IndexOutOfRange {
        /// Label of the offending overlay.
        label: &'static str,
        /// The offending LED index.
        index: usize,
        /// Length of the frame the overlay was validated against.
        frame_len: usize,
    },

    /// Two overlays of the same kind share a label.
    DuplicateLabel(&'static str),

    /// More overlays than the registry has room for.
    CapacityExceeded,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::IndexOutOfRange {
                label,
                index,
                frame_len,
            } => {
                write!(
                    f,
                    "overlay \"{}\": LED index {} overflows frame of {} LEDs",
                    label, index, frame_len
                )
            }
            ConfigError::DuplicateLabel(label) => {
                write!(f, "overlay label \"{}\" is used more than once", label)
            }
            ConfigError::CapacityExceeded => {
                write!(f, "overlay registry capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
