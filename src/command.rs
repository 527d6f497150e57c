//! Command-based control for overlay devices.
//!
//! Lets a single task own an [`OverlayDevice`](crate::OverlayDevice) and
//! receive mutations over a channel instead of sharing the device.

use crate::colors::Rgb8;
use crate::types::LayerTarget;

/// Actions for controlling a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction<'a, const N: usize> {
    /// Light an indicator.
    SetIndicator { label: &'a str, color: Rgb8 },
    /// Turn an indicator off.
    DisableIndicator(&'a str),
    /// Show a layer on layer overlays.
    SetLayer { target: LayerTarget<'a>, layer: u32 },
    /// Turn layer overlays off.
    DisableLayer(LayerTarget<'a>),
    /// Replace the base frame.
    WriteBase([Rgb8; N]),
    /// Render and submit again.
    Refresh,
}

/// Command targeting a specific device.
#[derive(Debug, Clone, Copy)]
pub struct OverlayCommand<'a, Id, const N: usize> {
    pub device_id: Id,
    pub action: OverlayAction<'a, N>,
}

impl<'a, Id, const N: usize> OverlayCommand<'a, Id, N> {
    /// Creates command.
    pub fn new(device_id: Id, action: OverlayAction<'a, N>) -> Self {
        Self { device_id, action }
    }
}
