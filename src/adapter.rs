//! Glue between keymap events and an [`OverlayDevice`].
//!
//! The firmware's composition root builds the device once and hands a
//! reference to each adapter; nothing here owns or looks up a device.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::device::{DeviceError, LedSink, OverlayDevice};
use crate::types::LayerTarget;

/// What to do when the keymap reports a layer as deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InactiveLayerPolicy {
    /// Leave the overlay as it is; the next activation will repaint it.
    Ignore,
    /// Turn the targeted layer overlays off.
    Disable,
}

/// Forwards layer-change notifications to a device.
pub struct LayerChangeAdapter<'d, M, S, const N: usize, const I: usize, const L: usize>
where
    M: RawMutex,
    S: LedSink,
{
    device: &'d OverlayDevice<M, S, N, I, L>,
    target: LayerTarget<'static>,
    on_inactive: InactiveLayerPolicy,
}

impl<'d, M, S, const N: usize, const I: usize, const L: usize> LayerChangeAdapter<'d, M, S, N, I, L>
where
    M: RawMutex,
    S: LedSink,
{
    pub fn new(
        device: &'d OverlayDevice<M, S, N, I, L>,
        target: LayerTarget<'static>,
        on_inactive: InactiveLayerPolicy,
    ) -> Self {
        Self {
            device,
            target,
            on_inactive,
        }
    }

    /// Handles a layer-change notification from the keymap.
    ///
    /// Activations show `layer` on the target. Deactivations follow the
    /// adapter's [`InactiveLayerPolicy`]; with `Ignore` the device is not
    /// touched at all.
    pub fn on_layer_change(&self, layer: u8, active: bool) -> Result<(), DeviceError<S::Error>> {
        if active {
            trace!("layer {} activated", layer);
            return self.device.set_layer(self.target, u32::from(layer));
        }

        match self.on_inactive {
            InactiveLayerPolicy::Ignore => Ok(()),
            InactiveLayerPolicy::Disable => {
                trace!("layer {} deactivated", layer);
                self.device.disable_layer(self.target)
            }
        }
    }
}

/// Key behavior that turns layer overlays off when pressed.
pub struct DisableLayerBehavior<'d, M, S, const N: usize, const I: usize, const L: usize>
where
    M: RawMutex,
    S: LedSink,
{
    device: &'d OverlayDevice<M, S, N, I, L>,
    target: LayerTarget<'static>,
}

impl<'d, M, S, const N: usize, const I: usize, const L: usize>
    DisableLayerBehavior<'d, M, S, N, I, L>
where
    M: RawMutex,
    S: LedSink,
{
    pub fn new(device: &'d OverlayDevice<M, S, N, I, L>, target: LayerTarget<'static>) -> Self {
        Self { device, target }
    }

    /// Binding pressed.
    pub fn on_pressed(&self) -> Result<(), DeviceError<S::Error>> {
        self.device.disable_layer(self.target)
    }
}
