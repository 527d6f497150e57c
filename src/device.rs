//! Synchronized device facade.
//!
//! Provides [`OverlayDevice`], which owns the frames, the overlay registry
//! and the LED strip behind a single lock. Every mutating call renders and
//! submits the new frame before releasing the lock, so callers observe
//! transport errors directly. Also defines the [`LedSink`] trait for the
//! strip hardware.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::colors::Rgb8;
use crate::command::OverlayAction;
use crate::compositor::render;
use crate::frame::PixelStore;
use crate::overlay::{IndicatorDef, IndicatorState, LayerDef, LayerState};
use crate::registry::OverlayRegistry;
use crate::types::{ConfigError, InitialLayerState, LayerSlot, LayerTarget};

/// Trait for abstracting the LED strip hardware.
///
/// Implement this for your strip driver (WS2812 over SPI/PIO/RMT, a remap
/// wrapper, a test recorder, ...). The device calls it with exactly `N`
/// pixels, while holding its lock.
///
/// Implementations must not call back into the device that owns them.
pub trait LedSink {
    /// Error reported by the transport.
    type Error;

    /// Pushes a full frame to the strip.
    fn write(&mut self, pixels: &[Rgb8]) -> Result<(), Self::Error>;
}

impl<T: LedSink + ?Sized> LedSink for &mut T {
    type Error = T::Error;

    fn write(&mut self, pixels: &[Rgb8]) -> Result<(), Self::Error> {
        (**self).write(pixels)
    }
}

/// Errors returned by device operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E> {
    /// A base frame of the wrong length was submitted.
    LengthMismatch {
        /// Frame length of the device
        expected: usize,
        /// Length that was submitted
        actual: usize,
    },

    /// No overlay of the addressed kind carries this label.
    LabelNotFound,

    /// The LED strip rejected or failed to apply the frame.
    Transport(E),
}

impl<E: core::fmt::Display> core::fmt::Display for DeviceError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "frame length mismatch: expected {} pixels, got {}",
                    expected, actual
                )
            }
            DeviceError::LabelNotFound => {
                write!(f, "no overlay with that label")
            }
            DeviceError::Transport(err) => {
                write!(f, "LED strip transport error: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for DeviceError<E> {}

/// Static configuration of one device.
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    /// Indicator overlays, lowest priority first.
    pub indicators: &'static [IndicatorDef],
    /// Layer overlays, lowest priority first.
    pub layers: &'static [LayerDef],
    /// Whether layer overlays are lit before the first layer report.
    pub initial_layer_state: InitialLayerState,
}

impl DeviceConfig {
    pub const fn new(
        indicators: &'static [IndicatorDef],
        layers: &'static [LayerDef],
        initial_layer_state: InitialLayerState,
    ) -> Self {
        Self {
            indicators,
            layers,
            initial_layer_state,
        }
    }
}

struct DeviceState<S, const N: usize, const I: usize, const L: usize> {
    pixels: PixelStore<N>,
    registry: OverlayRegistry<I, L>,
    sink: S,
}

impl<S: LedSink, const N: usize, const I: usize, const L: usize> DeviceState<S, N, I, L> {
    /// Renders the output frame and submits it to the strip.
    fn flush(&mut self) -> Result<(), DeviceError<S::Error>> {
        let (base, output) = self.pixels.split();
        render(
            base,
            self.registry.indicators(),
            self.registry.layers(),
            output,
        );
        trace!("render: {} LEDs", N);

        self.sink.write(self.pixels.output()).map_err(|err| {
            warn!("LED strip rejected frame");
            DeviceError::Transport(err)
        })
    }
}

/// Compositor device driving one LED strip.
///
/// Shared by reference between the firmware contexts that drive it (key
/// behaviors, the layer listener, ...). All state lives behind one lock; an
/// operation holds it from mutation through submission.
///
/// # Type Parameters
/// * `M` - Raw mutex flavor (`CriticalSectionRawMutex` when called from
///   several contexts, `NoopRawMutex` when confined to one)
/// * `S` - LED strip implementation
/// * `N` - Frame length in LEDs
/// * `I` - Maximum number of indicator overlays
/// * `L` - Maximum number of layer overlays
pub struct OverlayDevice<M: RawMutex, S: LedSink, const N: usize, const I: usize, const L: usize> {
    state: Mutex<M, RefCell<DeviceState<S, N, I, L>>>,
}

impl<M, S, const N: usize, const I: usize, const L: usize> OverlayDevice<M, S, N, I, L>
where
    M: RawMutex,
    S: LedSink,
{
    /// Builds a device from static configuration.
    ///
    /// Nothing is written to the strip until the first operation.
    ///
    /// # Errors
    /// Any [`ConfigError`] from validating the overlays against `N` LEDs.
    /// The device is not constructed in that case.
    pub fn new(config: &DeviceConfig, sink: S) -> Result<Self, ConfigError> {
        let registry = OverlayRegistry::from_defs(
            N,
            config.indicators,
            config.layers,
            config.initial_layer_state,
        )?;
        Self::with_registry(registry, sink)
    }

    /// Builds a device from an already assembled registry.
    ///
    /// # Errors
    /// `IndexOutOfRange` if the registry was validated against a longer
    /// frame and one of its indexes does not fit into `N` LEDs.
    pub fn with_registry(
        mut registry: OverlayRegistry<I, L>,
        sink: S,
    ) -> Result<Self, ConfigError> {
        registry.fit_frame(N)?;

        Ok(Self {
            state: Mutex::new(RefCell::new(DeviceState {
                pixels: PixelStore::new(),
                registry,
                sink,
            })),
        })
    }

    /// Runs `f` on the state with the lock held.
    fn with_state<R>(&self, f: impl FnOnce(&mut DeviceState<S, N, I, L>) -> R) -> R {
        self.state.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// Lights an indicator in `color` and pushes the new frame.
    ///
    /// # Errors
    /// * `LabelNotFound` - no indicator with this label; nothing is submitted
    /// * `Transport` - the strip failed to apply the frame
    pub fn set_indicator(&self, label: &str, color: Rgb8) -> Result<(), DeviceError<S::Error>> {
        self.with_state(|state| {
            let Some(indicator) = state.registry.find_indicator_mut(label) else {
                debug!("set_indicator: no indicator labelled {}", label);
                return Err(DeviceError::LabelNotFound);
            };
            indicator.enable(color);
            state.flush()
        })
    }

    /// Turns an indicator off and pushes the new frame.
    pub fn disable_indicator(&self, label: &str) -> Result<(), DeviceError<S::Error>> {
        self.with_state(|state| {
            let Some(indicator) = state.registry.find_indicator_mut(label) else {
                debug!("disable_indicator: no indicator labelled {}", label);
                return Err(DeviceError::LabelNotFound);
            };
            indicator.disable();
            state.flush()
        })
    }

    /// Shows `layer` (wrapped into a slot) on the targeted layer overlays.
    ///
    /// # Errors
    /// * `LabelNotFound` - `target` names a label that does not exist
    /// * `Transport` - the strip failed to apply the frame
    pub fn set_layer<'a>(
        &self,
        target: impl Into<LayerTarget<'a>>,
        layer: u32,
    ) -> Result<(), DeviceError<S::Error>> {
        let target = target.into();
        let slot = LayerSlot::from_layer(layer);

        self.with_state(|state| {
            match target {
                LayerTarget::Label(label) => {
                    let Some(overlay) = state.registry.find_layer_mut(label) else {
                        debug!("set_layer: no layer overlay labelled {}", label);
                        return Err(DeviceError::LabelNotFound);
                    };
                    overlay.enable(slot);
                }
                LayerTarget::All => {
                    for overlay in state.registry.layers_mut() {
                        overlay.enable(slot);
                    }
                }
            }
            state.flush()
        })
    }

    /// Turns the targeted layer overlays off and pushes the new frame.
    pub fn disable_layer<'a>(
        &self,
        target: impl Into<LayerTarget<'a>>,
    ) -> Result<(), DeviceError<S::Error>> {
        let target = target.into();

        self.with_state(|state| {
            match target {
                LayerTarget::Label(label) => {
                    let Some(overlay) = state.registry.find_layer_mut(label) else {
                        debug!("disable_layer: no layer overlay labelled {}", label);
                        return Err(DeviceError::LabelNotFound);
                    };
                    overlay.disable();
                }
                LayerTarget::All => {
                    for overlay in state.registry.layers_mut() {
                        overlay.disable();
                    }
                }
            }
            state.flush()
        })
    }

    /// Replaces the base frame and pushes the new frame.
    ///
    /// # Errors
    /// * `LengthMismatch` - `pixels` is not `N` long; nothing is submitted
    /// * `Transport` - the strip failed to apply the frame
    pub fn write_base(&self, pixels: &[Rgb8]) -> Result<(), DeviceError<S::Error>> {
        self.with_state(|state| {
            state
                .pixels
                .write_base(pixels)
                .map_err(|actual| DeviceError::LengthMismatch {
                    expected: N,
                    actual,
                })?;
            state.flush()
        })
    }

    /// Renders and submits the current state again without changing it.
    pub fn refresh(&self) -> Result<(), DeviceError<S::Error>> {
        self.with_state(|state| state.flush())
    }

    /// Handles an action by dispatching to the matching operation.
    pub fn handle_action(&self, action: OverlayAction<'_, N>) -> Result<(), DeviceError<S::Error>> {
        match action {
            OverlayAction::SetIndicator { label, color } => self.set_indicator(label, color),
            OverlayAction::DisableIndicator(label) => self.disable_indicator(label),
            OverlayAction::SetLayer { target, layer } => self.set_layer(target, layer),
            OverlayAction::DisableLayer(target) => self.disable_layer(target),
            OverlayAction::WriteBase(pixels) => self.write_base(&pixels),
            OverlayAction::Refresh => self.refresh(),
        }
    }

    /// Returns a copy of the last rendered frame.
    pub fn output(&self) -> [Rgb8; N] {
        self.with_state(|state| *state.pixels.output())
    }

    /// Returns a copy of the base frame.
    pub fn base(&self) -> [Rgb8; N] {
        self.with_state(|state| *state.pixels.base())
    }

    /// Returns the state of the indicator with this label, if any.
    pub fn indicator(&self, label: &str) -> Option<IndicatorState> {
        self.with_state(|state| state.registry.find_indicator(label).map(|o| o.snapshot()))
    }

    /// Returns the state of the layer overlay with this label, if any.
    pub fn layer(&self, label: &str) -> Option<LayerState> {
        self.with_state(|state| state.registry.find_layer(label).map(|o| o.snapshot()))
    }

    /// Gives `f` shared access to the strip, under the lock.
    pub fn inspect_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.with_state(|state| f(&state.sink))
    }

    /// Tears the device down and hands the strip back.
    pub fn into_sink(self) -> S {
        self.state.into_inner().into_inner().sink
    }
}
