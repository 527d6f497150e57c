//! Indicator and layer overlays.
//!
//! A definition ([`IndicatorDef`], [`LayerDef`]) is the static part coming
//! from the keyboard configuration. An overlay ([`IndicatorOverlay`],
//! [`LayerOverlay`]) pairs a definition with the mutable state the device
//! updates at runtime.

use crate::colors::{BLACK, Rgb8};
use crate::types::{LayerColors, LayerSlot, OverlayState};

/// Static definition of a single-color indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorDef {
    /// Unique label, e.g. `"CAPS_LOCK"`.
    pub label: &'static str,
    /// Frame indexes lit by this indicator.
    pub led_indexes: &'static [usize],
}

impl IndicatorDef {
    pub const fn new(label: &'static str, led_indexes: &'static [usize]) -> Self {
        Self { label, led_indexes }
    }
}

/// Static definition of a layer overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDef {
    /// Unique label, e.g. `"LAYER_INDICATOR"`.
    pub label: &'static str,
    /// Frame indexes lit by this overlay.
    pub led_indexes: &'static [usize],
    /// Color shown for each layer slot.
    pub colors: LayerColors,
}

impl LayerDef {
    pub const fn new(
        label: &'static str,
        led_indexes: &'static [usize],
        colors: LayerColors,
    ) -> Self {
        Self {
            label,
            led_indexes,
            colors,
        }
    }
}

/// Snapshot of an indicator's runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorState {
    pub label: &'static str,
    pub state: OverlayState<Rgb8>,
}

#[cfg(feature = "defmt")]
impl defmt::Format for IndicatorState {
    fn format(&self, f: defmt::Formatter) {
        match self.state {
            OverlayState::Disabled => defmt::write!(f, "{=str}: off", self.label),
            OverlayState::Enabled(color) => {
                defmt::write!(f, "{=str}: {=u32:#x}", self.label, crate::colors::to_u32(color))
            }
        }
    }
}

/// Snapshot of a layer overlay's runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerState {
    pub label: &'static str,
    pub active: bool,
    pub current_layer: LayerSlot,
}

impl LayerState {
    /// The overlay as a two-state machine.
    pub fn state(&self) -> OverlayState<LayerSlot> {
        if self.active {
            OverlayState::Enabled(self.current_layer)
        } else {
            OverlayState::Disabled
        }
    }
}

/// A named group of LEDs shown in one color while active.
#[derive(Debug, Clone)]
pub struct IndicatorOverlay {
    def: IndicatorDef,
    active: bool,
    color: Rgb8,
}

impl IndicatorOverlay {
    /// Creates a disabled indicator. Indexes are validated by the registry.
    pub(crate) fn new(def: IndicatorDef) -> Self {
        Self {
            def,
            active: false,
            color: BLACK,
        }
    }

    pub fn label(&self) -> &'static str {
        self.def.label
    }

    pub fn led_indexes(&self) -> &'static [usize] {
        self.def.led_indexes
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> Rgb8 {
        self.color
    }

    pub(crate) fn enable(&mut self, color: Rgb8) {
        self.active = true;
        self.color = color;
    }

    /// Turns the indicator off. The last color is kept but no longer drawn.
    pub(crate) fn disable(&mut self) {
        self.active = false;
    }

    pub fn snapshot(&self) -> IndicatorState {
        IndicatorState {
            label: self.def.label,
            state: if self.active {
                OverlayState::Enabled(self.color)
            } else {
                OverlayState::Disabled
            },
        }
    }
}

/// A named group of LEDs whose color follows the active keyboard layer.
#[derive(Debug, Clone)]
pub struct LayerOverlay {
    def: LayerDef,
    active: bool,
    current_layer: LayerSlot,
}

impl LayerOverlay {
    pub(crate) fn new(def: LayerDef, active: bool) -> Self {
        Self {
            def,
            active,
            current_layer: LayerSlot::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.def.label
    }

    pub fn led_indexes(&self) -> &'static [usize] {
        self.def.led_indexes
    }

    pub fn colors(&self) -> &LayerColors {
        &self.def.colors
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn current_layer(&self) -> LayerSlot {
        self.current_layer
    }

    /// Color for the current slot.
    #[inline]
    pub fn color(&self) -> Rgb8 {
        self.def.colors[self.current_layer.index()]
    }

    pub(crate) fn enable(&mut self, slot: LayerSlot) {
        self.active = true;
        self.current_layer = slot;
    }

    pub(crate) fn disable(&mut self) {
        self.active = false;
    }

    pub fn snapshot(&self) -> LayerState {
        LayerState {
            label: self.def.label,
            active: self.active,
            current_layer: self.current_layer,
        }
    }
}
