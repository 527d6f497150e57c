//! Validated, fixed-capacity set of overlays.

use crate::overlay::{IndicatorDef, IndicatorOverlay, LayerDef, LayerOverlay};
use crate::types::{ConfigError, InitialLayerState};
use heapless::Vec;

/// The indicator and layer overlays of one device, in configuration order.
///
/// Order matters: the compositor draws overlays front to back, so a later
/// indicator wins over an earlier one on a shared LED.
///
/// # Type Parameters
/// * `I` - Maximum number of indicator overlays
/// * `L` - Maximum number of layer overlays
#[derive(Debug, Clone)]
pub struct OverlayRegistry<const I: usize, const L: usize> {
    indicators: Vec<IndicatorOverlay, I>,
    layers: Vec<LayerOverlay, L>,
    frame_len: usize,
}

impl<const I: usize, const L: usize> OverlayRegistry<I, L> {
    /// Creates a new registry builder validating against `frame_len` LEDs.
    pub fn builder(frame_len: usize, initial: InitialLayerState) -> RegistryBuilder<I, L> {
        RegistryBuilder::new(frame_len, initial)
    }

    /// Builds a registry from embedded definition tables.
    pub fn from_defs(
        frame_len: usize,
        indicators: &[IndicatorDef],
        layers: &[LayerDef],
        initial: InitialLayerState,
    ) -> Result<Self, ConfigError> {
        let mut builder = RegistryBuilder::new(frame_len, initial);
        for def in indicators {
            builder = builder.indicator(*def)?;
        }
        for def in layers {
            builder = builder.layer(*def)?;
        }
        Ok(builder.build())
    }

    /// Length of the frame the registry is currently bound to.
    ///
    /// Starts as the builder's length and follows the device frame once a
    /// device adopts the registry.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Rebinds the registry to a frame of `frame_len` LEDs.
    ///
    /// Every index is checked first; on failure the registry is unchanged.
    pub(crate) fn fit_frame(&mut self, frame_len: usize) -> Result<(), ConfigError> {
        for indicator in &self.indicators {
            check_indexes(indicator.label(), indicator.led_indexes(), frame_len)?;
        }
        for layer in &self.layers {
            check_indexes(layer.label(), layer.led_indexes(), frame_len)?;
        }
        self.frame_len = frame_len;
        Ok(())
    }

    pub fn indicators(&self) -> &[IndicatorOverlay] {
        &self.indicators
    }

    pub fn layers(&self) -> &[LayerOverlay] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [LayerOverlay] {
        &mut self.layers
    }

    pub fn find_indicator(&self, label: &str) -> Option<&IndicatorOverlay> {
        self.indicators.iter().find(|o| o.label() == label)
    }

    pub fn find_layer(&self, label: &str) -> Option<&LayerOverlay> {
        self.layers.iter().find(|o| o.label() == label)
    }

    pub(crate) fn find_indicator_mut(&mut self, label: &str) -> Option<&mut IndicatorOverlay> {
        self.indicators.iter_mut().find(|o| o.label() == label)
    }

    pub(crate) fn find_layer_mut(&mut self, label: &str) -> Option<&mut LayerOverlay> {
        self.layers.iter_mut().find(|o| o.label() == label)
    }
}

/// Builder for constructing a validated [`OverlayRegistry`].
#[derive(Debug)]
pub struct RegistryBuilder<const I: usize, const L: usize> {
    indicators: Vec<IndicatorOverlay, I>,
    layers: Vec<LayerOverlay, L>,
    frame_len: usize,
    initial: InitialLayerState,
}

impl<const I: usize, const L: usize> RegistryBuilder<I, L> {
    pub fn new(frame_len: usize, initial: InitialLayerState) -> Self {
        Self {
            indicators: Vec::new(),
            layers: Vec::new(),
            frame_len,
            initial,
        }
    }

    /// Adds an indicator overlay.
    ///
    /// # Errors
    /// * `IndexOutOfRange` - an LED index is not inside the frame
    /// * `DuplicateLabel` - another indicator already uses this label
    /// * `CapacityExceeded` - the registry already holds `I` indicators
    pub fn indicator(mut self, def: IndicatorDef) -> Result<Self, ConfigError> {
        check_indexes(def.label, def.led_indexes, self.frame_len)?;

        if self.indicators.iter().any(|o| o.label() == def.label) {
            warn!("duplicate indicator label {}", def.label);
            return Err(ConfigError::DuplicateLabel(def.label));
        }

        self.indicators
            .push(IndicatorOverlay::new(def))
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    /// Adds a layer overlay, enabled or not according to the builder's
    /// initial layer state.
    ///
    /// # Errors
    /// Same as [`RegistryBuilder::indicator`], checked among layer overlays.
    pub fn layer(mut self, def: LayerDef) -> Result<Self, ConfigError> {
        check_indexes(def.label, def.led_indexes, self.frame_len)?;

        if self.layers.iter().any(|o| o.label() == def.label) {
            warn!("duplicate layer label {}", def.label);
            return Err(ConfigError::DuplicateLabel(def.label));
        }

        self.layers
            .push(LayerOverlay::new(def, self.initial.is_active()))
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    pub fn build(self) -> OverlayRegistry<I, L> {
        debug!(
            "overlay registry: {} indicators, {} layers over {} LEDs",
            self.indicators.len(),
            self.layers.len(),
            self.frame_len
        );
        OverlayRegistry {
            indicators: self.indicators,
            layers: self.layers,
            frame_len: self.frame_len,
        }
    }
}

fn check_indexes(
    label: &'static str,
    led_indexes: &[usize],
    frame_len: usize,
) -> Result<(), ConfigError> {
    match led_indexes.iter().find(|&&index| index >= frame_len) {
        Some(&index) => {
            warn!(
                "overlay {}: LED index {} overflows frame ({})",
                label, index, frame_len
            );
            Err(ConfigError::IndexOutOfRange {
                label,
                index,
                frame_len,
            })
        }
        None => Ok(()),
    }
}
