#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`PixelStore`**: The base frame the firmware draws and the output frame sent to the strip
//! - **`IndicatorDef` / `LayerDef`**: Static overlay definitions (label, LED indexes, colors)
//! - **`OverlayRegistry`**: Validated, fixed-capacity set of indicator and layer overlays
//! - **`render`**: The priority-ordered render pass (base < indicators < layers)
//! - **`OverlayDevice`**: Lock-protected facade; every mutation renders and submits a frame
//! - **`LedSink`**: Trait to implement for your LED strip hardware
//! - **`RemapSink`**: Strip adapter moving logical pixels to their physical positions
//! - **`LayerChangeAdapter`**: Glue forwarding keymap layer changes to a device
//! - **`OverlayAction`**: Commands that can be sent to a task owning a device
//!
//! Pixels are `Srgb<u8>` ([`Rgb8`]), the format addressable strips consume.

// Must come first so the logging macros are visible to every module.
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

// Raw mutex flavors for `OverlayDevice`
pub use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};

pub mod adapter;
pub mod colors;
pub mod command;
pub mod compositor;
pub mod device;
pub mod frame;
pub mod overlay;
pub mod registry;
pub mod remap;
pub mod types;

pub use adapter::{DisableLayerBehavior, InactiveLayerPolicy, LayerChangeAdapter};
pub use colors::{BLACK, BLUE, CYAN, GREEN, MAGENTA, RED, Rgb8, WHITE, YELLOW};
pub use command::{OverlayAction, OverlayCommand};
pub use compositor::render;
pub use device::{DeviceConfig, DeviceError, LedSink, OverlayDevice};
pub use frame::PixelStore;
pub use overlay::{IndicatorDef, IndicatorState, LayerDef, LayerState};
pub use registry::{OverlayRegistry, RegistryBuilder};
pub use remap::{MapError, RemapSink, RemapSinkError};
pub use types::{
    ConfigError, InitialLayerState, LAYER_SLOTS, LayerColors, LayerSlot, LayerTarget,
    OverlayState,
};

/// Device shared between interrupt/task contexts or threads.
pub type SharedOverlayDevice<S, const N: usize, const I: usize, const L: usize> =
    OverlayDevice<CriticalSectionRawMutex, S, N, I, L>;
