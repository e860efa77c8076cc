//! glyphdust runtime - drives a particle text animation
//!
//! Provides the control surface around the particle engine:
//! - `AnimationConfig` / `ConfigFile` - validated run configuration, loadable from TOML
//! - `ResizeDebouncer` - trailing debounce for container size reports
//! - `FrameScheduler` / `FrameLoop` - frame requests and the single animation loop
//! - `Controller` - sizing, rasterization, generation swaps, trigger/reset/teardown
//! - `AnimationEvent` / `EventBus` - notifications drained by the host
//! - `VirtualClock` - fixed-step time source for headless runs

mod clock;
mod config;
mod controller;
mod debounce;
mod event_bus;
mod frame;

pub use clock::VirtualClock;
pub use config::{
    AnimationConfig, AnimationConfigBuilder, AnimationEndCallback, ColorEntry, ConfigFile,
};
pub use controller::{Controller, ControllerOptions, ControllerState};
pub use debounce::{ResizeDebouncer, RESIZE_QUIET_PERIOD};
pub use event_bus::{AnimationEvent, EventBus};
pub use frame::{FrameLoop, FrameRequest, FrameScheduler, IntervalScheduler};
