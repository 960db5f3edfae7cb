//! Square-wave signal generation on hardware timer PWM outputs
//!
//! Pick a board and a timer, then set the generator up with a frequency and
//! (optionally) one of the timer's output pins:
//!
//! ```ignore
//! use signal_generator::{DeviceVariant, Generator, PinId, RealSignalGenerator, TimerId};
//!
//! let mut gen = RealSignalGenerator::new(DeviceVariant::Compact, TimerId::T1, pwm_driver);
//! gen.setup_on(1_000, PinId::new(11))?;
//! gen.run()?;
//! ```
//!
//! Register access lives behind [`hal::PwmDriver`]; this crate only decides
//! whether a timer, pin and frequency make sense together.
#![cfg_attr(not(test), no_std)]

mod logger;

pub mod config;
pub mod drivers;
pub mod error;
pub mod generator;
pub mod hal;
pub mod testing;

pub use error::Error;
pub use generator::{
    Generator, RealSignalGenerator, SignalConfig, SignalGenerator, SignalKind, SignalPins, State,
};
pub use hal::{DeviceVariant, Frequency, PinId, PwmDriver, TimerId};
