//! Square-wave signal generators
//!
//! [`SignalGenerator`] carries what every generator shares: the board, the
//! timer, whether the pair is usable, and the lifecycle state. Concrete
//! generators wrap it and implement [`Generator`] for setup/run/stop.
//!
//! Nothing stops two generators from being built on the same timer. Only one
//! of them may be armed at a time; that is up to the caller.

pub mod real;

pub use real::RealSignalGenerator;

use core::ops::RangeInclusive;

use ufmt::{uWrite, uwrite};

use crate::config::{BANNER, DEFAULT_FREQUENCY_HZ};
use crate::error::Error;
use crate::hal::{frequency_range, DeviceVariant, Frequency, PinId, TimerId};
use crate::logger::{debug, warn};

/// Real (one pin) or complex (real + imaginary pin) signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalKind {
    Real,
    Complex,
}

/// Lifecycle of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Nothing programmed yet
    Unconfigured,
    /// Timer programmed, output off
    Armed,
    /// Output on
    Running,
}

/// Output pins of a signal, validated against the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalPins {
    pub real: PinId,
    pub imaginary: Option<PinId>,
}

impl SignalPins {
    /// Check that every pin the signal needs exists on `variant`.
    ///
    /// A complex signal needs both pins and both must be in range. A real
    /// signal ignores `imaginary`.
    pub fn validate<E>(
        variant: DeviceVariant,
        kind: SignalKind,
        real: PinId,
        imaginary: Option<PinId>,
    ) -> Result<Self, Error<E>> {
        if !variant.has_pin(real) {
            warn!("invalid real pin {}", real.number());
            return Err(Error::PinOutOfRange(real));
        }

        let imaginary = match kind {
            SignalKind::Real => None,
            SignalKind::Complex => {
                let pin = imaginary.ok_or(Error::MissingImaginaryPin)?;
                if !variant.has_pin(pin) {
                    warn!("invalid imaginary pin {}", pin.number());
                    return Err(Error::PinOutOfRange(pin));
                }
                Some(pin)
            }
        };

        Ok(Self { real, imaginary })
    }
}

/// Frequency and pin to set a generator up with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalConfig {
    pub frequency: Frequency,
    /// `None` picks channel A of the timer
    pub pin: Option<PinId>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY_HZ,
            pin: None,
        }
    }
}

/// State shared by every generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalGenerator {
    variant: DeviceVariant,
    timer: TimerId,
    kind: SignalKind,
    valid: bool,
    state: State,
    pins: Option<SignalPins>,
    frequency: Option<Frequency>,
}

impl SignalGenerator {
    /// Create a generator on `timer`.
    ///
    /// Never fails. A timer the board lacks yields a generator with
    /// `is_valid() == false` that refuses to set up or run.
    pub fn new(variant: DeviceVariant, timer: TimerId, kind: SignalKind) -> Self {
        let valid = variant.supports(timer);
        if !valid {
            warn!(
                "timer {} not available on {}",
                timer.number(),
                variant.name()
            );
        }

        Self {
            variant,
            timer,
            kind,
            valid,
            state: State::Unconfigured,
            pins: None,
            frequency: None,
        }
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    pub fn timer(&self) -> TimerId {
        self.timer
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Pins of the last successful setup
    pub fn pins(&self) -> Option<SignalPins> {
        self.pins
    }

    /// Frequency of the last successful setup
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Clock speed of the board in Hz
    pub fn max_clock_speed(&self) -> Frequency {
        self.variant.max_clock_speed()
    }

    /// Frequencies the selected timer can produce on this board
    pub fn frequency_range(&self) -> RangeInclusive<Frequency> {
        frequency_range(self.variant, self.timer)
    }

    /// True iff `pin` is one of the selected timer's outputs
    pub fn pin_matches_timer(&self, pin: PinId) -> bool {
        self.timer.drives(pin)
    }

    /// Write a human readable summary to `out`
    pub fn report<W>(&self, out: &mut W) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for line in BANNER {
            out.write_str(line)?;
            out.write_str("\r\n")?;
        }

        uwrite!(
            out,
            "Device: {} ({} Hz)\r\n",
            self.variant,
            self.max_clock_speed()
        )?;

        out.write_str("Signal Type: ")?;
        out.write_str(match self.kind {
            SignalKind::Real => "Real\r\n",
            SignalKind::Complex => "Complex\r\n",
        })?;

        uwrite!(out, "Timer Used: {}", self.timer)?;
        match self.pins {
            Some(SignalPins {
                real,
                imaginary: Some(imaginary),
            }) => uwrite!(
                out,
                " (Real Pin = {}; Imaginary Pin = {})",
                real,
                imaginary
            )?,
            Some(SignalPins { real, .. }) => uwrite!(out, " (Real Pin = {})", real)?,
            None => {}
        }
        out.write_str("\r\n")?;

        if !self.valid {
            out.write_str("Status: INVALID TIMER FOR DEVICE\r\n")?;
        }
        Ok(())
    }

    pub(crate) fn invalid_capability<E>(&self) -> Error<E> {
        Error::InvalidCapability {
            variant: self.variant,
            timer: self.timer,
        }
    }

    pub(crate) fn arm(&mut self, pins: SignalPins, frequency: Frequency) {
        self.pins = Some(pins);
        self.frequency = Some(frequency);
        self.set_state(State::Armed);
    }

    pub(crate) fn reset(&mut self) {
        self.pins = None;
        self.frequency = None;
        self.set_state(State::Unconfigured);
    }

    pub(crate) fn set_state(&mut self, state: State) {
        if state != self.state {
            debug!("timer {}: {} -> {}", self.timer.number(), self.state, state);
            self.state = state;
        }
    }
}

/// Start/stop lifecycle every generator supports
pub trait Generator {
    type Error;

    fn base(&self) -> &SignalGenerator;

    /// Program the timer for `frequency` on the default pin(s)
    fn setup(&mut self, frequency: Frequency) -> Result<(), Self::Error>;

    /// Turn the programmed signal on
    fn run(&mut self) -> Result<(), Self::Error>;

    /// Turn the signal off. Safe to call in any state.
    fn stop(&mut self) -> Result<(), Self::Error>;

    fn variant(&self) -> DeviceVariant {
        self.base().variant()
    }

    fn timer(&self) -> TimerId {
        self.base().timer()
    }

    fn is_valid(&self) -> bool {
        self.base().is_valid()
    }

    fn state(&self) -> State {
        self.base().state()
    }

    fn max_clock_speed(&self) -> Frequency {
        self.base().max_clock_speed()
    }

    fn report<W>(&self, out: &mut W) -> Result<(), W::Error>
    where
        Self: Sized,
        W: uWrite + ?Sized,
    {
        self.base().report(out)
    }
}
