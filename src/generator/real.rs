//! Single channel square-wave generator

use crate::error::Error;
use crate::generator::{Generator, SignalConfig, SignalGenerator, SignalKind, SignalPins, State};
use crate::hal::{DeviceVariant, Frequency, PinId, PwmDriver, TimerId};
use crate::logger::{error, info, warn};

/// Square wave on one output pin of one timer
pub struct RealSignalGenerator<D> {
    base: SignalGenerator,
    driver: D,
}

impl<D: PwmDriver> RealSignalGenerator<D> {
    /// Create a generator on `timer`, programming it through `driver`.
    ///
    /// An unsupported variant/timer pair still yields a generator; check
    /// [`Generator::is_valid`].
    pub fn new(variant: DeviceVariant, timer: TimerId, driver: D) -> Self {
        Self {
            base: SignalGenerator::new(variant, timer, SignalKind::Real),
            driver,
        }
    }

    /// Program the timer for `frequency` on `pin`.
    ///
    /// `pin` must be one of the timer's outputs. The frequency is passed to
    /// the driver unchanged; the driver decides whether the timer can
    /// produce it. Nothing reaches the driver if a pin check fails.
    pub fn setup_on(&mut self, frequency: Frequency, pin: PinId) -> Result<(), Error<D::Error>> {
        let timer = self.base.timer();

        if !self.base.is_valid() {
            warn!("setup refused: timer {} not on this device", timer.number());
            return Err(self.base.invalid_capability());
        }
        if self.base.state() == State::Running {
            return Err(Error::Busy);
        }

        let pins = SignalPins::validate(self.base.variant(), SignalKind::Real, pin, None)?;
        if !self.pin_matches_timer(pin) {
            warn!(
                "setup refused: pin {} not wired to timer {}",
                pin.number(),
                timer.number()
            );
            return Err(Error::InvalidPin { timer, pin });
        }

        if let Err(err) = self.driver.program(timer, pin, frequency) {
            error!("timer {}: driver failed to program", timer.number());
            self.base.reset();
            return Err(Error::Driver(err));
        }

        self.base.arm(pins, frequency);
        info!(
            "timer {} armed at {} Hz on pin {}",
            timer.number(),
            frequency,
            pin.number()
        );
        Ok(())
    }

    /// Set up from a [`SignalConfig`], falling back to channel A
    pub fn configure(&mut self, config: SignalConfig) -> Result<(), Error<D::Error>> {
        let pin = config.pin.unwrap_or(self.base.timer().default_pin());
        self.setup_on(config.frequency, pin)
    }

    /// True iff `pin` is one of the selected timer's outputs
    pub fn pin_matches_timer(&self, pin: PinId) -> bool {
        self.base.pin_matches_timer(pin)
    }

    /// Pin of the last successful setup
    pub fn pin(&self) -> Option<PinId> {
        self.base.pins().map(|pins| pins.real)
    }

    /// Frequency of the last successful setup
    pub fn frequency(&self) -> Option<Frequency> {
        self.base.frequency()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the driver back
    pub fn release(self) -> D {
        self.driver
    }
}

impl<D: PwmDriver> Generator for RealSignalGenerator<D> {
    type Error = Error<D::Error>;

    fn base(&self) -> &SignalGenerator {
        &self.base
    }

    /// Program the timer for `frequency` on its channel A pin
    fn setup(&mut self, frequency: Frequency) -> Result<(), Self::Error> {
        let pin = self.base.timer().default_pin();
        self.setup_on(frequency, pin)
    }

    fn run(&mut self) -> Result<(), Self::Error> {
        if !self.base.is_valid() {
            return Err(self.base.invalid_capability());
        }

        match self.base.state() {
            State::Unconfigured => Err(Error::NotConfigured),
            State::Running => Ok(()),
            State::Armed => {
                let timer = self.base.timer();
                self.driver.start(timer).map_err(|err| {
                    error!("timer {}: driver failed to start", timer.number());
                    Error::Driver(err)
                })?;
                self.base.set_state(State::Running);
                Ok(())
            }
        }
    }

    /// Stop the output, keeping pin and frequency so `run` can resume
    fn stop(&mut self) -> Result<(), Self::Error> {
        if self.base.state() != State::Running {
            return Ok(());
        }

        let timer = self.base.timer();
        self.driver.stop(timer).map_err(|err| {
            error!("timer {}: driver failed to stop", timer.number());
            Error::Driver(err)
        })?;
        self.base.set_state(State::Armed);
        Ok(())
    }
}
