//! PWM (Pulse Width Modulation) driver seam
//!
//! Generators never touch timer registers. They hand a validated
//! timer/pin/frequency triple to a [`PwmDriver`], which owns the hardware.
//! [`HalPwm`] implements the driver on top of any `embedded_hal::Pwm`
//! peripheral, one timer per instance.

use core::ops::Div;

use crate::hal::capability::{Channel, DeviceVariant, Frequency, PinId, TimerId};
use crate::hal::timer::TimerPlan;
use crate::logger::{debug, warn};

/// Hardware side of a signal generator
pub trait PwmDriver {
    type Error: core::fmt::Debug;

    /// Program `timer` to emit `frequency` on `pin`, output stays off
    fn program(&mut self, timer: TimerId, pin: PinId, frequency: Frequency)
        -> Result<(), Self::Error>;

    /// Turn the programmed output on
    fn start(&mut self, timer: TimerId) -> Result<(), Self::Error>;

    /// Turn the output off, keeping the programmed period
    fn stop(&mut self, timer: TimerId) -> Result<(), Self::Error>;
}

impl<D: PwmDriver + ?Sized> PwmDriver for &mut D {
    type Error = D::Error;

    fn program(
        &mut self,
        timer: TimerId,
        pin: PinId,
        frequency: Frequency,
    ) -> Result<(), Self::Error> {
        (**self).program(timer, pin, frequency)
    }

    fn start(&mut self, timer: TimerId) -> Result<(), Self::Error> {
        (**self).start(timer)
    }

    fn stop(&mut self, timer: TimerId) -> Result<(), Self::Error> {
        (**self).stop(timer)
    }
}

/// Frequency handed to `embedded_hal::Pwm::set_period`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hertz(pub Frequency);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Driver is bound to another timer
    TimerMismatch { expected: TimerId, got: TimerId },
    /// Pin is not an output of the timer
    UnwiredPin(PinId),
    /// Timer cannot produce the frequency at this clock speed
    FrequencyOutOfRange(Frequency),
    /// `start` before a successful `program`
    NotProgrammed,
}

/// [`PwmDriver`] over an `embedded_hal::Pwm` peripheral
pub struct HalPwm<P: embedded_hal::Pwm> {
    pwm: P,
    variant: DeviceVariant,
    timer: TimerId,
    channel_map: fn(Channel) -> P::Channel,
    programmed: Option<(P::Channel, TimerPlan)>,
    enabled: bool,
}

impl<P> HalPwm<P>
where
    P: embedded_hal::Pwm,
    P::Channel: Copy,
    P::Duty: Div<Output = P::Duty> + From<u8>,
    Hertz: Into<P::Time>,
{
    /// Bind `pwm` to `timer` on `variant`.
    ///
    /// `channel_map` translates channel A/B/C into the peripheral's own
    /// channel identifiers.
    pub fn new(
        variant: DeviceVariant,
        timer: TimerId,
        pwm: P,
        channel_map: fn(Channel) -> P::Channel,
    ) -> Self {
        Self {
            pwm,
            variant,
            timer,
            channel_map,
            programmed: None,
            enabled: false,
        }
    }

    pub fn timer(&self) -> TimerId {
        self.timer
    }

    /// Plan of the last successful `program`
    pub fn plan(&self) -> Option<TimerPlan> {
        self.programmed.map(|(_, plan)| plan)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Give the peripheral back
    pub fn release(self) -> P {
        self.pwm
    }

    fn check_timer(&self, timer: TimerId) -> Result<(), PwmError> {
        if timer != self.timer {
            return Err(PwmError::TimerMismatch {
                expected: self.timer,
                got: timer,
            });
        }
        Ok(())
    }
}

impl<P> PwmDriver for HalPwm<P>
where
    P: embedded_hal::Pwm,
    P::Channel: Copy,
    P::Duty: Div<Output = P::Duty> + From<u8>,
    Hertz: Into<P::Time>,
{
    type Error = PwmError;

    fn program(
        &mut self,
        timer: TimerId,
        pin: PinId,
        frequency: Frequency,
    ) -> Result<(), PwmError> {
        self.check_timer(timer)?;
        let channel = timer.channel_of(pin).ok_or(PwmError::UnwiredPin(pin))?;
        let plan = TimerPlan::for_frequency(
            self.variant.max_clock_speed(),
            timer.resolution(),
            frequency,
        )
        .ok_or_else(|| {
            warn!("pwm: {} Hz out of range for timer {}", frequency, timer.number());
            PwmError::FrequencyOutOfRange(frequency)
        })?;

        // Reprogramming a live output: silence the old channel first
        if let Some((old, _)) = self.programmed.take() {
            if self.enabled {
                self.pwm.disable(old);
                self.enabled = false;
            }
        }

        let channel = (self.channel_map)(channel);
        self.pwm.set_period(Hertz(frequency));
        let half = self.pwm.get_max_duty() / <P::Duty as From<u8>>::from(2);
        self.pwm.set_duty(channel, half);
        self.programmed = Some((channel, plan));

        debug!(
            "pwm: timer {} prescaler {} top {}",
            timer.number(),
            plan.prescaler.divisor(),
            plan.top
        );
        Ok(())
    }

    fn start(&mut self, timer: TimerId) -> Result<(), PwmError> {
        self.check_timer(timer)?;
        let (channel, _) = self.programmed.ok_or(PwmError::NotProgrammed)?;
        self.pwm.enable(channel);
        self.enabled = true;
        Ok(())
    }

    fn stop(&mut self, timer: TimerId) -> Result<(), PwmError> {
        self.check_timer(timer)?;
        if let Some((channel, _)) = self.programmed {
            if self.enabled {
                self.pwm.disable(channel);
                self.enabled = false;
            }
        }
        Ok(())
    }
}
