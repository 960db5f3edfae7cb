//! Generator error taxonomy

use crate::hal::{DeviceVariant, PinId, TimerId};

/// Why a generator operation was refused
///
/// `E` is the error type of the [`PwmDriver`](crate::hal::PwmDriver) behind
/// the generator. Driver failures are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The board has no such timer
    InvalidCapability {
        variant: DeviceVariant,
        timer: TimerId,
    },
    /// Pin number is past the board's last digital pin
    PinOutOfRange(PinId),
    /// Pin is not wired to the selected timer
    InvalidPin { timer: TimerId, pin: PinId },
    /// A complex signal was set up without its imaginary pin
    MissingImaginaryPin,
    /// `run` before a successful `setup`
    NotConfigured,
    /// `setup` while the signal is running
    Busy,
    /// The PWM driver failed
    Driver(E),
}
