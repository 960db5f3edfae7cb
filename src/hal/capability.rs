//! Device capability table
//!
//! Static knowledge of the supported boards: which timers each one exposes,
//! how fast its clock runs, and which digital pins every timer can drive.
//! The timer-to-pin wiring is the same on every board; only the set of
//! timers that exist changes.

use ufmt::{uDisplay, uWrite, Formatter};

use crate::config::{
    COMPACT_CLOCK_SPEED_HZ, COMPACT_DIGITAL_PINS, EXTENDED_CLOCK_SPEED_HZ, EXTENDED_DIGITAL_PINS,
};

/// Frequency in Hz
pub type Frequency = u32;

/// Board family the firmware runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceVariant {
    /// Uno/Nano class, 16MHz, Timer0-2
    Compact,
    /// Due class, 84MHz, Timer0-4
    Extended,
}

/// Hardware timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    T0,
    T1,
    T2,
    T3,
    T4,
}

/// Output compare channel of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    A,
    B,
    C,
}

/// Counter width of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerResolution {
    Bits8,
    Bits16,
}

/// Digital pin number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(u8);

/// Rejected raw pin number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    Negative(i32),
    TooLarge(i32),
}

const COMPACT_TIMERS: [TimerId; 3] = [TimerId::T0, TimerId::T1, TimerId::T2];
const EXTENDED_TIMERS: [TimerId; 5] = [
    TimerId::T0,
    TimerId::T1,
    TimerId::T2,
    TimerId::T3,
    TimerId::T4,
];

// Channel A, B[, C] of each timer
const TIMER0_PINS: [PinId; 2] = [PinId(4), PinId(13)];
const TIMER1_PINS: [PinId; 2] = [PinId(11), PinId(12)];
const TIMER2_PINS: [PinId; 2] = [PinId(9), PinId(10)];
const TIMER3_PINS: [PinId; 3] = [PinId(2), PinId(3), PinId(5)];
const TIMER4_PINS: [PinId; 3] = [PinId(6), PinId(7), PinId(8)];

impl DeviceVariant {
    pub const ALL: [DeviceVariant; 2] = [DeviceVariant::Compact, DeviceVariant::Extended];

    /// Clock speed of the board in Hz
    pub const fn max_clock_speed(self) -> Frequency {
        match self {
            DeviceVariant::Compact => COMPACT_CLOCK_SPEED_HZ,
            DeviceVariant::Extended => EXTENDED_CLOCK_SPEED_HZ,
        }
    }

    /// Timers physically present on the board
    pub const fn supported_timers(self) -> &'static [TimerId] {
        match self {
            DeviceVariant::Compact => &COMPACT_TIMERS,
            DeviceVariant::Extended => &EXTENDED_TIMERS,
        }
    }

    pub fn supports(self, timer: TimerId) -> bool {
        self.supported_timers().contains(&timer)
    }

    /// Number of digital pins, valid pins are `0..num_digital_pins()`
    pub const fn num_digital_pins(self) -> u8 {
        match self {
            DeviceVariant::Compact => COMPACT_DIGITAL_PINS,
            DeviceVariant::Extended => EXTENDED_DIGITAL_PINS,
        }
    }

    pub fn has_pin(self, pin: PinId) -> bool {
        pin.0 < self.num_digital_pins()
    }

    pub const fn name(self) -> &'static str {
        match self {
            DeviceVariant::Compact => "Compact",
            DeviceVariant::Extended => "Extended",
        }
    }
}

impl TimerId {
    pub const ALL: [TimerId; 5] = EXTENDED_TIMERS;

    /// Pins driven by this timer, channel A first
    pub const fn pins(self) -> &'static [PinId] {
        match self {
            TimerId::T0 => &TIMER0_PINS,
            TimerId::T1 => &TIMER1_PINS,
            TimerId::T2 => &TIMER2_PINS,
            TimerId::T3 => &TIMER3_PINS,
            TimerId::T4 => &TIMER4_PINS,
        }
    }

    /// Channel A pin, used when the caller does not name one
    pub const fn default_pin(self) -> PinId {
        self.pins()[0]
    }

    pub fn drives(self, pin: PinId) -> bool {
        self.pins().contains(&pin)
    }

    /// Which output channel of this timer `pin` is wired to
    pub fn channel_of(self, pin: PinId) -> Option<Channel> {
        match self.pins().iter().position(|&p| p == pin)? {
            0 => Some(Channel::A),
            1 => Some(Channel::B),
            2 => Some(Channel::C),
            _ => None,
        }
    }

    pub const fn resolution(self) -> TimerResolution {
        match self {
            TimerId::T0 | TimerId::T2 => TimerResolution::Bits8,
            TimerId::T1 | TimerId::T3 | TimerId::T4 => TimerResolution::Bits16,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            TimerId::T0 => 0,
            TimerId::T1 => 1,
            TimerId::T2 => 2,
            TimerId::T3 => 3,
            TimerId::T4 => 4,
        }
    }
}

impl TimerResolution {
    /// Number of counter states, `2^bits`
    pub const fn counts(self) -> u32 {
        match self {
            TimerResolution::Bits8 => 1 << 8,
            TimerResolution::Bits16 => 1 << 16,
        }
    }
}

impl PinId {
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl From<u8> for PinId {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

impl TryFrom<i32> for PinId {
    type Error = PinError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        if raw < 0 {
            return Err(PinError::Negative(raw));
        }
        u8::try_from(raw)
            .map(PinId)
            .map_err(|_| PinError::TooLarge(raw))
    }
}

impl uDisplay for PinId {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uDisplay::fmt(&self.0, f)
    }
}

impl uDisplay for DeviceVariant {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

impl uDisplay for TimerId {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str("Timer ")?;
        uDisplay::fmt(&self.number(), f)
    }
}
