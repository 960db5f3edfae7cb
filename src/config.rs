//! Configuration constants for the signal generator

use crate::hal::Frequency;

/// CPU frequency of the compact boards (Uno/Nano) in Hz
pub const COMPACT_CLOCK_SPEED_HZ: Frequency = 16_000_000;

/// CPU frequency of the extended boards (Due) in Hz
pub const EXTENDED_CLOCK_SPEED_HZ: Frequency = 84_000_000;

/// Number of digital pins on the compact boards
pub const COMPACT_DIGITAL_PINS: u8 = 20;

/// Number of digital pins on the extended boards
pub const EXTENDED_DIGITAL_PINS: u8 = 54;

/// Frequency used when the caller does not pick one
pub const DEFAULT_FREQUENCY_HZ: Frequency = 1_000;

/// Status report banner
pub const BANNER: [&str; 3] = [
    "---------------------",
    "Signal Generator v1.0",
    "---------------------",
];
