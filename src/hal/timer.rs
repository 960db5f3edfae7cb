//! Timer programming plans
//!
//! A square wave is produced by toggling the output pin on every compare
//! match, so one period spans two full counts:
//! `f = clock / (2 * prescaler * (top + 1))`.

use core::ops::RangeInclusive;

use crate::hal::capability::{DeviceVariant, Frequency, TimerId, TimerResolution};

/// Clock select, discriminants are the CSn2:0 bit patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    pub const ALL: [Prescaler; 5] = [
        Prescaler::Direct,
        Prescaler::Div8,
        Prescaler::Div64,
        Prescaler::Div256,
        Prescaler::Div1024,
    ];

    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Prescaler and compare value producing a given frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerPlan {
    pub prescaler: Prescaler,
    pub top: u32,
}

impl TimerPlan {
    /// Pick the smallest prescaler whose compare value fits the counter.
    ///
    /// Returns `None` when `frequency` is zero or outside the range the
    /// timer can produce at `clock`.
    pub fn for_frequency(
        clock: Frequency,
        resolution: TimerResolution,
        frequency: Frequency,
    ) -> Option<Self> {
        if frequency == 0 {
            return None;
        }

        for prescaler in Prescaler::ALL {
            let divisor = 2 * prescaler.divisor() as u64 * frequency as u64;
            let counts = clock as u64 / divisor;
            if counts == 0 {
                // Higher prescalers only make it slower
                return None;
            }
            if counts <= resolution.counts() as u64 {
                return Some(Self {
                    prescaler,
                    top: (counts - 1) as u32,
                });
            }
        }

        None
    }

    /// Frequency the plan really produces, integer division truncates
    pub fn actual_frequency(&self, clock: Frequency) -> Frequency {
        clock / (2 * self.prescaler.divisor() * (self.top + 1))
    }
}

/// Frequencies a timer on this board can produce
pub fn frequency_range(variant: DeviceVariant, timer: TimerId) -> RangeInclusive<Frequency> {
    let clock = variant.max_clock_speed() as u64;
    let slowest = 2 * Prescaler::Div1024.divisor() as u64 * timer.resolution().counts() as u64;
    let min = (clock + slowest - 1) / slowest;
    let max = clock / 2;
    (min as Frequency)..=(max as Frequency)
}
