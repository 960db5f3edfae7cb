pub mod capability;
pub mod pwm;
pub mod timer;

// Re-export commonly used types
pub use capability::{
    Channel, DeviceVariant, Frequency, PinError, PinId, TimerId, TimerResolution,
};
pub use pwm::{HalPwm, Hertz, PwmDriver, PwmError};
pub use timer::{frequency_range, Prescaler, TimerPlan};
