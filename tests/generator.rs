use std::cell::RefCell;
use std::rc::Rc;

use signal_generator::hal::{Channel, HalPwm, Hertz, PinError, PwmError};
use signal_generator::{
    DeviceVariant, Error, Frequency, Generator, PinId, PwmDriver, RealSignalGenerator, State,
    TimerId,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Program(TimerId, PinId, Frequency),
    Start(TimerId),
    Stop(TimerId),
}

/// Driver double that records every call into a shared log
#[derive(Clone, Default)]
struct Spy {
    log: Rc<RefCell<Vec<Event>>>,
}

impl PwmDriver for Spy {
    type Error = ();

    fn program(&mut self, timer: TimerId, pin: PinId, frequency: Frequency) -> Result<(), ()> {
        self.log.borrow_mut().push(Event::Program(timer, pin, frequency));
        Ok(())
    }

    fn start(&mut self, timer: TimerId) -> Result<(), ()> {
        self.log.borrow_mut().push(Event::Start(timer));
        Ok(())
    }

    fn stop(&mut self, timer: TimerId) -> Result<(), ()> {
        self.log.borrow_mut().push(Event::Stop(timer));
        Ok(())
    }
}

#[test]
fn compact_timer1_accepts_only_its_own_pins() {
    let spy = Spy::default();
    let mut gen = RealSignalGenerator::new(DeviceVariant::Compact, TimerId::T1, spy.clone());
    assert!(gen.is_valid());
    assert!(gen.setup_on(1_000, PinId::new(11)).is_ok());
    assert_eq!(
        gen.setup_on(1_000, PinId::new(9)),
        Err(Error::InvalidPin {
            timer: TimerId::T1,
            pin: PinId::new(9)
        })
    );
    assert_eq!(
        *spy.log.borrow(),
        [Event::Program(TimerId::T1, PinId::new(11), 1_000)]
    );
}

#[test]
fn compact_timer4_is_unusable() {
    let spy = Spy::default();
    let mut gen = RealSignalGenerator::new(DeviceVariant::Compact, TimerId::T4, spy.clone());
    assert!(!gen.is_valid());
    for pin in TimerId::T4.pins() {
        assert!(gen.setup_on(1_000, *pin).is_err());
    }
    assert!(gen.setup(1_000).is_err());
    assert!(gen.run().is_err());
    assert!(gen.stop().is_ok());
    assert!(spy.log.borrow().is_empty());
}

#[test]
fn validity_matches_supported_timers() {
    for variant in DeviceVariant::ALL {
        for timer in TimerId::ALL {
            let gen = RealSignalGenerator::new(variant, timer, Spy::default());
            assert_eq!(gen.is_valid(), variant.supported_timers().contains(&timer));
            assert_eq!(gen.variant(), variant);
            assert_eq!(gen.timer(), timer);
            assert_eq!(gen.max_clock_speed(), variant.max_clock_speed());
        }
    }
}

#[test]
fn pin_matching_agrees_with_pin_table() {
    for timer in TimerId::ALL {
        let gen = RealSignalGenerator::new(DeviceVariant::Extended, timer, Spy::default());
        for number in 0..=u8::MAX {
            let pin = PinId::new(number);
            assert_eq!(gen.pin_matches_timer(pin), timer.pins().contains(&pin));
        }
    }
}

#[test]
fn raw_pins_are_never_wrapped() {
    assert_eq!(PinId::try_from(-1i32), Err(PinError::Negative(-1)));
    assert_eq!(PinId::try_from(-245i32), Err(PinError::Negative(-245)));
    assert_eq!(PinId::try_from(267i32), Err(PinError::TooLarge(267)));

    let mut gen = RealSignalGenerator::new(DeviceVariant::Compact, TimerId::T1, Spy::default());
    assert_eq!(
        gen.setup_on(1_000, PinId::new(54)),
        Err(Error::PinOutOfRange(PinId::new(54)))
    );
}

#[test]
fn stop_run_stop_keeps_configuration() {
    let spy = Spy::default();
    let mut gen = RealSignalGenerator::new(DeviceVariant::Extended, TimerId::T3, spy.clone());
    gen.stop().unwrap();
    gen.setup_on(10_000, PinId::new(3)).unwrap();
    gen.run().unwrap();
    gen.stop().unwrap();
    gen.stop().unwrap();
    assert_eq!(gen.state(), State::Armed);
    assert_eq!(gen.pin(), Some(PinId::new(3)));
    assert_eq!(
        *spy.log.borrow(),
        [
            Event::Program(TimerId::T3, PinId::new(3), 10_000),
            Event::Start(TimerId::T3),
            Event::Stop(TimerId::T3),
        ]
    );
}

#[derive(Default)]
struct Timer1 {
    period: Option<Hertz>,
    duty: [u16; 3],
    enabled: [bool; 3],
}

impl embedded_hal::Pwm for Timer1 {
    type Channel = usize;
    type Time = Hertz;
    type Duty = u16;

    fn disable(&mut self, channel: usize) {
        self.enabled[channel] = false;
    }

    fn enable(&mut self, channel: usize) {
        self.enabled[channel] = true;
    }

    fn get_period(&self) -> Hertz {
        self.period.unwrap_or(Hertz(0))
    }

    fn get_duty(&self, channel: usize) -> u16 {
        self.duty[channel]
    }

    fn get_max_duty(&self) -> u16 {
        u16::MAX
    }

    fn set_duty(&mut self, channel: usize, duty: u16) {
        self.duty[channel] = duty;
    }

    fn set_period<P>(&mut self, period: P)
    where
        P: Into<Hertz>,
    {
        self.period = Some(period.into());
    }
}

fn timer1_channel(channel: Channel) -> usize {
    match channel {
        Channel::A => 0,
        Channel::B => 1,
        Channel::C => 2,
    }
}

fn uno_timer1() -> RealSignalGenerator<HalPwm<Timer1>> {
    let pwm = HalPwm::new(
        DeviceVariant::Compact,
        TimerId::T1,
        Timer1::default(),
        timer1_channel,
    );
    RealSignalGenerator::new(DeviceVariant::Compact, TimerId::T1, pwm)
}

#[test]
fn embedded_hal_pwm_square_wave() {
    let mut gen = uno_timer1();
    gen.setup_on(440, PinId::new(12)).unwrap();
    gen.run().unwrap();

    let plan = gen.driver().plan().unwrap();
    assert_eq!(plan.actual_frequency(gen.max_clock_speed()), 440);

    let hw = gen.release().release();
    assert_eq!(hw.period, Some(Hertz(440)));
    assert_eq!(hw.duty, [0, u16::MAX / 2, 0]);
    assert_eq!(hw.enabled, [false, true, false]);
}

#[test]
fn timer1_fake_maps_every_channel() {
    let mut hw = Timer1::default();
    for channel in [Channel::A, Channel::B, Channel::C] {
        embedded_hal::Pwm::enable(&mut hw, timer1_channel(channel));
    }
    assert_eq!(hw.enabled, [true; 3]);
}

#[test]
fn frequency_ceiling_is_enforced_by_the_driver() {
    let mut gen = uno_timer1();
    assert_eq!(
        gen.setup(9_000_000),
        Err(Error::Driver(PwmError::FrequencyOutOfRange(9_000_000)))
    );
    assert_eq!(gen.state(), State::Unconfigured);
    assert!(gen.setup(8_000_000).is_ok());
}
