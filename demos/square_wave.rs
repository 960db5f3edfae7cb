//! Walks a generator through its lifecycle against a driver that only
//! prints what it would program.

use signal_generator::hal::{frequency_range, TimerPlan};
use signal_generator::testing::run_self_tests;
use signal_generator::{
    DeviceVariant, Frequency, Generator, PinId, PwmDriver, RealSignalGenerator, SignalConfig,
    TimerId,
};
use ufmt::uWrite;

struct Stdout;

impl uWrite for Stdout {
    type Error = core::convert::Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        print!("{}", s);
        Ok(())
    }
}

struct DryRun {
    variant: DeviceVariant,
}

impl PwmDriver for DryRun {
    type Error = &'static str;

    fn program(&mut self, timer: TimerId, pin: PinId, frequency: Frequency) -> Result<(), Self::Error> {
        let clock = self.variant.max_clock_speed();
        let plan = TimerPlan::for_frequency(clock, timer.resolution(), frequency)
            .ok_or("frequency out of range")?;
        println!(
            "program {:?} pin {} -> prescaler {} top {} ({} Hz)",
            timer,
            pin.number(),
            plan.prescaler.divisor(),
            plan.top,
            plan.actual_frequency(clock)
        );
        Ok(())
    }

    fn start(&mut self, timer: TimerId) -> Result<(), Self::Error> {
        println!("start {:?}", timer);
        Ok(())
    }

    fn stop(&mut self, timer: TimerId) -> Result<(), Self::Error> {
        println!("stop {:?}", timer);
        Ok(())
    }
}

fn main() {
    let variant = DeviceVariant::Compact;
    let mut console = Stdout;

    let mut gen = RealSignalGenerator::new(variant, TimerId::T1, DryRun { variant });
    let range = frequency_range(variant, TimerId::T1);
    println!("Timer 1 range: {}..={} Hz", range.start(), range.end());

    if let Err(err) = gen.configure(SignalConfig::default()) {
        println!("setup failed: {:?}", err);
    }
    if let Err(err) = gen.setup_on(1_000, PinId::new(9)) {
        println!("setup on pin 9 refused: {:?}", err);
    }
    gen.run().ok();
    let _ = gen.report(&mut console);
    gen.stop().ok();

    let missing = RealSignalGenerator::new(variant, TimerId::T4, DryRun { variant });
    let _ = missing.report(&mut console);

    let _ = run_self_tests(&mut console);
}
