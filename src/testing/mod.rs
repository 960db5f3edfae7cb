//! On-target self tests
//!
//! Checks the capability tables and timer math on the device itself and
//! reports over whatever console is at hand.

use ufmt::{uDisplay, uWrite, uwrite, Formatter};

use crate::hal::{DeviceVariant, PinId, TimerId, TimerPlan};

pub struct TestRunner<'a, W: uWrite + ?Sized> {
    console: &'a mut W,
    total_tests: u32,
    passed_tests: u32,
    current_suite: &'static str,
}

pub trait TestCase {
    fn run(&self) -> TestResult;
    fn name(&self) -> &'static str;
}

#[derive(Debug, PartialEq, Eq)]
pub enum TestResult {
    Pass,
    Fail(TestError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum TestError {
    AssertionFailed(&'static str),
}

impl uDisplay for TestError {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            TestError::AssertionFailed(what) => {
                f.write_str("assertion failed: ")?;
                f.write_str(what)
            }
        }
    }
}

#[macro_export]
macro_rules! check_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return $crate::testing::TestResult::Fail($crate::testing::TestError::AssertionFailed(
                concat!("`", stringify!($left), " == ", stringify!($right), "`"),
            ));
        }
    };
}

impl<'a, W: uWrite + ?Sized> TestRunner<'a, W> {
    pub fn new(console: &'a mut W) -> Self {
        Self {
            console,
            total_tests: 0,
            passed_tests: 0,
            current_suite: "",
        }
    }

    pub fn run_suite(&mut self, name: &'static str, tests: &[&dyn TestCase]) -> Result<(), W::Error> {
        self.current_suite = name;
        uwrite!(self.console, "\r\n=== Test Suite: {} ===\r\n", name)?;

        for test in tests {
            self.total_tests += 1;
            uwrite!(self.console, "Running {}: ", test.name())?;

            match test.run() {
                TestResult::Pass => {
                    self.passed_tests += 1;
                    self.console.write_str("PASS\r\n")?;
                }
                TestResult::Fail(err) => {
                    uwrite!(self.console, "FAIL - {}\r\n", err)?;
                }
            }
        }

        self.print_summary()
    }

    pub fn passed(&self) -> u32 {
        self.passed_tests
    }

    pub fn total(&self) -> u32 {
        self.total_tests
    }

    fn print_summary(&mut self) -> Result<(), W::Error> {
        let percent = if self.total_tests == 0 {
            100
        } else {
            (self.passed_tests * 100) / self.total_tests
        };
        uwrite!(
            self.console,
            "\r\nTest Summary for {}:\r\nPassed: {}/{} ({}%)\r\n",
            self.current_suite,
            self.passed_tests,
            self.total_tests,
            percent
        )
    }
}

pub struct ClockSpeedTest;
impl TestCase for ClockSpeedTest {
    fn name(&self) -> &'static str {
        "Clock Speeds"
    }

    fn run(&self) -> TestResult {
        check_eq!(DeviceVariant::Compact.max_clock_speed(), 16_000_000);
        check_eq!(DeviceVariant::Extended.max_clock_speed(), 84_000_000);
        TestResult::Pass
    }
}

pub struct TimerTableTest;
impl TestCase for TimerTableTest {
    fn name(&self) -> &'static str {
        "Timer Availability"
    }

    fn run(&self) -> TestResult {
        check_eq!(DeviceVariant::Compact.supported_timers().len(), 3);
        check_eq!(DeviceVariant::Compact.supports(TimerId::T3), false);
        check_eq!(DeviceVariant::Extended.supports(TimerId::T4), true);
        TestResult::Pass
    }
}

pub struct PinRoutingTest;
impl TestCase for PinRoutingTest {
    fn name(&self) -> &'static str {
        "Pin Routing"
    }

    fn run(&self) -> TestResult {
        for timer in TimerId::ALL {
            let pins = timer.pins();
            if pins.len() < 2 || pins.len() > 3 {
                return TestResult::Fail(TestError::AssertionFailed("2 or 3 pins per timer"));
            }
            for &pin in pins {
                if !DeviceVariant::Compact.has_pin(pin) {
                    return TestResult::Fail(TestError::AssertionFailed("timer pin off the board"));
                }
            }
        }
        check_eq!(TimerId::T1.drives(PinId::new(11)), true);
        check_eq!(TimerId::T1.drives(PinId::new(9)), false);
        TestResult::Pass
    }
}

pub struct TimerPlanTest;
impl TestCase for TimerPlanTest {
    fn name(&self) -> &'static str {
        "Timer Plans"
    }

    fn run(&self) -> TestResult {
        let clock = DeviceVariant::Compact.max_clock_speed();
        match TimerPlan::for_frequency(clock, TimerId::T0.resolution(), 1_000) {
            Some(plan) => check_eq!(plan.actual_frequency(clock), 1_000),
            None => return TestResult::Fail(TestError::AssertionFailed("1kHz on Timer 0")),
        }
        check_eq!(TimerPlan::for_frequency(clock, TimerId::T0.resolution(), 0), None);
        TestResult::Pass
    }
}

/// Run every built-in self test, returns the number that passed
pub fn run_self_tests<W: uWrite + ?Sized>(console: &mut W) -> Result<u32, W::Error> {
    let mut runner = TestRunner::new(console);
    runner.run_suite(
        "Signal Generator",
        &[&ClockSpeedTest, &TimerTableTest, &PinRoutingTest, &TimerPlanTest],
    )?;
    Ok(runner.passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Console(String);

    impl uWrite for Console {
        type Error = core::convert::Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
            self.0.push_str(s);
            Ok(())
        }
    }

    struct Broken;
    impl TestCase for Broken {
        fn name(&self) -> &'static str {
            "Broken"
        }

        fn run(&self) -> TestResult {
            check_eq!(1 + 1, 3);
            TestResult::Pass
        }
    }

    #[test]
    fn built_in_suite_passes() {
        let mut console = Console::default();
        assert_eq!(run_self_tests(&mut console), Ok(4));
        assert!(console.0.contains("Running Pin Routing: PASS\r\n"));
        assert!(console.0.ends_with("Passed: 4/4 (100%)\r\n"));
    }

    #[test]
    fn failures_are_reported() {
        let mut console = Console::default();
        let mut runner = TestRunner::new(&mut console);
        runner.run_suite("Mixed", &[&ClockSpeedTest, &Broken]).unwrap();
        assert_eq!(runner.passed(), 1);
        assert_eq!(runner.total(), 2);
        assert!(console
            .0
            .contains("Running Broken: FAIL - assertion failed: `1 + 1 == 3`\r\n"));
        assert!(console.0.ends_with("Passed: 1/2 (50%)\r\n"));
    }
}
