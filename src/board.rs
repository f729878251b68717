//! Firmware-side glue: SysTick time base, defmt timestamps and the console.

use rtic_monotonics::systick::prelude::*;
use stm32wlxx_hal::gpio::{self, pins};

use crate::{
    at::{Report, ReportSink},
    clock::Clock,
};

rtic_monotonics::systick_monotonic!(Mono, 1_000);

defmt::timestamp!("{=u32:ms}", Mono::now().ticks());

/// NUCLEO-WL55JC B1, active low
pub type ButtonPin = pins::A0;
pub type ModuleUart = stm32wlxx_hal::uart::LpUart<pins::A3, pins::A2>;

pub const BUTTON_PULL: gpio::Pull = gpio::Pull::Up;

#[derive(Clone, Copy, Default)]
pub struct MonoClock;

impl Clock for MonoClock {
    fn now_ms(&self) -> u32 {
        Mono::now().ticks()
    }
}

/// Status lines go straight to the RTT console, without log level or timestamp.
pub struct Console;

impl ReportSink for Console {
    fn report(&mut self, report: Report<'_>) {
        match report {
            Report::Connected => defmt::println!("Connected to LoRa module"),
            Report::Version(line) | Report::Identity(line) => defmt::println!("{}", line),
            Report::DevEui(eui) => defmt::println!("{}", eui),
            Report::NotResponding => defmt::println!("Module not responding"),
        }
    }
}
