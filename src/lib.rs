#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "firmware", no_main)]

// must stay first so the other modules see the log macros
mod fmt;

pub mod at;
pub mod button;
pub mod clock;
pub mod constants;
pub mod deveui;
pub mod dispatch;
pub mod event;
pub mod transport;

#[cfg(feature = "firmware")]
pub mod board;

#[cfg(feature = "firmware")]
use defmt_rtt as _; // global logger

#[cfg(feature = "firmware")]
use panic_probe as _;

#[cfg(feature = "firmware")]
use stm32wlxx_hal as _; // memory layout

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[cfg(feature = "firmware")]
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

/// Terminates the application and makes `probe-rs` exit with exit-code = 0
#[cfg(feature = "firmware")]
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}
