#![no_std]

use core::sync::atomic::{AtomicUsize, Ordering};

use defmt_rtt as _; // global logger
use panic_probe as _;

pub mod board;

static COUNT: AtomicUsize = AtomicUsize::new(0);
defmt::timestamp!("{=usize}", COUNT.fetch_add(1, Ordering::Relaxed));

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}

/// Terminates the application and makes the attached debugger exit.
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}
