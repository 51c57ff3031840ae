#![no_main]
#![no_std]

use diag_001::board::F411Board;
use startup_diag::{power_on_diag, DiagWindow, StartupProfile, WINDOW_LEN};
use stm32f4xx_hal::pac;

// Flash-resident initializer image for .data; read-only and stable for a
// given binary, which makes the window checksum reproducible across resets.
extern "C" {
    static __sidata: u8;
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let profile = StartupProfile::SelfManaged;
    defmt::info!("power-on diagnostic, profile {}", profile);

    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();
    let mut board = F411Board::new(dp, cp);

    let window = unsafe {
        DiagWindow::new(&*(core::ptr::addr_of!(__sidata) as *const [u8; WINDOW_LEN]))
    };

    power_on_diag(&mut board, profile, &window)
}
