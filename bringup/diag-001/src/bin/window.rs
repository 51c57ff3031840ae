#![no_main]
#![no_std]

use diag_001::board;
use startup_diag::{DiagWindow, WINDOW_LEN};

extern "C" {
    static __sidata: u8;
}

/// Dumps the diagnostic window over defmt so the checksum printed by the
/// `diag` binary can be verified against the raw bytes.
#[cortex_m_rt::entry]
fn main() -> ! {
    let (addr, window) = unsafe {
        let addr = core::ptr::addr_of!(__sidata);
        (addr as u32, DiagWindow::new(&*(addr as *const [u8; WINDOW_LEN])))
    };

    defmt::info!("diag window at {=u32:#010x}", addr);
    defmt::info!("bytes: {=[u8]:#04x}", window.bytes());
    defmt::info!("crc8:  {=u8:#04x}", board::crc8(window.bytes()));

    diag_001::exit()
}
