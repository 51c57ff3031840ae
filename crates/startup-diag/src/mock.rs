//! Simulated board for exercising the diagnostic routine off-target.
//!
//! Time is virtual: [`Board::wait_cycles`] advances the millisecond counter
//! by the equivalent wall-clock duration at the current clock rate, so a
//! "one second" wait is exact and the tests run instantly.

use crc::{Crc, CRC_8_SMBUS};
use heapless::{String, Vec};

use crate::Board;

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Captured console capacity; enough for a start sequence plus a dozen
/// tick lines.
pub const CONSOLE_CAP: usize = 1024;

pub struct MockBoard {
    console: String<CONSOLE_CAP>,
    clock_hz: u32,
    now_ms: u32,
    /// Target frequencies passed to `set_sys_clock`, in call order.
    pub clock_requests: Vec<u32, 4>,
    /// Baud rates passed to `init_debug_uart`, in call order.
    pub uart_requests: Vec<u32, 4>,
}

impl MockBoard {
    /// A board whose runtime already set the clock to `clock_hz`.
    pub fn new(clock_hz: u32) -> Self {
        Self {
            console: String::new(),
            clock_hz,
            now_ms: 0,
            clock_requests: Vec::new(),
            uart_requests: Vec::new(),
        }
    }

    /// Everything written to the console so far.
    pub fn output(&self) -> &str {
        &self.console
    }
}

impl Board for MockBoard {
    type Console = String<CONSOLE_CAP>;

    fn set_sys_clock(&mut self, target_hz: u32) {
        let _ = self.clock_requests.push(target_hz);
        self.clock_hz = target_hz;
    }

    fn init_debug_uart(&mut self, baud: u32) {
        let _ = self.uart_requests.push(baud);
    }

    fn console(&mut self) -> &mut Self::Console {
        &mut self.console
    }

    fn sys_clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn wait_cycles(&mut self, count: u32) {
        let ticks_per_ms = self.clock_hz / 1000;
        self.now_ms = self.now_ms.wrapping_add(count / ticks_per_ms);
    }

    fn millis(&self) -> u32 {
        self.now_ms
    }

    fn crc8(&self, bytes: &[u8]) -> u8 {
        CRC8.checksum(bytes)
    }
}
