#![cfg_attr(not(test), no_std)]

//! Power-on startup & diagnostic routine, portable over board services.
//!
//! The routine sequences one-time hardware bring-up and a non-terminating
//! diagnostic print loop: optionally raise the system clock and open the
//! debug UART (depending on the active [`StartupProfile`]), print a fixed
//! greeting, print the CRC-8 of a fixed 32-byte memory window, then print
//! the elapsed-milliseconds counter once per second, forever.
//!
//! All hardware access goes through the [`Board`] trait; the UART driver,
//! clock tree, and CRC-8 algorithm are platform services consumed through
//! that boundary, not implemented here.

use core::fmt::Write;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

/// Clock frequency requested during self-managed bring-up, in Hz.
///
/// Boards that cannot reach this rate run their fastest supported
/// configuration instead and report the actual rate via
/// [`Board::sys_clock_hz`].
pub const TARGET_SYS_CLOCK_HZ: u32 = 200_000_000;

/// Debug UART baud rate (8N1, no flow control).
pub const DEBUG_UART_BAUD: u32 = 230_400;

/// Size of the diagnostic memory window, in bytes.
pub const WINDOW_LEN: usize = 32;

/// Which startup path is active for this run.
///
/// Resolved once at startup; exactly one variant applies per power-up and
/// only [`SelfManaged`](StartupProfile::SelfManaged) performs hardware
/// initialization.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupProfile {
    /// The runtime's startup code already configured the system clock and
    /// debug UART; the routine touches neither.
    RuntimeManaged,
    /// The routine raises the system clock to [`TARGET_SYS_CLOCK_HZ`] and
    /// opens the debug UART at [`DEBUG_UART_BAUD`] itself.
    SelfManaged,
}

impl StartupProfile {
    pub fn inits_hardware(self) -> bool {
        matches!(self, StartupProfile::SelfManaged)
    }
}

/// A fixed 32-byte read-only memory window used as CRC input.
///
/// The contents are whatever the linker/runtime placed at the anchoring
/// address — arbitrary but deterministic for a given binary image. This is
/// not a meaningful payload; the checksum exists to prove the memory is
/// readable and stable across resets.
pub struct DiagWindow<'a> {
    bytes: &'a [u8; WINDOW_LEN],
}

impl<'a> DiagWindow<'a> {
    pub const fn new(bytes: &'a [u8; WINDOW_LEN]) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        self.bytes
    }
}

/// Board services consumed by the diagnostic routine.
///
/// Failures of these calls are not inspected by the routine; any error
/// handling is the board layer's business.
pub trait Board {
    /// Diagnostic output stream.
    type Console: Write;

    /// Configure the system clock, aiming for `target_hz`.
    fn set_sys_clock(&mut self, target_hz: u32);

    /// Open the debug UART at the given baud rate.
    fn init_debug_uart(&mut self, baud: u32);

    fn console(&mut self) -> &mut Self::Console;

    /// The actual running system clock frequency, in Hz.
    fn sys_clock_hz(&self) -> u32;

    /// Block for `count` clock ticks.
    fn wait_cycles(&mut self, count: u32);

    /// Milliseconds since power-up.
    fn millis(&self) -> u32;

    /// CRC-8 of `bytes`; algorithm is the board's external utility.
    fn crc8(&self, bytes: &[u8]) -> u8;
}

/// One-time startup sequence: optional hardware init, greeting, window CRC.
///
/// Console write errors are deliberately discarded; if the UART never came
/// up there is nobody to tell.
pub fn diag_start<B: Board>(board: &mut B, profile: StartupProfile, window: &DiagWindow) {
    if profile.inits_hardware() {
        board.set_sys_clock(TARGET_SYS_CLOCK_HZ);
        board.init_debug_uart(DEBUG_UART_BAUD);
    }

    let _ = board.console().write_str("Hello World!\n");

    // Historical wording: the checksum covers the window bytes, not the
    // greeting string.
    let crc = board.crc8(window.bytes());
    let _ = writeln!(board.console(), "CRC8 of 'Hello': 0x{:02X}", crc);
}

/// One diagnostic loop iteration: wait one second of clock ticks, then
/// report the elapsed-milliseconds counter.
pub fn diag_tick<B: Board>(board: &mut B) {
    let one_second = board.sys_clock_hz();
    board.wait_cycles(one_second);

    let now = board.millis();
    let _ = writeln!(board.console(), "Time1: {}", now);
}

/// The full power-on diagnostic: [`diag_start`], then [`diag_tick`] forever.
///
/// Never returns; the only way out is an external reset.
pub fn power_on_diag<B: Board>(board: &mut B, profile: StartupProfile, window: &DiagWindow) -> ! {
    diag_start(board, profile, window);
    loop {
        diag_tick(board);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBoard;

    const WINDOW_BYTES: [u8; WINDOW_LEN] = [0x5A; WINDOW_LEN];

    fn started(profile: StartupProfile) -> MockBoard {
        let mut board = MockBoard::new(100_000_000);
        diag_start(&mut board, profile, &DiagWindow::new(&WINDOW_BYTES));
        board
    }

    #[test]
    fn greeting_is_first_line() {
        let board = started(StartupProfile::RuntimeManaged);
        assert_eq!(board.output().lines().next(), Some("Hello World!"));
    }

    #[test]
    fn crc_line_is_two_uppercase_hex_digits() {
        let board = started(StartupProfile::RuntimeManaged);
        let line = board.output().lines().nth(1).unwrap();
        let digits = line.strip_prefix("CRC8 of 'Hello': 0x").unwrap();
        assert_eq!(digits.len(), 2);
        assert!(digits
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn crc_is_deterministic_across_runs() {
        let first = started(StartupProfile::RuntimeManaged);
        let second = started(StartupProfile::RuntimeManaged);
        assert_eq!(
            first.output().lines().nth(1),
            second.output().lines().nth(1)
        );
    }

    #[test]
    fn self_managed_profile_inits_clock_then_uart() {
        let board = started(StartupProfile::SelfManaged);
        assert_eq!(board.clock_requests.as_slice(), &[TARGET_SYS_CLOCK_HZ]);
        assert_eq!(board.uart_requests.as_slice(), &[DEBUG_UART_BAUD]);
    }

    #[test]
    fn runtime_managed_profile_skips_init() {
        let board = started(StartupProfile::RuntimeManaged);
        assert!(board.clock_requests.is_empty());
        assert!(board.uart_requests.is_empty());
    }

    fn time_values(board: &MockBoard) -> Vec<u32> {
        board
            .output()
            .lines()
            .filter_map(|line| line.strip_prefix("Time1: "))
            .map(|v| v.parse().unwrap())
            .collect()
    }

    #[test]
    fn time_lines_are_strictly_increasing() {
        let mut board = started(StartupProfile::RuntimeManaged);
        for _ in 0..6 {
            diag_tick(&mut board);
        }
        let times = time_values(&board);
        assert_eq!(times.len(), 6);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ticks_are_one_second_apart() {
        let mut board = started(StartupProfile::RuntimeManaged);
        for _ in 0..6 {
            diag_tick(&mut board);
        }
        let times = time_values(&board);
        assert!(times.windows(2).all(|w| w[1] - w[0] == 1000));
    }

    #[test]
    fn still_emitting_after_ten_iterations() {
        let mut board = started(StartupProfile::RuntimeManaged);
        for _ in 0..12 {
            diag_tick(&mut board);
        }
        assert_eq!(time_values(&board).len(), 12);
    }
}
