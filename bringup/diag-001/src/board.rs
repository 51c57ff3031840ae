//! STM32F411 board services behind the `startup_diag::Board` seam.
//!
//! Clock and UART bring-up happen lazily through the trait so that the
//! self-managed startup profile drives them; until then the board runs on
//! the HSI reset clock and has no console.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::exception;
use crc::{Crc, CRC_8_SMBUS};
use startup_diag::Board;
use stm32f4xx_hal::{
    pac,
    prelude::*,
    rcc::Clocks,
    serial::{config::Config, Serial, Tx},
};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// HSI frequency out of reset, before `set_sys_clock` runs.
const RESET_CLOCK_HZ: u32 = 16_000_000;

/// The F411 PLL tops out below the 200 MHz target; this is the fastest
/// clean multiple of the 25 MHz HSE.
const MAX_SYSCLK_HZ: u32 = 96_000_000;

static MILLIS: AtomicU32 = AtomicU32::new(0);

#[exception]
fn SysTick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

/// CRC-8 (SMBus polynomial) over `bytes`.
pub fn crc8(bytes: &[u8]) -> u8 {
    CRC8.checksum(bytes)
}

pub struct F411Board {
    rcc: Option<pac::RCC>,
    gpioa: Option<pac::GPIOA>,
    usart1: Option<pac::USART1>,
    syst: Option<SYST>,
    clocks: Option<Clocks>,
    sysclk_hz: u32,
    tx: Option<Tx<pac::USART1>>,
}

impl F411Board {
    pub fn new(dp: pac::Peripherals, cp: cortex_m::Peripherals) -> Self {
        Self {
            rcc: Some(dp.RCC),
            gpioa: Some(dp.GPIOA),
            usart1: Some(dp.USART1),
            syst: Some(cp.SYST),
            clocks: None,
            sysclk_hz: RESET_CLOCK_HZ,
            tx: None,
        }
    }
}

impl Board for F411Board {
    type Console = Tx<pac::USART1>;

    fn set_sys_clock(&mut self, target_hz: u32) {
        let rcc = self.rcc.take().unwrap().constrain();
        let clocks = rcc
            .cfgr
            .use_hse(25.MHz())
            .sysclk(target_hz.min(MAX_SYSCLK_HZ).Hz())
            .freeze();
        self.sysclk_hz = clocks.sysclk().raw();
        self.clocks = Some(clocks);

        defmt::info!("sysclk at {=u32} Hz", self.sysclk_hz);

        // 1 kHz SysTick feeds the millisecond counter.
        let mut syst = self.syst.take().unwrap();
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(self.sysclk_hz / 1000 - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();
    }

    fn init_debug_uart(&mut self, baud: u32) {
        let clocks = self.clocks.unwrap();
        let gpioa = self.gpioa.take().unwrap().split();

        let serial = Serial::new(
            self.usart1.take().unwrap(),
            (
                gpioa.pa9.into_alternate::<7>(),
                gpioa.pa10.into_alternate::<7>(),
            ),
            Config::default().baudrate(baud.bps()),
            &clocks,
        )
        .unwrap();
        let (tx, _rx) = serial.split();
        self.tx = Some(tx);

        defmt::info!("debug uart up at {=u32} baud", baud);
    }

    fn console(&mut self) -> &mut Self::Console {
        self.tx.as_mut().unwrap()
    }

    fn sys_clock_hz(&self) -> u32 {
        self.sysclk_hz
    }

    fn wait_cycles(&mut self, count: u32) {
        cortex_m::asm::delay(count);
    }

    fn millis(&self) -> u32 {
        MILLIS.load(Ordering::Relaxed)
    }

    fn crc8(&self, bytes: &[u8]) -> u8 {
        crc8(bytes)
    }
}
