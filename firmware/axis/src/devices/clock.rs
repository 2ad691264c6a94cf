use core::cell::Cell;

use arduino_hal::pac::TC1;
use avr_device::interrupt::{self, Mutex};
use palletizer::{Clock, MicroSeconds};

/// Overflows of timer 1 since it was started.
static OVERFLOWS: Mutex<Cell<u16>> = Mutex::new(Cell::new(0));

#[avr_device::interrupt(atmega328p)]
fn TIMER1_OVF() {
    interrupt::free(|cs| {
        let overflows = OVERFLOWS.borrow(cs);
        overflows.set(overflows.get().wrapping_add(1));
    });
}

/// Microsecond clock on the free-running 16-bit timer 1.
///
/// The timer ticks every 4 µs (16 MHz with a prescaler of 64) and overflows
/// every 262 ms. Overflows are counted by the overflow interrupt, so the
/// clock stays right while the main loop is blocked.
pub struct Tc1Clock {
    tc1: TC1,
}
impl Tc1Clock {
    const MICROS_PER_TICK: u32 = 4;

    /// Starts timer 1 in normal mode with its overflow interrupt enabled.
    pub fn new(tc1: TC1) -> Self {
        tc1.tccr1a().reset();
        tc1.tccr1b().write(|w| w.cs1().prescale_64());
        tc1.timsk1().write(|w| w.toie1().set_bit());
        Self { tc1 }
    }
}

impl Clock for Tc1Clock {
    fn now(&self) -> MicroSeconds {
        let ticks = interrupt::free(|cs| {
            let mut overflows = OVERFLOWS.borrow(cs).get();
            let count = self.tc1.tcnt1().read().bits();
            // An overflow that has not been serviced yet.
            if self.tc1.tifr1().read().tov1().bit_is_set() && count < 0x8000 {
                overflows = overflows.wrapping_add(1);
            }
            (u32::from(overflows) << 16) | u32::from(count)
        });
        MicroSeconds::new(ticks.wrapping_mul(Self::MICROS_PER_TICK))
    }
}
