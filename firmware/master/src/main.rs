#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

mod devices;

use arduino_hal::hal::port::{PD2, PD3, PE0, PE1};
use arduino_hal::hal::usart::BaudrateArduinoExt;
use arduino_hal::pac::{USART0, USART1};
use arduino_hal::port::{
    mode::{Input, Output},
    Pin,
};
use devices::{EepromStore, LampPanel, RxBuffer, SerialLink, Tc1Clock};
use palletizer::master::{Master, MasterConfig, DEFAULT_QUEUE_CAPACITY};
use palletizer::Clock;
use panic_halt as _;

const OPERATOR_BAUD_RATE: u32 = 115200;
const BUS_BAUD_RATE: u32 = 9600;

static OPERATOR_RX: RxBuffer<USART0, Pin<Input, PE0>, Pin<Output, PE1>> = RxBuffer::new();
static BUS_RX: RxBuffer<USART1, Pin<Input, PD2>, Pin<Output, PD3>> = RxBuffer::new();

#[avr_device::interrupt(atmega2560)]
fn USART0_RX() {
    OPERATOR_RX.on_receive();
}

#[avr_device::interrupt(atmega2560)]
fn USART1_RX() {
    BUS_RX.on_receive();
}

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);

    // Operator on USART0, axis bus on USART1.
    let operator = arduino_hal::default_serial!(dp, pins, OPERATOR_BAUD_RATE);
    let bus = arduino_hal::Usart::new(
        dp.USART1,
        pins.d19,
        pins.d18.into_output(),
        BUS_BAUD_RATE.into_baudrate(),
    );
    let clock = Tc1Clock::new(dp.TC1);
    let store: EepromStore<{ DEFAULT_QUEUE_CAPACITY as u16 }> =
        EepromStore::new(arduino_hal::Eeprom::new(dp.EEPROM));
    let panel = LampPanel::new(
        pins.d4.into_output(),
        pins.d5.into_output(),
        pins.d6.into_output(),
        pins.d7.into_pull_up_input(),
    );

    let mut master: Master<_, _, _, _, DEFAULT_QUEUE_CAPACITY> = Master::new(
        MasterConfig::new(),
        SerialLink::new(operator, &OPERATOR_RX),
        SerialLink::new(bus, &BUS_RX),
        store,
        panel,
    );
    // SAFETY: every static the interrupt handlers touch is initialised.
    unsafe { avr_device::interrupt::enable() };
    loop {
        master.tick(clock.now());
    }
}
