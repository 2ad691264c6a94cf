#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

mod devices;

use arduino_hal::hal::port::{PD0, PD1};
use arduino_hal::pac::USART0;
use arduino_hal::port::{
    mode::{Input, Output},
    Pin,
};
use devices::{LimitSwitch, OutputPin, RxBuffer, SerialLink, Stepper, Tc1Clock};
use palletizer::axis::{AxisConfig, AxisController, AxisHardware};
use palletizer::protocol::AxisId;
use palletizer::transport::NullSink;
use palletizer::{MicroSeconds, Polarity};
use panic_halt as _;

/// Axis driven by this board. Each board is flashed with its own identity.
const AXIS: AxisId = AxisId::X;

const BAUD_RATE: u32 = 9600;

static BUS_RX: RxBuffer<USART0, Pin<Input, PD0>, Pin<Output, PD1>> = RxBuffer::new();

#[avr_device::interrupt(atmega328p)]
fn USART_RX() {
    BUS_RX.on_receive();
}

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let serial = arduino_hal::default_serial!(dp, pins, BAUD_RATE);
    let clock = Tc1Clock::new(dp.TC1);

    let hardware = AxisHardware {
        stepper: Stepper::new(
            pins.d10.into_output(),
            pins.d8.into_output(),
            MicroSeconds::new(5),
            MicroSeconds::new(10),
        ),
        brake: OutputPin::new(pins.d7.into_output()),
        enable: OutputPin::new(pins.d9.into_output()),
        indicator: OutputPin::new(pins.d6.into_output()),
        sensor: LimitSwitch::new(pins.d3.into_pull_up_input(), Polarity::ActiveLow),
    };

    let mut controller =
        AxisController::new(AxisConfig::new(AXIS), SerialLink::new(serial, &BUS_RX), hardware, NullSink);
    // SAFETY: every static the interrupt handlers touch is initialised.
    unsafe { avr_device::interrupt::enable() };
    loop {
        controller.poll(&clock);
    }
}
