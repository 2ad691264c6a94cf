use core::cell::RefCell;

use arduino_hal::hal::usart::Event;
use arduino_hal::prelude::*;
use arduino_hal::usart::{UsartReader, UsartWriter};
use arduino_hal::{hal::Atmega, usart::UsartOps, Usart};
use avr_device::interrupt::{self, Mutex};
use heapless::Deque;
use palletizer::transport::{LineSink, Transport};
use ufmt::uwriteln;

/// Bytes a receive buffer holds before dropping input.
pub const RX_BUFFER_LEN: usize = 256;

/// Receive half of a UART, drained by its receive interrupt.
///
/// Lives in a `static` so the interrupt handler can reach it. Input is
/// buffered while the main loop is blocked, for instance by an EEPROM write.
///
/// # Type Parameters
///
/// - `USART`, `RX`, `TX`: the UART and its pins
pub struct RxBuffer<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    reader: Mutex<RefCell<Option<UsartReader<USART, RX, TX>>>>,
    bytes: Mutex<RefCell<Deque<u8, RX_BUFFER_LEN>>>,
}
impl<USART, RX, TX> RxBuffer<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    pub const fn new() -> Self {
        Self {
            reader: Mutex::new(RefCell::new(None)),
            bytes: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    fn attach(&self, reader: UsartReader<USART, RX, TX>) {
        interrupt::free(|cs| {
            *self.reader.borrow(cs).borrow_mut() = Some(reader);
        });
    }

    /// Moves received bytes into the buffer.
    ///
    /// Call from the receive interrupt of the UART. Bytes that do not fit are
    /// dropped; the line they belong to then fails to decode.
    pub fn on_receive(&self) {
        interrupt::free(|cs| {
            let mut reader = self.reader.borrow(cs).borrow_mut();
            let reader = match reader.as_mut() {
                Some(reader) => reader,
                None => return,
            };
            let mut bytes = self.bytes.borrow(cs).borrow_mut();
            loop {
                match reader.read() {
                    Ok(byte) => {
                        let _ = bytes.push_back(byte);
                    }
                    Err(nb::Error::WouldBlock) => break,
                    Err(nb::Error::Other(never)) => match never {},
                }
            }
        });
    }

    fn pop(&self) -> Option<u8> {
        interrupt::free(|cs| self.bytes.borrow(cs).borrow_mut().pop_front())
    }
}

/// Newline-framed link over a hardware UART.
///
/// Reads never block. Writes block until the line is in the transmit
/// register.
pub struct SerialLink<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    writer: UsartWriter<USART, RX, TX>,
    rx: &'static RxBuffer<USART, RX, TX>,
}
impl<USART, RX, TX> SerialLink<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    /// Splits `serial` and hands its receive half to `rx`.
    ///
    /// The receive interrupt is enabled here; nothing is received until
    /// interrupts are enabled globally.
    pub fn new(mut serial: Usart<USART, RX, TX>, rx: &'static RxBuffer<USART, RX, TX>) -> Self {
        serial.listen(Event::RxComplete);
        let (reader, writer) = serial.split();
        rx.attach(reader);
        Self { writer, rx }
    }
}

impl<USART, RX, TX> LineSink for SerialLink<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    fn send_line(&mut self, line: &str) {
        uwriteln!(&mut self.writer, "{}", line).unwrap_infallible();
    }
}

impl<USART, RX, TX> Transport for SerialLink<USART, RX, TX>
where
    USART: UsartOps<Atmega, RX, TX>,
{
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop()
    }
}
