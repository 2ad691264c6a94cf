mod clock;
mod eeprom_store;
mod panel;
mod serial_link;

pub use clock::Tc1Clock;
pub use eeprom_store::EepromStore;
pub use panel::LampPanel;
pub use serial_link::{RxBuffer, SerialLink};
