use arduino_hal::Eeprom;
use palletizer::master::{Entry, QueueIndex, QueueStore, StoreError};
use palletizer::protocol::OPERATOR_LINE_LEN;

/// Queue store on the on-chip EEPROM.
///
/// Layout: an 8 byte header (magic, head, size, log length, each a
/// little-endian `u16`), followed by `SLOTS` fixed-size slots. Each slot is
/// a length byte and the text of one entry. Log entries are written to the
/// slots as a ring, so the log can grow past `SLOTS` as long as no more than
/// `SLOTS` entries are live.
///
/// # Type Parameters
///
/// - `SLOTS`: number of slots, at least the queue capacity
pub struct EepromStore<const SLOTS: u16> {
    eeprom: Eeprom,
    count: u16,
}
impl<const SLOTS: u16> EepromStore<SLOTS> {
    const MAGIC: u16 = 0x5a51;
    const HEADER_LEN: u16 = 8;
    const SLOT_LEN: u16 = OPERATOR_LINE_LEN as u16 + 1;

    pub fn new(eeprom: Eeprom) -> Self {
        Self { eeprom, count: 0 }
    }

    fn slot_offset(index: u16) -> u16 {
        Self::HEADER_LEN + (index % SLOTS) * Self::SLOT_LEN
    }

    fn read_u16(&self, offset: u16) -> Result<u16, StoreError> {
        let mut bytes = [0u8; 2];
        self.eeprom
            .read(offset, &mut bytes)
            .map_err(|_| StoreError::Unavailable)?;
        Ok(u16::from_le_bytes(bytes))
    }

    fn write_u16(&mut self, offset: u16, value: u16) -> Result<(), StoreError> {
        self.eeprom
            .write(offset, &value.to_le_bytes())
            .map_err(|_| StoreError::Unavailable)
    }

    /// Writes an empty log.
    fn format(&mut self) -> Result<(), StoreError> {
        self.write_u16(2, 0)?;
        self.write_u16(4, 0)?;
        self.write_u16(6, 0)?;
        self.write_u16(0, Self::MAGIC)?;
        self.count = 0;
        Ok(())
    }
}

impl<const SLOTS: u16> QueueStore for EepromStore<SLOTS> {
    fn read_index(&mut self) -> Result<QueueIndex, StoreError> {
        if Self::slot_offset(SLOTS - 1) + Self::SLOT_LEN > self.eeprom.capacity() {
            return Err(StoreError::Unavailable);
        }
        if self.read_u16(0)? != Self::MAGIC {
            self.format()?;
            return Ok(QueueIndex::default());
        }
        self.count = self.read_u16(6)?;
        Ok(QueueIndex {
            head: self.read_u16(2)?,
            size: self.read_u16(4)?,
        })
    }

    fn write_index(&mut self, index: QueueIndex) -> Result<(), StoreError> {
        self.write_u16(2, index.head)?;
        self.write_u16(4, index.size)
    }

    fn append(&mut self, line: &str) -> Result<(), StoreError> {
        if line.len() > OPERATOR_LINE_LEN {
            return Err(StoreError::Full);
        }
        let offset = Self::slot_offset(self.count);
        self.eeprom
            .write(offset + 1, line.as_bytes())
            .map_err(|_| StoreError::Unavailable)?;
        self.eeprom.write_byte(offset, line.len() as u8);
        self.count = self.count.checked_add(1).ok_or(StoreError::Full)?;
        self.write_u16(6, self.count)
    }

    fn read_at(&mut self, index: u16) -> Result<Entry, StoreError> {
        let offset = Self::slot_offset(index);
        let len = usize::from(self.eeprom.read_byte(offset));
        let mut bytes = [0u8; OPERATOR_LINE_LEN];
        let text = bytes.get_mut(..len).ok_or(StoreError::Corrupt)?;
        self.eeprom
            .read(offset + 1, text)
            .map_err(|_| StoreError::Unavailable)?;
        let text = core::str::from_utf8(text).map_err(|_| StoreError::Corrupt)?;
        Entry::try_from(text).map_err(|_| StoreError::Corrupt)
    }

    fn count(&mut self) -> u16 {
        self.count
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.count = 0;
        self.write_u16(6, 0)
    }
}
