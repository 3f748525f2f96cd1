use classy_core::settings::RecordStore;
use embedded_storage::Storage;
use log::debug;

const RECORD_MAGIC: u32 = 0x3152_4C43; // "CLR1"
const SLOT_LEN: usize = 64;
const HEADER_LEN: usize = 9;
const CHECKSUM_LEN: usize = 4;
const PAYLOAD_OFFSET: usize = HEADER_LEN;
const CHECKSUM_OFFSET: usize = SLOT_LEN - CHECKSUM_LEN;

/// Largest record a slot can carry.
pub const MAX_RECORD_LEN: usize = CHECKSUM_OFFSET - HEADER_LEN;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashRecordError<E> {
    Flash(E),
    Corrupted,
    RecordTooLarge,
    Full,
}

/// Keyed records in fixed-size flash slots.
///
/// Slot layout: `[magic u32][key u32][len u8][payload][fnv1a u32]`, little
/// endian. A slot without the magic is free; an erased slot reads as all `0xFF`.
#[derive(Debug)]
pub struct FlashRecordStore<F> {
    flash: F,
    base: u32,
    slots: u32,
}

impl<F> FlashRecordStore<F>
where
    F: Storage,
{
    /// Uses the whole flash as the record region.
    pub fn new(flash: F) -> Self {
        Self::with_region(flash, 0, u32::MAX)
    }

    /// Uses `len` bytes starting at `base`, clamped to the flash capacity.
    pub fn with_region(flash: F, base: u32, len: u32) -> Self {
        let available = (flash.capacity() as u64).saturating_sub(base as u64);
        let len = (len as u64).min(available);
        let slots = (len / SLOT_LEN as u64) as u32;
        Self { flash, base, slots }
    }

    pub fn slot_count(&self) -> u32 {
        self.slots
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn slot_addr(&self, slot: u32) -> u32 {
        self.base + slot * SLOT_LEN as u32
    }

    fn read_slot(&mut self, slot: u32) -> Result<[u8; SLOT_LEN], FlashRecordError<F::Error>> {
        let mut buf = [0xFFu8; SLOT_LEN];
        self.flash
            .read(self.slot_addr(slot), &mut buf)
            .map_err(FlashRecordError::Flash)?;
        Ok(buf)
    }

    /// Slot holding `key`, or the first free slot when `key` is not stored.
    fn find_slot(
        &mut self,
        key: u32,
    ) -> Result<(Option<(u32, [u8; SLOT_LEN])>, Option<u32>), FlashRecordError<F::Error>> {
        let mut free = None;
        for slot in 0..self.slots {
            let buf = self.read_slot(slot)?;
            if read_u32(&buf, 0) != RECORD_MAGIC {
                free.get_or_insert(slot);
                continue;
            }
            if read_u32(&buf, 4) == key {
                return Ok((Some((slot, buf)), free));
            }
        }
        Ok((None, free))
    }
}

impl<F> RecordStore for FlashRecordStore<F>
where
    F: Storage,
    F::Error: core::fmt::Debug,
{
    type Error = FlashRecordError<F::Error>;

    fn read_record(&mut self, key: u32, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        let (found, _) = self.find_slot(key)?;
        let Some((slot, raw)) = found else {
            return Ok(None);
        };

        let expected = read_u32(&raw, CHECKSUM_OFFSET);
        if checksum32(&raw[..CHECKSUM_OFFSET]) != expected {
            debug!("record {} in slot {} failed checksum", key, slot);
            return Err(FlashRecordError::Corrupted);
        }

        let len = raw[8] as usize;
        if len > MAX_RECORD_LEN {
            return Err(FlashRecordError::Corrupted);
        }

        let copied = len.min(buf.len());
        buf[..copied].copy_from_slice(&raw[PAYLOAD_OFFSET..PAYLOAD_OFFSET + copied]);
        Ok(Some(copied))
    }

    fn write_record(&mut self, key: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if bytes.len() > MAX_RECORD_LEN {
            return Err(FlashRecordError::RecordTooLarge);
        }

        let slot = match self.find_slot(key)? {
            (Some((slot, _)), _) => slot,
            (None, Some(free)) => free,
            (None, None) => return Err(FlashRecordError::Full),
        };

        let mut raw = [0xFFu8; SLOT_LEN];
        raw[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
        raw[4..8].copy_from_slice(&key.to_le_bytes());
        raw[8] = bytes.len() as u8;
        raw[PAYLOAD_OFFSET..PAYLOAD_OFFSET + bytes.len()].copy_from_slice(bytes);
        let checksum = checksum32(&raw[..CHECKSUM_OFFSET]);
        raw[CHECKSUM_OFFSET..].copy_from_slice(&checksum.to_le_bytes());

        let addr = self.slot_addr(slot);
        self.flash
            .write(addr, &raw)
            .map_err(FlashRecordError::Flash)?;
        debug!("record {} written to slot {} ({} bytes)", key, slot, bytes.len());
        Ok(())
    }
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
