use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::Path,
};

use embedded_storage::{ReadStorage, Storage};
use log::info;

/// Emulated flash sector size; a fresh image is one sector.
pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FileFlashError {
    Io(io::ErrorKind),
    OutOfBounds,
}

impl From<io::Error> for FileFlashError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.kind())
    }
}

/// Flash image kept in a regular file. Missing bytes read as erased (`0xFF`).
///
/// Every write is synced to disk before returning.
#[derive(Debug)]
pub struct FileFlash {
    file: File,
    capacity: usize,
}

impl FileFlash {
    pub fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, FileFlashError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let len = file.metadata()?.len() as usize;
        if len < capacity {
            file.seek(SeekFrom::Start(len as u64))?;
            file.write_all(&vec![0xFF; capacity - len])?;
            file.sync_data()?;
            info!("flash image {} initialized ({} bytes)", path.display(), capacity);
        }

        Ok(Self { file, capacity })
    }

    fn check_range(&self, offset: u32, len: usize) -> Result<u64, FileFlashError> {
        let end = offset as usize + len;
        if end > self.capacity {
            return Err(FileFlashError::OutOfBounds);
        }
        Ok(offset as u64)
    }
}

impl ReadStorage for FileFlash {
    type Error = FileFlashError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let start = self.check_range(offset, bytes.len())?;
        self.file.seek(SeekFrom::Start(start))?;
        self.file.read_exact(bytes)?;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Storage for FileFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let start = self.check_range(offset, bytes.len())?;
        self.file.seek(SeekFrom::Start(start))?;
        self.file.write_all(bytes)?;
        self.file.sync_data()?;
        Ok(())
    }
}
