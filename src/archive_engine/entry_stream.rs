use crate::archive_engine::EntryHandle;
use std::io::{self, Read};

/// `Read` adapter over an [`EntryHandle`].
pub struct EntryStream {
    entry_handle: EntryHandle,
    position: usize, // Bytes of the entry already handed out
}

impl EntryStream {
    pub fn new(entry_handle: EntryHandle) -> Self {
        Self {
            entry_handle,
            position: 0,
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.entry_handle.size() - self.position
    }
}

impl From<EntryHandle> for EntryStream {
    fn from(entry_handle: EntryHandle) -> Self {
        Self::new(entry_handle)
    }
}

impl Read for EntryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(0); // EOF
        }

        let bytes_to_read = remaining.min(buf.len());
        let slice = self.entry_handle.as_slice();

        buf[..bytes_to_read].copy_from_slice(&slice[self.position..self.position + bytes_to_read]);

        self.position += bytes_to_read;
        Ok(bytes_to_read)
    }
}
