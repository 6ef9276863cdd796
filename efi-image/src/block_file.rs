use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use block_dev::{check_range, check_transfer, BlockDevice, BLOCK_SIZE};

/// A disk image file. Its length must already be the final image size.
#[derive(Debug)]
pub struct BlockFile {
    file: File,
    block_count: u64,
}

impl BlockFile {
    pub fn new(file: File) -> io::Result<Self> {
        let block_count = file.metadata()?.len() / BLOCK_SIZE as u64;
        Ok(Self { file, block_count })
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl BlockDevice for BlockFile {
    fn block_count(&self) -> u64 {
        self.block_count
    }

    fn read_blocks(&mut self, block_id: u64, buf: &mut [u8]) -> io::Result<()> {
        check_range(self.block_count, block_id, buf.len())?;
        self.file.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;
        let read = self.file.read(buf)?;
        check_transfer(read, buf.len())
    }

    fn write_blocks(&mut self, block_id: u64, buf: &[u8]) -> io::Result<()> {
        check_range(self.block_count, block_id, buf.len())?;
        self.file.seek(SeekFrom::Start(block_id * BLOCK_SIZE as u64))?;
        let written = self.file.write(buf)?;
        check_transfer(written, buf.len())
    }
}
