use block_dev::{BlockDevice, SectorWriter};
use uguid::Guid;

use crate::{
    build_protective_mbr, encode, Entropy, GptError, GptHeader, PartitionEntry, ENTRIES_SECTORS,
    ENTRY_COUNT, ENTRY_SIZE, MIN_FIRST_LBA,
};

/// 在内存中构造整张分区表，[`GptBuilder::write`]时一次写出。
#[derive(Debug, Clone)]
pub struct GptBuilder {
    total_sectors: u64,
    header: GptHeader,
    entries: Vec<PartitionEntry>,
}

impl GptBuilder {
    /// 主头位于LBA 1，备份头位于最后一个扇区，分区项数组为空。
    pub fn new_header(
        total_sectors: u64,
        first_usable_lba: u64,
        last_usable_lba: u64,
        entropy: &mut dyn Entropy,
    ) -> Result<Self, GptError> {
        // MBR + 两份(头 + 分区项数组)
        if total_sectors < 1 + 2 * (1 + ENTRIES_SECTORS) {
            return Err(GptError::DiskTooSmall {
                sectors: total_sectors,
            });
        }

        let disk_guid = entropy.guid()?;
        log::debug!("disk {disk_guid}, usable LBA {first_usable_lba}..={last_usable_lba}");

        Ok(Self {
            total_sectors,
            header: GptHeader::new(total_sectors, first_usable_lba, last_usable_lba, disk_guid),
            entries: vec![PartitionEntry::EMPTY; ENTRY_COUNT],
        })
    }

    /// 占用第一个空闲的分区项，返回其下标。
    ///
    /// 失败时分区表保持原样。
    pub fn add_partition(
        &mut self,
        first_lba: u64,
        last_lba: u64,
        name: &str,
        type_guid: Guid,
        entropy: &mut dyn Entropy,
    ) -> Result<usize, GptError> {
        if first_lba < MIN_FIRST_LBA {
            return Err(GptError::Overlap(name.into()));
        }
        if last_lba > self.header.last_usable_lba() {
            return Err(GptError::DoesNotFit(name.into()));
        }
        if first_lba > last_lba {
            return Err(GptError::InvalidRange(name.into()));
        }

        let slot = self
            .entries
            .iter()
            .position(|entry| !entry.is_used())
            .ok_or_else(|| GptError::TableFull(name.into()))?;

        let unique_guid = entropy.guid()?;
        self.entries[slot] = PartitionEntry::new(type_guid, unique_guid, first_lba, last_lba, name);
        log::info!("partition #{slot} '{name}': LBA {first_lba}..={last_lba}, {unique_guid}");
        Ok(slot)
    }

    /// 先算分区项数组的CRC32，再算头的CRC32。
    pub fn finalize_checksums(&mut self) {
        let entries_crc32 = crc32fast::hash(&self.entries_bytes());
        self.header.set_entries_crc32(entries_crc32);
        self.header.update_checksum();
        log::trace!(
            "entries crc32 {entries_crc32:#010x}, header crc32 {:#010x}",
            self.header.header_crc32()
        );
    }

    /// 除本LBA与备份LBA互换、校验和重算外，与主头逐字节相同
    pub fn backup_header(&self) -> GptHeader {
        self.header.to_backup()
    }

    pub const fn header(&self) -> &GptHeader {
        &self.header
    }

    pub fn entries(&self) -> &[PartitionEntry] {
        &self.entries
    }

    pub const fn total_sectors(&self) -> u64 {
        self.total_sectors
    }

    /// 全部128项连续排列，共16KiB
    pub fn entries_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ENTRY_COUNT * ENTRY_SIZE);
        for entry in &self.entries {
            bytes.extend_from_slice(&encode(entry));
        }
        bytes
    }

    /// 写出MBR、主头、主分区项数组、备份分区项数组与备份头。
    pub fn write<D: BlockDevice + ?Sized>(&mut self, dev: &mut D) -> Result<(), GptError> {
        self.finalize_checksums();

        let entries = self.entries_bytes();
        let backup_lba = self.header.alternate_lba();
        let mut writer = SectorWriter::new(dev, 0);

        writer.write(0, 1, &build_protective_mbr(self.total_sectors))?;
        writer.write(self.header.my_lba(), 1, &self.header.to_bytes())?;
        writer.write(self.header.entries_lba(), ENTRIES_SECTORS, &entries)?;
        writer.write(backup_lba - ENTRIES_SECTORS, ENTRIES_SECTORS, &entries)?;
        writer.write(backup_lba, 1, &self.backup_header().to_bytes())?;
        log::info!("wrote partition table, backup header at LBA {backup_lba}");
        Ok(())
    }
}
