use binrw::{BinRead, BinWrite};
use uguid::Guid;

use crate::{encode, to_sector, ENTRIES_LBA, ENTRY_COUNT, ENTRY_SIZE, SECTOR_SIZE};

/// # GPT头
///
/// 以"EFI PART"开头，占92字节，其余部分填0。
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little, magic = b"EFI PART")]
pub struct GptHeader {
    /// 版本号 1.0
    revision: u32,

    /// 头的字节量，固定为92
    header_size: u32,

    /// 头的CRC32，计算时本字段视为0
    header_crc32: u32,

    _reserved: u32,

    /// 本头所在的LBA
    my_lba: u64,

    /// 另一份头所在的LBA
    alternate_lba: u64,

    /// 分区可用的第一个LBA
    first_usable_lba: u64,

    /// 分区可用的最后一个LBA
    last_usable_lba: u64,

    #[br(map = |raw: [u8; 16]| Guid::from_bytes(raw))]
    #[bw(map = |guid: &Guid| guid.to_bytes())]
    disk_guid: Guid,

    /// 分区项数组的起始LBA
    entries_lba: u64,

    entry_count: u32,

    entry_size: u32,

    /// 整个分区项数组的CRC32
    entries_crc32: u32,
}

impl GptHeader {
    pub const SIZE: u32 = 92;

    pub const REVISION: u32 = 0x0001_0000;

    pub fn new(
        total_sectors: u64,
        first_usable_lba: u64,
        last_usable_lba: u64,
        disk_guid: Guid,
    ) -> Self {
        Self {
            revision: Self::REVISION,
            header_size: Self::SIZE,
            header_crc32: 0,
            _reserved: 0,
            my_lba: 1,
            alternate_lba: total_sectors - 1,
            first_usable_lba,
            last_usable_lba,
            disk_guid,
            entries_lba: ENTRIES_LBA,
            entry_count: ENTRY_COUNT as u32,
            entry_size: ENTRY_SIZE as u32,
            entries_crc32: 0,
        }
    }

    /// 把CRC字段视为0，计算整个头的CRC32
    pub fn compute_checksum(&self) -> u32 {
        let mut header = self.clone();
        header.header_crc32 = 0;
        crc32fast::hash(&encode(&header))
    }

    pub(crate) fn set_entries_crc32(&mut self, crc: u32) {
        self.entries_crc32 = crc;
    }

    pub(crate) fn update_checksum(&mut self) {
        self.header_crc32 = self.compute_checksum();
    }

    /// 交换本LBA与备份LBA，重新计算校验和
    pub fn to_backup(&self) -> Self {
        let mut backup = self.clone();
        core::mem::swap(&mut backup.my_lba, &mut backup.alternate_lba);
        backup.update_checksum();
        backup
    }

    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        to_sector(self)
    }

    pub const fn revision(&self) -> u32 {
        self.revision
    }

    pub const fn header_size(&self) -> u32 {
        self.header_size
    }

    pub const fn header_crc32(&self) -> u32 {
        self.header_crc32
    }

    pub const fn my_lba(&self) -> u64 {
        self.my_lba
    }

    pub const fn alternate_lba(&self) -> u64 {
        self.alternate_lba
    }

    pub const fn first_usable_lba(&self) -> u64 {
        self.first_usable_lba
    }

    pub const fn last_usable_lba(&self) -> u64 {
        self.last_usable_lba
    }

    pub const fn disk_guid(&self) -> Guid {
        self.disk_guid
    }

    pub const fn entries_lba(&self) -> u64 {
        self.entries_lba
    }

    pub const fn entry_count(&self) -> u32 {
        self.entry_count
    }

    pub const fn entry_size(&self) -> u32 {
        self.entry_size
    }

    pub const fn entries_crc32(&self) -> u32 {
        self.entries_crc32
    }
}

#[cfg(test)]
mod tests {
    use uguid::guid;

    use super::GptHeader;
    use crate::{decode, encode};

    fn header() -> GptHeader {
        GptHeader::new(
            2048,
            34,
            2014,
            guid!("01234567-89AB-CDEF-0123-456789ABCDEF"),
        )
    }

    #[test]
    fn field_offsets() {
        let mut header = header();
        header.set_entries_crc32(0xDEAD_BEEF);
        header.update_checksum();
        let bytes = header.to_bytes();

        assert_eq!(GptHeader::SIZE as usize, encode(&header).len());
        assert_eq!(b"EFI PART", &bytes[0..8]);
        assert_eq!(0x0001_0000u32.to_le_bytes(), bytes[8..12]);
        assert_eq!(92u32.to_le_bytes(), bytes[12..16]);
        assert_eq!(header.header_crc32().to_le_bytes(), bytes[16..20]);
        assert_eq!([0u8; 4], bytes[20..24]);
        assert_eq!(1u64.to_le_bytes(), bytes[24..32]);
        assert_eq!(2047u64.to_le_bytes(), bytes[32..40]);
        assert_eq!(34u64.to_le_bytes(), bytes[40..48]);
        assert_eq!(2014u64.to_le_bytes(), bytes[48..56]);
        assert_eq!([0x67u8, 0x45, 0x23, 0x01, 0xAB, 0x89, 0xEF, 0xCD], bytes[56..64]);
        assert_eq!(2u64.to_le_bytes(), bytes[72..80]);
        assert_eq!(128u32.to_le_bytes(), bytes[80..84]);
        assert_eq!(128u32.to_le_bytes(), bytes[84..88]);
        assert_eq!(0xDEAD_BEEFu32.to_le_bytes(), bytes[88..92]);
        assert!(bytes[92..].iter().all(|&b| b == 0));
    }

    #[test]
    fn checksum_ignores_own_field() {
        let mut header = header();
        header.update_checksum();
        let crc = header.header_crc32();
        header.update_checksum();
        assert_eq!(crc, header.header_crc32());

        let mut raw = header.to_bytes()[..92].to_vec();
        raw[16..20].fill(0);
        assert_eq!(crc, crc32fast::hash(&raw));
    }

    #[test]
    fn bad_magic() {
        let mut bytes = header().to_bytes();
        bytes[0] = b'X';
        assert!(decode::<GptHeader>(&bytes).is_err());
        assert_eq!(header(), decode(&header().to_bytes()).unwrap());
    }

    #[test]
    fn backup_swaps_lbas() {
        let mut primary = header();
        primary.update_checksum();
        let backup = primary.to_backup();

        assert_eq!(2047, backup.my_lba());
        assert_eq!(1, backup.alternate_lba());
        assert_eq!(2, backup.entries_lba());
        assert_eq!(backup.compute_checksum(), backup.header_crc32());
        assert_ne!(primary.header_crc32(), backup.header_crc32());
        assert_eq!(primary, backup.to_backup());
    }
}
