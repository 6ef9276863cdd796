use binrw::{BinRead, BinWrite};
use uguid::Guid;

use crate::{encode, ENTRY_SIZE};

/// 分区名的UTF-16码元数
pub const NAME_LEN: usize = 36;

/// # 分区项
///
/// 类型GUID全为0表示空闲。
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PartitionEntry {
    #[br(map = |raw: [u8; 16]| Guid::from_bytes(raw))]
    #[bw(map = |guid: &Guid| guid.to_bytes())]
    type_guid: Guid,

    #[br(map = |raw: [u8; 16]| Guid::from_bytes(raw))]
    #[bw(map = |guid: &Guid| guid.to_bytes())]
    unique_guid: Guid,

    first_lba: u64,

    /// 包含在分区内
    last_lba: u64,

    attributes: u64,

    /// UTF-16LE，不足处填0
    name: [u16; NAME_LEN],
}

impl PartitionEntry {
    pub const EMPTY: Self = Self {
        type_guid: Guid::ZERO,
        unique_guid: Guid::ZERO,
        first_lba: 0,
        last_lba: 0,
        attributes: 0,
        name: [0; NAME_LEN],
    };

    /// 名字超过36个码元时截断
    pub fn new(type_guid: Guid, unique_guid: Guid, first_lba: u64, last_lba: u64, name: &str) -> Self {
        let mut units = [0; NAME_LEN];
        for (unit, c) in units.iter_mut().zip(name.encode_utf16()) {
            *unit = c;
        }

        Self {
            type_guid,
            unique_guid,
            first_lba,
            last_lba,
            attributes: 0,
            name: units,
        }
    }

    pub fn is_used(&self) -> bool {
        self.type_guid != Guid::ZERO
    }

    pub const fn type_guid(&self) -> Guid {
        self.type_guid
    }

    pub const fn unique_guid(&self) -> Guid {
        self.unique_guid
    }

    pub const fn first_lba(&self) -> u64 {
        self.first_lba
    }

    pub const fn last_lba(&self) -> u64 {
        self.last_lba
    }

    pub const fn attributes(&self) -> u64 {
        self.attributes
    }

    pub fn name(&self) -> String {
        let len = self.name.iter().position(|&c| c == 0).unwrap_or(NAME_LEN);
        String::from_utf16_lossy(&self.name[..len])
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut bytes = [0; ENTRY_SIZE];
        bytes.copy_from_slice(&encode(self));
        bytes
    }
}

#[cfg(test)]
mod tests {
    use uguid::guid;

    use super::{PartitionEntry, NAME_LEN};
    use crate::{decode, EFI_SYSTEM_PARTITION, ENTRY_SIZE};

    #[test]
    fn field_offsets() {
        let unique = guid!("00112233-4455-6677-8899-AABBCCDDEEFF");
        let entry = PartitionEntry::new(EFI_SYSTEM_PARTITION, unique, 2048, 4095, "EFI");
        let bytes = entry.to_bytes();

        assert_eq!(EFI_SYSTEM_PARTITION.to_bytes(), bytes[0..16]);
        assert_eq!(unique.to_bytes(), bytes[16..32]);
        assert_eq!(2048u64.to_le_bytes(), bytes[32..40]);
        assert_eq!(4095u64.to_le_bytes(), bytes[40..48]);
        assert_eq!(0u64.to_le_bytes(), bytes[48..56]);
        assert_eq!(*b"E\0F\0I\0", bytes[56..62]);
        assert!(bytes[62..ENTRY_SIZE].iter().all(|&b| b == 0));
    }

    #[test]
    fn name_is_truncated() {
        let long = "EFI SYSTEM PARTITION WITH A VERY LONG NAME";
        let entry = PartitionEntry::new(EFI_SYSTEM_PARTITION, EFI_SYSTEM_PARTITION, 34, 40, long);
        assert_eq!(&long[..NAME_LEN], entry.name());

        let parsed: PartitionEntry = decode(&entry.to_bytes()).unwrap();
        assert_eq!(entry, parsed);
    }

    #[test]
    fn empty() {
        assert!(!PartitionEntry::EMPTY.is_used());
        assert!(PartitionEntry::EMPTY.to_bytes().iter().all(|&b| b == 0));
    }
}
