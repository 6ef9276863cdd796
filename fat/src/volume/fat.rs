//! 文件分配表，每个条目存放簇链表中下一个簇的编号。

use crate::volume::Geometry;
use crate::{ClusterError, ClusterId, FormatError};

/// 内存中的一份FAT，写盘时原样写两份。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatTable {
    entries: Vec<ClusterId>,
    max: ClusterId,
    data_clusters: u32,
}

impl FatTable {
    /// 根目录、`/EFI`、`/EFI/BOOT`各占一个簇
    pub const DIRECTORIES: [ClusterId; 3] =
        [ClusterId::new(2), ClusterId::new(3), ClusterId::new(4)];

    /// 载荷的首簇，紧跟在目录之后
    pub const PAYLOAD: ClusterId = ClusterId::new(5);

    /// 只含两个保留条目的空表
    pub fn new(geometry: &Geometry) -> Self {
        let mut entries = vec![ClusterId::FREE; geometry.fat_entries() as usize];
        entries[0] = ClusterId::MEDIA;
        entries[1] = ClusterId::EOF;

        Self {
            entries,
            max: geometry.max_cluster(),
            data_clusters: geometry.data_clusters(),
        }
    }

    /// 分配固定目录，并为`kernel_size`字节的载荷分配从5号簇起的连续簇。
    pub fn build(geometry: &Geometry, kernel_size: Option<u64>) -> Result<Self, FormatError> {
        let mut fat = Self::new(geometry);
        for dir in Self::DIRECTORIES {
            fat.allocate_run(dir, 1)?;
        }

        if let Some(size) = kernel_size {
            if size > u32::MAX as u64 {
                return Err(FormatError::KernelTooLarge { size });
            }
            fat.allocate_run(Self::PAYLOAD, geometry.clusters_for(size))?;
        }

        Ok(fat)
    }

    /// 分配`[first, first + count)`并串成链表，最后一个簇为[`ClusterId::EOF`]。
    pub fn allocate_run(&mut self, first: ClusterId, count: u32) -> Result<(), FormatError> {
        if count == 0 {
            return Ok(());
        }

        let last = u32::from(first)
            .checked_add(count - 1)
            .map(ClusterId::new)
            .filter(|last| *last <= self.max);
        let Some(last) = last else {
            return Err(FormatError::NoSpace {
                needed: (first - ClusterId::MIN).saturating_add(count),
                available: self.data_clusters,
            });
        };

        for id in u32::from(first)..u32::from(last) {
            self.entries[id as usize] = ClusterId::new(id + 1);
        }
        self.entries[usize::from(last)] = ClusterId::EOF;

        log::debug!("allocated clusters {first:?}..={last:?}");
        Ok(())
    }

    /// 第`id`个条目的原始值
    pub fn get(&self, id: ClusterId) -> ClusterId {
        self.entries[usize::from(id)]
    }

    /// 获取下一个簇编号。
    /// 若`id`指向未分配簇，则报错。
    /// `Ok(None)`表示`id`为链表上最后一个簇。
    pub fn next(&self, id: ClusterId) -> Result<Option<ClusterId>, ClusterError> {
        let id = self.validate_id(id)?;
        match self.entries[usize::from(id)].validate() {
            Ok(next) => Ok(Some(next)),
            Err(ClusterError::Eof) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 从`first`出发的整条链表
    pub fn chain(&self, first: ClusterId) -> Result<Vec<ClusterId>, ClusterError> {
        let mut chain = vec![first];
        let mut id = first;
        while let Some(next) = self.next(id)? {
            // 成环的链表不可能比数据区还长
            if chain.len() > self.data_clusters as usize {
                return Err(ClusterError::Reserved);
            }
            chain.push(next);
            id = next;
        }
        Ok(chain)
    }

    /// 小端序的原始字节，长度恰为整数个扇区
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|&id| u32::from(id).to_le_bytes())
            .collect()
    }
}

impl FatTable {
    fn validate_id(&self, id: ClusterId) -> Result<ClusterId, ClusterError> {
        id.validate().and_then(|id| {
            if id <= self.max {
                Ok(id)
            } else {
                Err(ClusterError::Reserved)
            }
        })
    }
}
