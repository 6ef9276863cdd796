use crate::volume::reserved::ClusterSectors;
use crate::{ClusterId, FormatError, SectorId, SECTOR_SIZE};

/// 保留区的扇区数
pub const RESERVED_SECTORS: u32 = 32;

/// FAT的份数
pub const FAT_COUNT: u32 = 2;

/// 少于此数的卷按定义不是FAT32
pub const MIN_CLUSTERS: u32 = 65525;

/// 28位簇号扣除保留值后可用的最大簇数
pub const MAX_CLUSTERS: u32 = 0x0FFF_FFF5;

pub const MAX_CLUSTER_BYTES: u32 = 32768;

/// 一个FAT扇区容纳的条目数
const SECTOR_ENTRIES: u32 = (SECTOR_SIZE / 4) as u32;

/// 由卷的扇区数唯一确定的几何参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    total_sectors: u32,
    cluster_sectors: ClusterSectors,
    fat_sectors: u32,
    data_clusters: u32,
}

impl Geometry {
    /// 自动选择每簇扇区数：默认2，簇数不足时退到1，簇数过多时逐级翻倍。
    pub fn compute(total_sectors: u64) -> Result<Self, FormatError> {
        let sectors = u32::try_from(total_sectors).map_err(|_| FormatError::VolumeTooLarge {
            sectors: total_sectors,
        })?;

        let mut cluster_sectors = ClusterSectors::S2;
        while sectors / cluster_sectors as u32 > MAX_CLUSTERS {
            match cluster_sectors.double() {
                Some(cs) => cluster_sectors = cs,
                None => break,
            }
        }

        match Self::with_cluster_sectors(total_sectors, cluster_sectors) {
            Err(FormatError::TooFewClusters { .. }) if cluster_sectors == ClusterSectors::S2 => {
                Self::with_cluster_sectors(total_sectors, ClusterSectors::S1)
            }
            result => result,
        }
    }

    pub fn with_cluster_sectors(
        total_sectors: u64,
        cluster_sectors: ClusterSectors,
    ) -> Result<Self, FormatError> {
        let total_sectors = u32::try_from(total_sectors).map_err(|_| FormatError::VolumeTooLarge {
            sectors: total_sectors,
        })?;

        let spc = cluster_sectors as u32;
        let bytes = spc * SECTOR_SIZE as u32;
        if bytes > MAX_CLUSTER_BYTES {
            return Err(FormatError::ClusterTooLarge { bytes });
        }

        // 按全部扇区估算簇数，FAT只会偏大不会偏小
        let total_clusters = total_sectors / spc;
        let fat_sectors = total_clusters
            .div_ceil(SECTOR_ENTRIES)
            .next_multiple_of(spc);

        let data_start = RESERVED_SECTORS as u64 + FAT_COUNT as u64 * fat_sectors as u64;
        let data_clusters = (total_sectors as u64).saturating_sub(data_start) / spc as u64;
        let data_clusters = data_clusters as u32;

        if data_clusters < MIN_CLUSTERS {
            return Err(FormatError::TooFewClusters {
                clusters: data_clusters,
            });
        }
        if data_clusters > MAX_CLUSTERS {
            return Err(FormatError::TooManyClusters {
                clusters: data_clusters,
            });
        }

        let geometry = Self {
            total_sectors,
            cluster_sectors,
            fat_sectors,
            data_clusters,
        };
        log::debug!("{geometry:?}");
        Ok(geometry)
    }

    pub const fn total_sectors(&self) -> u32 {
        self.total_sectors
    }

    pub const fn cluster_sectors(&self) -> ClusterSectors {
        self.cluster_sectors
    }

    pub const fn cluster_bytes(&self) -> u32 {
        self.cluster_sectors as u32 * SECTOR_SIZE as u32
    }

    /// 一份FAT占用的扇区数
    pub const fn fat_sectors(&self) -> u32 {
        self.fat_sectors
    }

    /// 一份FAT的条目数
    pub const fn fat_entries(&self) -> u32 {
        self.fat_sectors * SECTOR_ENTRIES
    }

    /// 第`index`份FAT的起始扇区
    pub const fn fat_area(&self, index: u32) -> SectorId {
        SectorId::new((RESERVED_SECTORS + index * self.fat_sectors) as u64)
    }

    pub const fn data_area(&self) -> SectorId {
        SectorId::new((RESERVED_SECTORS + FAT_COUNT * self.fat_sectors) as u64)
    }

    /// 数据区的簇数
    pub const fn data_clusters(&self) -> u32 {
        self.data_clusters
    }

    /// 数据区最后一个簇的编号
    pub const fn max_cluster(&self) -> ClusterId {
        ClusterId::new(self.data_clusters + 1)
    }

    /// 存放`bytes`字节需要的簇数
    pub const fn clusters_for(&self, bytes: u64) -> u32 {
        bytes.div_ceil(self.cluster_bytes() as u64) as u32
    }
}
