mod dir_entry;

use core::ops::Range;

pub use self::dir_entry::*;
use crate::volume::Geometry;
use crate::{ClusterError, ClusterId, SectorId};

#[derive(Debug)]
pub struct DataArea {
    range: Range<SectorId>,
    cluster_sectors: u64,
}

impl DataArea {
    pub fn new(geometry: &Geometry) -> Self {
        let start = geometry.data_area();
        let end = SectorId::new(geometry.total_sectors() as u64);
        Self {
            range: start..end,
            cluster_sectors: geometry.cluster_sectors() as u64,
        }
    }

    pub const fn cluster_sectors(&self) -> u64 {
        self.cluster_sectors
    }

    /// 返回簇编号指向的一系列扇区
    ///
    /// 数据区不占有`ClusterId::MIN`前面的簇，所以需要转换计算得到索引指向的扇区。
    pub fn cluster(&self, id: ClusterId) -> Result<Range<SectorId>, ClusterError> {
        let id = id.validate()?;
        let start = self.range.start + (id - ClusterId::MIN) as u64 * self.cluster_sectors;
        if start + self.cluster_sectors > self.range.end {
            return Err(ClusterError::Reserved);
        }
        Ok(start..start + self.cluster_sectors)
    }
}
