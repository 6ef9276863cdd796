//! EFI系统分区的完整布局
//!
//! ```text
//! /           (簇2)
//! └── EFI     (簇3)
//!     └── BOOT    (簇4)
//!         └── BOOTX64.EFI (簇5起)
//! ```

use block_dev::{BlockDevice, SectorWriter};

use crate::volume::data::{DataArea, ShortDirEntry, DIR_ENTRY_SIZE};
use crate::volume::fat::FatTable;
use crate::volume::reserved::{Bpb, FsInfo};
use crate::volume::{Geometry, FAT_COUNT};
use crate::{Arch, ClusterId, FormatError, SectorId};

/// 一个目录簇及其中的目录项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub cluster: ClusterId,
    pub entries: Vec<ShortDirEntry>,
}

/// 载荷占用的连续簇
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelRun {
    pub first: ClusterId,
    pub clusters: u32,
    pub size: u32,
}

/// 由`(扇区数, 载荷大小)`纯计算得到的布局，不含任何I/O。
#[derive(Debug, Clone)]
pub struct EfiLayout {
    geometry: Geometry,
    fat: FatTable,
    directories: Vec<Directory>,
    kernel: Option<KernelRun>,
}

impl EfiLayout {
    pub const ROOT: ClusterId = FatTable::DIRECTORIES[0];
    pub const EFI_DIR: ClusterId = FatTable::DIRECTORIES[1];
    pub const BOOT_DIR: ClusterId = FatTable::DIRECTORIES[2];

    pub fn plan(
        total_sectors: u64,
        kernel_size: Option<u64>,
        arch: Arch,
    ) -> Result<Self, FormatError> {
        Self::with_geometry(Geometry::compute(total_sectors)?, kernel_size, arch)
    }

    pub fn with_geometry(
        geometry: Geometry,
        kernel_size: Option<u64>,
        arch: Arch,
    ) -> Result<Self, FormatError> {
        let fat = FatTable::build(&geometry, kernel_size)?;

        let kernel = kernel_size.map(|size| {
            let clusters = geometry.clusters_for(size);
            KernelRun {
                // 空文件不占簇，首簇记为0
                first: if clusters == 0 {
                    ClusterId::FREE
                } else {
                    FatTable::PAYLOAD
                },
                clusters,
                // FatTable::build已检查过大小
                size: size as u32,
            }
        });

        let mut boot = vec![
            ShortDirEntry::new_cwd(Self::BOOT_DIR),
            ShortDirEntry::new_parent(Self::EFI_DIR),
        ];
        if let Some(run) = kernel {
            boot.push(ShortDirEntry::new_file(
                arch.boot_name(),
                Arch::boot_ext(),
                run.first,
                run.size,
            ));
        }

        let directories = vec![
            Directory {
                cluster: Self::ROOT,
                entries: vec![ShortDirEntry::new_directory("EFI", Self::EFI_DIR)],
            },
            Directory {
                cluster: Self::EFI_DIR,
                entries: vec![
                    ShortDirEntry::new_cwd(Self::EFI_DIR),
                    ShortDirEntry::new_parent(Self::ROOT),
                    ShortDirEntry::new_directory("BOOT", Self::BOOT_DIR),
                ],
            },
            Directory {
                cluster: Self::BOOT_DIR,
                entries: boot,
            },
        ];

        log::debug!(
            "layout: {} sectors, {} bytes per cluster, {} sectors per FAT, kernel {kernel:?}",
            geometry.total_sectors(),
            geometry.cluster_bytes(),
            geometry.fat_sectors(),
        );

        Ok(Self {
            geometry,
            fat,
            directories,
            kernel,
        })
    }

    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub const fn fat(&self) -> &FatTable {
        &self.fat
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    pub const fn kernel(&self) -> Option<KernelRun> {
        self.kernel
    }

    /// 簇在分区内的起始字节偏移
    pub fn cluster_offset(&self, id: ClusterId) -> u64 {
        self.geometry.data_area().byte_offset()
            + (id - ClusterId::MIN) as u64 * self.geometry.cluster_bytes() as u64
    }

    /// 将布局写入`dev`上从`base`扇区开始的分区。
    ///
    /// `kernel`必须与规划时给出的载荷大小一致。
    pub fn write<D: BlockDevice + ?Sized>(
        &self,
        dev: &mut D,
        base: u64,
        kernel: Option<&[u8]>,
        volume_id: u32,
    ) -> Result<(), FormatError> {
        let planned = self.kernel.map(|run| run.size as u64);
        let given = kernel.map(|bytes| bytes.len() as u64);
        if planned != given {
            return Err(FormatError::PayloadMismatch { planned, given });
        }

        let mut writer = SectorWriter::new(dev, base);

        let bpb = Bpb::new(&self.geometry, volume_id)
            .with_hidden_sectors(u32::try_from(base).unwrap_or(u32::MAX));
        let boot_sector = bpb.to_bytes();
        let fs_info = FsInfo::new().to_bytes();
        writer.write(0, 1, &boot_sector)?;
        writer.write(bpb.fs_info().get(), 1, &fs_info)?;
        writer.write(bpb.backup_boot().get(), 1, &boot_sector)?;
        writer.write(bpb.backup_boot().get() + 1, 1, &fs_info)?;
        log::info!("wrote boot sector, volume id {volume_id:#010x}");

        let fat = self.fat.to_bytes();
        let fat_sectors = self.geometry.fat_sectors() as u64;
        for index in 0..FAT_COUNT {
            writer.write(self.geometry.fat_area(index).get(), fat_sectors, &fat)?;
        }
        log::info!("wrote {FAT_COUNT} FATs of {fat_sectors} sectors");

        for dir in &self.directories {
            self.write_directory(&mut writer, dir)?;
        }

        if let (Some(run), Some(bytes)) = (self.kernel, kernel) {
            if run.clusters > 0 {
                self.write_payload(&mut writer, bytes, run.first)?;
                log::info!("wrote {} bytes of payload from cluster {:?}", run.size, run.first);
            }
        }

        Ok(())
    }
}

impl EfiLayout {
    /// 目录项依次写在簇的开头，簇的其余部分填0
    fn write_directory<D: BlockDevice + ?Sized>(
        &self,
        writer: &mut SectorWriter<'_, D>,
        dir: &Directory,
    ) -> Result<(), FormatError> {
        let mut buf = vec![0u8; self.geometry.cluster_bytes() as usize];
        if dir.entries.len() * DIR_ENTRY_SIZE > buf.len() {
            return Err(FormatError::NoSpace {
                needed: (dir.entries.len() * DIR_ENTRY_SIZE).div_ceil(buf.len()) as u32,
                available: 1,
            });
        }

        for (slot, dirent) in buf.chunks_exact_mut(DIR_ENTRY_SIZE).zip(&dir.entries) {
            slot.copy_from_slice(&dirent.to_bytes());
        }

        let sectors = self.cluster_sectors(dir.cluster)?;
        writer.write(sectors.get(), self.geometry.cluster_sectors() as u64, &buf)?;
        log::debug!("wrote {} entries into cluster {:?}", dir.entries.len(), dir.cluster);
        Ok(())
    }

    /// 载荷原样写入，最后一个簇中载荷之后的字节保持原样
    fn write_payload<D: BlockDevice + ?Sized>(
        &self,
        writer: &mut SectorWriter<'_, D>,
        bytes: &[u8],
        first: ClusterId,
    ) -> Result<(), FormatError> {
        let sector = self.cluster_sectors(first)?;
        writer.write_at(sector.get(), 0, bytes)?;
        Ok(())
    }

    fn cluster_sectors(&self, id: ClusterId) -> Result<SectorId, FormatError> {
        DataArea::new(&self.geometry)
            .cluster(id)
            .map(|range| range.start)
            .map_err(|_| FormatError::NoSpace {
                needed: u32::from(id),
                available: self.geometry.data_clusters(),
            })
    }
}
