use binrw::{BinRead, BinWrite};

use crate::volume::{Geometry, RESERVED_SECTORS};
use crate::{encode, ClusterId, SectorId, SECTOR_SIZE};

/// # 启动扇区（BPB）
///
/// 分区的0号扇区，6号扇区有一份相同的备份。
/// EFI固件不执行其中的启动代码，跳转指令只是原地循环。
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct Bpb {
    /// EB FE 90
    bs_jmp_boot: [u8; 3],

    /// "EFIBOOT "
    bs_oem_name: [u8; 8],

    /// 一个扇区的字节量
    byts_per_sec: SectorBytes,

    /// 一个簇的扇区数
    sec_per_clus: ClusterSectors,

    /// 保留区的扇区数
    rsvd_sec_cnt: u16,

    /// FAT份数，恒为2
    num_fats: u8,

    /// FAT32的根目录在数据区，此处为0
    _root_ent_cnt: u16,

    /// 总扇区数改记在`tot_sec32`
    _tot_sec16: u16,

    /// 物理媒介的类型
    pub media: Media,

    /// FAT大小改记在`fat_sz32`
    _fat_sz16: u16,

    /// 假想的CHS几何：每道63扇区
    sec_per_trk: u16,

    /// 假想的CHS几何：64个磁头
    num_heads: u16,

    /// 此卷之前的扇区数，即分区的起始LBA
    hidd_sec: u32,

    /// 分区的扇区总数
    tot_sec32: u32,

    /* FAT32扩展字段 */
    /// FAT占用扇区数
    fat_sz32: u32,

    ext_flags: ExtFlags,

    /// 版本0.0
    fs_ver: u16,

    /// 根目录首个簇的编号，恒为2
    root_clus: u32,

    /// FSInfo位于1号扇区
    fs_info: u16,

    /// 启动扇区备份位于6号扇区
    bk_boot_sec: u16,

    _reserved: [u8; 12],

    /// 0x80：硬盘
    drv_num: u8,

    _reserved1: u8,

    /// 0x29：其后的卷序列号、卷标、类型字段有效
    boot_sig: BootSignature,

    /// 卷序列号，随机生成
    vol_id: u32,

    /// "EFI SYSTEM "，根目录中不另设卷标项
    vol_lab: [u8; 11],

    /// "FAT32   "，仅供显示
    fil_sys_type: [u8; 8],

    _boot_code: [u8; 420],

    /// [0x55, 0xAA]
    signature_word: [u8; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(repr = u16)]
#[repr(u16)]
pub enum SectorBytes {
    B512 = 512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(repr = u8)]
#[repr(u8)]
pub enum ClusterSectors {
    S1 = 1,
    S2 = 2,
    S4 = 4,
    S8 = 8,
    S16 = 16,
    S32 = 32,
    S64 = 64,
    S128 = 128,
}

impl ClusterSectors {
    pub const fn double(self) -> Option<Self> {
        match self {
            Self::S1 => Some(Self::S2),
            Self::S2 => Some(Self::S4),
            Self::S4 => Some(Self::S8),
            Self::S8 => Some(Self::S16),
            Self::S16 => Some(Self::S32),
            Self::S32 => Some(Self::S64),
            Self::S64 => Some(Self::S128),
            Self::S128 => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(repr = u8)]
#[repr(u8)]
pub enum Media {
    Fixed = 0xF8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(repr = u8)]
#[repr(u8)]
pub enum BootSignature {
    Set = 0x29,
}

/// 为0表示运行时两份FAT保持镜像
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, BinRead, BinWrite)]
pub struct ExtFlags(u16);

impl Bpb {
    pub fn new(geometry: &Geometry, volume_id: u32) -> Self {
        Self {
            bs_jmp_boot: [0xEB, 0xFE, 0x90],
            bs_oem_name: *b"EFIBOOT ",
            byts_per_sec: SectorBytes::B512,
            sec_per_clus: geometry.cluster_sectors(),
            rsvd_sec_cnt: RESERVED_SECTORS as u16,
            num_fats: 2,
            _root_ent_cnt: 0,
            _tot_sec16: 0,
            media: Media::Fixed,
            _fat_sz16: 0,
            sec_per_trk: 63,
            num_heads: 64,
            hidd_sec: 0,
            tot_sec32: geometry.total_sectors(),
            fat_sz32: geometry.fat_sectors(),
            ext_flags: ExtFlags::default(),
            fs_ver: 0x0,
            root_clus: ClusterId::MIN.into(),
            fs_info: 1,
            bk_boot_sec: 6,
            _reserved: [0; 12],
            drv_num: 0x80,
            _reserved1: 0,
            boot_sig: BootSignature::Set,
            vol_id: volume_id,
            vol_lab: *b"EFI SYSTEM ",
            fil_sys_type: *b"FAT32   ",
            _boot_code: [0; 420],
            signature_word: [0x55, 0xAA],
        }
    }

    /// 设置卷之前的隐藏扇区数（分区起始LBA）
    pub fn with_hidden_sectors(mut self, sectors: u32) -> Self {
        self.hidd_sec = sectors;
        self
    }

    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        let mut sector = [0; SECTOR_SIZE];
        sector.copy_from_slice(&encode(self));
        sector
    }

    pub const fn fs_info(&self) -> SectorId {
        SectorId::new(self.fs_info as u64)
    }

    pub const fn backup_boot(&self) -> SectorId {
        SectorId::new(self.bk_boot_sec as u64)
    }

    pub const fn fat_area(&self) -> SectorId {
        SectorId::new(self.rsvd_sec_cnt as u64)
    }

    pub const fn fat_count(&self) -> usize {
        self.num_fats as usize
    }

    pub const fn fat_sectors(&self) -> u32 {
        self.fat_sz32
    }

    pub const fn cluster_sectors(&self) -> ClusterSectors {
        self.sec_per_clus
    }

    pub const fn total_sectors(&self) -> u32 {
        self.tot_sec32
    }

    pub const fn root_cluster(&self) -> ClusterId {
        ClusterId::new(self.root_clus)
    }

    pub const fn volume_id(&self) -> u32 {
        self.vol_id
    }

    pub const fn hidden_sectors(&self) -> u32 {
        self.hidd_sec
    }

    pub fn data_area(&self) -> SectorId {
        self.fat_area() + self.num_fats as u64 * self.fat_sz32 as u64
    }
}

#[cfg(test)]
mod tests {
    use super::{BootSignature, Bpb, ClusterSectors};
    use crate::volume::Geometry;
    use crate::{decode, ClusterId, SectorId};

    #[test]
    fn field_offsets() {
        let geometry = Geometry::compute(2_093_056).unwrap();
        let bytes = Bpb::new(&geometry, 0xDEAD_BEEF).to_bytes();

        assert_eq!([0xEBu8, 0xFE, 0x90], bytes[0..3]);
        assert_eq!(b"EFIBOOT ", &bytes[3..11]);
        assert_eq!(512u16.to_le_bytes(), bytes[11..13]);
        assert_eq!(2, bytes[13]);
        assert_eq!(32u16.to_le_bytes(), bytes[14..16]);
        assert_eq!(2, bytes[16]);
        assert_eq!(0xF8, bytes[21]);
        assert_eq!(2_093_056u32.to_le_bytes(), bytes[32..36]);
        assert_eq!(8176u32.to_le_bytes(), bytes[36..40]);
        assert_eq!(2u32.to_le_bytes(), bytes[44..48]);
        assert_eq!(1u16.to_le_bytes(), bytes[48..50]);
        assert_eq!(6u16.to_le_bytes(), bytes[50..52]);
        assert_eq!(0x80, bytes[64]);
        assert_eq!(0x29, bytes[66]);
        assert_eq!(0xDEAD_BEEFu32.to_le_bytes(), bytes[67..71]);
        assert_eq!(b"EFI SYSTEM ", &bytes[71..82]);
        assert_eq!(b"FAT32   ", &bytes[82..90]);
        assert_eq!([0x55u8, 0xAA], bytes[510..512]);
    }

    #[test]
    fn parse_back() {
        let geometry = Geometry::compute(2_093_056).unwrap();
        let bpb = Bpb::new(&geometry, 7).with_hidden_sectors(2048);
        let parsed: Bpb = decode(&bpb.to_bytes()).unwrap();

        assert_eq!(bpb, parsed);
        assert_eq!(ClusterSectors::S2, parsed.cluster_sectors());
        assert_eq!(SectorId::new(1), parsed.fs_info());
        assert_eq!(SectorId::new(6), parsed.backup_boot());
        assert_eq!(geometry.data_area(), parsed.data_area());
        assert_eq!(ClusterId::MIN, parsed.root_cluster());
        assert_eq!(2048, parsed.hidden_sectors());
        assert_eq!(BootSignature::Set, parsed.boot_sig);
    }
}
