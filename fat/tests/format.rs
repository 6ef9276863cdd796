use block_dev::{BlockDevice, RamDisk};
use fat::volume::data::ShortDirEntry;
use fat::volume::fat::FatTable;
use fat::volume::reserved::{Bpb, ClusterSectors, FsInfo};
use fat::{Arch, ClusterId, EfiLayout, FormatError, decode};

const BASE: u64 = 2048;
/// 72MiB，每簇2个扇区
const SECTORS: u64 = 147_456;

fn kernel(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 7 + 3) as u8).collect()
}

fn format(kernel: Option<&[u8]>, arch: Arch) -> (EfiLayout, RamDisk) {
    let layout = EfiLayout::plan(SECTORS, kernel.map(|k| k.len() as u64), arch).unwrap();
    let mut disk = RamDisk::new(BASE + SECTORS + 2048);
    layout.write(&mut disk, BASE, kernel, 0x1234_5678).unwrap();
    (layout, disk)
}

fn partition_offset(layout: &EfiLayout, id: ClusterId) -> usize {
    (BASE * 512 + layout.cluster_offset(id)) as usize
}

fn dirents(layout: &EfiLayout, disk: &RamDisk, id: ClusterId) -> Vec<ShortDirEntry> {
    let start = partition_offset(layout, id);
    let cluster = &disk.as_bytes()[start..start + layout.geometry().cluster_bytes() as usize];
    cluster
        .chunks_exact(32)
        .take_while(|raw| raw[0] != 0)
        .map(|raw| decode(raw).unwrap())
        .collect()
}

#[test]
fn one_gib_disk_with_kernel() {
    let layout = EfiLayout::plan(2_097_152 - 2 * 2048, Some(100_000), Arch::X64).unwrap();
    let geometry = layout.geometry();
    assert_eq!(ClusterSectors::S2, geometry.cluster_sectors());
    assert_eq!(1024, geometry.cluster_bytes());

    let run = layout.kernel().unwrap();
    assert_eq!(ClusterId::new(5), run.first);
    assert_eq!(98, run.clusters);

    let chain = layout.fat().chain(run.first).unwrap();
    assert_eq!(98, chain.len());
    assert_eq!(ClusterId::new(102), *chain.last().unwrap());
    for (i, id) in chain.iter().enumerate().take(97) {
        assert_eq!(ClusterId::new(6 + i as u32), layout.fat().get(*id));
    }
    assert_eq!(ClusterId::EOF, layout.fat().get(ClusterId::new(102)));

    let boot = &layout.directories()[2];
    assert_eq!(EfiLayout::BOOT_DIR, boot.cluster);
    assert_eq!(b"BOOTX64 EFI", boot.entries[2].name());
    assert_eq!(ClusterId::new(5), boot.entries[2].cluster_id());
    assert_eq!(100_000, boot.entries[2].size());
}

#[test]
fn boot_region() {
    let (_, disk) = format(Some(&kernel(5000)), Arch::X64);

    let bpb: Bpb = decode(disk.block(BASE)).unwrap();
    assert_eq!(SECTORS as u32, bpb.total_sectors());
    assert_eq!(2048, bpb.hidden_sectors());
    assert_eq!(0x1234_5678, bpb.volume_id());
    assert_eq!(disk.block(BASE), disk.block(BASE + 6));

    let fs_info: FsInfo = decode(disk.block(BASE + 1)).unwrap();
    assert_eq!(FsInfo::UNKNOWN, fs_info.free_count());
    assert_eq!(FsInfo::UNKNOWN, fs_info.next_free());
    assert_eq!(disk.block(BASE + 1), disk.block(BASE + 7));

    // 分区之前的扇区没有被碰过
    assert!(disk.blocks(0, BASE).iter().all(|&b| b == 0));
}

#[test]
fn fat_copies_are_identical() {
    let (layout, disk) = format(Some(&kernel(70_000)), Arch::X64);
    let geometry = layout.geometry();
    let sectors = geometry.fat_sectors() as u64;

    let first = disk.blocks(BASE + geometry.fat_area(0).get(), sectors);
    let second = disk.blocks(BASE + geometry.fat_area(1).get(), sectors);
    assert_eq!(first, second);
    assert_eq!(layout.fat().to_bytes(), first);
    assert_eq!(0x0FFF_FFF8u32.to_le_bytes(), first[0..4]);
    assert_eq!(0x0FFF_FFFFu32.to_le_bytes(), first[4..8]);
}

#[test]
fn directory_tree() {
    let (layout, disk) = format(Some(&kernel(3000)), Arch::X64);

    let root = dirents(&layout, &disk, EfiLayout::ROOT);
    assert_eq!(1, root.len());
    assert_eq!(b"EFI        ", root[0].name());
    assert!(root[0].is_directory());
    assert_eq!(EfiLayout::EFI_DIR, root[0].cluster_id());

    let efi = dirents(&layout, &disk, EfiLayout::EFI_DIR);
    let names: Vec<_> = efi.iter().map(|d| *d.name()).collect();
    assert_eq!(vec![*b".          ", *b"..         ", *b"BOOT       "], names);
    assert_eq!(EfiLayout::EFI_DIR, efi[0].cluster_id());
    assert_eq!(ClusterId::FREE, efi[1].cluster_id());
    assert_eq!(EfiLayout::BOOT_DIR, efi[2].cluster_id());

    let boot = dirents(&layout, &disk, EfiLayout::BOOT_DIR);
    assert_eq!(3, boot.len());
    assert_eq!(EfiLayout::BOOT_DIR, boot[0].cluster_id());
    assert_eq!(EfiLayout::EFI_DIR, boot[1].cluster_id());
    assert_eq!(b"BOOTX64 EFI", boot[2].name());
    assert_eq!(ClusterId::new(5), boot[2].cluster_id());
    assert_eq!(3000, boot[2].size());
    assert!(!boot[2].is_directory());
}

#[test]
fn payload_is_not_padded() {
    let payload = kernel(2500);
    let layout = EfiLayout::plan(SECTORS, Some(payload.len() as u64), Arch::X64).unwrap();
    let mut disk = RamDisk::new(BASE + SECTORS + 2048);

    // 预先弄脏载荷所在的三个簇
    let start = partition_offset(&layout, FatTable::PAYLOAD);
    disk.write_blocks(start as u64 / 512, &[0xEE; 3 * 1024])
        .unwrap();

    layout.write(&mut disk, BASE, Some(&payload), 1).unwrap();

    let bytes = disk.as_bytes();
    assert_eq!(payload.as_slice(), &bytes[start..start + payload.len()]);
    assert!(
        bytes[start + payload.len()..start + 3 * 1024]
            .iter()
            .all(|&b| b == 0xEE)
    );
}

#[test]
fn without_kernel() {
    let (layout, disk) = format(None, Arch::X64);

    let boot = dirents(&layout, &disk, EfiLayout::BOOT_DIR);
    assert_eq!(2, boot.len());
    assert!(boot.iter().all(ShortDirEntry::is_relative));

    assert!(layout.kernel().is_none());
    assert_eq!(ClusterId::FREE, layout.fat().get(FatTable::PAYLOAD));
}

#[test]
fn empty_kernel_has_no_clusters() {
    let (layout, disk) = format(Some(&[]), Arch::X64);

    let boot = dirents(&layout, &disk, EfiLayout::BOOT_DIR);
    assert_eq!(3, boot.len());
    assert_eq!(ClusterId::FREE, boot[2].cluster_id());
    assert_eq!(0, boot[2].size());
    assert_eq!(ClusterId::FREE, layout.fat().get(FatTable::PAYLOAD));
}

#[test]
fn boot_file_follows_arch() {
    let (layout, disk) = format(Some(&kernel(10)), Arch::Aa64);
    let boot = dirents(&layout, &disk, EfiLayout::BOOT_DIR);
    assert_eq!(b"BOOTAA64EFI", boot[2].name());
}

#[test]
fn payload_must_match_plan() {
    let layout = EfiLayout::plan(SECTORS, Some(10), Arch::X64).unwrap();
    let mut disk = RamDisk::new(BASE + SECTORS);
    assert!(matches!(
        layout.write(&mut disk, BASE, Some(&[0; 11]), 0),
        Err(FormatError::PayloadMismatch { .. })
    ));
    assert!(matches!(
        layout.write(&mut disk, BASE, None, 0),
        Err(FormatError::PayloadMismatch { .. })
    ));
    assert!(disk.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn sink_too_small() {
    let layout = EfiLayout::plan(SECTORS, None, Arch::X64).unwrap();
    let mut disk = RamDisk::new(BASE + 64);
    match layout.write(&mut disk, BASE, None, 0) {
        Err(FormatError::Io(e)) => assert_eq!(std::io::ErrorKind::UnexpectedEof, e.kind()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn partition_too_small() {
    assert!(matches!(
        EfiLayout::plan(20_000, None, Arch::X64),
        Err(FormatError::TooFewClusters { .. })
    ));
}
