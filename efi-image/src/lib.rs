//! Assemble a bootable disk image: protective MBR, GPT and a single
//! FAT32 EFI system partition holding `/EFI/BOOT/BOOT<ARCH>.EFI`.

mod block_file;
mod error;

use block_dev::BlockDevice;
use fat::{Arch, EfiLayout};
use gpt::{Entropy, GptBuilder, EFI_SYSTEM_PARTITION, MIN_FIRST_LBA};

pub use self::{block_file::BlockFile, error::Error};

/// Name of the only partition in the table.
pub const ESP_NAME: &str = "EFI SYSTEM PARTITION";

/// Sectors left free before the ESP and after it, 1MiB aligned.
pub const DEFAULT_ESP_MARGIN: u64 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageConfig {
    pub total_sectors: u64,
    pub arch: Arch,
    pub esp_margin: u64,
}

impl ImageConfig {
    pub const fn new(total_sectors: u64, arch: Arch) -> Self {
        Self {
            total_sectors,
            arch,
            esp_margin: DEFAULT_ESP_MARGIN,
        }
    }

    /// GPT usable range: everything between the two partition tables.
    pub fn usable_range(&self) -> Option<(u64, u64)> {
        let last = self.total_sectors.checked_sub(MIN_FIRST_LBA)?;
        (MIN_FIRST_LBA <= last).then_some((MIN_FIRST_LBA, last))
    }

    /// First and last (inclusive) LBA of the ESP.
    pub fn esp_range(&self) -> Option<(u64, u64)> {
        let first = self.esp_margin.max(MIN_FIRST_LBA);
        let last = self
            .total_sectors
            .checked_sub(self.esp_margin.max(MIN_FIRST_LBA))?
            .checked_sub(1)?;
        (first <= last).then_some((first, last))
    }
}

/// Write a complete image to `dev`.
///
/// Everything is planned before the first write, so geometry errors leave
/// `dev` untouched.
pub fn build_image<D: BlockDevice + ?Sized>(
    dev: &mut D,
    config: &ImageConfig,
    kernel: Option<&[u8]>,
    entropy: &mut dyn Entropy,
) -> Result<(), Error> {
    let too_small = || Error::DiskTooSmall {
        sectors: config.total_sectors,
    };
    let (first_usable, last_usable) = config.usable_range().ok_or_else(too_small)?;
    let (esp_first, esp_last) = config.esp_range().ok_or_else(too_small)?;
    if dev.block_count() < config.total_sectors {
        return Err(Error::DeviceTooSmall {
            blocks: dev.block_count(),
            needed: config.total_sectors,
        });
    }

    let layout = EfiLayout::plan(
        esp_last - esp_first + 1,
        kernel.map(|bytes| bytes.len() as u64),
        config.arch,
    )?;

    let mut gpt = GptBuilder::new_header(config.total_sectors, first_usable, last_usable, entropy)?;
    gpt.add_partition(esp_first, esp_last, ESP_NAME, EFI_SYSTEM_PARTITION, entropy)?;
    let volume_id = entropy.u32()?;

    log::info!(
        "ESP at LBA {esp_first}..={esp_last} ({} sectors), {} bytes per cluster",
        esp_last - esp_first + 1,
        layout.geometry().cluster_bytes()
    );
    layout.write(dev, esp_first, kernel, volume_id)?;
    gpt.write(dev)?;

    Ok(())
}
