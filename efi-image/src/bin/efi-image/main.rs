mod cli;

use std::fs::{self, OpenOptions};
use std::io;
use std::process::ExitCode;

use block_dev::BLOCK_SIZE;
use clap::Parser;
use efi_image::{build_image, BlockFile, Error, ImageConfig};
use gpt::OsEntropy;
use typed_bytesize::ByteSizeIec;

use self::cli::Cli;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    log::info!("output={:?} kernel={:?} arch={}", cli.output, cli.kernel, cli.arch);

    let kernel = cli
        .kernel
        .as_ref()
        .map(|path| {
            fs::read(path).map_err(|e| {
                io::Error::new(e.kind(), format!("cannot read kernel {}: {e}", path.display()))
            })
        })
        .transpose()?;

    let disk_size = ByteSizeIec::mib(cli.size).0;
    let fd = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(&cli.output)?;
    fd.set_len(disk_size)?;

    let mut block_file = BlockFile::new(fd)?;
    let config = ImageConfig::new(disk_size / BLOCK_SIZE as u64, cli.arch);
    build_image(&mut block_file, &config, kernel.as_deref(), &mut OsEntropy)?;

    log::info!(
        "wrote {} ({} MiB, {} sectors)",
        cli.output.display(),
        cli.size,
        config.total_sectors
    );
    Ok(())
}
