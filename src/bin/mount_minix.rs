// src/bin/mount_minix.rs
use std::env;

use anyhow::{bail, Context, Result};
use minixfs::config::{parse_mount_args, MOUNT_USAGE};
use minixfs::{logging, MinixFs};

fn main() -> Result<()> {
    logging::init();

    let (image, mountpoint) = parse_mount_args(env::args_os().skip(1))?;
    if !mountpoint.is_dir() {
        bail!("{:?} no es un directorio\n{MOUNT_USAGE}", mountpoint);
    }

    let fs = MinixFs::open(&image).context("Error al abrir la imagen Minix")?;
    fs.run(mountpoint)
}
