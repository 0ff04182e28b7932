// src/session.rs
use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::block;
use crate::dir::{self, LongEntry, RootEntries};
use crate::disk::{Block, Inode, Superblock};
use crate::error::{MinixError, Result};
use crate::file::{self, ReconstructedFile};

/// Estado de una sesión: como mucho una imagen abierta. No guarda superblock
/// ni inodos; cada consulta vuelve a leer de la imagen.
///
/// Se pasa por referencia a cada operación en lugar de vivir en una global.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<File>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abre la imagen en solo lectura. Si ya hay una montada falla con
    /// `AlreadyMounted` y deja la anterior intacta.
    pub fn mount(&mut self, path: &Path) -> Result<()> {
        if self.image.is_some() {
            return Err(MinixError::AlreadyMounted);
        }

        let file = File::open(path).map_err(|source| MinixError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;

        info!(image = %path.display(), "imagen montada");
        self.image = Some(file);
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<()> {
        match self.image.take() {
            Some(file) => {
                drop(file);
                info!("imagen desmontada");
                Ok(())
            }
            None => Err(MinixError::NotMounted),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.image.is_some()
    }

    // Único punto de control antes de tocar el disco.
    fn image(&mut self) -> Result<&mut File> {
        self.image.as_mut().ok_or(MinixError::NotMounted)
    }

    pub fn read_superblock(&mut self) -> Result<Superblock> {
        block::read_superblock(self.image()?)
    }

    pub fn read_inode(&mut self, number: u32) -> Result<Inode> {
        let sb = self.read_superblock()?;
        block::read_inode(self.image()?, &sb, number)
    }

    pub fn list_root(&mut self) -> Result<RootEntries> {
        let sb = self.read_superblock()?;
        dir::list_root(self.image()?, &sb)
    }

    pub fn list_root_long(&mut self) -> Result<Vec<LongEntry>> {
        let sb = self.read_superblock()?;
        dir::list_root_long(self.image()?, &sb)
    }

    pub fn dump_zone(&mut self, index: u32) -> Result<Block> {
        Ok(block::read_block(self.image()?, index)?)
    }

    pub fn read_file(&mut self, filename: &str) -> Result<ReconstructedFile> {
        let sb = self.read_superblock()?;
        file::read_file(self.image()?, &sb, filename)
    }

    pub fn read_file_inode(&mut self, ino: u32) -> Result<ReconstructedFile> {
        let sb = self.read_superblock()?;
        file::read_file_inode(self.image()?, &sb, ino)
    }
}
