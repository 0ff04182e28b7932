// src/file.rs
use std::io::{Read, Seek};

use tracing::{debug, warn};

use crate::block::{read_block, read_inode};
use crate::dir::list_root;
use crate::disk::{Inode, Superblock, BLOCK_SIZE, DIRECT_ZONES};
use crate::error::{MinixError, Result};

/// Archivo reconstruido desde sus zonas directas.
///
/// `data` es la concatenación de zonas completas, sin recortar al tamaño
/// declarado. Quien necesite el número exacto de bytes usa `contents()`.
#[derive(Debug, Clone)]
pub struct ReconstructedFile {
    pub inode: Inode,
    pub data: Vec<u8>,
}

impl ReconstructedFile {
    /// Los primeros `inode.size` bytes (o menos si faltaban zonas).
    pub fn contents(&self) -> &[u8] {
        let n = (self.inode.size as usize).min(self.data.len());
        &self.data[..n]
    }

    /// El tamaño declarado no cabe en las 9 zonas directas.
    pub fn truncated(&self) -> bool {
        self.inode.size as usize > DIRECT_ZONES * BLOCK_SIZE
    }
}

/// Busca `filename` en el directorio raíz (gana la primera coincidencia en
/// orden físico) y concatena sus zonas directas hasta el primer cero. Nunca
/// se siguen punteros indirectos.
pub fn read_file<R: Read + Seek>(
    image: &mut R,
    sb: &Superblock,
    filename: &str,
) -> Result<ReconstructedFile> {
    let ino = list_root(image, sb)?
        .find(|e| e.name == filename.as_bytes())
        .map(|e| e.ino)
        .ok_or_else(|| MinixError::NotFound(filename.to_string()))?;

    reconstruct(image, sb, ino, filename)
}

/// Igual que `read_file` pero partiendo de un número de inodo ya conocido.
pub fn read_file_inode<R: Read + Seek>(
    image: &mut R,
    sb: &Superblock,
    ino: u32,
) -> Result<ReconstructedFile> {
    reconstruct(image, sb, ino, &format!("#{ino}"))
}

fn reconstruct<R: Read + Seek>(
    image: &mut R,
    sb: &Superblock,
    ino: u32,
    filename: &str,
) -> Result<ReconstructedFile> {
    let inode = read_inode(image, sb, ino)?;
    if !inode.is_regular() {
        return Err(MinixError::NotARegularFile {
            name: filename.to_string(),
            ino,
        });
    }

    let mut data = Vec::with_capacity(DIRECT_ZONES * BLOCK_SIZE);
    for zone in inode.zones() {
        debug!(ino, zone, "leyendo zona de datos");
        let block = read_block(image, zone as u32)?;
        data.extend_from_slice(&block);
    }

    let file = ReconstructedFile { inode, data };
    if file.truncated() {
        warn!(
            file = filename,
            size = inode.size,
            "el archivo excede las zonas directas; se truncará"
        );
    }
    Ok(file)
}
