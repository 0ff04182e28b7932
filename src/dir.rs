// src/dir.rs
use std::io::{Read, Seek};

use tracing::warn;

use crate::block::{read_block, read_inode};
use crate::disk::{
    Block, DirEntryDisk, Inode, Superblock, BLOCK_SIZE, DIR_ENTRIES_PER_ZONE, DIR_ENTRY_SIZE,
    ROOT_INODE,
};
use crate::error::{MinixError, Result};
use crate::perm::format_permissions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub ino: u32,
    pub name: Vec<u8>,
}

impl DirEntry {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// Entrada del listado largo: nombre + datos de su inodo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongEntry {
    pub ino: u32,
    pub name: Vec<u8>,
    pub perms: String,
    pub uid: u16,
    pub size: u32,
    pub mtime: u32,
}

/// Iterador perezoso sobre la zona del directorio raíz. Es dueño de su copia
/// del bloque, así que no retiene la imagen; para volver a empezar se llama
/// otra vez a `list_root`.
pub struct RootEntries {
    block: Option<Block>,
    slot: usize,
}

impl RootEntries {
    fn empty() -> Self {
        Self { block: None, slot: 0 }
    }
}

impl Iterator for RootEntries {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        let block = self.block.as_ref()?;
        while self.slot < DIR_ENTRIES_PER_ZONE {
            let start = self.slot * DIR_ENTRY_SIZE;
            self.slot += 1;

            let mut raw = [0u8; DIR_ENTRY_SIZE];
            raw.copy_from_slice(&block[start..start + DIR_ENTRY_SIZE]);
            let entry = DirEntryDisk::decode(&raw);

            // inodo 0 = ranura libre
            if entry.is_used() {
                return Some(DirEntry {
                    ino: entry.inode,
                    name: entry.name_bytes().to_vec(),
                });
            }
        }
        None
    }
}

fn root_inode<R: Read + Seek>(image: &mut R, sb: &Superblock) -> Result<Inode> {
    let root = read_inode(image, sb, ROOT_INODE)?;
    if !root.is_dir() {
        return Err(MinixError::NotADirectory { ino: ROOT_INODE });
    }
    Ok(root)
}

/// Entradas del directorio raíz en orden físico, sin las ranuras vacías.
/// Sólo se lee `zone[0]`: no hay directorios de varias zonas ni recursión.
pub fn list_root<R: Read + Seek>(image: &mut R, sb: &Superblock) -> Result<RootEntries> {
    let root = root_inode(image, sb)?;

    let zone = root.zone[0];
    if zone == 0 {
        return Ok(RootEntries::empty());
    }
    if root.size as usize > BLOCK_SIZE {
        warn!(
            size = root.size,
            "el directorio raíz ocupa más de una zona; sólo se lista la primera"
        );
    }

    let block = read_block(image, zone as u32)?;
    Ok(RootEntries {
        block: Some(block),
        slot: 0,
    })
}

/// Listado largo. Si falla la lectura del inodo de cualquier entrada se
/// aborta todo el listado: nunca se devuelve un listado parcial.
pub fn list_root_long<R: Read + Seek>(image: &mut R, sb: &Superblock) -> Result<Vec<LongEntry>> {
    let entries = list_root(image, sb)?;

    let mut out = Vec::new();
    for e in entries {
        let inode = read_inode(image, sb, e.ino)?;
        out.push(LongEntry {
            ino: e.ino,
            perms: format_permissions(inode.mode).iter().collect(),
            uid: inode.uid,
            size: inode.size,
            mtime: inode.mtime,
            name: e.name,
        });
    }
    Ok(out)
}
