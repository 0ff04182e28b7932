// tests/common/mod.rs
// Constructor de imágenes para las pruebas: calcula el layout, escribe el
// superblock, la tabla de inodos, el directorio raíz y las zonas de datos.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use minixfs::{
    BLOCK_SIZE, DIRECT_ZONES, DIR_ENTRY_SIZE, INODE_RECORD_SIZE, MINIX_MAGIC, S_IFDIR, S_IFREG,
};
use tempfile::TempDir;

pub struct InodeSpec {
    pub mode: u16,
    pub uid: u16,
    pub size: u32,
    pub mtime: u32,
    pub zones: Vec<u16>,
}

pub struct ImageBuilder {
    pub imap_blocks: u16,
    pub zmap_blocks: u16,
    pub inode_count: u16,
    pub total_blocks: usize,
    pub magic: u16,
    pub root_zone: u16,
    root_mode: u16,
    inodes: Vec<(u32, InodeSpec)>,
    entries: Vec<(usize, u32, Vec<u8>)>,
    zones: Vec<(u16, Vec<u8>)>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            imap_blocks: 1,
            zmap_blocks: 1,
            inode_count: 32,
            total_blocks: 64,
            magic: MINIX_MAGIC,
            root_zone: 40,
            root_mode: S_IFDIR | 0o755,
            inodes: Vec::new(),
            entries: Vec::new(),
            zones: Vec::new(),
        }
    }

    pub fn inode_table_blocks(&self) -> usize {
        (self.inode_count as usize * INODE_RECORD_SIZE).div_ceil(BLOCK_SIZE)
    }

    pub fn first_data_zone(&self) -> u16 {
        (2 + self.imap_blocks as usize + self.zmap_blocks as usize + self.inode_table_blocks())
            as u16
    }

    pub fn root_mode(mut self, mode: u16) -> Self {
        self.root_mode = mode;
        self
    }

    pub fn magic(mut self, magic: u16) -> Self {
        self.magic = magic;
        self
    }

    /// Entrada en la ranura `slot` de la zona del directorio raíz.
    pub fn entry(mut self, slot: usize, ino: u32, name: &[u8]) -> Self {
        self.entries.push((slot, ino, name.to_vec()));
        self
    }

    pub fn inode(mut self, ino: u32, spec: InodeSpec) -> Self {
        self.inodes.push((ino, spec));
        self
    }

    pub fn regular(self, ino: u32, size: u32, zones: &[u16]) -> Self {
        self.inode(
            ino,
            InodeSpec {
                mode: S_IFREG | 0o644,
                uid: 0,
                size,
                mtime: 0,
                zones: zones.to_vec(),
            },
        )
    }

    pub fn zone(mut self, zone: u16, data: &[u8]) -> Self {
        assert!(data.len() <= BLOCK_SIZE);
        self.zones.push((zone, data.to_vec()));
        self
    }

    pub fn build_bytes(&self) -> Vec<u8> {
        let mut img = vec![0u8; self.total_blocks * BLOCK_SIZE];

        // superblock
        let sb = &mut img[BLOCK_SIZE..2 * BLOCK_SIZE];
        sb[0..2].copy_from_slice(&self.inode_count.to_le_bytes());
        sb[2..4].copy_from_slice(&(self.total_blocks as u16).to_le_bytes());
        sb[4..6].copy_from_slice(&self.imap_blocks.to_le_bytes());
        sb[6..8].copy_from_slice(&self.zmap_blocks.to_le_bytes());
        sb[8..10].copy_from_slice(&self.first_data_zone().to_le_bytes());
        sb[12..16].copy_from_slice(&((DIRECT_ZONES * BLOCK_SIZE) as u32).to_le_bytes());
        sb[16..18].copy_from_slice(&self.magic.to_le_bytes());
        sb[18..20].copy_from_slice(&1u16.to_le_bytes());
        sb[20..24].copy_from_slice(&(self.total_blocks as u32).to_le_bytes());

        // tabla de inodos: primero la raíz
        let table = (2 + self.imap_blocks as usize + self.zmap_blocks as usize) * BLOCK_SIZE;
        let used = self.entries.iter().map(|e| e.0 + 1).max().unwrap_or(0);
        let root = InodeSpec {
            mode: self.root_mode,
            uid: 0,
            size: (used * DIR_ENTRY_SIZE) as u32,
            mtime: 0,
            zones: vec![self.root_zone],
        };
        write_inode(&mut img, table, 1, &root);
        for (ino, spec) in &self.inodes {
            write_inode(&mut img, table, *ino, spec);
        }

        // directorio raíz
        for (slot, ino, name) in &self.entries {
            let at = self.root_zone as usize * BLOCK_SIZE + slot * DIR_ENTRY_SIZE;
            img[at..at + 4].copy_from_slice(&ino.to_le_bytes());
            img[at + 4..at + 4 + name.len()].copy_from_slice(name);
        }

        // zonas de datos
        for (zone, data) in &self.zones {
            let at = *zone as usize * BLOCK_SIZE;
            img[at..at + data.len()].copy_from_slice(data);
        }

        img
    }

    /// Escribe la imagen en un directorio temporal. El `TempDir` debe vivir
    /// mientras se use la ruta.
    pub fn write(&self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minix.img");
        let mut file = File::create(&path).unwrap();
        file.write_all(&self.build_bytes()).unwrap();
        (dir, path)
    }
}

fn write_inode(img: &mut [u8], table: usize, ino: u32, spec: &InodeSpec) {
    let at = table + (ino as usize - 1) * INODE_RECORD_SIZE;
    img[at..at + 2].copy_from_slice(&spec.mode.to_le_bytes());
    img[at + 2..at + 4].copy_from_slice(&spec.uid.to_le_bytes());
    img[at + 4..at + 8].copy_from_slice(&spec.size.to_le_bytes());
    img[at + 12..at + 16].copy_from_slice(&spec.mtime.to_le_bytes());
    for (i, z) in spec.zones.iter().take(DIRECT_ZONES).enumerate() {
        img[at + 20 + 2 * i..at + 22 + 2 * i].copy_from_slice(&z.to_le_bytes());
    }
}
