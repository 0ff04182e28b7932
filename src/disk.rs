// src/disk.rs
// -----------------------------------------------------------------------------
// Constantes y estructuras de disco (layout tipo Minix V1)
// -----------------------------------------------------------------------------
//
// Bloque 0: arranque. Bloque 1: superblock. Luego los bitmaps de inodos y de
// zonas, la tabla de inodos y finalmente las zonas de datos. Todo en
// little-endian. Cada campo se decodifica desde su offset fijo; nunca se
// reinterpreta el buffer como un struct.

pub const BLOCK_SIZE: usize = 1024;
pub const SUPERBLOCK_BLOCK: u32 = 1;
pub const ROOT_INODE: u32 = 1;
pub const MINIX_MAGIC: u16 = 0x137F;

pub const INODE_RECORD_SIZE: usize = 64;
pub const DIRECT_ZONES: usize = 9;

pub const DIR_ENTRY_SIZE: usize = 64;
pub const NAME_LEN: usize = 60;
pub const DIR_ENTRIES_PER_ZONE: usize = BLOCK_SIZE / DIR_ENTRY_SIZE;

// Bits de modo
pub const S_IFMT: u16 = 0o170000;
pub const S_IFDIR: u16 = 0o040000;
pub const S_IFREG: u16 = 0o100000;

pub type Block = [u8; BLOCK_SIZE];

#[inline]
fn le_u16(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

#[inline]
fn le_u32(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

// -------------------- Superblock --------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Superblock {
    pub inode_count: u16,
    pub zone_count: u16,
    pub imap_blocks: u16,
    pub zmap_blocks: u16,
    pub first_data_zone: u16,
    pub log_zone_size: u16,
    pub max_size: u32,
    pub magic: u16,
    pub state: u16,
    pub zones: u32,
}

impl Superblock {
    /// Decodifica los diez campos desde los offsets 0,2,4,6,8,10,12,16,18,20
    /// del bloque. No valida el magic; eso lo hace `block::read_superblock`.
    pub fn decode(buf: &Block) -> Self {
        Self {
            inode_count: le_u16(buf, 0),
            zone_count: le_u16(buf, 2),
            imap_blocks: le_u16(buf, 4),
            zmap_blocks: le_u16(buf, 6),
            first_data_zone: le_u16(buf, 8),
            log_zone_size: le_u16(buf, 10),
            max_size: le_u32(buf, 12),
            magic: le_u16(buf, 16),
            state: le_u16(buf, 18),
            zones: le_u32(buf, 20),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == MINIX_MAGIC
    }
}

// -------------------- Inodo --------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inode {
    pub mode: u16,
    pub uid: u16,
    pub size: u32,
    pub atime: u32,
    pub mtime: u32,
    pub ctime: u32,
    pub zone: [u16; DIRECT_ZONES],
}

impl Inode {
    /// mode@0 uid@2 size@4 atime@8 mtime@12 ctime@16 zone[9]@20..38.
    /// Los bytes 38..64 del registro son relleno.
    pub fn decode(buf: &[u8; INODE_RECORD_SIZE]) -> Self {
        let mut zone = [0u16; DIRECT_ZONES];
        for (i, z) in zone.iter_mut().enumerate() {
            *z = le_u16(buf, 20 + 2 * i);
        }
        Self {
            mode: le_u16(buf, 0),
            uid: le_u16(buf, 2),
            size: le_u32(buf, 4),
            atime: le_u32(buf, 8),
            mtime: le_u32(buf, 12),
            ctime: le_u32(buf, 16),
            zone,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    pub fn is_regular(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }

    /// Zonas directas en orden, hasta el primer puntero en cero.
    pub fn zones(&self) -> impl Iterator<Item = u16> + '_ {
        self.zone.iter().copied().take_while(|&z| z != 0)
    }
}

// -------------------- Entrada de directorio --------------------

#[derive(Clone, Copy)]
pub struct DirEntryDisk {
    pub inode: u32,
    pub name: [u8; NAME_LEN],
}

impl DirEntryDisk {
    pub fn decode(buf: &[u8; DIR_ENTRY_SIZE]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&buf[4..DIR_ENTRY_SIZE]);
        Self {
            inode: le_u32(buf, 0),
            name,
        }
    }

    pub fn is_used(&self) -> bool {
        self.inode != 0
    }

    /// El nombre sin el relleno de ceros final. Si ocupa los 60 bytes no
    /// hay terminador y se toma completo.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.name[..end]
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }
}

impl std::fmt::Debug for DirEntryDisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirEntryDisk")
            .field("inode", &self.inode)
            .field("name", &self.name_lossy())
            .finish()
    }
}
