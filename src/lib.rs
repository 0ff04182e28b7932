mod block;
mod dir;
mod disk;
mod error;
mod file;
mod perm;
mod session;

pub mod config;
pub mod display;
pub mod fs;
pub mod logging;
pub mod shell;

pub use crate::block::{inode_table_offset, read_block, read_inode, read_superblock};
pub use crate::dir::{list_root, list_root_long, DirEntry, LongEntry, RootEntries};
pub use crate::disk::{
    Block,
    DirEntryDisk,
    Inode,
    Superblock,
    BLOCK_SIZE,
    DIRECT_ZONES,
    DIR_ENTRY_SIZE,
    INODE_RECORD_SIZE,
    MINIX_MAGIC,
    NAME_LEN,
    ROOT_INODE,
    S_IFDIR,
    S_IFMT,
    S_IFREG,
};
pub use crate::error::{IoError, MinixError, Result};
pub use crate::file::{read_file, read_file_inode, ReconstructedFile};
pub use crate::fs::MinixFs;
pub use crate::perm::format_permissions;
pub use crate::session::Session;
