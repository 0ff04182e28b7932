// src/fs.rs
// -----------------------------------------------------------------------------
// Adaptador FUSE de solo lectura sobre una sesión montada
// -----------------------------------------------------------------------------
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use fuser::{
    FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyData, ReplyDirectory, ReplyEntry,
    ReplyOpen, ReplyStatfs, Request,
};
use libc::{EINVAL, EIO, ENOENT, ENOTDIR, EROFS};
use tracing::{debug, warn};

use crate::dir::DirEntry;
use crate::disk::{Inode, BLOCK_SIZE, NAME_LEN, ROOT_INODE};
use crate::session::Session;

const TTL: Duration = Duration::from_secs(1);

fn to_time(secs: u32) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs as u64)
}

fn kind_of(inode: &Inode) -> FileType {
    if inode.is_dir() {
        FileType::Directory
    } else {
        FileType::RegularFile
    }
}

/// Conversión de un inodo de disco a `FileAttr` de FUSE. El número de inodo
/// de FUSE es el mismo que en disco (root = 1).
pub fn inode_to_attr(ino: u64, inode: &Inode) -> FileAttr {
    FileAttr {
        ino,
        size: inode.size as u64,
        blocks: inode.zones().count() as u64 * (BLOCK_SIZE as u64 / 512),
        atime: to_time(inode.atime),
        mtime: to_time(inode.mtime),
        ctime: to_time(inode.ctime),
        crtime: to_time(inode.ctime),
        kind: kind_of(inode),
        perm: inode.mode & 0o7777,
        nlink: 1,
        uid: inode.uid as u32,
        gid: 0,
        rdev: 0,
        blksize: BLOCK_SIZE as u32,
        flags: 0,
    }
}

/// Una entrada a devolver en `readdir`, con el offset desde el que se
/// retoma la siguiente llamada.
#[derive(Debug, PartialEq, Eq)]
struct DirSlot<'a> {
    ino: u64,
    next_offset: i64,
    name: &'a [u8],
}

/// ".", ".." y luego las entradas del disco (sin sus propios "." y ".."),
/// saltando las `offset` primeras. La raíz es su propio padre.
fn readdir_slots(root: u64, entries: &[DirEntry], offset: i64) -> Vec<DirSlot<'_>> {
    let dots: [(u64, &[u8]); 2] = [(root, &b"."[..]), (root, &b".."[..])];
    let on_disk = entries
        .iter()
        .filter(|e| e.name != b"." && e.name != b"..")
        .map(|e| (e.ino as u64, e.name.as_slice()));

    dots.into_iter()
        .chain(on_disk)
        .enumerate()
        .skip(offset.max(0) as usize)
        .map(|(i, (ino, name))| DirSlot {
            ino,
            next_offset: (i + 1) as i64,
            name,
        })
        .collect()
}

/// Ventana `[offset, offset + size)` de `data`, acotada a su longitud.
fn read_window(data: &[u8], offset: u64, size: u32) -> &[u8] {
    let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
    let end = start.saturating_add(size as usize).min(data.len());
    &data[start..end]
}

pub struct MinixFs {
    session: Session,
}

impl MinixFs {
    /// Monta la imagen en la sesión y comprueba el superblock antes de
    /// exponerla por FUSE.
    pub fn open(image: &Path) -> Result<Self> {
        let mut session = Session::new();
        session
            .mount(image)
            .with_context(|| format!("No se pudo montar la imagen {:?}", image))?;
        session
            .read_superblock()
            .context("La imagen no tiene un superblock válido")?;
        Ok(Self { session })
    }

    /// Monta el FS con FUSE (solo lectura) en el punto de montaje indicado.
    pub fn run(self, mountpoint: PathBuf) -> Result<()> {
        let options = vec![
            MountOption::FSName("minixfs".to_string()),
            MountOption::AutoUnmount,
            MountOption::RO,
        ];

        fuser::mount2(self, &mountpoint, &options)?;
        Ok(())
    }

    fn attr(&mut self, ino: u64) -> Result<FileAttr, i32> {
        let number = u32::try_from(ino).map_err(|_| ENOENT)?;
        let inode = self.session.read_inode(number).map_err(|e| e.as_errno())?;
        Ok(inode_to_attr(ino, &inode))
    }
}

impl Filesystem for MinixFs {
    fn destroy(&mut self) {
        if self.session.is_mounted() {
            let _ = self.session.unmount();
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        debug!(ino, "getattr");
        match self.attr(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(errno) => reply.error(errno),
        }
    }

    // Sólo existe el directorio raíz.
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        debug!(parent, ?name, "lookup");
        if parent != ROOT_INODE as u64 {
            reply.error(ENOENT);
            return;
        }

        let wanted = name.as_bytes();
        let mut entries = match self.session.list_root() {
            Ok(e) => e,
            Err(e) => {
                reply.error(e.as_errno());
                return;
            }
        };

        let Some(found) = entries.find(|e| e.name == wanted) else {
            reply.error(ENOENT);
            return;
        };

        match self.attr(found.ino as u64) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        if ino != ROOT_INODE as u64 {
            reply.error(ENOTDIR);
            return;
        }
        reply.opened(ino, 0);
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        debug!(ino, offset, "readdir");
        if ino != ROOT_INODE as u64 {
            reply.error(ENOTDIR);
            return;
        }

        let entries: Vec<_> = match self.session.list_root() {
            Ok(e) => e.collect(),
            Err(e) => {
                reply.error(e.as_errno());
                return;
            }
        };

        for slot in readdir_slots(ino, &entries, offset) {
            let kind = if slot.name == b"." || slot.name == b".." {
                FileType::Directory
            } else {
                match self.session.read_inode(slot.ino as u32) {
                    Ok(inode) => kind_of(&inode),
                    Err(err) => {
                        warn!(ino = slot.ino, %err, "no se pudo leer el inodo de la entrada");
                        reply.error(EIO);
                        return;
                    }
                }
            };
            if reply.add(slot.ino, slot.next_offset, kind, OsStr::from_bytes(slot.name)) {
                break;
            }
        }

        reply.ok();
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        debug!(ino, flags, "open");
        if flags & libc::O_ACCMODE != libc::O_RDONLY {
            reply.error(EROFS);
            return;
        }
        match self.attr(ino) {
            Ok(_) => reply.opened(ino, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        debug!(ino, offset, size, "read");
        if offset < 0 {
            reply.error(EINVAL);
            return;
        }
        let Ok(number) = u32::try_from(ino) else {
            reply.error(ENOENT);
            return;
        };

        let file = match self.session.read_file_inode(number) {
            Ok(f) => f,
            Err(e) => {
                reply.error(e.as_errno());
                return;
            }
        };

        // Se recorta al tamaño declarado; las zonas llegan completas.
        reply.data(read_window(file.contents(), offset as u64, size));
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        let sb = match self.session.read_superblock() {
            Ok(sb) => sb,
            Err(e) => {
                reply.error(e.as_errno());
                return;
            }
        };

        // Sin bitmaps no se sabe qué está libre.
        let blocks = sb.zone_count as u64;
        let files = sb.inode_count as u64;
        let bsize = BLOCK_SIZE as u32;

        reply.statfs(blocks, 0, 0, files, 0, bsize, NAME_LEN as u32, bsize);
    }
}
