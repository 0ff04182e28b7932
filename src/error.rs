// src/error.rs
use std::io;
use std::path::PathBuf;

use libc::{EBUSY, EINVAL, EIO, EISDIR, ENOENT, ENOTDIR};
use thiserror::Error;

/// Fallas del lector de bloques. Ninguna se reintenta: una lectura corta
/// significa una imagen truncada o corrupta, no un fallo transitorio.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("no se pudo posicionar en el offset {offset}: {source}")]
    SeekFailed { offset: u64, source: io::Error },

    #[error("no se pudo leer en el offset {offset}: {source}")]
    ReadFailed { offset: u64, source: io::Error },

    #[error("lectura corta en el offset {offset}: se esperaban {expected} bytes, se leyeron {got}")]
    ShortRead {
        offset: u64,
        expected: usize,
        got: usize,
    },
}

#[derive(Debug, Error)]
pub enum MinixError {
    #[error("no hay ninguna imagen montada")]
    NotMounted,

    #[error("ya hay una imagen montada, desmóntela primero")]
    AlreadyMounted,

    #[error("no se pudo abrir la imagen {path:?}: {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    #[error("error de E/S: {0}")]
    Io(#[from] IoError),

    #[error("el magic del superblock no coincide (esperado = {expected:#06X}, leído = {found:#06X})")]
    BadMagic { expected: u16, found: u16 },

    #[error("el inodo {ino} no es un directorio")]
    NotADirectory { ino: u32 },

    #[error("{name:?} no es un archivo regular (inodo {ino})")]
    NotARegularFile { name: String, ino: u32 },

    #[error("archivo no encontrado: {0:?}")]
    NotFound(String),

    #[error("número de inodo inválido: {0}")]
    InvalidInode(u32),
}

impl MinixError {
    pub fn as_errno(&self) -> i32 {
        match self {
            MinixError::NotMounted => EIO,
            MinixError::AlreadyMounted => EBUSY,
            MinixError::OpenFailed { source, .. } => source.raw_os_error().unwrap_or(EIO),
            MinixError::Io(_) => EIO,
            MinixError::BadMagic { .. } => EINVAL,
            MinixError::NotADirectory { .. } => ENOTDIR,
            MinixError::NotARegularFile { .. } => EISDIR,
            MinixError::NotFound(_) => ENOENT,
            MinixError::InvalidInode(_) => ENOENT,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinixError>;
