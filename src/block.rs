// src/block.rs
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::debug;

use crate::disk::{
    Block, Inode, Superblock, BLOCK_SIZE, INODE_RECORD_SIZE, MINIX_MAGIC, SUPERBLOCK_BLOCK,
};
use crate::error::{IoError, MinixError, Result};

/// Posiciona y lee exactamente `buf.len()` bytes. Sólo se reintenta ante
/// `Interrupted`; si la imagen se acaba antes se devuelve `ShortRead`.
fn read_exact_at<R: Read + Seek>(
    image: &mut R,
    offset: u64,
    buf: &mut [u8],
) -> std::result::Result<(), IoError> {
    image
        .seek(SeekFrom::Start(offset))
        .map_err(|source| IoError::SeekFailed { offset, source })?;

    let mut got = 0;
    while got < buf.len() {
        match image.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(source) => return Err(IoError::ReadFailed { offset, source }),
        }
    }

    if got < buf.len() {
        return Err(IoError::ShortRead {
            offset,
            expected: buf.len(),
            got,
        });
    }
    Ok(())
}

/// Lee el bloque/zona `index` (offset = index * BLOCK_SIZE).
pub fn read_block<R: Read + Seek>(image: &mut R, index: u32) -> std::result::Result<Block, IoError> {
    let offset = index as u64 * BLOCK_SIZE as u64;
    debug!(index, offset, "leyendo bloque");

    let mut buf = [0u8; BLOCK_SIZE];
    read_exact_at(image, offset, &mut buf)?;
    Ok(buf)
}

/// Lee el bloque 1 y lo decodifica. Siempre se valida el magic.
pub fn read_superblock<R: Read + Seek>(image: &mut R) -> Result<Superblock> {
    let buf = read_block(image, SUPERBLOCK_BLOCK)?;
    let sb = Superblock::decode(&buf);

    if !sb.is_valid() {
        return Err(MinixError::BadMagic {
            expected: MINIX_MAGIC,
            found: sb.magic,
        });
    }
    Ok(sb)
}

/// Arranque + superblock + bitmaps, en bytes.
pub fn inode_table_offset(sb: &Superblock) -> u64 {
    (2 + sb.imap_blocks as u64 + sb.zmap_blocks as u64) * BLOCK_SIZE as u64
}

/// Lee el inodo `number` (base 1). No se consulta el bitmap de inodos: un
/// número fuera de `[1, inode_count]` decodifica lo que haya en ese offset.
pub fn read_inode<R: Read + Seek>(image: &mut R, sb: &Superblock, number: u32) -> Result<Inode> {
    if number == 0 {
        return Err(MinixError::InvalidInode(number));
    }

    let offset = inode_table_offset(sb) + (number as u64 - 1) * INODE_RECORD_SIZE as u64;
    debug!(number, offset, "leyendo inodo");

    let mut buf = [0u8; INODE_RECORD_SIZE];
    read_exact_at(image, offset, &mut buf)?;
    Ok(Inode::decode(&buf))
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    fn image_with_superblock(magic: u16) -> Vec<u8> {
        let mut img = vec![0u8; 8 * BLOCK_SIZE];
        let sb = &mut img[BLOCK_SIZE..2 * BLOCK_SIZE];
        sb[0..2].copy_from_slice(&16u16.to_le_bytes());
        sb[4..6].copy_from_slice(&1u16.to_le_bytes());
        sb[6..8].copy_from_slice(&1u16.to_le_bytes());
        sb[16..18].copy_from_slice(&magic.to_le_bytes());
        img
    }

    #[test]
    fn read_block_uses_index_times_block_size() {
        let mut img = vec![0u8; 4 * BLOCK_SIZE];
        img[3 * BLOCK_SIZE] = 0xAB;
        img[4 * BLOCK_SIZE - 1] = 0xCD;
        let block = read_block(&mut Cursor::new(img), 3).unwrap();
        assert_eq!(block[0], 0xAB);
        assert_eq!(block[BLOCK_SIZE - 1], 0xCD);
    }

    #[test]
    fn truncated_image_is_a_short_read() {
        let img = vec![0u8; BLOCK_SIZE + 100];
        match read_block(&mut Cursor::new(img), 1) {
            Err(IoError::ShortRead { offset, expected, got }) => {
                assert_eq!(offset, BLOCK_SIZE as u64);
                assert_eq!(expected, BLOCK_SIZE);
                assert_eq!(got, 100);
            }
            other => panic!("se esperaba ShortRead, se obtuvo {other:?}"),
        }
    }

    /// Imagen que falla al posicionar o al leer, según se configure.
    struct FailingImage {
        fail_seek: bool,
        interrupts: usize,
    }

    impl Read for FailingImage {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupts > 0 {
                self.interrupts -= 1;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            Err(io::Error::new(ErrorKind::Other, "sector defectuoso"))
        }
    }

    impl Seek for FailingImage {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            if self.fail_seek {
                return Err(io::Error::new(ErrorKind::InvalidInput, "seek inválido"));
            }
            match pos {
                SeekFrom::Start(n) => Ok(n),
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn seek_error_is_seek_failed() {
        let mut img = FailingImage {
            fail_seek: true,
            interrupts: 0,
        };
        match read_block(&mut img, 2) {
            Err(IoError::SeekFailed { offset, source }) => {
                assert_eq!(offset, 2 * BLOCK_SIZE as u64);
                assert_eq!(source.kind(), ErrorKind::InvalidInput);
            }
            other => panic!("se esperaba SeekFailed, se obtuvo {other:?}"),
        }
    }

    #[test]
    fn read_error_is_read_failed_after_retrying_interrupts() {
        let mut img = FailingImage {
            fail_seek: false,
            interrupts: 3,
        };
        match read_block(&mut img, 1) {
            Err(IoError::ReadFailed { offset, source }) => {
                assert_eq!(offset, BLOCK_SIZE as u64);
                assert_eq!(source.kind(), ErrorKind::Other);
            }
            other => panic!("se esperaba ReadFailed, se obtuvo {other:?}"),
        }
        assert_eq!(img.interrupts, 0);
    }

    #[test]
    fn read_error_surfaces_through_superblock() {
        let mut img = FailingImage {
            fail_seek: false,
            interrupts: 0,
        };
        assert!(matches!(
            read_superblock(&mut img),
            Err(MinixError::Io(IoError::ReadFailed { .. }))
        ));
    }

    #[test]
    fn superblock_decode_is_pure() {
        let mut cur = Cursor::new(image_with_superblock(MINIX_MAGIC));
        let a = read_superblock(&mut cur).unwrap();
        let b = read_superblock(&mut cur).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.inode_count, 16);
    }

    #[test]
    fn zero_magic_is_rejected() {
        let mut cur = Cursor::new(image_with_superblock(0x0000));
        assert!(matches!(
            read_superblock(&mut cur),
            Err(MinixError::BadMagic { found: 0, .. })
        ));
    }

    #[test]
    fn inode_table_follows_bitmaps() {
        let mut cur = Cursor::new(image_with_superblock(MINIX_MAGIC));
        let sb = read_superblock(&mut cur).unwrap();
        assert_eq!(inode_table_offset(&sb), 4 * BLOCK_SIZE as u64);
    }

    #[test]
    fn read_inode_seeks_to_numbered_record() {
        let mut img = image_with_superblock(MINIX_MAGIC);
        let at = 4 * BLOCK_SIZE + INODE_RECORD_SIZE; // inodo 2
        img[at + 4..at + 8].copy_from_slice(&777u32.to_le_bytes());
        let mut cur = Cursor::new(img);
        let sb = read_superblock(&mut cur).unwrap();

        assert_eq!(read_inode(&mut cur, &sb, 2).unwrap().size, 777);
        assert_eq!(read_inode(&mut cur, &sb, 1).unwrap().size, 0);
    }

    #[test]
    fn inode_zero_is_never_dereferenced() {
        let mut cur = Cursor::new(image_with_superblock(MINIX_MAGIC));
        let sb = read_superblock(&mut cur).unwrap();
        assert!(matches!(
            read_inode(&mut cur, &sb, 0),
            Err(MinixError::InvalidInode(0))
        ));
    }
}
