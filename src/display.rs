// src/display.rs
// Presentación de los resultados del núcleo. Nada aquí toca la imagen.
use std::fmt;

use chrono::DateTime;

use crate::dir::LongEntry;
use crate::disk::Superblock;

const ROW: usize = 16;

/// Informe del superblock, una línea por campo.
pub struct SuperblockReport<'a>(pub &'a Superblock);

impl fmt::Display for SuperblockReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sb = self.0;
        writeln!(f, "Superblock information:")?;
        writeln!(f, "  Number of inodes:       {}", sb.inode_count)?;
        writeln!(f, "  Number of zones:        {}", sb.zone_count)?;
        writeln!(f, "  Number of imap_blocks:  {}", sb.imap_blocks)?;
        writeln!(f, "  Number of zmap_blocks:  {}", sb.zmap_blocks)?;
        writeln!(f, "  First data zone:        {}", sb.first_data_zone)?;
        writeln!(f, "  Log zone size:          {}", sb.log_zone_size)?;
        writeln!(f, "  Max size:               {}", sb.max_size)?;
        writeln!(f, "  Magic:                  {:#06x}", sb.magic)?;
        writeln!(f, "  State:                  {}", sb.state)?;
        writeln!(f, "  Zones:                  {}", sb.zones)
    }
}

pub fn superblock_report(sb: &Superblock) -> String {
    SuperblockReport(sb).to_string()
}

fn printable(b: u8) -> char {
    if b.is_ascii_graphic() || b == b' ' {
        b as char
    } else {
        '.'
    }
}

/// 16 bytes por fila: offset en hex, columnas hex y luego ASCII (`.` para
/// lo no imprimible).
pub struct ZoneDump<'a> {
    pub zone: u32,
    pub data: &'a [u8],
}

impl fmt::Display for ZoneDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Zone {}:", self.zone)?;
        for (row, chunk) in self.data.chunks(ROW).enumerate() {
            write!(f, "{:04x}  ", row * ROW)?;
            for i in 0..ROW {
                match chunk.get(i) {
                    Some(b) => write!(f, "{b:02x} ")?,
                    None => f.write_str("   ")?,
                }
            }
            f.write_str(" ")?;
            for &b in chunk {
                write!(f, "{}", printable(b))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn hex_dump(zone: u32, data: &[u8]) -> String {
    ZoneDump { zone, data }.to_string()
}

/// Fecha de modificación como "Mon dd yyyy", en UTC.
pub fn format_mtime(secs: u32) -> String {
    match DateTime::from_timestamp(secs as i64, 0) {
        Some(t) => t.format("%b %d %Y").to_string(),
        None => "?".to_string(),
    }
}

pub fn long_line(e: &LongEntry) -> String {
    format!(
        "{} {:>5} {:>8} {} {}",
        e.perms,
        e.uid,
        e.size,
        format_mtime(e.mtime),
        String::from_utf8_lossy(&e.name)
    )
}
