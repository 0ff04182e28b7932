// src/perm.rs
use crate::disk::S_IFDIR;

const RWX_BITS: [(u16, char); 9] = [
    (0o400, 'r'),
    (0o200, 'w'),
    (0o100, 'x'),
    (0o040, 'r'),
    (0o020, 'w'),
    (0o010, 'x'),
    (0o004, 'r'),
    (0o002, 'w'),
    (0o001, 'x'),
];

/// Modo en forma simbólica, p. ej. `drwxr-----`. Todo lo que no tenga el bit
/// de directorio se muestra como archivo regular.
pub fn format_permissions(mode: u16) -> [char; 10] {
    let mut out = ['-'; 10];
    if mode & S_IFDIR != 0 {
        out[0] = 'd';
    }
    for (i, (mask, c)) in RWX_BITS.iter().enumerate() {
        if mode & mask != 0 {
            out[i + 1] = *c;
        }
    }
    out
}
