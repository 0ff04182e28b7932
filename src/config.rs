// src/config.rs
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

pub const DEFAULT_PROMPT: &str = "minix> ";
pub const USAGE: &str = "Uso: minix_shell [--no-color] [imagen.img]";
pub const MOUNT_USAGE: &str = "Uso: mount_minix imagen.img mountpoint/";

/// Configuración de la consola interactiva.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Imagen a montar al arrancar.
    pub image: Option<PathBuf>,
    pub color: bool,
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            image: None,
            color: true,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl ShellConfig {
    /// Lee los argumentos (sin el nombre del binario) y las variables
    /// `NO_COLOR` y `MINIX_PROMPT` a través de `env`.
    pub fn parse<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            cfg.color = false;
        }
        if let Some(prompt) = env("MINIX_PROMPT") {
            cfg.prompt = prompt;
        }

        for arg in args {
            match arg.as_str() {
                "--no-color" => cfg.color = false,
                "-h" | "--help" => return Err(anyhow!(USAGE)),
                s if s.starts_with('-') => {
                    return Err(anyhow!("opción desconocida: {s}\n{USAGE}"));
                }
                _ if cfg.image.is_some() => {
                    return Err(anyhow!("sólo se admite una imagen\n{USAGE}"));
                }
                _ => cfg.image = Some(PathBuf::from(arg)),
            }
        }

        Ok(cfg)
    }
}

/// Argumentos de `mount_minix`: exactamente una imagen y un punto de montaje.
pub fn parse_mount_args<I>(args: I) -> Result<(PathBuf, PathBuf)>
where
    I: IntoIterator<Item = OsString>,
{
    let args: Vec<PathBuf> = args.into_iter().map(PathBuf::from).collect();
    let [image, mountpoint] = <[PathBuf; 2]>::try_from(args)
        .map_err(|args| anyhow!("se esperaban 2 argumentos, se recibieron {}", args.len()))
        .context(MOUNT_USAGE)?;
    Ok((image, mountpoint))
}
