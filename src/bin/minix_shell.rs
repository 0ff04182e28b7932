// src/bin/minix_shell.rs
use std::env;
use std::io;

use anyhow::{Context, Result};
use minixfs::config::ShellConfig;
use minixfs::shell::{Command, Flow, Shell};
use minixfs::{logging, Session};

fn main() -> Result<()> {
    logging::init();

    let cfg = ShellConfig::parse(env::args().skip(1), |k| env::var(k).ok())?;
    colored::control::set_override(cfg.color);

    println!("Minix Disk Program");
    println!("Type 'help' for a list of commands.");

    let mut shell = Shell::new(Session::new(), cfg.prompt.clone());
    let mut out = io::stdout().lock();

    if let Some(image) = cfg.image {
        let flow = shell
            .execute(&Command::Mount(image), &mut out)
            .context("No se pudo escribir en stdout")?;
        if flow == Flow::Exit {
            return Ok(());
        }
    }

    shell
        .run(io::stdin().lock(), &mut out)
        .context("Error en el bucle de comandos")
}
