// src/shell.rs
// Consola interactiva: separa argumentos, llama al núcleo e imprime.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::*;
use thiserror::Error;

use crate::display;
use crate::error::MinixError;
use crate::session::Session;

pub const HELP: &str = "\
Supported commands:
  help                      - Show this help message.
  mount <image>             - Mount a Minix disk image (alias: minimount).
  unmount                   - Unmount the Minix disk (alias: miniumount).
  show-superblock           - Display superblock information (alias: showsuper).
  list [--long|-l]          - List the root directory (alias: traverse).
  show-zone <zone>          - Dump a zone in hex and ASCII (alias: showzone).
  show-file <file>          - Display a file from the root directory (alias: showfile).
  quit                      - Unmount and exit the console.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Mount(PathBuf),
    Unmount,
    ShowSuperblock,
    List { long: bool },
    ShowZone(u32),
    ShowFile(String),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Unknown command {0:?}. Type 'help' for a list of commands.")]
    Unknown(String),
}

impl Command {
    /// `Ok(None)` para una línea vacía.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(None);
        };

        let cmd = match cmd {
            "help" => Command::Help,
            "mount" | "minimount" => {
                let path = words.next().ok_or(CommandError::Usage("mount <image file>"))?;
                Command::Mount(PathBuf::from(path))
            }
            "unmount" | "miniumount" => Command::Unmount,
            "show-superblock" | "showsuper" => Command::ShowSuperblock,
            "list" | "traverse" => {
                let long = match words.next() {
                    None => false,
                    Some("--long" | "-l") => true,
                    Some(_) => return Err(CommandError::Usage("list [--long|-l]")),
                };
                Command::List { long }
            }
            "show-zone" | "showzone" => {
                let zone = words
                    .next()
                    .and_then(|z| z.parse::<u32>().ok())
                    .ok_or(CommandError::Usage("show-zone <zone number>"))?;
                Command::ShowZone(zone)
            }
            "show-file" | "showfile" => {
                let name = words.next().ok_or(CommandError::Usage("show-file <filename>"))?;
                Command::ShowFile(name.to_string())
            }
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }

    fn op_name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Mount(_) => "mount",
            Command::Unmount => "unmount",
            Command::ShowSuperblock => "show-superblock",
            Command::List { .. } => "list",
            Command::ShowZone(_) => "show-zone",
            Command::ShowFile(_) => "show-file",
            Command::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    pub session: Session,
    prompt: String,
}

impl Shell {
    pub fn new(session: Session, prompt: impl Into<String>) -> Self {
        Self {
            session,
            prompt: prompt.into(),
        }
    }

    /// Ejecuta un comando. Los errores del núcleo se imprimen en una línea y
    /// la consola sigue; sólo fallan aquí los errores al escribir en `out`.
    pub fn execute<W: Write>(&mut self, cmd: &Command, out: &mut W) -> io::Result<Flow> {
        match self.run_command(cmd, out) {
            Ok(flow) => Ok(flow),
            Err(CommandFailure::Core(e)) => {
                let msg = format!("{} failed: {e}", cmd.op_name());
                writeln!(out, "{}", msg.red())?;
                Ok(Flow::Continue)
            }
            Err(CommandFailure::Output(e)) => Err(e),
        }
    }

    fn run_command<W: Write>(&mut self, cmd: &Command, out: &mut W) -> Result<Flow, CommandFailure> {
        match cmd {
            Command::Help => write!(out, "{HELP}")?,
            Command::Mount(path) => {
                self.session.mount(path)?;
                writeln!(out, "Disk image '{}' mounted successfully.", path.display())?;
            }
            Command::Unmount => {
                self.session.unmount()?;
                writeln!(out, "Disk unmounted successfully.")?;
            }
            Command::ShowSuperblock => {
                let sb = self.session.read_superblock()?;
                write!(out, "{}", display::superblock_report(&sb))?;
            }
            Command::List { long: false } => {
                for e in self.session.list_root()? {
                    writeln!(out, "{}", e.name_lossy())?;
                }
            }
            Command::List { long: true } => {
                for e in self.session.list_root_long()? {
                    writeln!(out, "{}", display::long_line(&e))?;
                }
            }
            Command::ShowZone(n) => {
                let block = self.session.dump_zone(*n)?;
                write!(out, "{}", display::hex_dump(*n, &block))?;
            }
            Command::ShowFile(name) => {
                // El núcleo entrega zonas completas; aquí se recorta al tamaño.
                let file = self.session.read_file(name)?;
                let bytes = file.contents();
                out.write_all(bytes)?;
                if bytes.last().is_some_and(|&b| b != b'\n') {
                    writeln!(out)?;
                }
            }
            Command::Quit => {
                if self.session.is_mounted() {
                    self.session.unmount()?;
                    writeln!(out, "Disk unmounted successfully.")?;
                }
                writeln!(out, "Exiting Minix console.")?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Bucle de lectura hasta `quit` o fin de la entrada. Al terminar por EOF
    /// también se desmonta.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                self.execute(&Command::Quit, out)?;
                return Ok(());
            };

            match Command::parse(&line?) {
                Ok(None) => {}
                Ok(Some(cmd)) => {
                    if self.execute(&cmd, out)? == Flow::Exit {
                        return Ok(());
                    }
                }
                Err(e) => writeln!(out, "{}", e.to_string().yellow())?,
            }
        }
    }
}

enum CommandFailure {
    Core(MinixError),
    Output(io::Error),
}

impl From<MinixError> for CommandFailure {
    fn from(e: MinixError) -> Self {
        CommandFailure::Core(e)
    }
}

impl From<io::Error> for CommandFailure {
    fn from(e: io::Error) -> Self {
        CommandFailure::Output(e)
    }
}
