// nfctype4-rs/nfctype4-tool/src/main.rs

//! Command line front end for the nfctype4 crate: read, write, format
//! and inspect NFC Forum Type 4 tags through a PC/SC reader.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use nfctype4::device::Device;
use nfctype4::transport::Transport;
use nfctype4::utils::{bytes_to_hex_spaced, parse_hex};
use nfctype4::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportKind {
    /// A PC/SC smart card reader (requires the `pcsc` build feature).
    Pcsc,
}

#[derive(Parser)]
#[command(
    name = "nfctype4-tool",
    version,
    about = "Read, write, format and inspect NFC Forum Type 4 tags"
)]
struct Cli {
    /// Transport used to reach the tag.
    #[arg(long, value_enum, default_value_t = TransportKind::Pcsc)]
    transport: TransportKind,

    /// Only use readers whose name contains this string.
    #[arg(long)]
    reader: Option<String>,

    /// Print tag payloads as hex instead of decoding them as UTF-8.
    #[arg(long)]
    raw: bool,

    /// Write the payload read from the tag to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read the NDEF message stored on a tag.
    Read,
    /// Update the tag with the given payload.
    Write {
        /// Payload bytes, UTF-8 unless --hex is given.
        payload: String,
        /// Parse the payload as hex bytes.
        #[arg(long)]
        hex: bool,
    },
    /// Erase the message length. Payload bytes remain on the tag until
    /// overwritten.
    Format,
    /// Print the parameters negotiated during NDEF detection.
    Inspect,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> nfctype4::Result<()> {
    let transport = make_transport(cli)?;
    let mut device = Device::new(transport);
    debug!("using {}", device.describe_transport());

    match &cli.command {
        Command::Read => {
            let message = device.read()?;
            emit(cli, &message)
        }
        Command::Write { payload, hex } => {
            let bytes = if *hex {
                parse_hex(payload).map_err(Error::Transport)?
            } else {
                payload.clone().into_bytes()
            };
            device.update(&bytes)?;
            println!("wrote {} bytes", bytes.len());
            Ok(())
        }
        Command::Format => {
            device.format()?;
            println!("format successful");
            Ok(())
        }
        Command::Inspect => {
            let info = device.inspect()?;
            println!("message length (NLEN):   {}", info.nlen);
            println!("max read length (MLe):   {}", info.max_read_len);
            println!("max update length (MLc): {}", info.max_update_len);
            println!("NDEF file size:          {}", info.max_ndef_len);
            println!("read-only:               {}", info.read_only);
            Ok(())
        }
    }
}

fn emit(cli: &Cli, message: &[u8]) -> nfctype4::Result<()> {
    if let Some(path) = &cli.output {
        fs::write(path, message).map_err(|e| Error::Transport(e.to_string()))?;
        println!("wrote {} bytes to {}", message.len(), path.display());
    } else if cli.raw {
        println!("{}", bytes_to_hex_spaced(message));
    } else {
        println!("{}", String::from_utf8_lossy(message));
    }
    Ok(())
}

#[cfg(feature = "pcsc")]
fn make_transport(cli: &Cli) -> nfctype4::Result<Box<dyn Transport>> {
    use nfctype4::transport::PcscTransport;
    match cli.transport {
        TransportKind::Pcsc => Ok(Box::new(match &cli.reader {
            Some(name) => PcscTransport::with_reader(name),
            None => PcscTransport::new(),
        })),
    }
}

#[cfg(not(feature = "pcsc"))]
fn make_transport(cli: &Cli) -> nfctype4::Result<Box<dyn Transport>> {
    match cli.transport {
        TransportKind::Pcsc => Err(Error::Transport(
            "this build has no pcsc support; rebuild with --features pcsc".to_string(),
        )),
    }
}
