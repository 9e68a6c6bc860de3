use anyhow::Context;
use clap::Parser;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;
use trs80_emu::{Machine, bus::DEFAULT_LOAD_ADDRESS, video};

/// A TRS-80 Model I emulator.
#[derive(Debug, Parser)]
struct Args {
    /// Specifies the path to the ROM image that the emulator will install.
    #[arg(
        short,
        long,
        help = "Required. Specifies the path to the ROM image to install."
    )]
    rom: String,
    /// Specifies the path to a program image that is loaded into RAM after the ROM is installed.
    #[arg(
        short,
        long,
        help = "Optional. Specifies the path to a program image to load into RAM."
    )]
    program: Option<String>,
    /// Specifies the address the program image is loaded at as a hex value. Defaults to 0x4200.
    #[arg(
        short,
        long,
        help = "Optional. Specifies the hex address to load the program image at."
    )]
    address: Option<String>,
}

/// Main entry point into the emulator application.
fn main() -> anyhow::Result<()> {
    // Default to INFO logs but allow the RUST_LOG env variable to override.
    tracing_subscriber::fmt()
        .pretty()
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let mut machine = Machine::new();

    let rom = std::fs::read(&args.rom).context(format!("read ROM image: {}", args.rom))?;
    machine.load_rom(&rom)?;

    tracing::info!("memory installed: {}", machine.bus().stats());

    if let Some(path) = args.program {
        let origin = match args.address {
            Some(hex) => parse_address(&hex)?,
            None => DEFAULT_LOAD_ADDRESS,
        };

        let data = std::fs::read(&path).context(format!("read program image: {}", path))?;
        let loaded = machine.load_program_at(&data, origin)?;

        tracing::info!("program loaded at {:#06x}", loaded);
    }

    render_screen(&machine);

    Ok(())
}

/// Parses a program load address from a hex string with an optional `0x` prefix.
fn parse_address(hex: &str) -> anyhow::Result<u16> {
    let digits = hex.trim_start_matches("0x");

    u16::from_str_radix(digits, 16).context(format!("parse load address: {}", hex))
}

/// Renders the current contents of the text screen to stdout, one line per display row.
fn render_screen(machine: &Machine) {
    let cells = machine.video().screen_snapshot(machine.bus());

    for row in cells.iter() {
        let line: String = row.iter().map(|code| display_char(*code)).collect();
        println!("{}", line);
    }
}

/// Maps a display code to a terminal character. Graphics blocks are shaded by the number of lit
/// sub pixels since a terminal cell cannot render the 2 x 3 pattern exactly.
fn display_char(code: u8) -> char {
    if video::is_graphics_code(code) {
        match (code - video::GRAPHICS_CODE_BASE).count_ones() {
            0 => ' ',
            1 | 2 => '░',
            3 | 4 => '▒',
            _ => '▓',
        }
    } else if code.is_ascii_graphic() || code == b' ' {
        code as char
    } else {
        ' '
    }
}
