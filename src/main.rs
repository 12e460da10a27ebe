// CPU: --ips times per second
// Display and timers: --fps times per second (60 by default)

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use chip8vm::{Emulator, TIMER_TICKS_PER_SECOND};
use frontend::Frontend;

mod frontend;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 emulator", long_about = None)]
pub struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Window scale factor: 1, 2, 4, 8, 16 or 32
    #[arg(short, long, default_value_t = 16)]
    scale: u32,

    /// Instructions per second
    #[arg(short, long, default_value_t = 700)]
    ips: u32,

    /// Frames per second; timers count down once per frame
    #[arg(short, long, default_value_t = TIMER_TICKS_PER_SECOND as u32)]
    fps: u32,

    /// Log every register at debug level once per frame
    #[arg(long)]
    dump_registers: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.fps > 0, "--fps must be at least 1");

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;
    let mut emu = Emulator::init(&rom).context("unable to start session")?;

    let title = args
        .rom
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chip8vm".to_owned());
    let mut frontend = Frontend::new(&args, &title)?;
    frontend.run(&mut emu)
}
