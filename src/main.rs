//! NES emulator entry point.
//!
//! Loads a cartridge and runs the console in a window, or headless for a fixed number of frames.
//! Usage: famicore <ROM> [--scale N] [--frames N] [--headless] [--timing instruction|cycle]

use std::{
    fs,
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

use clap::Parser;
use famicore::{
    cartridge::cartridge::Cartridge,
    config::{Config, Timing},
    console::Console,
    controller::Button,
    error::EmuError,
    logger,
    ppu::render::{HEIGHT, WIDTH},
};
use log::LevelFilter;
use minifb::{Key, Scale, Window, WindowOptions};

/// NES runs at ~60.0988 Hz (NTSC). Target one frame per 16.67 ms for ~60 fps.
const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Frames run by `--headless` when `--frames` is not given.
const HEADLESS_FRAMES: u64 = 60;

const KEYMAP: [(Key, Button); 8] = [
    (Key::Z, Button::A),
    (Key::X, Button::B),
    (Key::RightShift, Button::Select),
    (Key::Enter, Button::Start),
    (Key::Up, Button::Up),
    (Key::Down, Button::Down),
    (Key::Left, Button::Left),
    (Key::Right, Button::Right),
];

/// NES emulator
#[derive(Parser, Debug)]
#[command(name = "famicore", version, about, long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Window scale (1, 2, 4 or 8)
    #[arg(long, default_value_t = 2)]
    scale: usize,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Run without a window and print the CPU state at the end
    #[arg(long)]
    headless: bool,

    /// PPU dots per instruction or per CPU cycle
    #[arg(long, value_enum, default_value_t = Timing::Instruction)]
    timing: Timing,

    /// Maximum log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    /// Log every executed instruction (same as --log-level trace)
    #[arg(long)]
    trace: bool,

    /// Do not write battery-backed RAM to <rom>.sav
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            timing: self.timing,
            scale: self.scale,
            frame_limit: self.frames,
            headless: self.headless,
            save_battery: !self.no_save,
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        args.log_level
    };
    if let Err(err) = logger::init(level) {
        eprintln!("logger: {err}");
    }

    if let Err(err) = run(&args.rom, &args.config()) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(rom: &Path, config: &Config) -> Result<(), EmuError> {
    let mut cartridge = Cartridge::load(rom)?;
    let battery = cartridge.header.battery;
    let save_path = rom.with_extension("sav");
    if battery {
        load_save(&mut cartridge, &save_path);
    }

    let mut console = Console::new(cartridge, config);
    let result = if config.headless {
        run_headless(&mut console, config)
    } else {
        run_window(&mut console, config)
    };

    // Keep the save even when emulation faulted
    if battery && config.save_battery {
        write_save(&console, &save_path);
    }
    result
}

fn run_headless(console: &mut Console, config: &Config) -> Result<(), EmuError> {
    let frames = config.frame_limit.unwrap_or(HEADLESS_FRAMES);
    for _ in 0..frames {
        console.run_frame()?;
    }

    let cpu = console.cpu();
    println!(
        "frames: {}  PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        console.frame_count(),
        cpu.pc,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status(),
        cpu.sp,
        cpu.cycles
    );
    Ok(())
}

fn run_window(console: &mut Console, config: &Config) -> Result<(), EmuError> {
    let mut window = Window::new(
        "Famicore",
        WIDTH,
        HEIGHT,
        WindowOptions {
            resize: true,
            scale: scale(config.scale),
            scale_mode: minifb::ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )
    .expect("Failed to create window");

    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if config
            .frame_limit
            .is_some_and(|limit| console.frame_count() >= limit)
        {
            break;
        }
        let frame_start = Instant::now();

        let pad = console.controller_mut(0);
        for (key, button) in KEYMAP {
            pad.set_button(button, window.is_key_down(key));
        }

        console.run_frame()?;

        if let Err(err) = window.update_with_buffer(console.framebuffer(), WIDTH, HEIGHT) {
            log::error!("window update failed: {err}");
            break;
        }

        // Pace to ~60 fps so we don't burn CPU (emulation is far faster than real NES)
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }
    Ok(())
}

fn scale(factor: usize) -> Scale {
    match factor {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        _ => Scale::FitScreen,
    }
}

fn load_save(cartridge: &mut Cartridge, path: &Path) {
    match fs::read(path) {
        Ok(data) => {
            if cartridge.load_prg_ram(&data) {
                log::info!("loaded {} bytes from {}", data.len(), path.display());
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => log::warn!("could not read {}: {err}", path.display()),
    }
}

fn write_save(console: &Console, path: &Path) {
    let Some(ram) = console.bus().cart.prg_ram() else {
        return;
    };
    match fs::write(path, ram) {
        Ok(()) => log::info!("saved {} bytes to {}", ram.len(), path.display()),
        Err(err) => log::warn!("could not write {}: {err}", path.display()),
    }
}
