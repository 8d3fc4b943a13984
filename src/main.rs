// src/main.rs

//! Demo binary: drives a hue circle around the terminal.
//!
//! A 3x3 block of cycling hue orbits the surface along a sine/cosine
//! path, exercising the whole pipeline end to end: block writes, dirty
//! tracking, the render worker, and escape-sequence emission to stdout.
//!
//! Usage: `pixterm [config.json]`. Without a config file the surface is
//! sized from the controlling terminal.

use pixterm::{BlockDescriptor, DisplayConfig, StdoutSink, TerminalDisplay};

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::Write;
use std::time::Duration;
use termios::{tcsetattr, Termios, ECHO, ICANON, TCSANOW};

const CURSOR_HIDE: &str = "\x1b[?25l";
const CURSOR_SHOW: &str = "\x1b[?25h";
const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";

/// Puts the terminal into a quiet state for the demo (no echo, no line
/// buffering, hidden cursor) and restores everything on drop.
struct TerminalGuard {
    original_termios: Option<Termios>,
}

impl TerminalGuard {
    fn new() -> Self {
        let original_termios = match Termios::from_fd(libc::STDIN_FILENO) {
            Ok(ts) => {
                let mut quiet = ts;
                quiet.c_lflag &= !(ECHO | ICANON);
                if let Err(e) = tcsetattr(libc::STDIN_FILENO, TCSANOW, &quiet) {
                    warn!("failed to set terminal attributes: {}", e);
                }
                Some(ts)
            }
            Err(e) => {
                warn!("failed to get termios, keystrokes will echo: {}", e);
                None
            }
        };
        print!("{}{}", CURSOR_HIDE, CLEAR_SCREEN_AND_HOME);
        let _ = std::io::stdout().flush();
        TerminalGuard { original_termios }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(ref ts) = self.original_termios {
            let _ = tcsetattr(libc::STDIN_FILENO, TCSANOW, ts);
        }
        print!("{}", CURSOR_SHOW);
        let _ = std::io::stdout().flush();
    }
}

/// HSV to RGB, h in degrees [0, 360), s and v in [0, 1].
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r1, g1, b1) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

fn load_config() -> Result<DisplayConfig> {
    if let Some(path) = std::env::args().nth(1) {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        return DisplayConfig::from_json(&json)
            .with_context(|| format!("failed to parse config file '{}'", path));
    }

    match StdoutSink::terminal_size_cells() {
        Ok((cols, rows)) => {
            // Two character columns per pixel.
            Ok(DisplayConfig::new((cols / 2).max(1), rows))
        }
        Err(e) => {
            warn!("could not query terminal size ({}), using defaults", e);
            Ok(DisplayConfig::default())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config()?;
    info!("surface size: {}x{}", config.width, config.height);

    let _guard = TerminalGuard::new();
    let display = TerminalDisplay::new(&config, StdoutSink::new())
        .context("failed to initialize terminal display")?;
    display.blanking_off();

    let caps = display.capabilities();
    let desc = BlockDescriptor::complete(3, 3);
    let mut block = [0u8; 3 * 3 * 3];

    let mut theta: f64 = 0.0;
    while theta <= 10.0 * std::f64::consts::PI {
        let hue = (theta * 100.0) % 360.0;
        let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
        for pixel in block.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[r, g, b]);
        }

        let x = (theta.sin() + 1.0) * (f64::from(caps.width - 1) / 2.5);
        let y = (theta.cos() + 1.0) * (f64::from(caps.height - 1) / 2.5);
        display.write_block(x as u16, y as u16, &desc, &block)?;

        std::thread::sleep(Duration::from_millis(10));
        theta += 0.1;
    }

    // Blank before leaving so the shell prompt returns to a clean screen.
    display.blanking_on();
    std::thread::sleep(Duration::from_millis(100));
    Ok(())
}
