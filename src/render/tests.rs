// src/render/tests.rs

use crate::color::Rgb24;
use crate::encoder::TerminalEncoder;
use crate::error::DisplayError;
use crate::render::{run_pass, BlankingState, PassKind};
use crate::sink::ByteSink;
use crate::surface::{BlockDescriptor, PixelSurface};

use std::io;
use test_log::test;

/// Sink that starts failing after a fixed number of successful writes.
struct FailingSink {
    accepted: Vec<u8>,
    writes_before_failure: usize,
    writes: usize,
}

impl FailingSink {
    fn new(writes_before_failure: usize) -> Self {
        FailingSink {
            accepted: Vec::new(),
            writes_before_failure,
            writes: 0,
        }
    }
}

impl ByteSink for FailingSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.writes >= self.writes_before_failure {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone"));
        }
        self.writes += 1;
        self.accepted.extend_from_slice(bytes);
        Ok(())
    }
}

fn write_pixel(surface: &PixelSurface, x: u16, y: u16, color: Rgb24) {
    surface
        .write_block(
            x,
            y,
            &BlockDescriptor::complete(1, 1),
            &[color.r, color.g, color.b],
        )
        .unwrap();
}

/// Splits captured sink bytes into per-pixel emissions (each ends with
/// the SGR reset).
fn emissions(bytes: &[u8]) -> Vec<String> {
    let text = std::str::from_utf8(bytes).unwrap();
    text.split_inclusive("\x1b[0m").map(String::from).collect()
}

fn steady_normal() -> BlankingState {
    let blanking = BlankingState::new();
    blanking.set_on(false);
    blanking.commit(false);
    blanking
}

#[test]
fn pass_kind_transition_table() {
    assert_eq!(PassKind::derive(true, false), PassKind::Clear);
    assert_eq!(PassKind::derive(false, true), PassKind::Restore);
    assert_eq!(PassKind::derive(true, true), PassKind::Incremental);
    assert_eq!(PassKind::derive(false, false), PassKind::Incremental);
}

#[test]
fn clear_pass_paints_black_and_ignores_dirty_bits() {
    let surface = PixelSurface::new(2, 2);
    write_pixel(&surface, 0, 0, Rgb24::new(255, 0, 0));

    // Fresh blanking state: on, not previously on.
    let blanking = BlankingState::new();
    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();

    let emitted = emissions(&encoder.into_sink());
    assert_eq!(emitted.len(), 4);
    for e in &emitted {
        assert!(e.contains("\x1b[48;5;16m"), "expected black: {:?}", e);
    }
    assert!(blanking.previously_on());

    // The clear did not consume the dirty bit; the stored image survives.
    assert!(surface.test_and_clear_dirty(0, 0));
    assert_eq!(surface.read_pixel(0, 0), Rgb24::new(255, 0, 0));
}

#[test]
fn restore_pass_emits_stored_buffer_and_resets_baseline() {
    let surface = PixelSurface::new(2, 1);
    write_pixel(&surface, 1, 0, Rgb24::WHITE);

    let blanking = BlankingState::new();
    blanking.set_on(false);
    blanking.commit(true); // coming out of blanking

    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();

    let emitted = emissions(&encoder.into_sink());
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0], "\x1b[1;1H\x1b[48;5;16m  \x1b[0m");
    assert_eq!(emitted[1], "\x1b[1;3H\x1b[48;5;231m  \x1b[0m");

    assert!(!blanking.previously_on());
    assert!(!surface.test_and_clear_dirty(0, 0));
    assert!(!surface.test_and_clear_dirty(1, 0));
}

#[test]
fn incremental_pass_emits_exactly_the_dirty_set_once() {
    let surface = PixelSurface::new(4, 4);
    write_pixel(&surface, 2, 1, Rgb24::new(10, 20, 30));
    write_pixel(&surface, 0, 3, Rgb24::new(95, 95, 95));

    let blanking = steady_normal();
    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();

    let emitted = emissions(&encoder.into_sink());
    assert_eq!(emitted.len(), 2);
    // Row-major scan order: (2,1) first, then (0,3).
    assert_eq!(emitted[0], "\x1b[2;5H\x1b[48;5;16m  \x1b[0m");
    assert_eq!(emitted[1], "\x1b[4;1H\x1b[48;5;59m  \x1b[0m");

    // A second pass has nothing left to emit.
    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();
    assert!(encoder.into_sink().is_empty());
}

#[test]
fn single_pixel_scenario_four_by_four() {
    let surface = PixelSurface::new(4, 4);
    write_pixel(&surface, 2, 1, Rgb24::new(10, 20, 30));

    let blanking = steady_normal();
    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();

    assert_eq!(encoder.into_sink(), b"\x1b[2;5H\x1b[48;5;16m  \x1b[0m");
    for y in 0..4 {
        for x in 0..4 {
            assert!(!surface.test_and_clear_dirty(x, y));
        }
    }
}

#[test]
fn sink_failure_aborts_pass_and_keeps_unvisited_dirty_bits() {
    let surface = PixelSurface::new(2, 2);
    write_pixel(&surface, 0, 0, Rgb24::new(255, 0, 0));
    write_pixel(&surface, 1, 1, Rgb24::new(0, 255, 0));

    let blanking = steady_normal();
    // First emission succeeds, second fails.
    let mut encoder = TerminalEncoder::new(FailingSink::new(1));
    let err = run_pass(&surface, &blanking, &mut encoder).unwrap_err();
    assert!(matches!(err, DisplayError::SinkFailure(_)));

    // (0,0) was flushed and consumed; (1,1) failed after its bit was
    // cleared and is lost, but nothing after it was visited. With a wider
    // surface the remainder would stay dirty; here we check the pass
    // stopped at the failure point.
    let accepted = encoder.into_sink().accepted;
    assert_eq!(emissions(&accepted).len(), 1);
}

#[test]
fn sink_failure_leaves_later_pixels_dirty_for_retry() {
    let surface = PixelSurface::new(3, 1);
    write_pixel(&surface, 0, 0, Rgb24::new(255, 0, 0));
    write_pixel(&surface, 2, 0, Rgb24::new(0, 255, 0));

    let blanking = steady_normal();
    let mut encoder = TerminalEncoder::new(FailingSink::new(1));
    run_pass(&surface, &blanking, &mut encoder).unwrap_err();

    // (2,0) was never visited; its dirty bit survives for the next wake.
    assert!(surface.test_and_clear_dirty(2, 0));
}

#[test]
fn blanking_toggles_coalesce_between_passes() {
    let surface = PixelSurface::new(1, 1);
    let blanking = steady_normal();

    // on, off, on again before the worker runs: only the last value counts.
    blanking.set_on(true);
    blanking.set_on(false);
    blanking.set_on(true);

    let mut encoder = TerminalEncoder::new(Vec::<u8>::new());
    run_pass(&surface, &blanking, &mut encoder).unwrap();
    // Derived as Clear (on=true, previously_on=false), then committed.
    assert!(blanking.previously_on());
    assert_eq!(emissions(&encoder.into_sink()).len(), 1);
}
