//! Allocation-free tick path tests.
//!
//! These tests verify that `Engine::tick()` and the command drain do not
//! allocate. They run several seconds' worth of ticks through the paths
//! that touch the most state: free-run advance, retrigger runs, sequencer
//! record and replay.
//!
//! Just run `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use sb_engine::{Command, CommandQueue, Engine, EngineConfig, StatusCell};
use sb_ir::{PlayMode, SampleEntry, SampleLibrary, SliceTable};

/// Ticks in five seconds at 185 BPM.
const FIVE_SECONDS: usize = 5_000_000 / 1689;

fn library(slices: u16, mode: PlayMode) -> SampleLibrary {
    let table = SliceTable::evenly_spaced(slices as i32 * 4096, slices, 1, mode).unwrap();
    SampleLibrary::single(SampleEntry::new("amen", table))
}

/// Run `ticks` ticks, publishing each, aborting on any heap allocation.
fn assert_ticks_alloc_free(engine: &mut Engine, ticks: usize) {
    let cell = StatusCell::new();
    assert_no_alloc(|| {
        for _ in 0..ticks {
            engine.tick(&mut ());
            engine.publish(&cell);
        }
    });
}

#[test]
fn free_run_alloc_free() {
    let mut engine = Engine::new(library(16, PlayMode::FreeRun), EngineConfig::default());
    engine.apply(Command::Start);
    assert_ticks_alloc_free(&mut engine, FIVE_SECONDS);
    assert!(engine.transport().beats_total > 0);
}

#[test]
fn reverse_with_tempo_changes_alloc_free() {
    let config = EngineConfig { forward: false, ..Default::default() };
    let mut engine = Engine::new(library(7, PlayMode::SampleLoop), config);
    engine.apply(Command::Start);
    for bpm in [90, 140, 300] {
        engine.apply(Command::SetTempo(bpm));
        assert_ticks_alloc_free(&mut engine, 500);
    }
}

#[test]
fn retrigger_alloc_free() {
    let mut engine = Engine::new(library(16, PlayMode::SpliceLoop), EngineConfig::default());
    engine.apply(Command::Start);
    for _ in 0..20 {
        engine.apply(Command::ArmRetrigger { steps: 8, period_ticks: 6, volume_step: 0.125 });
        assert_ticks_alloc_free(&mut engine, 60);
    }
}

#[test]
fn command_drain_and_sequencer_alloc_free() {
    let mut engine = Engine::new(library(16, PlayMode::SpliceStop), EngineConfig::default());
    let mut queue: CommandQueue<16> = CommandQueue::new();

    assert_no_alloc(|| {
        let _ = queue.enqueue(Command::Start);
        engine.run_tick(&mut queue, &mut ());
        let _ = queue.enqueue(Command::RecordSequence);
        for i in 0..400u32 {
            if i % 7 == 0 {
                let _ = queue.enqueue(Command::Jump((i % 16) as u8));
            }
            engine.run_tick(&mut queue, &mut ());
        }
        let _ = queue.enqueue(Command::PlaySequence);
        for _ in 0..FIVE_SECONDS {
            engine.run_tick(&mut queue, &mut ());
        }
    });

    assert!(engine.track(0).unwrap().sequencer.len() > 1);
}
