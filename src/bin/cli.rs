//! slicebox CLI: runs the engine headless against a synthetic break.
//!
//! Usage:
//!   slicebox [--bpm 185] [--slices 16] [--seconds 8] [--mode free]
//!            [--reverse] [--seed 24301]
//!
//! `RUST_LOG=debug` shows tempo and transport logging.

use sb_host::{
    Controller, EngineConfig, HostConfig, PlayMode, SampleEntry, SampleLibrary, SliceTable,
};
use std::io::Write;
use std::time::{Duration, Instant};
use std::{env, process};

/// Samples per slice in the synthetic break.
const SLICE_LEN: i32 = 4096;

struct Options {
    bpm: u16,
    slices: u16,
    seconds: u64,
    mode: PlayMode,
    reverse: bool,
    seed: u64,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!(
            "Usage: slicebox [--bpm N] [--slices N] [--seconds N] [--mode NAME] [--reverse] [--seed N]"
        );
        process::exit(1);
    });

    let table = SliceTable::evenly_spaced(SLICE_LEN * opts.slices as i32, opts.slices, 1, opts.mode)
        .unwrap_or_else(|e| {
            eprintln!("Failed to build slice table: {}", e);
            process::exit(1);
        });
    let library = SampleLibrary::single(SampleEntry::new("synthetic", table));

    let engine_config = EngineConfig {
        tempo: opts.bpm,
        forward: !opts.reverse,
        seed: opts.seed,
        ..Default::default()
    };

    println!("Tempo:    {} BPM", engine_config.tempo);
    println!("Slices:   {}", opts.slices);
    println!("Mode:     {:?}", opts.mode);
    println!("Reverse:  {}", opts.reverse);
    println!();

    let mut ctrl = Controller::new(library, engine_config, HostConfig::default());
    if let Err(e) = run(&mut ctrl, opts.seconds) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(ctrl: &mut Controller, seconds: u64) -> Result<(), sb_host::HostError> {
    ctrl.launch()?;
    ctrl.start()?;
    log::info!(target: "cli", "playing for {} s", seconds);
    println!("Playing...");
    println!();

    let deadline = Instant::now() + Duration::from_secs(seconds);
    while Instant::now() < deadline {
        let s = ctrl.status();
        print!(
            "\rBeat: {:02} | Slice: {:02} | Phase: {:7} | Tick: {:6}",
            s.beat, s.slice, s.phase, s.tick
        );
        let _ = std::io::stdout().flush();
        std::thread::sleep(Duration::from_millis(10));
    }

    ctrl.stop()?;
    std::thread::sleep(Duration::from_millis(20));
    ctrl.shutdown()?;
    println!("\rDone.                                                ");
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options {
        bpm: sb_ir::DEFAULT_TEMPO,
        slices: 16,
        seconds: 8,
        mode: PlayMode::FreeRun,
        reverse: false,
        seed: 0x5eed,
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--reverse" => opts.reverse = true,
            "--bpm" => opts.bpm = value(flag, iter.next())?,
            "--slices" => opts.slices = value(flag, iter.next())?,
            "--seconds" => opts.seconds = value(flag, iter.next())?,
            "--seed" => opts.seed = value(flag, iter.next())?,
            "--mode" => {
                let name = iter.next().ok_or("--mode needs a value")?;
                opts.mode =
                    PlayMode::from_name(name).ok_or_else(|| format!("Unknown mode: {}", name))?;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    if opts.slices == 0 {
        return Err("--slices must be at least 1".into());
    }
    Ok(opts)
}

fn value<T: std::str::FromStr>(flag: &str, arg: Option<&String>) -> Result<T, String> {
    let arg = arg.ok_or_else(|| format!("{} needs a value", flag))?;
    arg.parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, arg))
}
