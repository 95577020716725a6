//! `binref` binary entry point (spec.md §6).
//!
//! Two invocation modes (SPEC_FULL.md §1): a whole pipeline expression runs
//! in-process against one synthetic root chunk built from stdin; a lone
//! non-source unit instead reads/writes the framed wire protocol directly,
//! so two `binref` processes can be chained through a real OS pipe with no
//! loss of chunk structure.

use std::io::{self, Read, Write};
use std::rc::Rc;

use refinery::chunk::Chunk;
use refinery::cli;
use refinery::error::RefineryError;
use refinery::frame::{self, Record};
use refinery::handlers::default_registry;
use refinery::logging;
use refinery::pipeline::{self, Stage};

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("binref: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<(), RefineryError> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let nodes = cli::parse_pipeline(&argv)?;
    let registry = Rc::new(default_registry());
    let mut stages = pipeline::build_stages(nodes.clone(), &registry)?;

    if cli::wants_framed_stdio_mode(&nodes) {
        run_framed_stdio(&mut stages)
    } else {
        run_whole_pipeline(&mut stages)
    }
}

/// Whole-pipeline-expression mode: seed a single root chunk from stdin (if
/// any was piped in), run every stage in-process, and write the rendered
/// result (`pipeline::render_whole_pipeline_output`) to stdout.
fn run_whole_pipeline(stages: &mut [Stage]) -> Result<(), RefineryError> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    let seed = Chunk::root(input);

    let out = pipeline::driver::run(stages, vec![seed], false)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(&pipeline::render_whole_pipeline_output(&out))?;
    Ok(())
}

/// Single-unit framed-stdio mode: stream framed (or raw) records off
/// stdin, run each visible chunk through the one configured unit, and
/// re-encode the result as a framed stream on stdout.
fn run_framed_stdio(stages: &mut [Stage]) -> Result<(), RefineryError> {
    let stdin = io::stdin();
    let reader = frame::FrameReader::new(stdin.lock())?;
    let mut produced = Vec::new();
    for record in reader {
        match record? {
            Record::Open => produced.push(Record::Open),
            Record::Close => produced.push(Record::Close),
            Record::Chunk(chunk) => {
                let out = pipeline::driver::run(stages, vec![chunk], false)?;
                produced.extend(out.into_iter().map(Record::Chunk));
            }
        }
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    frame::encode_stream(&mut handle, produced)?;
    Ok(())
}
