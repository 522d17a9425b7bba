use frame_maintainer::{
    GeodeticFix, HeadingSample, MaintainerConfig, OdometryUpdate, RigidTransform, StampedTransform,
    TransformHistory, TransformMaintainer, TransformSink,
};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// One line of a replay log
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReplayEvent {
    Heading(HeadingSample),
    Fix(GeodeticFix),
    Odometry(OdometryUpdate),
    StaticTransform(StaticTransform),
}

#[derive(Debug, Deserialize)]
struct StaticTransform {
    parent_frame: String,
    child_frame: String,
    transform: RigidTransform,
}

/// Writes every published transform as one JSON line
struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> TransformSink for JsonLinesSink<W> {
    fn send(&mut self, transforms: &[StampedTransform]) {
        for transform in transforms {
            let written = serde_json::to_string(transform)
                .map_err(io::Error::from)
                .and_then(|line| writeln!(self.out, "{}", line));
            if let Err(e) = written {
                log::error!("Failed to write transform {} -> {}: {}", transform.parent_frame, transform.child_frame, e);
            }
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct ReplaySummary {
    events: usize,
    rejected: usize,
    malformed: usize,
}

/// Feed every line of `input` to `maintainer`; bad lines are logged and skipped
fn replay<R: BufRead, S: TransformSink>(
    input: R,
    maintainer: &mut TransformMaintainer<TransformHistory, S>,
) -> io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: ReplayEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Skipping line {}: {}", index + 1, e);
                summary.malformed += 1;
                continue;
            }
        };
        summary.events += 1;

        let accepted = match event {
            ReplayEvent::Heading(heading) => {
                maintainer.handle_heading(heading);
                true
            }
            ReplayEvent::Fix(fix) => maintainer.handle_fix(fix).is_ok(),
            ReplayEvent::Odometry(update) => maintainer.handle_odometry(update).is_ok(),
            ReplayEvent::StaticTransform(st) => {
                maintainer
                    .lookup_mut()
                    .add_static(st.parent_frame, st.child_frame, st.transform);
                true
            }
        };
        if !accepted {
            summary.rejected += 1;
        }
    }

    Ok(summary)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--config <config.json>] [<events.jsonl>]", program);
    eprintln!("Reads newline-delimited JSON events from the file, or stdin if omitted,");
    eprintln!("and prints every published transform as a JSON line.");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("frame_maintainer", |s| s.as_str());

    let mut config_path = None;
    let mut events_path = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            "--config" => match rest.next() {
                Some(path) => config_path = Some(path.clone()),
                None => {
                    print_usage(program);
                    return Err("--config requires a path".into());
                }
            },
            path if events_path.is_none() => events_path = Some(path.to_string()),
            other => {
                print_usage(program);
                return Err(format!("unexpected argument '{}'", other).into());
            }
        }
    }

    let config = match &config_path {
        Some(path) => MaintainerConfig::load_from_file(path)?,
        None => MaintainerConfig::default(),
    };
    let sink = JsonLinesSink { out: io::stdout().lock() };
    let mut maintainer = TransformMaintainer::new(config, TransformHistory::new(), sink)?;

    let frames = maintainer.frames();
    log::info!(
        "Maintaining {} -> {} -> {} -> {}",
        frames.earth_frame,
        frames.map_frame,
        frames.odom_frame,
        frames.base_link_frame
    );

    let summary = match &events_path {
        Some(path) => replay(BufReader::new(File::open(path)?), &mut maintainer)?,
        None => replay(io::stdin().lock(), &mut maintainer)?,
    };
    log::info!(
        "Replayed {} events ({} rejected, {} malformed lines)",
        summary.events,
        summary.rejected,
        summary.malformed
    );

    Ok(())
}
