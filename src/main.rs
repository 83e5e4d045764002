//! Headless front end: open a file, apply a list of edits, save the result.

use std::path::PathBuf;

use wavecut::config::{self, EditorSettings};
use wavecut::logging;
use wavecut::session::{
    CommandOutcome, EditorSession, SessionCommand, SessionDispatcher, SessionEvent,
};

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

struct Options {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    commands: Vec<SessionCommand>,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let settings = load_settings(options.config.as_deref())?;
    let mut dispatcher = SessionDispatcher::new(EditorSession::new(settings));
    let sender = dispatcher.sender();

    let mut commands = vec![SessionCommand::Open(options.input)];
    commands.extend(options.commands);
    commands.push(SessionCommand::Save(options.output));
    for command in commands {
        sender
            .send(SessionEvent::Command(command))
            .map_err(|err| format!("Queue command failed: {err}"))?;
    }

    let report = dispatcher.pump();
    for result in report.commands {
        match result.outcome {
            Ok(CommandOutcome::Opened(opened)) => {
                if let Some(warning) = &opened.transcode_warning {
                    println!("warning: {warning}; loaded the input unconverted");
                }
                println!("opened: {} samples ({} ms)", opened.samples, opened.duration_ms);
            }
            Ok(CommandOutcome::Saved(path)) => println!("saved: {}", path.display()),
            Ok(outcome) => println!("{:?}: {outcome:?}", result.command),
            Err(err) if err.is_user_facing() => println!("{:?}: {err}", result.command),
            Err(err) => return Err(format!("{:?} failed: {err}", result.command)),
        }
    }
    Ok(())
}

fn load_settings(path: Option<&std::path::Path>) -> Result<EditorSettings, String> {
    let loaded = match path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    };
    loaded.map_err(|err| format!("Load settings failed: {err}"))
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(None);
    }
    let mut config = None;
    let mut positional = Vec::new();
    let mut commands = Vec::new();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let value = it
                    .next()
                    .ok_or_else(|| "Missing value for --config".to_string())?;
                config = Some(PathBuf::from(value));
            }
            _ if positional.len() < 2 => positional.push(PathBuf::from(arg)),
            _ => commands.push(parse_command(&arg)?),
        }
    }
    let mut positional = positional.into_iter();
    let (Some(input), Some(output)) = (positional.next(), positional.next()) else {
        print_help();
        return Err("Expected <input> and <output>".to_string());
    };
    Ok(Some(Options {
        input,
        output,
        config,
        commands,
    }))
}

fn parse_command(arg: &str) -> Result<SessionCommand, String> {
    let (name, value) = match arg.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (arg, None),
    };
    let command = match (name, value) {
        ("cut", None) => SessionCommand::Cut,
        ("copy", None) => SessionCommand::Copy,
        ("paste", None) => SessionCommand::Paste,
        ("delete", None) => SessionCommand::DeleteSegment,
        ("mute", None) => SessionCommand::MuteSegment,
        ("undo", None) => SessionCommand::Undo,
        ("redo", None) => SessionCommand::Redo,
        ("zoom", Some(value)) => SessionCommand::SetZoom(parse_number(name, value)?),
        ("seek", Some(value)) => SessionCommand::Seek {
            ms: value
                .parse()
                .map_err(|_| format!("Invalid milliseconds for seek: {value}"))?,
        },
        ("select", Some(value)) => {
            let (start, end) = value
                .split_once("..")
                .ok_or_else(|| format!("Expected select=<start>..<end>, got {arg}"))?;
            SessionCommand::SelectSamples {
                start: parse_number(name, start)?,
                end: parse_number(name, end)?,
            }
        }
        _ => return Err(format!("Unknown operation: {arg}")),
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number for {name}: {value}"))
}

fn print_help() {
    println!("Usage: wavecut [--config <path>] <input> <output> [operation...]");
    println!();
    println!("Operations, applied in order:");
    println!("  select=<start>..<end>  Select samples [start, end)");
    println!("  cut | copy | paste     Clipboard edits (paste inserts at the cursor)");
    println!("  delete | mute          Remove or silence the selection");
    println!("  undo | redo            Move through the edit history");
    println!("  zoom=<factor>          Set zoom (1, 2, 4, ... 32)");
    println!("  seek=<ms>              Move the cursor");
}
