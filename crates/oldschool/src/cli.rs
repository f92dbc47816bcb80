//! Command-line parsing.
//!
//! Hand-rolled over `std::env::args`; every flag maps onto one field of
//! [`DemoConfig`].

use oldschool_core::{DemoConfig, EffectKind, EngineError, EngineResult, Handoff, Scheduling};

/// Printed to stderr for `--help` and for any parse error.
pub const USAGE: &str = "\
Usage:
--help            (-h): this info
--fullscreen      (-f): run in the fullscreen mode
--vsync           (-s): cap presentation at 60 fps
--fps             (-p): emit fps counter every 3 seconds in console
--effect <name>   (-e): xor | tunnel (default: tunnel)
--width <px>      (-W): screen width (default: 640, fullscreen 1920)
--height <px>     (-H): screen height (default: 480, fullscreen 1080)
--threads <n>     (-t): 1 = single loop, 2 = simulation + presentation (default: 2)
--handoff <name>      : locks | drop-oldest | block (default: drop-oldest)
";

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print usage and exit.
    Help,
    /// Run the demo.
    Run(DemoConfig),
}

/// Parses the arguments after the program name.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] for an unknown flag, a missing or
/// malformed value, or an unsupported thread count.
pub fn parse_args<I, S>(args: I) -> EngineResult<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    let mut fullscreen = false;
    let mut vsync = false;
    let mut emit_fps = false;
    let mut effect = EffectKind::default();
    let mut width = None;
    let mut height = None;
    let mut threads = 2;
    let mut handoff = Handoff::default();

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .map(String::as_str)
                .ok_or_else(|| EngineError::InvalidConfig(format!("{flag} expects a value")))
        };

        match flag {
            "--help" | "-h" => return Ok(Command::Help),
            "--fullscreen" | "-f" => fullscreen = true,
            "--vsync" | "-s" => vsync = true,
            "--fps" | "-p" => emit_fps = true,
            "--effect" | "-e" => effect = value()?.parse()?,
            "--width" | "-W" => width = Some(parse_number(flag, value()?)?),
            "--height" | "-H" => height = Some(parse_number(flag, value()?)?),
            "--threads" | "-t" => threads = parse_number(flag, value()?)?,
            "--handoff" => handoff = value()?.parse()?,
            other => {
                return Err(EngineError::InvalidConfig(format!("unknown option '{other}'")));
            }
        }
        i += 1;
    }

    let (width, height) = DemoConfig::resolve_size(fullscreen, width, height);
    Ok(Command::Run(DemoConfig {
        width,
        height,
        fullscreen,
        vsync,
        emit_fps,
        effect,
        scheduling: Scheduling::from_threads(threads, handoff)?,
    }))
}

fn parse_number(flag: &str, value: &str) -> EngineResult<u32> {
    value
        .parse()
        .map_err(|_| EngineError::InvalidConfig(format!("{flag}: '{value}' is not a number")))
}
