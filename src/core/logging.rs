//! Logging setup
//!
//! Diagnostics go to stderr through `log` + `pretty_env_logger`, keeping
//! stdout free for rendered results. `RUST_LOG` overrides the CLI level.

use std::io::Write as _;

use log::{Level, LevelFilter};
use pretty_env_logger::env_logger;

/// Map the global `--quiet` / `--verbose` flags to a level
pub fn level_for(quiet: bool, verbose: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}

/// Install the global logger. Later calls are ignored.
pub fn init(level: LevelFilter, color: bool) {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(level);
    builder.parse_default_env();
    builder.write_style(if color {
        env_logger::WriteStyle::Auto
    } else {
        env_logger::WriteStyle::Never
    });

    builder.format(|buf, record| {
        let mut level_style = buf.style();
        level_style.set_color(match record.level() {
            Level::Error => env_logger::fmt::Color::Red,
            Level::Warn => env_logger::fmt::Color::Yellow,
            Level::Info => env_logger::fmt::Color::Green,
            Level::Debug => env_logger::fmt::Color::Blue,
            Level::Trace => env_logger::fmt::Color::Magenta,
        });
        level_style.set_bold(true);

        writeln!(
            buf,
            "{} {} {} > {}",
            buf.timestamp(),
            level_style.value(format!("{:<5}", record.level())),
            record.target(),
            record.args()
        )
    });

    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(false, true), LevelFilter::Debug);
        assert_eq!(level_for(true, false), LevelFilter::Warn);
        assert_eq!(level_for(true, true), LevelFilter::Warn);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(LevelFilter::Off, false);
        init(LevelFilter::Off, false);
    }
}
