mod app;
mod calendar;
mod config;
mod help;
mod jumpto;
mod labels;
mod theme;
use crate::app::App;
use crate::calendar::clock::SystemClock;
use crate::config::RawOptions;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::UtcOffset;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "MONTHGRID_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
        options: RawOptions,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        let mut options = RawOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Short('l') | Arg::Long("lang") => {
                    options.language = Some(parser.value()?.string()?);
                }
                Arg::Long("value") => options.value = Some(parser.value()?.string()?),
                Arg::Long("min") => options.min_date = Some(parser.value()?.string()?),
                Arg::Long("max") => options.max_date = Some(parser.value()?.string()?),
                Arg::Long("disable") => {
                    options.disabled_dates.push(parser.value()?.string()?);
                }
                Arg::Long("holiday") => options.holidays.push(parser.value()?.string()?),
                Arg::Long("disable-weekends") => options.disable_weekends = true,
                Arg::Long("weekend-holidays") => options.weekend_holidays = true,
                Arg::Value(value) if options.default_date.is_none() => {
                    options.default_date = Some(value.string()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            config,
            log_file,
            options,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                config,
                log_file,
                options,
            } => {
                let log_file = log_file.or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from));
                init_logging(log_file.as_deref())?;
                // Must be determined before any other threads are spawned
                let offset = UtcOffset::current_local_offset()
                    .context("failed to determine local time offset")?;
                let options = match config {
                    Some(path) => RawOptions::load(&path)?.overridden_by(options),
                    None => options,
                };
                let settings = options.resolve(offset)?;
                let language = settings.language;
                let picker = settings
                    .into_picker(SystemClock::new(offset))
                    .context("initial date is out of range")?;
                tracing::info!(
                    month = %picker.reference_month(),
                    ownership = ?picker.ownership(),
                    "Starting date picker"
                );
                let selected = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    Ok(App::new(picker, language).run(&mut terminal)?)
                })?;
                if let Some(date) = selected {
                    println!("{date}");
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: monthgrid [<options>] [YYYY-MM-DD]");
                println!();
                println!("Terminal date picker with disabled dates, holidays, and selectable ranges");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>   Read options from a TOML file");
                println!("  -l, --lang <LANG>     Label language: en, es, or fr");
                println!("      --value <DATE>    Start with this date selected, owned by the app");
                println!("      --min <DATE>      Earliest selectable date");
                println!("      --max <DATE>      Latest selectable date");
                println!("      --disable <DATE>  Make a date unselectable (repeatable)");
                println!("      --holiday <DATE>  Mark a date as a holiday (repeatable)");
                println!("      --disable-weekends");
                println!("                        Make weekends unselectable, ignoring --disable,");
                println!("                        --min, and --max");
                println!("      --weekend-holidays");
                println!("                        Mark weekends as holidays, ignoring --holiday");
                println!("      --log-file <FILE> Write logs to FILE [env: {LOG_ENV}]");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                println!();
                println!("On exit, the selected date is printed to standard output.");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// The terminal belongs to the calendar, so logs are only written when a log
/// file is given
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "monthgrid=debug".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
