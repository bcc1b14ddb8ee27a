use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use select_plus::app::App;
use select_plus::config::SelectPlusConfig;
use select_plus::markup::Node;
use select_plus::services::log_dirs;
use select_plus::services::terminal_modes::{self, TerminalModes};
use select_plus::services::tracing_setup;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

/// A searchable select control in the terminal
#[derive(Parser, Debug)]
#[command(name = "select-plus")]
#[command(about = "A searchable select control in the terminal", long_about = None)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Add an option, as VALUE=LABEL (repeatable)
    #[arg(long = "option", value_name = "VALUE=LABEL", value_parser = parse_option)]
    options: Vec<(String, String)>,

    /// Initial value
    #[arg(long)]
    value: Option<String>,

    /// Text shown when no value is set
    #[arg(long)]
    placeholder: Option<String>,

    /// Regular expression a typed value must match to be accepted
    #[arg(long, value_name = "REGEX")]
    value_pattern: Option<String>,

    /// Hide the raw value column
    #[arg(long)]
    hide_value: bool,

    /// Path to log file (default: $XDG_STATE_HOME/select-plus/logs/)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Parse a `VALUE=LABEL` pair; a missing `=` uses the value as label
fn parse_option(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((value, label)) => Ok((value.to_string(), label.to_string())),
        None if !s.is_empty() => Ok((s.to_string(), s.to_string())),
        None => Err("option must not be empty".to_string()),
    }
}

/// Merge the config file (if any) with command-line overrides
fn effective_config(args: &Args) -> AnyhowResult<SelectPlusConfig> {
    let mut config = match &args.config {
        Some(path) => SelectPlusConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SelectPlusConfig::default(),
    };

    config
        .children
        .extend(args.options.iter().map(|(value, label)| Node::option(value, label)));
    if let Some(value) = &args.value {
        config.value = value.clone();
    }
    if let Some(placeholder) = &args.placeholder {
        config.placeholder = placeholder.clone();
    }
    if let Some(pattern) = &args.value_pattern {
        config.value_pattern = pattern.clone();
    }
    if args.hide_value {
        config.hide_value = true;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(app: &mut App) -> AnyhowResult<()> {
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    loop {
        app.draw(&mut terminal).context("Failed to draw frame")?;
        if app.should_quit() {
            break;
        }
        // Poll so that child mutations are still flushed without input
        if event::poll(Duration::from_millis(250)).context("Failed to poll events")? {
            let ev = event::read().context("Failed to read event")?;
            app.handle_event(&ev);
        }
    }
    Ok(())
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.dump_config {
        let config = effective_config(&args)?;
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not open log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("select-plus starting");

    let config = effective_config(&args)?;
    let mut app = App::new(&config).context("Failed to create select-plus control")?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut modes = TerminalModes::enable().context("Failed to set up terminal")?;
    let result = run(&mut app);
    app.unmount();
    modes.undo();

    result.context("Event loop returned an error")?;
    tracing::info!("select-plus exiting with value {:?}", app.value());
    println!("{}", app.value());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("1=Apple"),
            Ok(("1".to_string(), "Apple".to_string()))
        );
        assert_eq!(
            parse_option("k=a=b"),
            Ok(("k".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_option("7"), Ok(("7".to_string(), "7".to_string())));
        assert!(parse_option("").is_err());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::parse_from([
            "select-plus",
            "--option",
            "1=Apple",
            "--option",
            "2=Banana",
            "--value",
            "2",
            "--hide-value",
        ]);
        let config = effective_config(&args).unwrap();
        assert_eq!(config.children.len(), 2);
        assert_eq!(config.value, "2");
        assert!(config.hide_value);
        assert_eq!(config.placeholder, "Select...");
    }

    #[test]
    fn test_invalid_pattern_is_rejected_up_front() {
        let args = Args::parse_from(["select-plus", "--value-pattern", "("]);
        assert!(effective_config(&args).is_err());
    }
}
