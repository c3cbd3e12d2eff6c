use anyhow::{anyhow, Context, Result};
use superuser::cli::{self, Action, OptionParser};
use superuser::config::{self, Config};
use superuser::{
    ElevationResult, ExitCoordinator, LaunchOptions, LaunchReport, LaunchRequest, Outcome,
};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("superuser: {:#}", e);
            superuser::ErrorKind::Unsupported.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let line = cli::raw_command_line();
    let parsed = OptionParser::parse(line.text());

    // Logging depends on the configuration, so its warning is deferred
    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config, parsed.options.verbose)?;
    if let Some(e) = config_error {
        warn!("Ignoring configuration, using defaults: {}", e);
    }

    let outcome = match parsed.action {
        Ok(Action::Help) => {
            cli::print_help();
            Outcome::Help
        }
        Ok(Action::Run { command }) => {
            let request = match command {
                Some(command) => line.request_for(&command),
                None => LaunchRequest::new(config.launch.default_command.clone()),
            };
            match launch(config, &parsed.options, &request) {
                Ok(report) => Outcome::Launched(report),
                Err(e) => {
                    error!("{}", e);
                    Outcome::Failed(e.kind())
                }
            }
        }
        Err(e) => {
            error!("{}", e);
            Outcome::Failed(e.kind())
        }
    };

    Ok(ExitCoordinator::new(parsed.options.return_code).exit_code(&outcome))
}

fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level \"{}\"", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!(e))
        .context("failed to install the log subscriber")
}

#[cfg(windows)]
fn launch(
    config: Config,
    options: &LaunchOptions,
    request: &LaunchRequest,
) -> ElevationResult<LaunchReport> {
    use superuser::windows::WindowsPlatform;
    use superuser::ElevatedProcessLauncher;

    ElevatedProcessLauncher::new(WindowsPlatform::new(config)).run(options, request)
}

#[cfg(not(windows))]
fn launch(
    _config: Config,
    _options: &LaunchOptions,
    _request: &LaunchRequest,
) -> ElevationResult<LaunchReport> {
    Err(superuser::ElevationError::Unsupported(format!(
        "elevated launch requires Windows, this is {}",
        std::env::consts::OS
    )))
}
