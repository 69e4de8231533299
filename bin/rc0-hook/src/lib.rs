use clap::error::ErrorKind;
use clap::Parser;
use lib_rc0::hook::config::{
    resolve_config_path, CredentialMap, HookSettings, DEFAULT_API_URL, DEFAULT_PROPAGATION_WAIT,
    DEFAULT_TTL,
};
use lib_rc0::hook::errors::HookErrors;
use lib_rc0::hook::hook_manager::HookManager;
use lib_rc0::hook::types::Invocation;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

/// DNS-01 hook for RcodeZero, called as
/// `rc0-hook <hook_type> <domain> <token> <challenge>`.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliInput {
    /// Hook event, only deploy_challenge and clean_challenge do anything
    pub hook_type: Option<String>,
    pub domain: Option<String>,
    /// Token file name, TXT value and whatever else the client appends
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
    #[arg(short = 'c', long, env = "RCODE0_CONFIG_FILE")]
    pub config: Option<PathBuf>,
    #[arg(long, env = "RCODE0_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,
    #[arg(long, env = "RCODE0_TTL", default_value_t = DEFAULT_TTL)]
    pub ttl: u32,
    /// Seconds to wait after a successful deploy
    #[arg(
        long,
        env = "RCODE0_PROPAGATION_WAIT",
        default_value_t = DEFAULT_PROPAGATION_WAIT.as_secs()
    )]
    pub propagation_wait: u64,
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliInput {
    pub fn invocation(&self) -> Result<Invocation, HookErrors> {
        Invocation::parse(
            self.hook_type.as_deref(),
            self.domain.as_deref(),
            &self.extra,
        )
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status for a command line clap refused: 0 when it only asked for
/// help or version, 1 for anything else.
pub fn cli_error_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Executes the hook described by `args`. Ignored hook types return before
/// the config file is even looked up.
pub async fn run(args: CliInput) -> Result<(), HookErrors> {
    let invocation = args.invocation()?;
    if let Invocation::Ignored(hook_type) = &invocation {
        tracing::debug!("Nothing to do for hook {:?}", hook_type);
        return Ok(());
    }
    tracing::debug!("Script called with {:?}", invocation);

    let config_path = resolve_config_path(args.config);
    let credentials = CredentialMap::from_path(&config_path)?;
    let settings = HookSettings::new(
        args.api_url,
        args.ttl,
        Duration::from_secs(args.propagation_wait),
        credentials,
    )?;
    HookManager::new(&settings).run(&invocation).await
}
