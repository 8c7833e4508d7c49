//! `attsync` pull/push implementation.

use std::path::PathBuf;

use attsync_config::{CliSettings, Config};
use attsync_confluence::{
    Action, ConfluenceClient, CredentialProvider, ExplicitParams, StaticCredentials, Transfer,
    TransferError, TransferReport, TransferRequest, plan, resolve, timestamp_comment,
};
use clap::{Args, ValueEnum};

use crate::error::CliError;
use crate::output::Output;
use crate::prompt::PromptCredentials;
use crate::scratch::run_in_scratch;

/// Arguments for a pull or push.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Transfer direction.
    #[arg(long, value_enum)]
    action: Option<ActionArg>,

    /// Attachment filename; a `.v<N>` suffix pulls version N.
    #[arg(long)]
    filename: Option<String>,

    /// Confluence page ID.
    #[arg(long = "pageid")]
    page_id: Option<String>,

    /// Server base URL, or a full attachment URL to take action, page ID
    /// and filename from.
    #[arg(long)]
    urlbase: Option<String>,

    /// Basic-auth username (default: from config).
    #[arg(long)]
    username: Option<String>,

    /// Basic-auth password (prompted if omitted).
    #[arg(long, env = "ATTSYNC_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print resolved parameters and the request instead of sending it.
    #[arg(long)]
    debug: bool,

    /// Path to configuration file (default: auto-discover attsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable info-level logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Push,
    Pull,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Push => Self::Push,
            ActionArg::Pull => Self::Pull,
        }
    }
}

impl SyncArgs {
    /// Execute the transfer.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::FatalAuth`] when a pull is rejected for bad
    /// credentials, and another [`CliError`] for every other failure.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            username: self.username.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let params = ExplicitParams {
            action: self.action.map(Action::from),
            filename: self.filename.clone(),
            page_id: self.page_id.clone(),
            url: self.urlbase.clone(),
            username: config.confluence.username.clone(),
        };
        let request = resolve(&params, &config.confluence)?;

        if self.debug {
            print_debug(output, &request);
            return Ok(());
        }

        let provider: Box<dyn CredentialProvider> = match &self.password {
            Some(password) => Box::new(StaticCredentials::new(&request.username, password)),
            None => Box::new(PromptCredentials::new(&request.username)),
        };
        let credentials = provider.credentials()?;

        let client = ConfluenceClient::new(
            &request.base_url,
            credentials,
            config.confluence.timeout(),
        );
        let action = request.action;
        let result = run_in_scratch(move |scratch| Transfer::new(&client, &request).run(scratch))?;

        match result {
            Ok(report) => {
                print_report(output, &report);
                Ok(())
            }
            Err(err @ TransferError::AuthFailed { .. }) if action == Action::Pull => {
                Err(CliError::FatalAuth(err))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn print_debug(output: &Output, request: &TransferRequest) {
    output.highlight("[DEBUG] No request sent.");
    output.info(&format!("Action:          {}", request.action));
    output.info(&format!("Page ID:         {}", request.page_id));
    output.info(&format!("Filename:        {}", request.filename));
    output.info(&format!("Remote filename: {}", request.remote_filename));
    output.info(&format!("Version:         {}", request.version));
    output.info(&format!("Base URL:        {}", request.base_url));
    output.info(&format!("Username:        {}", request.username));

    let plan = plan(request, &timestamp_comment());
    if let Some(lookup) = &plan.lookup_url {
        output.info(&format!("\nLookup:\nGET {lookup}"));
    }
    for planned in &plan.requests {
        output.info(&format!("\nRequest ({}):", planned.label));
        output.info(&planned.endpoint.describe());
    }
}

fn print_report(output: &Output, report: &TransferReport) {
    let msg = match report.action {
        Action::Pull => format!(
            "Pulled {} from {}",
            report.local_path.display(),
            report.url
        ),
        Action::Push => format!("Pushed {} to {}", report.local_path.display(), report.url),
    };
    output.success(&msg);
}
