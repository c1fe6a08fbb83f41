//! `chain init`: prepare a local validator home and its gentx.
use crate::account::AccountRegistry;
use crate::chain::ChainDaemon;
use crate::context::Context;
use crate::error::Result;
use crate::id::parse_id;
use crate::network::{InitialGenesis, Network};
use crate::prompt::Prompter;
use crate::validator::{collect_validator, ValidatorOptions};
use crate::workspace::{default_home, read_genesis, HomeState, Workspace};
use std::path::PathBuf;

/// Collaborators used by [`run_chain_init`].
pub struct ChainInitServices<'a> {
    pub accounts: &'a dyn AccountRegistry,
    pub network: &'a dyn Network,
    pub prompter: &'a dyn Prompter,
    pub chain: &'a dyn ChainDaemon,
}

#[derive(Debug, Clone)]
pub struct ChainInitOptions {
    pub launch_id: String,
    pub validator: ValidatorOptions,
    /// Explicit home; defaults to `<networks_root>/<launch-id>`.
    pub home: Option<PathBuf>,
    pub networks_root: PathBuf,
    /// Overwrite an existing home without asking.
    pub yes: bool,
}

/// How a chain init run ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainInitOutcome {
    GentxGenerated { home: PathBuf, gentx_path: PathBuf },
    /// The overwrite prompt was declined; nothing was touched.
    Declined { home: PathBuf },
}

pub fn run_chain_init(
    ctx: &Context,
    services: &ChainInitServices<'_>,
    options: &ChainInitOptions,
) -> Result<ChainInitOutcome> {
    let launch_id = parse_id(&options.launch_id)?;
    tracing::debug!(launch_id, "identifier parsed");

    let account = services.accounts.get_by_name(&options.validator.account)?;
    tracing::debug!(account = %account.name, address = %account.address, "account verified");

    let home = options
        .home
        .clone()
        .unwrap_or_else(|| default_home(&options.networks_root, launch_id));
    let workspace = Workspace::new(launch_id, home.clone());
    let state = workspace.check()?;
    tracing::debug!(home = %home.display(), ?state, "home checked");

    let resumed = match state {
        HomeState::Absent => None,
        HomeState::Resumable(marker) => Some(marker),
        HomeState::Existing => {
            let label = format!("Home {} already exists. Overwrite it?", home.display());
            if !confirm_overwrite(services, options, &label)? {
                tracing::info!(home = %home.display(), "overwrite declined");
                return Ok(ChainInitOutcome::Declined { home });
            }
            None
        }
    };

    ctx.ensure_active()?;
    let launch = services.network.fetch_chain_launch(ctx, launch_id)?;
    tracing::debug!(
        launch_id,
        genesis_chain_id = %launch.genesis_chain_id,
        "launch fetched"
    );

    let mut resume = resumed.is_some();
    if resumed.is_some_and(|marker| marker.is_stale_for(&launch)) {
        tracing::warn!(home = %home.display(), "published genesis changed since initialization");
        let label = format!(
            "Launch {launch_id} published a new genesis since {} was initialized. Reinitialize it?",
            home.display()
        );
        if !confirm_overwrite(services, options, &label)? {
            tracing::info!(home = %home.display(), "reinitialization declined");
            return Ok(ChainInitOutcome::Declined { home });
        }
        resume = false;
    }

    let genesis = if resume {
        tracing::debug!(home = %home.display(), "resuming initialized home");
        read_genesis(&workspace.genesis_path())?
    } else {
        let published = match &launch.initial_genesis {
            InitialGenesis::Url { url, .. } => {
                ctx.ensure_active()?;
                Some(services.network.fetch_genesis(ctx, url)?)
            }
            InitialGenesis::Default => None,
        };
        ctx.ensure_active()?;
        let moniker = options
            .validator
            .moniker
            .as_deref()
            .unwrap_or(&options.validator.account);
        workspace.initialize(services.chain, &launch, published.as_deref(), moniker)?;
        tracing::debug!(home = %home.display(), "chain initialized");
        read_genesis(&workspace.genesis_path())?
    };
    tracing::debug!(stake_denom = %genesis.stake_denom, "genesis parsed");

    let profile = collect_validator(services.prompter, &options.validator, &genesis.stake_denom)?;
    tracing::debug!(account = %profile.account, "validator collected");

    let gentx_path =
        workspace.generate_gentx(services.chain, &launch, &profile, &account.address)?;
    tracing::debug!(gentx = %gentx_path.display(), "gentx generated");

    Ok(ChainInitOutcome::GentxGenerated { home, gentx_path })
}

fn confirm_overwrite(
    services: &ChainInitServices<'_>,
    options: &ChainInitOptions,
    label: &str,
) -> Result<bool> {
    if options.yes {
        return Ok(true);
    }
    services.prompter.confirm(label)
}
