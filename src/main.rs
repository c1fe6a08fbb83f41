use anyhow::{Context as _, Result};
use clap::Parser;
use netlaunch::account::KeyringRegistry;
use netlaunch::chain::DaemonChain;
use netlaunch::cli::{
    CampaignCommand, CampaignUpdateArgs, ChainCommand, ChainInitArgs, Command, RootArgs,
};
use netlaunch::config::{apply_env, apply_overrides, load_config, validate_config, Config};
use netlaunch::daemon::Daemon;
use netlaunch::network::{SpnNetwork, TxSigner};
use netlaunch::output::{gentx_line, render_campaign};
use netlaunch::prompt::TerminalPrompter;
use netlaunch::workflow::{
    run_campaign_update, run_chain_init, ChainInitOptions, ChainInitOutcome, ChainInitServices,
};
use netlaunch::{logging, Context};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    logging::init(args.global.verbose);

    let mut config = load_config(args.global.config.as_deref())?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    apply_overrides(&mut config, args.global.overrides());
    validate_config(&config)?;
    tracing::debug!(api = %config.api_address, from = %config.from, "configuration resolved");

    let ctx = Context::background();
    match &args.command {
        Command::Chain(ChainCommand::Init(init)) => cmd_chain_init(&ctx, &config, init),
        Command::Campaign(CampaignCommand::Update(update)) => {
            cmd_campaign_update(&ctx, &config, update)
        }
    }
}

fn spn_network(config: &Config) -> Result<(Daemon, SpnNetwork)> {
    let daemon = Daemon::from_command(&config.spn_binary)
        .with_context(|| format!("resolve {}", config.spn_binary))?;
    let signer = TxSigner::new(
        daemon.clone(),
        config.from.clone(),
        config.spn_chain_id.clone(),
        config.rpc_address.clone(),
        config.keyring(),
    );
    let network = SpnNetwork::new(&config.api_address, config.timeout(), signer);
    Ok((daemon, network))
}

fn cmd_chain_init(ctx: &Context, config: &Config, args: &ChainInitArgs) -> Result<()> {
    let (daemon, network) = spn_network(config)?;
    let accounts = KeyringRegistry::new(daemon, config.keyring());
    let chain = DaemonChain::new(args.chain_binary.clone(), config.keyring());
    let prompter = TerminalPrompter;
    let services = ChainInitServices {
        accounts: &accounts,
        network: &network,
        prompter: &prompter,
        chain: &chain,
    };
    let options = ChainInitOptions {
        launch_id: args.launch_id.clone(),
        validator: args.validator_options(),
        home: args.home.clone(),
        networks_root: config.networks_root()?,
        yes: args.yes,
    };

    match run_chain_init(ctx, &services, &options)? {
        ChainInitOutcome::GentxGenerated { gentx_path, .. } => {
            println!("{}", gentx_line(&gentx_path));
        }
        ChainInitOutcome::Declined { .. } => {
            println!("said no, home left untouched");
        }
    }
    Ok(())
}

fn cmd_campaign_update(ctx: &Context, config: &Config, args: &CampaignUpdateArgs) -> Result<()> {
    let (_, network) = spn_network(config)?;
    let campaign = run_campaign_update(ctx, &network, &args.options())?;
    print!("{}", render_campaign(&campaign, args.output)?);
    Ok(())
}
