//! mintctl: deploys an NFT collection and drives its mint lifecycle.
//!
//! Every command is a short sequential procedure against a JSON-RPC node.
//! Failures are written to `error.log` (or `error-<category>.log`) in the
//! state directory and the process exits with a non-zero status.

#![allow(missing_docs, rustdoc::missing_crate_level_docs)]

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, Subcommand, ValueEnum};
use eyre::WrapErr;
use mintctl_allowlist::AllowList;
use mintctl_contract::{AlloyBackend, CollectionContract, ContractArtifact};
use mintctl_primitives::{Network, SalePhase};
use mintctl_runner::{
    attach_existing, ensure_network, initialize, resolve_contract, set_phase, with_error_log,
    AllowListName, CollectionConfig, RunnerError, StateStore, TeamMint,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "mintctl", version, about = "NFT collection deployment and mint lifecycle")]
struct Cli {
    /// JSON-RPC endpoint of the target chain
    #[arg(long, env = "MINTCTL_RPC_URL", default_value = "http://127.0.0.1:8545", global = true)]
    rpc_url: Url,

    /// Network the RPC endpoint must serve
    #[arg(long, env = "MINTCTL_NETWORK", value_enum, default_value_t = Network::Hardhat, global = true)]
    network: Network,

    /// Collection configuration file
    #[arg(long, env = "MINTCTL_CONFIG", default_value = "collection.toml", global = true)]
    config: PathBuf,

    /// Directory holding progress, contract and error log files
    #[arg(long, env = "MINTCTL_STATE_DIR", default_value = ".", global = true)]
    state_dir: PathBuf,

    /// Deployer (contract owner) private key
    #[arg(long, env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true, global = true)]
    deployer_key: Option<String>,

    /// Team wallet private key
    #[arg(long, env = "TEAM_PRIVATE_KEY", hide_env_values = true, global = true)]
    team_key: Option<String>,

    /// Revealed metadata base URI, set once after deployment
    #[arg(long, env = "BASE_URI", global = true)]
    base_uri: Option<String>,

    /// Address of an already deployed collection
    #[arg(long, env = "MINTCTL_CONTRACT", global = true)]
    contract: Option<Address>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Deploy the collection, or attach to the recorded one
    Deploy,
    /// Open a sale phase
    Open {
        #[arg(value_enum)]
        phase: SalePhase,
    },
    /// Close a sale phase
    Close {
        #[arg(value_enum)]
        phase: SalePhase,
    },
    /// Mint the team's reserved share of every category, resuming if interrupted
    MintTeam,
    /// Print the Merkle root of a configured allow-list
    Allowlist {
        #[arg(value_enum)]
        list: ListArg,

        /// Also print the proof for this address
        #[arg(long)]
        address: Option<Address>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListArg {
    Reserve,
    FreeMint,
    Guaranteed,
}

impl From<ListArg> for AllowListName {
    fn from(list: ListArg) -> Self {
        match list {
            ListArg::Reserve => Self::Reserve,
            ListArg::FreeMint => Self::FreeMint,
            ListArg::Guaranteed => Self::Guaranteed,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn parse_key(raw: Option<&str>, name: &str) -> eyre::Result<Option<PrivateKeySigner>> {
    raw.filter(|key| !key.trim().is_empty())
        .map(|key| key.trim().parse::<PrivateKeySigner>().wrap_err_with(|| format!("invalid {name}")))
        .transpose()
}

fn connect(cli: &Cli, config: &CollectionConfig) -> eyre::Result<AlloyBackend> {
    let owner = parse_key(cli.deployer_key.as_deref(), "DEPLOYER_PRIVATE_KEY")?
        .ok_or_else(|| eyre::eyre!("DEPLOYER_PRIVATE_KEY is not set"))?;
    let team = parse_key(cli.team_key.as_deref(), "TEAM_PRIVATE_KEY")?;

    let mut backend = AlloyBackend::connect(&cli.rpc_url, owner, team);
    if let Some(path) = &config.collection.artifact {
        backend = backend.with_artifact(ContractArtifact::load(path)?);
    }
    Ok(backend)
}

fn print_address(network: Network, label: &str, address: Address) {
    println!("{label}: {address}");
    if let Some(url) = network.address_url(address) {
        println!("  {}: {url}", network.explorer_name());
    }
}

fn log_failure(store: &StateStore, err: &eyre::Report) {
    if let Err(log_err) = store.write_error_log(None, &format!("{err:#}")) {
        warn!(%log_err, "failed to write error log");
    }
}

async fn run(cli: Cli) -> eyre::Result<bool> {
    let store = StateStore::new(&cli.state_dir);
    let config = with_error_log(&store, async {
        Ok::<_, RunnerError>(CollectionConfig::load(&cli.config)?)
    })
    .await?;

    if let Command::Allowlist { list, address } = &cli.command {
        let name = AllowListName::from(*list);
        let allow_list = AllowList::new(config.allowlists.get(name).iter().copied())
            .wrap_err_with(|| format!("allow-list {name}"))?;
        println!("{name} root: {} ({} members)", allow_list.root(), allow_list.len());
        if let Some(address) = address {
            for node in allow_list.proof(*address)? {
                println!("{node}");
            }
        }
        return Ok(true);
    }

    let backend = connect(&cli, &config).inspect_err(|err| log_failure(&store, err))?;
    with_error_log(&store, ensure_network(&backend, cli.network)).await?;
    let configured = cli.contract.or(config.contract_address);

    let (phase, open) = match &cli.command {
        Command::Deploy => {
            let resolved = with_error_log(&store, async {
                let _lock = store.lock()?;
                let resolved =
                    resolve_contract(&backend, &store, configured, &config.constructor_args())
                        .await?;
                initialize(&resolved, cli.base_uri.as_deref()).await?;
                Ok::<_, RunnerError>(resolved)
            })
            .await?;
            let verb = if resolved.freshly_deployed { "deployed" } else { "attached" };
            print_address(cli.network, &format!("Collection {verb}"), resolved.contract.address());
            return Ok(true);
        }
        Command::MintTeam => {
            let report = with_error_log(
                &store,
                TeamMint::new(&backend, &store, &config)
                    .with_base_uri(cli.base_uri.clone())
                    .with_contract_address(configured)
                    .run(),
            )
            .await?;

            print_address(cli.network, "Collection", report.contract);
            for (category, minted) in &report.minted {
                println!("{category}: minted {minted}");
            }
            for (category, log) in &report.failures {
                println!("{category}: failed, see {}", log.display());
            }
            return Ok(report.is_success());
        }
        Command::Open { phase } => (*phase, true),
        Command::Close { phase } => (*phase, false),
        Command::Allowlist { .. } => return Ok(true),
    };

    let change = with_error_log(&store, async {
        let contract = attach_existing(&backend, &store, configured).await?;
        info!(address = %contract.address(), "attached");
        set_phase(&contract, phase, open, &config).await
    })
    .await?;
    println!(
        "{} sale {} (supply {})",
        change.phase,
        if change.open { "open" } else { "closed" },
        change.supply
    );
    if let Some(url) = change.tx_hash.and_then(|tx_hash| cli.network.tx_url(tx_hash)) {
        println!("  {}: {url}", cli.network.explorer_name());
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env file is fine
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
