pub mod arguments;

use {
    crate::arguments::Arguments,
    alloy::{primitives::Address, providers::Provider},
    anyhow::{Context, Result, ensure},
    clap::Parser,
    contracts::{ArtifactStore, ContractFactory, Deployment, FactoryError, paths},
    ethrpc::{AlloyProvider, alloy::errors::ContractErrorExt},
    std::path::Path,
};

pub async fn start(args: impl Iterator<Item = String>) {
    let args = Arguments::parse_from(args);
    let obs_config = observe::Config::new(
        args.logging.log_filter.as_str(),
        args.logging.log_stderr_threshold.into_level(),
        args.logging.use_json_logs,
    );
    observe::tracing::initialize(&obs_config);
    tracing::info!("running deploy with validated arguments:\n{}", args);

    if let Err(err) = run(args).await {
        tracing::error!("deployment failed: {err:#}");
        std::process::exit(1);
    }
}

/// Deploys the configured contract, prints where it got deployed to and
/// returns the deployment.
pub async fn run(args: Arguments) -> Result<Deployment> {
    let store = ArtifactStore::new(&args.artifacts);
    let factory = store
        .factory(&args.contract)
        .with_context(|| format!("failed to get contract factory for {}", args.contract))?;

    let (provider, deployer) = match &args.private_key {
        Some(signer) => {
            let deployer = signer.address();
            let provider =
                ethrpc::alloy::provider_with_signer(&args.node_url, Box::new(signer.clone()));
            (provider, Some(deployer))
        }
        None => (ethrpc::alloy::provider(&args.node_url), None),
    };

    run_with(&args, &factory, &provider, deployer).await
}

/// Deploys `factory` through `provider`. Without a `deployer` the first
/// account unlocked on the node sends the transaction.
pub async fn run_with(
    args: &Arguments,
    factory: &ContractFactory,
    provider: &AlloyProvider,
    deployer: Option<Address>,
) -> Result<Deployment> {
    let deployer = match deployer {
        Some(deployer) => deployer,
        None => {
            let accounts = provider
                .get_accounts()
                .await
                .context("failed to fetch accounts from node")?;
            *accounts
                .first()
                .context("node has no unlocked accounts, set a private key instead")?
        }
    };

    let chain_id = provider
        .get_chain_id()
        .await
        .context("failed to fetch chain id")?;
    if let Some(expected) = args.chain_id {
        ensure!(
            chain_id == expected,
            "node is on chain {chain_id} but chain {expected} was expected"
        );
    }
    tracing::info!(chain_id, ?deployer, contract = factory.name(), "deploying");

    let deployment = factory
        .deploy(provider, &args.constructor_args, Some(deployer))
        .await
        .map_err(|err| {
            let context = deploy_failure(&err);
            anyhow::Error::new(err).context(context)
        })?;
    publish(&deployment, &args.contract, args.address_dir.as_deref())?;

    Ok(deployment)
}

/// Prints the report line and, given an address directory, writes the
/// deployed address to `<dir>/<contract>.addr`.
pub fn publish(deployment: &Deployment, contract: &str, address_dir: Option<&Path>) -> Result<()> {
    println!("{}", report(deployment));

    if let Some(dir) = address_dir {
        let path = paths::contract_address_file(dir, contract);
        paths::write_address(&path, deployment.address)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote address file");
    }
    Ok(())
}

/// The line reporting a successful deployment.
pub fn report(deployment: &Deployment) -> String {
    format!(
        "RT Contract is deployed to: {}",
        deployment.address.to_checksum(None)
    )
}

fn deploy_failure(err: &FactoryError) -> &'static str {
    match err {
        FactoryError::Deploy { source, .. } if source.is_node_error() => {
            "the node rejected the deployment"
        }
        FactoryError::Deploy { .. } | FactoryError::Reverted(..) => {
            "the contract rejected the deployment"
        }
        _ => "invalid deployment",
    }
}
