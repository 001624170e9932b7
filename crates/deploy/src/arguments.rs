use {
    alloy::signers::local::PrivateKeySigner,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,deploy=debug,contracts=debug,ethrpc=info")]
    pub log_filter: String,

    /// Log events at or above this level go to stderr, the rest to stdout.
    /// Defaults to everything so stdout only carries the deployed address.
    #[clap(long, env, default_value = "trace")]
    pub log_stderr_threshold: LevelFilter,

    /// Output log events as JSON.
    #[clap(long, env, default_value = "false")]
    pub use_json_logs: bool,
}

#[derive(clap::Parser)]
#[clap(about = "Deploys a compiled contract and prints its address")]
pub struct Arguments {
    #[clap(flatten)]
    pub logging: LoggingArguments,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Directory containing the compiled Hardhat artifacts.
    #[clap(long, env, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Name of the contract to deploy. Use the fully qualified name
    /// `<source>:<contract>` if the name is not unique.
    #[clap(long, env, default_value = "RT_ERC721")]
    pub contract: String,

    /// Constructor arguments, parsed according to the constructor's
    /// parameter types. Values are split on commas, so a single argument
    /// can't contain one. The flag can be repeated.
    #[clap(
        long,
        env,
        default_value = "RT721",
        num_args = 0..,
        use_value_delimiter = true
    )]
    pub constructor_args: Vec<String>,

    /// Private key of the deployer. If not set the first account unlocked on
    /// the node sends the deployment.
    #[clap(long, env)]
    pub private_key: Option<PrivateKeySigner>,

    /// The chain ID the node is expected to be on. Deploying is aborted if
    /// the node reports a different one.
    #[clap(long, env)]
    pub chain_id: Option<u64>,

    /// Directory to write a `<contract>.addr` file with the deployed address
    /// to.
    #[clap(long, env)]
    pub address_dir: Option<PathBuf>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            logging,
            node_url,
            artifacts,
            contract,
            constructor_args,
            private_key,
            chain_id,
            address_dir,
        } = self;

        writeln!(f, "log_filter: {}", logging.log_filter)?;
        writeln!(f, "log_stderr_threshold: {}", logging.log_stderr_threshold)?;
        writeln!(f, "use_json_logs: {}", logging.use_json_logs)?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "artifacts: {}", artifacts.display())?;
        writeln!(f, "contract: {contract}")?;
        writeln!(f, "constructor_args: {constructor_args:?}")?;
        match private_key {
            Some(signer) => writeln!(f, "private_key: SECRET ({})", signer.address())?,
            None => writeln!(f, "private_key: None")?,
        }
        writeln!(f, "chain_id: {chain_id:?}")?;
        writeln!(
            f,
            "address_dir: {:?}",
            address_dir.as_ref().map(|dir| dir.display())
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    // Well known development key, first account of the default anvil mnemonic.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn defaults_deploy_rt_erc721() {
        let args = Arguments::try_parse_from(["deploy"]).unwrap();

        assert_eq!(args.contract, "RT_ERC721");
        assert_eq!(args.constructor_args, vec!["RT721"]);
        assert_eq!(args.node_url.as_str(), "http://localhost:8545/");
        assert_eq!(args.artifacts, PathBuf::from("artifacts"));
        assert!(args.private_key.is_none());
        assert!(args.chain_id.is_none());
        assert!(args.address_dir.is_none());
    }

    #[test]
    fn constructor_args_are_comma_delimited() {
        let args = Arguments::try_parse_from([
            "deploy",
            "--contract",
            "Token",
            "--constructor-args",
            "Token,TKN,1000",
        ])
        .unwrap();

        assert_eq!(args.constructor_args, vec!["Token", "TKN", "1000"]);
    }

    #[test]
    fn constructor_args_can_be_repeated() {
        let args = Arguments::try_parse_from([
            "deploy",
            "--constructor-args",
            "Token",
            "--constructor-args",
            "TKN,1000",
        ])
        .unwrap();

        assert_eq!(args.constructor_args, vec!["Token", "TKN", "1000"]);
    }

    #[test]
    fn logs_go_to_stderr_by_default() {
        let args = Arguments::try_parse_from(["deploy"]).unwrap();
        assert_eq!(args.logging.log_stderr_threshold, LevelFilter::TRACE);
        assert!(!args.logging.use_json_logs);
    }

    #[test]
    fn constructor_args_can_be_empty() {
        let args = Arguments::try_parse_from(["deploy", "--constructor-args"]).unwrap();
        assert!(args.constructor_args.is_empty());
    }

    #[test]
    fn display_hides_private_key() {
        let args = Arguments::try_parse_from(["deploy", "--private-key", DEV_KEY]).unwrap();
        let display = args.to_string();

        assert!(!display.contains(&DEV_KEY[2..]));
        assert!(
            display.contains("private_key: SECRET (0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266)")
        );
    }

    #[test]
    fn rejects_malformed_private_key() {
        assert!(Arguments::try_parse_from(["deploy", "--private-key", "0x1234"]).is_err());
    }
}
