//! Deploys against a development node listening on `http://localhost:8545`
//! with unlocked accounts, e.g. `anvil`.

use {
    alloy::providers::Provider,
    clap::Parser,
    deploy::arguments::Arguments,
    serde_json::json,
    std::fs,
};

// Init code that deploys a single `STOP` instruction, ignoring the
// constructor arguments appended to it.
const INIT_CODE: &str = "0x6001600c60003960016000f300";

fn write_artifact(root: &std::path::Path) {
    let dir = root.join("contracts/RT_ERC721.sol");
    fs::create_dir_all(&dir).unwrap();
    let artifact = json!({
        "_format": "hh-sol-artifact-1",
        "contractName": "RT_ERC721",
        "sourceName": "contracts/RT_ERC721.sol",
        "abi": [{
            "inputs": [{ "internalType": "string", "name": "name_", "type": "string" }],
            "stateMutability": "nonpayable",
            "type": "constructor"
        }],
        "bytecode": INIT_CODE,
        "deployedBytecode": "0x00",
        "linkReferences": {},
        "deployedLinkReferences": {}
    });
    fs::write(dir.join("RT_ERC721.json"), artifact.to_string()).unwrap();
}

#[tokio::test]
#[ignore]
async fn local_node_deploy_rt_erc721() {
    observe::tracing::initialize_reentrant("warn,deploy=debug,contracts=debug");
    let artifacts = tempfile::TempDir::new().unwrap();
    write_artifact(artifacts.path());
    let address_dir = artifacts.path().join("deploy");

    let args = Arguments::try_parse_from([
        "deploy",
        "--artifacts",
        artifacts.path().to_str().unwrap(),
        "--address-dir",
        address_dir.to_str().unwrap(),
    ])
    .unwrap();
    let node_url = args.node_url.clone();

    let deployment = deploy::run(args).await.unwrap();

    let report = deploy::report(&deployment);
    let address = report
        .strip_prefix("RT Contract is deployed to: ")
        .unwrap();
    assert_eq!(address.parse::<alloy::primitives::Address>().unwrap(), deployment.address);

    let provider = ethrpc::alloy::provider(&node_url);
    let code = provider.get_code_at(deployment.address).await.unwrap();
    assert_eq!(code.to_vec(), vec![0x00]);

    assert_eq!(
        fs::read_to_string(address_dir.join("RT_ERC721.addr")).unwrap(),
        format!("{}\n", deployment.address.to_checksum(None))
    );
}

#[tokio::test]
#[ignore]
async fn local_node_rejects_wrong_chain_id() {
    observe::tracing::initialize_reentrant("warn,deploy=debug,contracts=debug");
    let artifacts = tempfile::TempDir::new().unwrap();
    write_artifact(artifacts.path());

    let args = Arguments::try_parse_from([
        "deploy",
        "--artifacts",
        artifacts.path().to_str().unwrap(),
        "--chain-id",
        "1",
    ])
    .unwrap();

    let err = deploy::run(args).await.unwrap_err();
    assert!(err.to_string().contains("but chain 1 was expected"));
}
