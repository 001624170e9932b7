pub mod errors;
mod instrumentation;

#[cfg(any(test, feature = "test-util"))]
use alloy::providers::mock;
use {
    crate::AlloyProvider,
    alloy::{
        network::{EthereumWallet, TxSigner},
        primitives::Signature,
        providers::{Provider, ProviderBuilder},
        rpc::client::{ClientBuilder, RpcClient},
    },
    instrumentation::{InstrumentationLayer, LabelingLayer},
    url::Url,
};

/// Creates a provider that sends transactions from accounts unlocked on the
/// node itself (`eth_sendTransaction`).
pub fn provider(url: &Url) -> AlloyProvider {
    ProviderBuilder::new().connect_client(client(url)).erased()
}

/// Creates a provider that signs transactions locally with `signer` and
/// submits them as raw transactions.
pub fn provider_with_signer(
    url: &Url,
    signer: Box<dyn TxSigner<Signature> + Send + Sync + 'static>,
) -> AlloyProvider {
    let wallet = EthereumWallet::new(signer);
    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(client(url))
        .erased()
}

fn client(url: &Url) -> RpcClient {
    ClientBuilder::default()
        .layer(LabelingLayer {
            label: "main".into(),
        })
        .layer(InstrumentationLayer)
        .http(url.clone())
}

#[cfg(any(test, feature = "test-util"))]
pub fn dummy_provider() -> (AlloyProvider, mock::Asserter) {
    let asserter = mock::Asserter::new();
    let provider = ProviderBuilder::new()
        .connect_mocked_client(asserter.clone())
        .erased();
    (provider, asserter)
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::address};

    #[tokio::test]
    async fn dummy_provider_replays_responses() {
        let (provider, asserter) = dummy_provider();
        asserter.push_success(&"0x64");
        asserter.push_success(&vec![address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")]);

        assert_eq!(provider.get_chain_id().await.unwrap(), 100);
        assert_eq!(
            provider.get_accounts().await.unwrap(),
            vec![address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")]
        );
    }
}
