use {
    crate::artifacts::Artifact,
    alloy::{
        contract::{Error as ContractError, RawCallBuilder},
        dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
        json_abi::{JsonAbi, Param},
        primitives::{Address, Bytes, TxHash},
        rpc::types::TransactionReceipt,
    },
    ethrpc::AlloyProvider,
};

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("contract {contract} has unlinked libraries: {}", .libraries.join(", "))]
    UnlinkedLibraries {
        contract: String,
        libraries: Vec<String>,
    },
    #[error("contract {0} has no bytecode, it is probably abstract or an interface")]
    NotDeployable(String),
    #[error("invalid bytecode for contract {0}")]
    InvalidBytecode(String),
    #[error("constructor of {contract} expects {expected} arguments but got {got}")]
    ArgumentCount {
        contract: String,
        expected: usize,
        got: usize,
    },
    #[error("invalid value {value:?} for constructor argument {name:?} of type {ty}")]
    InvalidArgument {
        name: String,
        ty: String,
        value: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },
    #[error("failed to encode constructor arguments")]
    Encoding(#[source] alloy::dyn_abi::Error),
    #[error("deploying {contract} failed")]
    Deploy {
        contract: String,
        #[source]
        source: ContractError,
    },
    #[error("deployment transaction {0} of {1} reverted")]
    Reverted(TxHash, String),
}

/// Deploys instances of one compiled contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    name: String,
    abi: JsonAbi,
    bytecode: Bytes,
}

/// Handle to a freshly deployed contract instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub deployer: Address,
}

impl ContractFactory {
    pub fn from_artifact(artifact: Artifact) -> Result<Self, FactoryError> {
        let Artifact {
            contract_name,
            abi,
            bytecode,
            link_references,
            ..
        } = artifact;

        if !link_references.is_empty() || bytecode.contains("__") {
            let libraries = link_references
                .iter()
                .flat_map(|(source, libraries)| {
                    libraries.keys().map(move |library| format!("{source}:{library}"))
                })
                .collect();
            return Err(FactoryError::UnlinkedLibraries {
                contract: contract_name,
                libraries,
            });
        }

        let bytecode: Bytes = bytecode
            .parse()
            .map_err(|_| FactoryError::InvalidBytecode(contract_name.clone()))?;
        if bytecode.is_empty() {
            return Err(FactoryError::NotDeployable(contract_name));
        }

        Ok(Self {
            name: contract_name,
            abi,
            bytecode,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    /// ABI encodes the constructor arguments. Each argument is parsed
    /// according to the Solidity type of the matching constructor input.
    pub fn encode_args(&self, args: &[String]) -> Result<Vec<u8>, FactoryError> {
        let inputs = self.constructor_inputs();
        if inputs.len() != args.len() {
            return Err(FactoryError::ArgumentCount {
                contract: self.name.clone(),
                expected: inputs.len(),
                got: args.len(),
            });
        }
        let Some(constructor) = &self.abi.constructor else {
            return Ok(Vec::new());
        };

        let values = inputs
            .iter()
            .zip(args)
            .map(|(param, value)| coerce(param, value))
            .collect::<Result<Vec<DynSolValue>, _>>()?;
        constructor
            .abi_encode_input(&values)
            .map_err(FactoryError::Encoding)
    }

    /// Init code followed by the encoded constructor arguments, i.e. the
    /// input of the deployment transaction.
    pub fn deploy_data(&self, args: &[String]) -> Result<Bytes, FactoryError> {
        let encoded = self.encode_args(args)?;
        let mut data = Vec::with_capacity(self.bytecode.len() + encoded.len());
        data.extend_from_slice(&self.bytecode);
        data.extend_from_slice(&encoded);
        Ok(data.into())
    }

    /// Sends the deployment transaction and waits for its receipt. Without
    /// `from` the provider picks the sender: its local signer if it has one,
    /// otherwise the node decides.
    pub async fn deploy(
        &self,
        provider: &AlloyProvider,
        args: &[String],
        from: Option<Address>,
    ) -> Result<Deployment, FactoryError> {
        let input = self.deploy_data(args)?;
        let deploy_error = |source: ContractError| FactoryError::Deploy {
            contract: self.name.clone(),
            source,
        };

        let mut call = RawCallBuilder::new_raw_deploy(provider.clone(), input);
        if let Some(from) = from {
            call = call.from(from);
        }

        let pending = call.send().await.map_err(deploy_error)?;
        let transaction_hash = *pending.tx_hash();
        tracing::info!(contract = %self.name, ?transaction_hash, "sent deployment");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|err| deploy_error(err.into()))?;
        self.deployment_from_receipt(transaction_hash, &receipt)
    }

    /// Turns the receipt of a mined deployment transaction into the
    /// deployment it created.
    pub fn deployment_from_receipt(
        &self,
        transaction_hash: TxHash,
        receipt: &TransactionReceipt,
    ) -> Result<Deployment, FactoryError> {
        if !receipt.status() {
            return Err(FactoryError::Reverted(transaction_hash, self.name.clone()));
        }
        let address = receipt
            .contract_address
            .ok_or_else(|| FactoryError::Deploy {
                contract: self.name.clone(),
                source: ContractError::ContractNotDeployed,
            })?;

        tracing::debug!(
            contract = %self.name,
            ?address,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "deployment mined"
        );
        Ok(Deployment {
            contract: self.name.clone(),
            address,
            transaction_hash,
            deployer: receipt.from,
        })
    }
}

fn coerce(param: &Param, value: &str) -> Result<DynSolValue, FactoryError> {
    let invalid = |source| FactoryError::InvalidArgument {
        name: param.name.clone(),
        ty: param.ty.clone(),
        value: value.to_string(),
        source,
    };
    param.resolve().map_err(invalid)?.coerce_str(value).map_err(invalid)
}
