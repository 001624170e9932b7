//! Lookup of Hardhat contract artifacts by contract name.
//!
//! Hardhat writes one JSON file per compiled contract to
//! `artifacts/<source path>/<ContractName>.json`, next to a
//! `<ContractName>.dbg.json` file and a shared `build-info/` directory. A
//! contract can be referred to either by its bare name, which has to be
//! unique across all sources, or by its fully qualified name
//! `<source path>:<ContractName>`.

use {
    crate::factory::{ContractFactory, FactoryError},
    alloy::json_abi::JsonAbi,
    serde::Deserialize,
    std::{
        collections::BTreeMap,
        fs,
        path::{Path, PathBuf},
    },
};

const BUILD_INFO_DIR: &str = "build-info";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact for contract {name:?} not found in {}", .root.display())]
    NotFound { name: String, root: PathBuf },
    #[error(
        "there are multiple artifacts for contract {name:?}, use one of the fully qualified \
         names: {}",
        .candidates.join(", ")
    )]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Factory(#[from] FactoryError),
}

/// The parts of a Hardhat artifact needed to deploy a contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "_format", default)]
    pub format: Option<String>,
    pub contract_name: String,
    #[serde(default)]
    pub source_name: Option<String>,
    pub abi: JsonAbi,
    /// Hex encoded init code. Still contains `__$<hash>$__` placeholders if
    /// the contract uses external libraries.
    pub bytecode: String,
    /// Source name -> library name -> placeholder positions.
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl Artifact {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn fully_qualified_name(&self) -> String {
        match &self.source_name {
            Some(source) => format!("{source}:{}", self.contract_name),
            None => self.contract_name.clone(),
        }
    }
}

/// A directory of compiled artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the path of the artifact for `name`, which is either a bare
    /// contract name or a fully qualified `<source>:<contract>` name.
    pub fn find(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        if let Some((source, contract)) = name.split_once(':') {
            let path = self.root.join(source).join(format!("{contract}.json"));
            if !path.is_file() {
                return Err(self.not_found(name));
            }
            return Ok(path);
        }

        let file_name = format!("{name}.json");
        let mut matches = Vec::new();
        self.collect(&self.root, &file_name, &mut matches)?;
        matches.sort();

        match matches.len() {
            0 => Err(self.not_found(name)),
            1 => Ok(matches.remove(0)),
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                candidates: matches
                    .iter()
                    .map(|path| self.qualified_name(path, name))
                    .collect(),
            }),
        }
    }

    pub fn load(&self, name: &str) -> Result<Artifact, ArtifactError> {
        let path = self.find(name)?;
        tracing::debug!(path = %path.display(), "loading artifact");
        let json = fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        Artifact::from_json(&json).map_err(|source| ArtifactError::Malformed { path, source })
    }

    /// Resolves the contract factory for `name`.
    pub fn factory(&self, name: &str) -> Result<ContractFactory, ArtifactError> {
        let artifact = self.load(name)?;
        Ok(ContractFactory::from_artifact(artifact)?)
    }

    fn collect(
        &self,
        dir: &Path,
        file_name: &str,
        matches: &mut Vec<PathBuf>,
    ) -> Result<(), ArtifactError> {
        let io_error = |source| ArtifactError::Io {
            path: dir.to_path_buf(),
            source,
        };
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let path = entry.path();
            if entry.file_type().map_err(io_error)?.is_dir() {
                if entry.file_name() != BUILD_INFO_DIR {
                    self.collect(&path, file_name, matches)?;
                }
            } else if entry.file_name().to_str() == Some(file_name) {
                matches.push(path);
            }
        }
        Ok(())
    }

    fn qualified_name(&self, path: &Path, name: &str) -> String {
        let source = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(|source| source.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        format!("{source}:{name}")
    }

    fn not_found(&self, name: &str) -> ArtifactError {
        ArtifactError::NotFound {
            name: name.to_string(),
            root: self.root.clone(),
        }
    }
}
