//! Compiled contract artifacts and the factories that deploy them.
pub mod artifacts;
pub mod factory;
pub mod paths;

pub use {
    artifacts::{Artifact, ArtifactError, ArtifactStore},
    factory::{ContractFactory, Deployment, FactoryError},
};
