pub mod alloy;

pub use ::alloy::providers::DynProvider as AlloyProvider;
