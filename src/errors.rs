use thiserror::Error;

use crate::address::Address;
use crate::tree::NodeId;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("address not found: {0}")]
    AddressNotFound(Address),

    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node is not part of this tree: {0}")]
    UnknownNode(NodeId),

    #[error("nodes belong to different trees: {a} and {b}")]
    CrossTree { a: NodeId, b: NodeId },

    #[error("cannot move a node below itself or one of its descendants")]
    Cycle,

    #[error("the root node is the anchor of its tree and cannot be detached")]
    RootIsAnchored,

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

pub type TreeResult<T> = Result<T, TreeError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
