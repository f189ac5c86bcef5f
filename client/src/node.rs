//! The remote node a client talks to.
//!
//! Transport is up to the implementor; the client only needs these calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tangle_types::{Address, Hash};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("node request failed: {0}")]
    Request(String),

    #[error("malformed node response: {0}")]
    Response(String),
}

/// Status reported by `getNodeInfo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub app_name: String,
    pub app_version: String,
    pub latest_milestone_index: u64,
}

impl NodeInfo {
    /// Decodes a JSON response body; unknown fields are ignored.
    pub fn from_json(body: &str) -> Result<Self, NodeError> {
        serde_json::from_str(body).map_err(|e| NodeError::Response(e.to_string()))
    }
}

/// Calls a client makes against a node.
pub trait NodeApi {
    /// Hashes of transactions touching any of `addresses`.
    fn find_transactions(&self, addresses: &[Address]) -> Result<Vec<Hash>, NodeError>;

    /// Raw trytes for each hash, in request order. Unknown hashes come back
    /// as all-`9` strings.
    fn get_trytes(&self, hashes: &[Hash]) -> Result<Vec<String>, NodeError>;

    fn store_transactions(&self, trytes: &[String]) -> Result<(), NodeError>;

    fn broadcast_transactions(&self, trytes: &[String]) -> Result<(), NodeError>;

    fn get_node_info(&self) -> Result<NodeInfo, NodeError>;
}

impl<N: NodeApi + ?Sized> NodeApi for &N {
    fn find_transactions(&self, addresses: &[Address]) -> Result<Vec<Hash>, NodeError> {
        (**self).find_transactions(addresses)
    }

    fn get_trytes(&self, hashes: &[Hash]) -> Result<Vec<String>, NodeError> {
        (**self).get_trytes(hashes)
    }

    fn store_transactions(&self, trytes: &[String]) -> Result<(), NodeError> {
        (**self).store_transactions(trytes)
    }

    fn broadcast_transactions(&self, trytes: &[String]) -> Result<(), NodeError> {
        (**self).broadcast_transactions(trytes)
    }

    fn get_node_info(&self) -> Result<NodeInfo, NodeError> {
        (**self).get_node_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_info_decodes_camel_case() {
        let body = r#"{
            "appName": "IRI",
            "appVersion": "1.8.6",
            "latestMilestoneIndex": 1050373,
            "neighbors": 7
        }"#;
        let info = NodeInfo::from_json(body).unwrap();
        assert_eq!(info.app_name, "IRI");
        assert_eq!(info.app_version, "1.8.6");
        assert_eq!(info.latest_milestone_index, 1_050_373);
    }

    #[test]
    fn node_info_missing_field_is_malformed() {
        assert!(matches!(
            NodeInfo::from_json(r#"{"appName": "IRI"}"#),
            Err(NodeError::Response(_))
        ));
    }
}
