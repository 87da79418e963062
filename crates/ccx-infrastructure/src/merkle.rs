//! Content-addressed merkle DAG over file hashes
//!
//! One leaf node per file carrying the file's content hash, one root node
//! whose payload concatenates every file hash in insertion order. Node ids
//! are the hash of the node payload, so any content change ripples into the
//! root id.

use ccx_domain::constants::MERKLE_ROOT_PREFIX;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A node of the merkle DAG
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerkleNode {
    /// `hash(data)`
    pub id: String,
    /// Node payload: the file hash for leaves, the prefixed concatenation
    /// of all file hashes for the root
    pub data: String,
    /// Ids of parent nodes
    pub parents: Vec<String>,
    /// Ids of child nodes
    pub children: Vec<String>,
}

/// The DAG part of a codebase snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerkleDag {
    /// `(id, node)` pairs in insertion order: root first, then one leaf
    /// per file
    pub nodes: Vec<(String, MerkleNode)>,
    /// Ids of root nodes (exactly one for a codebase snapshot)
    #[serde(rename = "rootIds")]
    pub root_ids: Vec<String>,
}

impl MerkleDag {
    /// Build the DAG for an insertion-ordered `(path, hash)` list
    pub fn from_file_hashes(file_hashes: &[(String, String)]) -> Self {
        let mut root_data = String::from(MERKLE_ROOT_PREFIX);
        for (_, hash) in file_hashes {
            root_data.push_str(hash);
        }
        let root_id = hash_data(&root_data);

        let leaves: Vec<MerkleNode> = file_hashes
            .iter()
            .map(|(_, hash)| MerkleNode {
                id: hash_data(hash),
                data: hash.clone(),
                parents: vec![root_id.clone()],
                children: Vec::new(),
            })
            .collect();

        let root = MerkleNode {
            id: root_id.clone(),
            data: root_data,
            parents: Vec::new(),
            children: leaves.iter().map(|leaf| leaf.id.clone()).collect(),
        };

        let mut nodes = Vec::with_capacity(leaves.len() + 1);
        nodes.push((root_id.clone(), root));
        for leaf in leaves {
            nodes.push((leaf.id.clone(), leaf));
        }

        Self {
            nodes,
            root_ids: vec![root_id],
        }
    }

    /// Id of the single snapshot root
    pub fn root_id(&self) -> Option<&str> {
        self.root_ids.first().map(String::as_str)
    }
}

/// Hex-encoded SHA-256 of a UTF-8 payload
pub fn hash_data(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Hex-encoded SHA-256 of raw bytes (file contents)
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
