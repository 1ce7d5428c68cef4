//! Binary cache format for parsed rule trees.
//!
//! Rule stores that evaluate the same rules repeatedly can keep the encoded
//! tree next to the rule string and skip tokenizing and parsing on load.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RKIT"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The payload stores the tree with same-connective left spines collapsed
//! into one chain, so `a AND b AND c` is stored as a three-element list.
//! Decoding folds chains back to the left, which restores the exact tree.
//!
//! Decoding enforces the same depth limit as parsing. The recorded depth is
//! checked before any tree is rebuilt, and rebuilding stops as soon as the
//! payload nests deeper than it claims.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CompareOp, Connective, Identifier, Limits, Literal, Node};

const MAGIC: &[u8; 4] = b"RKIT";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when encoding a [`Node`] to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule tree: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("payload of {0} bytes exceeds the format limit")]
    TooLarge(usize),
}

/// Errors that can occur when decoding a [`Node`] from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a rulekit binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("rule tree depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("blob was encoded from a different rule string")]
    StaleSource,

    #[error("blob carries no source digest")]
    MissingSourceDigest,
}

// -- Payload types ----------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedTree {
    metadata: TreeMetadata,
    root: SerializedNode,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TreeMetadata {
    comparisons: usize,
    depth: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedNode {
    Chain {
        connective: SerializedConnective,
        children: Vec<SerializedNode>,
    },
    Comparison {
        field: String,
        op: SerializedCompareOp,
        literal: SerializedLiteral,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum SerializedConnective {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum SerializedCompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedLiteral {
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<Connective> for SerializedConnective {
    fn from(c: Connective) -> Self {
        match c {
            Connective::And => SerializedConnective::And,
            Connective::Or => SerializedConnective::Or,
        }
    }
}

impl From<SerializedConnective> for Connective {
    fn from(c: SerializedConnective) -> Self {
        match c {
            SerializedConnective::And => Connective::And,
            SerializedConnective::Or => Connective::Or,
        }
    }
}

impl From<CompareOp> for SerializedCompareOp {
    fn from(op: CompareOp) -> Self {
        match op {
            CompareOp::Eq => SerializedCompareOp::Eq,
            CompareOp::Neq => SerializedCompareOp::Neq,
            CompareOp::Gt => SerializedCompareOp::Gt,
            CompareOp::Gte => SerializedCompareOp::Gte,
            CompareOp::Lt => SerializedCompareOp::Lt,
            CompareOp::Lte => SerializedCompareOp::Lte,
        }
    }
}

impl From<SerializedCompareOp> for CompareOp {
    fn from(op: SerializedCompareOp) -> Self {
        match op {
            SerializedCompareOp::Eq => CompareOp::Eq,
            SerializedCompareOp::Neq => CompareOp::Neq,
            SerializedCompareOp::Gt => CompareOp::Gt,
            SerializedCompareOp::Gte => CompareOp::Gte,
            SerializedCompareOp::Lt => CompareOp::Lt,
            SerializedCompareOp::Lte => CompareOp::Lte,
        }
    }
}

impl From<&Literal> for SerializedLiteral {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(v) => SerializedLiteral::Int(*v),
            Literal::Float(v) => SerializedLiteral::Float(*v),
            Literal::String(v) => SerializedLiteral::Str(v.clone()),
        }
    }
}

impl From<SerializedLiteral> for Literal {
    fn from(literal: SerializedLiteral) -> Self {
        match literal {
            SerializedLiteral::Int(v) => Literal::Int(v),
            SerializedLiteral::Float(v) => Literal::Float(v),
            SerializedLiteral::Str(v) => Literal::String(v),
        }
    }
}

// -- Flattening -------------------------------------------------------------

fn flatten(node: &Node) -> SerializedNode {
    match node {
        Node::Logical { connective, .. } => {
            let mut children = Vec::new();
            collect_spine(node, *connective, &mut children);
            SerializedNode::Chain {
                connective: (*connective).into(),
                children,
            }
        }
        Node::Comparison {
            operator,
            field,
            literal,
        } => SerializedNode::Comparison {
            field: field.name().to_owned(),
            op: (*operator).into(),
            literal: literal.into(),
        },
    }
}

/// Only the left spine is collapsed: a right child with the same connective
/// is grouped in the source tree and must stay a separate chain.
fn collect_spine(node: &Node, connective: Connective, out: &mut Vec<SerializedNode>) {
    match node {
        Node::Logical {
            connective: c,
            left,
            right,
        } if *c == connective => {
            collect_spine(left, connective, out);
            out.push(flatten(right));
        }
        other => out.push(flatten(other)),
    }
}

/// `budget` is the number of levels the subtree may still use.
fn unflatten(node: SerializedNode, budget: usize) -> Result<Node, DeserializeError> {
    let Some(inner) = budget.checked_sub(1) else {
        return Err(DeserializeError::Validation(
            "payload nests deeper than its recorded depth".into(),
        ));
    };
    match node {
        SerializedNode::Chain {
            connective,
            children,
        } => {
            let arity = children.len();
            let mut iter = children.into_iter();
            let (Some(first), true) = (iter.next(), arity >= 2) else {
                return Err(DeserializeError::Validation(format!(
                    "chain has {arity} children, expected at least 2"
                )));
            };
            let connective = Connective::from(connective);
            let mut acc = unflatten(first, inner)?;
            for child in iter {
                acc = Node::logical(connective, acc, unflatten(child, inner)?);
            }
            Ok(acc)
        }
        SerializedNode::Comparison { field, op, literal } => Ok(Node::Comparison {
            operator: op.into(),
            field: Identifier::new(field),
            literal: literal.into(),
        }),
    }
}

fn validate(metadata: &TreeMetadata, node: &Node) -> Result<(), DeserializeError> {
    if metadata.comparisons != node.comparisons() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} comparisons but payload has {}",
            metadata.comparisons,
            node.comparisons()
        )));
    }
    if metadata.depth != node.depth() {
        return Err(DeserializeError::Validation(format!(
            "metadata says depth {} but payload has depth {}",
            metadata.depth,
            node.depth()
        )));
    }
    Ok(())
}

// -- Header -----------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) -> Result<(), SerializeError> {
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
    Ok(())
}

struct Header {
    format_version: u16,
    payload_len: u32,
    hash: [u8; 16],
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32
fn read_header(bytes: &[u8]) -> Result<Header, DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }
    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    // bytes[6..12]: engine version and reserved flags, not checked.
    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);
    Ok(Header {
        format_version: u16::from_le_bytes([bytes[4], bytes[5]]),
        payload_len: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        hash,
    })
}

// -- Encode / decode --------------------------------------------------------

pub(crate) fn encode(node: &Node, source: Option<&str>) -> Result<Vec<u8>, SerializeError> {
    let tree = SerializedTree {
        metadata: TreeMetadata {
            comparisons: node.comparisons(),
            depth: node.depth(),
            source_digest: source.map(source_digest),
        },
        root: flatten(node),
    };
    let payload = bincode::serde::encode_to_vec(&tree, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload)?;
    buf.extend_from_slice(&payload);
    tracing::debug!(bytes = buf.len(), "encoded rule tree");
    Ok(buf)
}

fn source_digest(source: &str) -> [u8; 32] {
    *blake3::hash(source.as_bytes()).as_bytes()
}

/// Decode a blob. With `source`, the blob must carry the digest of exactly
/// that rule string.
pub(crate) fn decode(
    bytes: &[u8],
    source: Option<&str>,
    limits: Limits,
) -> Result<Node, DeserializeError> {
    let header = read_header(bytes)?;
    if header.format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: header.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + header.payload_len as usize;
    if bytes.len() != payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: header.payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..];

    if blake3::hash(payload).as_bytes()[..16] != header.hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (tree, _): (SerializedTree, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    if let Some(source) = source {
        match tree.metadata.source_digest {
            Some(digest) if digest == source_digest(source) => {}
            Some(_) => return Err(DeserializeError::StaleSource),
            None => return Err(DeserializeError::MissingSourceDigest),
        }
    }

    let depth = tree.metadata.depth;
    if depth > limits.max_depth {
        return Err(DeserializeError::TooDeep {
            depth,
            limit: limits.max_depth,
        });
    }
    let node = unflatten(tree.root, depth)?;
    validate(&tree.metadata, &node)?;
    tracing::debug!(
        comparisons = tree.metadata.comparisons,
        depth,
        "decoded rule tree"
    );
    Ok(node)
}

impl Node {
    /// Encode this tree into the binary cache format.
    ///
    /// Passing the rule string the tree was parsed from stores its BLAKE3
    /// digest. [`Node::from_bytes_checked`] compares it against the current
    /// rule string to detect stale cache entries.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`] if the payload cannot be encoded.
    pub fn to_bytes(&self, source: Option<&str>) -> Result<Vec<u8>, SerializeError> {
        encode(self, source)
    }

    /// Decode a tree previously produced by [`Node::to_bytes`], under the
    /// default [`Limits`]. Use
    /// [`RuleEngine::decode_bytes`](crate::RuleEngine::decode_bytes) for
    /// other limits.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`] if the header, checksum, or payload is
    /// invalid, or if the tree is deeper than the default depth limit.
    pub fn from_bytes(bytes: &[u8]) -> Result<Node, DeserializeError> {
        decode(bytes, None, Limits::default())
    }

    /// Decode a tree and check that it was encoded from `source`.
    ///
    /// # Errors
    ///
    /// Everything [`Node::from_bytes`] rejects, plus
    /// [`DeserializeError::StaleSource`] when the blob was encoded from a
    /// different rule string and [`DeserializeError::MissingSourceDigest`]
    /// when it was encoded without one.
    pub fn from_bytes_checked(bytes: &[u8], source: &str) -> Result<Node, DeserializeError> {
        decode(bytes, Some(source), Limits::default())
    }
}
