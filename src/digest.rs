//! Digest computation and target normalization.
//!
//! Targets are accepted as hex in either case and stored decoded, so
//! comparison never depends on how the caller typed the digest.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::SwallowError;

/// Hash functions a search can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha256 => 32,
        }
    }

    /// Lowercase hex digest of `input`.
    pub fn hex_digest(self, input: &[u8]) -> String {
        match self {
            HashAlgorithm::Md5 => format!("{:x}", md5::compute(input)),
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => f.write_str("md5"),
            HashAlgorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = SwallowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(SwallowError::config(format!("unknown hash algorithm '{other}'"))),
        }
    }
}

/// The digest function workers test candidates with.
///
/// Implementations must be pure: the same input always yields the same
/// answer, from any thread.
pub trait Digester: Send + Sync {
    /// Digest length in bytes; targets of any other length are rejected.
    fn output_len(&self) -> usize;

    /// Whether the digest of `candidate` equals the normalized `target` bytes.
    fn matches(&self, candidate: &[u8], target: &[u8]) -> bool;
}

impl Digester for HashAlgorithm {
    fn output_len(&self) -> usize {
        HashAlgorithm::output_len(*self)
    }

    fn matches(&self, candidate: &[u8], target: &[u8]) -> bool {
        match self {
            HashAlgorithm::Md5 => md5::compute(candidate).0[..] == *target,
            HashAlgorithm::Sha256 => Sha256::digest(candidate).as_slice() == target,
        }
    }
}

/// A target digest in normalized (decoded) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDigest {
    bytes: Vec<u8>,
}

impl TargetDigest {
    /// Parse a hex digest of exactly `expected_len` bytes. Case is ignored and
    /// surrounding whitespace trimmed.
    pub fn parse(hex_digest: &str, expected_len: usize) -> Result<Self, SwallowError> {
        let trimmed = hex_digest.trim();
        if trimmed.len() != expected_len * 2 {
            return Err(SwallowError::config(format!(
                "target digest must be {} hex characters, got {}",
                expected_len * 2,
                trimmed.len()
            )));
        }
        let bytes = hex::decode(trimmed)
            .map_err(|e| SwallowError::config(format!("target digest is not valid hex: {e}")))?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for TargetDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
