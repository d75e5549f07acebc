//! Chain-integrity check.
//!
//! For every adjacent pair `(previous, current)` the check enforces:
//!
//! - linkage: `current.previous_hash == previous.hash`,
//! - self-consistency: `current.hash` equals the hash recomputed from
//!   `current`'s own canonical fields.
//!
//! The genesis block has no predecessor and is not re-hashed; its stored
//! hash is trusted as the anchor of the chain.

use crate::error::IntegrityError;
use crate::types::Block;

/// Verifies linkage and self-consistency across `chain`.
///
/// Stops at the first failing block and reports it.
pub fn verify_chain(chain: &[Block]) -> Result<(), IntegrityError> {
    for pair in chain.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        check_link(previous, current)?;
        check_self_hash(current)?;
    }
    Ok(())
}

fn check_link(previous: &Block, current: &Block) -> Result<(), IntegrityError> {
    if current.previous_hash() != previous.hash() {
        return Err(IntegrityError::BrokenLink {
            index: current.index(),
        });
    }
    Ok(())
}

fn check_self_hash(block: &Block) -> Result<(), IntegrityError> {
    if block.compute_hash() != block.hash() {
        return Err(IntegrityError::HashMismatch {
            index: block.index(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockHash, CertificateHash, GENESIS_PARENT, HASH_LEN, Hash256};

    fn cert(text: &str) -> CertificateHash {
        CertificateHash::from_normalized(text)
    }

    fn build_chain(batches: &[&[&str]]) -> Vec<Block> {
        let mut chain = vec![Block::seal(1, 0, Vec::new(), GENESIS_PARENT)];
        for (i, batch) in batches.iter().enumerate() {
            let prev = chain[chain.len() - 1].hash();
            let hashes = batch.iter().map(|t| cert(t)).collect();
            chain.push(Block::seal(i as u64 + 2, i as u64 + 1, hashes, prev));
        }
        chain
    }

    #[test]
    fn empty_and_genesis_only_chains_are_valid() {
        assert!(verify_chain(&[]).is_ok());
        assert!(verify_chain(&build_chain(&[])).is_ok());
    }

    #[test]
    fn well_formed_chain_is_valid() {
        let chain = build_chain(&[&["a"], &["b", "c"], &["d"]]);
        assert_eq!(verify_chain(&chain), Ok(()));
    }

    #[test]
    fn edited_batch_is_a_hash_mismatch() {
        let mut chain = build_chain(&[&["a"], &["b"]]);
        chain[1].certificate_hashes_mut()[0] = cert("forged");
        assert_eq!(
            verify_chain(&chain),
            Err(IntegrityError::HashMismatch { index: 2 })
        );
    }

    #[test]
    fn edited_timestamp_is_a_hash_mismatch() {
        let mut chain = build_chain(&[&["a"]]);
        chain[1].set_timestamp(999);
        assert_eq!(
            verify_chain(&chain),
            Err(IntegrityError::HashMismatch { index: 2 })
        );
    }

    #[test]
    fn resealed_block_breaks_the_next_link() {
        let mut chain = build_chain(&[&["a"], &["b"]]);
        // Re-seal block 2 with forged contents: self-consistent, but block 3
        // still points at the original hash.
        let forged = Block::seal(2, 1, vec![cert("forged")], chain[0].hash());
        chain[1] = forged;
        assert_eq!(
            verify_chain(&chain),
            Err(IntegrityError::BrokenLink { index: 3 })
        );
    }

    #[test]
    fn wrong_parent_is_a_broken_link() {
        let mut chain = build_chain(&[]);
        let bogus_parent = BlockHash(Hash256([9u8; HASH_LEN]));
        chain.push(Block::seal(2, 1, vec![cert("a")], bogus_parent));
        assert_eq!(
            verify_chain(&chain),
            Err(IntegrityError::BrokenLink { index: 2 })
        );
    }

    #[test]
    fn tampered_genesis_contents_are_not_rechecked() {
        // Genesis is trusted: editing its contents without touching its
        // stored hash leaves every link intact.
        let mut chain = build_chain(&[&["a"]]);
        chain[0].certificate_hashes_mut().push(cert("smuggled"));
        assert!(verify_chain(&chain).is_ok());
    }
}
