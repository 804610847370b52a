use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::utils::sha256_digest;
use data_encoding::HEXLOWER;
use num_bigint::{BigInt, Sign};
use std::ops::ShlAssign;

/// Leading zero bits required of every block hash. Fixed for the whole
/// chain; there is no difficulty adjustment.
pub const TARGET_BITS: u32 = 16;

const MAX_NONCE: i64 = i64::MAX;

pub struct ProofOfWork<'a> {
    block: &'a Block,
    transactions_digest: Vec<u8>,
    target: BigInt,
}

fn target() -> BigInt {
    let mut target = BigInt::from(1);
    target.shl_assign(256 - TARGET_BITS);
    target
}

impl<'a> ProofOfWork<'a> {
    pub fn new_proof_of_work(block: &'a Block) -> ProofOfWork<'a> {
        ProofOfWork {
            block,
            transactions_digest: block.hash_transactions(),
            target: target(),
        }
    }

    /// Recomputes the digest with the stored nonce. The block is valid when
    /// that digest is below the target and equals the stored hash.
    pub fn validate(block: &Block) -> bool {
        let pow = ProofOfWork::new_proof_of_work(block);
        let hash = sha256_digest(pow.prepare_data(block.get_nonce()).as_slice());
        pow.meets_target(&hash) && hash.as_slice() == block.get_hash()
    }

    fn meets_target(&self, hash: &[u8]) -> bool {
        BigInt::from_bytes_be(Sign::Plus, hash) < self.target
    }

    fn prepare_data(&self, nonce: i64) -> Vec<u8> {
        let mut data_bytes = vec![];
        data_bytes.extend(self.block.get_pre_block_hash());
        data_bytes.extend(self.transactions_digest.as_slice());
        data_bytes.extend(self.block.get_timestamp().to_be_bytes());
        data_bytes.extend(nonce.to_be_bytes());
        data_bytes
    }

    /// Smallest nonce whose digest falls below the target, with that digest.
    pub fn run(&self) -> Result<(i64, Vec<u8>)> {
        log::debug!("Mining a block with target {} bits", TARGET_BITS);
        for nonce in 0..MAX_NONCE {
            let hash = sha256_digest(self.prepare_data(nonce).as_slice());
            if self.meets_target(&hash) {
                log::debug!("Found nonce {nonce}: {}", HEXLOWER.encode(&hash));
                return Ok((nonce, hash));
            }
        }
        Err(BlockchainError::Mining(format!(
            "No nonce below {MAX_NONCE} satisfies {TARGET_BITS} target bits"
        )))
    }
}
