// Value transfer in the UTXO model: every transaction consumes earlier outputs
// through its inputs and creates new outputs locked to a public-key hash.
// Whether an output is spent is never stored; the chain is replayed to find out.

use crate::core::Blockchain;
use crate::error::{BlockchainError, Result};
use crate::storage::Storage;
use crate::utils::{
    deserialize, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify, serialize,
    sha256_digest,
};
use crate::wallet::{address_to_pub_key_hash, hash_pub_key, Wallet};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Value minted by every coinbase transaction
pub const SUBSIDY: u64 = 10;

// Output index carried by the single input of a coinbase transaction
const COINBASE_VOUT: i64 = -1;

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct TXInput {
    txid: Vec<u8>,      // id of the transaction holding the output being spent
    vout: i64,          // index of that output, -1 for coinbase
    signature: Vec<u8>, // r || s over the input's signing digest
    pub_key: Vec<u8>,   // spender's x || y public key, coinbase data for coinbase
}

impl TXInput {
    pub fn new(txid: &[u8], vout: i64) -> TXInput {
        TXInput {
            txid: txid.to_vec(),
            vout,
            signature: vec![],
            pub_key: vec![],
        }
    }

    pub fn with_public_key(txid: &[u8], vout: i64, pub_key: &[u8]) -> TXInput {
        TXInput {
            pub_key: pub_key.to_vec(),
            ..TXInput::new(txid, vout)
        }
    }

    pub fn get_txid(&self) -> &[u8] {
        self.txid.as_slice()
    }

    pub fn get_vout(&self) -> i64 {
        self.vout
    }

    pub fn get_signature(&self) -> &[u8] {
        self.signature.as_slice()
    }

    pub fn get_pub_key(&self) -> &[u8] {
        self.pub_key.as_slice()
    }

    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.signature = signature;
    }

    /// Whether this input was signed by the owner of `pub_key_hash`.
    pub fn uses_key(&self, pub_key_hash: &[u8]) -> bool {
        hash_pub_key(self.pub_key.as_slice()).eq(pub_key_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TXOutput {
    value: u64,
    pub_key_hash: Vec<u8>, // only the hash is kept, never the address encoding
}

impl TXOutput {
    pub fn new(value: u64, address: &str) -> Result<TXOutput> {
        let mut output = TXOutput {
            value,
            pub_key_hash: vec![],
        };
        output.lock(address)?;
        Ok(output)
    }

    pub fn new_locked(value: u64, pub_key_hash: &[u8]) -> TXOutput {
        TXOutput {
            value,
            pub_key_hash: pub_key_hash.to_vec(),
        }
    }

    pub fn get_value(&self) -> u64 {
        self.value
    }

    pub fn get_pub_key_hash(&self) -> &[u8] {
        self.pub_key_hash.as_slice()
    }

    fn lock(&mut self, address: &str) -> Result<()> {
        self.pub_key_hash = address_to_pub_key_hash(address)?;
        Ok(())
    }

    pub fn is_locked_with_key(&self, pub_key_hash: &[u8]) -> bool {
        self.pub_key_hash.eq(pub_key_hash)
    }
}

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct Transaction {
    id: Vec<u8>,
    vin: Vec<TXInput>,
    vout: Vec<TXOutput>,
}

impl Transaction {
    pub fn new(vin: Vec<TXInput>, vout: Vec<TXOutput>) -> Result<Transaction> {
        let mut tx = Transaction {
            id: vec![],
            vin,
            vout,
        };
        tx.id = tx.hash()?;
        Ok(tx)
    }

    /// Mints [`SUBSIDY`] to `to`. An empty `data` becomes a reward note.
    pub fn new_coinbase_tx(to: &str, data: &str) -> Result<Transaction> {
        let data = if data.is_empty() {
            format!("Reward to '{to}'")
        } else {
            data.to_string()
        };

        let txin = TXInput::with_public_key(&[], COINBASE_VOUT, data.as_bytes());
        let txout = TXOutput::new(SUBSIDY, to)?;
        Transaction::new(vec![txin], vec![txout])
    }

    /// Builds and signs a transfer of `amount` from `from` to `to`.
    ///
    /// Change goes back to `from` when the selected outputs overshoot.
    pub fn new_utxo_transaction<S: Storage>(
        from: &Wallet,
        to: &str,
        amount: u64,
        blockchain: &Blockchain<S>,
    ) -> Result<Transaction> {
        if amount == 0 {
            return Err(BlockchainError::Transaction(
                "Amount must be positive".to_string(),
            ));
        }

        let pub_key_hash = from.get_pub_key_hash();
        let (accumulated, valid_outputs) = blockchain.find_funding(&pub_key_hash, amount)?;
        if accumulated < amount {
            return Err(BlockchainError::InsufficientFunds {
                required: amount,
                available: accumulated,
            });
        }

        let mut txids: Vec<&String> = valid_outputs.keys().collect();
        txids.sort();

        let mut inputs = vec![];
        for txid_hex in txids {
            let txid = HEXLOWER.decode(txid_hex.as_bytes()).map_err(|e| {
                BlockchainError::Serialization(format!("Invalid transaction ID: {e}"))
            })?;
            for &out in &valid_outputs[txid_hex] {
                let vout = i64::try_from(out).map_err(|_| {
                    BlockchainError::ConsensusViolation(format!("Output index {out} out of range"))
                })?;
                inputs.push(TXInput::with_public_key(
                    &txid,
                    vout,
                    from.get_public_key(),
                ));
            }
        }

        let mut outputs = vec![TXOutput::new(amount, to)?];
        if accumulated > amount {
            outputs.push(TXOutput::new_locked(accumulated - amount, &pub_key_hash));
        }

        let mut tx = Transaction::new(inputs, outputs)?;
        blockchain.sign_transaction(&mut tx, from.get_pkcs8())?;
        Ok(tx)
    }

    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].txid.is_empty() && self.vin[0].vout == COINBASE_VOUT
    }

    /// Content hash of the canonical form, which excludes the id itself.
    pub fn hash(&self) -> Result<Vec<u8>> {
        let canonical = Transaction {
            id: vec![],
            vin: self.vin.clone(),
            vout: self.vout.clone(),
        };
        Ok(sha256_digest(canonical.serialize()?.as_slice()))
    }

    /// Copy without signatures or public keys: the form that gets signed.
    pub fn trimmed_copy(&self) -> Transaction {
        let inputs = self
            .vin
            .iter()
            .map(|input| TXInput::new(input.get_txid(), input.get_vout()))
            .collect();
        Transaction {
            id: self.id.clone(),
            vin: inputs,
            vout: self.vout.clone(),
        }
    }

    // Digest signed for input `index` of a trimmed copy. That input carries the
    // referenced output's pub_key_hash in place of a public key, binding the
    // signature to the exact output being spent. Shared by sign and verify.
    fn input_digest(&self, index: usize, locking_hash: &[u8]) -> Result<Vec<u8>> {
        let mut tx_copy = self.clone();
        tx_copy.vin[index].signature = vec![];
        tx_copy.vin[index].pub_key = locking_hash.to_vec();
        tx_copy.hash()
    }

    fn referenced_output<'a>(
        prev_txs: &'a HashMap<String, Transaction>,
        input: &TXInput,
    ) -> Result<&'a TXOutput> {
        let txid_hex = HEXLOWER.encode(input.get_txid());
        let prev_tx = prev_txs.get(&txid_hex).ok_or_else(|| {
            BlockchainError::NotFound(format!("Previous transaction {txid_hex} is not resolved"))
        })?;
        usize::try_from(input.get_vout())
            .ok()
            .and_then(|idx| prev_tx.vout.get(idx))
            .ok_or_else(|| {
                BlockchainError::ConsensusViolation(format!(
                    "Output {}:{} does not exist",
                    txid_hex,
                    input.get_vout()
                ))
            })
    }

    /// Signs every input. `prev_txs` maps hex txid to the transactions the
    /// inputs reference. Nothing is signed unless all of them resolve.
    pub fn sign(&mut self, pkcs8: &[u8], prev_txs: &HashMap<String, Transaction>) -> Result<()> {
        if self.is_coinbase() {
            return Ok(());
        }

        for vin in &self.vin {
            Self::referenced_output(prev_txs, vin)?;
        }

        let tx_copy = self.trimmed_copy();
        for (idx, vin) in self.vin.iter_mut().enumerate() {
            let locking_hash = Self::referenced_output(prev_txs, vin)?.get_pub_key_hash();
            let digest = tx_copy.input_digest(idx, locking_hash)?;
            vin.signature = ecdsa_p256_sha256_sign_digest(pkcs8, digest.as_slice())?;
        }
        Ok(())
    }

    /// Checks every input: the presented key must hash to the referenced
    /// output's lock and the signature must cover the input's digest.
    /// Coinbase transactions always pass.
    pub fn verify(&self, prev_txs: &HashMap<String, Transaction>) -> Result<bool> {
        if self.is_coinbase() {
            return Ok(true);
        }

        for vin in &self.vin {
            Self::referenced_output(prev_txs, vin)?;
        }

        let tx_copy = self.trimmed_copy();
        for (idx, vin) in self.vin.iter().enumerate() {
            let locking_hash = Self::referenced_output(prev_txs, vin)?.get_pub_key_hash();
            if !vin.uses_key(locking_hash) {
                log::warn!(
                    "Input {idx} of transaction {} presents a key that does not own the output",
                    HEXLOWER.encode(self.id.as_slice())
                );
                return Ok(false);
            }
            let digest = tx_copy.input_digest(idx, locking_hash)?;
            if !ecdsa_p256_sha256_sign_verify(
                vin.pub_key.as_slice(),
                vin.signature.as_slice(),
                digest.as_slice(),
            ) {
                log::warn!(
                    "Signature check failed for input {idx} of transaction {}",
                    HEXLOWER.encode(self.id.as_slice())
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A transfer must spend at least one output and may not create more
    /// value than it consumes.
    pub fn check_value(&self, prev_txs: &HashMap<String, Transaction>) -> Result<()> {
        if self.is_coinbase() {
            return Ok(());
        }
        let txid_hex = HEXLOWER.encode(self.id.as_slice());
        if self.vin.is_empty() {
            return Err(BlockchainError::ConsensusViolation(format!(
                "Transaction {txid_hex} spends no outputs"
            )));
        }

        let mut input_value = 0u64;
        for vin in &self.vin {
            let value = Self::referenced_output(prev_txs, vin)?.get_value();
            input_value = input_value.checked_add(value).ok_or_else(|| {
                BlockchainError::ConsensusViolation(format!(
                    "Input value of transaction {txid_hex} overflows"
                ))
            })?;
        }
        let output_value = self.output_value()?;
        if output_value > input_value {
            return Err(BlockchainError::ConsensusViolation(format!(
                "Transaction {txid_hex} creates {output_value} from {input_value}"
            )));
        }
        Ok(())
    }

    pub fn output_value(&self) -> Result<u64> {
        self.vout.iter().try_fold(0u64, |total, out| {
            total.checked_add(out.get_value()).ok_or_else(|| {
                BlockchainError::ConsensusViolation(format!(
                    "Output value of transaction {} overflows",
                    HEXLOWER.encode(self.id.as_slice())
                ))
            })
        })
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_vin(&self) -> &[TXInput] {
        self.vin.as_slice()
    }

    pub fn get_vin_mut(&mut self) -> &mut [TXInput] {
        self.vin.as_mut_slice()
    }

    pub fn get_vout(&self) -> &[TXOutput] {
        self.vout.as_slice()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Transaction> {
        deserialize(bytes)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Transaction {}:", HEXLOWER.encode(&self.id))?;
        for (i, input) in self.vin.iter().enumerate() {
            writeln!(f, "     Input {i}:")?;
            writeln!(f, "       TXID:      {}", HEXLOWER.encode(&input.txid))?;
            writeln!(f, "       Out:       {}", input.vout)?;
            writeln!(f, "       Signature: {}", HEXLOWER.encode(&input.signature))?;
            writeln!(f, "       PubKey:    {}", HEXLOWER.encode(&input.pub_key))?;
        }
        for (i, output) in self.vout.iter().enumerate() {
            writeln!(f, "     Output {i}:")?;
            writeln!(f, "       Value:  {}", output.value)?;
            write!(f, "       Script: {}", HEXLOWER.encode(&output.pub_key_hash))?;
            if i + 1 < self.vout.len() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
