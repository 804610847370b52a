// The chain itself: genesis creation, mining append, and every ledger query.
// Queries replay history from the tip back to genesis; nothing about spent
// outputs is indexed, so each query is one full backward traversal.

use crate::config::GLOBAL_CONFIG;
use crate::core::{Block, ProofOfWork, TXOutput, Transaction};
use crate::error::{BlockchainError, Result};
use crate::storage::{SledStore, Storage, TIP_BLOCK_HASH_KEY};
use data_encoding::HEXLOWER;
use log::{error, info};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Data attached to the genesis coinbase
pub const GENESIS_COINBASE_DATA: &str = "Blockchain project";

/// Handle on a chain stored in `S`. The tip is re-read from the store by
/// every operation and never cached here.
pub struct Blockchain<S: Storage = SledStore> {
    store: S,
}

impl Blockchain<SledStore> {
    /// Creates a chain in the configured data directory.
    pub fn create_blockchain(genesis_address: &str) -> Result<Blockchain> {
        Self::create_blockchain_with_path(genesis_address, GLOBAL_CONFIG.get_data_dir())
    }

    /// Opens the chain in the configured data directory.
    pub fn new_blockchain() -> Result<Blockchain> {
        Self::new_blockchain_with_path(GLOBAL_CONFIG.get_data_dir())
    }

    pub fn create_blockchain_with_path(
        genesis_address: &str,
        db_path: impl AsRef<Path>,
    ) -> Result<Blockchain> {
        Blockchain::create(SledStore::open(db_path)?, genesis_address)
    }

    pub fn new_blockchain_with_path(db_path: impl AsRef<Path>) -> Result<Blockchain> {
        if !SledStore::exists(db_path.as_ref()) {
            return Err(BlockchainError::NotFound(
                "No existing blockchain found. Create one first.".to_string(),
            ));
        }
        Blockchain::open(SledStore::open(db_path)?)
    }
}

impl<S: Storage> Blockchain<S> {
    /// Writes a genesis block paying the subsidy to `genesis_address`.
    pub fn create(store: S, genesis_address: &str) -> Result<Blockchain<S>> {
        if store.get(TIP_BLOCK_HASH_KEY)?.is_some() {
            return Err(BlockchainError::AlreadyExists(
                "Blockchain already exists.".to_string(),
            ));
        }

        info!("Creating genesis block for address: {genesis_address}");
        let coinbase_tx = Transaction::new_coinbase_tx(genesis_address, GENESIS_COINBASE_DATA)?;
        let genesis = Block::generate_genesis_block(&coinbase_tx)?;

        let blockchain = Blockchain { store };
        blockchain.commit_block(&genesis)?;
        Ok(blockchain)
    }

    pub fn open(store: S) -> Result<Blockchain<S>> {
        let blockchain = Blockchain { store };
        blockchain.get_tip_hash()?;
        Ok(blockchain)
    }

    pub fn get_store(&self) -> &S {
        &self.store
    }

    pub fn get_tip_hash(&self) -> Result<Vec<u8>> {
        self.store.get(TIP_BLOCK_HASH_KEY)?.ok_or_else(|| {
            BlockchainError::NotFound("No existing blockchain found. Create one first.".to_string())
        })
    }

    pub fn get_block(&self, block_hash: &[u8]) -> Result<Option<Block>> {
        match self.store.get(block_hash)? {
            Some(bytes) => Ok(Some(Block::deserialize(bytes.as_slice())?)),
            None => Ok(None),
        }
    }

    // Block record and tip pointer land in one all-or-nothing batch.
    fn commit_block(&self, block: &Block) -> Result<()> {
        let block_hash = block.get_hash().to_vec();
        self.store.put_batch(&[
            (block_hash.clone(), block.serialize()?),
            (TIP_BLOCK_HASH_KEY.to_vec(), block_hash),
        ])
    }

    /// Verifies `transactions` and their value balance, mines them on top of
    /// the current tip and makes the new block the tip.
    pub fn mine_block(&self, transactions: &[Transaction]) -> Result<Block> {
        for (i, transaction) in transactions.iter().enumerate() {
            if !self.verify_transaction(transaction)? {
                let txid_hex = HEXLOWER.encode(transaction.get_id());
                error!("Rejecting block: transaction {txid_hex} at index {i} failed verification");
                return Err(BlockchainError::InvalidSignature(format!(
                    "Invalid transaction {txid_hex} at index {i}"
                )));
            }
            if !transaction.is_coinbase() {
                let prev_txs = self.resolve_previous_transactions(transaction)?;
                transaction.check_value(&prev_txs)?;
            }
        }

        self.check_for_double_spending(transactions)?;

        let tip_hash = self.get_tip_hash()?;
        let block = Block::new_block(tip_hash, transactions)?;
        self.commit_block(&block)?;

        info!(
            "Appended block {} on top of {}",
            HEXLOWER.encode(block.get_hash()),
            HEXLOWER.encode(block.get_pre_block_hash())
        );
        Ok(block)
    }

    /// Blocks from the current tip back to genesis.
    pub fn iterator(&self) -> Result<BlockchainIterator<'_, S>> {
        Ok(BlockchainIterator::new(self.get_tip_hash()?, &self.store))
    }

    pub fn find_transaction(&self, txid: &[u8]) -> Result<Transaction> {
        for block in self.iterator()? {
            let block = block?;
            if let Some(transaction) = block
                .get_transactions()
                .iter()
                .find(|transaction| transaction.get_id() == txid)
            {
                return Ok(transaction.clone());
            }
        }
        Err(BlockchainError::NotFound(format!(
            "Transaction {} is not found",
            HEXLOWER.encode(txid)
        )))
    }

    fn resolve_previous_transactions(
        &self,
        transaction: &Transaction,
    ) -> Result<HashMap<String, Transaction>> {
        let mut prev_txs = HashMap::new();
        for vin in transaction.get_vin() {
            let txid_hex = HEXLOWER.encode(vin.get_txid());
            if !prev_txs.contains_key(&txid_hex) {
                let prev_tx = self.find_transaction(vin.get_txid())?;
                prev_txs.insert(txid_hex, prev_tx);
            }
        }
        Ok(prev_txs)
    }

    pub fn sign_transaction(&self, transaction: &mut Transaction, pkcs8: &[u8]) -> Result<()> {
        if transaction.is_coinbase() {
            return Ok(());
        }
        let prev_txs = self.resolve_previous_transactions(transaction)?;
        transaction.sign(pkcs8, &prev_txs)
    }

    pub fn verify_transaction(&self, transaction: &Transaction) -> Result<bool> {
        if transaction.is_coinbase() {
            return Ok(true);
        }
        let prev_txs = self.resolve_previous_transactions(transaction)?;
        transaction.verify(&prev_txs)
    }

    // One backward pass. Returns each transaction holding outputs locked to
    // `pub_key_hash` that no later input spends, with those output indices.
    // Transactions inside a block are also walked last to first, so a spend
    // is always recorded before the output it consumes is reached.
    fn scan_unspent(&self, pub_key_hash: &[u8]) -> Result<Vec<(Transaction, Vec<usize>)>> {
        let mut unspent = vec![];
        let mut spent_txos: HashMap<String, Vec<i64>> = HashMap::new();

        for block in self.iterator()? {
            let block = block?;
            for tx in block.get_transactions().iter().rev() {
                let txid_hex = HEXLOWER.encode(tx.get_id());
                let spent = spent_txos.get(txid_hex.as_str());

                let indices: Vec<usize> = tx
                    .get_vout()
                    .iter()
                    .enumerate()
                    .filter(|(idx, out)| {
                        out.is_locked_with_key(pub_key_hash)
                            && !spent.is_some_and(|outs| outs.contains(&(*idx as i64)))
                    })
                    .map(|(idx, _)| idx)
                    .collect();
                if !indices.is_empty() {
                    unspent.push((tx.clone(), indices));
                }

                if tx.is_coinbase() {
                    continue;
                }
                for txin in tx.get_vin() {
                    spent_txos
                        .entry(HEXLOWER.encode(txin.get_txid()))
                        .or_default()
                        .push(txin.get_vout());
                }
            }
        }
        Ok(unspent)
    }

    /// Transactions, newest first, that still hold unspent outputs for
    /// `pub_key_hash`.
    pub fn find_spendable_transactions(&self, pub_key_hash: &[u8]) -> Result<Vec<Transaction>> {
        Ok(self
            .scan_unspent(pub_key_hash)?
            .into_iter()
            .map(|(tx, _)| tx)
            .collect())
    }

    pub fn find_utxo(&self, pub_key_hash: &[u8]) -> Result<Vec<TXOutput>> {
        let mut utxos = vec![];
        for (tx, indices) in self.scan_unspent(pub_key_hash)? {
            for idx in indices {
                let out = &tx.get_vout()[idx];
                if out.is_locked_with_key(pub_key_hash) {
                    utxos.push(out.clone());
                }
            }
        }
        Ok(utxos)
    }

    /// Greedily selects unspent outputs in traversal order until `amount` is
    /// covered. The accumulation is returned even when it falls short.
    pub fn find_funding(
        &self,
        pub_key_hash: &[u8],
        amount: u64,
    ) -> Result<(u64, HashMap<String, Vec<usize>>)> {
        let mut unspent_outputs: HashMap<String, Vec<usize>> = HashMap::new();
        let mut accumulated = 0u64;

        'work: for (tx, indices) in self.scan_unspent(pub_key_hash)? {
            let txid_hex = HEXLOWER.encode(tx.get_id());
            for idx in indices {
                if accumulated >= amount {
                    break 'work;
                }
                accumulated = accumulated.saturating_add(tx.get_vout()[idx].get_value());
                unspent_outputs
                    .entry(txid_hex.clone())
                    .or_default()
                    .push(idx);
            }
        }
        Ok((accumulated, unspent_outputs))
    }

    pub fn get_balance(&self, pub_key_hash: &[u8]) -> Result<u64> {
        self.find_utxo(pub_key_hash)?
            .iter()
            .try_fold(0u64, |balance, out| balance.checked_add(out.get_value()))
            .ok_or_else(|| {
                BlockchainError::ConsensusViolation(format!(
                    "Balance of {} overflows",
                    HEXLOWER.encode(pub_key_hash)
                ))
            })
    }

    // Every (txid, vout) consumed by an input anywhere on the chain.
    fn spent_outputs(&self) -> Result<HashSet<(Vec<u8>, i64)>> {
        let mut spent = HashSet::new();
        for block in self.iterator()? {
            for tx in block?.get_transactions() {
                if tx.is_coinbase() {
                    continue;
                }
                for txin in tx.get_vin() {
                    spent.insert((txin.get_txid().to_vec(), txin.get_vout()));
                }
            }
        }
        Ok(spent)
    }

    // An output may be consumed once: not twice within the batch and not if
    // any block already spent it.
    fn check_for_double_spending(&self, transactions: &[Transaction]) -> Result<()> {
        let spent_on_chain = self.spent_outputs()?;
        let mut spent_in_batch: HashSet<(Vec<u8>, i64)> = HashSet::new();

        for (tx_index, transaction) in transactions.iter().enumerate() {
            if transaction.is_coinbase() {
                continue;
            }
            for input in transaction.get_vin() {
                let output_reference = (input.get_txid().to_vec(), input.get_vout());
                if spent_on_chain.contains(&output_reference)
                    || !spent_in_batch.insert(output_reference)
                {
                    return Err(BlockchainError::ConsensusViolation(format!(
                        "Double-spend in transaction {}: output {}:{} is already spent",
                        tx_index,
                        HEXLOWER.encode(input.get_txid()),
                        input.get_vout()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Walks the whole chain checking each block's proof-of-work and its
    /// link to the next-older block.
    pub fn verify_chain(&self) -> Result<()> {
        let mut expected_hash = self.get_tip_hash()?;
        for block in self.iterator()? {
            let block = block?;
            if block.get_hash() != expected_hash.as_slice() {
                return Err(BlockchainError::ConsensusViolation(format!(
                    "Block stored under {} carries hash {}",
                    HEXLOWER.encode(&expected_hash),
                    HEXLOWER.encode(block.get_hash())
                )));
            }
            if !ProofOfWork::validate(&block) {
                return Err(BlockchainError::ConsensusViolation(format!(
                    "Block {} fails proof-of-work",
                    HEXLOWER.encode(block.get_hash())
                )));
            }
            expected_hash = block.get_pre_block_hash().to_vec();
        }
        Ok(())
    }
}

/// Lazy tip-to-genesis walk. Each block is read from the store on demand;
/// the walk ends after genesis or at the first storage error.
pub struct BlockchainIterator<'a, S: Storage> {
    store: &'a S,
    current_hash: Option<Vec<u8>>,
}

impl<'a, S: Storage> BlockchainIterator<'a, S> {
    fn new(tip_hash: Vec<u8>, store: &'a S) -> BlockchainIterator<'a, S> {
        BlockchainIterator {
            store,
            current_hash: Some(tip_hash),
        }
    }
}

impl<S: Storage> Iterator for BlockchainIterator<'_, S> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        let current_hash = self.current_hash.take()?;
        let block = match self.store.get(current_hash.as_slice()) {
            Ok(Some(bytes)) => Block::deserialize(bytes.as_slice()),
            Ok(None) => Err(BlockchainError::Database(format!(
                "Block {} is missing from the store",
                HEXLOWER.encode(&current_hash)
            ))),
            Err(e) => Err(e),
        };
        if let Ok(block) = &block {
            if !block.is_genesis() {
                self.current_hash = Some(block.get_pre_block_hash().to_vec());
            }
        }
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TXInput;
    use crate::storage::MemoryStore;
    use crate::wallet::Wallet;

    fn new_chain(owner: &Wallet) -> Blockchain<MemoryStore> {
        Blockchain::create(MemoryStore::new(), &owner.get_address()).unwrap()
    }

    fn send(
        chain: &Blockchain<MemoryStore>,
        from: &Wallet,
        to: &Wallet,
        amount: u64,
    ) -> Result<Block> {
        let tx = Transaction::new_utxo_transaction(from, &to.get_address(), amount, chain)?;
        chain.mine_block(&[tx])
    }

    fn values(outputs: &[TXOutput]) -> Vec<u64> {
        let mut values: Vec<u64> = outputs.iter().map(TXOutput::get_value).collect();
        values.sort();
        values
    }

    #[test]
    fn test_genesis_pays_subsidy() {
        let a = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let utxos = chain.find_utxo(&a.get_pub_key_hash()).unwrap();
        assert_eq!(values(&utxos), vec![10]);
        assert_eq!(chain.iterator().unwrap().count(), 1);
        chain.verify_chain().unwrap();
    }

    #[test]
    fn test_create_twice_fails() {
        let a = Wallet::new().unwrap();
        let store = MemoryStore::new();
        Blockchain::create(store.clone(), &a.get_address()).unwrap();

        assert!(matches!(
            Blockchain::create(store, &a.get_address()),
            Err(BlockchainError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_open_empty_store() {
        assert!(matches!(
            Blockchain::open(MemoryStore::new()),
            Err(BlockchainError::NotFound(_))
        ));
    }

    #[test]
    fn test_spend_everything() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        send(&chain, &a, &b, 10).unwrap();

        assert!(chain.find_utxo(&a.get_pub_key_hash()).unwrap().is_empty());
        assert_eq!(values(&chain.find_utxo(&b.get_pub_key_hash()).unwrap()), vec![10]);
        let (accumulated, outputs) = chain.find_funding(&a.get_pub_key_hash(), 1).unwrap();
        assert_eq!(accumulated, 0);
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_spend_with_change() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let block = send(&chain, &a, &b, 4).unwrap();
        assert_eq!(block.get_transactions()[0].get_vout().len(), 2);

        assert_eq!(values(&chain.find_utxo(&a.get_pub_key_hash()).unwrap()), vec![6]);
        assert_eq!(values(&chain.find_utxo(&b.get_pub_key_hash()).unwrap()), vec![4]);
        assert_eq!(chain.get_balance(&a.get_pub_key_hash()).unwrap(), 6);
    }

    #[test]
    fn test_insufficient_funds() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let result = Transaction::new_utxo_transaction(&a, &b.get_address(), 11, &chain);
        assert!(matches!(
            result,
            Err(BlockchainError::InsufficientFunds {
                required: 11,
                available: 10
            })
        ));
        assert_eq!(chain.iterator().unwrap().count(), 1);
    }

    #[test]
    fn test_find_funding_stops_early() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);
        chain
            .mine_block(&[Transaction::new_coinbase_tx(&a.get_address(), "second").unwrap()])
            .unwrap();
        chain
            .mine_block(&[Transaction::new_coinbase_tx(&a.get_address(), "third").unwrap()])
            .unwrap();

        let (accumulated, outputs) = chain.find_funding(&a.get_pub_key_hash(), 15).unwrap();
        assert_eq!(accumulated, 20);
        assert_eq!(outputs.values().map(Vec::len).sum::<usize>(), 2);

        let (accumulated, _) = chain.find_funding(&a.get_pub_key_hash(), 100).unwrap();
        assert_eq!(accumulated, 30);

        let (accumulated, outputs) = chain.find_funding(&b.get_pub_key_hash(), 1).unwrap();
        assert_eq!(accumulated, 0);
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_spent_output_never_returns() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);
        let genesis_coinbase_id = chain
            .find_spendable_transactions(&a.get_pub_key_hash())
            .unwrap()[0]
            .get_id()
            .to_vec();

        send(&chain, &a, &b, 3).unwrap();
        send(&chain, &a, &b, 2).unwrap();
        send(&chain, &b, &a, 5).unwrap();

        let spendable = chain
            .find_spendable_transactions(&a.get_pub_key_hash())
            .unwrap();
        assert!(spendable
            .iter()
            .all(|tx| tx.get_id() != genesis_coinbase_id.as_slice()));
        assert_eq!(values(&chain.find_utxo(&a.get_pub_key_hash()).unwrap()), vec![5, 5]);
        assert!(chain.find_utxo(&b.get_pub_key_hash()).unwrap().is_empty());
    }

    #[test]
    fn test_self_transfer_counts_each_output_once() {
        let a = Wallet::new().unwrap();
        let chain = new_chain(&a);

        send(&chain, &a, &a, 4).unwrap();

        assert_eq!(values(&chain.find_utxo(&a.get_pub_key_hash()).unwrap()), vec![4, 6]);
        assert_eq!(
            chain
                .find_spendable_transactions(&a.get_pub_key_hash())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_replayed_transaction_rejected() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 10, &chain).unwrap();
        chain.mine_block(&[tx.clone()]).unwrap();

        assert!(matches!(
            chain.mine_block(&[tx]),
            Err(BlockchainError::ConsensusViolation(_))
        ));
        assert_eq!(chain.get_balance(&b.get_pub_key_hash()).unwrap(), 10);
    }

    #[test]
    fn test_double_spend_within_block_rejected() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let c = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let first = Transaction::new_utxo_transaction(&a, &b.get_address(), 5, &chain).unwrap();
        let second = Transaction::new_utxo_transaction(&a, &c.get_address(), 5, &chain).unwrap();

        assert!(matches!(
            chain.mine_block(&[first, second]),
            Err(BlockchainError::ConsensusViolation(_))
        ));
        assert_eq!(chain.iterator().unwrap().count(), 1);
    }

    #[test]
    fn test_forged_signature_rejected() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);
        let tip_before = chain.get_tip_hash().unwrap();

        let mut tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 10, &chain).unwrap();
        let mut signature = tx.get_vin()[0].get_signature().to_vec();
        signature[0] ^= 0x80;
        tx.get_vin_mut()[0].set_signature(signature);

        assert!(!chain.verify_transaction(&tx).unwrap());
        assert!(matches!(
            chain.mine_block(&[tx]),
            Err(BlockchainError::InvalidSignature(_))
        ));
        assert_eq!(chain.get_tip_hash().unwrap(), tip_before);
    }

    #[test]
    fn test_transfer_without_inputs_rejected() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let minted =
            Transaction::new(vec![], vec![TXOutput::new_locked(1_000_000, &b.get_pub_key_hash())])
                .unwrap();

        assert!(matches!(
            chain.mine_block(&[minted]),
            Err(BlockchainError::ConsensusViolation(_))
        ));
        assert_eq!(chain.get_balance(&b.get_pub_key_hash()).unwrap(), 0);
        assert_eq!(chain.iterator().unwrap().count(), 1);
    }

    #[test]
    fn test_outputs_exceeding_inputs_rejected() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);

        let genesis = chain.iterator().unwrap().next().unwrap().unwrap();
        let coinbase_id = genesis.get_transactions()[0].get_id().to_vec();
        let input = TXInput::with_public_key(&coinbase_id, 0, a.get_public_key());
        let mut tx = Transaction::new(
            vec![input],
            vec![TXOutput::new_locked(11, &b.get_pub_key_hash())],
        )
        .unwrap();
        chain.sign_transaction(&mut tx, a.get_pkcs8()).unwrap();

        assert!(chain.verify_transaction(&tx).unwrap());
        assert!(matches!(
            chain.mine_block(&[tx]),
            Err(BlockchainError::ConsensusViolation(_))
        ));
        assert_eq!(chain.get_balance(&a.get_pub_key_hash()).unwrap(), 10);
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let a = Wallet::new().unwrap();
        let c = Wallet::new().unwrap();
        let chain = new_chain(&a);

        for data in [&b"first"[..], &b"second"[..]] {
            let reward = Transaction::new(
                vec![TXInput::with_public_key(&[], -1, data)],
                vec![TXOutput::new_locked(u64::MAX, &c.get_pub_key_hash())],
            )
            .unwrap();
            assert!(reward.is_coinbase());
            chain.mine_block(&[reward]).unwrap();
        }

        assert!(matches!(
            chain.get_balance(&c.get_pub_key_hash()),
            Err(BlockchainError::ConsensusViolation(_))
        ));
    }

    #[test]
    fn test_unknown_transaction() {
        let a = Wallet::new().unwrap();
        let chain = new_chain(&a);

        assert!(matches!(
            chain.find_transaction(&[0xAA; 32]),
            Err(BlockchainError::NotFound(_))
        ));
    }

    #[test]
    fn test_iterator_walks_tip_to_genesis() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);
        let second = send(&chain, &a, &b, 1).unwrap();

        let blocks: Vec<Block> = chain.iterator().unwrap().map(|b| b.unwrap()).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].get_hash(), second.get_hash());
        assert_eq!(blocks[0].get_pre_block_hash(), blocks[1].get_hash());
        assert!(blocks[1].is_genesis());
        assert_eq!(chain.get_tip_hash().unwrap(), second.get_hash());
    }

    #[test]
    fn test_missing_block_surfaces_as_error() {
        let a = Wallet::new().unwrap();
        let chain = new_chain(&a);
        chain
            .get_store()
            .put(TIP_BLOCK_HASH_KEY, &[0x42; 32])
            .unwrap();

        let mut iterator = chain.iterator().unwrap();
        assert!(matches!(
            iterator.next(),
            Some(Err(BlockchainError::Database(_)))
        ));
        assert!(iterator.next().is_none());
        assert!(chain.find_utxo(&a.get_pub_key_hash()).is_err());
    }

    #[test]
    fn test_verify_chain_detects_tampering() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let chain = new_chain(&a);
        let block = send(&chain, &a, &b, 1).unwrap();
        chain.verify_chain().unwrap();

        let tampered = block.with_nonce(block.get_nonce() + 1);
        chain
            .get_store()
            .put(block.get_hash(), &tampered.serialize().unwrap())
            .unwrap();
        assert!(matches!(
            chain.verify_chain(),
            Err(BlockchainError::ConsensusViolation(_))
        ));
    }
}
