//! Ledger integration tests
//!
//! Runs the ledger end to end on a sled database in a temporary directory:
//! genesis, transfers, balance queries, persistence across reopen.

use ledger_chain::core::{Block, Blockchain, ProofOfWork, Transaction};
use ledger_chain::error::BlockchainError;
use ledger_chain::storage::{SledStore, Storage, TIP_BLOCK_HASH_KEY};
use ledger_chain::wallet::{Wallet, Wallets};
use tempfile::tempdir;

fn balance(blockchain: &Blockchain, wallet: &Wallet) -> u64 {
    blockchain.get_balance(&wallet.get_pub_key_hash()).unwrap()
}

#[test]
fn test_genesis_block_on_disk() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");
    let owner = Wallet::new().unwrap();

    let blockchain =
        Blockchain::create_blockchain_with_path(&owner.get_address(), &db_path).unwrap();

    let blocks: Vec<Block> = blockchain.iterator().unwrap().map(|b| b.unwrap()).collect();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_genesis());
    assert!(blocks[0].get_transactions()[0].is_coinbase());
    assert!(ProofOfWork::validate(&blocks[0]));
    assert_eq!(balance(&blockchain, &owner), 10);
}

#[test]
fn test_send_all_funds() {
    let temp_dir = tempdir().unwrap();
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap();
    let blockchain =
        Blockchain::create_blockchain_with_path(&a.get_address(), temp_dir.path().join("chain"))
            .unwrap();

    let tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 10, &blockchain).unwrap();
    assert_eq!(tx.get_vout().len(), 1);
    blockchain.mine_block(&[tx]).unwrap();

    assert!(blockchain
        .find_utxo(&a.get_pub_key_hash())
        .unwrap()
        .is_empty());
    let b_utxos = blockchain.find_utxo(&b.get_pub_key_hash()).unwrap();
    assert_eq!(b_utxos.len(), 1);
    assert_eq!(b_utxos[0].get_value(), 10);

    let (accumulated, _) = blockchain.find_funding(&a.get_pub_key_hash(), 1).unwrap();
    assert_eq!(accumulated, 0);
}

#[test]
fn test_send_with_change() {
    let temp_dir = tempdir().unwrap();
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap();
    let blockchain =
        Blockchain::create_blockchain_with_path(&a.get_address(), temp_dir.path().join("chain"))
            .unwrap();

    let tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 4, &blockchain).unwrap();
    blockchain.mine_block(&[tx]).unwrap();

    let a_utxos = blockchain.find_utxo(&a.get_pub_key_hash()).unwrap();
    let b_utxos = blockchain.find_utxo(&b.get_pub_key_hash()).unwrap();
    assert_eq!(a_utxos.len(), 1);
    assert_eq!(a_utxos[0].get_value(), 6);
    assert_eq!(b_utxos.len(), 1);
    assert_eq!(b_utxos[0].get_value(), 4);
    blockchain.verify_chain().unwrap();
}

#[test]
fn test_chain_survives_reopen() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap();

    let tip = {
        let blockchain = Blockchain::create_blockchain_with_path(&a.get_address(), &db_path)
            .unwrap();
        let tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 7, &blockchain).unwrap();
        blockchain.mine_block(&[tx]).unwrap().get_hash().to_vec()
    };

    let blockchain = Blockchain::new_blockchain_with_path(&db_path).unwrap();
    assert_eq!(blockchain.get_tip_hash().unwrap(), tip);
    assert_eq!(
        blockchain.get_store().get(TIP_BLOCK_HASH_KEY).unwrap(),
        Some(tip)
    );
    assert_eq!(balance(&blockchain, &a), 3);
    assert_eq!(balance(&blockchain, &b), 7);
    blockchain.verify_chain().unwrap();
}

#[test]
fn test_existing_chain_not_overwritten() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap();

    let store = SledStore::open(&db_path).unwrap();
    let blockchain = Blockchain::create(store.clone(), &a.get_address()).unwrap();
    let tip = blockchain.get_tip_hash().unwrap();

    assert!(matches!(
        Blockchain::create(store, &b.get_address()),
        Err(BlockchainError::AlreadyExists(_))
    ));
    assert_eq!(blockchain.get_tip_hash().unwrap(), tip);
    assert_eq!(balance(&blockchain, &b), 0);
}

#[test]
fn test_open_without_chain() {
    let temp_dir = tempdir().unwrap();
    let result = Blockchain::new_blockchain_with_path(temp_dir.path().join("absent"));
    assert!(matches!(result, Err(BlockchainError::NotFound(_))));
}

#[test]
fn test_payment_round_trip_between_wallet_file_entries() {
    let temp_dir = tempdir().unwrap();
    let mut wallets = Wallets::load_from(temp_dir.path().join("wallet.dat")).unwrap();
    let alice = wallets.create_wallet().unwrap();
    let bob = wallets.create_wallet().unwrap();

    let blockchain =
        Blockchain::create_blockchain_with_path(&alice, temp_dir.path().join("chain")).unwrap();

    let alice_wallet = wallets.require_wallet(&alice).unwrap();
    let bob_wallet = wallets.require_wallet(&bob).unwrap();

    let tx = Transaction::new_utxo_transaction(alice_wallet, &bob, 6, &blockchain).unwrap();
    assert!(blockchain.verify_transaction(&tx).unwrap());
    blockchain.mine_block(&[tx]).unwrap();

    let tx = Transaction::new_utxo_transaction(bob_wallet, &alice, 5, &blockchain).unwrap();
    blockchain.mine_block(&[tx]).unwrap();

    assert_eq!(balance(&blockchain, alice_wallet), 9);
    assert_eq!(balance(&blockchain, bob_wallet), 1);

    let result = Transaction::new_utxo_transaction(bob_wallet, &alice, 2, &blockchain);
    assert!(matches!(
        result,
        Err(BlockchainError::InsufficientFunds {
            required: 2,
            available: 1
        })
    ));
}

#[test]
fn test_block_record_round_trip_from_store() {
    let temp_dir = tempdir().unwrap();
    let a = Wallet::new().unwrap();
    let b = Wallet::new().unwrap();
    let blockchain =
        Blockchain::create_blockchain_with_path(&a.get_address(), temp_dir.path().join("chain"))
            .unwrap();

    let tx = Transaction::new_utxo_transaction(&a, &b.get_address(), 2, &blockchain).unwrap();
    let mined = blockchain.mine_block(&[tx]).unwrap();

    let stored = blockchain.get_block(mined.get_hash()).unwrap().unwrap();
    assert_eq!(stored, mined);
    let raw = blockchain.get_store().get(mined.get_hash()).unwrap().unwrap();
    assert_eq!(raw, mined.serialize().unwrap());
}
