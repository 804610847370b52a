// Entry point for the ledger CLI
use clap::Parser;
use data_encoding::HEXLOWER;
use ledger_chain::{
    address_to_pub_key_hash, validate_address, Blockchain, BlockchainError, Command, Opt,
    ProofOfWork, Result, Transaction, Wallets, GLOBAL_CONFIG,
};
use log::{error, LevelFilter};
use std::process;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();
    if let Some(data_dir) = opt.data_dir {
        GLOBAL_CONFIG.set_data_dir(data_dir);
    }
    if let Some(wallet_file) = opt.wallet_file {
        GLOBAL_CONFIG.set_wallet_file(wallet_file);
    }

    // Recoverable failures are the user's to fix; everything else is logged
    if let Err(e) = run_command(opt.command) {
        if e.is_recoverable() {
            eprintln!("{e}");
        } else {
            error!("Error: {e}");
        }
        process::exit(1);
    }
}

fn require_valid_address(address: &str) -> Result<()> {
    if !validate_address(address) {
        return Err(BlockchainError::InvalidAddress(address.to_string()));
    }
    Ok(())
}

fn run_command(command: Command) -> Result<()> {
    match command {
        Command::Createblockchain { address } => {
            require_valid_address(&address)?;
            Blockchain::create_blockchain(&address)?;
            println!("Done!");
        }
        Command::Createwallet => {
            let mut wallets = Wallets::new()?;
            let address = wallets.create_wallet()?;
            println!("Your new address: {address}")
        }
        Command::GetBalance { address } => {
            require_valid_address(&address)?;
            let pub_key_hash = address_to_pub_key_hash(&address)?;

            let blockchain = Blockchain::new_blockchain()?;
            let balance = blockchain.get_balance(&pub_key_hash)?;
            println!("Balance of '{address}': {balance}");
        }
        Command::ListAddresses => {
            let wallets = Wallets::new()?;
            for address in wallets.get_addresses() {
                println!("{address}")
            }
        }
        Command::Printchain => {
            let blockchain = Blockchain::new_blockchain()?;
            for block in blockchain.iterator()? {
                let block = block?;
                println!(
                    "============ Block {} ============",
                    HEXLOWER.encode(block.get_hash())
                );
                println!(
                    "Previous block: {}",
                    HEXLOWER.encode(block.get_pre_block_hash())
                );
                println!("PoW: {}\n", ProofOfWork::validate(&block));
                for tx in block.get_transactions() {
                    println!("{tx}");
                }
                println!("\n");
            }
        }
        Command::Send { from, to, amount } => {
            require_valid_address(&from)?;
            require_valid_address(&to)?;

            let wallets = Wallets::new()?;
            let wallet = wallets.require_wallet(&from)?;

            let blockchain = Blockchain::new_blockchain()?;
            let transaction = Transaction::new_utxo_transaction(wallet, &to, amount, &blockchain)?;
            blockchain.mine_block(&[transaction])?;
            println!("Success!")
        }
    }
    Ok(())
}
