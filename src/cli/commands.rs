use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ledger-chain")]
pub struct Opt {
    #[arg(long = "data-dir", global = true, help = "Directory of the block database")]
    pub data_dir: Option<String>,
    #[arg(long = "wallet-file", global = true, help = "Path of the wallet file")]
    pub wallet_file: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "createblockchain",
        visible_alias = "cb",
        about = "Create a blockchain and send the genesis reward to ADDRESS"
    )]
    Createblockchain {
        #[arg(help = "The address to send genesis block reward to")]
        address: String,
    },
    #[command(
        name = "createwallet",
        visible_alias = "cw",
        about = "Generate a new key pair and save it into the wallet file"
    )]
    Createwallet,
    #[command(
        name = "getbalance",
        visible_alias = "g",
        about = "Get the balance of ADDRESS"
    )]
    GetBalance {
        #[arg(help = "The wallet address")]
        address: String,
    },
    #[command(
        name = "listaddresses",
        visible_alias = "l",
        about = "List all addresses from the wallet file"
    )]
    ListAddresses,
    #[command(
        name = "printchain",
        visible_alias = "p",
        about = "Print all the blocks of the blockchain"
    )]
    Printchain,
    #[command(
        name = "send",
        visible_alias = "s",
        about = "Send AMOUNT of coins from FROM address to TO"
    )]
    Send {
        #[arg(help = "Source wallet address")]
        from: String,
        #[arg(help = "Destination wallet address")]
        to: String,
        #[arg(help = "Amount to send", value_parser = clap::value_parser!(u64).range(1..))]
        amount: u64,
    },
}
