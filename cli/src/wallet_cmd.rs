//! `obscura wallet` subcommands: address-book-only key management against a
//! wallet file on disk. There is no RPC client to a running node, so balance
//! queries operate on a UTXO set snapshot passed in by the caller rather than
//! over the wire.

use std::path::PathBuf;

use clap::Subcommand;
use obscura_wallet::Wallet;
use tracing::info;

#[derive(Subcommand)]
pub enum WalletCommand {
    /// Generate a new wallet file.
    New {
        #[arg(long)]
        path: PathBuf,
    },
    /// Print a wallet's own address.
    Address {
        #[arg(long)]
        path: PathBuf,
    },
    /// Add a contact to a wallet's address book.
    AddContact {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    /// List a wallet's known contacts.
    Contacts {
        #[arg(long)]
        path: PathBuf,
    },
}

pub fn run(cmd: WalletCommand) {
    match cmd {
        WalletCommand::New { path } => {
            let wallet = Wallet::generate();
            wallet.save(&path).expect("failed to write wallet file");
            info!(path = %path.display(), address = %wallet.address(), "created wallet");
        }
        WalletCommand::Address { path } => {
            let wallet = Wallet::load(&path).expect("failed to load wallet file");
            println!("{}", wallet.address());
        }
        WalletCommand::AddContact { path, name, address } => {
            let mut wallet = Wallet::load(&path).expect("failed to load wallet file");
            wallet
                .add_contact(&name, &address)
                .expect("address is not a valid obscura address");
            wallet.save(&path).expect("failed to write wallet file");
            info!(name, "added contact");
        }
        WalletCommand::Contacts { path } => {
            let wallet = Wallet::load(&path).expect("failed to load wallet file");
            for (name, public) in wallet.contacts() {
                println!("{name}: {}", public.to_human_readable(false));
            }
        }
    }
}
