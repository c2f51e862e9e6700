//! The randomized chain-simulation driver.
//!
//! Generalizes `cmd/chain_simulation/main.go`: generate a pool of long-term
//! addresses and a starting UTXO set, then repeatedly pick a random owned
//! UTXO, build a ring transaction spending it to another random address,
//! and periodically drain the mempool into a block.

use std::time::Duration;

use rand::rngs::OsRng;
use rand::Rng;
use tracing::info;

use obscura_core::config::ConfigBuilder;
use obscura_core::{Chain, KeyImageSet, LongTermKey, Mempool, Transaction, Utxo, UtxoSet};

pub struct SimulateArgs {
    pub addresses: usize,
    pub initial_utxos: usize,
    pub ring_size: usize,
    pub rounds: Option<u64>,
    pub interval_ms: u64,
}

pub async fn run(args: SimulateArgs) {
    let mut rng = OsRng;
    let config = ConfigBuilder::new().ring_size(args.ring_size).finish();

    let addresses: Vec<LongTermKey> = (0..args.addresses)
        .map(|_| LongTermKey::generate(&mut rng))
        .collect();
    info!(count = addresses.len(), "generated simulation addresses");

    let mut utxos = UtxoSet::new();
    for _ in 0..args.initial_utxos {
        let owner = &addresses[rng.gen_range(0..addresses.len())];
        let dest = LongTermKey::derive(&owner.public, &mut rng);
        let amount = 1 + rng.gen_range(0..1000);
        utxos.add(Utxo::new(amount, dest));
    }
    info!(count = args.initial_utxos, "seeded initial utxo set");

    let chain = Chain::new();
    let mut mempool = Mempool::new();
    let mut spent = KeyImageSet::new();

    let mut round: u64 = 0;
    loop {
        if let Some(limit) = args.rounds {
            if round >= limit {
                break;
            }
        }
        round += 1;
        info!(round, "simulating transaction");

        match build_random_transaction(&addresses, &utxos, config.ring_size, &mut rng) {
            Some(tx) => {
                if let Err(e) = mempool.accept(tx, &spent) {
                    info!(error = %e, "rejected random transaction");
                } else {
                    info!(pending = mempool.len(), "accepted transaction into mempool");
                }
            }
            None => info!("skipped round: no spendable utxo had enough decoys"),
        }

        if mempool.len() > 2 && rng.gen_bool(0.5) {
            let block = mempool.drain_into_block(1, round, &mut utxos, &mut spent);
            let tx_count = block.transactions.len();
            chain.append(block).expect("chain append is infallible for a freshly built block");
            info!(
                chain_len = chain.len(),
                tx_count, "drained mempool into a new block"
            );
        }

        if args.interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }

    info!(chain_len = chain.len(), "simulation finished");
}

fn build_random_transaction(
    addresses: &[LongTermKey],
    utxos: &UtxoSet,
    ring_size: usize,
    rng: &mut OsRng,
) -> Option<Transaction> {
    // Find an address that owns at least one utxo, scanning in a random
    // starting order so repeated failures don't always probe address 0 first.
    let mut order: Vec<usize> = (0..addresses.len()).collect();
    for i in (1..order.len()).rev() {
        let j = rng.gen_range(0..=i);
        order.swap(i, j);
    }

    for owner_idx in order {
        let owner = &addresses[owner_idx];
        let owned: Vec<Utxo> = utxos
            .iter()
            .filter(|u| owner.recognize(&u.destination))
            .copied()
            .collect();
        if owned.is_empty() {
            continue;
        }

        let real = owned[rng.gen_range(0..owned.len())];
        let (ring, real_index) = match utxos.select_ring(&real, ring_size, rng) {
            Ok(r) => r,
            Err(_) => continue,
        };

        let recipient_idx = loop {
            let candidate = rng.gen_range(0..addresses.len());
            if candidate != owner_idx || addresses.len() == 1 {
                break candidate;
            }
        };
        let recipient = LongTermKey::derive(&addresses[recipient_idx].public, rng);

        let x = owner.recover_spend_key(&real);
        let outputs = vec![Utxo::new(real.amount, recipient)];
        return Transaction::new_signed(ring, outputs, recipient, real_index, x, rng).ok();
    }

    None
}
