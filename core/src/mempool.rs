//! The mempool: accepted-but-unconfirmed transactions awaiting inclusion in
//! a block.
//!
//! This generalizes the chain-simulation driver's inlined bookkeeping
//! (`cmd/chain_simulation/main.go` builds and mines a block straight out of
//! a loop body) into a reusable component the CLI's `simulate` subcommand
//! and the network node's transaction handler both drive the same way.

use crate::chain::Block;
use crate::error::Result;
use crate::ledger::KeyImageSet;
use crate::transaction::Transaction;
use crate::utxo_set::UtxoSet;

/// An ordered pool of transactions that have passed validity checks but not
/// yet been committed into a block.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    pending: Vec<Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Mempool::default()
    }

    /// Validates `tx` against `spent` and pushes it if valid. Does not
    /// itself mutate `spent` or the UTXO set — that happens atomically when
    /// a block built from the mempool is committed, so a transaction sitting
    /// in the mempool can still be displaced by a conflicting one until
    /// then.
    pub fn accept(&mut self, tx: Transaction, spent: &KeyImageSet) -> Result<()> {
        tx.check_validity(spent)?;
        self.pending.push(tx);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.pending.iter()
    }

    /// Empties the mempool into a freshly built block, and applies its
    /// transactions to `utxos`/`spent`: each input's content-hash is
    /// removed, each output is inserted, and each key image recorded.
    pub fn drain_into_block(
        &mut self,
        version: u8,
        time: u64,
        utxos: &mut UtxoSet,
        spent: &mut KeyImageSet,
    ) -> Block {
        let drained: Vec<Transaction> = self.pending.drain(..).collect();

        for tx in &drained {
            for input in &tx.inputs {
                utxos.remove(input);
            }
            for output in &tx.outputs {
                utxos.add(*output);
            }
            spent.insert(tx.signature.image);
        }

        Block::new(version, drained, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::LongTermKey;
    use crate::curve::Scalar;
    use crate::utxo::Utxo;
    use rand::rngs::OsRng;

    fn ring_of(n: usize, real_index: usize, amount: u64) -> (Vec<Utxo>, Scalar) {
        let mut ring = Vec::with_capacity(n);
        let mut real_x = Scalar::zero();
        for i in 0..n {
            let owner = LongTermKey::generate(&mut OsRng);
            let dest = LongTermKey::derive(&owner.public, &mut OsRng);
            if i == real_index {
                real_x = owner.recover_spend_key(&dest);
            }
            ring.push(Utxo::new(amount, dest));
        }
        (ring, real_x)
    }

    #[test]
    fn accept_then_drain_updates_utxo_set_and_key_images() {
        let (inputs, x) = ring_of(4, 1, 100);
        let mut utxos = UtxoSet::new();
        for u in &inputs {
            utxos.add(*u);
        }
        let mut spent = KeyImageSet::new();

        let recipient_owner = LongTermKey::generate(&mut OsRng);
        let recipient = LongTermKey::derive(&recipient_owner.public, &mut OsRng);
        let outputs = vec![Utxo::new(100, recipient)];
        let tx = Transaction::new_signed(inputs.clone(), outputs.clone(), recipient, 1, x, &mut OsRng)
            .unwrap();

        let mut mempool = Mempool::new();
        mempool.accept(tx, &spent).unwrap();
        assert_eq!(mempool.len(), 1);

        let block = mempool.drain_into_block(1, 100, &mut utxos, &mut spent);
        assert_eq!(block.transactions.len(), 1);
        assert!(mempool.is_empty());
        assert!(!utxos.contains(&inputs[1]));
        assert!(utxos.contains(&outputs[0]));
        assert_eq!(spent.len(), 1);
    }
}
