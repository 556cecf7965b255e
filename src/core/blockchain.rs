//! Blockchain implementation
//!
//! The ledger's block store and pending transaction pool.

use crate::core::block::Block;
use crate::core::transaction::Transaction;
use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("Chain has no blocks")]
    EmptyChain,
    #[error("Missing values: {0}")]
    MissingFields(String),
}

/// The canonical chain plus the transactions waiting to be sealed
#[derive(Debug, Clone)]
pub struct Blockchain {
    /// The chain of blocks, genesis first
    blocks: Vec<Block>,
    /// Transactions not yet sealed into a block
    pending: Vec<Transaction>,
}

impl Blockchain {
    /// Create a new blockchain holding only the genesis block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Get the latest block
    pub fn last_block(&self) -> Result<&Block, BlockchainError> {
        self.blocks.last().ok_or(BlockchainError::EmptyChain)
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// `previous_hash` defaults to the digest of the current last block.
    /// The pool is drained whatever its size.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.blocks.last().map(Block::digest).unwrap_or_default(),
        };

        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.blocks.len() as u64 + 1, transactions, proof, previous_hash);

        log::debug!(
            "Sealed block {} with {} transaction(s)",
            block.index,
            block.tx_count()
        );

        self.blocks.push(block);
        &self.blocks[self.blocks.len() - 1]
    }

    /// Queue a transaction for the next block.
    ///
    /// Returns the index of the block expected to contain it. This is only a
    /// prediction: a chain replacement before the next seal can change it.
    pub fn new_transaction(&mut self, transaction: Transaction) -> Result<u64, BlockchainError> {
        let next_index = self.last_block()?.index + 1;
        self.pending.push(transaction);
        Ok(next_index)
    }

    /// Replace the whole chain (consensus adoption). The pending pool is kept.
    ///
    /// An empty replacement is refused and leaves the chain untouched.
    pub fn replace_chain(&mut self, blocks: Vec<Block>) -> Result<(), BlockchainError> {
        if blocks.is_empty() {
            return Err(BlockchainError::EmptyChain);
        }
        self.blocks = blocks;
        Ok(())
    }

    /// All blocks, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Transactions waiting to be sealed
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blockchain() {
        let blockchain = Blockchain::new();
        assert_eq!(blockchain.len(), 1);

        let genesis = blockchain.last_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "1");
        assert_eq!(genesis.proof, 100);
    }

    #[test]
    fn test_new_transaction_predicts_next_index() {
        let mut blockchain = Blockchain::new();
        let index = blockchain
            .new_transaction(Transaction::new("0", "abc123", 1))
            .unwrap();

        assert_eq!(index, 2);
        assert_eq!(blockchain.pending().len(), 1);
    }

    #[test]
    fn test_new_block_links_and_drains_pool() {
        let mut blockchain = Blockchain::new();
        let genesis_digest = blockchain.last_block().unwrap().digest();

        blockchain
            .new_transaction(Transaction::new("alice", "bob", 3))
            .unwrap();
        blockchain
            .new_transaction(Transaction::new("bob", "carol", 1))
            .unwrap();

        let block = blockchain.new_block(12_345, None).clone();

        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 12_345);
        assert_eq!(block.previous_hash, genesis_digest);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.transactions[0].sender, "alice");
        assert_eq!(block.transactions[1].sender, "bob");
        assert!(blockchain.pending().is_empty());
        assert_eq!(blockchain.len(), 2);
    }

    #[test]
    fn test_new_block_with_explicit_previous_hash() {
        let mut blockchain = Blockchain::new();
        let block = blockchain.new_block(7, Some("feed".to_string()));
        assert_eq!(block.previous_hash, "feed");
    }

    #[test]
    fn test_replace_with_empty_chain_is_refused() {
        let mut blockchain = Blockchain::new();
        let genesis = blockchain.last_block().unwrap().clone();

        assert_eq!(
            blockchain.replace_chain(Vec::new()),
            Err(BlockchainError::EmptyChain)
        );
        assert_eq!(blockchain.blocks(), [genesis]);
    }

    #[test]
    fn test_empty_chain_has_no_last_block() {
        let mut blockchain = Blockchain {
            blocks: Vec::new(),
            pending: Vec::new(),
        };

        assert!(blockchain.is_empty());
        assert_eq!(blockchain.last_block(), Err(BlockchainError::EmptyChain));
        assert_eq!(
            blockchain.new_transaction(Transaction::new("a", "b", 1)),
            Err(BlockchainError::EmptyChain)
        );
    }

    #[test]
    fn test_replace_chain_keeps_pool() {
        let mut blockchain = Blockchain::new();
        blockchain
            .new_transaction(Transaction::new("alice", "bob", 3))
            .unwrap();

        let mut other = Blockchain::new();
        other.new_block(1, None);
        other.new_block(2, None);

        blockchain.replace_chain(other.blocks().to_vec()).unwrap();
        assert_eq!(blockchain.len(), 3);
        assert_eq!(blockchain.pending().len(), 1);
        assert_eq!(blockchain.new_transaction(Transaction::new("a", "b", 1)), Ok(4));
    }
}
