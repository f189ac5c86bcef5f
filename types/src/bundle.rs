//! Bundles and the transfer requests they are built from.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::ascii::ascii_to_trytes;
use crate::hash::Hash;
use crate::seed::SecurityLevel;
use crate::tag::Tag;
use crate::transaction::Transaction;
use crate::EncodingError;

/// Transactions that settle atomically, ordered by `current_index`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle(Vec<Transaction>);

impl Bundle {
    /// Wraps transactions, sorting them by `current_index`.
    pub fn new(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|tx| tx.current_index);
        Self(transactions)
    }

    /// Parses one tryte string per transaction, in any order.
    pub fn from_trytes<I, S>(trytes: I) -> Result<Self, EncodingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let transactions = trytes
            .into_iter()
            .map(|t| Transaction::from_trytes(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(transactions))
    }

    /// Tryte strings in index order, tail first.
    pub fn to_trytes(&self) -> Result<Vec<String>, EncodingError> {
        self.0.iter().map(Transaction::to_trytes).collect()
    }

    pub fn tail(&self) -> Option<&Transaction> {
        self.0.first()
    }

    /// The bundle hash stored on the tail transaction.
    pub fn hash(&self) -> Option<&Hash> {
        self.tail().map(|tx| &tx.bundle)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.0.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.0
    }

    pub fn transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.0
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.0
    }

    /// Sum of all transaction values. Zero for a balanced bundle.
    pub fn value_sum(&self) -> i128 {
        self.0.iter().map(|tx| tx.value as i128).sum()
    }
}

impl<'a> IntoIterator for &'a Bundle {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A requested movement of value, before it becomes transactions.
///
/// Outputs carry a non-negative value. `message` is a tryte string of any
/// length; long messages span several transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub address: Address,
    pub value: i64,
    #[serde(default)]
    pub tag: Tag,
    #[serde(default)]
    pub message: String,
}

impl Transfer {
    pub fn new(address: Address, value: i64) -> Self {
        Self {
            address,
            value,
            tag: Tag::EMPTY,
            message: String::new(),
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches plain ASCII text, encoded as two trytes per character.
    pub fn with_ascii_message(self, text: &str) -> Result<Self, EncodingError> {
        Ok(self.with_message(ascii_to_trytes(text)?))
    }
}

/// An address owned by the seed that funds a bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub address: Address,
    pub balance: u64,
    pub key_index: u64,
    pub security: SecurityLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(index: usize, value: i64) -> Transaction {
        Transaction {
            value,
            current_index: index,
            last_index: 2,
            ..Transaction::default()
        }
    }

    #[test]
    fn orders_by_index() {
        let bundle = Bundle::new(vec![tx(2, 0), tx(0, 5), tx(1, -5)]);
        let indices: Vec<_> = bundle.iter().map(|t| t.current_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(bundle.tail().unwrap().value, 5);
        assert_eq!(bundle.value_sum(), 0);
    }

    #[test]
    fn trytes_round_trip_preserves_order() {
        let bundle = Bundle::new(vec![tx(0, 5), tx(1, -5), tx(2, 0)]);
        let mut trytes = bundle.to_trytes().unwrap();
        trytes.reverse();
        assert_eq!(Bundle::from_trytes(&trytes).unwrap(), bundle);
    }

    #[test]
    fn transfer_builder() {
        let transfer = Transfer::new(Address::default(), 7)
            .with_tag("PAY".parse().unwrap())
            .with_message("HELLO");
        assert_eq!(transfer.value, 7);
        assert!(transfer.tag.to_string().starts_with("PAY9"));
        assert_eq!(transfer.message, "HELLO");
    }

    #[test]
    fn ascii_message_is_encoded() {
        let transfer = Transfer::new(Address::default(), 0)
            .with_ascii_message("Hi")
            .unwrap();
        assert_eq!(transfer.message, "RBXC");
        assert!(Transfer::new(Address::default(), 0)
            .with_ascii_message("café")
            .is_err());
    }
}
