//! Ledger store port.
//!
//! Owns journal entries and their transaction lines and enforces one ledger
//! per accounting entity. Adapters implement the required methods; the
//! provided methods carry the validation every adapter shares.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tally_shared::types::{EntityId, JournalEntryId, LedgerId, TransactionLineId, fits_money_scale};

use super::error::LedgerError;
use super::types::{JournalEntry, Ledger, NewLine, TransactionLine};
use crate::store::StoreError;

/// Journal persistence port.
#[async_trait]
pub trait LedgerStore: Send {
    /// Finds the ledger of an entity.
    async fn find_ledger_by_entity(
        &mut self,
        entity_id: EntityId,
    ) -> Result<Option<Ledger>, StoreError>;

    /// Inserts a ledger; a second ledger for the same entity is a `UniqueViolation`.
    async fn insert_ledger(&mut self, ledger: &Ledger) -> Result<(), StoreError>;

    /// Finds an entry without locking it.
    async fn find_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError>;

    /// Finds an entry and holds its row lock until the unit of work ends.
    async fn lock_entry(&mut self, id: JournalEntryId) -> Result<Option<JournalEntry>, StoreError>;

    /// Inserts an entry.
    async fn insert_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Persists the state flags (and timestamp) of an existing entry.
    async fn update_entry(&mut self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Inserts a line.
    async fn insert_line(&mut self, line: &TransactionLine) -> Result<(), StoreError>;

    /// Returns the entries whose `reversal_of` points at `entry_id`, oldest first.
    async fn find_reversals(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Returns the lines of an entry ordered by position.
    async fn lines_of(
        &mut self,
        entry_id: JournalEntryId,
    ) -> Result<Vec<TransactionLine>, StoreError>;

    /// Returns the ledger of an entity.
    async fn ledger_for(&mut self, entity_id: EntityId) -> Result<Ledger, LedgerError> {
        self.find_ledger_by_entity(entity_id)
            .await?
            .ok_or(LedgerError::LedgerNotFound(entity_id))
    }

    /// Opens the single ledger of an entity.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateLedger` if the entity already owns one.
    async fn open_ledger(
        &mut self,
        entity_id: EntityId,
        name: &str,
    ) -> Result<Ledger, LedgerError> {
        if self.find_ledger_by_entity(entity_id).await?.is_some() {
            return Err(LedgerError::DuplicateLedger(entity_id));
        }

        let ledger = Ledger::new(entity_id, name);
        match self.insert_ledger(&ledger).await {
            Ok(()) => Ok(ledger),
            Err(StoreError::UniqueViolation(_)) => Err(LedgerError::DuplicateLedger(entity_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates an unposted, unlocked entry.
    ///
    /// A reversal link must point to a different, already posted entry that
    /// is not newer than the reversal itself.
    async fn create_entry(
        &mut self,
        ledger_id: LedgerId,
        description: &str,
        reversal_of: Option<JournalEntryId>,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = JournalEntry::new(ledger_id, description, now);

        if let Some(target) = reversal_of {
            let original = self
                .find_entry(target)
                .await?
                .ok_or(LedgerError::InvalidReversalLink {
                    target,
                    reason: "entry does not exist",
                })?;
            if !original.posted {
                return Err(LedgerError::InvalidReversalLink {
                    target,
                    reason: "entry is not posted",
                });
            }
            if original.timestamp > now {
                return Err(LedgerError::InvalidReversalLink {
                    target,
                    reason: "entry is newer than its reversal",
                });
            }
            entry = entry.reversing(target);
        }

        self.insert_entry(&entry).await?;
        Ok(entry)
    }

    /// Appends a line to an unlocked entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the amount is not positive or has more
    /// than two decimal places, and `EntryLocked` if the entry is posted.
    /// The entry's row lock is held until the unit of work ends, so a
    /// concurrent post cannot lock the entry between the check and the insert.
    async fn add_line(
        &mut self,
        entry_id: JournalEntryId,
        line: NewLine,
    ) -> Result<TransactionLine, LedgerError> {
        if line.amount <= Decimal::ZERO || !fits_money_scale(line.amount) {
            return Err(LedgerError::InvalidAmount(line.amount));
        }

        let entry = self
            .lock_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        if entry.locked {
            return Err(LedgerError::EntryLocked(entry_id));
        }

        let position = i32::try_from(self.lines_of(entry_id).await?.len())
            .map_err(|_| StoreError::Corrupt(format!("entry {entry_id} has too many lines")))?;

        let line = TransactionLine {
            id: TransactionLineId::new(),
            journal_entry_id: entry_id,
            account_id: line.account_id,
            amount: line.amount,
            tx_type: line.tx_type,
            description: line.description,
            position,
        };
        self.insert_line(&line).await?;
        Ok(line)
    }

    /// Appends several lines in order.
    async fn add_lines(
        &mut self,
        entry_id: JournalEntryId,
        lines: Vec<NewLine>,
    ) -> Result<Vec<TransactionLine>, LedgerError> {
        let mut added = Vec::with_capacity(lines.len());
        for line in lines {
            added.push(self.add_line(entry_id, line).await?);
        }
        Ok(added)
    }
}
