//! Local transaction record-keeping and daily spending limits.
//!
//! Peripheral to the cryptographic core: plain value records keyed to one
//! user, with a derived daily-spend aggregate for the cross-border class.
//! Time is passed explicitly as unix seconds so the rolling window is
//! testable without a clock abstraction.

mod limits;
mod records;

pub use limits::{DailyLimits, SpendDecision, DEFAULT_CROSS_BORDER_LIMIT, SECONDS_PER_DAY};
pub use records::{
    PrivacyReceipt, ProofType, TransactionClass, TransactionRecord, TransactionStatus,
};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Records kept per user before the oldest is dropped.
const MAX_HISTORY: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown transaction {0}")]
    UnknownTransaction(String),
}

/// Aggregate view over the trailing 24 hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_transactions: usize,
    pub confirmed_transactions: usize,
    pub failed_transactions: usize,
    pub total_spent: u64,
    pub domestic_count: usize,
    pub cross_border_count: usize,
}

/// Append-only transaction store for one user session.
#[derive(Debug, Clone)]
pub struct TransactionLedger {
    user: String,
    records: Vec<TransactionRecord>,
    limits: DailyLimits,
    next_seq: u64,
}

impl TransactionLedger {
    pub fn new(user: impl Into<String>) -> Self {
        Self::with_start(user, 0)
    }

    /// Create a ledger whose limit window starts at `now`.
    pub fn with_start(user: impl Into<String>, now: i64) -> Self {
        Self {
            user: user.into(),
            records: Vec::new(),
            limits: DailyLimits::new(now),
            next_seq: 0,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Record a new transaction, returning its assigned id.
    ///
    /// A record that arrives already confirmed counts against the daily
    /// limits immediately.
    #[allow(clippy::too_many_arguments)]
    pub fn record_transaction(
        &mut self,
        signature: impl Into<String>,
        amount: u64,
        recipient: impl Into<String>,
        class: TransactionClass,
        status: TransactionStatus,
        error_message: Option<String>,
        now: i64,
    ) -> String {
        let id = format!("{}-{}", self.user, self.next_seq);
        self.next_seq += 1;

        let record = TransactionRecord {
            id: id.clone(),
            signature: signature.into(),
            amount,
            recipient: recipient.into(),
            class,
            status,
            timestamp: now,
            error_message,
            receipt: None,
        };

        if status == TransactionStatus::Confirmed && class == TransactionClass::CrossBorder {
            self.limits.roll(now);
            self.limits.add_cross_border(amount);
        } else if status == TransactionStatus::Confirmed {
            self.limits.add_domestic();
        }

        self.records.push(record);
        if self.records.len() > MAX_HISTORY {
            self.records.remove(0);
        }

        debug!(id = %id, amount, "transaction recorded");
        id
    }

    /// Update a transaction's status by id.
    pub fn update_status(
        &mut self,
        id: &str,
        status: TransactionStatus,
        error_message: Option<String>,
        now: i64,
    ) -> Result<(), LedgerError> {
        let position = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| LedgerError::UnknownTransaction(id.to_string()))?;
        self.apply_status(position, status, error_message, now);
        Ok(())
    }

    /// Update a transaction's status by on-chain signature; fallback when
    /// the local id is unknown to the caller.
    pub fn update_status_by_signature(
        &mut self,
        signature: &str,
        status: TransactionStatus,
        error_message: Option<String>,
        now: i64,
    ) -> Result<(), LedgerError> {
        let position = self
            .records
            .iter()
            .position(|r| r.signature == signature)
            .ok_or_else(|| LedgerError::UnknownTransaction(signature.to_string()))?;
        self.apply_status(position, status, error_message, now);
        Ok(())
    }

    fn apply_status(
        &mut self,
        position: usize,
        status: TransactionStatus,
        error_message: Option<String>,
        now: i64,
    ) {
        let record = &mut self.records[position];
        let was_confirmed = record.status == TransactionStatus::Confirmed;
        record.status = status;
        if error_message.is_some() {
            record.error_message = error_message;
        }

        // Count against the limits only on the transition into confirmed.
        if status == TransactionStatus::Confirmed && !was_confirmed {
            let (amount, class) = (record.amount, record.class);
            if class == TransactionClass::CrossBorder {
                self.limits.roll(now);
                self.limits.add_cross_border(amount);
            } else {
                self.limits.add_domestic();
            }
        }
    }

    /// Attach a privacy receipt to an existing record.
    pub fn attach_receipt(
        &mut self,
        id: &str,
        receipt: PrivacyReceipt,
    ) -> Result<(), LedgerError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::UnknownTransaction(id.to_string()))?;
        record.receipt = Some(receipt);
        Ok(())
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Records filtered by class and status, newest first.
    pub fn filtered(
        &self,
        class: Option<TransactionClass>,
        status: Option<TransactionStatus>,
    ) -> Vec<&TransactionRecord> {
        let mut matches: Vec<&TransactionRecord> = self
            .records
            .iter()
            .filter(|r| class.map_or(true, |c| r.class == c))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect();
        matches.sort_by_key(|r| std::cmp::Reverse(r.timestamp));
        matches
    }

    /// Check whether a cross-border amount is allowed right now.
    pub fn can_spend(&mut self, amount: u64, now: i64) -> SpendDecision {
        self.limits.roll(now);
        self.limits.can_spend(amount)
    }

    /// Current limits after applying the rolling reset.
    pub fn daily_limits(&mut self, now: i64) -> &DailyLimits {
        self.limits.roll(now);
        &self.limits
    }

    /// Remaining cross-border budget for the current window.
    pub fn remaining_cross_border_budget(&mut self, now: i64) -> u64 {
        self.limits.roll(now);
        self.limits.remaining()
    }

    /// Aggregates over the trailing 24 hours.
    pub fn today_stats(&self, now: i64) -> TodayStats {
        let today: Vec<&TransactionRecord> = self
            .records
            .iter()
            .filter(|r| now - r.timestamp < SECONDS_PER_DAY)
            .collect();

        TodayStats {
            total_transactions: today.len(),
            confirmed_transactions: today
                .iter()
                .filter(|r| r.status == TransactionStatus::Confirmed)
                .count(),
            failed_transactions: today
                .iter()
                .filter(|r| r.status == TransactionStatus::Failed)
                .count(),
            total_spent: today
                .iter()
                .filter(|r| r.status == TransactionStatus::Confirmed)
                .map(|r| r.amount)
                .sum(),
            domestic_count: today
                .iter()
                .filter(|r| r.class == TransactionClass::Domestic)
                .count(),
            cross_border_count: today
                .iter()
                .filter(|r| r.class == TransactionClass::CrossBorder)
                .count(),
        }
    }

    /// Export the full ledger as JSON for inspection or backup.
    pub fn export_json(&mut self, now: i64) -> serde_json::Result<String> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Export<'a> {
            user: &'a str,
            transactions: &'a [TransactionRecord],
            limits: &'a DailyLimits,
            exported_at: i64,
        }

        self.limits.roll(now);
        serde_json::to_string_pretty(&Export {
            user: &self.user,
            transactions: &self.records,
            limits: &self.limits,
            exported_at: now,
        })
    }
}
