//! Document lifecycle controller.
//!
//! Every public operation is one unit of work: the document change, the
//! journal entries it triggers, their lines, and the activity log commit or
//! roll back together. A failed accounting side effect leaves the document
//! in its previous status.

use chrono::Utc;
use rust_decimal::Decimal;
use tally_shared::LedgerConfig;
use tally_shared::types::{CompanyId, DocumentId, JournalEntryId, PaymentId, fits_money_scale};
use tracing::{info, warn};

use super::error::DocumentError;
use super::lifecycle::{
    derive_status, ensure_payable, ensure_voidable, refund_amount, status_after_refund,
};
use super::store::DocumentStore;
use super::types::{
    Document, DocumentBalance, DocumentKind, DocumentStatus, NewDocument, NewPayment, Payment,
    PaymentMethod, PaymentStatus,
};
use crate::accounts::{AccountDirectory, StandardAccount};
use crate::company::Company;
use crate::ledger::{JournalEntry, LedgerError, LedgerStore, NewLine};
use crate::posting::PostingMachine;
use crate::reversal::{ReversalEngine, ReversalPolicy};
use crate::store::{Store, UnitOfWork};
use crate::tax::TaxEngine;

/// Drives invoices, bills, and payments through their lifecycle.
#[derive(Debug, Clone)]
pub struct DocumentService<S> {
    store: S,
    machine: PostingMachine,
    tax: TaxEngine,
    reversal: ReversalEngine,
    void_prefix: String,
    refund_prefix: String,
}

impl<S: Store> DocumentService<S> {
    /// Creates a document service.
    pub fn new(store: S, config: &LedgerConfig) -> Self {
        let machine = PostingMachine::new(config.unpost_window_days);
        Self {
            store,
            machine,
            tax: TaxEngine::new(config.tax_account_fallback),
            reversal: ReversalEngine::new(machine),
            void_prefix: config.void_prefix.clone(),
            refund_prefix: config.refund_prefix.clone(),
        }
    }

    /// Creates a draft or submitted document.
    ///
    /// A submitted document gets its originating entry posted in the same
    /// unit of work; if that fails, nothing is created.
    pub async fn create_document(&self, new: NewDocument) -> Result<Document, DocumentError> {
        if new.amount <= Decimal::ZERO || !fits_money_scale(new.amount) {
            return Err(DocumentError::InvalidAmount(new.amount));
        }
        if !matches!(new.status, DocumentStatus::Draft | DocumentStatus::Submitted) {
            return Err(DocumentError::InvalidTransition {
                from: new.status,
                action: "create",
            });
        }

        let mut tx = self.store.begin().await?;
        let company = company_of(&mut tx, new.company_id).await?;

        let mut document = Document {
            id: DocumentId::new(),
            company_id: new.company_id,
            kind: new.kind,
            counterparty: new.counterparty,
            amount: new.amount,
            status: DocumentStatus::Draft,
            journal_entry_id: None,
            created_at: Utc::now(),
        };
        tx.insert_document(&document).await?;

        if new.status == DocumentStatus::Submitted {
            self.run_submission(&mut tx, &company, &mut document).await?;
        }

        tx.commit().await?;
        info!(
            document_id = %document.id,
            kind = %document.kind,
            status = %document.status,
            "Document created"
        );
        Ok(document)
    }

    /// Moves a draft document to submitted and posts its originating entry.
    pub async fn submit(&self, document_id: DocumentId) -> Result<Document, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, document_id).await?;
        if document.status != DocumentStatus::Draft {
            return Err(DocumentError::InvalidTransition {
                from: document.status,
                action: "submit",
            });
        }
        let company = company_of(&mut tx, document.company_id).await?;

        self.run_submission(&mut tx, &company, &mut document).await?;

        tx.commit().await?;
        info!(document_id = %document.id, "Document submitted");
        Ok(document)
    }

    /// Records a payment against a document.
    ///
    /// A posted payment books its cash-movement entry immediately; a pending
    /// one waits for [`Self::confirm_payment`]. The document status is
    /// recomputed either way.
    pub async fn record_payment(&self, new: NewPayment) -> Result<Payment, DocumentError> {
        if new.amount <= Decimal::ZERO || !fits_money_scale(new.amount) {
            return Err(DocumentError::InvalidAmount(new.amount));
        }

        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, new.document_id).await?;
        if let Err(e) = ensure_payable(&document) {
            warn!(document_id = %document.id, status = %document.status, "Payment rejected");
            return Err(e);
        }
        let company = company_of(&mut tx, document.company_id).await?;

        let mut payment = Payment {
            id: PaymentId::new(),
            document_id: document.id,
            company_id: document.company_id,
            amount: new.amount,
            method: new.method,
            status: new.status,
            journal_entry_id: None,
            paid_at: Utc::now(),
        };
        tx.insert_payment(&payment).await?;

        if payment.status == PaymentStatus::Posted {
            let entry = self.book_payment(&mut tx, &company, &document, &payment).await?;
            payment.journal_entry_id = Some(entry.id);
            tx.update_payment(&payment).await?;
        }
        recompute(&mut tx, &mut document).await?;

        tx.commit().await?;
        info!(
            payment_id = %payment.id,
            document_id = %document.id,
            amount = %payment.amount,
            status = %document.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Posts a pending payment and recomputes the document status.
    pub async fn confirm_payment(&self, payment_id: PaymentId) -> Result<Payment, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut payment = tx
            .find_payment(payment_id)
            .await?
            .ok_or(DocumentError::PaymentNotFound(payment_id))?;
        if payment.status == PaymentStatus::Posted {
            return Err(DocumentError::PaymentAlreadyPosted(payment_id));
        }

        let mut document = lock(&mut tx, payment.document_id).await?;
        ensure_payable(&document)?;
        let company = company_of(&mut tx, document.company_id).await?;

        if payment.journal_entry_id.is_none() {
            let entry = self.book_payment(&mut tx, &company, &document, &payment).await?;
            payment.journal_entry_id = Some(entry.id);
        }
        payment.status = PaymentStatus::Posted;
        tx.update_payment(&payment).await?;
        recompute(&mut tx, &mut document).await?;

        tx.commit().await?;
        info!(payment_id = %payment.id, document_id = %document.id, "Payment confirmed");
        Ok(payment)
    }

    /// Recomputes and persists the status of a document from its posted payments.
    pub async fn recompute_status(
        &self,
        document_id: DocumentId,
    ) -> Result<DocumentStatus, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, document_id).await?;
        recompute(&mut tx, &mut document).await?;
        tx.commit().await?;
        Ok(document.status)
    }

    /// Voids a document and fully reverses its originating entry if posted.
    pub async fn void(&self, document_id: DocumentId) -> Result<Document, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, document_id).await?;
        ensure_voidable(document.status)?;
        let company = company_of(&mut tx, document.company_id).await?;

        if let Some(entry_id) = posted_origin(&mut tx, &document).await? {
            self.reversal
                .reverse(&mut tx, entry_id, &self.void_prefix, ReversalPolicy::Full, company.owner)
                .await?;
        }
        document.status = DocumentStatus::Voided;
        tx.update_document(&document).await?;

        tx.commit().await?;
        info!(document_id = %document.id, "Document voided");
        Ok(document)
    }

    /// Refunds a paid document, fully by default.
    ///
    /// Records a negative payment, reverses the originating entry in
    /// proportion to the refunded share of the document, and moves the
    /// document to refunded or partially refunded.
    pub async fn refund(
        &self,
        document_id: DocumentId,
        amount: Option<Decimal>,
    ) -> Result<Document, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, document_id).await?;
        if document.status != DocumentStatus::Paid {
            return Err(DocumentError::InvalidTransition {
                from: document.status,
                action: "refund",
            });
        }
        let company = company_of(&mut tx, document.company_id).await?;

        let paid = tx.paid_total(document.id).await?;
        let refund = refund_amount(amount, paid)?;

        let method = tx
            .payments_of(document.id)
            .await?
            .iter()
            .rev()
            .find(|p| p.status == PaymentStatus::Posted && !p.is_refund())
            .map_or(PaymentMethod::default(), |p| p.method);
        let payment = Payment {
            id: PaymentId::new(),
            document_id: document.id,
            company_id: document.company_id,
            amount: -refund,
            method,
            status: PaymentStatus::Posted,
            journal_entry_id: None,
            paid_at: Utc::now(),
        };
        tx.insert_payment(&payment).await?;

        if let Some(entry_id) = posted_origin(&mut tx, &document).await? {
            let policy = ReversalPolicy::Proportional {
                refund_amount: refund,
                document_amount: document.amount,
            };
            let reversal = self
                .reversal
                .reverse(&mut tx, entry_id, &self.refund_prefix, policy, company.owner)
                .await?;
            payment_linked(&mut tx, payment, reversal.id).await?;
        }
        document.status = status_after_refund(paid, refund);
        tx.update_document(&document).await?;

        tx.commit().await?;
        info!(
            document_id = %document.id,
            refund = %refund,
            status = %document.status,
            "Document refunded"
        );
        Ok(document)
    }

    /// Cancels a draft document; no ledger effect.
    pub async fn cancel(&self, document_id: DocumentId) -> Result<Document, DocumentError> {
        let mut tx = self.store.begin().await?;
        let mut document = lock(&mut tx, document_id).await?;
        if document.status != DocumentStatus::Draft {
            return Err(DocumentError::InvalidTransition {
                from: document.status,
                action: "cancel",
            });
        }
        document.status = DocumentStatus::Cancelled;
        tx.update_document(&document).await?;
        tx.commit().await?;
        info!(document_id = %document.id, "Document cancelled");
        Ok(document)
    }

    /// Returns the paid total and balance due of a document.
    pub async fn balance(&self, document_id: DocumentId) -> Result<DocumentBalance, DocumentError> {
        let mut tx = self.store.begin().await?;
        let document = tx
            .find_document(document_id)
            .await?
            .ok_or(DocumentError::DocumentNotFound(document_id))?;
        let paid_amount = tx.paid_total(document_id).await?;
        tx.rollback().await?;
        Ok(DocumentBalance {
            paid_amount,
            balance_due: document.amount - paid_amount,
        })
    }

    /// Returns a document.
    pub async fn document(&self, document_id: DocumentId) -> Result<Document, DocumentError> {
        let mut tx = self.store.begin().await?;
        let document = tx
            .find_document(document_id)
            .await?
            .ok_or(DocumentError::DocumentNotFound(document_id))?;
        tx.rollback().await?;
        Ok(document)
    }

    /// Returns the payments of a document in recording order.
    pub async fn payments(&self, document_id: DocumentId) -> Result<Vec<Payment>, DocumentError> {
        let mut tx = self.store.begin().await?;
        let payments = tx.payments_of(document_id).await?;
        tx.rollback().await?;
        Ok(payments)
    }

    async fn run_submission(
        &self,
        tx: &mut S::Tx,
        company: &Company,
        document: &mut Document,
    ) -> Result<(), DocumentError> {
        if document.journal_entry_id.is_none() {
            let entry = self.originate(tx, company, document).await?;
            document.journal_entry_id = Some(entry.id);
        }
        document.status = DocumentStatus::Submitted;
        tx.update_document(document).await?;
        Ok(())
    }

    /// Builds and posts the receivable or payable entry of a document.
    async fn originate(
        &self,
        tx: &mut S::Tx,
        company: &Company,
        document: &Document,
    ) -> Result<JournalEntry, LedgerError> {
        let chart = tx.chart_for(company.entity_id).await?;
        let ledger = tx.ledger_for(company.entity_id).await?;

        let (primary, counter) = match document.kind {
            DocumentKind::Invoice => {
                (StandardAccount::Revenue, StandardAccount::AccountsReceivable)
            }
            DocumentKind::Bill => (StandardAccount::Expenses, StandardAccount::AccountsPayable),
        };
        let primary = tx.resolve_standard(chart.id, primary).await?;
        let counter = tx.resolve_standard(chart.id, counter).await?;

        let description = format!("{}: {}", document.kind.label(), document.counterparty);
        let entry = tx.create_entry(ledger.id, &description, None, Utc::now()).await?;

        let primary_line = match document.kind {
            DocumentKind::Invoice => NewLine::credit(primary.id, document.amount),
            DocumentKind::Bill => NewLine::debit(primary.id, document.amount),
        };
        tx.add_line(entry.id, primary_line).await?;

        let tax = self.tax.apply(tx, company.id, entry.id, &primary, document.amount).await?;

        let gross = document.amount + tax;
        let counter_line = match document.kind {
            DocumentKind::Invoice => NewLine::debit(counter.id, gross),
            DocumentKind::Bill => NewLine::credit(counter.id, gross),
        };
        tx.add_line(entry.id, counter_line).await?;

        self.machine.post(tx, entry.id, company.owner, false).await?;
        Ok(entry)
    }

    /// Builds and posts the cash-movement entry of a payment.
    async fn book_payment(
        &self,
        tx: &mut S::Tx,
        company: &Company,
        document: &Document,
        payment: &Payment,
    ) -> Result<JournalEntry, LedgerError> {
        let chart = tx.chart_for(company.entity_id).await?;
        let ledger = tx.ledger_for(company.entity_id).await?;

        let cash_or_bank = match payment.method {
            PaymentMethod::Cash => StandardAccount::Cash,
            PaymentMethod::Bank | PaymentMethod::Card | PaymentMethod::Other => {
                StandardAccount::Assets
            }
        };
        let cash_or_bank = tx.resolve_standard(chart.id, cash_or_bank).await?;

        let label = document.kind.label();
        let description = format!("Payment for {label} {}", document.id);
        let lines = match document.kind {
            DocumentKind::Invoice => {
                let receivable = tx
                    .resolve_standard(chart.id, StandardAccount::AccountsReceivable)
                    .await?;
                let memo = format!("Payment received for Invoice {}", document.id);
                vec![
                    NewLine::debit(cash_or_bank.id, payment.amount).with_description(memo.clone()),
                    NewLine::credit(receivable.id, payment.amount).with_description(memo),
                ]
            }
            DocumentKind::Bill => {
                let payable = tx
                    .resolve_standard(chart.id, StandardAccount::AccountsPayable)
                    .await?;
                let memo = format!("Vendor payment for Bill {}", document.id);
                vec![
                    NewLine::debit(payable.id, payment.amount).with_description(memo.clone()),
                    NewLine::credit(cash_or_bank.id, payment.amount).with_description(memo),
                ]
            }
        };

        let entry = tx.create_entry(ledger.id, &description, None, Utc::now()).await?;
        tx.add_lines(entry.id, lines).await?;
        self.machine.post(tx, entry.id, company.owner, false).await?;
        Ok(entry)
    }
}

async fn lock<T: UnitOfWork>(
    tx: &mut T,
    document_id: DocumentId,
) -> Result<Document, DocumentError> {
    tx.lock_document(document_id)
        .await?
        .ok_or(DocumentError::DocumentNotFound(document_id))
}

async fn company_of<T: UnitOfWork>(
    tx: &mut T,
    company_id: CompanyId,
) -> Result<Company, DocumentError> {
    tx.find_company(company_id)
        .await?
        .ok_or(DocumentError::Ledger(LedgerError::CompanyNotFound(company_id)))
}

/// Returns the originating entry of a document if it exists and is posted.
async fn posted_origin<T: UnitOfWork>(
    tx: &mut T,
    document: &Document,
) -> Result<Option<JournalEntryId>, DocumentError> {
    let Some(entry_id) = document.journal_entry_id else {
        return Ok(None);
    };
    let posted = tx.find_entry(entry_id).await?.is_some_and(|e| e.posted);
    Ok(posted.then_some(entry_id))
}

/// Links a refund payment to its reversal entry.
async fn payment_linked<T: UnitOfWork>(
    tx: &mut T,
    mut payment: Payment,
    entry_id: JournalEntryId,
) -> Result<(), DocumentError> {
    payment.journal_entry_id = Some(entry_id);
    tx.update_payment(&payment).await?;
    Ok(())
}

async fn recompute<T: UnitOfWork>(
    tx: &mut T,
    document: &mut Document,
) -> Result<(), DocumentError> {
    let paid = tx.paid_total(document.id).await?;
    let status = derive_status(document.status, document.amount, paid);
    if status != document.status {
        info!(
            document_id = %document.id,
            from = %document.status,
            to = %status,
            paid = %paid,
            "Document status changed"
        );
        document.status = status;
        tx.update_document(document).await?;
    }
    Ok(())
}
