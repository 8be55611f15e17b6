//! Lifecycle scenarios for invoices and bills against the in-memory store.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_shared::types::{JournalEntryId, UserId};
use tally_shared::{LedgerConfig, TaxAccountFallback};

use super::error::DocumentError;
use super::service::DocumentService;
use super::types::{DocumentStatus, NewDocument, NewPayment, PaymentMethod, PaymentStatus};
use crate::accounts::{AccountDirectory, ChartService, ProvisionedCompany, StandardAccount};
use crate::audit::{ActivityAction, ActivityLog, ActivityLogEntry};
use crate::ledger::{EntryTotals, JournalEntry, LedgerError, LedgerStore, TxType};
use crate::store::{MemoryStore, Store, UnitOfWork};
use crate::tax::{TaxRule, TaxRuleStore};

struct Fixture {
    store: MemoryStore,
    documents: DocumentService<MemoryStore>,
    company: ProvisionedCompany,
}

/// A line reduced to what the scenarios compare: account code, side, amount.
type Booked = (String, TxType, Decimal);

async fn setup_with(config: LedgerConfig, owner: Option<UserId>) -> Fixture {
    let store = MemoryStore::new();
    let company = ChartService::new(store.clone())
        .register_company("Acme Trading", owner)
        .await
        .unwrap();
    let documents = DocumentService::new(store.clone(), &config);
    Fixture {
        store,
        documents,
        company,
    }
}

async fn setup() -> Fixture {
    setup_with(LedgerConfig::default(), None).await
}

impl Fixture {
    fn invoice(&self, amount: Decimal) -> NewDocument {
        NewDocument::invoice(self.company.company.id, "Test Customer", amount)
    }

    fn bill(&self, amount: Decimal) -> NewDocument {
        NewDocument::bill(self.company.company.id, "Test Vendor", amount)
    }

    async fn entry(&self, id: JournalEntryId) -> (JournalEntry, Vec<Booked>) {
        let mut tx = self.store.begin().await.unwrap();
        let entry = tx.find_entry(id).await.unwrap().unwrap();
        let mut booked = Vec::new();
        for line in tx.lines_of(id).await.unwrap() {
            let code = tx.find_account(line.account_id).await.unwrap().unwrap().code;
            booked.push((code, line.tx_type, line.amount));
        }
        (entry, booked)
    }

    async fn reversals(&self, id: JournalEntryId) -> Vec<JournalEntry> {
        let mut tx = self.store.begin().await.unwrap();
        tx.find_reversals(id).await.unwrap()
    }

    async fn history(&self, id: JournalEntryId) -> Vec<ActivityLogEntry> {
        let mut tx = self.store.begin().await.unwrap();
        tx.activity_for_entry(id).await.unwrap()
    }

    async fn remove_account(&self, account: StandardAccount) {
        let mut tx = self.store.begin().await.unwrap();
        let account = tx.resolve_standard(self.company.chart.id, account).await.unwrap();
        tx.remove_account(account.id).await.unwrap();
        tx.commit().await.unwrap();
    }

    async fn add_tax_rule(&self, name: &str, rate: Decimal) {
        let mut tx = self.store.begin().await.unwrap();
        tx.insert_tax_rule(&TaxRule::new(self.company.company.id, name, rate))
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    async fn pay(&self, document: &super::types::Document, amount: Decimal, method: PaymentMethod) {
        self.documents
            .record_payment(NewPayment::new(document.id, amount, method))
            .await
            .unwrap();
    }
}

fn booked(code: &str, tx_type: TxType, amount: Decimal) -> Booked {
    (code.to_string(), tx_type, amount)
}

// ========== Submission ==========

#[tokio::test]
async fn test_submitted_invoice_posts_receivable_entry() {
    let fx = setup().await;

    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    assert_eq!(invoice.status, DocumentStatus::Submitted);
    let (entry, lines) = fx.entry(invoice.journal_entry_id.unwrap()).await;
    assert_eq!(entry.description, "Invoice: Test Customer");
    assert!(entry.posted);
    assert!(entry.locked);
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Credit, dec!(100)),
            booked("1200", TxType::Debit, dec!(100)),
        ]
    );
}

#[tokio::test]
async fn test_submitting_draft_bill_posts_payable_entry() {
    let fx = setup().await;
    let bill = fx.documents.create_document(fx.bill(dec!(200))).await.unwrap();
    assert_eq!(bill.status, DocumentStatus::Draft);
    assert!(bill.journal_entry_id.is_none());

    let bill = fx.documents.submit(bill.id).await.unwrap();

    assert_eq!(bill.status, DocumentStatus::Submitted);
    let (entry, lines) = fx.entry(bill.journal_entry_id.unwrap()).await;
    assert_eq!(entry.description, "Bill: Test Vendor");
    assert_eq!(
        lines,
        vec![
            booked("5000", TxType::Debit, dec!(200)),
            booked("2100", TxType::Credit, dec!(200)),
        ]
    );
    assert_eq!(fx.documents.document(bill.id).await.unwrap(), bill);
}

#[tokio::test]
async fn test_submit_twice_is_rejected() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(10))).await.unwrap();
    fx.documents.submit(invoice.id).await.unwrap();

    let err = fx.documents.submit(invoice.id).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::InvalidTransition {
            from: DocumentStatus::Submitted,
            action: "submit"
        }
    ));
}

#[tokio::test]
async fn test_owner_is_recorded_as_actor() {
    let owner = UserId::new();
    let fx = setup_with(LedgerConfig::default(), Some(owner)).await;

    let invoice = fx.documents.create_document(fx.invoice(dec!(10)).submitted()).await.unwrap();

    let history = fx.history(invoice.journal_entry_id.unwrap()).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ActivityAction::Posted);
    assert_eq!(history[0].performed_by, Some(owner));
    assert_eq!(history[0].note, "User-initiated post");
}

#[tokio::test]
async fn test_missing_account_keeps_document_in_draft() {
    let fx = setup().await;
    fx.remove_account(StandardAccount::AccountsReceivable).await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100))).await.unwrap();

    let err = fx.documents.submit(invoice.id).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::Ledger(LedgerError::AccountNotConfigured { ref code, .. }) if code == "1200"
    ));
    let invoice = fx.documents.document(invoice.id).await.unwrap();
    assert_eq!(invoice.status, DocumentStatus::Draft);
    assert!(invoice.journal_entry_id.is_none());
}

#[tokio::test]
async fn test_missing_revenue_account_fails_direct_submission() {
    let fx = setup().await;
    fx.remove_account(StandardAccount::Revenue).await;

    let err = fx
        .documents
        .create_document(fx.invoice(dec!(100)).submitted())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ACCOUNT_NOT_CONFIGURED");
    assert!(matches!(
        err,
        DocumentError::Ledger(LedgerError::AccountNotConfigured { ref code, .. }) if code == "4000"
    ));
}

#[tokio::test]
async fn test_non_positive_document_amount_is_rejected() {
    let fx = setup().await;

    let err = fx.documents.create_document(fx.invoice(dec!(0))).await.unwrap_err();

    assert!(matches!(err, DocumentError::InvalidAmount(_)));
}

#[tokio::test]
async fn test_sub_cent_document_amount_is_rejected() {
    let fx = setup().await;

    let err = fx
        .documents
        .create_document(fx.invoice(dec!(0.004)).submitted())
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentError::InvalidAmount(a) if a == dec!(0.004)));
}

// ========== Tax ==========

#[tokio::test]
async fn test_invoice_tax_credits_tax_payable() {
    let fx = setup().await;
    fx.add_tax_rule("VAT", dec!(10)).await;

    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let (entry, lines) = fx.entry(invoice.journal_entry_id.unwrap()).await;
    assert!(entry.posted);
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Credit, dec!(100)),
            booked("2101", TxType::Credit, dec!(10.00)),
            booked("1200", TxType::Debit, dec!(110.00)),
        ]
    );
}

#[tokio::test]
async fn test_bill_tax_debits_tax_payable() {
    let fx = setup().await;
    fx.add_tax_rule("State", dec!(5)).await;
    fx.add_tax_rule("City", dec!(2.5)).await;

    let bill = fx.documents.create_document(fx.bill(dec!(200)).submitted()).await.unwrap();

    let (_, lines) = fx.entry(bill.journal_entry_id.unwrap()).await;
    assert_eq!(
        lines,
        vec![
            booked("5000", TxType::Debit, dec!(200)),
            booked("2101", TxType::Debit, dec!(10.00)),
            booked("2101", TxType::Debit, dec!(5.00)),
            booked("2100", TxType::Credit, dec!(215.00)),
        ]
    );
}

#[tokio::test]
async fn test_missing_tax_account_falls_back_to_revenue() {
    let fx = setup().await;
    fx.remove_account(StandardAccount::TaxPayable).await;
    fx.add_tax_rule("VAT", dec!(10)).await;

    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let (_, lines) = fx.entry(invoice.journal_entry_id.unwrap()).await;
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Credit, dec!(100)),
            booked("4000", TxType::Credit, dec!(10.00)),
            booked("1200", TxType::Debit, dec!(110.00)),
        ]
    );
}

#[tokio::test]
async fn test_missing_tax_account_rejected_when_configured() {
    let config = LedgerConfig {
        tax_account_fallback: TaxAccountFallback::Reject,
        ..LedgerConfig::default()
    };
    let fx = setup_with(config, None).await;
    fx.remove_account(StandardAccount::TaxPayable).await;
    fx.add_tax_rule("VAT", dec!(10)).await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100))).await.unwrap();

    let err = fx.documents.submit(invoice.id).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::Ledger(LedgerError::AccountNotConfigured { ref code, .. }) if code == "2101"
    ));
    assert_eq!(
        fx.documents.document(invoice.id).await.unwrap().status,
        DocumentStatus::Draft
    );
}

// ========== Payments ==========

#[tokio::test]
async fn test_invoice_partial_then_full_payment() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    fx.pay(&invoice, dec!(30), PaymentMethod::Cash).await;
    let balance = fx.documents.balance(invoice.id).await.unwrap();
    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Partial);
    assert_eq!(balance.paid_amount, dec!(30));
    assert_eq!(balance.balance_due, dec!(70));

    fx.pay(&invoice, dec!(70), PaymentMethod::Cash).await;
    let balance = fx.documents.balance(invoice.id).await.unwrap();
    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Paid);
    assert_eq!(balance.paid_amount, dec!(100));
    assert_eq!(balance.balance_due, dec!(0));
}

#[tokio::test]
async fn test_bill_partial_then_full_payment() {
    let fx = setup().await;
    let bill = fx.documents.create_document(fx.bill(dec!(200)).submitted()).await.unwrap();

    fx.pay(&bill, dec!(80), PaymentMethod::Bank).await;
    assert_eq!(fx.documents.document(bill.id).await.unwrap().status, DocumentStatus::Partial);
    assert_eq!(fx.documents.balance(bill.id).await.unwrap().paid_amount, dec!(80));

    fx.pay(&bill, dec!(120), PaymentMethod::Bank).await;
    assert_eq!(fx.documents.document(bill.id).await.unwrap().status, DocumentStatus::Paid);
    assert_eq!(fx.documents.balance(bill.id).await.unwrap().paid_amount, dec!(200));
}

#[tokio::test]
async fn test_payment_entries_move_cash_and_settle_receivable() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let payment = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(100), PaymentMethod::Cash))
        .await
        .unwrap();

    let (entry, lines) = fx.entry(payment.journal_entry_id.unwrap()).await;
    assert_eq!(entry.description, format!("Payment for Invoice {}", invoice.id));
    assert!(entry.posted);
    assert_eq!(
        lines,
        vec![
            booked("1100", TxType::Debit, dec!(100)),
            booked("1200", TxType::Credit, dec!(100)),
        ]
    );
}

#[tokio::test]
async fn test_bill_bank_payment_credits_assets() {
    let fx = setup().await;
    let bill = fx.documents.create_document(fx.bill(dec!(50)).submitted()).await.unwrap();

    let payment = fx
        .documents
        .record_payment(NewPayment::new(bill.id, dec!(50), PaymentMethod::Card))
        .await
        .unwrap();

    let (entry, lines) = fx.entry(payment.journal_entry_id.unwrap()).await;
    assert_eq!(entry.description, format!("Payment for Bill {}", bill.id));
    assert_eq!(
        lines,
        vec![
            booked("2100", TxType::Debit, dec!(50)),
            booked("1000", TxType::Credit, dec!(50)),
        ]
    );
}

#[tokio::test]
async fn test_pending_payment_posts_on_confirmation() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let pending = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(40), PaymentMethod::Bank).pending())
        .await
        .unwrap();
    assert_eq!(pending.status, PaymentStatus::Pending);
    assert!(pending.journal_entry_id.is_none());
    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Submitted);
    assert_eq!(fx.documents.balance(invoice.id).await.unwrap().paid_amount, dec!(0));

    let confirmed = fx.documents.confirm_payment(pending.id).await.unwrap();
    assert_eq!(confirmed.status, PaymentStatus::Posted);
    assert!(confirmed.journal_entry_id.is_some());
    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Partial);

    let err = fx.documents.confirm_payment(pending.id).await.unwrap_err();
    assert!(matches!(err, DocumentError::PaymentAlreadyPosted(id) if id == pending.id));
    assert_eq!(fx.documents.payments(invoice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_positive_payment_is_rejected() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let err = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(-1), PaymentMethod::Cash))
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentError::InvalidAmount(_)));
    assert!(fx.documents.payments(invoice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sub_cent_payment_is_rejected() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100.00)).submitted()).await.unwrap();

    let err = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(99.999), PaymentMethod::Bank))
        .await
        .unwrap_err();

    assert!(matches!(err, DocumentError::InvalidAmount(a) if a == dec!(99.999)));
    assert!(fx.documents.payments(invoice.id).await.unwrap().is_empty());
    assert_eq!(
        fx.documents.document(invoice.id).await.unwrap().status,
        DocumentStatus::Submitted
    );
}

#[tokio::test]
async fn test_recompute_status_is_idempotent() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(30), PaymentMethod::Cash).await;

    let first = fx.documents.recompute_status(invoice.id).await.unwrap();
    let second = fx.documents.recompute_status(invoice.id).await.unwrap();

    assert_eq!(first, DocumentStatus::Partial);
    assert_eq!(first, second);
}

// ========== Void ==========

#[tokio::test]
async fn test_void_reverses_entry_and_blocks_payments() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    let original_id = invoice.journal_entry_id.unwrap();

    let invoice = fx.documents.void(invoice.id).await.unwrap();
    assert_eq!(invoice.status, DocumentStatus::Voided);

    let reversals = fx.reversals(original_id).await;
    assert_eq!(reversals.len(), 1);
    let (reversal, lines) = fx.entry(reversals[0].id).await;
    assert_eq!(reversal.description, "REVERSAL of Invoice: Test Customer");
    assert_eq!(reversal.reversal_of, Some(original_id));
    assert!(reversal.posted);
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Debit, dec!(100)),
            booked("1200", TxType::Credit, dec!(100)),
        ]
    );

    let (original, original_lines) = fx.entry(original_id).await;
    assert!(original.posted);
    assert_eq!(original_lines.len(), 2);

    let err = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(10), PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::DocumentVoided(id) if id == invoice.id));
    assert!(fx.documents.payments(invoice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_void_bill_blocks_payments() {
    let fx = setup().await;
    let bill = fx.documents.create_document(fx.bill(dec!(200)).submitted()).await.unwrap();

    let bill = fx.documents.void(bill.id).await.unwrap();

    assert_eq!(bill.status, DocumentStatus::Voided);
    let err = fx
        .documents
        .record_payment(NewPayment::new(bill.id, dec!(10), PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DOCUMENT_VOIDED");
}

#[tokio::test]
async fn test_void_draft_has_no_ledger_effect() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100))).await.unwrap();

    let invoice = fx.documents.void(invoice.id).await.unwrap();

    assert_eq!(invoice.status, DocumentStatus::Voided);
    assert!(invoice.journal_entry_id.is_none());
}

#[tokio::test]
async fn test_void_paid_document_is_rejected() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(100), PaymentMethod::Cash).await;

    let err = fx.documents.void(invoice.id).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::InvalidTransition {
            from: DocumentStatus::Paid,
            action: "void"
        }
    ));
    assert!(fx.reversals(invoice.journal_entry_id.unwrap()).await.is_empty());
}

// ========== Refund ==========

#[tokio::test]
async fn test_full_refund() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(100), PaymentMethod::Cash).await;
    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Paid);

    let invoice = fx.documents.refund(invoice.id, None).await.unwrap();

    assert_eq!(invoice.status, DocumentStatus::Refunded);
    let balance = fx.documents.balance(invoice.id).await.unwrap();
    assert_eq!(balance.paid_amount, dec!(0));
    assert_eq!(balance.balance_due, dec!(100));

    let payments = fx.documents.payments(invoice.id).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[1].amount, dec!(-100));
    assert!(payments[1].is_refund());

    let reversals = fx.reversals(invoice.journal_entry_id.unwrap()).await;
    assert_eq!(reversals.len(), 1);
    assert_eq!(payments[1].journal_entry_id, Some(reversals[0].id));
    let (reversal, lines) = fx.entry(reversals[0].id).await;
    assert_eq!(reversal.description, "REFUND REVERSAL of Invoice: Test Customer");
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Debit, dec!(100.00)),
            booked("1200", TxType::Credit, dec!(100.00)),
        ]
    );
}

#[tokio::test]
async fn test_partial_refund() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(100), PaymentMethod::Cash).await;

    let invoice = fx.documents.refund(invoice.id, Some(dec!(40))).await.unwrap();

    assert_eq!(invoice.status, DocumentStatus::PartialRefund);
    let balance = fx.documents.balance(invoice.id).await.unwrap();
    assert_eq!(balance.paid_amount, dec!(60));
    assert_eq!(balance.balance_due, dec!(40));

    let reversals = fx.reversals(invoice.journal_entry_id.unwrap()).await;
    let (_, lines) = fx.entry(reversals[0].id).await;
    assert_eq!(
        lines,
        vec![
            booked("4000", TxType::Debit, dec!(40.00)),
            booked("1200", TxType::Credit, dec!(40.00)),
        ]
    );

    let err = fx.documents.refund(invoice.id, Some(dec!(10))).await.unwrap_err();
    assert!(matches!(
        err,
        DocumentError::InvalidTransition {
            from: DocumentStatus::PartialRefund,
            ..
        }
    ));
}

#[tokio::test]
async fn test_partial_refund_with_tax_stays_balanced() {
    let fx = setup().await;
    fx.add_tax_rule("VAT", dec!(7.5)).await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(99.99)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(99.99), PaymentMethod::Bank).await;

    fx.documents.refund(invoice.id, Some(dec!(33.33))).await.unwrap();

    let reversals = fx.reversals(invoice.journal_entry_id.unwrap()).await;
    let mut tx = fx.store.begin().await.unwrap();
    let lines = tx.lines_of(reversals[0].id).await.unwrap();
    assert_eq!(lines.len(), 3);
    assert!(EntryTotals::of(&lines).is_balanced());
}

#[tokio::test]
async fn test_refund_amount_is_validated() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(100), PaymentMethod::Cash).await;

    for amount in [dec!(0), dec!(-10), dec!(150), dec!(10.005)] {
        let err = fx.documents.refund(invoice.id, Some(amount)).await.unwrap_err();
        assert!(matches!(
            err,
            DocumentError::InvalidRefundAmount { requested, paid }
                if requested == amount && paid == dec!(100)
        ));
    }

    assert_eq!(fx.documents.document(invoice.id).await.unwrap().status, DocumentStatus::Paid);
    assert_eq!(fx.documents.payments(invoice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_refund_requires_paid_document() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();
    fx.pay(&invoice, dec!(50), PaymentMethod::Cash).await;

    let err = fx.documents.refund(invoice.id, None).await.unwrap_err();

    assert!(matches!(
        err,
        DocumentError::InvalidTransition {
            from: DocumentStatus::Partial,
            action: "refund"
        }
    ));
}

#[tokio::test]
async fn test_refunded_document_accepts_no_payments() {
    let fx = setup().await;
    let bill = fx.documents.create_document(fx.bill(dec!(200)).submitted()).await.unwrap();
    fx.pay(&bill, dec!(200), PaymentMethod::Cash).await;
    fx.documents.refund(bill.id, None).await.unwrap();

    let err = fx
        .documents
        .record_payment(NewPayment::new(bill.id, dec!(5), PaymentMethod::Cash))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DocumentError::InvalidTransition {
            from: DocumentStatus::Refunded,
            action: "pay"
        }
    ));
}

// ========== Cancel ==========

#[tokio::test]
async fn test_cancel_draft() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100))).await.unwrap();

    let invoice = fx.documents.cancel(invoice.id).await.unwrap();
    assert_eq!(invoice.status, DocumentStatus::Cancelled);
    assert!(invoice.journal_entry_id.is_none());

    let err = fx
        .documents
        .record_payment(NewPayment::new(invoice.id, dec!(5), PaymentMethod::Cash))
        .await
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidTransition { action: "pay", .. }));
}

#[tokio::test]
async fn test_cancel_submitted_is_rejected() {
    let fx = setup().await;
    let invoice = fx.documents.create_document(fx.invoice(dec!(100)).submitted()).await.unwrap();

    let err = fx.documents.cancel(invoice.id).await.unwrap_err();

    assert!(matches!(err, DocumentError::InvalidTransition { action: "cancel", .. }));
}

#[tokio::test]
async fn test_unknown_document() {
    let fx = setup().await;
    let id = tally_shared::types::DocumentId::new();

    assert!(matches!(
        fx.documents.balance(id).await,
        Err(DocumentError::DocumentNotFound(missing)) if missing == id
    ));
}
