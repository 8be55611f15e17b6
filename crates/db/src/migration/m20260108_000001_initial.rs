//! Initial database migration.
//!
//! Creates the company, chart of accounts, ledger, document, and activity log
//! tables with the constraints the posting engine relies on.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: COMPANIES & CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(CHARTS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGERS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(TRANSACTION_LINES_SQL).await?;
        db.execute_unprepared(TAX_RULES_SQL).await?;

        // ============================================================
        // PART 3: DOCUMENTS
        // ============================================================
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 4: AUDIT
        // ============================================================
        db.execute_unprepared(ACTIVITY_LOG_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY,
    entity_id UUID NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    owner_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CHARTS_SQL: &str = r"
-- One chart per accounting entity; concurrent bootstrap relies on this constraint
CREATE TABLE charts_of_accounts (
    id UUID PRIMARY KEY,
    entity_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    CONSTRAINT charts_of_accounts_entity_id_key UNIQUE (entity_id)
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    chart_id UUID NOT NULL REFERENCES charts_of_accounts(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL,
    parent_id UUID REFERENCES accounts(id) ON DELETE RESTRICT,
    CONSTRAINT accounts_chart_id_code_key UNIQUE (chart_id, code),
    CONSTRAINT chk_account_role
        CHECK (role IN ('asset', 'liability', 'equity', 'revenue', 'expense'))
);

CREATE INDEX idx_accounts_parent ON accounts(parent_id) WHERE parent_id IS NOT NULL;
";

const LEDGERS_SQL: &str = r"
CREATE TABLE ledgers (
    id UUID PRIMARY KEY,
    entity_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT ledgers_entity_id_key UNIQUE (entity_id)
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    ledger_id UUID NOT NULL REFERENCES ledgers(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    posted BOOLEAN NOT NULL DEFAULT false,
    locked BOOLEAN NOT NULL DEFAULT false,
    reversal_of UUID REFERENCES journal_entries(id) ON DELETE RESTRICT,
    CONSTRAINT chk_reversal_not_self CHECK (reversal_of IS NULL OR reversal_of <> id)
);

CREATE INDEX idx_journal_entries_ledger ON journal_entries(ledger_id, timestamp);
CREATE INDEX idx_journal_entries_reversal ON journal_entries(reversal_of)
    WHERE reversal_of IS NOT NULL;
";

const TRANSACTION_LINES_SQL: &str = r"
-- Accounts are referenced, never owned: deleting a referenced account fails
CREATE TABLE transaction_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    amount NUMERIC(14, 2) NOT NULL,
    tx_type VARCHAR(6) NOT NULL,
    description TEXT,
    position INTEGER NOT NULL,
    CONSTRAINT chk_line_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_line_tx_type CHECK (tx_type IN ('debit', 'credit')),
    CONSTRAINT transaction_lines_entry_position_key UNIQUE (journal_entry_id, position)
);

CREATE INDEX idx_transaction_lines_account ON transaction_lines(account_id);
";

const TAX_RULES_SQL: &str = r"
CREATE TABLE tax_rules (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    region VARCHAR(100),
    rate NUMERIC(7, 4) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    seq BIGSERIAL NOT NULL,
    CONSTRAINT chk_tax_rate CHECK (rate >= 0 AND rate <= 100)
);

CREATE INDEX idx_tax_rules_company ON tax_rules(company_id, seq) WHERE is_active;
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    kind VARCHAR(10) NOT NULL,
    counterparty VARCHAR(255) NOT NULL,
    amount NUMERIC(14, 2) NOT NULL,
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    journal_entry_id UUID REFERENCES journal_entries(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_document_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_document_kind CHECK (kind IN ('invoice', 'bill')),
    CONSTRAINT chk_document_status CHECK (status IN (
        'draft', 'submitted', 'paid', 'partial', 'unpaid',
        'voided', 'refunded', 'partial_refund', 'cancelled'
    ))
);

CREATE INDEX idx_documents_company ON documents(company_id, created_at DESC);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL,
    method VARCHAR(10) NOT NULL DEFAULT 'cash',
    status VARCHAR(10) NOT NULL DEFAULT 'posted',
    journal_entry_id UUID REFERENCES journal_entries(id) ON DELETE SET NULL,
    paid_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    seq BIGSERIAL NOT NULL,
    CONSTRAINT chk_payment_amount_nonzero CHECK (amount <> 0),
    CONSTRAINT chk_payment_method CHECK (method IN ('cash', 'bank', 'card', 'other')),
    CONSTRAINT chk_payment_status CHECK (status IN ('pending', 'posted')),
    CONSTRAINT payments_journal_entry_id_key UNIQUE (journal_entry_id)
);

CREATE INDEX idx_payments_document ON payments(document_id, seq);
";

const ACTIVITY_LOG_SQL: &str = r"
-- Append-only audit feed
CREATE TABLE journal_activity_log (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    action VARCHAR(10) NOT NULL,
    performed_by UUID,
    performed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    note TEXT NOT NULL DEFAULT '',
    snapshot JSONB NOT NULL,
    seq BIGSERIAL NOT NULL,
    CONSTRAINT chk_activity_action
        CHECK (action IN ('posted', 'unposted', 'locked', 'unlocked', 'created', 'updated'))
);

CREATE INDEX idx_activity_log_entry ON journal_activity_log(journal_entry_id, seq);
";

const TRIGGERS_SQL: &str = r"
-- Lines of a locked entry are frozen
CREATE OR REPLACE FUNCTION reject_locked_entry_lines()
RETURNS TRIGGER AS $$
BEGIN
    IF EXISTS (SELECT 1 FROM journal_entries WHERE id = NEW.journal_entry_id AND locked) THEN
        RAISE EXCEPTION 'journal entry % is locked', NEW.journal_entry_id
            USING ERRCODE = 'check_violation';
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_transaction_lines_locked
    BEFORE INSERT OR UPDATE ON transaction_lines
    FOR EACH ROW EXECUTE FUNCTION reject_locked_entry_lines();

-- Activity log rows are never rewritten
CREATE OR REPLACE FUNCTION reject_activity_log_update()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'journal_activity_log is append-only'
        USING ERRCODE = 'check_violation';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_activity_log_append_only
    BEFORE UPDATE ON journal_activity_log
    FOR EACH ROW EXECUTE FUNCTION reject_activity_log_update();
";

const DROP_ALL_SQL: &str = r"
-- DROP ALL: Rollback migration
DROP TABLE IF EXISTS journal_activity_log CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS tax_rules CASCADE;
DROP TABLE IF EXISTS transaction_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS ledgers CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS charts_of_accounts CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP FUNCTION IF EXISTS reject_locked_entry_lines() CASCADE;
DROP FUNCTION IF EXISTS reject_activity_log_update() CASCADE;
";
