//! Database seeder for Tally development and testing.
//!
//! Registers a demo company with its chart of accounts and ledger, adds a
//! sales tax rule, and walks one invoice and one bill through their
//! lifecycle so a fresh database has postings, reversals, and activity log
//! rows to look at.
//!
//! Usage: cargo run --bin seeder

use rust_decimal_macros::dec;
use sea_orm_migration::MigratorTrait;
use tally_core::accounts::ChartService;
use tally_core::document::{DocumentService, NewDocument, NewPayment, PaymentMethod};
use tally_core::store::{Store, UnitOfWork};
use tally_core::tax::{TaxRule, TaxRuleStore};
use tally_db::migration::Migrator;
use tally_db::{SeaStore, connect_with};
use tally_shared::AppConfig;
use tally_shared::types::UserId;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");
    Migrator::up(&db, None).await?;

    let store = SeaStore::new(db);
    let owner = UserId::new();

    let provisioned = ChartService::new(store.clone())
        .register_company("Demo Trading Co", Some(owner))
        .await?;
    let company_id = provisioned.company.id;
    info!(company_id = %company_id, "Seeded company");

    let mut tx = store.begin().await?;
    tx.insert_tax_rule(&TaxRule::new(company_id, "Sales Tax", dec!(7.5))).await?;
    tx.commit().await?;

    let documents = DocumentService::new(store.clone(), &config.ledger);

    let invoice = documents
        .create_document(NewDocument::invoice(company_id, "Acme Corp", dec!(1200.00)).submitted())
        .await?;
    documents
        .record_payment(NewPayment::new(invoice.id, dec!(500.00), PaymentMethod::Bank))
        .await?;
    documents
        .record_payment(NewPayment::new(invoice.id, dec!(700.00), PaymentMethod::Cash))
        .await?;
    let invoice = documents.refund(invoice.id, Some(dec!(200.00))).await?;
    info!(document_id = %invoice.id, status = %invoice.status, "Seeded invoice");

    let bill = documents
        .create_document(
            NewDocument::bill(company_id, "Paper Supply Ltd", dec!(340.00)).submitted(),
        )
        .await?;
    documents
        .record_payment(NewPayment::new(bill.id, dec!(100.00), PaymentMethod::Card).pending())
        .await?;
    let bill = documents.void(bill.id).await?;
    info!(document_id = %bill.id, status = %bill.status, "Seeded bill");

    info!("Seeding complete");
    Ok(())
}
