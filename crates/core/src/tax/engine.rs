//! Tax line computation.

use rust_decimal::Decimal;
use tally_shared::TaxAccountFallback;
use tally_shared::types::{CompanyId, JournalEntryId, round_money};
use tracing::warn;

use super::types::TaxRule;
use crate::accounts::{Account, AccountRole, StandardAccount};
use crate::ledger::{LedgerError, NewLine, TxType};
use crate::store::UnitOfWork;

/// Applies active tax rules to in-flight journal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxEngine {
    fallback: TaxAccountFallback,
}

impl TaxEngine {
    /// Creates a tax engine with the given missing-account policy.
    #[must_use]
    pub const fn new(fallback: TaxAccountFallback) -> Self {
        Self { fallback }
    }

    /// Computes `round(base * rate / 100, 2)`.
    #[must_use]
    pub fn tax_amount(base: Decimal, rate: Decimal) -> Decimal {
        round_money(base * rate / Decimal::ONE_HUNDRED)
    }

    /// Builds one line per rule against `tax_account`.
    ///
    /// Lines credit the tax account when `reference` is a revenue account and
    /// debit it otherwise. Rules whose tax rounds to zero produce no line.
    #[must_use]
    pub fn tax_lines(
        rules: &[TaxRule],
        reference: &Account,
        tax_account: &Account,
        base: Decimal,
    ) -> Vec<NewLine> {
        let tx_type = if reference.role == AccountRole::Revenue {
            TxType::Credit
        } else {
            TxType::Debit
        };

        rules
            .iter()
            .filter(|rule| rule.is_active)
            .filter_map(|rule| {
                let amount = Self::tax_amount(base, rule.rate);
                (!amount.is_zero()).then(|| NewLine {
                    account_id: tax_account.id,
                    amount,
                    tx_type,
                    description: Some(rule.name.clone()),
                })
            })
            .collect()
    }

    /// Appends tax lines for every active rule of `company_id` to the entry.
    ///
    /// Returns the total tax added. The tax account is the chart's 2101 Tax
    /// Payable; when it is missing the configured fallback decides between
    /// booking onto `reference` and failing with `AccountNotConfigured`.
    pub async fn apply<T: UnitOfWork>(
        &self,
        tx: &mut T,
        company_id: CompanyId,
        entry_id: JournalEntryId,
        reference: &Account,
        base: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let rules = tx.active_tax_rules(company_id).await?;
        if rules.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let tax_code = StandardAccount::TaxPayable.code();
        let tax_account = match tx.find_account_by_code(reference.chart_id, tax_code).await? {
            Some(account) => account,
            None => match self.fallback {
                TaxAccountFallback::ReferenceAccount => {
                    warn!(
                        company_id = %company_id,
                        account_code = %reference.code,
                        "Tax payable account {tax_code} missing, booking tax onto reference account"
                    );
                    reference.clone()
                }
                TaxAccountFallback::Reject => {
                    return Err(LedgerError::AccountNotConfigured {
                        chart_id: reference.chart_id,
                        code: tax_code.to_string(),
                    });
                }
            },
        };

        let lines = Self::tax_lines(&rules, reference, &tax_account, base);
        let total = lines.iter().map(|l| l.amount).sum();
        tx.add_lines(entry_id, lines).await?;
        Ok(total)
    }
}
