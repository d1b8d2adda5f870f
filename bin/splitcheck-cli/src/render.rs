use rust_decimal::Decimal;
use splitcheck_core::math::to_cents;
use splitcheck_core::{SessionConfig, SessionSummary};
use std::fmt;

fn money(currency: &str, amount: Decimal) -> String {
    format!("{}{:.2}", currency, to_cents(amount))
}

/// Fixed-width table view of a session summary
pub struct SummaryTable<'a> {
    summary: &'a SessionSummary,
    currency: &'a str,
}

impl<'a> SummaryTable<'a> {
    pub fn new(summary: &'a SessionSummary, config: &'a SessionConfig) -> Self {
        Self {
            summary,
            currency: config.currency.as_str(),
        }
    }
}

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;

        writeln!(f, "{:<10} {:<20} {:>6} {:>12}  {}", "SPLIT", "LABEL", "ITEMS", "TOTAL", "STATUS")?;
        for split in &summary.splits {
            let status = match split.payment {
                Some(method) => format!("paid ({})", method),
                None if split.item_count == 0 => "empty".to_string(),
                None => "pending".to_string(),
            };
            writeln!(
                f,
                "{:<10} {:<20} {:>6} {:>12}  {}",
                split.id.to_string(),
                split.label,
                split.item_count,
                money(self.currency, split.total),
                status
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Total:       {}", money(self.currency, summary.total))?;
        writeln!(f, "Paid:        {}", money(self.currency, summary.paid_total))?;
        writeln!(f, "Outstanding: {}", money(self.currency, summary.outstanding_total))?;
        writeln!(f, "Complete:    {}", if summary.complete { "yes" } else { "no" })
    }
}
