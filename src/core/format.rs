//! Formatting helpers for texts shown to users.
//!
//! Kept free of database access so notification wording can be tested in isolation.

use crate::entities::event;
use chrono::NaiveDate;

/// Formats an optional budget ceiling, e.g. `"25.00 EUR"` or `"no budget"`.
#[must_use]
pub fn format_budget(budget: Option<f64>, currency: &str) -> String {
    budget.map_or_else(|| "no budget".to_string(), |amount| format!("{amount:.2} {currency}"))
}

/// Formats a date the way notification texts show it, e.g. `"Dec 25, 2025"`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// One-line summary of an event used in invitation texts.
#[must_use]
pub fn event_summary(event: &event::Model) -> String {
    format!(
        "{} | names drawn {} | exchange {} | {}",
        event.title,
        format_date(event.draw_date),
        format_date(event.exchange_date),
        format_budget(event.budget, &event.currency)
    )
}
