//! Terminal rendering of portfolios and obligation results.

use colored::Colorize;
use rust_decimal::Decimal;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use easyzakat::prelude::*;

fn base(amount: Decimal) -> String {
    format_money(amount, Currency::BASE)
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    label: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Zakat due")]
    due: String,
    #[tabled(rename = "Already paid")]
    paid: String,
    #[tabled(rename = "Net due")]
    net: String,
}

#[derive(Tabled)]
struct AssetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Zakat due")]
    due: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Renders the headline summary.
pub fn summary(portfolio: &Portfolio, result: &ObligationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n\n",
        "EasyZakat".bright_cyan().bold(),
        format!("({})", portfolio.settings.period).dimmed()
    ));

    if result.categories.is_empty() {
        out.push_str(&format!("{}\n\n", "No assets recorded yet. Add one with `easyzakat add`.".dimmed()));
    } else {
        let rows: Vec<CategoryRow> = result
            .categories
            .iter()
            .map(|c| CategoryRow {
                label: c.label.clone(),
                items: c.items.len(),
                value: base(c.total_value),
                due: if c.is_liability() { "-".to_string() } else { base(c.zakat_due) },
                paid: base(c.zakat_already_paid),
                net: if c.is_liability() { "-".to_string() } else { base(c.net_zakat_due) },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded()).modify(Columns::new(1..), Alignment::right());
        out.push_str(&format!("{}\n\n", table));
    }

    let method = portfolio.settings.nisab.method;
    out.push_str(&format!("  Total wealth          {}\n", base(result.total_wealth)));
    out.push_str(&format!("  Liabilities           {}\n", base(result.total_liabilities)));
    out.push_str(&format!("  Net zakatable wealth  {}\n", base(result.net_zakatable_wealth)));
    out.push_str(&format!("  Nisab ({:<6})        {}\n", method, base(result.nisab_value)));

    if result.meets_nisab {
        out.push_str(&format!("  {}\n\n", "Nisab met: zakat is obligatory".green().bold()));
    } else {
        out.push_str(&format!("  {}\n\n", "Below nisab: no zakat is due".yellow().bold()));
    }

    out.push_str(&format!("  Zakat due             {}\n", base(result.total_zakat_due)));
    out.push_str(&format!("  Already paid          {}\n", base(result.total_zakat_already_paid)));
    out.push_str(&format!(
        "  {}          {}\n",
        "Zakat owed".bold(),
        base(result.net_zakat_owed).bold()
    ));
    if !result.display_currency.is_base() {
        out.push_str(&format!(
            "  {}\n",
            format!(
                "= {} (owed) / nisab {}",
                format_money(result.net_zakat_owed_display, result.display_currency),
                format_money(result.nisab_value_display, result.display_currency)
            )
            .dimmed()
        ));
    }

    out.push('\n');
    out.push_str(&hawl(&result.hawl_status));

    let excluded: Vec<_> = result.excluded().collect();
    if !excluded.is_empty() {
        out.push_str(&format!("\n{}\n", "Excluded".yellow()));
        for item in excluded {
            out.push_str(&format!(
                "  {} {}\n",
                item.name,
                format!("({})", item.exclusion_reason.as_deref().unwrap_or_default()).dimmed()
            ));
        }
    }
    out
}

/// Renders the hawl state with a progress bar.
pub fn hawl(status: &HawlStatus) -> String {
    const WIDTH: usize = 30;
    let filled = WIDTH * usize::from(status.progress_percent) / 100;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled));

    let headline = match status.state {
        HawlState::NotStarted => "Hawl not started (set the date nisab was first met)".dimmed(),
        HawlState::InProgress => "Hawl in progress".cyan(),
        HawlState::Complete => "Hawl complete: zakat is due".green().bold(),
        HawlState::Broken => "Hawl broken: wealth fell below nisab".red().bold(),
    };

    let mut out = format!("  {}\n", headline);
    if let Some(start) = status.nisab_met_date {
        out.push_str(&format!("  Nisab met on          {}\n", start));
    }
    if let Some(due) = status.hawl_due_date {
        out.push_str(&format!("  Hawl due on           {}\n", due));
    }
    if matches!(status.state, HawlState::InProgress | HawlState::Complete) {
        out.push_str(&format!(
            "  {} {:>3}%  ({} days elapsed, {} remaining)\n",
            bar, status.progress_percent, status.days_elapsed, status.days_remaining
        ));
    }
    out
}

/// Renders the asset list with per-item (ungated) figures.
pub fn asset_list(portfolio: &Portfolio) -> String {
    if portfolio.assets.is_empty() {
        return format!("{}\n", "No assets recorded.".dimmed());
    }
    let rates = &portfolio.settings.exchange_rates;
    let rows: Vec<AssetRow> = portfolio
        .assets
        .iter()
        .map(|asset| {
            let v = asset.valuate(rates);
            AssetRow {
                id: asset.id().to_string(),
                name: asset.name().to_string(),
                kind: asset
                    .category()
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|| asset.category_key().to_string()),
                value: base(v.zakatable_value),
                due: base(v.zakat_due),
                status: match (&v.exclusion_reason, v.zakat_already_paid.is_zero()) {
                    (Some(reason), _) => format!("excluded: {}", reason),
                    (None, false) => format!("paid {}", base(v.zakat_already_paid)),
                    (None, true) => String::new(),
                },
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).modify(Columns::new(3..5), Alignment::right());
    format!("{}\n", table)
}

/// Renders the settings block.
pub fn settings(settings: &UserSettings) -> String {
    let mut out = format!("{}\n", "Settings".bright_cyan().bold());
    out.push_str(&format!("  Zakat year            {}\n", settings.period));
    out.push_str(&format!("  Display currency      {}\n", settings.display_currency.label()));
    out.push_str(&format!("  Nisab method          {}\n", settings.nisab.method));
    out.push_str(&format!("  Gold price / g        {}\n", settings.nisab.gold_price_per_gram));
    out.push_str(&format!("  Silver price / g      {}\n", settings.nisab.silver_price_per_gram));
    out.push_str(&format!(
        "  Exchange rates        {}\n",
        format!("(SEK per unit, updated {})", settings.exchange_rates.last_updated.format("%Y-%m-%d")).dimmed()
    ));
    for currency in [Currency::PKR, Currency::USD, Currency::EUR, Currency::GBP] {
        out.push_str(&format!(
            "    {}  {}\n",
            currency,
            settings.exchange_rates.rate(currency)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_summary_mentions_nisab_state() {
        plain();
        let portfolio = Portfolio::new()
            .add(CashAccount::new("Bank").amount(100_000))
            .add(Receivable::new("Old loan").amount(10).likely(false));
        let result = calculate_obligation(&portfolio, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());

        let text = summary(&portfolio, &result);
        assert!(text.contains("Nisab met"));
        assert!(text.contains("kr 2,500"));
        assert!(text.contains("Marked as unlikely to be received"));
    }

    #[test]
    fn test_hawl_bar() {
        plain();
        let status = HawlTracker::new(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
            .status(&HawlConfiguration::started_on(NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()));
        let text = hawl(&status);
        assert!(text.contains("Hawl in progress"));
        assert!(text.contains("164 days elapsed"));
    }

    #[test]
    fn test_empty_list() {
        plain();
        assert!(asset_list(&Portfolio::new()).contains("No assets recorded"));
    }
}
