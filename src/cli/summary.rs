use super::ui;
use crate::core::{FinanceStore, Transaction};
use anyhow::Result;
use comfy_table::Cell;

pub fn history_table(history: &[Transaction], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Type"),
        ui::header_cell("Title"),
        ui::header_cell("Category"),
        ui::header_cell(&format!("Amount ({currency})")),
    ]);

    for entry in history {
        let record = &entry.record;
        table.add_row(vec![
            Cell::new(record.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.kind),
            Cell::new(&record.title),
            Cell::new(&record.category),
            ui::amount_cell(entry.kind, record.amount, currency),
        ]);
    }

    table.to_string()
}

pub fn render(store: &FinanceStore, currency: &str) -> String {
    let history = store.transaction_history();
    let balance = store.total_balance();

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Recent Transactions", ui::StyleType::Title)
    );
    if history.is_empty() {
        output.push_str(&ui::style_text(
            "No transactions yet.",
            ui::StyleType::Subtle,
        ));
    } else {
        output.push_str(&history_table(&history, currency));
    }

    let balance_style = if balance < 0.0 {
        ui::StyleType::Negative
    } else {
        ui::StyleType::Positive
    };
    output.push_str(&format!(
        "\n\n{} {}\n{} {}\n{} {}",
        ui::style_text("Total Income:  ", ui::StyleType::TotalLabel),
        ui::format_amount(store.total_income(), currency),
        ui::style_text("Total Expenses:", ui::StyleType::TotalLabel),
        ui::format_amount(store.total_expenses(), currency),
        ui::style_text("Total Balance: ", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(balance, currency), balance_style),
    ));

    output
}

pub fn run(store: &FinanceStore, currency: &str) -> Result<()> {
    println!("{}", render(store, currency));
    Ok(())
}
