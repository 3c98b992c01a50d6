use super::ui;
use crate::core::analytics;
use crate::core::{ApiError, FinanceStore, Record, RecordDraft, RecordKind, RecordPatch};
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use std::future::Future;

/// Runs a store operation behind a spinner and turns a failure into the
/// message the store recorded for it. An error left behind by a successful
/// operation (a failed refresh) is printed as a warning.
async fn with_spinner<F>(store: &FinanceStore, message: &str, operation: F) -> Result<()>
where
    F: Future<Output = Result<(), ApiError>>,
{
    let pb = ui::new_spinner(message);
    let result = operation.await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            if let Some(warning) = store.error() {
                eprintln!(
                    "{}",
                    ui::style_text(&format!("Warning: {warning}"), ui::StyleType::Negative)
                );
            }
            Ok(())
        }
        Err(err) => {
            let message = store.error().unwrap_or_else(|| err.to_string());
            Err(anyhow::Error::new(err).context(message))
        }
    }
}

pub fn records_table(kind: RecordKind, records: &[Record], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Date"),
        ui::header_cell("Title"),
        ui::header_cell("Category"),
        ui::header_cell("Description"),
        ui::header_cell(&format!("Amount ({currency})")),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(record.created_at.format("%Y-%m-%d")),
            Cell::new(&record.title),
            Cell::new(&record.category),
            Cell::new(&record.description),
            ui::amount_cell(kind, record.amount, currency),
        ]);
    }

    table.to_string()
}

pub fn list(store: &FinanceStore, kind: RecordKind, currency: &str) -> Result<()> {
    let records = store.records(kind);
    let title = format!("{kind} Records");
    println!("{}\n", ui::style_text(&title, ui::StyleType::Title));

    if records.is_empty() {
        println!(
            "{}",
            ui::style_text(
                &format!("No {} recorded.", kind.plural()),
                ui::StyleType::Subtle
            )
        );
        return Ok(());
    }

    println!("{}", records_table(kind, &records, currency));
    let total = analytics::total(&records);
    println!(
        "\n{} {}",
        ui::style_text(&format!("Total {}:", kind.plural()), ui::StyleType::TotalLabel),
        ui::format_amount(total, currency)
    );
    Ok(())
}

pub async fn add(store: &FinanceStore, kind: RecordKind, draft: &RecordDraft) -> Result<()> {
    let message = format!("Adding {}...", kind.singular());
    with_spinner(store, &message, store.add(kind, draft)).await?;
    println!("Added {} '{}'", kind.singular(), draft.title);
    Ok(())
}

/// Selects the record as the one being edited, applies `patch` over it and
/// sends the result.
pub async fn update(
    store: &FinanceStore,
    kind: RecordKind,
    id: &str,
    patch: &RecordPatch,
) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to update: pass at least one field to change");
    }

    let record = store
        .find(kind, id)
        .ok_or_else(|| anyhow!("No {} with id {}", kind.singular(), id))?;
    store.set_editing(Some(record));

    let draft = store
        .editing()
        .map(|editing| patch.apply(&editing))
        .ok_or_else(|| anyhow!("No {} selected for editing", kind.singular()))?;

    let message = format!("Updating {}...", kind.singular());
    with_spinner(store, &message, store.update(kind, id, &draft)).await?;
    println!("Updated {} '{}'", kind.singular(), draft.title);
    Ok(())
}

pub async fn delete(store: &FinanceStore, kind: RecordKind, id: &str) -> Result<()> {
    let message = format!("Deleting {}...", kind.singular());
    with_spinner(store, &message, store.delete(kind, id)).await?;
    println!("Deleted {} {}", kind.singular(), id);
    Ok(())
}
