//! Spreadsheet export of the current event list.

use std::io::Write;

use crate::domain::event::EventSummary;
use crate::services::errors::ServiceResult;

/// Lets spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const HEADER: [&str; 11] = [
    "Cliente",
    "Teléfono",
    "Email",
    "Local",
    "Fecha Evento",
    "PAX",
    "Estado",
    "Presupuesto",
    "Comercial",
    "Tipo",
    "Creado",
];

/// Serializes the events in the given order into a BOM-prefixed CSV file.
pub fn export_csv<'a, I>(events: I) -> ServiceResult<Vec<u8>>
where
    I: IntoIterator<Item = &'a EventSummary>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, events)?;
    Ok(buffer)
}

/// Streams the CSV file, BOM included, to `writer`.
pub fn write_csv<'a, W, I>(mut writer: W, events: I) -> ServiceResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a EventSummary>,
{
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    let mut rows = 0usize;
    for event in events {
        csv_writer.write_record(record(event))?;
        rows += 1;
    }

    csv_writer.flush()?;
    log::info!("Exported {rows} events to CSV");
    Ok(())
}

fn record(event: &EventSummary) -> [String; 11] {
    [
        event.client_name().to_string(),
        event.client_phone().to_string(),
        event.client_email().to_string(),
        event.location_name().to_string(),
        event
            .event_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        event.headcount.map(|n| n.to_string()).unwrap_or_default(),
        event.stage.display_name().to_string(),
        event.budget.map(|b| b.to_string()).unwrap_or_default(),
        event.salesperson_name().to_string(),
        event.event_type.clone().unwrap_or_default(),
        event
            .created_at
            .map(|created| created.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    ]
}
