//! Text output for tee-time lists
//!
//! Table, JSON and CSV renderings of a [`BoardState`] or a record slice.

use crate::client::BoardState;
use crate::teetime::TeeTimeRecord;

/// Output format selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Records that can currently be booked
pub fn available_only(records: &[TeeTimeRecord]) -> Vec<TeeTimeRecord> {
    records.iter().filter(|r| r.is_available).cloned().collect()
}

/// Render the board in the requested format
pub fn render(state: &BoardState, format: OutputFormat, available: bool) -> Result<String, RenderError> {
    let records = if available {
        available_only(&state.tee_times)
    } else {
        state.tee_times.clone()
    };

    match format {
        OutputFormat::Table => Ok(render_table(state, &records)),
        OutputFormat::Json => render_json(&records),
        OutputFormat::Csv => render_csv(&records),
    }
}

/// Fixed-width table with a status line
pub fn render_table(state: &BoardState, records: &[TeeTimeRecord]) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading tee times...\n");
        return out;
    }
    if state.has_error() {
        out.push_str(&format!("Error: {}\n", state.error));
    }
    if records.is_empty() {
        out.push_str("No tee times found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<10} {:<8} {:<24} {:<6} {:>9} {:<12} {}\n",
        "Date", "Time", "Course", "Holes", "Price", "Provider", "Status"
    ));
    out.push_str(&"-".repeat(84));
    out.push('\n');

    for record in records {
        let mut status = if record.is_available { "open" } else { "booked" }.to_string();
        if record.is_special_offer() {
            status.push_str(" *special*");
        }
        out.push_str(&format!(
            "{:<10} {:<8} {:<24} {:<6} {:>9} {:<12} {}\n",
            record.date,
            record.start_time,
            truncate(&record.course_name, 24),
            record.holes_label(),
            record.formatted_price(),
            truncate(&record.provider, 12),
            status
        ));
    }

    let open = records.iter().filter(|r| r.is_available).count();
    out.push_str(&format!("\n{} tee times, {} available", records.len(), open));
    if let Some(updated_at) = state.updated_at {
        out.push_str(&format!(" (updated {})", updated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    out.push('\n');

    out
}

/// Pretty JSON array
pub fn render_json(records: &[TeeTimeRecord]) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// CSV with a header row
pub fn render_csv(records: &[TeeTimeRecord]) -> Result<String, RenderError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "date",
        "start_time",
        "course_name",
        "holes",
        "provider",
        "is_available",
        "green_fee",
        "half_cart",
        "subtotal",
        "price",
        "special_offer",
        "restrictions",
        "booking_url",
    ])?;

    for r in records {
        writer.write_record([
            r.date.clone(),
            r.start_time.clone(),
            r.course_name.clone(),
            r.holes_label(),
            r.provider.clone(),
            r.is_available.to_string(),
            format!("{:.2}", r.green_fee),
            r.half_cart.map(|v| format!("{:.2}", v)).unwrap_or_default(),
            format!("{:.2}", r.subtotal),
            format!("{:.2}", r.price),
            r.is_special_offer().to_string(),
            r.restrictions.as_ref().map(|v| v.join("; ")).unwrap_or_default(),
            r.booking_url.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Buffer(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max - 1).collect();
        t.push('~');
        t
    }
}
