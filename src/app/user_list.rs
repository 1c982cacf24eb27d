use crate::core::handler::UserListView;
use crate::domain::model::{NullableField, User};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, UsersError};
use serde::{Deserialize, Serialize};
use std::fmt;

const HEADERS: [&str; 6] = ["ID", "NAME", "USERNAME", "EMAIL", "CITY", "COMPANY"];
const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

pub fn render(view: &UserListView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(&view.users)),
        OutputFormat::Csv => render_csv(&view.users),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}

/// Renders the view and writes it through `storage`.
pub async fn save<S: Storage>(
    storage: &S,
    path: &str,
    view: &UserListView,
    format: OutputFormat,
) -> Result<()> {
    let rendered = render(view, format)?;
    tracing::debug!("Writing {} bytes of {} output to {}", rendered.len(), format, path);
    storage.write_file(path, rendered.as_bytes()).await
}

fn row(user: &User) -> [Option<String>; 6] {
    [
        user.id.value().map(|id| id.to_string()),
        user.name.value().cloned(),
        user.username.value().cloned(),
        user.email.value().cloned(),
        user.city().map(str::to_string),
        user.company_name().map(str::to_string),
    ]
}

fn render_text(users: &[User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            row(user)
                .into_iter()
                .map(|cell| cell.unwrap_or_else(|| MISSING.to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![format_line(header.as_slice())];
    lines.extend(rows.iter().map(|cells| format_line(cells.as_slice())));
    lines.push(format!("{} user(s)", users.len()));
    lines.join("\n")
}

fn render_csv(users: &[User]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS.iter().map(|h| h.to_lowercase()))?;
    for user in users {
        writer.write_record(row(user).iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| UsersError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| UsersError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
