//! Plain-text rendering for lists, details and dashboard charts.
//!
//! Pure functions; the prompt loop in `tui` adds colour and prints them.

use crate::domain::{
    Attachment, ChartPoint, Complaint, ComplaintFilter, DashboardStats, Identity, Notification,
    NotificationKind,
};

const BAR: char = '█';
const PREDICTED_BAR: char = '░';

/// Human-readable size: `0 Bytes`, `512 Bytes`, `1.5 KB`, `50 MB`. At most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

pub fn attachment_row(a: &Attachment) -> String {
    format!(
        "{} [{}] {}",
        a.name,
        a.kind().label(),
        format_file_size(a.size)
    )
}

pub fn complaint_row(c: &Complaint) -> String {
    format!(
        "[{}] {} · {} priority · {} · {} · {}",
        c.status.label(),
        c.title,
        c.priority.label(),
        c.category.label(),
        c.station,
        c.date.format("%Y-%m-%d")
    )
}

/// Header and body of the detail view, without the history log.
pub fn complaint_detail(c: &Complaint) -> Vec<String> {
    let mut lines = vec![
        c.title.clone(),
        format!("Status:    {}", c.status.label()),
        format!("Priority:  {}", c.priority.label()),
        format!("Category:  {}", c.category.label()),
        format!("Station:   {}", c.station),
    ];
    if let Some(line) = &c.line {
        lines.push(format!("Line:      {line}"));
    }
    lines.push(format!("Date:      {}", c.date.format("%Y-%m-%d")));
    if let Some(agent) = &c.assigned_agent {
        lines.push(format!("Assigned:  {agent}"));
    }
    lines.push(format!(
        "Filed:     {}",
        c.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(String::new());
    lines.push(c.description.clone());
    if !c.attachments.is_empty() {
        lines.push(String::new());
        lines.push(format!("Attachments ({}):", c.attachments.len()));
        lines.extend(c.attachments.iter().map(|a| format!("  {}", attachment_row(a))));
    }
    lines
}

/// One-line description of the active filter, e.g. `search "train" · status Submitted`.
pub fn filter_summary(f: &ComplaintFilter) -> String {
    let mut parts = Vec::new();
    if let Some(s) = f.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(format!("search \"{s}\""));
    }
    if let Some(c) = f.category {
        parts.push(format!("category {}", c.label()));
    }
    if let Some(s) = f.status {
        parts.push(format!("status {}", s.label()));
    }
    if let Some(s) = &f.station {
        parts.push(format!("station {s}"));
    }
    if let Some(d) = f.date_from {
        parts.push(format!("from {}", d.format("%Y-%m-%d")));
    }
    if let Some(d) = f.date_to {
        parts.push(format!("to {}", d.format("%Y-%m-%d")));
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" · ")
    }
}

pub fn history_lines(c: &Complaint) -> Vec<String> {
    let mut lines = Vec::with_capacity(c.status_history.len() * 2);
    for entry in &c.status_history {
        lines.push(format!(
            "{}  {:<12} by {}",
            entry.updated_at.format("%Y-%m-%d %H:%M"),
            entry.status.label(),
            entry.updated_by
        ));
        if let Some(comment) = &entry.comment {
            lines.push(format!("                  \"{comment}\""));
        }
    }
    lines
}

pub fn notification_row(n: &Notification) -> String {
    let marker = if n.read { ' ' } else { '•' };
    let kind = match n.kind {
        NotificationKind::StatusChange => "status",
        NotificationKind::NewComplaint => "new",
        NotificationKind::Comment => "comment",
    };
    format!(
        "{marker} {} [{kind}] {}",
        n.created_at.format("%Y-%m-%d %H:%M"),
        n.message
    )
}

pub fn identity_row(i: &Identity) -> String {
    format!(
        "{:<20} {:<8} {:<30} {}",
        i.name,
        i.role.label(),
        i.email,
        i.phone.as_deref().unwrap_or("-")
    )
}

/// Horizontal bar scaled so `max` fills `width` cells. Non-zero values get at least one cell.
pub fn bar(value: usize, max: usize, width: usize, fill: char) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let cells = (value * width).div_ceil(max).clamp(1, width);
    std::iter::repeat_n(fill, cells).collect()
}

/// Labelled bar chart, one row per entry, in the given order.
pub fn count_chart(rows: &[(String, usize)], width: usize) -> Vec<String> {
    let max = rows.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, n)| {
            format!(
                "{label:<label_width$}  {:>4} {}",
                n,
                bar(*n, max, width, BAR)
            )
        })
        .collect()
}

/// Trend vs prediction. One row per value: a date with both series gets an `actual` row
/// and a `predicted` row underneath with the date column left blank.
pub fn trend_chart(series: &[ChartPoint], width: usize) -> Vec<String> {
    let max = series
        .iter()
        .flat_map(|p| [p.actual, p.predicted])
        .flatten()
        .max()
        .unwrap_or(0) as usize;
    let row = |date: &str, tag: &str, value: u32, fill: char| {
        format!(
            "{date:<5}  {tag:<9} {value:>3} {}",
            bar(value as usize, max, width, fill)
        )
    };

    let mut lines = Vec::with_capacity(series.len());
    for p in series {
        let date = p.date.format("%m-%d").to_string();
        match (p.actual, p.predicted) {
            (Some(a), Some(pr)) => {
                lines.push(row(&date, "actual", a, BAR));
                lines.push(row("", "predicted", pr, PREDICTED_BAR));
            }
            (Some(a), None) => lines.push(row(&date, "actual", a, BAR)),
            (None, Some(pr)) => lines.push(row(&date, "predicted", pr, PREDICTED_BAR)),
            (None, None) => lines.push(row(&date, "", 0, BAR)),
        }
    }
    lines
}

/// Full dashboard text: key figures, status/category/station charts and the trend chart.
pub fn dashboard(stats: &DashboardStats, width: usize) -> Vec<String> {
    let mut lines = vec![
        format!("Total complaints: {}", stats.total_complaints),
        format!("Pending:          {}", stats.pending()),
        format!("Resolution rate:  {}%", stats.resolution_rate()),
        format!("Stations:         {}", stats.station_count()),
    ];

    lines.push(String::new());
    lines.push("By status".to_string());
    let by_status: Vec<(String, usize)> = stats
        .by_status
        .iter()
        .map(|(s, n)| (s.label().to_string(), *n))
        .collect();
    lines.extend(count_chart(&by_status, width));

    lines.push(String::new());
    lines.push("By category".to_string());
    let mut by_category: Vec<(String, usize)> = stats
        .by_category
        .iter()
        .map(|(c, n)| (c.label().to_string(), *n))
        .collect();
    by_category.sort_by(|a, b| b.1.cmp(&a.1));
    lines.extend(count_chart(&by_category, width));

    lines.push(String::new());
    lines.push("By station".to_string());
    let by_station: Vec<(String, usize)> = stats
        .top_stations()
        .into_iter()
        .map(|(s, n)| (s.to_string(), n))
        .collect();
    if by_station.is_empty() {
        lines.push("(no complaints)".to_string());
    } else {
        lines.extend(count_chart(&by_station, width));
    }

    lines.push(String::new());
    lines.push("Weekly trend and prediction".to_string());
    lines.extend(trend_chart(&stats.chart_series(), width));
    lines
}
