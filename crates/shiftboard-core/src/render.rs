use std::io::{self, IsTerminal, Write};

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::WidgetConfig;
use crate::projection::{
    Body, CalendarBody, Header, ItemChip, LayoutModel, TimelineBar, TimelineBody,
};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    item_label: String,
}

impl Renderer {
    pub fn new(cfg: &WidgetConfig, color: bool) -> Self {
        Self {
            color,
            item_label: cfg.item_label.clone(),
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn print_layout(&mut self, model: &LayoutModel) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_layout(&mut out, model)
    }

    pub fn write_layout<W: Write>(&self, mut out: W, model: &LayoutModel) -> anyhow::Result<()> {
        if let Some(header) = &model.header {
            self.write_header(&mut out, header)?;
        }

        if !model.legend.is_empty() {
            let legend = model
                .legend
                .iter()
                .map(|entry| format!("{} ({})", entry.label, entry.color))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(out, "{legend}")?;
            writeln!(out)?;
        }

        match &model.body {
            Body::Calendar(body) => self.write_calendar(&mut out, body),
            Body::Timeline(body) => self.write_timeline(&mut out, body),
        }
    }

    fn write_header<W: Write>(&self, mut out: W, header: &Header) -> anyhow::Result<()> {
        writeln!(out, "< {} >", self.paint(&header.label, "1"))?;

        let tabs = |tabs: &[crate::projection::Tab]| {
            tabs.iter()
                .map(|tab| {
                    if tab.active {
                        format!("[{}]", tab.label)
                    } else {
                        tab.label.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(
            out,
            "{}: {}   {}: {}",
            header.display_title,
            tabs(&header.displays),
            header.period_title,
            tabs(&header.periods)
        )?;

        let mut actions = vec![header.today_label.clone()];
        if let Some(label) = &header.new_item_label {
            actions.push(format!("+ {label}"));
        }
        writeln!(out, "{}", actions.join(" | "))?;
        writeln!(out)?;
        Ok(())
    }

    fn write_calendar<W: Write>(&self, mut out: W, body: &CalendarBody) -> anyhow::Result<()> {
        match body {
            CalendarBody::Month { weekdays, cells } => {
                let rows = cells
                    .chunks(7)
                    .map(|week| {
                        week.iter()
                            .map(|cell| {
                                let mut text = cell.day.to_string();
                                if !cell.in_current_month {
                                    text = format!("({text})");
                                }
                                let count = cell.items.len() + cell.hidden;
                                if count > 0 {
                                    text.push_str(&format!(" ·{count}"));
                                }
                                if cell.is_drop_target {
                                    text.push_str(" ⇣");
                                }
                                if cell.is_today {
                                    self.paint(&text, "33")
                                } else {
                                    text
                                }
                            })
                            .collect()
                    })
                    .collect();
                write_table(&mut out, weekdays.clone(), rows)?;

                for cell in cells.iter().filter(|cell| !cell.items.is_empty()) {
                    writeln!(out)?;
                    writeln!(out, "{}", cell.date.format("%Y-%m-%d"))?;
                    self.write_chips(&mut out, &cell.items)?;
                    if let Some(more) = &cell.more_label {
                        writeln!(out, "  {more}")?;
                    }
                }
            }
            CalendarBody::Week { columns } => {
                for column in columns {
                    let title = format!("{} {}", column.weekday, column.label);
                    let title = if column.is_today {
                        self.paint(&title, "33")
                    } else {
                        title
                    };
                    writeln!(out, "{title}")?;
                    self.write_chips(&mut out, &column.items)?;
                }
            }
            CalendarBody::Day(list) => {
                writeln!(out, "{}", list.label)?;
                self.write_chips(&mut out, &list.items)?;
                if let Some(message) = &list.empty_message {
                    writeln!(out, "  {message}")?;
                }
            }
            CalendarBody::Year { months } => {
                for card in months {
                    writeln!(out, "{}", card.name)?;
                    self.write_chips(&mut out, &card.items)?;
                    if let Some(more) = &card.more_label {
                        writeln!(out, "  {more}")?;
                    }
                    if let Some(message) = &card.empty_message {
                        writeln!(out, "  {message}")?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_chips<W: Write>(&self, mut out: W, chips: &[ItemChip]) -> anyhow::Result<()> {
        for chip in chips {
            writeln!(
                out,
                "  {} • {} • {} [{}]",
                chip.group_name, chip.title, chip.time_label, chip.type_label
            )?;
            if let Some(notes) = &chip.notes {
                writeln!(out, "    {notes}")?;
            }
        }
        Ok(())
    }

    fn write_timeline<W: Write>(&self, mut out: W, body: &TimelineBody) -> anyhow::Result<()> {
        let columns = body
            .columns
            .iter()
            .map(|column| {
                if column.is_today {
                    self.paint(&column.label, "33")
                } else {
                    column.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out, "{columns}")?;
        if let (Some(marker), Some(label)) = (body.now_marker, &body.now_label) {
            writeln!(out, "now {label} at {marker:.2}%")?;
        }
        writeln!(out)?;

        let headers = vec![
            body.group_label.clone(),
            "Lane".to_string(),
            self.item_label.clone(),
            "Time".to_string(),
            "Left %".to_string(),
            "Width %".to_string(),
        ];

        let mut rows = Vec::new();
        for row in &body.rows {
            let mut name = match &row.group.role {
                Some(role) => format!("{} {} ({role})", row.group.initials, row.group.name),
                None => format!("{} {}", row.group.initials, row.group.name),
            };
            if row.is_drop_target {
                name = self.paint(&name, "36");
            }

            if row.bars.is_empty() {
                rows.push(vec![
                    name.clone(),
                    "-".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
            }
            for bar in &row.bars {
                rows.push(bar_cells(&name, bar));
            }
            if let Some(preview) = &row.drop_preview {
                rows.push(vec![
                    name.clone(),
                    "↓".to_string(),
                    self.paint(&preview.label, "36"),
                    String::new(),
                    format!("{:.2}", preview.left),
                    format!("{:.2}", preview.width),
                ]);
            }
        }

        write_table(&mut out, headers, rows)
    }

    #[tracing::instrument(skip_all)]
    pub fn print_json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, rows))]
    pub fn print_table(&mut self, headers: Vec<String>, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        write_table(&mut out, headers, rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn bar_cells(name: &str, bar: &TimelineBar) -> Vec<String> {
    let mut title = bar.title.clone();
    if bar.compact {
        title.push_str(" ·");
    }
    vec![
        name.to_string(),
        bar.lane.to_string(),
        title,
        bar.time_label.clone().unwrap_or_default(),
        format!("{:.2}", bar.left),
        format!("{:.2}", bar.width),
    ]
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(header).as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (idx, header) in headers.iter().enumerate() {
        write_cell(&mut writer, header, widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, width) in widths.iter().enumerate() {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            write_cell(&mut writer, cell, *width)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn write_cell<W: Write>(writer: &mut W, cell: &str, width: usize) -> anyhow::Result<()> {
    let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
    let padding = width.saturating_sub(visible_width);
    write!(writer, "{}{} ", cell, " ".repeat(padding))?;
    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_table(headers: &[&str], rows: &[&[&str]]) -> String {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .expect("write table");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn table_aligns_wide_characters() {
        let text = render_table(&["Name", "Title"], &[&["Jörg", "会議"], &["Jo", "Standup"]]);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Name Title   ");
        assert_eq!(lines[1], "---- ------- ");
        assert_eq!(lines[2], "Jörg 会議    ");
        assert_eq!(lines[3], "Jo   Standup ");
    }

    #[test]
    fn ansi_codes_do_not_count_towards_width() {
        assert_eq!(strip_ansi("\x1b[33m12\x1b[0m"), "12");
        let text = render_table(&["Day"], &[&["\x1b[33m12\x1b[0m"], &["3"]]);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], "--- ");
        assert_eq!(lines[3], "3   ");
    }

    #[test]
    fn day_layout_prints_header_chips_and_empty_message() {
        use chrono::NaiveDate;
        use shiftboard_shared::{DisplayMode, ViewMode};

        use crate::commands::layout_for;
        use crate::config::Clock;
        use crate::data::ScheduleData;
        use crate::widget::WidgetState;

        let cfg = WidgetConfig::default();
        let data = ScheduleData::from_json(
            r#"{
              "groups": [{ "id": "1", "name": "John Doe" }],
              "items": [
                { "id": "a", "employeeId": "1", "title": "Standup", "date": "2025-11-11",
                  "startTime": "09:00", "endTime": "09:15", "type": "meeting" }
              ]
            }"#,
        )
        .expect("sample data");
        let day = NaiveDate::from_ymd_opt(2025, 11, 11).expect("valid date");
        let renderer = Renderer::new(&cfg, false);

        let render = |date: NaiveDate| {
            let state = WidgetState::new(date, ViewMode::Day, DisplayMode::Calendar);
            let model = layout_for(&cfg, &data, &state, Clock::fixed(day, 0));
            let mut buf = Vec::new();
            renderer.write_layout(&mut buf, &model).expect("write layout");
            String::from_utf8(buf).expect("utf8")
        };

        let busy = render(day);
        assert!(busy.contains("John Doe • Standup • 09:00-09:15 [Meeting]"));
        assert!(!busy.contains("No items for this day"));

        let empty = render(day.succ_opt().expect("valid date"));
        assert!(empty.contains("No items for this day"));
    }

    #[test]
    fn short_rows_are_padded() {
        let text = render_table(&["A", "B"], &[&["x"]]);
        assert_eq!(text.lines().nth(2), Some("x   "));
    }
}
