use colored::Colorize;
use seocontent::commands::helpers::describe_row;
use seocontent::commands::{CmdMessage, CmdResult, MessageLevel};
use seocontent::model::{SeoField, SeoRow};
use seocontent::publish::MemorySink;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 6;
const TARGET_WIDTH: usize = 28;

/// Prints everything a command produced. `detailed` shows each listed entry
/// field by field instead of one line per entry.
pub(super) fn print_result(result: &CmdResult, detailed: bool) {
    if detailed {
        print_entry_details(&result.listed_entries);
    } else {
        print_entries(&result.listed_entries);
    }
    if let Some(expanded) = &result.expanded {
        println!("{}", expanded);
    }
    if let Some(sink) = &result.published {
        print_published(sink);
    }
    print_properties(&result.properties);
    print_messages(&result.messages);
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_entries(rows: &[SeoRow]) {
    for row in rows {
        println!("{}", entry_line(row));
    }
}

fn entry_line(row: &SeoRow) -> String {
    let id = format!("{:>width$}  ", row.id, width = ID_WIDTH - 2);
    let target = pad_to_width(&truncate_to_width(&describe_row(row), TARGET_WIDTH), TARGET_WIDTH);
    let available = LINE_WIDTH.saturating_sub(ID_WIDTH + TARGET_WIDTH + 1);
    let title = truncate_to_width(row.text.title.as_deref().unwrap_or(""), available);

    let target = if row.is_global {
        target.yellow()
    } else {
        target.normal()
    };
    format!("{}{} {}", id.dimmed(), target, title)
}

fn print_entry_details(rows: &[SeoRow]) {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {}",
            format!("#{}", row.id).dimmed(),
            describe_row(row).bold()
        );
        for field in SeoField::ALL {
            let value = row.text.get(field).unwrap_or("");
            println!("  {:<12} {}", format!("{}:", field), value);
        }
    }
}

fn print_published(sink: &MemorySink) {
    if let Some(title) = &sink.title {
        println!("{} {}", "title:".dimmed(), title);
    }
    for (name, content) in &sink.meta {
        println!("<meta name=\"{}\" content=\"{}\">", name, escape_attr(content));
    }
}

fn print_properties(properties: &[(String, String)]) {
    let key_width = properties.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    for (key, value) in properties {
        println!("{} = {}", pad_to_width(key, key_width), value);
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
