use colored::Colorize;
use notetree::error::Result;
use notetree::stages::{ExportReport, Message, MessageLevel};

pub(super) fn print_messages(messages: &[Message], quiet: bool) {
    for message in messages {
        match message.level {
            MessageLevel::Info if !quiet => println!("{}", message.content.dimmed()),
            MessageLevel::Success if !quiet => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            _ => {}
        }
    }
}

pub(super) fn print_summary(report: &ExportReport) {
    let rows = [
        ("folders", report.folders),
        ("notes", report.notes),
        ("resources", report.resources),
        ("tags", report.tags),
        ("tag links", report.associations_linked),
        ("links rewritten", report.links_rewritten),
        ("files copied", report.resource_files_copied),
    ];
    for (label, count) in rows {
        println!("  {:<16} {}", label.dimmed(), count);
    }
}

pub(super) fn print_json(report: &ExportReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
