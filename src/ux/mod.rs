use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::bundle::{GeneratedBundle, TemplateKind};
use crate::export::{ArchiveSummary, WriteSummary};
use crate::history::HistoryEntry;
use crate::wizard::Step;

pub fn show_steps(current: &Step) {
    let labels = ["Describe", "Template", "Building", "Deploy"];
    let line = labels
        .iter()
        .enumerate()
        .map(|(i, l)| {
            let tag = format!("{}. {}", i + 1, l);
            match (i as u8).cmp(&current.index()) {
                std::cmp::Ordering::Less => tag.green().to_string(),
                std::cmp::Ordering::Equal => tag.bold().underline().to_string(),
                std::cmp::Ordering::Greater => tag.dimmed().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("  >  ");
    println!("\n{line}");
}

/// Reads one line; `None` on EOF.
pub fn ask(prompt: &str) -> Option<String> {
    print!("{} ", prompt.bold());
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().lock().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(s.trim_end_matches(['\r', '\n']).to_string()),
    }
}

pub fn confirm(prompt: &str) -> bool {
    match ask(&format!("{prompt} [y/N]:")) {
        Some(ans) => {
            let ans = ans.trim().to_lowercase();
            ans == "y" || ans == "yes"
        }
        None => false,
    }
}

pub fn show_templates() {
    println!("\n{}", "Choose a template:".bold());
    for (i, kind) in TemplateKind::ALL.iter().enumerate() {
        println!("  {}. {:<20} {}", i + 1, kind.title().cyan().bold(), kind.summary().dimmed());
    }
}

/// Accepts a number from the list or a template name; empty means custom.
pub fn parse_template_choice(input: &str) -> TemplateKind {
    let t = input.trim();
    if t.is_empty() {
        return TemplateKind::default();
    }
    match t.parse::<usize>() {
        Ok(n) if (1..=TemplateKind::ALL.len()).contains(&n) => TemplateKind::ALL[n - 1],
        _ => TemplateKind::parse_lenient(t),
    }
}

const PHASES: [(&str, u64, u64); 4] = [
    ("Analyzing your description", 20, 1000),
    ("Generating your app", 40, 0),
    ("Processing and optimizing code", 70, 1000),
    ("Finalizing your accessible application", 90, 800),
];

/// Runs `work` while a progress bar walks through the building phases.
/// The pauses only pace the display; `fast` skips them.
pub async fn building<F, T>(fast: bool, work: F) -> T
where
    F: Future<Output = T>,
{
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let pause = |ms: u64| async move {
        if !fast && ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    };

    let (msg, pos, ms) = PHASES[0];
    pb.set_message(msg);
    pb.set_position(pos);
    pause(ms).await;

    let (msg, pos, _) = PHASES[1];
    pb.set_message(msg);
    pb.set_position(pos);
    let out = work.await;

    for (msg, pos, ms) in &PHASES[2..] {
        pb.set_message(*msg);
        pb.set_position(*pos);
        pause(*ms).await;
    }
    pb.set_position(100);
    pb.finish_with_message("Complete!");
    out
}

pub fn show_bundle(bundle: &GeneratedBundle, prompt: &str) {
    println!("\n{}", format!("{} is ready!", bundle.name()).green().bold());
    println!("  {} \"{}\"", "Your request:".bold(), prompt);
    println!("  {} {}", "Generated:".bold(), bundle.description());
    println!("  {} {}", "Template:".bold(), bundle.template_kind().title());
    println!("\n{}", "Files:".bold());
    for (name, body) in bundle.files() {
        println!("  {:<24} {}", name, format_size(body.len() as u64, DECIMAL).dimmed());
    }
    println!("\n{}", "How to use:".bold());
    for line in bundle.instructions().lines() {
        println!("  {line}");
    }
}

pub fn show_archive(sum: &ArchiveSummary) {
    println!(
        "\n{} {} ({} entries, {})",
        "Downloaded:".green().bold(),
        sum.path.display(),
        sum.entries,
        format_size(sum.bytes, DECIMAL)
    );
}

pub fn show_unpacked(sum: &WriteSummary) {
    println!(
        "{} {} files into {} ({})",
        "Unpacked:".green().bold(),
        sum.written.len(),
        sum.dir.display(),
        format_size(sum.bytes, DECIMAL)
    );
}

/// Export problems are not fatal; the bundle can be exported again.
pub fn show_retryable(what: &str, err: &dyn std::fmt::Display) {
    eprintln!("{} {what} failed: {err}. Please try again.", "warning:".yellow().bold());
}

pub fn show_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("Your generated tools will appear here.");
        return;
    }
    println!("{}", "History".bold());
    for e in entries {
        println!(
            "  {}  {:<28} {:<20} {}",
            e.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            e.name.bold(),
            e.template.title().cyan(),
            e.description
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_choice_by_number_or_name() {
        assert_eq!(parse_template_choice("1"), TemplateKind::ScreenReader);
        assert_eq!(parse_template_choice(" 3 "), TemplateKind::Medication);
        assert_eq!(parse_template_choice("planner"), TemplateKind::Planner);
        assert_eq!(parse_template_choice(""), TemplateKind::Custom);
        assert_eq!(parse_template_choice("9"), TemplateKind::Custom);
    }

    #[tokio::test]
    async fn building_returns_work_output() {
        let out = building(true, async { 41 + 1 }).await;
        assert_eq!(out, 42);
    }
}
