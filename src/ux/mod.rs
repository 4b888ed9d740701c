use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::apply::{WriteKind, WriteSummary};
use crate::errors::GenError;
use crate::tree::{self, DirectoryNode};
use crate::wire::{FileSet, GeneratedFile};

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

/// Ask for the role description on stdin; one line, or everything up to EOF
/// when piped.
pub fn read_description() -> io::Result<String> {
    let stdin = io::stdin();
    if is_terminal() {
        print!("{} ", "Describe the Ansible role:".cyan().bold());
        let _ = io::stdout().flush();
        let mut s = String::new();
        stdin.lock().read_line(&mut s)?;
        Ok(s)
    } else {
        let mut s = String::new();
        for line in stdin.lock().lines() {
            s.push_str(&line?);
            s.push('\n');
        }
        Ok(s)
    }
}

fn is_terminal() -> bool {
    use std::io::IsTerminal;
    io::stdin().is_terminal()
}

fn stdout_is_terminal() -> bool {
    use std::io::IsTerminal;
    io::stdout().is_terminal()
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn print_error(err: &GenError) {
    println!("\n{}", "┏━━━━━━━━━━━━━━━━━━━━━━━━ An Error Occurred ━━━━━━━━━━━━━━━━━━━━━━━━┓".red().bold());
    println!("  {}", format!("Generation failed: {err}").red());
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".red().bold());
}

/// Coloured tree listing; the selected file is highlighted. Piped output
/// gets the plain listing.
pub fn print_tree(root: &DirectoryNode<'_>, selected: Option<&str>) {
    println!("\n{}", "=== FILES ===".bold());
    if !stdout_is_terminal() {
        print!("{}", tree::render_plain(root));
        return;
    }
    for (depth, node) in root.walk() {
        let pad = "  ".repeat(depth);
        match node.as_file() {
            None => println!("{pad}{}", format!("{}/", node.name()).cyan().bold()),
            Some(file) if Some(file.path.as_str()) == selected => {
                println!("{pad}{} {}", node.name().black().on_cyan(), "◀".cyan())
            }
            Some(_) => println!("{pad}{}", node.name()),
        }
    }
}

pub fn print_file(file: &GeneratedFile) {
    println!("\n{}", format!("─── {} ───", file.path).cyan().bold());
    if file.content.is_empty() {
        println!("{}", "(empty file)".dimmed());
    } else {
        println!("{}", file.content.trim_end_matches('\n'));
    }
    println!();
}

pub fn print_generation_dashboard(files: &FileSet, root: &DirectoryNode<'_>) {
    let dupes = files.len() - root.file_count();
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━━ Generated ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}   {}: {}   {}: {}",
        "Role".green().bold(), files.root_name().unwrap_or("-"),
        "Files".cyan().bold(), root.file_count(),
        "Dirs".cyan().bold(), root.dir_count(),
        "Size".bold(), format_size(files.total_bytes(), DECIMAL)
    );
    if dupes > 0 {
        println!("  {}", format!("{dupes} duplicate path(s); later content kept").yellow());
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

pub fn print_archive_saved(path: &Path, bytes: usize) {
    println!(
        "{} {}  ({})",
        "[ZIP]".green().bold(),
        path.display(),
        format_size(bytes, DECIMAL)
    );
}

pub fn print_write_dashboard(root: &Path, sum: &WriteSummary, dry: bool) {
    let title = if dry { "Extract (dry run)" } else { "Extract" };
    println!("\n{} {}", format!("[{title}]").bold(), root.display());
    println!(
        "  {}: {}   {}: {}   {}: {}   {}: {}",
        "Created".green().bold(), sum.created,
        "Overwritten".yellow().bold(), sum.overwritten,
        "Unchanged".dimmed(), sum.unchanged,
        "Bytes".bold(), format_size(sum.bytes_written, DECIMAL)
    );
    for d in sum.details.iter().filter(|d| d.kind == WriteKind::Overwritten) {
        println!("  {} {}", "~".yellow(), d.path.display());
    }
}
