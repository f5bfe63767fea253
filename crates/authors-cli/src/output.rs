//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::Result;
use serde::Serialize;

use authors_core::{alias, Author, SortMode};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// JSON shape of one author as shown to the user
#[derive(Debug, Serialize)]
struct AuthorView<'a> {
    id: &'a str,
    name: &'a str,
    alias: String,
    alias_fragment: Option<&'a str>,
    copyable_alias: Option<String>,
    bio: &'a str,
    follower_count: u64,
    joined_at: String,
    tags: &'a [String],
    followed: bool,
}

impl<'a> AuthorView<'a> {
    fn new(author: &'a Author, followed: bool) -> Self {
        Self {
            id: &author.id,
            name: &author.name,
            alias: author.full_alias(),
            alias_fragment: author.alias_fragment.as_ref().map(|f| f.as_str()),
            copyable_alias: alias::copyable(author.alias_fragment.as_ref().map(|f| f.as_str())),
            bio: &author.bio,
            follower_count: author.follower_count,
            joined_at: author.joined_at.format("%Y-%m-%d").to_string(),
            tags: &author.tags,
            followed,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single author with full details
    pub fn print_author(&self, author: &Author, followed: bool) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", author.id);
                println!("Name:      {}", author.name);
                match alias::copyable(author.alias_fragment.as_ref().map(|f| f.as_str())) {
                    Some(full) => println!("Alias:     {}", full),
                    None => println!("Alias:     {} (not set)", author.full_alias()),
                }
                println!("Followers: {}", format_count(author.follower_count));
                println!("Since:     {}", author.joined_at.format("%Y-%m-%d"));
                if !author.tags.is_empty() {
                    println!("Tags:      {}", author.tags.join(", "));
                }
                println!("Following: {}", if followed { "yes" } else { "no" });
                if !author.bio.is_empty() {
                    println!();
                    println!("{}", author.bio);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&AuthorView::new(author, followed))?
                );
            }
            OutputFormat::Quiet => {
                println!("{}", author.id);
            }
        }
        Ok(())
    }

    /// Print a list of authors with their follow flag
    ///
    /// `sort` is named in the human summary line when the list was sorted.
    pub fn print_authors(
        &self,
        authors: &[(&Author, bool)],
        query: &str,
        sort: Option<SortMode>,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if authors.is_empty() {
                    if query.trim().is_empty() {
                        println!("No authors found.");
                    } else {
                        println!("No results for \u{201c}{}\u{201d}.", query);
                    }
                    return Ok(());
                }
                for (author, followed) in authors {
                    let marker = if *followed { "✓" } else { " " };
                    println!(
                        "{} {:<4} | {:<20} | {:<28} | {:>7}",
                        marker,
                        author.id,
                        truncate(&author.name, 20),
                        truncate(&author.full_alias(), 28),
                        format_count(author.follower_count)
                    );
                }
                match sort {
                    Some(mode) => println!("\n{} author(s), {}", authors.len(), mode.label()),
                    None => println!("\n{} author(s)", authors.len()),
                }
            }
            OutputFormat::Json => {
                let views: Vec<_> = authors
                    .iter()
                    .map(|(author, followed)| AuthorView::new(author, *followed))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            }
            OutputFormat::Quiet => {
                for (author, _) in authors {
                    println!("{}", author.id);
                }
            }
        }
        Ok(())
    }

    /// Print the live preview for an alias draft
    pub fn print_alias_preview(&self, draft: &str, error: Option<&str>) {
        let preview = alias::render(Some(draft));
        match self.format {
            OutputFormat::Human => {
                println!("Preview: {}", preview);
                if let Some(reason) = error {
                    println!("✗ {}", reason);
                } else {
                    println!("✓ Valid");
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "preview": preview,
                        "valid": error.is_none(),
                        "error": error
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}", preview);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Group digits in thousands: 12450 -> "12,450"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
