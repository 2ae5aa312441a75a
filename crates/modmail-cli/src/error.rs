use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("prefix") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Prefixes are 1 to 8 characters, e.g.:");
        eprintln!("  {} modmail config set-prefix '?'", "$".dimmed());
    }

    if msg.contains("log url") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Use a full URL including the scheme, e.g.:");
        eprintln!(
            "  {} modmail config set-log-url https://logs.example.com",
            "$".dimmed()
        );
    }

    if msg.contains("database") && msg.contains("lock") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Stop the running bot before editing its database.");
    }

    std::process::exit(1);
}
