//! Shared CLI helpers — response printing, markup stripping, banner.

use colored::Colorize;

/// Render router markup for the terminal.
///
/// `<br>` becomes a newline, buttons become `[label]`, any other tag is
/// dropped and its text kept.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            // Unterminated tag: keep it verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let tag = rest[start + 1..start + len].trim().to_ascii_lowercase();
        match tag.split_whitespace().next().unwrap_or("") {
            "br" | "br/" => out.push('\n'),
            "button" => out.push('['),
            "/button" => out.push(']'),
            _ => {}
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

/// Print a router reply to stdout.
pub fn print_response(response: &str, model_used: Option<&str>) {
    println!();
    match model_used {
        Some(label) => println!("{}  {}", "🩺 Carebot".cyan().bold(), label.dimmed()),
        None => println!("{}", "🩺 Carebot".cyan().bold()),
    }
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{}", strip_markup(response));
    }
    println!();
}

/// Print the banner shown when a command starts.
pub fn print_banner(mode: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}  {}",
        "🩺 Carebot".cyan().bold(),
        version.dimmed(),
        mode.dimmed()
    );
    println!();
}

/// Print a "thinking" spinner placeholder (for non-log mode).
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_plain_text() {
        assert_eq!(strip_markup("Please enter a message."), "Please enter a message.");
    }

    #[test]
    fn strip_reply_with_button() {
        let text = "Rest well.<br><button onclick=\"handleChatbotOption('initial')\" class=\"x\">Back to Menu</button>";
        assert_eq!(strip_markup(text), "Rest well.\n[Back to Menu]");
    }

    #[test]
    fn strip_menu() {
        let menu = carebot_router::flows::menu();
        let plain = strip_markup(&menu);
        assert!(plain.starts_with("Please select an option:\n"));
        assert!(plain.contains("[Check Symptoms]"));
        assert!(plain.contains("[Talk to a Doctor]"));
        assert!(plain.contains("[Join Patient Community]"));
        assert!(!plain.contains('<'));
    }

    #[test]
    fn strip_unknown_tags_keeps_text() {
        assert_eq!(strip_markup("<b>bold</b> and <BR/>next"), "bold and \nnext");
    }

    #[test]
    fn strip_unterminated_tag() {
        assert_eq!(strip_markup("a < b"), "a < b");
    }
}
