use colored::Colorize;
use statekit::ResourceState;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a step indicator
pub fn step(num: usize, total: usize, msg: &str) {
    println!("{} {}", format!("[{}/{}]", num, total).blue().bold(), msg);
}

// ============================================================================
// Resource Table
// ============================================================================

const TYPE_WIDTH: usize = 19;
const COUNT_WIDTH: usize = 5;
const IDS_WIDTH: usize = 26;

/// Join IDs for the table's IDs column, truncating long lists.
pub fn format_ids(ids: &[String]) -> String {
    if ids.is_empty() {
        return "None".to_string();
    }

    let joined = ids.join(", ");
    if joined.chars().count() > IDS_WIDTH {
        let head: String = joined.chars().take(IDS_WIDTH - 3).collect();
        format!("{head}...")
    } else {
        joined
    }
}

fn border(left: char, mid: char, right: char) -> String {
    format!(
        "{left}{}{mid}{}{mid}{}{right}",
        "─".repeat(TYPE_WIDTH + 2),
        "─".repeat(COUNT_WIDTH + 2),
        "─".repeat(IDS_WIDTH + 2),
    )
}

/// Print one row of the resource table
pub fn resource_row(resource_type: &str, ids: &[String]) {
    let count = format!("{:<COUNT_WIDTH$}", ids.len());
    let count = if ids.is_empty() {
        count.yellow().bold()
    } else {
        count.green().bold()
    };

    println!(
        "│ {:<TYPE_WIDTH$} │ {} │ {:<IDS_WIDTH$} │",
        resource_type,
        count,
        format_ids(ids)
    );
}

/// Print the full resource status table
pub fn resource_table(state: &ResourceState) {
    println!("{}", border('┌', '┬', '┐'));
    println!(
        "│ {:<TYPE_WIDTH$} │ {:<COUNT_WIDTH$} │ {:<IDS_WIDTH$} │",
        "Resource Type", "Count", "IDs"
    );
    println!("{}", border('├', '┼', '┤'));
    for (kind, ids) in state.categories() {
        resource_row(kind.label(), ids);
    }
    println!("{}", border('└', '┴', '┘'));
}

/// Print the automator banner
pub fn banner() {
    println!(
        "{}",
        r#"
   ___ _      _____    ___       __                   __
  / _ | | /| / / __/  / _ |__ __/ /____  __ _  ___ _/ /____  ____
 / __ | |/ |/ /\ \   / __ / // / __/ _ \/  ' \/ _ `/ __/ _ \/ __/
/_/ |_|__/|__/___/  /_/ |_\_,_/\__/\___/_/_/_/\_,_/\__/\___/_/
"#
        .cyan()
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_format_ids_empty() {
        assert_eq!(format_ids(&[]), "None");
    }

    #[test]
    fn test_format_ids_short() {
        assert_eq!(format_ids(&ids(&["b-1", "b-2"])), "b-1, b-2");
    }

    #[test]
    fn test_format_ids_exact_width() {
        // 26 characters: not truncated
        let two = ids(&["i-0123456789", "sg-123456789"]);
        assert_eq!(format_ids(&two).len(), 26);
        assert_eq!(format_ids(&two), "i-0123456789, sg-123456789");
    }

    #[test]
    fn test_format_ids_truncated() {
        let long = ids(&["i-0a1b2c3d4e5f60718", "i-0f9e8d7c6b5a40312"]);
        let shown = format_ids(&long);
        assert_eq!(shown, "i-0a1b2c3d4e5f60718, i-...");
        assert_eq!(shown.chars().count(), 26);
    }

    #[test]
    fn test_format_ids_multibyte() {
        let wide = ids(&["ééééééééééééééééééééééééééééé"]);
        let shown = format_ids(&wide);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), 26);
    }

    #[test]
    fn test_border_width() {
        let top = border('┌', '┬', '┐');
        assert_eq!(top.chars().count(), TYPE_WIDTH + COUNT_WIDTH + IDS_WIDTH + 10);
        assert!(top.starts_with('┌'));
        assert!(top.ends_with('┐'));
    }
}
