use std::io::Write;

use hostlog_core_types::{HostlogResult, Stats};

use crate::style;

/// Renders one console line: `[mode ...] name message`.
pub fn render(stats: &Stats) -> String {
    let mut line = String::new();
    if !stats.modes.is_empty() {
        line.push('[');
        line.push_str(&stats.modes.join(" "));
        line.push_str("] ");
    }
    let name = match stats.style.as_deref().and_then(style::builtin) {
        Some(style) => style.paint(&stats.name),
        None => stats.name.clone(),
    };
    // The primary `log` emitter prints its message bare.
    if stats.name != "log" || !stats.modes.is_empty() {
        line.push_str(&name);
        line.push(' ');
    }
    line.push_str(&stats.message());
    line
}

pub fn write_stats<W: Write>(writer: &mut W, stats: &Stats) -> HostlogResult<()> {
    writeln!(writer, "{}", render(stats))?;
    Ok(())
}

/// Writes `stats` to stdout.
pub fn print_stats(stats: &Stats) -> HostlogResult<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_stats(&mut lock, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_log_prints_message_only() {
        let stats = Stats::new("log", vec![json!("hello"), json!("world")]);
        assert_eq!(render(&stats), "hello world");
    }

    #[test]
    fn modes_and_style_prefix_the_line() {
        let stats = Stats::new("info", vec![json!("ready")])
            .with_modes(vec!["verbose".into()])
            .with_style(Some("cyan".into()));
        assert_eq!(render(&stats), "[verbose] \u{1b}[36minfo\u{1b}[39m ready");
    }

    #[test]
    fn write_stats_appends_newline() {
        let mut buffer = Vec::new();
        write_stats(&mut buffer, &Stats::new("warn", vec![json!(1)])).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "warn 1\n");
    }
}
