mod config;
mod leaderboard;
mod list;
mod track;
mod untrack;
mod update;

pub use config::config;
pub use leaderboard::leaderboard;
pub use list::list;
pub use track::track;
pub use untrack::untrack;
pub use update::update;

/// Discord rejects embed descriptions longer than this many characters.
const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Join `lines` into an embed description that fits Discord's limit. Lines that do not fit
/// are replaced by a trailing count.
fn embed_description(lines: Vec<String>) -> String {
    fit_lines(lines, EMBED_DESCRIPTION_LIMIT)
}

fn fit_lines(lines: Vec<String>, limit: usize) -> String {
    // room for the "…and N more" line
    const FOOTER_RESERVE: usize = 24;

    let width = |line: &String| line.chars().count() + 1;
    let budget = if lines.iter().map(width).sum::<usize>() <= limit {
        limit
    } else {
        limit.saturating_sub(FOOTER_RESERVE)
    };

    let total = lines.len();
    let mut out = String::new();
    let mut used = 0;
    let mut shown = 0;
    for line in &lines {
        used += width(line);
        if used > budget {
            break;
        }
        out.push_str(line);
        out.push('\n');
        shown += 1;
    }

    if shown < total {
        out.push_str(&format!("…and {} more", total - shown));
    }
    out
}
