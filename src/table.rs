/*!
 * Plain-text tables for console output
 */

use itertools::Itertools;

/// Renders `rows` under `headers`, prefixed with a `#` column counting from 1.
///
/// ```text
/// #  Name  Score
/// -  ----  -----
/// 1  Ada   35
/// ```
pub fn numbered_table<R>(headers: &[&str], rows: &[R]) -> String
where
    R: AsRef<[String]>,
{
    let lines = std::iter::once(header_row(headers))
        .chain(rows.iter().enumerate().map(|(i, row)| {
            std::iter::once((i + 1).to_string()).chain(row.as_ref().iter().cloned()).collect()
        }))
        .collect::<Vec<Vec<String>>>();

    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths = (0..columns)
        .map(|c| lines.iter().filter_map(|l| l.get(c)).map(|s| s.chars().count()).max().unwrap_or(0))
        .collect::<Vec<_>>();
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();

    std::iter::once(&lines[0])
        .chain(std::iter::once(&rule))
        .chain(lines[1..].iter())
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n")
}

fn header_row(headers: &[&str]) -> Vec<String> {
    std::iter::once("#").chain(headers.iter().copied()).map(str::to_owned).collect()
}

/// `"andruid kerne"` -> `"A.K."`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .map(|c| format!("{}.", c))
        .collect()
}
