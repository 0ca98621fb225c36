use itertools::Itertools;

// Right-align every column to its widest entry, entries separated by one space
pub fn align_columns(rows: &[Vec<String>]) -> Vec<String> {
    let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|r| {
            r.iter()
                .zip(widths.iter())
                .map(|(s, w)| format!("{:>w$}", s, w = *w))
                .join(" ")
        })
        .collect()
}

// Wrap already aligned rows as `[[..]\n [..]]`
pub fn bracketed(lines: &[String]) -> String {
    if lines.is_empty() {
        return "[]".into();
    }
    let body = lines.iter().map(|l| format!("[{}]", l)).join("\n ");
    format!("[{}]", body)
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
