use crate::simulation::engine::SimulationResult;

/// `count / iterations` as a percentage with one decimal
pub fn percentage(count: usize, iterations: usize) -> String {
    if iterations == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / iterations as f64)
}

fn cell(count: usize, iterations: usize) -> String {
    format!("{} ({}/{})", percentage(count, iterations), count, iterations)
}

/// Render results as a text table: one row per criterion, a final
/// `no match` row, one column per deck variant
pub fn format_table(result: &SimulationResult) -> String {
    let mut header = vec!["#".to_string(), "rules".to_string()];
    for (d, size) in result.deck_sizes.iter().enumerate() {
        if d == 0 {
            header.push(format!("main ({} cards)", size));
        } else {
            header.push(format!("alt.{} ({} cards)", d, size));
        }
    }

    let mut rows = Vec::with_capacity(result.criteria.len() + 1);
    for (c, name) in result.criteria.iter().enumerate() {
        let mut row = vec![(c + 1).to_string(), name.clone()];
        for d in 0..result.deck_count() {
            row.push(cell(result.count(c, d), result.iterations));
        }
        rows.push(row);
    }
    let mut no_match = vec!["---".to_string(), "no match".to_string()];
    for d in 0..result.deck_count() {
        no_match.push(cell(result.no_match(d), result.iterations));
    }
    rows.push(no_match);

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(&header, &widths));
    out.push_str(&format!("{:-<1$}\n", "", widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }
    out
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let cells: Vec<String> = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (value, width))| {
            // Numbers right-aligned, labels left-aligned
            if i < 2 {
                format!("{:<1$}", value, width)
            } else {
                format!("{:>1$}", value, width)
            }
        })
        .collect();
    format!("{}\n", cells.join("  ").trim_end())
}
