use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use runebreak::optimizer::runner::SearchResult;
use runebreak::stats::LengthScore;
use runebreak::transpose::ProbeResult;

fn key_string(key: &[u8]) -> String {
    key.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn print_results(results: &[SearchResult], limit: usize) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#", "Score", "Len", "Op", "Key", "Rev", "Preview",
    ]);

    for (rank, r) in results.iter().take(limit).enumerate() {
        let mut flags = String::new();
        if !r.reversible {
            flags.push('!');
        }
        if r.partial {
            flags.push('~');
        }
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}{}", r.score, flags)).set_alignment(CellAlignment::Right),
            Cell::new(r.key_length).set_alignment(CellAlignment::Right),
            Cell::new(r.operation.to_string()),
            Cell::new(key_string(&r.key)),
            Cell::new(if r.reversible { "yes" } else { "NO" }),
            Cell::new(&r.plaintext_preview),
        ]);
    }
    println!("{table}");
    if results.iter().any(|r| r.partial) {
        println!("  (~ = budget expired, best-so-far result)");
    }
    if results.iter().any(|r| !r.reversible) {
        println!("  (! = failed the reversibility check; treat as a clue, not a solution)");
    }
}

pub fn print_length_analysis(ioc: &[LengthScore], kasiski: &[(usize, usize)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Key Length", "Avg Coset IoC"]);
    for s in ioc {
        table.add_row(vec![
            Cell::new(s.length).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", s.avg_coset_ioc)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\nCoset IoC by candidate key length:");
    println!("{table}");

    if kasiski.is_empty() {
        println!("\nKasiski: no repeated trigrams found.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Key Length", "Kasiski Votes"]);
    for &(length, votes) in kasiski.iter().take(10) {
        table.add_row(vec![
            Cell::new(length).set_alignment(CellAlignment::Right),
            Cell::new(votes).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\nKasiski divisor votes:");
    println!("{table}");
}

pub fn print_probes(probes: &[ProbeResult]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Reordering", "Score"]);
    for p in probes {
        table.add_row(vec![
            Cell::new(&p.description),
            Cell::new(format!("{:.1}", p.score)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\nTransposition probe:");
    println!("{table}");
}
