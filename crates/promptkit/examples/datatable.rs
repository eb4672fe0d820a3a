//! Example browsing a paged table.
//!
//! Run with: cargo run --example datatable
//!
//! Arrows move between rows and pages, `/` searches, `j` jumps to a page and
//! `q` quits.

use promptkit::prelude::*;

const FIRST: [&str; 8] = ["Taylor", "Jess", "Nuno", "James", "Dries", "Mior", "Joe", "Tim"];
const LAST: [&str; 5] = ["Otwell", "Archer", "Maduro", "Brooks", "Vints"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<Vec<String>> = (0..40)
        .map(|i| {
            let first = FIRST[i % FIRST.len()];
            let last = LAST[i % LAST.len()];
            vec![
                (i + 1).to_string(),
                format!("{first} {last}"),
                format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
            ]
        })
        .collect();

    match DataTable::new(rows).with_headers(["ID", "Name", "Email"]).prompt() {
        Ok(row) => note(&format!("You picked {}", row.join(", ")))?,
        Err(PromptError::Cancelled) => std::process::exit(1),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
