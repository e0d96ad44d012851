//! Plain-text output

use ldex_model::{CatchStatus, BOX_COLUMNS};
use ldex_projector::{BoxView, CollectionStats, Page, TrackedEntry};
use std::fmt::Write;

const CELL_WIDTH: usize = 16;

fn marker(status: CatchStatus) -> char {
    match status {
        CatchStatus::NotCaught => ' ',
        CatchStatus::Caught => 'x',
        CatchStatus::ReadyToEvolve => 'e',
    }
}

fn cell(slot: Option<&TrackedEntry>) -> String {
    let Some(tracked) = slot else {
        return format!("{:<CELL_WIDTH$}", "  -");
    };
    let mut name = tracked.entry.display_name();
    if name.chars().count() > CELL_WIDTH - 4 {
        name = name.chars().take(CELL_WIDTH - 5).collect();
        name.push('~');
    }
    format!("[{}] {:<width$}", marker(tracked.status()), name, width = CELL_WIDTH - 4)
}

/// Box as a 5 x 6 table
pub(crate) fn box_view(view: &BoxView) -> String {
    let mut out = format!("Box {} of {}\n", view.box_number, view.total_boxes);
    for row in view.slots.chunks(BOX_COLUMNS as usize) {
        let line: Vec<String> = row.iter().map(|slot| cell(slot.as_ref())).collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }
    out
}

/// One line per entry
pub(crate) fn page(page: &Page) -> String {
    let mut out = String::new();
    for tracked in &page.items {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:<16} box {} row {} col {}",
            tracked.sequence,
            tracked.entry.display_name(),
            tracked.status(),
            tracked.placement.page,
            tracked.placement.row,
            tracked.placement.column,
        );
    }
    let _ = writeln!(
        out,
        "page {} of {} ({} entries)",
        page.page, page.total_pages, page.total_items
    );
    out
}

pub(crate) fn stats(stats: &CollectionStats) -> String {
    format!(
        "caught {}/{} ({}%), {} ready to evolve, {} remaining\n",
        stats.caught,
        stats.total,
        stats.percent_complete,
        stats.ready_to_evolve,
        stats.remaining()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldex_model::{Universe, BOX_CAPACITY};
    use ldex_test_utils::{national_catalog, TestBed};

    #[tokio::test]
    async fn box_renders_five_rows() {
        let bed = TestBed::new(national_catalog(27));
        let collection = bed.collection(Universe::national()).await;
        let view = bed.projector.box_view(collection, bed.user, 1).await.unwrap();
        assert_eq!(view.slots.len(), BOX_CAPACITY as usize);

        let text = box_view(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Box 1 of 1");
        assert!(lines[5].contains("[ ] Pikachu"));
        assert!(lines[5].ends_with('-'));
    }

    #[test]
    fn stats_line() {
        let stats = CollectionStats {
            total: 4,
            caught: 2,
            ready_to_evolve: 1,
            percent_complete: 50,
        };
        assert_eq!(
            super::stats(&stats),
            "caught 2/4 (50%), 1 ready to evolve, 2 remaining\n"
        );
    }
}
