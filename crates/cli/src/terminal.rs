use std::io::{self, BufRead, Write};

use mapty_core::{MapSurface, WorkoutRow};
use mapty_protocol::{Bounds, Coords, MarkerIcon};

/// Stand-in map for the terminal: there is nothing to draw, so markers are
/// just numbered and logged.
#[derive(Debug, Default)]
pub struct TerminalMap {
    next_handle: usize,
}

impl MapSurface for TerminalMap {
    type Handle = usize;

    fn create_marker(&mut self, coords: Coords, icon: MarkerIcon, label: &str) -> usize {
        self.next_handle += 1;
        tracing::debug!(
            handle = self.next_handle,
            lat = coords.lat,
            lng = coords.lng,
            class = icon.popup_class(),
            label,
            "marker created"
        );
        self.next_handle
    }

    fn remove_marker(&mut self, handle: usize) {
        tracing::debug!(handle, "marker removed");
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        let center = bounds.center();
        tracing::debug!(lat = center.lat, lng = center.lng, "map fitted");
    }

    fn pan_to(&mut self, coords: Coords) {
        tracing::debug!(lat = coords.lat, lng = coords.lng, "map panned");
    }
}

/// Print the workout list, one line per workout.
pub fn print_rows(rows: &[WorkoutRow]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if rows.is_empty() {
        writeln!(out, "No workouts yet.")?;
        return Ok(());
    }
    for row in rows {
        let metrics: Vec<String> = row
            .metrics
            .iter()
            .map(|m| format!("{} {} {}", m.glyph, m.value, m.unit))
            .collect();
        writeln!(
            out,
            "{:<11} {} {:<22} {}",
            row.id,
            row.icon.glyph(),
            row.description,
            metrics.join("  ")
        )?;
    }
    Ok(())
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
pub fn ask(question: &str) -> io::Result<bool> {
    let mut err = io::stderr().lock();
    write!(err, "{question} [y/N] ")?;
    err.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
