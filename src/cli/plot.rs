use std::path::Path;

use svg::{
    node::{
        element::{Line, Rectangle, Text},
        Text as TextNode,
    },
    Document,
};

use crate::lib::{
    entry::{Amount, EntryKind},
    habit::Habit,
    state::AppState,
};

/// SVG chart of the ledger totals and of the habit chains
pub struct Plotter<'d> {
    state: &'d AppState,
}

impl<'d> Plotter<'d> {
    pub fn from(state: &'d AppState) -> Self {
        Self { state }
    }

    pub fn save<P>(&self, file: P) -> std::io::Result<()>
    where
        P: AsRef<Path>,
    {
        let document = self.document();
        svg::save(file.as_ref(), &document)?;
        tracing::info!(file = %file.as_ref().display(), "chart written");
        Ok(())
    }

    fn document(&self) -> Document {
        let bars = self.totals_plot();
        let chains = self.chains_plot();
        let fheight = BAR_HEIGHT + CHAIN_ROW * chains.rows.len().max(1) as f64 + 2.0 * GAP;
        let doc = bars.draw_bars(Document::new(), 0.0);
        chains
            .draw_gauges(doc, BAR_HEIGHT + 2.0 * GAP)
            .set("viewBox", (-MARGIN, -MARGIN, WIDTH + 2.0 * MARGIN, fheight + 2.0 * MARGIN))
    }

    fn totals_plot(&self) -> Plot<Amount> {
        let totals = self.state.totals();
        let mut plot = Plot::new();
        for kind in EntryKind::all() {
            plot.push(kind.to_string(), totals.of(kind));
        }
        plot.push("expense".to_string(), totals.expense);
        plot
    }

    fn chains_plot(&self) -> Plot<ChainProgress> {
        let mut plot = Plot::new();
        for h in self.state.habits.iter() {
            plot.push(h.name.clone(), ChainProgress::of(h));
        }
        plot
    }
}

#[derive(Debug)]
struct Plot<Y> {
    rows: Vec<(String, Y)>,
}

impl<Y> Plot<Y> {
    fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn push(&mut self, label: String, y: Y) {
        self.rows.push((label, y));
    }
}

#[derive(Debug, Clone, Copy)]
struct ChainProgress {
    /// fraction of the current stage already done
    done: f64,
    /// index of the stage, for the color
    stage: usize,
}

impl ChainProgress {
    fn of(habit: &Habit) -> Self {
        let stage = habit.stage as usize;
        let done = match habit.stage.length() {
            Some(len) => (habit.progress as f64 / len as f64).min(1.0),
            None => 1.0,
        };
        Self { done, stage }
    }
}

trait Scalar {
    fn to_scalar(&self) -> f64;
}

impl Scalar for Amount {
    fn to_scalar(&self) -> f64 {
        self.0
    }
}

fn label(x: f64, y: f64, txt: &str) -> Text {
    Text::new()
        .set("x", x)
        .set("y", y)
        .set("font-size", 14)
        .set("font-family", "sans-serif")
        .add(TextNode::new(txt))
}

impl<Y> Plot<Y>
where
    Y: Scalar,
{
    /// Vertical bars, negative values hang below the axis
    fn draw_bars(&self, doc: Document, top: f64) -> Document {
        let (ymin, ymax) = self
            .rows
            .iter()
            .map(|(_, y)| y.to_scalar())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
        let span = if ymax - ymin > 0.0 { ymax - ymin } else { 1.0 };
        let plot_height = BAR_HEIGHT - LABEL_ROOM;
        let resize_y = |y: f64| top + (ymax - y) / span * plot_height;
        let slot = WIDTH / self.rows.len().max(1) as f64;
        let zero = resize_y(0.0);
        let doc = self
            .rows
            .iter()
            .enumerate()
            .fold(doc, |doc, (i, (name, y))| {
                let y = resize_y(y.to_scalar());
                let x = i as f64 * slot + slot * 0.1;
                let bar = Rectangle::new()
                    .set("x", x)
                    .set("y", y.min(zero))
                    .set("width", slot * 0.8)
                    .set("height", (y - zero).abs())
                    .set("fill", COLORS[i % COLORS.len()]);
                doc.add(bar).add(label(x, top + BAR_HEIGHT - 4.0, name))
            });
        let xaxis = Line::new()
            .set("x1", 0.0)
            .set("x2", WIDTH)
            .set("y1", zero)
            .set("y2", zero)
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        doc.add(xaxis)
    }
}

impl Plot<ChainProgress> {
    /// One horizontal gauge per habit
    fn draw_gauges(&self, doc: Document, top: f64) -> Document {
        if self.rows.is_empty() {
            return doc.add(label(0.0, top + CHAIN_ROW / 2.0, "No habits tracked"));
        }
        let gauge = WIDTH - NAME_ROOM;
        self.rows
            .iter()
            .enumerate()
            .fold(doc, |doc, (i, (name, p))| {
                let y = top + i as f64 * CHAIN_ROW;
                let frame = Rectangle::new()
                    .set("x", NAME_ROOM)
                    .set("y", y)
                    .set("width", gauge)
                    .set("height", CHAIN_ROW * 0.6)
                    .set("fill", "none")
                    .set("stroke", "black")
                    .set("stroke-width", STROKE_WIDTH);
                let fill = Rectangle::new()
                    .set("x", NAME_ROOM)
                    .set("y", y)
                    .set("width", gauge * p.done)
                    .set("height", CHAIN_ROW * 0.6)
                    .set("fill", COLORS[p.stage % COLORS.len()]);
                doc.add(fill)
                    .add(frame)
                    .add(label(0.0, y + CHAIN_ROW * 0.5, name))
            })
    }
}

const WIDTH: f64 = 1000.0;
const BAR_HEIGHT: f64 = 400.0;
const LABEL_ROOM: f64 = 30.0;
const NAME_ROOM: f64 = 200.0;
const CHAIN_ROW: f64 = 40.0;
const GAP: f64 = 20.0;
const MARGIN: f64 = 20.0;
const STROKE_WIDTH: f64 = 2.0;

const COLORS: &[&str] = &["green", "cyan", "blue", "red", "orange", "purple", "yellow"];

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::habit::INDEPENDENT;

    #[test]
    fn chart_contents() {
        let mut state = AppState::default();
        state.add_entry("Job", Amount(5000.0), EntryKind::Income, "").unwrap();
        state.add_entry("Loan", Amount(-200.0), EntryKind::Debt, "").unwrap();
        state.start_habit("Read", INDEPENDENT).unwrap();
        let svg = Plotter::from(&state).document().to_string();
        assert!(svg.contains("income"));
        assert!(svg.contains("expense"));
        assert!(svg.contains("Read"));
        assert_eq!(svg.matches("<rect").count(), 5 + 2);
    }

    #[test]
    fn empty_state_still_draws() {
        let state = AppState::default();
        let svg = Plotter::from(&state).document().to_string();
        assert!(svg.contains("No habits tracked"));
    }

    #[test]
    fn saved_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        Plotter::from(&AppState::default()).save(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("<svg"));
    }

    #[test]
    fn chain_fraction() {
        let mut h = Habit::new("Walk", INDEPENDENT);
        h.progress = 7;
        let p = ChainProgress::of(&h);
        assert!((p.done - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(p.stage, 0);
    }
}
