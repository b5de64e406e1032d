use std::fmt;

/// Box-drawn table with a column of row labels
///
/// The label column is left-aligned, the other columns are aligned as
/// requested when they are declared.
pub struct Table {
    title: Option<String>,
    grid: GridFmt,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    right: bool,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

struct GridFmt {
    labels: ColFmt,
    columns: Vec<ColFmt>,
}

/// Alignment of a data column
#[derive(Debug, Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

impl Table {
    /// `corner` heads the label column
    pub fn new<S>(corner: S, columns: &[(&str, Align)]) -> Self
    where
        S: ToString,
    {
        let columns = columns
            .iter()
            .map(|(label, align)| {
                ColFmt::with_label(BoxFmt::from(label.to_string()), matches!(align, Align::Right))
            })
            .collect::<Vec<_>>();
        Self {
            title: None,
            grid: GridFmt::with_columns(ColFmt::with_label(BoxFmt::from(corner.to_string()), false), columns),
        }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    /// Add a line, missing cells are left blank and extra cells are dropped
    pub fn push<S>(&mut self, label: S, cells: Vec<String>)
    where
        S: ToString,
    {
        self.grid.push_line(BoxFmt::from(label.to_string()), cells);
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }

    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let pad = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", pad, self.text)
        } else {
            write!(f, " {}{} ", self.text, pad)
        }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt, right: bool) -> Self {
        Self {
            width: label.width,
            right,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }

    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, false)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize) -> fmt::Result {
        self.boxes[idx].write(f, self.width, self.right)
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

impl GridFmt {
    fn with_columns(labels: ColFmt, columns: Vec<ColFmt>) -> Self {
        Self { labels, columns }
    }

    fn push_line(&mut self, label: BoxFmt, cells: Vec<String>) {
        self.labels.push(label);
        let mut cells = cells.into_iter();
        for col in &mut self.columns {
            col.push(BoxFmt::from(cells.next().unwrap_or_default()));
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{}", title)?;
        }
        write!(f, "{}", self.grid)
    }
}

impl fmt::Display for GridFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // upper border
        write!(f, "{}", ULCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", LOJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", URCORNER)?;
        // title line
        write!(f, "{}", VLINE)?;
        self.labels.write_label(f)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        write!(f, "{}", RTJOIN)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", CROSS)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", LTJOIN)?;

        // main block
        for idx in 0..self.labels.len() {
            write!(f, "{}", VLINE)?;
            self.labels.write_item(f, idx)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        // lower border
        write!(f, "{}", DLCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", HIJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", DRCORNER)?;
        Ok(())
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout() {
        let mut table = Table::new("#", &[("Name", Align::Left), ("Amount", Align::Right)])
            .with_title("Expenses");
        table.push(1, vec!["Rent".to_string(), "45,000".to_string()]);
        table.push(2, vec!["Café".to_string()]);
        let out = table.to_string();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Expenses");
        assert_eq!(lines[1], "┌───┬──────┬────────┐");
        assert_eq!(lines[2], "│ # │ Name │ Amount │");
        assert_eq!(lines[4], "│ 1 │ Rent │ 45,000 │");
        assert_eq!(lines[5], "│ 2 │ Café │        │");
        assert_eq!(lines[6], "└───┴──────┴────────┘");
    }
}
