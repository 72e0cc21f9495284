//! Fixed-width text table in the layout pandas uses for `to_string()`.

/// Row-labelled table; cells are right-aligned under their headers.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

impl TextTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<String>) {
        self.rows.push((label.into(), cells));
    }

    pub fn render(&self) -> String {
        let index_width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|(_, cells)| cells.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let mut header = " ".repeat(index_width);
        for (h, w) in self.headers.iter().zip(&widths) {
            header.push_str(&format!("  {:>w$}", h, w = *w));
        }
        lines.push(header);

        for (label, cells) in &self.rows {
            let mut line = format!("{:<w$}", label, w = index_width);
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                line.push_str(&format!("  {:>w$}", cell, w = *w));
            }
            lines.push(line);
        }

        lines.join("\n")
    }
}
