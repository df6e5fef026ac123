/// Line-by-line comparison of normalized expected and received output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub summary_lines: Vec<String>,
}

impl LineDiff {
    pub fn render(&self) -> String {
        self.summary_lines.join("\n")
    }
}

const MISSING: &str = "<missing>";

pub fn diff_lines(expected: &str, received: &str) -> LineDiff {
    let exp: Vec<&str> = expected.lines().collect();
    let got: Vec<&str> = received.lines().collect();
    let mut lines = Vec::new();

    for n in 0..exp.len().max(got.len()) {
        let e = exp.get(n).copied();
        let r = got.get(n).copied();
        if e != r {
            lines.push(format!(
                "line {}: expected {} / received {}",
                n + 1,
                quoted(e),
                quoted(r)
            ));
        }
    }

    LineDiff {
        summary_lines: lines,
    }
}

fn quoted(line: Option<&str>) -> String {
    match line {
        Some(l) => format!("{l:?}"),
        None => MISSING.to_string(),
    }
}
