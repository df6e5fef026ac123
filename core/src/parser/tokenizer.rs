//! Quote-aware tokenizer for array literals such as `[[1,2],["a,b","c"]]`.
//!
//! Tracks bracket depth and whether the cursor is inside a double-quoted
//! string, so commas and brackets inside quotes stay part of the element.
//! Whitespace is dropped everywhere, quoted or not, so each element is a
//! single token. Nesting deeper than two levels is flattened into the enclosing row.

use crate::error::ParseError;

/// Shape of a parsed array value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayShape {
    /// A single row of values.
    Flat(Vec<String>),
    /// Two or more rows.
    Rows(Vec<Vec<String>>),
}

#[derive(Debug)]
enum Item {
    Scalar(String),
    Row(Vec<String>),
}

#[derive(Debug, Default)]
struct Element {
    buf: String,
    started: bool,
}

impl Element {
    fn push(&mut self, c: char) {
        self.buf.push(c);
        self.started = true;
    }

    fn take(&mut self) -> String {
        self.started = false;
        std::mem::take(&mut self.buf)
    }
}

/// True when `value` contains a `[` outside of double quotes.
pub fn is_array_literal(value: &str) -> bool {
    let mut in_quote = false;
    for c in value.chars() {
        match c {
            '"' => in_quote = !in_quote,
            '[' if !in_quote => return true,
            _ => {}
        }
    }
    false
}

pub fn tokenize_array(value: &str) -> Result<ArrayShape, ParseError> {
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut items: Vec<Item> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut elem = Element::default();
    let mut outer_comma = false;
    let mut row_comma = false;
    let mut after_row = false;

    for c in value.chars() {
        if in_quote {
            if c == '"' {
                in_quote = false;
            } else if !c.is_whitespace() {
                elem.push(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quote = true;
                elem.started = true;
            }
            c if c.is_whitespace() => {}
            '[' => {
                depth += 1;
                if depth == 2 {
                    if elem.started {
                        items.push(Item::Scalar(elem.take()));
                    }
                    row.clear();
                    row_comma = false;
                }
            }
            ']' => match depth {
                0 => {
                    return Err(ParseError::UnbalancedBrackets {
                        value: value.to_string(),
                    })
                }
                1 => {
                    if elem.started || (outer_comma && !after_row) {
                        items.push(Item::Scalar(elem.take()));
                    }
                    depth = 0;
                }
                2 => {
                    if elem.started || row_comma {
                        row.push(elem.take());
                    }
                    items.push(Item::Row(std::mem::take(&mut row)));
                    after_row = true;
                    depth = 1;
                }
                _ => depth -= 1,
            },
            ',' => match depth {
                0 => {}
                1 => {
                    if elem.started || !after_row {
                        items.push(Item::Scalar(elem.take()));
                    }
                    outer_comma = true;
                    after_row = false;
                }
                _ => {
                    row.push(elem.take());
                    row_comma = true;
                }
            },
            other => {
                if depth > 0 {
                    elem.push(other);
                }
            }
        }
    }

    if in_quote {
        return Err(ParseError::UnterminatedQuote {
            value: value.to_string(),
        });
    }
    if depth != 0 {
        return Err(ParseError::UnbalancedBrackets {
            value: value.to_string(),
        });
    }

    Ok(shape_of(items))
}

fn shape_of(items: Vec<Item>) -> ArrayShape {
    let mut nested = false;
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(items.len());
    for it in items {
        match it {
            Item::Scalar(s) => rows.push(vec![s]),
            Item::Row(r) => {
                nested = true;
                rows.push(r);
            }
        }
    }

    if !nested {
        return ArrayShape::Flat(rows.into_iter().flatten().collect());
    }
    // A single row renders exactly like a 1-D array.
    if rows.len() == 1 {
        return ArrayShape::Flat(rows.remove(0));
    }
    ArrayShape::Rows(rows)
}
