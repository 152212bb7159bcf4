#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod lowering;
pub mod macros;
pub mod mangle;
pub mod parser;
pub mod semantic;
pub mod types;

pub use lowering::lowering::{resolve, resolve_with};

extern crate regex;

/// A 1-based line/column location inside a named source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position {
            line: 0,
            column: 0,
            file: Rc::new(String::from("<null>")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// Span for compiler-synthesized entities (native operators, implicit receivers).
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Covers everything from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.start.file
    }

    pub fn first_line(&self) -> u32 {
        self.start.line
    }

    pub fn first_column(&self) -> u32 {
        self.start.column
    }

    pub fn last_line(&self) -> u32 {
        self.end.line
    }

    pub fn last_column(&self) -> u32 {
        self.end.column
    }
}

pub fn get_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}

pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: name (tip)
        -> final.cls
           |
        20 | n := #;
           | -----^
    */

    let span = error.get_span();
    let mut lines = vec![];

    if let ErrorTip::None = error.get_tip() {
        lines.push(format!("Error: {}", error.get_error_name()));
    } else {
        lines.push(format!(
            "Error: {} ({})",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    lines.push(format!("-> {}", span.filename()));

    if let Some(line_text) = get_line(source, span.first_line()) {
        let line_str = span.first_line().to_string();
        let padding = line_str.len() + 2;

        lines.push(format!("{:>padding$}", "|"));

        let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
        lines.push(format!("{} | {}", line_str, line_text_removed.trim_end()));

        let arrows = (span.first_column() as usize)
            .saturating_sub(removed_whitespace)
            .max(1);
        lines.push(format!("{:>padding$} {:->arrows$}", "|", "^"));
    }

    lines.join("\n")
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::errors::errors::{Error, ErrorImpl};
    use crate::{Position, Span};

    #[test]
    fn test_get_line() {
        let source = "class A\n  x: Integer;\nend\n";
        assert_eq!(super::get_line(source, 1), Some("class A"));
        assert_eq!(super::get_line(source, 2), Some("  x: Integer;"));
        assert_eq!(super::get_line(source, 0), None);
        assert_eq!(super::get_line(source, 9), None);
    }

    #[test]
    fn test_render_error_points_at_column() {
        let file = Rc::new(String::from("test.cls"));
        let source = "class A\n  x: Missing;\nend\n";
        let error = Error::new(
            ErrorImpl::UnknownType {
                type_: String::from("Missing"),
            },
            Span::new(
                Position::new(2, 6, Rc::clone(&file)),
                Position::new(2, 13, Rc::clone(&file)),
            ),
        );

        let rendered = super::render_error(&error, source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Error: UnknownType (Unknown type `Missing` found)");
        assert_eq!(lines[1], "-> test.cls");
        assert_eq!(lines[3], "2 | x: Missing;");
        assert_eq!(lines[2], "  |");
        assert_eq!(lines[4], "  | ---^");
    }
}
