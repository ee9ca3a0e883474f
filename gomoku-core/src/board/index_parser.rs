use super::Position;
use std::{iter::Peekable, str::Chars};

/// Parses user-typed coordinates such as `h8`, `8h`, `8 8` or a 1-based cell number.
///
/// Letters name the column and numbers the row, both 1-based for humans.
#[derive(Debug, Clone)]
pub struct IndexParser<'a> {
    size: usize,
    chars: Peekable<Chars<'a>>,
}

impl<'a> IndexParser<'a> {
    pub fn new(size: usize, input: &'a str) -> Self {
        Self {
            size,
            chars: input.chars().peekable(),
        }
    }

    pub fn parse(&mut self) -> Option<Position> {
        self.skip_whitespace();

        if let Some(alpha) = self.read_alpha() {
            return self.parse_pattern_alpha_number(alpha);
        }

        if let Some(number) = self.read_number() {
            self.skip_whitespace();

            if let Some(alpha) = self.read_alpha() {
                return self.parse_pattern_number_alpha(number, alpha);
            }

            if let Some(second_number) = self.read_number() {
                return self.parse_pattern_number_number(number, second_number);
            }

            if self.is_end() {
                return self.parse_pattern_number(number);
            }
        }

        None
    }

    fn parse_pattern_alpha_number(&mut self, alpha: String) -> Option<Position> {
        self.skip_whitespace();

        let number = self.read_number()?;

        self.skip_whitespace();

        if !self.is_end() {
            return None;
        }

        self.validate(Position::new(
            number_to_index(&number)?,
            alpha_to_index(&alpha)?,
        ))
    }

    fn parse_pattern_number_alpha(&mut self, number: String, alpha: String) -> Option<Position> {
        self.skip_whitespace();

        if !self.is_end() {
            return None;
        }

        self.validate(Position::new(
            number_to_index(&number)?,
            alpha_to_index(&alpha)?,
        ))
    }

    /// `column row`, both 1-based.
    fn parse_pattern_number_number(
        &mut self,
        number: String,
        second_number: String,
    ) -> Option<Position> {
        self.skip_whitespace();

        if !self.is_end() {
            return None;
        }

        self.validate(Position::new(
            number_to_index(&second_number)?,
            number_to_index(&number)?,
        ))
    }

    /// A 1-based cell number counted row-major.
    fn parse_pattern_number(&mut self, number: String) -> Option<Position> {
        let index = number_to_index(&number)?;

        self.validate(Position::new(index / self.size, index % self.size))
    }

    fn validate(&self, position: Position) -> Option<Position> {
        if position.row < self.size && position.column < self.size {
            Some(position)
        } else {
            None
        }
    }

    fn is_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    /// Reads a string of alphabetic characters, lowercased.
    fn read_alpha(&mut self) -> Option<String> {
        let mut alpha = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphabetic() {
                alpha.push(c.to_ascii_lowercase());
                self.chars.next();
            } else {
                break;
            }
        }

        if !alpha.is_empty() {
            Some(alpha)
        } else {
            None
        }
    }

    fn read_number(&mut self) -> Option<String> {
        let mut number = String::new();

        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                number.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if !number.is_empty() {
            Some(number)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}

fn alpha_to_index(lowercased_alpha: &str) -> Option<usize> {
    let mut index = 0usize;

    for c in lowercased_alpha.chars() {
        let c_index = c as usize - b'a' as usize;
        index = index.checked_mul(26)?.checked_add(c_index)?;
    }

    Some(index)
}

/// Converts a 1-based number to a 0-based index; `0` and overflowing input are rejected.
fn number_to_index(number: &str) -> Option<usize> {
    number.parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Option<Position> {
        IndexParser::new(15, input).parse()
    }

    #[test]
    fn test_parse_alpha_number() {
        let test_cases = vec![
            ("a1", Position::new(0, 0)),
            ("A1", Position::new(0, 0)),
            ("b1", Position::new(0, 1)),
            ("a15", Position::new(14, 0)),
            ("h8", Position::new(7, 7)),
            ("O15", Position::new(14, 14)),
            ("1a", Position::new(0, 0)),
            ("2B", Position::new(1, 1)),
            ("15o", Position::new(14, 14)),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse(input), Some(expected), "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_numeric_coordinates() {
        let test_cases = vec![
            ("1 1", Position::new(0, 0)),
            ("8 8", Position::new(7, 7)),
            ("1 15", Position::new(14, 0)),
            ("15 1", Position::new(0, 14)),
        ];

        for (input, expected) in test_cases {
            assert_eq!(parse(input), Some(expected), "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_cell_number() {
        assert_eq!(parse("1"), Some(Position::new(0, 0)));
        assert_eq!(parse("15"), Some(Position::new(0, 14)));
        assert_eq!(parse("225"), Some(Position::new(14, 14)));
        assert_eq!(parse("226"), None);
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        assert_eq!(parse("  a1  "), Some(Position::new(0, 0)));
        assert_eq!(parse("\t15\t15\t"), Some(Position::new(14, 14)));
    }

    #[test]
    fn test_parse_invalid_inputs() {
        let test_cases = vec![
            "",
            " ",
            "a",
            "hello, world! 15a",
            "15 1 15",
            "a0",
            "0",
            "p1",
            "a16",
            "99999999999999999999999",
        ];

        for input in test_cases {
            assert_eq!(parse(input), None, "input: {input:?}");
        }
    }
}
