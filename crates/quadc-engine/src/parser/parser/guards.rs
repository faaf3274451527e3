//! Parser guards to prevent runaway loops and stack overflow

use super::{ParseError, Parser};
use crate::parser::token::Span;

/// Maximum iterations for any parser loop
const MAX_LOOP_ITERATIONS: usize = 100_000;

/// Maximum nesting depth of statements and expressions
///
/// Deeply nested input is rejected before the recursive descent can
/// overflow the stack of a test thread in debug builds.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Guard against runaway loops in the parser.
pub struct LoopGuard {
    name: &'static str,
    count: usize,
    max: usize,
}

impl LoopGuard {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            count: 0,
            max: MAX_LOOP_ITERATIONS,
        }
    }

    #[inline]
    pub fn with_limit(name: &'static str, max: usize) -> Self {
        Self { name, count: 0, max }
    }

    /// Count one iteration, failing once the limit is passed
    #[inline]
    pub fn check(&mut self) -> Result<(), ParseError> {
        self.count += 1;
        if self.count > self.max {
            return Err(ParseError::parser_limit_exceeded(
                format!("loop '{}' exceeded {} iterations", self.name, self.max),
                Span::default(),
            ));
        }
        Ok(())
    }
}

/// Run `f` one nesting level deeper, failing past [`MAX_PARSE_DEPTH`].
///
/// The depth is restored whether or not `f` succeeds.
pub fn with_depth<T>(
    parser: &mut Parser,
    what: &str,
    f: impl FnOnce(&mut Parser) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    parser.depth += 1;
    if parser.depth > MAX_PARSE_DEPTH {
        parser.depth -= 1;
        return Err(ParseError::parser_limit_exceeded(
            format!("maximum nesting depth ({}) exceeded in {}", MAX_PARSE_DEPTH, what),
            parser.current_span(),
        ));
    }

    let result = f(parser);

    parser.depth -= 1;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_guard_limit() {
        let mut guard = LoopGuard::with_limit("test", 3);
        assert!(guard.check().is_ok());
        assert!(guard.check().is_ok());
        assert!(guard.check().is_ok());
        assert!(guard.check().is_err());
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut parser = Parser::new("x").unwrap();
        let result: Result<(), ParseError> = with_depth(&mut parser, "test", |p| {
            Err(ParseError::invalid_syntax("boom", p.current_span()))
        });
        assert!(result.is_err());
        assert_eq!(parser.depth, 0);
    }
}
