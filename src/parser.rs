//! Recursive descent over classified tokens, lowest precedence first:
//!
//! ```text
//! <sum>   ::= <mul> { '+' <mul> }
//! <mul>   ::= <unary> { <unary> }          (juxtaposition)
//! <unary> ::= <atom> { '*' }
//! <atom>  ::= <literal> | '1' | '(' <sum> ')'
//! ```
//!
//! Every rule restores the cursor to where it started when it fails, so a
//! caller may try an alternative without the failed attempt consuming input.
//!
//! Open parentheses and the depth of the resulting tree are both capped at
//! [`NEST_LIMIT`]; deeper input is a [`SyntaxErrorKind::NestTooDeep`] error
//! instead of unbounded recursion here and in every later tree walk.

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::regex::RegexNode;
use crate::token::{Token, ALTERNATION, CLOSE_PAREN, EMPTY_LITERAL, OPEN_PAREN, STAR};

/// Deepest nesting accepted, counted both in open parentheses and in
/// levels of the syntax tree.
pub const NEST_LIMIT: usize = 250;

type ParseResult = std::result::Result<RegexNode, SyntaxError>;

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    // parentheses currently open
    open: usize,
    // tree depth of the node returned last
    depth: usize,
}

/// Parse a complete token sequence into a syntax tree.
pub fn parse(tokens: &[Token]) -> Result<RegexNode, SyntaxError> {
    if tokens.is_empty() {
        return Err(SyntaxError::new(0, SyntaxErrorKind::EmptyInput));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        open: 0,
        depth: 0,
    };
    let tree = parser.parse_sum()?;
    if parser.pos != tokens.len() {
        return Err(SyntaxError::new(parser.pos, SyntaxErrorKind::TrailingTokens));
    }
    Ok(tree)
}

impl<'t> Parser<'t> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_is_op(&self, symbol: char) -> bool {
        self.peek().is_some_and(|token| token.is_op(symbol))
    }

    // a token that may begin an atom
    fn starts_atom(&self) -> bool {
        self.peek().is_some_and(|token| {
            !token.is_operator || token.symbol == OPEN_PAREN || token.symbol == EMPTY_LITERAL
        })
    }

    fn parse_sum(&mut self) -> ParseResult {
        let start = self.pos;
        let mut alternates = vec![self.restoring(start, Self::parse_mul)?];
        let mut deepest = self.depth;

        while self.peek_is_op(ALTERNATION) {
            self.pos += 1;
            let alternate = self.restoring(start, Self::parse_mul)?;
            alternates.push(alternate);
            deepest = deepest.max(self.depth);
        }

        match alternates.len() {
            1 => Ok(alternates.remove(0)),
            _ => {
                self.nest(deepest + 1, start)?;
                Ok(RegexNode::Alternation(alternates))
            }
        }
    }

    fn parse_mul(&mut self) -> ParseResult {
        let start = self.pos;
        let mut factors = vec![self.parse_unary()?];
        let mut deepest = self.depth;
        while self.starts_atom() {
            factors.push(self.parse_unary()?);
            deepest = deepest.max(self.depth);
        }

        match factors.len() {
            1 => Ok(factors.remove(0)),
            _ => {
                self.nest(deepest + 1, start)?;
                Ok(RegexNode::Concatenation(factors))
            }
        }
    }

    fn parse_unary(&mut self) -> ParseResult {
        let mut node = self.parse_atom()?;
        while self.peek_is_op(STAR) {
            self.nest(self.depth + 1, self.pos)?;
            self.pos += 1;
            node = RegexNode::Star(Box::new(node));
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> ParseResult {
        let start = self.pos;
        let token = *self
            .peek()
            .ok_or_else(|| SyntaxError::new(start, SyntaxErrorKind::UnexpectedEnd))?;

        if !token.is_operator {
            self.pos += 1;
            self.depth = 1;
            return Ok(RegexNode::Literal(token.symbol));
        }

        match token.symbol {
            EMPTY_LITERAL => {
                self.pos += 1;
                self.depth = 1;
                Ok(RegexNode::Empty)
            }
            OPEN_PAREN => {
                if self.open == NEST_LIMIT {
                    return Err(SyntaxError::new(start, SyntaxErrorKind::NestTooDeep));
                }
                self.pos += 1;
                self.open += 1;
                let inner = self.restoring(start, Self::parse_sum);
                self.open -= 1;
                let inner = inner?;
                if self.peek_is_op(CLOSE_PAREN) {
                    self.pos += 1;
                    Ok(inner)
                } else {
                    self.pos = start;
                    Err(SyntaxError::new(
                        start,
                        SyntaxErrorKind::UnmatchedParenthesis,
                    ))
                }
            }
            _ => Err(SyntaxError::new(start, SyntaxErrorKind::UnexpectedToken)),
        }
    }

    // record the depth of a node about to be built at `position`
    fn nest(&mut self, depth: usize, position: usize) -> Result<(), SyntaxError> {
        if depth > NEST_LIMIT {
            return Err(SyntaxError::new(position, SyntaxErrorKind::NestTooDeep));
        }
        self.depth = depth;
        Ok(())
    }

    // run `rule`, rewinding to `start` if it fails
    fn restoring(&mut self, start: usize, rule: fn(&mut Self) -> ParseResult) -> ParseResult {
        rule(self).map_err(|e| {
            self.pos = start;
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn parse_str(text: &str) -> ParseResult {
        parse(&tokenize(text))
    }

    fn lit(c: char) -> RegexNode {
        RegexNode::Literal(c)
    }

    #[test]
    fn operands_are_flat() {
        assert_eq!(
            parse_str("a+b+c").unwrap(),
            RegexNode::Alternation(vec![lit('a'), lit('b'), lit('c')])
        );
        assert_eq!(
            parse_str("abc").unwrap(),
            RegexNode::Concatenation(vec![lit('a'), lit('b'), lit('c')])
        );
    }

    #[test]
    fn precedence() {
        assert_eq!(
            parse_str("ab*+1").unwrap(),
            RegexNode::Alternation(vec![
                RegexNode::Concatenation(vec![lit('a'), RegexNode::Star(Box::new(lit('b')))]),
                RegexNode::Empty,
            ])
        );
        assert_eq!(
            parse_str("(a+b)**").unwrap(),
            RegexNode::Star(Box::new(RegexNode::Star(Box::new(RegexNode::Alternation(
                vec![lit('a'), lit('b')]
            )))))
        );
    }

    #[test]
    fn literal_tokens_may_look_like_operators() {
        let tokens = [Token::literal('('), Token::literal('+'), Token::literal('1')];
        assert_eq!(
            parse(&tokens).unwrap(),
            RegexNode::Concatenation(vec![lit('('), lit('+'), lit('1')])
        );
    }

    #[test]
    fn errors_carry_positions() {
        let cases = [
            ("", 0, SyntaxErrorKind::EmptyInput),
            ("a+", 2, SyntaxErrorKind::UnexpectedEnd),
            ("+a", 0, SyntaxErrorKind::UnexpectedToken),
            ("*", 0, SyntaxErrorKind::UnexpectedToken),
            ("a(b", 1, SyntaxErrorKind::UnmatchedParenthesis),
            ("(a(b)", 0, SyntaxErrorKind::UnmatchedParenthesis),
            ("a)", 1, SyntaxErrorKind::TrailingTokens),
            ("ab)c", 2, SyntaxErrorKind::TrailingTokens),
            ("()", 1, SyntaxErrorKind::UnexpectedToken),
            ("a+*", 2, SyntaxErrorKind::UnexpectedToken),
        ];
        for (text, position, kind) in cases {
            assert_eq!(
                parse_str(text).unwrap_err(),
                SyntaxError { position, kind },
                "input {:?}",
                text
            );
        }
    }

    #[test]
    fn nesting_is_capped() {
        let within = format!("{}a{}", "(".repeat(NEST_LIMIT), ")".repeat(NEST_LIMIT));
        assert_eq!(parse_str(&within).unwrap(), lit('a'));

        let deep = format!("{}a{}", "(".repeat(1_000), ")".repeat(1_000));
        assert_eq!(
            parse_str(&deep).unwrap_err(),
            SyntaxError::new(NEST_LIMIT, SyntaxErrorKind::NestTooDeep)
        );

        let stars = format!("a{}", "*".repeat(200_000));
        assert_eq!(
            parse_str(&stars).unwrap_err(),
            SyntaxError::new(NEST_LIMIT, SyntaxErrorKind::NestTooDeep)
        );
        assert!(parse_str(&format!("a{}", "*".repeat(NEST_LIMIT - 1))).is_ok());

        // every level is a concatenation: "a(a(a(...)))"
        let mut text = String::from("a");
        for _ in 0..NEST_LIMIT {
            text = format!("a({})", text);
        }
        assert_eq!(parse_str(&text).unwrap_err().kind, SyntaxErrorKind::NestTooDeep);
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let tokens = [Token::literal('a'), Token::operator('?')];
        let err = parse(&tokens).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, SyntaxErrorKind::TrailingTokens);
        let err = parse(&[Token::operator('?')]).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedToken);
    }
}
