//! PEP 508 dependency specifier parsing and rendering.
//!
//! Supports names, extras, version specifiers (bare or parenthesized),
//! direct `@ url` references, and environment markers built from `and`/`or`,
//! parentheses, comparisons, and `in`/`not in`.
//!
//! `Display` renders the canonical layout: extras de-duplicated and sorted,
//! specifiers sorted, no insignificant whitespace, marker literals in single
//! quotes unless they contain one. Legacy dotted marker variables render
//! under their underscore names. Case is left untouched; see
//! `crate::normalize` for case folding.

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Environment variables allowed on either side of a marker expression.
pub const MARKER_VARIABLES: &[&str] = &[
    "extra",
    "implementation_name",
    "implementation_version",
    "os_name",
    "platform_machine",
    "platform_python_implementation",
    "platform_release",
    "platform_system",
    "platform_version",
    "python_full_version",
    "python_version",
    "sys_platform",
];

/// Legacy spellings accepted in markers and their current names.
const LEGACY_MARKER_VARIABLES: &[(&str, &str)] = &[
    ("os.name", "os_name"),
    ("platform.machine", "platform_machine"),
    ("platform.python_implementation", "platform_python_implementation"),
    ("platform.version", "platform_version"),
    ("python_implementation", "platform_python_implementation"),
    ("sys.platform", "sys_platform"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at column {column}, found {found}")]
/// Positional failure; `found` is already rendered for display.
pub struct ParseError {
    pub column: usize,
    pub expected: &'static str,
    pub found: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Compatible,
    Equal,
    NotEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Arbitrary,
}

// Longest tokens first so `===` wins over `==` and `<=` over `<`.
const OPERATORS: &[(&str, Operator)] = &[
    ("===", Operator::Arbitrary),
    ("~=", Operator::Compatible),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("<=", Operator::LessEqual),
    (">=", Operator::GreaterEqual),
    ("<", Operator::Less),
    (">", Operator::Greater),
];

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::Arbitrary => "===",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    pub operator: Operator,
    pub version: String,
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.as_str(), self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerValue {
    Variable(String),
    Literal(String),
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Variable(v) => f.write_str(v),
            // A literal never holds both quote characters
            MarkerValue::Literal(s) if s.contains('\'') => write!(f, "\"{}\"", s),
            MarkerValue::Literal(s) => write!(f, "'{}'", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerOperator {
    Compare(Operator),
    In,
    NotIn,
}

impl fmt::Display for MarkerOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerOperator::Compare(op) => f.write_str(op.as_str()),
            MarkerOperator::In => f.write_str("in"),
            MarkerOperator::NotIn => f.write_str("not in"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerTree {
    Expression {
        lhs: MarkerValue,
        op: MarkerOperator,
        rhs: MarkerValue,
    },
    And(Vec<MarkerTree>),
    Or(Vec<MarkerTree>),
    /// Explicitly parenthesized sub-marker.
    Group(Box<MarkerTree>),
}

impl fmt::Display for MarkerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerTree::Expression { lhs, op, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            MarkerTree::And(items) => join(f, items, " and "),
            MarkerTree::Or(items) => join(f, items, " or "),
            MarkerTree::Group(inner) => write!(f, "({})", inner),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[MarkerTree], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A parsed dependency specifier.
pub struct Requirement {
    pub name: String,
    pub extras: Vec<String>,
    pub specifiers: Vec<VersionSpecifier>,
    pub url: Option<String>,
    pub marker: Option<MarkerTree>,
}

impl Requirement {
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let mut c = Cursor::new(src);
        c.skip_ws();
        let name = parse_identifier(&mut c, "package name")?;
        c.skip_ws();
        let extras = if c.peek() == Some('[') {
            parse_extras(&mut c)?
        } else {
            Vec::new()
        };
        c.skip_ws();

        let mut req = Requirement {
            name,
            extras,
            specifiers: Vec::new(),
            url: None,
            marker: None,
        };

        let mut expected = "version specifier, URL, marker or end of specifier";
        match c.peek() {
            Some('@') => {
                c.bump();
                c.skip_ws();
                let url = c.take_while(|ch| !ch.is_whitespace());
                if url.is_empty() {
                    return Err(c.error("URL"));
                }
                req.url = Some(url.to_string());
                if !c.skip_ws() && !c.at_end() {
                    return Err(c.error("whitespace after URL"));
                }
                expected = "marker or end of specifier";
            }
            Some(ch) if ch == '(' || is_operator_start(ch) => {
                req.specifiers = parse_specifiers(&mut c)?;
                c.skip_ws();
                expected = "`,`, marker or end of specifier";
            }
            _ => {}
        }

        if c.eat(";") {
            c.skip_ws();
            req.marker = Some(parse_marker_or(&mut c)?);
            c.skip_ws();
            expected = "`and`, `or` or end of specifier";
        }
        if !c.at_end() {
            return Err(c.error(expected));
        }
        Ok(req)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        let extras: BTreeSet<&str> = self.extras.iter().map(String::as_str).collect();
        if !extras.is_empty() {
            write!(f, "[{}]", extras.into_iter().collect::<Vec<_>>().join(","))?;
        }
        if let Some(url) = &self.url {
            write!(f, " @ {}", url)?;
        }
        let mut specs: Vec<String> = self.specifiers.iter().map(|s| s.to_string()).collect();
        specs.sort();
        f.write_str(&specs.join(","))?;
        if let Some(marker) = &self.marker {
            if self.url.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Skip spaces and tabs; true if anything was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        self.take_while(|ch| ch == ' ' || ch == '\t');
        self.pos > start
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Like `eat`, but the keyword must not run into an identifier.
    fn eat_keyword(&mut self, kw: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(kw) {
            return false;
        }
        let next = rest[kw.len()..].chars().next();
        if next.is_some_and(is_marker_ident_char) {
            return false;
        }
        self.pos += kw.len();
        true
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !f(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn error(&self, expected: &'static str) -> ParseError {
        let rest = self.rest();
        let found = if rest.is_empty() {
            "end of input".to_string()
        } else {
            format!("`{}`", rest)
        };
        ParseError {
            column: self.src[..self.pos].chars().count() + 1,
            expected,
            found,
        }
    }
}

fn is_operator_start(ch: char) -> bool {
    matches!(ch, '<' | '>' | '=' | '!' | '~')
}

fn is_version_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-' | '*' | '+' | '!')
}

fn is_marker_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

/// Letters/digits with inner `-`, `_`, `.`; must start and end alphanumeric.
fn parse_identifier(c: &mut Cursor<'_>, what: &'static str) -> Result<String, ParseError> {
    if !c.peek().is_some_and(|ch| ch.is_ascii_alphanumeric()) {
        return Err(c.error(what));
    }
    let start = c.pos;
    let mut end = start;
    while let Some(ch) = c.peek() {
        if ch.is_ascii_alphanumeric() {
            c.bump();
            end = c.pos;
        } else if matches!(ch, '-' | '_' | '.') {
            c.bump();
        } else {
            break;
        }
    }
    // Trailing separators are not part of the identifier
    c.pos = end;
    Ok(c.src[start..end].to_string())
}

fn parse_extras(c: &mut Cursor<'_>) -> Result<Vec<String>, ParseError> {
    c.eat("[");
    c.skip_ws();
    let mut extras = Vec::new();
    if c.eat("]") {
        return Ok(extras);
    }
    loop {
        extras.push(parse_identifier(c, "extra name")?);
        c.skip_ws();
        if c.eat("]") {
            return Ok(extras);
        }
        if !c.eat(",") {
            return Err(c.error("`,` or `]`"));
        }
        c.skip_ws();
    }
}

fn parse_operator(c: &mut Cursor<'_>) -> Option<Operator> {
    OPERATORS
        .iter()
        .find(|(tok, _)| c.eat(tok))
        .map(|(_, op)| *op)
}

fn parse_specifiers(c: &mut Cursor<'_>) -> Result<Vec<VersionSpecifier>, ParseError> {
    let paren = c.eat("(");
    c.skip_ws();
    let mut specs = Vec::new();
    loop {
        let operator = parse_operator(c).ok_or_else(|| c.error("version operator"))?;
        c.skip_ws();
        let version = if operator == Operator::Arbitrary {
            c.take_while(|ch| !ch.is_whitespace() && !matches!(ch, ',' | ';' | ')'))
        } else {
            c.take_while(is_version_char)
        };
        if version.is_empty() {
            return Err(c.error("version"));
        }
        specs.push(VersionSpecifier {
            operator,
            version: version.to_string(),
        });
        c.skip_ws();
        if !c.eat(",") {
            break;
        }
        c.skip_ws();
    }
    if paren && !c.eat(")") {
        return Err(c.error("`,` or `)`"));
    }
    Ok(specs)
}

fn parse_marker_or(c: &mut Cursor<'_>) -> Result<MarkerTree, ParseError> {
    let mut items = vec![parse_marker_and(c)?];
    loop {
        let save = c.pos;
        c.skip_ws();
        if c.eat_keyword("or") {
            items.push(parse_marker_and(c)?);
        } else {
            c.pos = save;
            break;
        }
    }
    Ok(if items.len() == 1 {
        items.remove(0)
    } else {
        MarkerTree::Or(items)
    })
}

fn parse_marker_and(c: &mut Cursor<'_>) -> Result<MarkerTree, ParseError> {
    let mut items = vec![parse_marker_expr(c)?];
    loop {
        let save = c.pos;
        c.skip_ws();
        if c.eat_keyword("and") {
            items.push(parse_marker_expr(c)?);
        } else {
            c.pos = save;
            break;
        }
    }
    Ok(if items.len() == 1 {
        items.remove(0)
    } else {
        MarkerTree::And(items)
    })
}

fn parse_marker_expr(c: &mut Cursor<'_>) -> Result<MarkerTree, ParseError> {
    c.skip_ws();
    if c.eat("(") {
        let inner = parse_marker_or(c)?;
        c.skip_ws();
        if !c.eat(")") {
            return Err(c.error("`)`"));
        }
        return Ok(MarkerTree::Group(Box::new(inner)));
    }
    let lhs = parse_marker_value(c)?;
    c.skip_ws();
    let op = parse_marker_op(c)?;
    c.skip_ws();
    let rhs = parse_marker_value(c)?;
    Ok(MarkerTree::Expression { lhs, op, rhs })
}

fn parse_marker_value(c: &mut Cursor<'_>) -> Result<MarkerValue, ParseError> {
    let start = c.pos;
    match c.peek() {
        Some(q @ ('"' | '\'')) => {
            c.bump();
            let body = c.take_while(|ch| ch != q);
            if !c.eat(&q.to_string()) {
                return Err(c.error("closing quote"));
            }
            Ok(MarkerValue::Literal(body.to_string()))
        }
        _ => {
            let ident = c.take_while(is_marker_ident_char);
            if MARKER_VARIABLES.contains(&ident) {
                return Ok(MarkerValue::Variable(ident.to_string()));
            }
            match LEGACY_MARKER_VARIABLES.iter().find(|(old, _)| *old == ident) {
                Some((_, name)) => Ok(MarkerValue::Variable(name.to_string())),
                None => {
                    c.pos = start;
                    Err(c.error("marker variable or quoted string"))
                }
            }
        }
    }
}

fn parse_marker_op(c: &mut Cursor<'_>) -> Result<MarkerOperator, ParseError> {
    if let Some(op) = parse_operator(c) {
        return Ok(MarkerOperator::Compare(op));
    }
    if c.eat_keyword("in") {
        return Ok(MarkerOperator::In);
    }
    let save = c.pos;
    if c.eat_keyword("not") && c.skip_ws() && c.eat_keyword("in") {
        return Ok(MarkerOperator::NotIn);
    }
    c.pos = save;
    Err(c.error("marker operator"))
}
