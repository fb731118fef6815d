//! Scanner for pattern text → check sequence.
//!
//! The textual DSL is flat: anchors, `.`, `|`, group delimiters, angle
//! checks and quantifier tokens, with whitespace and both comment styles
//! ignored between tokens. Quantifiers fuse onto the preceding check
//! while scanning when the attachment rules allow it; otherwise they are
//! kept as floating checks for the builder to resolve.

use ilregex_common::{MemberKind, OpcodeMatcher, Operand};

use crate::check::{Check, CheckKind, OperandRef};
use crate::error::{ParseError, ParseErrorKind};
use crate::quantifier::Quantifier;

/// Scanner output: the check sequence plus the source positions of any
/// floating quantifiers, so attachment failures can be located later.
#[derive(Debug)]
pub(crate) struct ParseOutput {
    pub checks: Vec<Check>,
    /// `(check index, line, column)` of each floating quantifier.
    pub quantifier_positions: Vec<(usize, u32, u32)>,
}

/// Scan pattern text into a check sequence.
pub(crate) fn parse_checks(text: &str) -> Result<ParseOutput, ParseError> {
    Scanner::new(text).run()
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    checks: Vec<Check>,
    quantifier_positions: Vec<(usize, u32, u32)>,
}

/// One argument inside an angle check, with its source position.
enum Arg {
    /// Unquoted word: opcode names, numeric literals.
    Bare(String),
    /// `"…"` string literal.
    Str(String),
    /// `'…'` capture reference.
    Capture(String),
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            checks: Vec::new(),
            quantifier_positions: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn here(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.line, self.column, kind)
    }

    fn error_at(&self, at: (u32, u32), kind: ParseErrorKind) -> ParseError {
        ParseError::new(at.0, at.1, kind)
    }

    fn run(mut self) -> Result<ParseOutput, ParseError> {
        while let Some(c) = self.peek() {
            match c {
                _ if c.is_whitespace() => {
                    self.bump();
                }
                '/' => self.skip_comment()?,
                '^' => self.push_simple(CheckKind::Start),
                '$' => self.push_simple(CheckKind::End),
                '.' => self.push_simple(CheckKind::Any),
                '|' => self.push_simple(CheckKind::Alternative),
                ')' => self.push_simple(CheckKind::GroupEnd),
                '(' => self.scan_group_start()?,
                '<' => self.scan_angle_check()?,
                '?' | '*' | '+' | '{' => self.scan_quantifier()?,
                other => return Err(self.error_here(ParseErrorKind::UnexpectedChar(other))),
            }
        }
        Ok(ParseOutput {
            checks: self.checks,
            quantifier_positions: self.quantifier_positions,
        })
    }

    fn push_simple(&mut self, kind: CheckKind) {
        self.bump();
        self.checks.push(Check::new(kind));
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.here();
        self.bump();
        match self.peek() {
            Some('/') => {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
                Ok(())
            }
            Some('*') => {
                self.bump();
                loop {
                    match self.peek() {
                        Some('*') if self.peek_second() == Some('/') => {
                            self.bump();
                            self.bump();
                            return Ok(());
                        }
                        Some(_) => {
                            self.bump();
                        }
                        None => {
                            return Err(
                                self.error_at(start, ParseErrorKind::UnterminatedComment)
                            )
                        }
                    }
                }
            }
            _ => Err(self.error_at(start, ParseErrorKind::UnexpectedChar('/'))),
        }
    }

    fn scan_group_start(&mut self) -> Result<(), ParseError> {
        self.bump();
        if self.peek() != Some('?') {
            self.checks.push(Check::new(CheckKind::GroupStart {
                capturing: true,
                name: None,
            }));
            return Ok(());
        }
        self.bump();
        match self.peek() {
            Some(':') => {
                self.bump();
                self.checks.push(Check::new(CheckKind::GroupStart {
                    capturing: false,
                    name: None,
                }));
                Ok(())
            }
            Some('\'') => {
                let at = self.here();
                let name = self.scan_capture_text()?;
                if !is_valid_name(&name) {
                    return Err(self.error_at(at, ParseErrorKind::InvalidCaptureName(name)));
                }
                self.checks.push(Check::new(CheckKind::GroupStart {
                    capturing: true,
                    name: Some(name),
                }));
                Ok(())
            }
            _ => Err(self.error_here(ParseErrorKind::BadGroupStart)),
        }
    }

    fn scan_quantifier(&mut self) -> Result<(), ParseError> {
        let at = self.here();
        let mut text = String::new();
        match self.peek() {
            Some('{') => loop {
                match self.bump() {
                    Some(c) => {
                        text.push(c);
                        if c == '}' {
                            break;
                        }
                    }
                    None => {
                        return Err(self.error_at(
                            at,
                            ParseErrorKind::BadQuantifier(
                                crate::quantifier::QuantifierError::Malformed(text),
                            ),
                        ))
                    }
                }
            },
            _ => {
                // bump() is always Some here: the dispatch saw ? * or +.
                if let Some(c) = self.bump() {
                    text.push(c);
                }
            }
        }
        if self.peek() == Some('?') {
            self.bump();
            text.push('?');
        }
        let quantifier: Quantifier = text
            .parse()
            .map_err(|e| self.error_at(at, ParseErrorKind::BadQuantifier(e)))?;

        match self.checks.last_mut() {
            None => Err(self.error_at(at, ParseErrorKind::QuantifierWithoutAtom)),
            Some(last) if last.accepts_quantifier() => {
                last.quantifier = quantifier;
                Ok(())
            }
            Some(_) => {
                self.checks
                    .push(Check::new(CheckKind::Quantifier(quantifier)));
                self.quantifier_positions
                    .push((self.checks.len() - 1, at.0, at.1));
                Ok(())
            }
        }
    }

    fn scan_angle_check(&mut self) -> Result<(), ParseError> {
        let open = self.here();
        self.bump();
        self.skip_ws_in_check(open)?;
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                prefix.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let prefix_at = open;

        let mut args: Vec<(Arg, (u32, u32))> = Vec::new();
        loop {
            self.skip_ws_in_check(open)?;
            match self.peek() {
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('"') => {
                    let at = self.here();
                    let s = self.scan_string()?;
                    args.push((Arg::Str(s), at));
                }
                Some('\'') => {
                    let at = self.here();
                    let s = self.scan_capture_text()?;
                    args.push((Arg::Capture(s), at));
                }
                Some(_) => {
                    let at = self.here();
                    let mut word = String::new();
                    while let Some(c) = self.peek() {
                        if c.is_whitespace() || c == '>' {
                            break;
                        }
                        word.push(c);
                        self.bump();
                    }
                    args.push((Arg::Bare(word), at));
                }
                None => return Err(self.error_at(open, ParseErrorKind::UnterminatedCheck)),
            }
        }

        let check = self.build_check(&prefix, prefix_at, args)?;
        self.checks.push(check);
        Ok(())
    }

    fn skip_ws_in_check(&mut self, open: (u32, u32)) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => self.skip_comment()?,
                Some(_) => return Ok(()),
                None => return Err(self.error_at(open, ParseErrorKind::UnterminatedCheck)),
            }
        }
    }

    fn scan_string(&mut self) -> Result<String, ParseError> {
        let start = self.here();
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => {
                    let at = self.here();
                    match self.bump() {
                        Some('n') => out.push('\n'),
                        Some('r') => out.push('\r'),
                        Some('t') => out.push('\t'),
                        Some('0') => out.push('\0'),
                        Some('\\') => out.push('\\'),
                        Some('"') => out.push('"'),
                        Some('\'') => out.push('\''),
                        Some(other) => {
                            return Err(self.error_at(at, ParseErrorKind::InvalidEscape(other)))
                        }
                        None => {
                            return Err(
                                self.error_at(start, ParseErrorKind::UnterminatedString)
                            )
                        }
                    }
                }
                Some(c) => out.push(c),
                None => return Err(self.error_at(start, ParseErrorKind::UnterminatedString)),
            }
        }
    }

    fn scan_capture_text(&mut self) -> Result<String, ParseError> {
        let start = self.here();
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error_at(start, ParseErrorKind::UnterminatedCapture)),
            }
        }
    }

    fn build_check(
        &self,
        prefix: &str,
        prefix_at: (u32, u32),
        args: Vec<(Arg, (u32, u32))>,
    ) -> Result<Check, ParseError> {
        match prefix {
            "nop" => {
                self.expect_args("nop", "0", &args, 0, 0)?;
                Ok(Check::new(CheckKind::Nop))
            }
            "op" => {
                self.expect_args("op", "1 or 2", &args, 1, 2)?;
                let matcher = self.matcher_arg(&args[0])?;
                match args.get(1) {
                    None => Ok(Check::new(CheckKind::Opcode(matcher))),
                    Some(arg) => {
                        let operand = self.literal_arg(arg)?;
                        Ok(Check::new(CheckKind::OpcodeOperand(matcher, operand)))
                    }
                }
            }
            "cap" => {
                self.expect_args("cap", "1 or 2", &args, 1, 2)?;
                let matcher = self.matcher_arg(&args[0])?;
                let name = match args.get(1) {
                    None => None,
                    Some((Arg::Capture(name), at)) => {
                        if !is_valid_name(name) {
                            return Err(self.error_at(
                                *at,
                                ParseErrorKind::InvalidCaptureName(name.clone()),
                            ));
                        }
                        Some(name.clone())
                    }
                    Some((arg, at)) => {
                        return Err(self.error_at(
                            *at,
                            ParseErrorKind::InvalidCaptureName(render_arg(arg)),
                        ))
                    }
                };
                Ok(Check::new(CheckKind::CaptureOperand { matcher, name }))
            }
            "ceq" => {
                self.expect_args("ceq", "2", &args, 2, 2)?;
                let matcher = self.matcher_arg(&args[0])?;
                let target = match &args[1] {
                    (Arg::Capture(text), at) => {
                        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                            OperandRef::Index(text.parse().map_err(|_| {
                                self.error_at(
                                    *at,
                                    ParseErrorKind::InvalidCaptureName(text.clone()),
                                )
                            })?)
                        } else if is_valid_name(text) {
                            OperandRef::Name(text.clone())
                        } else {
                            return Err(self.error_at(
                                *at,
                                ParseErrorKind::InvalidCaptureName(text.clone()),
                            ));
                        }
                    }
                    (arg, at) => {
                        return Err(self.error_at(
                            *at,
                            ParseErrorKind::InvalidCaptureName(render_arg(arg)),
                        ))
                    }
                };
                Ok(Check::new(CheckKind::EqualsOperand { matcher, target }))
            }
            "fld" | "mth" | "typ" | "cls" => {
                let kind = match prefix {
                    "fld" => MemberKind::Field,
                    "mth" => MemberKind::Method,
                    "typ" => MemberKind::Type,
                    _ => MemberKind::CallSite,
                };
                let prefix_static: &'static str = match kind {
                    MemberKind::Field => "fld",
                    MemberKind::Method => "mth",
                    MemberKind::Type => "typ",
                    MemberKind::CallSite => "cls",
                };
                self.expect_args(prefix_static, "2", &args, 2, 2)?;
                let matcher = self.matcher_arg(&args[0])?;
                let pattern = match &args[1] {
                    (Arg::Str(text), _) => text.clone(),
                    (arg, at) => {
                        return Err(self.error_at(
                            *at,
                            ParseErrorKind::InvalidOperandLiteral(render_arg(arg)),
                        ))
                    }
                };
                Ok(Check::new(CheckKind::MemberName {
                    kind,
                    matcher,
                    pattern,
                }))
            }
            other => Err(self.error_at(prefix_at, ParseErrorKind::UnknownPrefix(other.to_string()))),
        }
    }

    fn expect_args(
        &self,
        prefix: &'static str,
        expected: &'static str,
        args: &[(Arg, (u32, u32))],
        min: usize,
        max: usize,
    ) -> Result<(), ParseError> {
        if args.len() < min || args.len() > max {
            // Reported at the scanner's position, just past the closing '>'.
            return Err(self.error_here(ParseErrorKind::WrongArgCount {
                prefix,
                expected,
                found: args.len(),
            }));
        }
        Ok(())
    }

    fn matcher_arg(&self, arg: &(Arg, (u32, u32))) -> Result<OpcodeMatcher, ParseError> {
        match arg {
            (Arg::Bare(word), at) => OpcodeMatcher::from_name(word)
                .ok_or_else(|| self.error_at(*at, ParseErrorKind::UnknownOpcode(word.clone()))),
            (other, at) => Err(self.error_at(
                *at,
                ParseErrorKind::UnknownOpcode(render_arg(other)),
            )),
        }
    }

    fn literal_arg(&self, arg: &(Arg, (u32, u32))) -> Result<Operand, ParseError> {
        match arg {
            (Arg::Str(text), _) => Ok(Operand::string(text.as_str())),
            (Arg::Bare(word), at) => parse_number(word).ok_or_else(|| {
                self.error_at(*at, ParseErrorKind::InvalidOperandLiteral(word.clone()))
            }),
            (Arg::Capture(text), at) => Err(self.error_at(
                *at,
                ParseErrorKind::InvalidOperandLiteral(format!("'{text}'")),
            )),
        }
    }
}

fn render_arg(arg: &Arg) -> String {
    match arg {
        Arg::Bare(w) => w.clone(),
        Arg::Str(s) => format!("{s:?}"),
        Arg::Capture(c) => format!("'{c}'"),
    }
}

/// Capture names are identifiers: `[A-Za-z_]` then `[A-Za-z0-9_]*`.
/// Shared with the operand dictionary, which enforces the same rule on
/// insertion.
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Parse a numeric operand literal: optional sign, digits, optional
/// fraction, optional type tag (`l`, `b`, `sb`, `f`, `d`).
fn parse_number(word: &str) -> Option<Operand> {
    let (body, tag) = split_number_tag(word);
    if !number_shape_ok(body, matches!(tag, "f" | "d")) {
        return None;
    }
    match tag {
        "" => body.parse().ok().map(Operand::Int32),
        "l" => body.parse().ok().map(Operand::Int64),
        "b" => body.parse().ok().map(Operand::UInt8),
        "sb" => body.parse().ok().map(Operand::Int8),
        "f" => body.parse().ok().map(Operand::Float32),
        "d" => body.parse().ok().map(Operand::Float64),
        _ => None,
    }
}

fn split_number_tag(word: &str) -> (&str, &str) {
    for tag in ["sb", "b", "l", "f", "d"] {
        if let Some(body) = word.strip_suffix(tag) {
            return (body, tag);
        }
    }
    (word, "")
}

fn number_shape_ok(body: &str, allow_fraction: bool) -> bool {
    let digits = body
        .strip_prefix('-')
        .or_else(|| body.strip_prefix('+'))
        .unwrap_or(body);
    let (int_part, frac_part) = match digits.split_once('.') {
        None => (digits, None),
        Some((i, f)) => (i, Some(f)),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => {
            allow_fraction && !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit())
        }
    }
}
