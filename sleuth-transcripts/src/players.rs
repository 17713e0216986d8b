//! The `Players:` line shared by transcripts and graded results.
//!
//! Grammar accepted by [`parse_players_line`]:
//!
//! ```text
//! line   := "Players:" ws (list | map) ws
//! list   := "[" ws [ entry ( ws "," ws entry )* ws [","] ] ws "]"
//! entry  := string                       -- "name:role", split at the last ':'
//! map    := "{" ws [ pair ( ws "," ws pair )* ws [","] ] ws "}"
//! pair   := string ws ":" ws string      -- name, role
//! string := "'" chars "'" | '"' chars '"'   -- backslash escapes
//! ```
//!
//! Transcripts are written in the list form; the map form shows up in
//! results files produced by older tooling, which also wrote it bare,
//! without the `Players:` prefix. The prefix is optional for the map form
//! only.

use crate::error::{Error, Result};
use crate::roles::{Role, RoleAssignment};

/// Prefix of the trailing line of every transcript.
pub const PLAYERS_PREFIX: &str = "Players:";

/// Render a role table as a `Players: [...]` line.
#[must_use]
pub fn render_players_line(table: &RoleAssignment) -> String {
    let entries: Vec<String> = table
        .iter()
        .map(|(player, role)| quote(&format!("{player}:{role}")))
        .collect();
    format!("{PLAYERS_PREFIX} [{}]", entries.join(", "))
}

/// Parse a `Players:` line in either accepted syntax.
pub fn parse_players_line(line: &str) -> Result<RoleAssignment> {
    let trimmed = line.trim();
    let body = match trimmed.strip_prefix(PLAYERS_PREFIX) {
        Some(rest) => rest,
        None if is_bare_map(trimmed) => trimmed,
        None => return Err(invalid(line, "missing 'Players:' prefix")),
    };
    let mut parser = Parser::new(body);
    parser.skip_ws();
    let table = match parser.peek() {
        Some('[') => parser.list(),
        Some('{') => parser.map(),
        _ => Err("expected '[' or '{'".to_string()),
    }
    .map_err(|reason| invalid(line, &reason))?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(invalid(line, "trailing characters after player table"));
    }
    Ok(table)
}

/// The last non-blank line of `text`, if it is a `Players:` line or a
/// bare `{...}` mapping.
#[must_use]
pub fn trailing_players_line(text: &str) -> Option<&str> {
    text.lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .filter(|line| line.trim_start().starts_with(PLAYERS_PREFIX) || is_bare_map(line.trim()))
}

fn is_bare_map(line: &str) -> bool {
    line.starts_with('{') && line.ends_with('}')
}

fn invalid(line: &str, reason: &str) -> Error {
    Error::InvalidPlayersLine(format!("{reason}: {}", line.trim()))
}

/// Quote a string the way the transcript format expects: single quotes,
/// unless the text itself contains a single quote and no double quote.
fn quote(s: &str) -> String {
    if s.contains('\'') && !s.contains('"') {
        return format!("\"{}\"", s.replace('\\', "\\\\"));
    }
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    fn expect(&mut self, want: char) -> std::result::Result<(), String> {
        match self.chars.next() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(format!("expected '{want}', found '{c}'")),
            None => Err(format!("expected '{want}', found end of line")),
        }
    }

    fn list(&mut self) -> std::result::Result<RoleAssignment, String> {
        let mut table = RoleAssignment::new();
        self.sequence('[', ']', |p| {
            let entry = p.string()?;
            let (player, role) = entry
                .rsplit_once(':')
                .ok_or_else(|| format!("entry '{entry}' is not 'name:role'"))?;
            table.insert(player.trim(), parse_role(role)?);
            Ok(())
        })?;
        Ok(table)
    }

    fn map(&mut self) -> std::result::Result<RoleAssignment, String> {
        let mut table = RoleAssignment::new();
        self.sequence('{', '}', |p| {
            let player = p.string()?;
            p.skip_ws();
            p.expect(':')?;
            p.skip_ws();
            let role = p.string()?;
            table.insert(player.trim(), parse_role(&role)?);
            Ok(())
        })?;
        Ok(table)
    }

    /// `open item ("," item)* [","] close`, with optional whitespace.
    fn sequence(
        &mut self,
        open: char,
        close: char,
        mut item: impl FnMut(&mut Self) -> std::result::Result<(), String>,
    ) -> std::result::Result<(), String> {
        self.expect(open)?;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.chars.next();
                return Ok(());
            }
            item(self)?;
            self.skip_ws();
            match self.chars.next() {
                Some(',') => {}
                Some(c) if c == close => return Ok(()),
                Some(c) => return Err(format!("expected ',' or '{close}', found '{c}'")),
                None => return Err(format!("unterminated table, expected '{close}'")),
            }
        }
    }

    fn string(&mut self) -> std::result::Result<String, String> {
        let quote = match self.chars.next() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(format!("expected quoted string, found '{c}'")),
            None => return Err("expected quoted string, found end of line".to_string()),
        };
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some('\\') => match self.chars.next() {
                    Some(escaped) => out.push(escaped),
                    None => return Err("dangling escape".to_string()),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err("unterminated string".to_string()),
            }
        }
    }
}

fn parse_role(s: &str) -> std::result::Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role '{}'", s.trim()))
}
