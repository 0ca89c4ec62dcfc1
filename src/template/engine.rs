use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

/// Template bodies use a small placeholder language:
///
///   {{.name}}                               substitute a variable
///   {{if hasValue .x}}...{{else}}...{{end}} conditional (nesting allowed)
///   {{default .a .b "fallback"}}            first non-empty argument
///   {{slug .x}}                             url-safe transform
///
/// An empty string counts as "no value". Any parse error returns the body
/// unchanged so a broken template never destroys item content.
pub fn render(body: &str, vars: &IndexMap<String, String>) -> String {
    match parse(body) {
        Ok(nodes) => {
            let mut out = String::with_capacity(body.len());
            eval(&nodes, vars, &mut out);
            out
        }
        Err(_) => body.to_string(),
    }
}

/// Lowercase, runs of non-alphanumerics collapsed to single dashes,
/// no leading or trailing dash.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Stored variable names that neither the body references nor the template
/// declares. The body side is a regex scan over `{{ ... }}` blocks for
/// leading-dot identifiers, so it also catches names only used inside
/// conditions or helper calls.
pub fn find_unused(
    body: &str,
    declared: &[String],
    stored: &IndexMap<String, String>,
) -> Vec<String> {
    let mut used: HashSet<&str> = declared.iter().map(String::as_str).collect();
    if let (Some(block), Some(var_ref)) = (block_regex(), var_ref_regex()) {
        for cap in block.captures_iter(body) {
            if let Some(inner) = cap.get(1) {
                for r in var_ref.captures_iter(inner.as_str()) {
                    if let Some(name) = r.get(1) {
                        used.insert(name.as_str());
                    }
                }
            }
        }
    }
    let mut unused: Vec<String> = stored
        .keys()
        .filter(|name| !used.contains(name.as_str()))
        .cloned()
        .collect();
    unused.sort();
    unused
}

fn block_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{\{(.*?)\}\}").ok()).as_ref()
}

fn var_ref_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.([A-Za-z_][A-Za-z0-9_]*)").ok())
        .as_ref()
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Node {
    Text(String),
    Var(String),
    Slug(String),
    Default(Vec<Arg>),
    If {
        var: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug)]
enum Arg {
    Var(String),
    Lit(String),
}

#[derive(Debug, PartialEq, Eq)]
enum ParseError {
    UnterminatedTag,
    UnknownTag,
    BadCondition,
    BadArgs,
    StrayElse,
    StrayEnd,
    MissingEnd,
}

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Text(&'a str),
    Tag(&'a str),
}

fn tokenize(body: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or(ParseError::UnterminatedTag)?;
        tokens.push(Token::Tag(after[..end].trim()));
        rest = &after[end + 2..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    Ok(tokens)
}

fn parse(body: &str) -> Result<Vec<Node>, ParseError> {
    let tokens = tokenize(body)?;
    let mut pos = 0;
    let (nodes, terminator) = parse_nodes(&tokens, &mut pos, false)?;
    debug_assert!(terminator.is_none());
    Ok(nodes)
}

/// Parse until end of input or, inside a conditional, until `else`/`end`.
/// Returns the terminator tag that stopped the walk, if any.
fn parse_nodes<'a>(
    tokens: &[Token<'a>],
    pos: &mut usize,
    in_if: bool,
) -> Result<(Vec<Node>, Option<&'a str>), ParseError> {
    let mut nodes = Vec::new();
    while *pos < tokens.len() {
        match tokens[*pos] {
            Token::Text(text) => {
                nodes.push(Node::Text(text.to_string()));
                *pos += 1;
            }
            Token::Tag(tag) => {
                *pos += 1;
                match tag {
                    "else" => {
                        if in_if {
                            return Ok((nodes, Some("else")));
                        }
                        return Err(ParseError::StrayElse);
                    }
                    "end" => {
                        if in_if {
                            return Ok((nodes, Some("end")));
                        }
                        return Err(ParseError::StrayEnd);
                    }
                    _ if tag.starts_with("if ") => {
                        let var = parse_condition(tag)?;
                        let (then, stop) = parse_nodes(tokens, pos, true)?;
                        let otherwise = match stop {
                            Some("else") => {
                                let (other, stop) = parse_nodes(tokens, pos, true)?;
                                if stop != Some("end") {
                                    return Err(ParseError::MissingEnd);
                                }
                                other
                            }
                            Some("end") => Vec::new(),
                            _ => return Err(ParseError::MissingEnd),
                        };
                        nodes.push(Node::If {
                            var,
                            then,
                            otherwise,
                        });
                    }
                    _ if tag.starts_with('.') => {
                        nodes.push(Node::Var(parse_var(tag)?));
                    }
                    _ if tag.starts_with("slug ") || tag == "slug" => {
                        let rest = tag.strip_prefix("slug").unwrap_or("").trim();
                        nodes.push(Node::Slug(parse_var(rest)?));
                    }
                    _ if tag.starts_with("default ") || tag == "default" => {
                        let rest = tag.strip_prefix("default").unwrap_or("").trim();
                        let args = parse_args(rest)?;
                        if args.is_empty() {
                            return Err(ParseError::BadArgs);
                        }
                        nodes.push(Node::Default(args));
                    }
                    _ => return Err(ParseError::UnknownTag),
                }
            }
        }
    }
    if in_if {
        return Err(ParseError::MissingEnd);
    }
    Ok((nodes, None))
}

/// `if hasValue .name` is the only supported condition form.
fn parse_condition(tag: &str) -> Result<String, ParseError> {
    let parts: Vec<&str> = tag.split_whitespace().collect();
    match parts.as_slice() {
        ["if", "hasValue", var] => parse_var(var).map_err(|_| ParseError::BadCondition),
        _ => Err(ParseError::BadCondition),
    }
}

fn parse_var(token: &str) -> Result<String, ParseError> {
    let name = token.strip_prefix('.').ok_or(ParseError::UnknownTag)?;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ParseError::UnknownTag);
    }
    Ok(name.to_string())
}

/// Arguments are `.var` references or double-quoted literals.
fn parse_args(rest: &str) -> Result<Vec<Arg>, ParseError> {
    let mut args = Vec::new();
    let mut chars = rest.char_indices().peekable();
    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let start = i + 1;
            let mut close = None;
            for (j, c2) in chars.by_ref() {
                if c2 == '"' {
                    close = Some(j);
                    break;
                }
            }
            let close = close.ok_or(ParseError::BadArgs)?;
            args.push(Arg::Lit(rest[start..close].to_string()));
        } else if c == '.' {
            let start = i;
            chars.next();
            while let Some(&(_, c2)) = chars.peek() {
                if c2.is_alphanumeric() || c2 == '_' {
                    chars.next();
                } else {
                    break;
                }
            }
            let end = chars.peek().map_or(rest.len(), |&(j, _)| j);
            args.push(Arg::Var(
                parse_var(&rest[start..end]).map_err(|_| ParseError::BadArgs)?,
            ));
        } else {
            return Err(ParseError::BadArgs);
        }
    }
    Ok(args)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn eval(nodes: &[Node], vars: &IndexMap<String, String>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => out.push_str(lookup(vars, name)),
            Node::Slug(name) => out.push_str(&slug(lookup(vars, name))),
            Node::Default(args) => {
                for arg in args {
                    let value = match arg {
                        Arg::Var(name) => lookup(vars, name),
                        Arg::Lit(text) => text,
                    };
                    if !value.is_empty() {
                        out.push_str(value);
                        break;
                    }
                }
            }
            Node::If {
                var,
                then,
                otherwise,
            } => {
                if lookup(vars, var).is_empty() {
                    eval(otherwise, vars, out);
                } else {
                    eval(then, vars, out);
                }
            }
        }
    }
}

/// A missing variable reads as empty, same as an empty stored value.
fn lookup<'a>(vars: &'a IndexMap<String, String>, name: &str) -> &'a str {
    vars.get(name).map(String::as_str).unwrap_or("")
}
