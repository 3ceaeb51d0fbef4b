//! Line-oriented DBC text front-end.
//!
//! Builds the syntax tree consumed by [`assemble`] from DBC text. It is lenient rather than
//! validating: statements it does not know are skipped, as are lines it cannot split into the
//! expected pieces. Numbers are kept as text; the assembler checks them.

use crate::dbc::assemble::assemble;
use crate::dbc::core::strings::{Token, has_open_quote, tokenize};
use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::database::DatabaseDBC;
use crate::dbc::types::errors::DbcParseError;

use std::fs::File;
use std::io::{BufReader, Read};

use encoding_rs::WINDOWS_1252;

/// Parses a DBC file and returns the assembled [`DatabaseDBC`].
///
/// The file is decoded as Windows-1252, the encoding DBC editors write.
///
/// # Errors
/// - [`DbcParseError::InvalidExtension`] if the path does not end in `.dbc`.
/// - [`DbcParseError::OpenFile`] / [`DbcParseError::Read`] on I/O failures.
/// - [`DbcParseError::Semantic`] if the content does not assemble.
///
/// # Example
/// ```no_run
/// let db = dbc_model::dbc::from_file("example.dbc").expect("Failed to parse DBC file");
/// println!("Parsed {} messages", db.messages().len());
/// ```
pub fn from_file(path: &str) -> Result<DatabaseDBC, DbcParseError> {
    // check if provided file has .dbc format
    if !path.ends_with(".dbc") {
        return Err(DbcParseError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|source| DbcParseError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    // read raw bytes
    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| DbcParseError::Read {
            path: path.to_string(),
            source,
        })?;

    // Decode in Windows-1252
    let (text, _, _) = WINDOWS_1252.decode(&bytes);
    from_str(&text)
}

/// Parses DBC text and returns the assembled [`DatabaseDBC`].
pub fn from_str(text: &str) -> Result<DatabaseDBC, DbcParseError> {
    let tree: SyntaxNode = tree_from_str(text);
    Ok(assemble(Some(&tree))?)
}

/// Sections of the tree, filled statement by statement.
#[derive(Default)]
struct Sections {
    vals: Vec<SyntaxNode>,
    messages: Vec<SyntaxNode>,
    sigvals: Vec<SyntaxNode>,
    comments: Vec<SyntaxNode>,
    definitions: Vec<SyntaxNode>,
    defaults: Vec<SyntaxNode>,
    assignments: Vec<SyntaxNode>,
}

impl Sections {
    fn into_tree(self) -> SyntaxNode {
        let mut root: Vec<SyntaxNode> = Vec::new();
        let mut section = |rule: &str, nodes: Vec<SyntaxNode>| {
            if !nodes.is_empty() {
                root.push(SyntaxNode::new(rule, nodes));
            }
        };
        section(rules::VALS, self.vals);
        section(rules::MESSAGES, self.messages);
        section(rules::COMMENTS, self.comments);
        section(rules::ATTRIBUTE_DEFINITIONS, self.definitions);
        section(rules::ATTRIBUTE_DEFAULTS, self.defaults);
        section(rules::ATTRIBUTE_VALUES, self.assignments);
        root.extend(self.sigvals);
        SyntaxNode::new(rules::ROOT, root)
    }
}

/// Builds the syntax tree of a DBC text.
///
/// Recognised statements: `BO_`, `SG_`, `VAL_`, `CM_` (possibly spanning lines), `BA_DEF_`,
/// `BA_DEF_DEF_`, `BA_` and `SIG_VALTYPE_`. Everything else is skipped.
pub fn tree_from_str(text: &str) -> SyntaxNode {
    let mut sections = Sections::default();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        // Work on a trimmed-start slice to preserve inner spaces elsewhere
        let line_trimmed: &str = line.trim_start();

        // skip comments and empty lines
        if line_trimmed.is_empty() || line_trimmed.starts_with("//") {
            continue;
        }

        let first: &str = line_trimmed.split_ascii_whitespace().next().unwrap_or("");
        match first {
            "BO_" => {
                if let Some(bo) = message(line_trimmed) {
                    sections.messages.push(bo);
                }
            }
            "SG_" => {
                // signals belong to the last BO_
                let (Some(bo), Some(sg)) = (sections.messages.last_mut(), signal(line_trimmed))
                else {
                    tracing::debug!("SG_ outside of a message skipped: {}", line_trimmed);
                    continue;
                };
                bo.children.push(sg);
            }
            "VAL_" => {
                if let Some(val) = value_table(line_trimmed) {
                    sections.vals.push(val);
                }
            }
            "CM_" => {
                // Accumulate multiline until the comment text is closed
                let mut full_comment_line: String = line_trimmed.to_string();
                while has_open_quote(&full_comment_line) {
                    let Some(next) = lines.next() else {
                        break;
                    };
                    full_comment_line.push('\n');
                    full_comment_line.push_str(next);
                }
                if let Some(cm) = comment(&full_comment_line) {
                    sections.comments.push(cm);
                }
            }
            "BA_DEF_" => {
                if let Some(def) = attribute_definition(line_trimmed) {
                    sections.definitions.push(def);
                }
            }
            "BA_DEF_DEF_" => {
                if let Some(default) = attribute_default(line_trimmed) {
                    sections.defaults.push(default);
                }
            }
            "BA_" => {
                if let Some(assignment) = attribute_assignment(line_trimmed) {
                    sections.assignments.push(assignment);
                }
            }
            "SIG_VALTYPE_" => {
                if let Some(sigval) = sig_valtype(line_trimmed) {
                    sections.sigvals.push(sigval);
                }
            }
            _ => {}
        }
    }

    sections.into_tree()
}

/// `BO_ <id> <name>: <dlc> <sender>`
fn message(line: &str) -> Option<SyntaxNode> {
    let rest: &str = line.trim().strip_prefix("BO_")?;
    let (head, tail) = rest.split_once(':')?;
    let mut head = head.split_ascii_whitespace();
    let mut tail = tail.split_ascii_whitespace();

    let id: &str = head.next()?;
    let name: &str = head.next()?;
    let dlc: &str = tail.next()?;
    let ecu: &str = tail.next()?;

    Some(SyntaxNode::new(
        rules::MESSAGE,
        vec![
            SyntaxNode::leaf(rules::ID, id),
            SyntaxNode::leaf(rules::NAME, name),
            SyntaxNode::leaf(rules::DLC, dlc),
            SyntaxNode::leaf(rules::ECU, ecu),
        ],
    ))
}

/// `SG_ <name> [M|mX]: <start>|<length>@<endian><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers>`
fn signal(line: &str) -> Option<SyntaxNode> {
    let rest: &str = line.trim().strip_prefix("SG_")?;
    let (head, tail) = rest.split_once(':')?;

    // 1) name and multiplexing tag
    let mut head = head.split_ascii_whitespace();
    let name: &str = head.next()?;
    let mut children: Vec<SyntaxNode> = vec![SyntaxNode::leaf(rules::NAME, name)];
    if let Some(tag) = head.next() {
        if let Some(value) = tag.strip_prefix('m') {
            // `m3` or the extended `m3M`
            let value: &str = value.trim_end_matches('M');
            children.push(SyntaxNode::leaf(rules::MUX_VALUE, value));
        } else if tag == "M" {
            children.push(SyntaxNode::leaf(rules::MUX_SWITCH, tag));
        }
    }

    // 2) "63|1@1+"
    let tail: &str = tail.trim_start();
    let (bits, tail) = tail.split_once(char::is_whitespace).unwrap_or((tail, ""));
    let (start, bits) = bits.split_once('|')?;
    let (length, layout) = bits.split_once('@')?;
    let mut layout = layout.chars();
    let endianess: char = layout.next()?;
    let sign: char = layout.next()?;
    children.push(SyntaxNode::leaf(rules::STARTBIT, start));
    children.push(SyntaxNode::leaf(rules::LENGTH, length));
    children.push(SyntaxNode::leaf(rules::ENDIANESS, &endianess.to_string()));
    children.push(SyntaxNode::leaf(rules::SIGN, &sign.to_string()));

    // 3) "(factor,offset)" and "[min|max]"
    let (scaling, tail) = enclosed(tail, '(', ')')?;
    let (factor, offset) = scaling.split_once(',')?;
    let (range, tail) = enclosed(tail, '[', ']')?;
    let (min, max) = range.split_once('|')?;
    children.push(float_pair(rules::Y_MX_C, factor, offset));
    children.push(float_pair(rules::RANGE, min, max));

    // 4) "unit"
    let (unit, tail) = enclosed(tail, '"', '"')?;
    children.push(SyntaxNode::leaf(rules::UNIT, unit));

    // 5) receivers
    let receivers: Vec<&str> = tail
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|r| r.trim_end_matches(';'))
        .filter(|r| !r.is_empty())
        .collect();
    match receivers.as_slice() {
        [] => {}
        [single] => children.push(SyntaxNode::leaf(rules::SINGLE_NODE, single)),
        many => children.push(SyntaxNode::new(
            rules::NODES,
            many.iter()
                .map(|r| SyntaxNode::leaf(rules::NODE, r))
                .collect(),
        )),
    }

    Some(SyntaxNode::new(rules::SIGNAL, children))
}

/// Text between the first `open` and the following `close`, and what follows it.
fn enclosed(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    let start: usize = s.find(open)? + open.len_utf8();
    let len: usize = s[start..].find(close)?;
    Some((&s[start..start + len], &s[start + len + close.len_utf8()..]))
}

fn float_pair(rule: &str, a: &str, b: &str) -> SyntaxNode {
    SyntaxNode::new(
        rule,
        vec![
            SyntaxNode::leaf(rules::FLOAT, a.trim()),
            SyntaxNode::leaf(rules::FLOAT, b.trim()),
        ],
    )
}

/// `VAL_ <MessageID> <SignalName> <value> "<desc>" ... ;`
fn value_table(line: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(line);
    let [_, Token::Word(id), Token::Word(name), items @ ..] = tokens.as_slice() else {
        return None;
    };
    // environment-variable tables have no message id
    if id.parse::<u32>().is_err() {
        return None;
    }

    let mut children: Vec<SyntaxNode> = vec![
        SyntaxNode::leaf(rules::ID, id),
        SyntaxNode::leaf(rules::NAME, name),
    ];
    for pair in items.chunks(2) {
        let [Token::Word(value), Token::Quoted(label)] = pair else {
            break;
        };
        children.push(SyntaxNode::new(
            rules::VAL_ITEM,
            vec![
                SyntaxNode::leaf(rules::INTEGER, value),
                SyntaxNode::leaf(rules::STRING, label),
            ],
        ));
    }
    Some(SyntaxNode::new(rules::VAL, children))
}

/// `CM_ [BU_ <node> | BO_ <id> | SG_ <id> <signal> | EV_ <env>] "<text>";`
fn comment(statement: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(statement);
    let mut children: Vec<SyntaxNode> = Vec::new();
    let text: &str = match tokens.get(1..)? {
        [Token::Quoted(text), ..] => text,
        [Token::Word("BO_"), Token::Word(id), Token::Quoted(text), ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, "BO_"));
            children.push(SyntaxNode::leaf(rules::ID, id));
            text
        }
        [Token::Word("SG_"), Token::Word(id), Token::Word(name), Token::Quoted(text), ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, "SG_"));
            children.push(SyntaxNode::leaf(rules::ID, id));
            children.push(SyntaxNode::leaf(rules::NAME, name));
            text
        }
        [Token::Word(kind @ ("BU_" | "EV_")), Token::Word(node), Token::Quoted(text), ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, kind));
            children.push(SyntaxNode::leaf(rules::NODE, node));
            text
        }
        _ => return None,
    };
    children.push(SyntaxNode::leaf(rules::COMMENT_STRING, text));
    Some(SyntaxNode::new(rules::COMMENT, children))
}

/// `BA_DEF_ [BU_|BO_|SG_|EV_] "<name>" <kind> <args...>;`
fn attribute_definition(line: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(line);
    let (object_type, name, rest): (Option<&str>, &str, &[Token<'_>]) = match tokens.get(1..)? {
        [Token::Quoted(name), rest @ ..] => (None, name.as_str(), rest),
        [Token::Word(object_type), Token::Quoted(name), rest @ ..] => {
            (Some(*object_type), name.as_str(), rest)
        }
        _ => return None,
    };

    let mut children: Vec<SyntaxNode> = vec![SyntaxNode::leaf(rules::ATTRIBUTE_NAME, name)];
    if let Some(object_type) = object_type {
        children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, object_type));
    }

    let (kind, args) = rest.split_first()?;
    let kind: &str = kind.word()?;
    let arg_rule: &str = match kind {
        "FLOAT" => rules::FLOAT,
        "ENUM" => rules::STRING,
        _ => rules::INTEGER,
    };
    let mut value_type: Vec<SyntaxNode> = vec![SyntaxNode::leaf(rules::KIND, kind)];
    value_type.extend(args.iter().map(|arg| match arg {
        Token::Word(w) => SyntaxNode::leaf(arg_rule, w),
        Token::Quoted(q) => SyntaxNode::leaf(arg_rule, q),
    }));
    children.push(SyntaxNode::new(rules::ATTRIBUTE_VALUE_TYPE, value_type));

    Some(SyntaxNode::new(rules::ATTRIBUTE_DEFINITION, children))
}

/// `BA_DEF_DEF_ "<name>" <value>;`
fn attribute_default(line: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(line);
    let [_, Token::Quoted(name), value, ..] = tokens.as_slice() else {
        return None;
    };
    Some(SyntaxNode::new(
        rules::ATTRIBUTE_DEFAULT,
        vec![
            SyntaxNode::leaf(rules::ATTRIBUTE_NAME, name),
            attribute_value(value),
        ],
    ))
}

/// `BA_ "<name>" [BU_ <node> | BO_ <id> | SG_ <id> <signal> | EV_ <env>] <value>;`
fn attribute_assignment(line: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(line);
    let [_, Token::Quoted(name), target @ ..] = tokens.as_slice() else {
        return None;
    };

    let mut children: Vec<SyntaxNode> = vec![SyntaxNode::leaf(rules::ATTRIBUTE_NAME, name)];
    let value: &Token<'_> = match target {
        [Token::Word("BO_"), Token::Word(id), value, ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, "BO_"));
            children.push(SyntaxNode::leaf(rules::ID, id));
            value
        }
        [Token::Word("SG_"), Token::Word(id), Token::Word(signal), value, ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, "SG_"));
            children.push(SyntaxNode::leaf(rules::ID, id));
            children.push(SyntaxNode::leaf(rules::NAME, signal));
            value
        }
        [Token::Word(kind @ ("BU_" | "EV_")), Token::Word(node), value, ..] => {
            children.push(SyntaxNode::leaf(rules::OBJECT_TYPE, kind));
            children.push(SyntaxNode::leaf(rules::NODE, node));
            value
        }
        [value, ..] => value,
        [] => return None,
    };
    children.push(attribute_value(value));
    Some(SyntaxNode::new(rules::ATTRIBUTE_ASSIGNMENT, children))
}

fn attribute_value(token: &Token<'_>) -> SyntaxNode {
    match token {
        Token::Word(number) => SyntaxNode::leaf(rules::ATTRIBUTE_VALUE_NUMBER, number),
        Token::Quoted(text) => SyntaxNode::leaf(rules::ATTRIBUTE_VALUE_STRING, text),
    }
}

/// `SIG_VALTYPE_ <MsgID> <SignalName> : <Value>;`
fn sig_valtype(line: &str) -> Option<SyntaxNode> {
    let tokens: Vec<Token<'_>> = tokenize(line);
    let [_, Token::Word(id), Token::Word(name), Token::Word(code), ..] = tokens.as_slice() else {
        return None;
    };
    Some(SyntaxNode::new(
        rules::SIGVAL,
        vec![
            SyntaxNode::leaf(rules::ID, id),
            SyntaxNode::leaf(rules::NAME, name),
            SyntaxNode::leaf(rules::SIGTYPE, code),
        ],
    ))
}
