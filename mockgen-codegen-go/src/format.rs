//! Formatting pass applied to generated sources before they are written.

use std::{
    collections::HashSet,
    io::Write,
    process::{Command, Stdio},
};

use mockgen_codegen::{
    builder::CodeBuilder,
    generation::{ImportCollector, ImportSpec},
};
use mockgen_core::{Error, FormatConfig, FormatTool, Result, import_path_name, is_ident_char};

use crate::ast::ImportBlock;

/// Validates and normalizes a generated source blob.
///
/// A rejected blob is a [`Error::Format`] carrying the raw input.
pub trait SourceFormatter {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn format(&self, source: &str) -> Result<String>;
}

/// Select the formatter configured in `[format]`.
pub fn formatter_for(config: &FormatConfig) -> Box<dyn SourceFormatter> {
    match config.tool {
        FormatTool::Builtin => Box::new(BuiltinFormatter),
        FormatTool::Gofmt => Box::new(CommandFormatter::new(&config.command)),
    }
}

/// In-process formatter.
///
/// Rejects unbalanced delimiters and unterminated literals, merges import
/// declarations into one grouped block without unused entries, strips
/// trailing whitespace and collapses runs of blank lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormatter;

impl SourceFormatter for BuiltinFormatter {
    fn name(&self) -> &str {
        "builtin"
    }

    fn format(&self, source: &str) -> Result<String> {
        let masked = mask(source).map_err(|message| Error::format(message, source))?;
        check_balance(&masked.text).map_err(|message| Error::format(message, source))?;

        let lines: Vec<&str> = source.lines().collect();
        let masked_lines: Vec<&str> = masked.text.lines().collect();
        if !has_package_clause(&masked_lines) {
            return Err(Error::format("missing package clause", source));
        }

        let decls = import_decls(&lines, &masked_lines)
            .map_err(|message| Error::format(message, source))?;
        let in_decl = |i: usize| decls.iter().any(|d| d.start <= i && i <= d.end);

        let mut used = HashSet::new();
        for (i, line) in masked_lines.iter().enumerate() {
            if !in_decl(i) {
                collect_qualifiers(line, &mut used);
            }
        }

        let mut imports = ImportCollector::new();
        for spec in decls.iter().flat_map(|d| &d.specs) {
            let name = reference_name(spec);
            if name == "_" || name == "." || used.contains(&name) {
                imports.add_spec(spec.clone());
            } else {
                tracing::debug!(path = %spec.path, "dropped unused import");
            }
        }

        // (line, inside a raw string)
        let mut out: Vec<(String, bool)> = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let first_decl = decls.first().is_some_and(|d| d.start == i);
            if first_decl && !imports.is_empty() {
                let mut builder = CodeBuilder::go();
                builder.emit(&ImportBlock::new(imports.clone()));
                out.extend(builder.build().lines().map(|l| (l.to_string(), false)));
                continue;
            }
            if in_decl(i) {
                continue;
            }
            if masked.protected.get(i).copied().unwrap_or(false) {
                out.push((line.to_string(), true));
            } else {
                out.push((line.trim_end().to_string(), false));
            }
        }

        Ok(collapse_blank_lines(out))
    }
}

/// Formatter piping the source through an external tool such as `gofmt`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    /// `command` is split on whitespace into a program and its arguments.
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "gofmt".to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }
}

impl SourceFormatter for CommandFormatter {
    fn name(&self) -> &str {
        &self.program
    }

    fn format(&self, source: &str) -> Result<String> {
        tracing::debug!(program = %self.program, args = ?self.args, "running external formatter");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::format(format!("failed to run '{}': {e}", self.program), source))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| Error::format(format!("failed to write to '{}': {e}", self.program), source))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::format(format!("failed to wait for '{}': {e}", self.program), source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::format(stderr.trim().to_string(), source));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            Error::format(format!("'{}' produced invalid UTF-8", self.program), source)
        })
    }
}

/// Source with the contents of comments and literals blanked out.
struct Masked {
    /// Same line structure as the input.
    text: String,
    /// Lines starting or ending inside a raw string literal.
    protected: Vec<bool>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Str,
    RawStr,
    Rune,
}

fn mask(source: &str) -> std::result::Result<Masked, String> {
    let mut text = String::with_capacity(source.len());
    let mut protected = vec![false];
    let mut state = Scan::Code;
    let mut line = 1;
    let mut literal_start = 0;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            match state {
                Scan::Str | Scan::Rune => {
                    return Err(format!("newline in literal on line {line}"));
                }
                Scan::LineComment => state = Scan::Code,
                Scan::RawStr => {
                    if let Some(last) = protected.last_mut() {
                        *last = true;
                    }
                    protected.push(true);
                    text.push('\n');
                    line += 1;
                    continue;
                }
                _ => {}
            }
            protected.push(false);
            text.push('\n');
            line += 1;
            continue;
        }

        match state {
            Scan::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    text.push_str("  ");
                    state = Scan::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    text.push_str("  ");
                    literal_start = line;
                    state = Scan::BlockComment;
                }
                '"' => {
                    text.push('"');
                    state = Scan::Str;
                }
                '`' => {
                    text.push('`');
                    literal_start = line;
                    state = Scan::RawStr;
                }
                '\'' => {
                    text.push('\'');
                    state = Scan::Rune;
                }
                _ => text.push(c),
            },
            Scan::LineComment => text.push(' '),
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    text.push_str("  ");
                    state = Scan::Code;
                } else {
                    text.push(' ');
                }
            }
            Scan::Str | Scan::Rune => {
                let close = if state == Scan::Str { '"' } else { '\'' };
                if c == '\\' {
                    if chars.next_if(|&n| n != '\n').is_some() {
                        text.push(' ');
                    }
                    text.push(' ');
                } else if c == close {
                    text.push(close);
                    state = Scan::Code;
                } else {
                    text.push(' ');
                }
            }
            Scan::RawStr => {
                if c == '`' {
                    text.push('`');
                    state = Scan::Code;
                } else {
                    text.push(' ');
                }
            }
        }
    }

    match state {
        Scan::Code | Scan::LineComment => Ok(Masked { text, protected }),
        Scan::BlockComment => Err(format!("comment opened on line {literal_start} is not closed")),
        Scan::RawStr => Err(format!(
            "raw string opened on line {literal_start} is not closed"
        )),
        Scan::Str | Scan::Rune => Err(format!("literal on line {line} is not closed")),
    }
}

fn check_balance(masked: &str) -> std::result::Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    for (i, line) in masked.lines().enumerate() {
        for c in line.chars() {
            match c {
                '(' | '[' | '{' => stack.push((c, i + 1)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match stack.pop() {
                        Some((open, _)) if open == expected => {}
                        Some((open, opened)) => {
                            return Err(format!(
                                "unexpected '{c}' on line {}, '{open}' from line {opened} is still open",
                                i + 1
                            ));
                        }
                        None => return Err(format!("unexpected '{c}' on line {}", i + 1)),
                    }
                }
                _ => {}
            }
        }
    }
    match stack.pop() {
        Some((open, line)) => Err(format!("'{open}' opened on line {line} is not closed")),
        None => Ok(()),
    }
}

fn has_package_clause(masked_lines: &[&str]) -> bool {
    masked_lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .is_some_and(|l| l.starts_with("package "))
}

/// A top-level `import` declaration spanning lines `start..=end`.
struct ImportDecl {
    start: usize,
    end: usize,
    specs: Vec<ImportSpec>,
}

fn import_decls(lines: &[&str], masked: &[&str]) -> std::result::Result<Vec<ImportDecl>, String> {
    let mut decls = Vec::new();
    let mut i = 0;
    while i < masked.len() {
        let head = masked[i].trim_end();
        if head == "import (" {
            let start = i;
            let mut specs = Vec::new();
            i += 1;
            while i < masked.len() && masked[i].trim() != ")" {
                if !masked[i].trim().is_empty() {
                    specs.push(parse_spec(lines[i].trim(), i)?);
                }
                i += 1;
            }
            if i == masked.len() {
                return Err(format!("import block on line {} is not closed", start + 1));
            }
            decls.push(ImportDecl {
                start,
                end: i,
                specs,
            });
        } else if head.starts_with("import ") {
            let spec = parse_spec(lines[i]["import ".len()..].trim(), i)?;
            decls.push(ImportDecl {
                start: i,
                end: i,
                specs: vec![spec],
            });
        }
        i += 1;
    }
    Ok(decls)
}

fn parse_spec(text: &str, line: usize) -> std::result::Result<ImportSpec, String> {
    // Drop a trailing comment
    let text = match text.find("//") {
        Some(at) if text[..at].matches('"').count() % 2 == 0 => text[..at].trim_end(),
        _ => text,
    };
    let (alias, quoted) = match text.split_once(char::is_whitespace) {
        Some((alias, rest)) => (Some(alias.to_string()), rest.trim()),
        None => (None, text),
    };
    let path = quoted
        .strip_prefix('"')
        .and_then(|q| q.strip_suffix('"'))
        .ok_or_else(|| format!("malformed import on line {}", line + 1))?;

    Ok(ImportSpec {
        path: path.to_string(),
        alias,
    })
}

/// Name an import is referenced by. Unaliased imports use the package
/// name guessed from the path.
fn reference_name(spec: &ImportSpec) -> String {
    match &spec.alias {
        Some(alias) => alias.clone(),
        None => import_path_name(&spec.path),
    }
}

/// Add every identifier used as a qualifier (`ident.`) in `line`.
fn collect_qualifiers(line: &str, used: &mut HashSet<String>) {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let starts_ident = (c.is_alphabetic() || c == '_')
            && (i == 0 || !(is_ident_char(chars[i - 1]) || chars[i - 1] == '.'));
        if !starts_ident {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && is_ident_char(chars[i]) {
            i += 1;
        }
        if chars.get(i) == Some(&'.') {
            used.insert(chars[start..i].iter().collect());
        }
    }
}

fn collapse_blank_lines(lines: Vec<(String, bool)>) -> String {
    let mut out = String::new();
    let mut pending_blank = false;
    let mut started = false;
    for (line, keep) in lines {
        if line.is_empty() && !keep {
            pending_blank = started;
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(&line);
        out.push('\n');
        started = true;
    }
    out
}

#[cfg(test)]
mod tests {
    use mockgen_core::ErrorKind;

    use super::*;

    fn format(source: &str) -> String {
        BuiltinFormatter.format(source).unwrap()
    }

    #[test]
    fn test_well_formed_source_is_unchanged() {
        let source = "package examplemock\n\
                      \n\
                      import (\n\
                      \t\"github.com/stretchr/testify/mock\"\n\
                      )\n\
                      \n\
                      type TestMock struct {\n\
                      \tmock.Mock\n\
                      }\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_unused_imports_are_dropped_and_grouped() {
        let source = "package x\n\
                      \n\
                      import (\n\
                      \t\"github.com/stretchr/testify/mock\"\n\
                      \t\"github.com/acme/unused\"\n\
                      \t\"context\"\n\
                      )\n\
                      \n\
                      func F(ctx context.Context) { var _ mock.Mock }\n";
        assert_eq!(
            format(source),
            "package x\n\
             \n\
             import (\n\
             \t\"context\"\n\
             \n\
             \t\"github.com/stretchr/testify/mock\"\n\
             )\n\
             \n\
             func F(ctx context.Context) { var _ mock.Mock }\n"
        );
    }

    #[test]
    fn test_references_in_comments_and_strings_do_not_count() {
        let source = "package x\n\
                      \n\
                      import \"fmt\"\n\
                      \n\
                      // fmt.Println is not called\n\
                      var s = \"fmt.Sprintf\"\n";
        assert_eq!(
            format(source),
            "package x\n\n// fmt.Println is not called\nvar s = \"fmt.Sprintf\"\n"
        );
    }

    #[test]
    fn test_aliased_imports_keep_alias() {
        let source = "package x\n\
                      \n\
                      import (\n\
                      \thttperrors \"github.com/fastbill/go-httperrors/v2\"\n\
                      )\n\
                      \n\
                      var _ *httperrors.HTTPError\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_whitespace_normalization() {
        let source = "\n\npackage x   \n\n\n\nvar a = 1\t\n\n";
        assert_eq!(format(source), "package x\n\nvar a = 1\n");
    }

    #[test]
    fn test_raw_strings_are_kept_verbatim() {
        let source = "package x\n\nvar s = `a  \n\n\nb`\n";
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_unbalanced_source_is_rejected_with_raw() {
        let source = "package x\n\nfunc F() {\n";
        let err = BuiltinFormatter.format(source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formatting);
        match *err {
            Error::Format { message, raw } => {
                assert!(message.contains("line 3"), "{message}");
                assert_eq!(raw, source);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_delimiter_is_rejected() {
        let err = BuiltinFormatter.format("package x\n\nvar a = f(]\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formatting);
    }

    #[test]
    fn test_unterminated_literal_is_rejected() {
        let err = BuiltinFormatter.format("package x\n\nvar s = \"abc\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formatting);
    }

    #[test]
    fn test_missing_package_clause_is_rejected() {
        let err = BuiltinFormatter.format("// nothing here\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formatting);
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let source = "package x\n\nimport (\n\t\"io\"\n\t\"fmt\"\n)\n\n\n\nvar _ = fmt.Sprint(io.EOF)   \n";
        let once = format(source);
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_command_formatter_missing_program() {
        let formatter = CommandFormatter::new("definitely-not-a-formatter-xyz --flag");
        let err = formatter.format("package x\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Formatting);
    }

    #[test]
    fn test_formatter_for_config() {
        let builtin = formatter_for(&FormatConfig::default());
        assert_eq!(builtin.name(), "builtin");

        let gofmt = formatter_for(&FormatConfig {
            tool: FormatTool::Gofmt,
            command: "gofmt -s".to_string(),
        });
        assert_eq!(gofmt.name(), "gofmt");
    }
}
