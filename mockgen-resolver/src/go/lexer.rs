//! Go lexer using logos derive macros.
//!
//! Produces the token stream the declaration parser works on, with Go's
//! automatic semicolon insertion applied: a newline after an identifier,
//! literal, `++`, `--`, `)`, `]` or `}` becomes a `;`.

use std::ops::Range;

use logos::Logos;

/// Byte-offset span within source text.
pub type Span = Range<usize>;

/// Skip a block comment, reporting whether it spanned lines.
fn block_comment<'s>(lex: &mut logos::Lexer<'s, Token<'s>>) -> Option<bool> {
    let end = lex.remainder().find("*/")?;
    let multiline = lex.remainder()[..end].contains('\n');
    lex.bump(end + 2);
    Some(multiline)
}

/// A Go token.
///
/// Only the keywords that introduce declarations and type syntax are
/// distinguished; statement keywords lex as identifiers.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token<'src> {
    #[token("\n")]
    Newline,
    /// `/* ... */`; true when it contains a newline.
    #[token("/*", block_comment)]
    BlockComment(bool),

    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("func")]
    Func,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident(&'src str),
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String(&'src str),
    #[regex(r"`[^`]*`")]
    RawString(&'src str),
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Rune(&'src str),
    #[regex(r"[0-9][0-9a-zA-Z_]*")]
    Int(&'src str),
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    Float(&'src str),

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("<-")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("=")]
    Assign,
    /// Any other operator; only seen inside skipped declarations. Loses
    /// ties to the single-character tokens above.
    #[regex(r"[+\-/%&|^!<>=:]+", priority = 1)]
    Op(&'src str),
}

impl Token<'_> {
    /// Whether a newline after this token ends the statement.
    fn ends_statement(&self) -> bool {
        match self {
            Token::Ident(_)
            | Token::String(_)
            | Token::RawString(_)
            | Token::Rune(_)
            | Token::Int(_)
            | Token::Float(_)
            | Token::RParen
            | Token::RBracket
            | Token::RBrace => true,
            Token::Op(op) => matches!(*op, "++" | "--"),
            _ => false,
        }
    }
}

/// Tokenize `source`, inserting semicolons and dropping newlines and
/// comments. Fails with the span of the first unrecognized input.
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Span)>, Span> {
    let mut out: Vec<(Token<'_>, Span)> = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.map_err(|()| span.clone())?;
        match token {
            Token::Newline | Token::BlockComment(true) => {
                if out.last().is_some_and(|(last, _)| last.ends_statement()) {
                    out.push((Token::Semi, span.start..span.start));
                }
            }
            Token::BlockComment(false) => {}
            _ => out.push((token, span)),
        }
    }

    if out.last().is_some_and(|(last, _)| last.ends_statement()) {
        out.push((Token::Semi, source.len()..source.len()));
    }
    Ok(out)
}
