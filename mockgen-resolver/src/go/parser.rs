//! Recursive-descent parser for Go declarations.
//!
//! Reads the package clause, imports and type declarations. Everything
//! else at top level is skipped up to the next `;` outside delimiters.

use mockgen_ir::ChanDir;

use super::{
    ast::{FieldDecl, Import, InterfaceElem, Param, Signature, SourceFile, TypeNode, TypeSpec},
    lexer::{Span, Token, tokenize},
};

/// A syntax error at `span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

type PResult<T> = std::result::Result<T, ParseError>;

/// Parse the declarations of one Go source file.
pub fn parse(source: &str) -> PResult<SourceFile> {
    let tokens = tokenize(source).map_err(|span| ParseError {
        message: "unrecognized input".to_string(),
        span,
    })?;
    Parser {
        tokens,
        pos: 0,
        eof: source.len(),
    }
    .source_file()
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Span)>,
    pos: usize,
    eof: usize,
}

/// One entry of a parameter list before names are distributed.
struct Entry {
    name: Option<String>,
    /// A lone identifier: a name in a named list, a type otherwise.
    lone: Option<String>,
    ty: Option<TypeNode>,
    variadic: bool,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'src>> {
        self.tokens.get(self.pos + offset).map(|(t, _)| *t)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or(self.eof..self.eof, |(_, s)| s.clone())
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: Token<'src>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> PResult<T> {
        Err(ParseError {
            message: message.into(),
            span: self.span(),
        })
    }

    fn expect(&mut self, expected: Token<'src>, what: &str) -> PResult<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            self.error(format!("expected {what}"))
        }
    }

    fn expect_ident(&mut self) -> PResult<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.to_string())
            }
            _ => self.error("expected identifier"),
        }
    }

    fn skip_semis(&mut self) {
        while self.eat(Token::Semi) {}
    }

    /// Consume a delimited group starting at the current opener.
    fn skip_group(&mut self) -> PResult<()> {
        let start = self.span();
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token {
                Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
                Token::RParen | Token::RBracket | Token::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(ParseError {
            message: "unclosed delimiter".to_string(),
            span: start,
        })
    }

    /// Skip to the end of the current element: a `;`, or the closer of the
    /// enclosing group, outside nested delimiters.
    fn skip_until_end(&mut self) -> PResult<()> {
        while let Some(token) = self.peek() {
            match token {
                Token::Semi | Token::RParen | Token::RBracket | Token::RBrace => return Ok(()),
                Token::LParen | Token::LBracket | Token::LBrace => self.skip_group()?,
                _ => self.pos += 1,
            }
        }
        Ok(())
    }

    fn source_file(mut self) -> PResult<SourceFile> {
        self.skip_semis();
        self.expect(Token::Package, "package clause")?;
        let package = self.expect_ident()?;

        let mut file = SourceFile {
            package,
            imports: Vec::new(),
            types: Vec::new(),
        };

        loop {
            self.skip_semis();
            match self.peek() {
                None => break,
                Some(Token::Import) => {
                    self.pos += 1;
                    self.grouped(|p| {
                        let import = p.import_spec()?;
                        file.imports.push(import);
                        Ok(())
                    })?;
                }
                Some(Token::Type) => {
                    self.pos += 1;
                    self.grouped(|p| {
                        let spec = p.type_spec()?;
                        file.types.push(spec);
                        Ok(())
                    })?;
                }
                Some(_) => {
                    self.skip_until_end()?;
                    // A stray closer at top level
                    if !matches!(self.peek(), Some(Token::Semi) | None) {
                        return self.error("unexpected closing delimiter");
                    }
                }
            }
        }

        Ok(file)
    }

    /// Parse `spec` or `( spec; spec; ... )`.
    fn grouped(&mut self, mut spec: impl FnMut(&mut Self) -> PResult<()>) -> PResult<()> {
        if !self.eat(Token::LParen) {
            return spec(self);
        }
        loop {
            self.skip_semis();
            if self.eat(Token::RParen) {
                return Ok(());
            }
            spec(self)?;
            if !self.eat(Token::Semi) {
                return self.expect(Token::RParen, "')'");
            }
        }
    }

    fn import_spec(&mut self) -> PResult<Import> {
        let name = match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Some(name.to_string())
            }
            Some(Token::Dot) => {
                self.pos += 1;
                Some(".".to_string())
            }
            _ => None,
        };
        match self.peek() {
            Some(Token::String(lit) | Token::RawString(lit)) => {
                self.pos += 1;
                Ok(Import {
                    name,
                    path: unquote(lit),
                })
            }
            _ => self.error("expected import path"),
        }
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let span = self.span();
        let name = self.expect_ident()?;
        let generic = self.peek() == Some(Token::LBracket) && self.at_type_params();
        if generic {
            self.skip_group()?;
        }
        let alias = self.eat(Token::Assign);
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            generic,
            alias,
            ty,
            span,
        })
    }

    /// At `[`: type parameters (`[T any]`) rather than an array length
    /// (`[N]T`, `[4]T`).
    fn at_type_params(&self) -> bool {
        matches!(self.peek_at(1), Some(Token::Ident(_)))
            && matches!(
                self.peek_at(2),
                Some(
                    Token::Ident(_)
                        | Token::Comma
                        | Token::Interface
                        | Token::Tilde
                        | Token::LBracket
                        | Token::Func
                        | Token::Map
                        | Token::Chan
                        | Token::Struct
                )
            )
    }

    fn starts_type(token: Option<Token<'_>>) -> bool {
        matches!(
            token,
            Some(
                Token::Ident(_)
                    | Token::Star
                    | Token::LBracket
                    | Token::Map
                    | Token::Chan
                    | Token::Arrow
                    | Token::Func
                    | Token::Struct
                    | Token::Interface
                    | Token::LParen
            )
        )
    }

    fn parse_type(&mut self) -> PResult<TypeNode> {
        let Some(token) = self.peek() else {
            return self.error("expected type");
        };
        Ok(match token {
            Token::Ident(first) => {
                self.pos += 1;
                let name = if self.eat(Token::Dot) {
                    TypeNode::Name {
                        package: Some(first.to_string()),
                        name: self.expect_ident()?,
                    }
                } else {
                    TypeNode::name(first)
                };
                if self.peek() == Some(Token::LBracket) {
                    self.skip_group()?;
                    TypeNode::Instance(Box::new(name))
                } else {
                    name
                }
            }
            Token::Star => {
                self.pos += 1;
                TypeNode::Pointer(Box::new(self.parse_type()?))
            }
            Token::LBracket => {
                self.pos += 1;
                if self.eat(Token::RBracket) {
                    TypeNode::Slice(Box::new(self.parse_type()?))
                } else {
                    let len = match (self.peek(), self.peek_at(1)) {
                        (Some(Token::Int(lit)), Some(Token::RBracket)) => {
                            self.pos += 1;
                            parse_int(lit)
                        }
                        _ => {
                            self.skip_until_end()?;
                            None
                        }
                    };
                    self.expect(Token::RBracket, "']'")?;
                    TypeNode::Array {
                        len,
                        elem: Box::new(self.parse_type()?),
                    }
                }
            }
            Token::Map => {
                self.pos += 1;
                self.expect(Token::LBracket, "'['")?;
                let key = self.parse_type()?;
                self.expect(Token::RBracket, "']'")?;
                TypeNode::Map {
                    key: Box::new(key),
                    value: Box::new(self.parse_type()?),
                }
            }
            Token::Chan => {
                self.pos += 1;
                let dir = if self.eat(Token::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                TypeNode::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                }
            }
            Token::Arrow => {
                self.pos += 1;
                self.expect(Token::Chan, "'chan'")?;
                TypeNode::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                }
            }
            Token::Func => {
                self.pos += 1;
                TypeNode::Func(self.signature()?)
            }
            Token::Struct => {
                self.pos += 1;
                TypeNode::Struct(self.struct_fields()?)
            }
            Token::Interface => {
                self.pos += 1;
                TypeNode::Interface(self.interface_elems()?)
            }
            Token::LParen => {
                self.pos += 1;
                let ty = self.parse_type()?;
                self.expect(Token::RParen, "')'")?;
                ty
            }
            _ => return self.error("expected type"),
        })
    }

    fn signature(&mut self) -> PResult<Signature> {
        let (params, variadic) = self.params()?;
        let results = if self.peek() == Some(Token::LParen) {
            self.params()?.0
        } else if Self::starts_type(self.peek()) {
            vec![Param {
                name: None,
                ty: self.parse_type()?,
            }]
        } else {
            Vec::new()
        };
        Ok(Signature {
            params,
            results,
            variadic,
        })
    }

    /// Parse `( ... )` with Go's grouping rules: either every entry is
    /// named (`a, b int, c string`) or none is (`int, string`).
    fn params(&mut self) -> PResult<(Vec<Param>, bool)> {
        let start = self.span();
        self.expect(Token::LParen, "'('")?;

        let mut entries = Vec::new();
        loop {
            if self.eat(Token::RParen) {
                break;
            }
            let entry = match (self.peek(), self.peek_at(1)) {
                (Some(Token::Ident(name)), Some(Token::Comma | Token::RParen)) => {
                    self.pos += 1;
                    Entry {
                        name: None,
                        lone: Some(name.to_string()),
                        ty: None,
                        variadic: false,
                    }
                }
                (Some(Token::Ident(name)), Some(next)) if next != Token::Dot => {
                    self.pos += 1;
                    let variadic = self.eat(Token::Ellipsis);
                    Entry {
                        name: Some(name.to_string()),
                        lone: None,
                        ty: Some(self.parse_type()?),
                        variadic,
                    }
                }
                _ => {
                    let variadic = self.eat(Token::Ellipsis);
                    Entry {
                        name: None,
                        lone: None,
                        ty: Some(self.parse_type()?),
                        variadic,
                    }
                }
            };
            entries.push(entry);
            if !self.eat(Token::Comma) {
                self.expect(Token::RParen, "')'")?;
                break;
            }
        }

        let variadic = entries.last().is_some_and(|e| e.variadic);
        if entries.iter().any(|e| e.name.is_some()) {
            // Lone identifiers are names sharing the type that follows
            let mut params = Vec::with_capacity(entries.len());
            let mut pending: Option<TypeNode> = None;
            for entry in entries.into_iter().rev() {
                match entry {
                    Entry {
                        name: Some(name),
                        ty: Some(ty),
                        ..
                    } => {
                        pending = Some(ty.clone());
                        params.push(Param {
                            name: Some(name),
                            ty,
                        });
                    }
                    Entry {
                        lone: Some(name), ..
                    } => {
                        let Some(ty) = pending.clone() else {
                            return Err(ParseError {
                                message: format!("parameter '{name}' has no type"),
                                span: start,
                            });
                        };
                        params.push(Param {
                            name: Some(name),
                            ty,
                        });
                    }
                    _ => {
                        return Err(ParseError {
                            message: "mixed named and unnamed parameters".to_string(),
                            span: start,
                        });
                    }
                }
            }
            params.reverse();
            Ok((params, variadic))
        } else {
            let params = entries
                .into_iter()
                .map(|entry| Param {
                    name: None,
                    ty: entry.ty.unwrap_or_else(|| {
                        TypeNode::name(entry.lone.unwrap_or_default())
                    }),
                })
                .collect();
            Ok((params, variadic))
        }
    }

    fn struct_fields(&mut self) -> PResult<Vec<FieldDecl>> {
        self.expect(Token::LBrace, "'{'")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semis();
            if self.eat(Token::RBrace) {
                return Ok(fields);
            }
            fields.push(self.field_decl()?);
            // Tag
            if matches!(self.peek(), Some(Token::String(_) | Token::RawString(_))) {
                self.pos += 1;
            }
            if !self.eat(Token::Semi) {
                self.expect(Token::RBrace, "'}'")?;
                return Ok(fields);
            }
        }
    }

    fn field_decl(&mut self) -> PResult<FieldDecl> {
        let embedded = match (self.peek(), self.peek_at(1)) {
            (Some(Token::Star), _) => true,
            (Some(Token::Ident(_)), next) => matches!(
                next,
                Some(Token::Dot | Token::Semi | Token::RBrace | Token::String(_) | Token::RawString(_))
            ),
            _ => return self.error("expected field"),
        };
        if embedded {
            return Ok(FieldDecl {
                names: Vec::new(),
                ty: self.parse_type()?,
            });
        }

        let mut names = vec![self.expect_ident()?];
        while self.eat(Token::Comma) {
            names.push(self.expect_ident()?);
        }
        Ok(FieldDecl {
            names,
            ty: self.parse_type()?,
        })
    }

    fn interface_elems(&mut self) -> PResult<Vec<InterfaceElem>> {
        self.expect(Token::LBrace, "'{'")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semis();
            if self.eat(Token::RBrace) {
                return Ok(elems);
            }
            elems.push(self.interface_elem()?);
            if !self.eat(Token::Semi) {
                self.expect(Token::RBrace, "'}'")?;
                return Ok(elems);
            }
        }
    }

    fn interface_elem(&mut self) -> PResult<InterfaceElem> {
        let start = self.span();
        match (self.peek(), self.peek_at(1)) {
            (Some(Token::Ident(name)), Some(Token::LParen)) => {
                self.pos += 1;
                let sig = self.signature()?;
                Ok(InterfaceElem::Method {
                    name: name.to_string(),
                    sig,
                    span: start,
                })
            }
            (Some(Token::Tilde), _) => {
                self.skip_until_end()?;
                Ok(InterfaceElem::Constraint { span: start })
            }
            _ => {
                let ty = self.parse_type()?;
                if self.peek() == Some(Token::Pipe) {
                    self.skip_until_end()?;
                    return Ok(InterfaceElem::Constraint { span: start });
                }
                Ok(InterfaceElem::Embedded { ty, span: start })
            }
        }
    }
}

/// Contents of a Go string literal, with common escapes decoded.
fn unquote(lit: &str) -> String {
    let inner = &lit[1..lit.len().saturating_sub(1).max(1)];
    if lit.starts_with('`') {
        return inner.to_string();
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn parse_int(lit: &str) -> Option<u64> {
    let digits = lit.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        u64::from_str_radix(oct, 8).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        u64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> TypeNode {
        TypeNode::name(n)
    }

    fn qualified(p: &str, n: &str) -> TypeNode {
        TypeNode::Name {
            package: Some(p.to_string()),
            name: n.to_string(),
        }
    }

    fn only_type(source: &str) -> TypeSpec {
        let file = parse(source).unwrap();
        assert_eq!(file.types.len(), 1, "{file:?}");
        file.types.into_iter().next().unwrap()
    }

    fn methods(spec: &TypeSpec) -> Vec<(&str, &Signature)> {
        let TypeNode::Interface(elems) = &spec.ty else {
            panic!("not an interface: {spec:?}");
        };
        elems
            .iter()
            .filter_map(|e| match e {
                InterfaceElem::Method { name, sig, .. } => Some((name.as_str(), sig)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            "// Package example.\npackage example\n\n\
             import \"context\"\n\
             import (\n\
             \t\"github.com/fastbill/go-httperrors/v2\"\n\
             \tm \"github.com/acme/model\"\n\
             \t_ \"embed\"\n\
             )\n",
        )
        .unwrap();

        assert_eq!(file.package, "example");
        assert_eq!(
            file.imports,
            vec![
                Import {
                    name: None,
                    path: "context".to_string()
                },
                Import {
                    name: None,
                    path: "github.com/fastbill/go-httperrors/v2".to_string()
                },
                Import {
                    name: Some("m".to_string()),
                    path: "github.com/acme/model".to_string()
                },
                Import {
                    name: Some("_".to_string()),
                    path: "embed".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_other_declarations_are_skipped() {
        let file = parse(
            "package x\n\
             const (\n\tA = iota\n\tB\n)\n\
             var m = map[string]int{\"a\": 1}\n\
             func (s *S) F(x int) (int, error) {\n\tif x > 0 {\n\t\treturn x, nil\n\t}\n\treturn 0, nil\n}\n\
             func G[T any](t T) T { return t }\n\
             type S struct{}\n",
        )
        .unwrap();

        assert_eq!(file.types.len(), 1);
        assert_eq!(file.types[0].name, "S");
    }

    #[test]
    fn test_interface_methods_with_grouped_params() {
        let spec = only_type(
            "package example\n\
             type Exampler interface {\n\
             \tFunctionA(user *model.StructA) (resultStr string, err error)\n\
             \tFunctionC(name, address string, age int) *model.StructA\n\
             \tClose()\n\
             }\n",
        );
        let methods = methods(&spec);
        assert_eq!(methods.len(), 3);

        let (n, a) = methods[0];
        assert_eq!(n, "FunctionA");
        assert_eq!(
            a.params,
            vec![Param {
                name: Some("user".to_string()),
                ty: TypeNode::Pointer(Box::new(qualified("model", "StructA"))),
            }]
        );
        assert_eq!(a.results[0].name.as_deref(), Some("resultStr"));
        assert_eq!(a.results[1].ty, name("error"));

        let (_, c) = methods[1];
        let names: Vec<_> = c.params.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(names, [Some("name"), Some("address"), Some("age")]);
        assert_eq!(c.params[0].ty, name("string"));
        assert_eq!(c.params[1].ty, name("string"));
        assert_eq!(c.params[2].ty, name("int"));

        let (_, close) = methods[2];
        assert!(close.params.is_empty() && close.results.is_empty());
    }

    #[test]
    fn test_unnamed_and_variadic_params() {
        let spec = only_type(
            "package x\ntype L interface {\n\tLog(string, ...interface{})\n\tSum(xs ...int) int\n}\n",
        );
        let methods = methods(&spec);

        let (_, log) = methods[0];
        assert!(log.variadic);
        assert_eq!(log.params[0], Param { name: None, ty: name("string") });
        assert_eq!(log.params[1].ty, TypeNode::Interface(vec![]));

        let (_, sum) = methods[1];
        assert!(sum.variadic);
        assert_eq!(sum.params[0].name.as_deref(), Some("xs"));
        assert_eq!(sum.params[0].ty, name("int"));
    }

    #[test]
    fn test_composite_types() {
        let spec = only_type(
            "package x\n\
             type Handler func(ctx context.Context, in <-chan []byte, out chan<- map[string]*T, f func(int) (bool, error), a [0x10]byte) error\n",
        );
        let TypeNode::Func(sig) = spec.ty else {
            panic!("not a func type");
        };
        assert_eq!(sig.params.len(), 5);
        assert_eq!(
            sig.params[1].ty,
            TypeNode::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(TypeNode::Slice(Box::new(name("byte")))),
            }
        );
        assert_eq!(
            sig.params[2].ty,
            TypeNode::Chan {
                dir: ChanDir::Send,
                elem: Box::new(TypeNode::Map {
                    key: Box::new(name("string")),
                    value: Box::new(TypeNode::Pointer(Box::new(name("T")))),
                }),
            }
        );
        let TypeNode::Func(inner) = &sig.params[3].ty else {
            panic!("not a func param");
        };
        assert_eq!(inner.results.len(), 2);
        assert_eq!(
            sig.params[4].ty,
            TypeNode::Array {
                len: Some(16),
                elem: Box::new(name("byte")),
            }
        );
        assert_eq!(sig.results[0].ty, name("error"));
    }

    #[test]
    fn test_struct_fields() {
        let spec = only_type(
            "package x\n\
             type S struct {\n\
             \t*Base\n\
             \tio.Reader\n\
             \tA, B int `json:\"a\"`\n\
             \tC struct{ D string }\n\
             }\n",
        );
        let TypeNode::Struct(fields) = spec.ty else {
            panic!("not a struct");
        };
        assert_eq!(fields.len(), 4);
        assert!(fields[0].names.is_empty());
        assert_eq!(fields[1].ty, qualified("io", "Reader"));
        assert_eq!(fields[2].names, ["A", "B"]);
        assert!(matches!(fields[3].ty, TypeNode::Struct(ref inner) if inner.len() == 1));
    }

    #[test]
    fn test_generics_and_constraints() {
        let file = parse(
            "package x\n\
             type List[T any] struct{ items []T }\n\
             type Number interface {\n\t~int | ~float64\n}\n\
             type Array [4]int\n\
             type Getter interface {\n\tio.Closer\n\tGet() List[int]\n}\n",
        )
        .unwrap();

        assert!(file.types[0].generic);
        let TypeNode::Interface(elems) = &file.types[1].ty else {
            panic!("not an interface");
        };
        assert!(matches!(elems[0], InterfaceElem::Constraint { .. }));
        assert!(!file.types[2].generic);
        assert!(matches!(file.types[2].ty, TypeNode::Array { len: Some(4), .. }));

        let TypeNode::Interface(elems) = &file.types[3].ty else {
            panic!("not an interface");
        };
        assert!(matches!(&elems[0], InterfaceElem::Embedded { ty, .. } if *ty == qualified("io", "Closer")));
        let InterfaceElem::Method { sig, .. } = &elems[1] else {
            panic!("not a method");
        };
        assert_eq!(sig.results[0].ty, TypeNode::Instance(Box::new(name("List"))));
    }

    #[test]
    fn test_alias_declaration() {
        let spec = only_type("package x\ntype Reader = io.Reader\n");
        assert!(spec.alias);
        assert_eq!(spec.ty, qualified("io", "Reader"));
    }

    #[test]
    fn test_syntax_errors_carry_span() {
        let source = "package x\ntype A interface {\n\tGet(\n";
        let err = parse(source).unwrap_err();
        assert_eq!(err.span, source.len()..source.len());

        let err = parse("type A int\n").unwrap_err();
        assert_eq!(err.message, "expected package clause");
    }
}
