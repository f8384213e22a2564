use mockgen_core::{Result, SourceContext};

/// One method block of a mock file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBlock {
    /// Full block text, doc comment included, without a trailing newline.
    pub text: String,
    /// Method name.
    pub name: String,
    /// Method name followed by its parameter list text, e.g.
    /// `Find(ctx context.Context, id int)`.
    pub signature_prefix: String,
}

/// A mock file split into its preamble and method blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMock {
    /// Everything up to and including the mock struct's closing brace,
    /// without a trailing newline.
    pub preamble: String,
    pub blocks: Vec<FunctionBlock>,
}

/// A source line with its byte offset.
struct Line<'a> {
    offset: usize,
    text: &'a str,
}

impl Line<'_> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn is_close(&self) -> bool {
        self.text.trim_end() == "}"
    }

    fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

fn lines(src: &str) -> Vec<Line<'_>> {
    let mut offset = 0;
    src.split_inclusive('\n')
        .map(|raw| {
            let line = Line {
                offset,
                text: raw.trim_end_matches(['\n', '\r']),
            };
            offset += raw.len();
            line
        })
        .collect()
}

/// Name declared by a `type X struct {` line.
fn struct_decl(line: &str) -> Option<&str> {
    let rest = line.trim_end().strip_prefix("type ")?;
    let name = rest.strip_suffix("struct {")?.trim_end();
    (!name.is_empty() && name.chars().all(mockgen_core::is_ident_char)).then_some(name)
}

/// Name of the first struct declared in `src`.
pub fn struct_name(src: &str) -> Option<String> {
    src.lines().find_map(struct_decl).map(str::to_string)
}

/// Split mock source into preamble and method blocks.
///
/// `filename` only labels diagnostics.
pub fn extract(src: &str, filename: &str) -> Result<ExtractedMock> {
    let ctx = SourceContext::new(src, filename);
    let lines = lines(src);

    // Scanning preamble
    let decl = lines
        .iter()
        .position(|l| struct_decl(l.text).is_some())
        .ok_or_else(|| ctx.extraction_error("no mock struct declaration found", None))?;
    let close = lines[decl..]
        .iter()
        .position(Line::is_close)
        .map(|i| decl + i)
        .ok_or_else(|| {
            let line = &lines[decl];
            ctx.extraction_error(
                "mock struct declaration is not closed",
                Some((line.offset, line.text.len()).into()),
            )
        })?;
    let preamble = src[..lines[close].end()].to_string();

    // Scanning blocks
    let mut blocks = Vec::new();
    let mut i = close + 1;
    while i < lines.len() {
        if lines[i].is_blank() {
            i += 1;
            continue;
        }
        let start = i;
        while i < lines.len() && !lines[i].is_close() {
            i += 1;
        }
        if i == lines.len() {
            let offset = lines[start].offset;
            return Err(ctx.extraction_error(
                "method block is not closed by a '}' line",
                Some((offset, src.len() - offset).into()),
            ));
        }
        let text = &src[lines[start].offset..lines[i].end()];
        let span = (lines[start].offset, text.len());
        let (name, signature_prefix) = signature(text).ok_or_else(|| {
            ctx.extraction_error("block has no method declaration", Some(span.into()))
        })?;
        tracing::trace!(method = %name, "extracted block");
        blocks.push(FunctionBlock {
            text: text.to_string(),
            name,
            signature_prefix,
        });
        i += 1;
    }

    // Done
    Ok(ExtractedMock { preamble, blocks })
}

/// Name and signature prefix of the method declared in `block`.
fn signature(block: &str) -> Option<(String, String)> {
    let header = block
        .lines()
        .find(|l| l.starts_with("func ("))?
        .strip_prefix("func ")?;
    let after_receiver = &header[balanced(header)?..];
    let rest = after_receiver.trim_start();

    let name_len = rest
        .char_indices()
        .find(|&(_, c)| !mockgen_core::is_ident_char(c))
        .map_or(rest.len(), |(i, _)| i);
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let params = &rest[name_len..];
    if !params.starts_with('(') {
        return None;
    }
    let params = &params[..balanced(params)?];
    Some((name.to_string(), format!("{name}{params}")))
}

/// Byte length of the parenthesized group `text` starts with.
fn balanced(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ if depth == 0 => return None,
            _ => {}
        }
    }
    None
}
