//! Trusted rich text for message bodies.
//!
//! Assistant replies carry inline HTML produced by the backend. The backend is
//! trusted to emit safe markup; renderers never interpret the raw string and
//! only accept a parsed [`RichText`]. The parser understands a small inline
//! subset (`b`, `strong`, `i`, `em`, `code`, `br`, `p`, `ul`, `ol`, `li`,
//! `h1`-`h6`) plus character entities. Any other tag is dropped and its text
//! kept; `script` and `style` are dropped together with their contents.

/// Style flags of a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

/// Block role of a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LineKind {
    #[default]
    Text,
    Heading,
    /// List entry; `marker` is "•" or "3." and `depth` the nesting level (0-based).
    ListItem { marker: String, depth: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichLine {
    pub kind: LineKind,
    pub segments: Vec<Segment>,
}

impl RichLine {
    fn has_content(&self) -> bool {
        !self.segments.is_empty() || self.kind != LineKind::Text
    }

    /// Line text without styling; list entries get their marker and indent.
    pub fn plain_text(&self) -> String {
        let body: String = self.segments.iter().map(|s| s.text.as_str()).collect();
        match &self.kind {
            LineKind::ListItem { marker, depth } => {
                format!("{}{} {}", "  ".repeat(*depth), marker, body)
            }
            _ => body,
        }
    }
}

/// Parsed message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub lines: Vec<RichLine>,
}

impl RichText {
    /// Parses backend-supplied markup.
    pub fn parse(source: &str) -> Self {
        let mut builder = Builder::default();
        let mut rest = source;

        while let Some(lt) = rest.find('<') {
            builder.push_text(&rest[..lt]);
            let after = &rest[lt..];
            let opens_tag = after[1..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!');

            match after.find('>') {
                Some(gt) if opens_tag => {
                    builder.apply_tag(&after[1..gt]);
                    rest = &after[gt + 1..];
                }
                _ => {
                    builder.push_text("<");
                    rest = &after[1..];
                }
            }
        }
        builder.push_text(rest);
        builder.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whole body as plain text, one line per rich line.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RichLine::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Unordered,
    Ordered(u32),
}

#[derive(Default)]
struct Builder {
    lines: Vec<RichLine>,
    current: RichLine,
    bold: u32,
    italic: u32,
    code: u32,
    lists: Vec<ListKind>,
    skip_until: Option<String>,
    after_block: bool,
}

impl Builder {
    fn style(&self) -> SegmentStyle {
        SegmentStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            code: self.code > 0,
        }
    }

    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() || self.skip_until.is_some() {
            return;
        }
        let decoded = decode_entities(raw);
        for (index, piece) in decoded.split('\n').enumerate() {
            if index > 0 {
                if self.current.has_content() {
                    self.break_line();
                } else if !self.after_block {
                    self.lines.push(RichLine::default());
                }
            }
            self.append(piece);
        }
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() || (text.trim().is_empty() && !self.current.has_content()) {
            return;
        }
        self.after_block = false;
        let style = self.style();
        match self.current.segments.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.current.segments.push(Segment {
                text: text.to_string(),
                style,
            }),
        }
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
    }

    fn soft_break(&mut self) {
        if self.current.has_content() {
            self.break_line();
        }
        self.after_block = true;
    }

    fn blank_line(&mut self) {
        self.soft_break();
        if self.lines.last().is_some_and(RichLine::has_content) {
            self.lines.push(RichLine::default());
        }
    }

    fn apply_tag(&mut self, raw: &str) {
        let raw = raw.trim();
        let closing = raw.starts_with('/');
        let name: String = raw
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some(skipped) = &self.skip_until {
            if closing && *skipped == name {
                self.skip_until = None;
            }
            return;
        }

        match (name.as_str(), closing) {
            ("b" | "strong", false) => self.bold += 1,
            ("b" | "strong", true) => self.bold = self.bold.saturating_sub(1),
            ("i" | "em", false) => self.italic += 1,
            ("i" | "em", true) => self.italic = self.italic.saturating_sub(1),
            ("code", false) => self.code += 1,
            ("code", true) => self.code = self.code.saturating_sub(1),
            ("br", _) => {
                self.break_line();
                self.after_block = true;
            }
            ("p" | "div", false) => self.soft_break(),
            ("p" | "div", true) => self.blank_line(),
            ("ul", false) => {
                self.soft_break();
                self.lists.push(ListKind::Unordered);
            }
            ("ol", false) => {
                self.soft_break();
                self.lists.push(ListKind::Ordered(0));
            }
            ("ul" | "ol", true) => {
                self.soft_break();
                self.lists.pop();
            }
            ("li", false) => {
                self.soft_break();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        *n += 1;
                        format!("{}.", n)
                    }
                    _ => "•".to_string(),
                };
                self.current.kind = LineKind::ListItem { marker, depth };
            }
            ("li", true) => self.soft_break(),
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", false) => {
                self.soft_break();
                self.current.kind = LineKind::Heading;
                self.bold += 1;
            }
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", true) => {
                self.bold = self.bold.saturating_sub(1);
                self.soft_break();
            }
            ("script" | "style", false) if !raw.ends_with('/') => {
                self.skip_until = Some(name);
            }
            _ => {}
        }
    }

    fn finish(mut self) -> RichText {
        if self.current.has_content() {
            self.break_line();
        }

        let mut lines: Vec<RichLine> = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            let blank = !line.has_content();
            let previous_blank = lines.last().is_none_or(|l: &RichLine| !l.has_content());
            if blank && previous_blank {
                continue;
            }
            lines.push(line);
        }
        while lines.last().is_some_and(|l| !l.has_content()) {
            lines.pop();
        }

        RichText { lines }
    }
}

/// Decodes the character entities commonly found in generated markup.
fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&candidate[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
