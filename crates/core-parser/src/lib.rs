//! Character-level HTML state machine (spec §4.3). Turns a `&str` into a
//! `core_model::Document` without ever panicking — malformed markup is
//! degraded, not rejected.
//!
//! The ten states (`Text`, `TagOpen`, `TagName`, `Attributes`,
//! `AttributeName`, `AttributeValue`, `AttributeQuoted`, `TagClose`,
//! `EndTag`, `Comment`) are folded into `State` below; `AttributeQuoted`
//! carries the quote character it is waiting to see again.
//!
//! Tree construction avoids parent pointers: open elements live on
//! `Parser::stack` as `(original_tag, in-progress Node)` pairs, and a node
//! is only ever appended to its parent's `children` at the moment it is
//! popped — by a matching end tag, by self-closing syntax, or by the
//! end-of-input flush.

use core_model::{
    Context, Document, Metadata, Node, BLOCK_TAGS, METADATA_TAGS, NORMALIZED_FORMATTING_TAGS,
    VOID_TAGS,
};

/// Default ceiling on stack depth (spec §4.3 safety bounds).
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 50;
/// Default ceiling on input length in codepoints; input beyond this is
/// silently truncated.
pub const DEFAULT_MAX_INPUT_LEN: usize = 1_000_000;
/// Default ceiling on recoverable parse errors before the parser
/// short-circuits the remainder of the input.
pub const DEFAULT_MAX_PARSER_ERRORS: usize = 100;

const COMMENT_SAFETY_CAP: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    TagOpen,
    TagName,
    Attributes,
    AttributeName,
    AttributeValue,
    AttributeQuoted(char),
    TagClose,
    EndTag,
    Comment,
}

struct OpenElement {
    original_tag: String,
    node: Node,
}

/// Tunable limits threaded into a [`Parser`] (spec §4.3). `Default`
/// matches the spec's stated defaults.
#[derive(Debug, Clone, Copy)]
pub struct ParserLimits {
    pub max_nesting_depth: usize,
    pub max_input_len: usize,
    pub max_parser_errors: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
            max_parser_errors: DEFAULT_MAX_PARSER_ERRORS,
        }
    }
}

pub struct Parser {
    limits: ParserLimits,
    state: State,
    stack: Vec<OpenElement>,
    root: Node,
    metadata: Metadata,
    text_buffer: String,
    tag_name: String,
    is_end_tag: bool,
    attr_name: String,
    attr_value: String,
    attrs_pending: Vec<(String, String)>,
    comment_len: usize,
    comment_tail: [char; 2],
    error_count: usize,
    degraded: bool,
}

impl Parser {
    pub fn new(limits: ParserLimits) -> Self {
        Self {
            limits,
            state: State::Text,
            stack: Vec::new(),
            root: Node::root(),
            metadata: Metadata::default(),
            text_buffer: String::new(),
            tag_name: String::new(),
            is_end_tag: false,
            attr_name: String::new(),
            attr_value: String::new(),
            attrs_pending: Vec::new(),
            comment_len: 0,
            comment_tail: ['\0', '\0'],
            error_count: 0,
            degraded: false,
        }
    }

    /// Parse `input` into a [`Document`]. Never panics, never returns
    /// `Err` — degraded input just yields a smaller or flatter tree (spec
    /// §4.3, §8: "parse(s) terminates and returns a tree of bounded
    /// depth").
    pub fn parse(input: &str) -> Document {
        Self::new(ParserLimits::default()).parse_with(input)
    }

    pub fn parse_with(mut self, input: &str) -> Document {
        for c in input.chars().take(self.limits.max_input_len) {
            self.feed(c);
        }
        self.finish()
    }

    /// Past the error threshold the parser stops trying to recognize
    /// markup at all and treats everything else as literal text (spec
    /// §4.3: "enters a recovery mode that discards the current tag and
    /// returns to `Text`"). This still terminates in the normal number
    /// of steps and still yields a usable, if plainer, tree.
    fn feed(&mut self, c: char) {
        if self.degraded {
            self.text_buffer.push(c);
            return;
        }
        match self.state {
            State::Text => self.feed_text(c),
            State::TagOpen => self.feed_tag_open(c),
            State::TagName => self.feed_tag_name(c),
            State::Attributes => self.feed_attributes(c),
            State::AttributeName => self.feed_attribute_name(c),
            State::AttributeValue => self.feed_attribute_value(c),
            State::AttributeQuoted(quote) => self.feed_attribute_quoted(c, quote),
            State::TagClose => self.feed_tag_close(c),
            State::EndTag => self.feed_end_tag(c),
            State::Comment => self.feed_comment(c),
        }
    }

    fn feed_text(&mut self, c: char) {
        if c == '<' {
            self.flush_text();
            self.state = State::TagOpen;
        } else {
            self.text_buffer.push(c);
        }
    }

    fn feed_tag_open(&mut self, c: char) {
        if c == '/' {
            self.is_end_tag = true;
            self.tag_name.clear();
            self.state = State::EndTag;
        } else if c == '!' {
            self.comment_len = 0;
            self.comment_tail = ['\0', '\0'];
            self.state = State::Comment;
        } else if c.is_whitespace() {
            // `< ` with no tag name: not a tag, recover to text.
            self.record_error();
            self.text_buffer.push('<');
            self.text_buffer.push(c);
            self.state = State::Text;
        } else {
            self.is_end_tag = false;
            self.tag_name.clear();
            self.tag_name.push(c.to_ascii_lowercase());
            self.attrs_pending.clear();
            self.state = State::TagName;
        }
    }

    fn feed_tag_name(&mut self, c: char) {
        if c.is_whitespace() {
            self.state = State::Attributes;
        } else if c == '>' {
            self.open_tag(false);
            self.state = State::Text;
        } else if c == '/' {
            self.state = State::TagClose;
        } else {
            self.tag_name.push(c.to_ascii_lowercase());
        }
    }

    fn feed_attributes(&mut self, c: char) {
        if c.is_whitespace() {
            // stay
        } else if c == '>' {
            self.open_tag(false);
            self.state = State::Text;
        } else if c == '/' {
            self.state = State::TagClose;
        } else {
            self.attr_name.clear();
            self.attr_name.push(c.to_ascii_lowercase());
            self.state = State::AttributeName;
        }
    }

    fn feed_attribute_name(&mut self, c: char) {
        if c == '=' {
            self.attr_value.clear();
            self.state = State::AttributeValue;
        } else if c.is_whitespace() {
            // valueless attribute
            self.attrs_pending
                .push((std::mem::take(&mut self.attr_name), String::new()));
            self.state = State::Attributes;
        } else if c == '>' {
            self.attrs_pending
                .push((std::mem::take(&mut self.attr_name), String::new()));
            self.open_tag(false);
            self.state = State::Text;
        } else {
            self.attr_name.push(c.to_ascii_lowercase());
        }
    }

    fn feed_attribute_value(&mut self, c: char) {
        if c == '"' || c == '\'' {
            self.state = State::AttributeQuoted(c);
        } else if c.is_whitespace() {
            self.attrs_pending.push((
                std::mem::take(&mut self.attr_name),
                std::mem::take(&mut self.attr_value),
            ));
            self.state = State::Attributes;
        } else if c == '>' {
            self.attrs_pending.push((
                std::mem::take(&mut self.attr_name),
                std::mem::take(&mut self.attr_value),
            ));
            self.open_tag(false);
            self.state = State::Text;
        } else {
            self.attr_value.push(c);
        }
    }

    fn feed_attribute_quoted(&mut self, c: char, quote: char) {
        if c == quote {
            self.attrs_pending.push((
                std::mem::take(&mut self.attr_name),
                std::mem::take(&mut self.attr_value),
            ));
            self.state = State::Attributes;
        } else {
            self.attr_value.push(c);
        }
    }

    fn feed_tag_close(&mut self, c: char) {
        if c == '>' {
            self.open_tag(true);
            self.state = State::Text;
        } else {
            // malformed `/` not immediately followed by `>`; recover by
            // treating the rest as ordinary attribute soup.
            self.record_error();
            self.state = State::Attributes;
            self.feed_attributes(c);
        }
    }

    fn feed_end_tag(&mut self, c: char) {
        if c == '>' {
            let tag = std::mem::take(&mut self.tag_name);
            self.close_tag(&tag);
            self.state = State::Text;
        } else if c.is_whitespace() {
            // tolerate `</p >`
        } else {
            self.tag_name.push(c.to_ascii_lowercase());
        }
    }

    fn feed_comment(&mut self, c: char) {
        self.comment_len += 1;
        self.comment_tail = [self.comment_tail[1], c];
        if self.comment_tail == ['-', '-'] {
            // will confirm on next '>' ; nothing to do here but track tail
        }
        if c == '>' && self.comment_tail[0] == '-' && self.comment_tail[1] == '>' {
            self.state = State::Text;
            return;
        }
        if self.comment_len > COMMENT_SAFETY_CAP {
            // runaway comment: abandon it and resume scanning text.
            self.state = State::Text;
        }
    }

    fn flush_text(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.text_buffer);
        let context = self.current_context();
        self.push_to_current_parent(Node::text(content, context));
    }

    fn current_context(&self) -> Context {
        self.stack.last().map(|e| e.node.context).unwrap_or(Context::Root)
    }

    /// Finalize a tag head (`>` or `/>` seen). `explicit_self_close` is
    /// `true` only for the `/>` spelling; void tags self-close regardless.
    fn open_tag(&mut self, explicit_self_close: bool) {
        let raw_tag = std::mem::take(&mut self.tag_name);
        if raw_tag.is_empty() {
            self.record_error();
            return;
        }
        let attrs = std::mem::take(&mut self.attrs_pending);
        let parent_context = self.current_context();
        let forces_inline = self
            .stack
            .last()
            .map(|e| core_model::FORCES_INLINE_CHILDREN.contains(&e.node.tag.as_str()))
            .unwrap_or(false);

        if raw_tag == "meta" {
            let name = attrs.iter().find(|(k, _)| k == "name").map(|(_, v)| v.clone());
            let content = attrs
                .iter()
                .find(|(k, _)| k == "content")
                .map(|(_, v)| v.clone());
            if let (Some(name), Some(content)) = (name, content) {
                self.metadata.meta.push((name, content));
            }
            return;
        }

        let (render_tag, style) = normalize_tag(&raw_tag);
        let mut context = if forces_inline {
            Context::Inline
        } else {
            Node::context_for(&render_tag, parent_context)
        };
        if matches!(parent_context, Context::Root) && !BLOCK_TAGS.contains(&render_tag.as_str()) {
            // stray inline content directly under the document root still
            // needs somewhere to flow; treat it as inline text at the top.
            context = Context::Inline;
        }

        let mut node = Node::element(render_tag.clone(), context);
        for (k, v) in attrs {
            node.attributes.insert(k, v);
        }
        if let Some(style) = style {
            node.attributes.insert("style".to_string(), style.to_string());
        }

        let is_void = VOID_TAGS.contains(&raw_tag.as_str());
        let self_closes = explicit_self_close || is_void;
        let depth_exhausted = self.stack.len() >= self.limits.max_nesting_depth;

        if self_closes || depth_exhausted {
            self.push_to_current_parent(node);
            return;
        }

        self.stack.push(OpenElement {
            original_tag: raw_tag,
            node,
        });
    }

    fn close_tag(&mut self, tag: &str) {
        if let Some(idx) = self.stack.iter().rposition(|e| e.original_tag == *tag) {
            while self.stack.len() > idx {
                let finished = self.stack.pop().expect("checked len above");
                self.finish_element(finished);
            }
        } else {
            self.record_error();
        }
    }

    fn finish_element(&mut self, finished: OpenElement) {
        let OpenElement { node, .. } = finished;
        if METADATA_TAGS.contains(&node.tag.as_str()) {
            self.capture_metadata(node);
        } else {
            self.push_to_current_parent(node);
        }
    }

    fn capture_metadata(&mut self, node: Node) {
        let text = node.text_content();
        match node.tag.as_str() {
            "title" => self.metadata.title = Some(text),
            "style" => self.metadata.style_blocks.push(text),
            "script" => self.metadata.script_blocks.push(text),
            _ => {}
        }
    }

    fn push_to_current_parent(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.node.children.push(node);
        } else {
            self.root.children.push(node);
        }
    }

    fn record_error(&mut self) {
        self.error_count += 1;
        if self.error_count == self.limits.max_parser_errors + 1 {
            self.degraded = true;
            self.state = State::Text;
            self.tag_name.clear();
            self.attr_name.clear();
            self.attr_value.clear();
            self.attrs_pending.clear();
            tracing::warn!(
                target: "parser.recovery",
                errors = self.error_count,
                "exceeded max_parser_errors, discarding markup recognition for remainder of input"
            );
        } else if self.error_count > 0 {
            tracing::trace!(target: "parser.recovery", errors = self.error_count, "recovered malformation");
        }
    }

    fn finish(mut self) -> Document {
        self.flush_text();
        while let Some(top) = self.stack.pop() {
            self.finish_element(top);
        }
        Document {
            root: self.root,
            metadata: self.metadata,
        }
    }
}

/// Formatting-tag normalization (spec §3, §4.3): `b`/`strong` and `i`/`em`
/// become `span` carrying a `style` attribute; anything else passes
/// through unchanged.
fn normalize_tag(raw_tag: &str) -> (String, Option<&'static str>) {
    if NORMALIZED_FORMATTING_TAGS.contains(&raw_tag) {
        let style = match raw_tag {
            "b" | "strong" => "font-weight: bold",
            "i" | "em" => "font-style: italic",
            _ => unreachable!(),
        };
        ("span".to_string(), Some(style))
    } else {
        (raw_tag.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::NodeKind;
    use pretty_assertions::assert_eq;

    fn only_child(node: &Node) -> &Node {
        assert_eq!(node.children.len(), 1);
        &node.children[0]
    }

    #[test]
    fn basic_inline_formatting_normalizes_b_and_i() {
        let doc = Parser::parse("<p>Hello <b>world</b> and <i>friends</i></p>");
        let p = only_child(&doc.root);
        assert_eq!(p.tag, "p");
        assert_eq!(p.context, Context::Block);
        let bold = &p.children[1];
        assert_eq!(bold.tag, "span");
        assert_eq!(bold.attr("style"), Some("font-weight: bold"));
        assert_eq!(bold.context, Context::Inline);
        let italic = &p.children[3];
        assert_eq!(italic.attr("style"), Some("font-style: italic"));
    }

    #[test]
    fn hyperlink_carries_href_and_inline_context() {
        let doc = Parser::parse(r#"<p>Visit <a href="https://example.com">here</a></p>"#);
        let p = only_child(&doc.root);
        let a = &p.children[1];
        assert_eq!(a.tag, "a");
        assert_eq!(a.attr("href"), Some("https://example.com"));
        assert_eq!(a.text_content(), "here");
    }

    #[test]
    fn nested_list_mixes_formatting_and_preserves_structure() {
        let doc = Parser::parse("<ul><li>one</li><li><b>two</b><ul><li>nested</li></ul></li></ul>");
        let ul = only_child(&doc.root);
        assert_eq!(ul.tag, "ul");
        assert_eq!(ul.children.len(), 2);
        let li2 = &ul.children[1];
        assert_eq!(li2.context, Context::Inline);
        let nested_ul = &li2.children[1];
        assert_eq!(nested_ul.tag, "ul");
        assert_eq!(nested_ul.context, Context::Inline);
    }

    #[test]
    fn malformed_unclosed_tag_recovers_at_next_matching_close() {
        let doc = Parser::parse("<p>open <b>but never closed</p><p>next</p>");
        assert_eq!(doc.root.children.len(), 2);
        let first = &doc.root.children[0];
        assert_eq!(first.tag, "p");
        assert_eq!(first.children[0].content, "open ");
        let bold = &first.children[1];
        assert_eq!(bold.tag, "span");
        assert_eq!(bold.text_content(), "but never closed");
        let second = &doc.root.children[1];
        assert_eq!(second.text_content(), "next");
    }

    #[test]
    fn mismatched_end_tag_with_no_open_is_ignored_not_fatal() {
        let doc = Parser::parse("<p>hi</span>more</p>");
        let p = only_child(&doc.root);
        assert_eq!(p.text_content(), "himore");
    }

    #[test]
    fn void_tags_never_consume_a_stack_slot() {
        let doc = Parser::parse("<p>line one<br>line two<hr>after</p>");
        let p = only_child(&doc.root);
        assert!(p.children.iter().any(|c| c.tag == "br"));
        assert!(p.children.iter().any(|c| c.tag == "hr"));
    }

    #[test]
    fn depth_beyond_limit_is_flattened_not_panicked() {
        let limits = ParserLimits {
            max_nesting_depth: 3,
            ..ParserLimits::default()
        };
        let mut input = String::new();
        for _ in 0..10 {
            input.push_str("<div>");
        }
        input.push_str("deep");
        for _ in 0..10 {
            input.push_str("</div>");
        }
        let doc = Parser::new(limits).parse_with(&input);
        // Must terminate and produce a tree; the exact shape is an
        // implementation detail of the degrade strategy, depth is not.
        fn depth(n: &Node) -> usize {
            1 + n.children.iter().map(depth).max().unwrap_or(0)
        }
        assert!(depth(&doc.root) <= 5);
    }

    #[test]
    fn metadata_tags_are_captured_and_not_rendered() {
        let doc = Parser::parse(
            "<title>My Page</title><meta name=\"description\" content=\"hi\"><p>Body</p>",
        );
        assert_eq!(doc.metadata.title.as_deref(), Some("My Page"));
        assert_eq!(
            doc.metadata.meta,
            vec![("description".to_string(), "hi".to_string())]
        );
        assert_eq!(doc.root.children.len(), 1);
        assert_eq!(doc.root.children[0].tag, "p");
    }

    #[test]
    fn runaway_comment_is_abandoned_past_safety_cap() {
        let mut input = "<p>before</p><!--".to_string();
        input.push_str(&"x".repeat(COMMENT_SAFETY_CAP + 10));
        input.push_str("<p>after</p>");
        let doc = Parser::parse(&input);
        assert!(doc.root.children.iter().any(|c| c.text_content() == "before"));
    }

    #[test]
    fn oversized_input_is_truncated_not_rejected() {
        let limits = ParserLimits {
            max_input_len: 10,
            ..ParserLimits::default()
        };
        let input = "<p>abcdefghijklmnopqrstuvwxyz</p>";
        let doc = Parser::new(limits).parse_with(input);
        assert!(doc.root.children.len() <= 1);
    }

    #[test]
    fn excess_errors_disable_markup_recognition_for_the_rest_of_input() {
        let limits = ParserLimits {
            max_parser_errors: 2,
            ..ParserLimits::default()
        };
        let mut input = String::new();
        for _ in 0..5 {
            input.push_str("</notopen>");
        }
        input.push_str("<p>tail</p>");
        let doc = Parser::new(limits).parse_with(&input);
        assert!(doc.root.children.iter().all(|c| c.text_content() != "tail"));
    }

    #[test]
    fn nodekind_text_never_has_children() {
        let doc = Parser::parse("<p>hello</p>");
        let p = only_child(&doc.root);
        let text = &p.children[0];
        assert_eq!(text.kind, NodeKind::Text);
        assert!(text.children.is_empty());
    }
}
