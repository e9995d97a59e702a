//! HTML rendering and client-mode code generation

use crate::compiler::parse::{Node, Tag};
use crate::options::CompileOptions;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Render a node tree to an HTML document string.
pub fn render_html(nodes: &[Node], opts: &CompileOptions) -> String {
    let mut out = String::new();

    // The template's own doctype wins; the option is a fallback.
    let doctype = nodes
        .iter()
        .find_map(|n| match n {
            Node::Doctype(d) => Some(d.clone()),
            _ => None,
        })
        .or_else(|| opts.doctype.clone());
    if let Some(doctype) = doctype {
        out.push_str(&doctype_tag(&doctype));
        if opts.pretty {
            out.push('\n');
        }
    }

    let mut first = true;
    for node in nodes {
        if matches!(node, Node::Doctype(_)) {
            continue;
        }
        render_node(node, opts.pretty, 0, &mut first, &mut out);
    }
    out
}

fn doctype_tag(doctype: &str) -> String {
    match doctype {
        "html" => "<!DOCTYPE html>".to_string(),
        "xml" => "<?xml version=\"1.0\" encoding=\"utf-8\" ?>".to_string(),
        other => format!("<!DOCTYPE {other}>"),
    }
}

fn render_node(node: &Node, pretty: bool, depth: usize, first: &mut bool, out: &mut String) {
    // Doctypes are hoisted by render_html; blocks render their (possibly
    // substituted) children in place without a wrapper of their own.
    match node {
        Node::Doctype(_) => return,
        Node::Block { children, .. } => {
            for child in children {
                render_node(child, pretty, depth, first, out);
            }
            return;
        }
        _ => {}
    }

    if pretty {
        if !*first {
            out.push('\n');
        }
        out.push_str(&"  ".repeat(depth));
    }
    *first = false;

    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::RawText(text) => out.push_str(text),
        Node::Comment(text) => {
            out.push_str("<!-- ");
            out.push_str(text);
            out.push_str(" -->");
        }
        Node::Include { spec, .. } => {
            // Unexpanded include (the compiler front end normally replaces these).
            out.push_str(&format!("<!-- include {} -->", escape_text(spec)));
        }
        Node::Tag(tag) => render_tag(tag, pretty, depth, out),
        Node::Doctype(_) | Node::Block { .. } => unreachable!(),
    }
}

fn render_tag(tag: &Tag, pretty: bool, depth: usize, out: &mut String) {
    out.push('<');
    out.push_str(&tag.name);
    if let Some(id) = &tag.id {
        out.push_str(&format!(" id=\"{}\"", escape_attr(id)));
    }
    if !tag.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape_attr(&tag.classes.join(" "))));
    }
    for (key, value) in &tag.attrs {
        out.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
    }

    if VOID_ELEMENTS.contains(&tag.name.as_str()) {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if let Some(text) = &tag.text {
        out.push_str(&escape_text(text));
    }
    if tag.children.is_empty() {
        out.push_str(&format!("</{}>", tag.name));
        return;
    }

    let mut first = false;
    for child in &tag.children {
        render_node(child, pretty, depth + 1, &mut first, out);
    }
    if pretty {
        out.push('\n');
        out.push_str(&"  ".repeat(depth));
    }
    out.push_str(&format!("</{}>", tag.name));
}

/// Serialize a client-side template function. The function body returns the
/// rendered markup; `compile_debug` adds the source filename for stack traces.
pub fn client_source(nodes: &[Node], opts: &CompileOptions) -> String {
    let name = opts.name.as_deref().unwrap_or("template");
    let html = render_html(nodes, opts);

    let mut out = String::new();
    out.push_str(&format!("function {name}(locals) {{\n"));
    if opts.compile_debug {
        let filename = opts
            .filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<anonymous>".to_string());
        out.push_str(&format!(
            "  var pug_debug_filename = {};\n",
            js_string(&filename)
        ));
    }
    out.push_str(&format!("  var pug_html = {};\n", js_string(&html)));
    out.push_str("  return pug_html;\n}");
    out
}

fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn escape_text(s: &str) -> String {
    escape(s, false)
}

fn escape_attr(s: &str) -> String {
    escape(s, true)
}

fn escape(s: &str, quotes: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
