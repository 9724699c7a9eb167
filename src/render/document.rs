//! Structured document model for generated module fragments.
//!
//! Every generated file is built from [`Block`]s holding [`Expr`] values and
//! serialized by one renderer. The output grammar:
//!
//! - a block is `kind "label" ... {`, one attribute per line, then `}`
//! - an attribute (and every object entry) is `key = <value>`; keys are bare
//!   when they are identifiers and double-quoted otherwise
//! - objects are `{ ... }` with two-space indentation per level
//! - lists are `[a, b]`
//! - strings are double-quoted with JSON escapes; `${...}` is left intact
//! - numbers and booleans are verbatim, null is `null`
//! - traversals (`aws_vpc.main.id`) are unquoted
//! - consecutive blocks are separated by one blank line

use serde_yaml::Value;

/// A value expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    List(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    /// A reference such as `aws_vpc.main.id`.
    Traversal(Vec<String>),
}

impl Expr {
    /// Build a string literal.
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Build a traversal from dotted parts.
    pub fn traversal<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Traversal(parts.into_iter().map(Into::into).collect())
    }
}

impl From<&Value> for Expr {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Expr::Null,
            Value::Bool(b) => Expr::Bool(*b),
            Value::Number(n) => Expr::Number(n.to_string()),
            Value::String(s) => Expr::String(s.clone()),
            Value::Sequence(items) => Expr::List(items.iter().map(Expr::from).collect()),
            Value::Mapping(map) => Expr::Object(
                map.iter()
                    .map(|(k, v)| (key_string(k), Expr::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Expr::from(&tagged.value),
        }
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// A top-level block such as `variable "region" { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: String,
    pub labels: Vec<String>,
    pub body: Vec<(String, Expr)>,
}

impl Block {
    /// Start a block of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            labels: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Add a label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: Expr) -> Self {
        self.body.push((key.into(), value));
        self
    }
}

/// Render a single block, terminated by a newline.
pub fn render_block(block: &Block) -> String {
    let mut out = block.kind.clone();
    for label in &block.labels {
        out.push(' ');
        out.push_str(&quote(label));
    }
    out.push_str(" {\n");
    for (key, value) in &block.body {
        out.push_str(&indent(1));
        out.push_str(&render_key(key));
        out.push_str(" = ");
        out.push_str(&render_expr(value, 1));
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Render blocks separated by blank lines.
pub fn render_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an expression at the given nesting level.
pub fn render_expr(expr: &Expr, level: usize) -> String {
    match expr {
        Expr::Null => "null".to_string(),
        Expr::Bool(b) => b.to_string(),
        Expr::Number(n) => n.clone(),
        Expr::String(s) => quote(s),
        Expr::Traversal(parts) => parts.join("."),
        Expr::List(items) => {
            let rendered: Vec<_> = items.iter().map(|i| render_expr(i, level)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Expr::Object(entries) if entries.is_empty() => "{}".to_string(),
        Expr::Object(entries) => {
            let mut out = String::from("{\n");
            for (key, value) in entries {
                out.push_str(&indent(level + 1));
                out.push_str(&render_key(key));
                out.push_str(" = ");
                out.push_str(&render_expr(value, level + 1));
                out.push('\n');
            }
            out.push_str(&indent(level));
            out.push('}');
            out
        }
    }
}

fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn quote(s: &str) -> String {
    // serde_json never fails on a plain str
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_block_with_labels() {
        let block = Block::new("variable")
            .label("region")
            .attr("default", Expr::string("us-east-1"));
        insta::assert_snapshot!(render_block(&block), @r#"
        variable "region" {
          default = "us-east-1"
        }
        "#);
    }

    #[test]
    fn renders_traversal_unquoted() {
        let block = Block::new("output")
            .label("main_id")
            .attr("value", Expr::traversal(["aws_vpc", "main", "id"]));
        assert_eq!(
            render_block(&block),
            "output \"main_id\" {\n  value = aws_vpc.main.id\n}\n"
        );
    }

    #[test]
    fn renders_nested_objects_and_lists() {
        let value: Value = serde_yaml::from_str(
            r#"
tags:
  owner: ops
  "cost-center": 42
zones: [a, b]
enabled: true
nothing: null
"#,
        )
        .unwrap();
        let Expr::Object(entries) = Expr::from(&value) else {
            panic!("expected object");
        };
        let block = Block {
            kind: "locals".to_string(),
            labels: Vec::new(),
            body: entries,
        };
        insta::assert_snapshot!(render_block(&block), @r#"
        locals {
          tags = {
            owner = "ops"
            cost-center = 42
          }
          zones = ["a", "b"]
          enabled = true
          nothing = null
        }
        "#);
    }

    #[test]
    fn quotes_non_identifier_keys() {
        let expr = Expr::Object(vec![
            ("ok_key".to_string(), Expr::Number("1".to_string())),
            ("1st".to_string(), Expr::Number("2".to_string())),
            ("with space".to_string(), Expr::Number("3".to_string())),
        ]);
        assert_eq!(
            render_expr(&expr, 0),
            "{\n  ok_key = 1\n  \"1st\" = 2\n  \"with space\" = 3\n}"
        );
    }

    #[test]
    fn escapes_strings_but_keeps_interpolation() {
        assert_eq!(
            render_expr(&Expr::string("say \"hi\" ${var.name}"), 0),
            r#""say \"hi\" ${var.name}""#
        );
    }

    #[test]
    fn empty_collections() {
        assert_eq!(render_expr(&Expr::List(vec![]), 0), "[]");
        assert_eq!(render_expr(&Expr::Object(vec![]), 0), "{}");
    }

    #[test]
    fn blocks_separated_by_blank_line() {
        let blocks = vec![
            Block::new("variable").label("a").attr("default", Expr::Number("1".into())),
            Block::new("variable").label("b").attr("default", Expr::Number("2".into())),
        ];
        assert_eq!(
            render_blocks(&blocks),
            "variable \"a\" {\n  default = 1\n}\n\nvariable \"b\" {\n  default = 2\n}\n"
        );
    }

    #[test]
    fn tagged_values_render_inner_value() {
        let value: Value = serde_yaml::from_str("!custom hello").unwrap();
        assert_eq!(Expr::from(&value), Expr::string("hello"));
    }
}
