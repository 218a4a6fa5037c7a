//! Typed selectors over the small CSS subset the page glue relies on

use crate::error::{UiError, UiResult};

/// A single matching condition on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Any element
    Any,
    /// Element name, compared case-insensitively
    Tag(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name]` or `[name=value]`
    Attr {
        name: String,
        value: Option<String>,
    },
    /// Compound selector: every part must match
    All(Vec<Selector>),
    /// Selector group (`a, b`): at least one part must match
    Either(Vec<Selector>),
}

/// Read-only view of an element used during matching
pub trait ElementView {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

impl Selector {
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn has_attr(name: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn and(self, other: Selector) -> Self {
        match self {
            Self::All(mut parts) => {
                parts.push(other);
                Self::All(parts)
            }
            first => Self::All(vec![first, other]),
        }
    }

    pub fn or(self, other: Selector) -> Self {
        match self {
            Self::Either(mut parts) => {
                parts.push(other);
                Self::Either(parts)
            }
            first => Self::Either(vec![first, other]),
        }
    }

    pub fn matches(&self, element: &dyn ElementView) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(name) => element.tag().eq_ignore_ascii_case(name),
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attr { name, value } => match (element.attr(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected.as_str(),
                (None, _) => false,
            },
            Self::All(parts) => parts.iter().all(|p| p.matches(element)),
            Self::Either(parts) => parts.iter().any(|p| p.matches(element)),
        }
    }

    /// Parse a selector such as `button.add-to-cart`, `#login-modal`,
    /// `[data-dismiss="modal"]` or `.close, [data-dismiss]`.
    ///
    /// Combinators other than `,` are not supported.
    pub fn parse(input: &str) -> UiResult<Self> {
        let mut groups = Vec::new();
        for group in input.split(',') {
            let group = group.trim();
            if group.is_empty() {
                return Err(UiError::SelectorError(format!("empty selector in '{}'", input)));
            }
            groups.push(parse_compound(group)?);
        }

        Ok(if groups.len() == 1 {
            groups.remove(0)
        } else {
            Self::Either(groups)
        })
    }
}

fn parse_compound(input: &str) -> UiResult<Selector> {
    let chars: Vec<char> = input.chars().collect();
    let mut parts = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        match chars[pos] {
            '*' => {
                parts.push(Selector::Any);
                pos += 1;
            }
            '#' | '.' => {
                let marker = chars[pos];
                let (ident, next) = read_ident(&chars, pos + 1);
                if ident.is_empty() {
                    return Err(UiError::SelectorError(format!(
                        "missing name after '{}' in '{}'",
                        marker, input
                    )));
                }
                parts.push(if marker == '#' {
                    Selector::Id(ident)
                } else {
                    Selector::Class(ident)
                });
                pos = next;
            }
            '[' => {
                let close = chars[pos..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| pos + offset)
                    .ok_or_else(|| {
                        UiError::SelectorError(format!("unterminated attribute in '{}'", input))
                    })?;
                let body: String = chars[pos + 1..close].iter().collect();
                parts.push(parse_attribute(&body, input)?);
                pos = close + 1;
            }
            c if is_ident_char(c) => {
                let (ident, next) = read_ident(&chars, pos);
                parts.push(Selector::Tag(ident.to_ascii_lowercase()));
                pos = next;
            }
            c => {
                return Err(UiError::SelectorError(format!(
                    "unsupported character '{}' in '{}'",
                    c, input
                )));
            }
        }
    }

    Ok(match parts.len() {
        0 => Selector::Any,
        1 => parts.remove(0),
        _ => Selector::All(parts),
    })
}

fn parse_attribute(body: &str, input: &str) -> UiResult<Selector> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() || !name.chars().all(is_ident_char) {
        return Err(UiError::SelectorError(format!("invalid attribute name in '{}'", input)));
    }

    Ok(Selector::Attr {
        name: name.to_string(),
        value,
    })
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
