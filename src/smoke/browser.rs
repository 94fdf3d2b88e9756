use std::fmt;

use async_trait::async_trait;

use super::webdriver::WebDriverError;

/// How to find an element on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locator<'a> {
    LinkText(&'a str),
    ClassName(&'a str),
    Id(&'a str),
}

impl Locator<'_> {
    /// W3C location strategy and selector.
    ///
    /// Class and id lookups go through CSS selectors, since the W3C protocol
    /// dropped the dedicated strategies.
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Self::LinkText(text) => ("link text", text.to_string()),
            Self::ClassName(name) => ("css selector", format!(".{}", css_escape(name))),
            Self::Id(id) => ("css selector", format!("#{}", css_escape(id))),
        }
    }
}

impl fmt::Display for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkText(text) => write!(f, "link `{}`", text),
            Self::ClassName(name) => write!(f, "class `{}`", name),
            Self::Id(id) => write!(f, "id `{}`", id),
        }
    }
}

fn css_escape(ident: &str) -> String {
    let mut escaped = String::with_capacity(ident.len());
    for (i, ch) in ident.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            // Leading digits need a code point escape
            escaped.push_str(&format!("\\{:x} ", ch as u32));
            continue;
        }
        let plain = ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || !ch.is_ascii();
        if !plain {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Opaque reference to an element in the remote page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementRef(pub String);

/// Whether a native alert dialog was open when dismissal was attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertOutcome {
    Shown,
    NoAlert,
}

impl AlertOutcome {
    pub fn was_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

/// A remote browser session.
///
/// Every call suspends until the browser reports completion.
#[async_trait]
pub trait Browser: Send {
    async fn goto(&mut self, url: &str) -> Result<(), WebDriverError>;
    async fn find(&mut self, locator: Locator<'_>) -> Result<ElementRef, WebDriverError>;
    async fn click(&mut self, element: &ElementRef) -> Result<(), WebDriverError>;
    async fn send_keys(&mut self, element: &ElementRef, text: &str) -> Result<(), WebDriverError>;
    /// Accept an open alert, reporting [`AlertOutcome::NoAlert`] when there is none.
    async fn accept_alert(&mut self) -> Result<AlertOutcome, WebDriverError>;
    /// End the session. Must be called exactly once.
    async fn quit(&mut self) -> Result<(), WebDriverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_strategies() {
        assert_eq!(
            Locator::LinkText("Intel Program").strategy(),
            ("link text", "Intel Program".to_string())
        );
        assert_eq!(
            Locator::ClassName("memText").strategy(),
            ("css selector", ".memText".to_string())
        );
        assert_eq!(
            Locator::Id("setMem").strategy(),
            ("css selector", "#setMem".to_string())
        );
    }

    #[test]
    fn escapes_selectors() {
        assert_eq!(css_escape("value-text_2"), "value-text_2");
        assert_eq!(css_escape("1st"), "\\31 st");
        assert_eq!(css_escape("a.b"), "a\\.b");
    }
}
