// file: src/parser/following.rs
// description: css selector based extraction of followed accounts from saved html
// reference: https://docs.rs/scraper

use crate::config::SelectorConfig;
use crate::error::{PipelineError, Result};
use crate::models::FollowedAccount;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

pub struct FollowingParser {
    container: Selector,
    display_name: Selector,
    user_handle: Selector,
    avatar: Selector,
}

impl FollowingParser {
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            container: compile(&selectors.container)?,
            display_name: compile(&selectors.display_name)?,
            user_handle: compile(&selectors.user_handle)?,
            avatar: compile(&selectors.avatar)?,
        })
    }

    /// Every container element (nested ones included, document order) that
    /// carries a display name or a handle becomes one record.
    pub fn parse(&self, html: &str) -> Vec<FollowedAccount> {
        let document = Html::parse_document(html);

        let mut accounts = Vec::new();
        let mut candidates = 0usize;

        for container in document.select(&self.container) {
            candidates += 1;

            let account = FollowedAccount::new(
                first_text(container, &self.display_name),
                first_text(container, &self.user_handle),
                first_attr(container, &self.avatar, "src"),
            );

            if account.is_identifiable() {
                accounts.push(account);
            }
        }

        debug!(
            "Matched {} of {} container elements",
            accounts.len(),
            candidates
        );

        accounts
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PipelineError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Trimmed text pieces of the first match, joined without separator.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
}

/// Attribute of the first match; blank values count as absent.
fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
<html><body>
<ul>
  <li>
    <img class="css-1zpj2q-ImgAvatar e1e9er4e1" src="https://cdn.example.com/a.jpeg">
    <span class="css-k0d282-SpanNickname es616eb6"> Alice  <b>A.</b> </span>
    <p class="css-3gbgjv-PUniqueId es616eb8">alice_01</p>
  </li>
  <li>
    <p class="css-3gbgjv-PUniqueId es616eb8">bob</p>
  </li>
  <li>
    <img class="css-1zpj2q-ImgAvatar e1e9er4e1" src="/only-avatar.jpeg">
  </li>
  <li>Settings</li>
</ul>
</body></html>
"#;

    fn parser() -> FollowingParser {
        FollowingParser::new(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_extracts_identifiable_entries() {
        let accounts = parser().parse(PAGE);

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].display_name.as_deref(), Some("AliceA."));
        assert_eq!(accounts[0].user_handle.as_deref(), Some("alice_01"));
        assert_eq!(
            accounts[0].avatar_url.as_deref(),
            Some("https://cdn.example.com/a.jpeg")
        );
        assert_eq!(accounts[0].local_avatar_path, None);

        assert_eq!(accounts[1].display_name, None);
        assert_eq!(accounts[1].user_handle.as_deref(), Some("bob"));
        assert_eq!(accounts[1].avatar_url, None);
    }

    #[test]
    fn test_img_without_src_has_no_avatar_url() {
        let html = r#"<li>
            <img class="css-1zpj2q-ImgAvatar e1e9er4e1">
            <p class="css-3gbgjv-PUniqueId es616eb8">carol</p>
        </li>"#;
        let accounts = parser().parse(html);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].avatar_url, None);
    }

    #[test]
    fn test_empty_src_has_no_avatar_url() {
        let html = r#"<li>
            <img class="css-1zpj2q-ImgAvatar e1e9er4e1" src="">
            <p class="css-3gbgjv-PUniqueId es616eb8">eve</p>
        </li>
        <li>
            <img class="css-1zpj2q-ImgAvatar e1e9er4e1" src="  ">
            <p class="css-3gbgjv-PUniqueId es616eb8">frank</p>
        </li>"#;
        let accounts = parser().parse(html);
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].user_handle.as_deref(), Some("eve"));
        assert_eq!(accounts[0].avatar_url, None);
        assert_eq!(accounts[1].avatar_url, None);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<ul>
            <li><p class="css-3gbgjv-PUniqueId es616eb8">dup</p></li>
            <li><p class="css-3gbgjv-PUniqueId es616eb8">dup</p></li>
        </ul>"#;
        assert_eq!(parser().parse(html).len(), 2);
    }

    #[test]
    fn test_empty_document() {
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("<html><body><p>nothing</p></body></html>").is_empty());
    }

    #[test]
    fn test_custom_selectors() {
        let selectors = SelectorConfig {
            container: "div.user".to_string(),
            display_name: ".name".to_string(),
            user_handle: ".handle".to_string(),
            avatar: "img".to_string(),
        };
        let parser = FollowingParser::new(&selectors).unwrap();
        let html = r#"<div class="user"><img src="x.png"><span class="name">X</span></div>"#;

        let accounts = parser.parse(html);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].display_name.as_deref(), Some("X"));
        assert_eq!(accounts[0].avatar_url.as_deref(), Some("x.png"));
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = SelectorConfig {
            container: "li[".to_string(),
            ..SelectorConfig::default()
        };
        let err = FollowingParser::new(&selectors).err().unwrap();
        assert!(matches!(err, PipelineError::Selector { .. }));
    }
}
