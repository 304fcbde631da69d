// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::domain::models::scrape_outcome::PageDetails;

/// 邮箱和电话的最大提取数量
pub const MAX_CONTACTS: usize = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b").unwrap()
});

// North-American numbers: optional +1, separators `-`, `.`, space, optional parentheses.
// Matches preceded by a digit are dropped in `extract_phones`.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?\(?([2-9]\d{2})\)?[\s.-]?(\d{3})[\s.-]?(\d{4})\b").unwrap()
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

const IMAGE_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// 社交平台及其主机名
const SOCIAL_PLATFORMS: [(&str, &[&str]); 6] = [
    ("facebook", &["facebook.com", "fb.com"]),
    ("twitter", &["twitter.com", "x.com"]),
    ("linkedin", &["linkedin.com"]),
    ("instagram", &["instagram.com"]),
    ("youtube", &["youtube.com", "youtu.be"]),
    ("tiktok", &["tiktok.com"]),
];

/// 元数据提取器
///
/// 从 HTML 中尽力提取标题、描述、联系方式和社交链接，从不失败
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// 提取页面元数据
    pub fn extract(html: &str) -> PageDetails {
        let document = Html::parse_document(html);

        PageDetails {
            title: extract_title(&document),
            description: extract_description(&document),
            emails: extract_emails(html),
            phones: extract_phones(&document),
            social_links: extract_social_links(&document),
        }
    }
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default()
}

fn extract_description(document: &Html) -> String {
    let mut fallback = None;

    for meta in document.select(&META_SELECTOR) {
        let el = meta.value();
        let content = match el.attr("content") {
            Some(c) if !c.trim().is_empty() => c,
            _ => continue,
        };

        if el
            .attr("name")
            .is_some_and(|n| n.eq_ignore_ascii_case("description"))
        {
            return collapse_whitespace(content);
        }
        if fallback.is_none()
            && el
                .attr("property")
                .is_some_and(|p| p.eq_ignore_ascii_case("og:description"))
        {
            fallback = Some(collapse_whitespace(content));
        }
    }

    fallback.unwrap_or_default()
}

fn extract_emails(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut emails = Vec::new();

    for m in EMAIL_RE.find_iter(html) {
        let email = m.as_str().to_lowercase();
        if IMAGE_SUFFIXES.iter().any(|suffix| email.ends_with(suffix)) {
            continue;
        }
        if seen.insert(email.clone()) {
            emails.push(email);
            if emails.len() == MAX_CONTACTS {
                break;
            }
        }
    }

    emails
}

fn extract_phones(document: &Html) -> Vec<String> {
    let mut haystack = visible_text(document);
    for link in document.select(&LINK_SELECTOR) {
        if let Some(number) = link
            .value()
            .attr("href")
            .and_then(|href| href.strip_prefix("tel:"))
        {
            haystack.push(' ');
            haystack.push_str(number);
        }
    }

    let mut seen = HashSet::new();
    let mut phones = Vec::new();

    for caps in PHONE_RE.captures_iter(&haystack) {
        let start = caps.get(0).map_or(0, |m| m.start());
        if haystack[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit())
        {
            continue;
        }

        let digits = format!("{}{}{}", &caps[1], &caps[2], &caps[3]);
        if seen.insert(digits) {
            phones.push(caps[0].trim().to_string());
            if phones.len() == MAX_CONTACTS {
                break;
            }
        }
    }

    phones
}

fn extract_social_links(document: &Html) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();

    for link in document.select(&LINK_SELECTOR) {
        let href = match link.value().attr("href") {
            Some(h) => h.trim(),
            None => continue,
        };
        let Some(platform) = social_platform(href) else {
            continue;
        };
        links
            .entry(platform.to_string())
            .or_insert_with(|| href.to_string());

        if links.len() == SOCIAL_PLATFORMS.len() {
            break;
        }
    }

    links
}

fn social_platform(href: &str) -> Option<&'static str> {
    let url = Url::parse(href).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let path = url.path().to_lowercase();
    if path.contains("/sharer") || path.contains("/intent/") || path.starts_with("/share") {
        return None;
    }

    SOCIAL_PLATFORMS
        .iter()
        .find(|(_, hosts)| {
            hosts
                .iter()
                .any(|h| host == *h || host.ends_with(&format!(".{}", h)))
        })
        .map(|(name, _)| *name)
}

/// 收集不在 script/style/noscript 中的文本
fn visible_text(document: &Html) -> String {
    let mut out = String::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }

    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
