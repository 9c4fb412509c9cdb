//! Turn tweet text into HTML with links for URLs, mentions, hashtags and
//! email addresses.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::links::TWITTER_URL;
use crate::types::Tweet;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b((?:https?://|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#,
    )
    .expect("url pattern")
});

static HAS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern"));

static MAILTO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([_a-z0-9-]+(\.[_a-z0-9-]+)*@[a-z0-9-]+(\.[a-z0-9-]+)*(\.[a-z]{2,3}))")
        .expect("mailto pattern")
});

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) +@([a-z0-9_]*)?").expect("mention pattern"));

// The hashtag must start the text or follow whitespace; the leading
// whitespace is captured and written back.
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|\s)#(\w*[\p{L}\-\d\p{Cyrillic}]+\w*)").expect("hashtag pattern")
});

static LONG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r">(([[:alnum:]]+://)|www\.)?([^[:space:]]{12,22})([^[:space:]]*)([^[:space:]]{12,22})([[:alnum:]#?/&=])<",
    )
    .expect("long url pattern")
});

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));

/// Linkify free text. Bare URLs get an `http://` scheme when they have none.
pub fn linkify_text(text: &str) -> String {
    let text = format!(" {text}");
    let text = URL.replace_all(&text, |caps: &Captures| {
        let input = &caps[0];
        let href = if HAS_SCHEME.is_match(input) {
            input.to_string()
        } else {
            format!("http://{input}")
        };
        format!(r#"<a href="{href}" target="_blank" rel="nofollow">{input}</a>"#)
    });
    decorate(&text)
}

/// Linkify a tweet, expanding its `t.co` links from `entities`.
pub fn linkify_tweet(tweet: &Tweet) -> String {
    let mut text = tweet.text.clone();
    for media in &tweet.entities.media {
        let anchor = format!(
            r#"<a href="{}" target="_blank">{}</a>"#,
            media.media_url_https, media.display_url
        );
        text = text.replace(&media.url, &anchor);
    }
    for url in &tweet.entities.urls {
        let anchor = format!(
            r#"<a href="{}" target="_blank" rel="nofollow">{}</a>"#,
            url.expanded_url, url.display_url
        );
        text = text.replace(&url.url, &anchor);
    }
    decorate(&text)
}

/// Mentions, hashtags, email addresses, long-URL shortening and whitespace.
fn decorate(text: &str) -> String {
    let text = MAILTO.replace_all(text, r#"<a href="mailto:${1}">${1}</a>"#);
    let text = MENTION.replace_all(
        &text,
        format!(r#" <a href="{TWITTER_URL}/${{1}}" target="_blank">@${{1}}</a>"#).as_str(),
    );
    let text = HASHTAG.replace_all(
        &text,
        format!(r#"${{1}}<a href="{TWITTER_URL}/search?q=%23${{2}}" target="_blank">#${{2}}</a>"#)
            .as_str(),
    );
    let text = LONG_URL.replace_all(&text, ">${3}...${5}${6}<");
    let text = SPACES.replace_all(&text, " ");
    text.trim().to_string()
}
