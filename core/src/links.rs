//! Permalinks and web-intent links for users and tweets.

use crate::types::{Tweet, User};

pub const TWITTER_URL: &str = "https://twitter.com";

/// Anything that names an account.
pub trait ScreenName {
    fn screen_name(&self) -> &str;
}

impl ScreenName for str {
    fn screen_name(&self) -> &str {
        self
    }
}

impl ScreenName for String {
    fn screen_name(&self) -> &str {
        self
    }
}

impl ScreenName for User {
    fn screen_name(&self) -> &str {
        &self.screen_name
    }
}

impl<T: ScreenName + ?Sized> ScreenName for &T {
    fn screen_name(&self) -> &str {
        (**self).screen_name()
    }
}

pub fn link_user(user: impl ScreenName) -> String {
    format!("{TWITTER_URL}/{}", user.screen_name())
}

pub fn link_tweet(tweet: &Tweet) -> String {
    format!("{}/status/{}", link_user(&tweet.user), tweet.id_str)
}

pub fn link_retweet(tweet: &Tweet) -> String {
    format!("{TWITTER_URL}/intent/retweet?tweet_id={}", tweet.id_str)
}

pub fn link_add_tweet_to_favorites(tweet: &Tweet) -> String {
    format!("{TWITTER_URL}/intent/favorite?tweet_id={}", tweet.id_str)
}

pub fn link_reply(tweet: &Tweet) -> String {
    format!("{TWITTER_URL}/intent/tweet?in_reply_to={}", tweet.id_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tweet() -> Tweet {
        Tweet {
            id_str: "1234567890123456789".to_string(),
            text: String::new(),
            user: User {
                id_str: "12".to_string(),
                screen_name: "jack".to_string(),
                name: "jack".to_string(),
            },
            entities: Default::default(),
        }
    }

    #[test]
    fn user_links_from_name_or_user() {
        assert_eq!(link_user("twitterapi"), "https://twitter.com/twitterapi");
        assert_eq!(link_user(String::from("x")), "https://twitter.com/x");
        assert_eq!(link_user(&tweet().user), "https://twitter.com/jack");
    }

    #[test]
    fn tweet_links() {
        let t = tweet();
        assert_eq!(link_tweet(&t), "https://twitter.com/jack/status/1234567890123456789");
        assert_eq!(
            link_retweet(&t),
            "https://twitter.com/intent/retweet?tweet_id=1234567890123456789"
        );
        assert_eq!(
            link_add_tweet_to_favorites(&t),
            "https://twitter.com/intent/favorite?tweet_id=1234567890123456789"
        );
        assert_eq!(
            link_reply(&t),
            "https://twitter.com/intent/tweet?in_reply_to=1234567890123456789"
        );
    }
}
