//! Per-resource facades over the dispatcher.
//!
//! Each facade borrows the client and only fills in the endpoint name and
//! required parameters. Extra `Params` (including `format`) pass through.

use crate::client::{TwitterClient, DEFAULT_EXTENSION};
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::types::{Decoded, Params};

impl<T> TwitterClient<T> {
    pub fn statuses(&self) -> Statuses<'_, T> {
        Statuses { client: self }
    }

    pub fn users(&self) -> Users<'_, T> {
        Users { client: self }
    }

    pub fn search(&self) -> Search<'_, T> {
        Search { client: self }
    }

    pub fn media(&self) -> Media<'_, T> {
        Media { client: self }
    }

    pub fn friendships(&self) -> Friendships<'_, T> {
        Friendships { client: self }
    }
}

pub struct Statuses<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<T: HttpTransport> Statuses<'_, T> {
    pub fn show(&self, id: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .get("statuses/show", params.with("id", id), false, DEFAULT_EXTENSION)
    }

    pub fn home_timeline(&self, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .get("statuses/home_timeline", params, false, DEFAULT_EXTENSION)
    }

    pub fn update(&self, status: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .post("statuses/update", params.with("status", status), false)
    }

    pub fn destroy(&self, id: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .post(&format!("statuses/destroy/{id}"), params, false)
    }
}

pub struct Users<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<T: HttpTransport> Users<'_, T> {
    pub fn show(&self, screen_name: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client.get(
            "users/show",
            params.with("screen_name", screen_name),
            false,
            DEFAULT_EXTENSION,
        )
    }

    /// Up to 100 accounts per call; the API rejects more.
    pub fn lookup(&self, screen_names: &[&str], params: Params) -> Result<Decoded, ApiError> {
        self.client.get(
            "users/lookup",
            params.with("screen_name", screen_names.join(",")),
            false,
            DEFAULT_EXTENSION,
        )
    }
}

pub struct Search<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<T: HttpTransport> Search<'_, T> {
    pub fn tweets(&self, q: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .get("search/tweets", params.with("q", q), false, DEFAULT_EXTENSION)
    }
}

pub struct Media<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<T: HttpTransport> Media<'_, T> {
    /// Upload base64-encoded media. Goes to the upload host as multipart.
    pub fn upload(&self, media_data: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client
            .post("media/upload", params.with("media_data", media_data), true)
    }
}

pub struct Friendships<'a, T> {
    client: &'a TwitterClient<T>,
}

impl<T: HttpTransport> Friendships<'_, T> {
    pub fn create(&self, screen_name: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client.post(
            "friendships/create",
            params.with("screen_name", screen_name),
            false,
        )
    }

    pub fn destroy(&self, screen_name: &str, params: Params) -> Result<Decoded, ApiError> {
        self.client.post(
            "friendships/destroy",
            params.with("screen_name", screen_name),
            false,
        )
    }
}
