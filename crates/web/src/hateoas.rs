use std::{collections::HashMap, sync::Arc};

use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    #[serde(rename = "rel")]
    pub relation: String,

    #[serde(rename = "href")]
    pub hypertext_reference: String,
}

/// A response body with hypermedia links to related resources.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    pub debug_info: HashMap<String, Value>,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Response {
                content,
                debug_info: HashMap::new(),
                links: vec![],
            },
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    /// Attaches a diagnostic value. Values that fail to serialize are logged
    /// and left out.
    pub fn debug_info<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => {
                self.response.debug_info.insert(key, value);
            }
            Err(why) => log::warn!("could not serialize debug info `{}`: {}", key, why),
        }
        self
    }

    /// Links a resource of this service, `path` is relative to the base url.
    pub fn link<R, P>(mut self, relation: R, path: P) -> Self
    where
        R: Into<String>,
        P: Into<String>,
    {
        self.response.links.push(Link {
            relation: relation.into(),
            hypertext_reference: self.base_url.full_url(path),
        });
        self
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}
