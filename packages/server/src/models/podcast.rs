use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default language tag for new shows.
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// A show, owned by a single caller identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Podcast {
    /// Opaque server-generated identifier.
    #[schema(example = "0b6d7c1e-2f1a-4c63-9a55-3f7ad4c2e9b1")]
    pub id: String,
    #[schema(example = "Tech Talk")]
    pub title: String,
    pub description: String,
    pub author: String,
    pub email: String,
    /// Cover image reference.
    pub image_url: String,
    /// Ordered category tags.
    #[schema(example = json!(["Technology", "News"]))]
    pub categories: Vec<String>,
    pub website_url: String,
    #[schema(example = "en-us")]
    pub language: String,
    pub explicit: bool,
    /// Caller identity that owns this show. Set by the server.
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Derived feed URL.
    pub rss_url: String,
}

impl Default for Podcast {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            description: String::new(),
            author: String::new(),
            email: String::new(),
            image_url: String::new(),
            categories: Vec::new(),
            website_url: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            explicit: false,
            owner_id: String::new(),
            created_at: now,
            updated_at: now,
            rss_url: String::new(),
        }
    }
}

impl Podcast {
    /// Copy the client-editable fields of `input` onto `self`.
    ///
    /// Identity, ownership, timestamps and the derived feed URL are left alone.
    pub fn merge_from(&mut self, input: Podcast) {
        self.title = input.title.trim().to_string();
        self.description = input.description;
        self.author = input.author;
        self.email = input.email;
        self.image_url = input.image_url;
        self.categories = input.categories;
        self.website_url = input.website_url;
        self.language = input.language;
        self.explicit = input.explicit;
    }
}
