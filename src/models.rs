use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Result of one recipe extraction, as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeData {
    pub data: RecipeSections,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeSections {
    pub recipe: Recipe,
    #[serde(default)]
    pub equipment_json: Equipment,
    #[serde(default)]
    pub prep_json: Prep,
    #[serde(default)]
    pub nutrition_json: Nutrition,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: String,
    #[serde(default)]
    pub servings: Option<Amount>,
    #[serde(default)]
    pub prep_time: Option<Amount>,
    #[serde(default)]
    pub cook_time: Option<Amount>,
    #[serde(default)]
    pub total_time: Option<Amount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub diet_labels: Option<Vec<String>>,
    #[serde(default)]
    pub author_tips: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Equipment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub optional_equipment: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prep {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prep_instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: Option<Amount>,
    #[serde(default)]
    pub carbs: Option<Amount>,
    #[serde(default)]
    pub fat: Option<Amount>,
    #[serde(default)]
    pub protein: Option<Amount>,
}

/// A quantity as the extractor wrote it: usually a number, sometimes text
/// such as `"10-15"`. Shown exactly as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl Message {
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            sent_at: Utc::now(),
        }
    }

    pub fn user(content: String) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: String) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// One display-only step of the simulated extraction progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u8,
    pub name: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base address the terminal client uses to reach the proxy service.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Socket address `serve` binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Upstream recipe service. `BACKEND_URL` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout: u64,
    #[serde(default)]
    pub theme: ThemeConfig,
}

fn default_proxy_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

const fn default_timeout() -> u64 {
    600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            listen_addr: default_listen_addr(),
            backend_url: None,
            request_timeout: default_timeout(),
            theme: ThemeConfig::default(),
        }
    }
}

#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub user_message_color: String,
    pub assistant_message_color: String,
    pub border_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            user_message_color: "blue".to_string(),
            assistant_message_color: "green".to_string(),
            border_color: "cyan".to_string(),
        }
    }
}
