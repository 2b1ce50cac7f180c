// Event types for async communication

use uuid::Uuid;

use crate::models::RecipeData;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The recipe request settled, with the recipe or an error message
    RecipeProcessed(Result<Box<RecipeData>, String>),
    /// The assistant answered (or failed to) a message from chat `session`
    ChatReply {
        session: Uuid,
        reply: Result<String, String>,
    },
}
