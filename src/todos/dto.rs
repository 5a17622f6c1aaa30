use serde::{Deserialize, Serialize};

use super::repo::Todo;

/// Creation payload. Anything beyond the description is ignored; new todos
/// always start in status `new`.
#[derive(Debug, Deserialize)]
pub struct ProposedTodo {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub data: Vec<Todo>,
}
