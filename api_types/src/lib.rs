use serde::{Deserialize, Serialize};

// Trivia API

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Question {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QuestionSearch {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

/// The category selection of a quiz request. Clients either send the plain category id or the
/// category object, as it has been received from the categories endpoint. Id 0 selects all
/// categories.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum QuizCategory {
    Id(i32),
    Category { id: i32 },
}

impl QuizCategory {
    pub fn id(&self) -> i32 {
        match self {
            QuizCategory::Id(id) => *id,
            QuizCategory::Category { id } => *id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct QuizRequest {
    #[serde(default, rename = "quizCategory")]
    pub quiz_category: Option<QuizCategory>,
    #[serde(default, rename = "previousQuestions")]
    pub previous_questions: Vec<i32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<Category>,
    pub total_categories: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuestionPageResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: Vec<Category>,
    pub current_category: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuestionSearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    #[serde(rename = "currentCategory")]
    pub current_category: i32,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuestionCreatedResponse {
    pub success: bool,
    pub created: i32,
    pub request: Question,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuestionDeletedResponse {
    pub success: bool,
    pub deleted: i32,
    pub request: Question,
}

/// A quiz question or `false`, if all questions of the selection have been played already.
#[derive(Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum QuizQuestion {
    Next(Question),
    Exhausted(bool),
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuizResponse {
    pub success: bool,
    pub question: QuizQuestion,
}

// Coffee shop API

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipePart {
    pub name: String,
    pub color: String,
    pub parts: i32,
}

/// Recipe part without the ingredient name, as shown to anonymous clients
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: i32,
}

/// Recipe data in create and update requests: a single part or a list of parts.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum RecipeInput {
    Single(RecipePart),
    List(Vec<RecipePart>),
}

impl RecipeInput {
    pub fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::Single(part) => vec![part],
            RecipeInput::List(parts) => parts,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewDrink {
    pub title: String,
    pub recipe: RecipeInput,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DrinkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<RecipeInput>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DrinkDeletedResponse {
    pub success: bool,
    pub delete: i32,
}

// Common

/// Body of all JSON error responses, except for authentication failures
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

/// Body of JSON responses for rejected bearer tokens
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub code: String,
    pub description: String,
}
