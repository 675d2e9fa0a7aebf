use crate::data_store::models::NewQuestion;
use crate::data_store::{CategoryId, QuestionId};
use crate::web::json_api::APIError;
use crate::web::trivia::QUESTIONS_PER_PAGE;
use crate::web::AppState;
use actix_web::{web, Responder};
use rand::seq::SliceRandom;
use serde::Deserialize;
use trio_api_types::{
    CategoriesResponse, CategoryQuestionsResponse, QuestionCreatedResponse,
    QuestionDeletedResponse, QuestionPageResponse, QuestionSearch, QuestionSearchResponse,
    QuizQuestion, QuizRequest, QuizResponse,
};

pub async fn list_categories(state: web::Data<AppState>) -> Result<impl Responder, APIError> {
    let categories: Vec<trio_api_types::Category> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_categories()?)
    })
    .await??
    .into_iter()
    .map(|c| c.into())
    .collect();

    Ok(web::Json(CategoriesResponse {
        success: true,
        total_categories: categories.len(),
        categories,
    }))
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<usize>,
}

pub async fn list_questions(
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let page = query.into_inner().page.unwrap_or(1);
    if page == 0 {
        return Err(APIError::InvalidData(
            "Page numbers start at 1".to_owned(),
        ));
    }
    let (questions, categories) = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok((store.get_questions()?, store.get_categories()?))
    })
    .await??;

    let total_questions = questions.len();
    // Offsets beyond `usize` are past the end of any result set
    let offset = (page - 1)
        .checked_mul(QUESTIONS_PER_PAGE)
        .unwrap_or(usize::MAX);
    let questions = questions
        .into_iter()
        .skip(offset)
        .take(QUESTIONS_PER_PAGE)
        .map(|q| q.into())
        .collect();

    Ok(web::Json(QuestionPageResponse {
        success: true,
        questions,
        total_questions,
        categories: categories.into_iter().map(|c| c.into()).collect(),
        current_category: None,
    }))
}

pub async fn list_category_questions(
    path: web::Path<CategoryId>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let category_id = path.into_inner();
    let questions: Vec<trio_api_types::Question> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_questions_by_category(category_id)?)
    })
    .await??
    .into_iter()
    .map(|q| q.into())
    .collect();

    Ok(web::Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category_id,
    }))
}

pub async fn create_question(
    data: web::Json<trio_api_types::NewQuestion>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let question: NewQuestion = data.into_inner().into();
    validate_question(&question)?;
    let created = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.create_question(question)?)
    })
    .await??;

    Ok(web::Json(QuestionCreatedResponse {
        success: true,
        created: created.id,
        request: created.into(),
    }))
}

fn validate_question(question: &NewQuestion) -> Result<(), APIError> {
    if question.question.trim().is_empty() {
        return Err(APIError::InvalidData("Question must not be empty".to_owned()));
    }
    if question.answer.trim().is_empty() {
        return Err(APIError::InvalidData("Answer must not be empty".to_owned()));
    }
    if !(1..=5).contains(&question.difficulty) {
        return Err(APIError::InvalidData(
            "Difficulty must be between 1 and 5".to_owned(),
        ));
    }
    Ok(())
}

pub async fn delete_question(
    path: web::Path<QuestionId>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let question_id = path.into_inner();
    let deleted = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.delete_question(question_id)?)
    })
    .await??;

    Ok(web::Json(QuestionDeletedResponse {
        success: true,
        deleted: deleted.id,
        request: deleted.into(),
    }))
}

pub async fn search_questions(
    data: web::Json<QuestionSearch>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let search_term = data.into_inner().search_term;
    let questions: Vec<trio_api_types::Question> = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.search_questions(&search_term)?)
    })
    .await??
    .into_iter()
    .map(|q| q.into())
    .collect();

    Ok(web::Json(QuestionSearchResponse {
        success: true,
        total_questions: questions.len(),
        questions,
    }))
}

/// Pick a random question of the selected category, which has not been asked before
pub async fn play_quiz(
    data: web::Json<QuizRequest>,
    state: web::Data<AppState>,
) -> Result<impl Responder, APIError> {
    let request = data.into_inner();
    let category_id = request
        .quiz_category
        .map(|c| c.id())
        .filter(|id| *id != 0);
    let candidates = web::block(move || -> Result<_, APIError> {
        let mut store = state.store.get_facade()?;
        Ok(store.get_quiz_candidates(category_id, &request.previous_questions)?)
    })
    .await??;

    let question = match candidates.choose(&mut rand::thread_rng()) {
        Some(question) => QuizQuestion::Next(question.clone().into()),
        None => QuizQuestion::Exhausted(false),
    };
    Ok(web::Json(QuizResponse {
        success: true,
        question,
    }))
}
