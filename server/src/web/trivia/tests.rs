use super::*;
use crate::data_store::models::{Category, Question};
use crate::data_store::store_mock::StoreMock;
use crate::data_store::StoreError;
use crate::web::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::{http, test, App};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use trio_api_types::{
    CategoriesResponse, CategoryQuestionsResponse, ErrorResponse, QuestionCreatedResponse,
    QuestionDeletedResponse, QuestionPageResponse, QuestionSearchResponse, QuizQuestion,
    QuizResponse,
};

fn fill_sample_data(store: &StoreMock) {
    let mut data = store.data.lock().unwrap();
    data.categories = ["Science", "Art", "Geography", "History", "Entertainment", "Sports"]
        .iter()
        .enumerate()
        .map(|(i, name)| Category {
            id: i as i32 + 1,
            type_name: name.to_string(),
        })
        .collect();
    data.questions = (1..=12)
        .map(|i| Question {
            id: i,
            question: format!("Sample question number {}?", i),
            answer: format!("Answer {}", i),
            category: if i <= 8 { 1 } else { 4 },
            difficulty: (i % 5) + 1,
        })
        .collect();
    data.questions.push(Question {
        id: 13,
        question: "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?".to_string(),
        answer: "Maya Angelou".to_string(),
        category: 4,
        difficulty: 2,
    });
}

/// Create the test service for the trivia API with the given [StoreMock]
macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .configure(configure_app)
                .app_data(web::Data::new(AppState {
                    store: $store,
                    token_verifier: None,
                })),
        )
        .await
    };
}

fn sample_store() -> Arc<StoreMock> {
    let store = Arc::new(StoreMock::default());
    fill_sample_data(&store);
    store
}

async fn parse_body<T: DeserializeOwned>(res: ServiceResponse) -> T {
    let body = res.into_body().try_into_bytes().unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[actix_web::test]
async fn test_list_categories() {
    let app = init_app!(sample_store());
    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("Access-Control-Allow-Origin")
            .map(|v| v.as_bytes()),
        Some(&b"*"[..])
    );
    let result: CategoriesResponse = parse_body(res).await;
    assert!(result.success);
    assert_eq!(result.total_categories, 6);
    assert_eq!(result.categories[0].type_name, "Science");
}

#[actix_web::test]
async fn test_list_questions_paginated() {
    let app = init_app!(sample_store());

    let req = test::TestRequest::get().uri("/api/questions").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuestionPageResponse = parse_body(res).await;
    assert_eq!(result.questions.len(), QUESTIONS_PER_PAGE);
    assert_eq!(result.total_questions, 13);
    assert_eq!(result.categories.len(), 6);
    assert_eq!(result.current_category, None);

    let req = test::TestRequest::get()
        .uri("/api/questions?page=2")
        .to_request();
    let result: QuestionPageResponse = parse_body(test::call_service(&app, req).await).await;
    assert_eq!(result.questions.len(), 3);
    assert_eq!(result.questions[0].id, 11);

    let req = test::TestRequest::get()
        .uri("/api/questions?page=100")
        .to_request();
    let result: QuestionPageResponse = parse_body(test::call_service(&app, req).await).await;
    assert!(result.questions.is_empty());
    assert_eq!(result.total_questions, 13);

    let req = test::TestRequest::get()
        .uri(&format!("/api/questions?page={}", usize::MAX))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuestionPageResponse = parse_body(res).await;
    assert!(result.questions.is_empty());
    assert_eq!(result.total_questions, 13);
}

#[actix_web::test]
async fn test_list_questions_invalid_page() {
    let app = init_app!(sample_store());
    for uri in ["/api/questions?page=0", "/api/questions?page=abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), http::StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        let result: ErrorResponse = parse_body(res).await;
        assert!(!result.success);
        assert_eq!(result.error, 422);
    }
}

#[actix_web::test]
async fn test_category_questions() {
    let app = init_app!(sample_store());
    let req = test::TestRequest::get()
        .uri("/api/categories/4/questions")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: CategoryQuestionsResponse = parse_body(res).await;
    assert_eq!(result.total_questions, 5);
    assert_eq!(result.current_category, 4);
    assert!(result.questions.iter().all(|q| q.category == 4));

    for uri in ["/api/categories/1000/questions", "/api/categories/xyz/questions"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND, "{}", uri);
        let result: ErrorResponse = parse_body(res).await;
        assert_eq!(result.message, "resource not found");
    }
}

#[actix_web::test]
async fn test_create_question() {
    let store = sample_store();
    let app = init_app!(store.clone());
    let req = test::TestRequest::post()
        .uri("/api/questions")
        .set_json(json!({
            "question": "What is the heaviest organ in the human body?",
            "answer": "The Liver",
            "category": 1,
            "difficulty": 4
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuestionCreatedResponse = parse_body(res).await;
    assert!(result.success);
    assert_eq!(result.created, 14);
    assert_eq!(result.request.answer, "The Liver");
    assert_eq!(store.data.lock().unwrap().questions.len(), 14);
}

#[actix_web::test]
async fn test_create_question_invalid() {
    let store = sample_store();
    let app = init_app!(store.clone());
    let invalid_requests = [
        json!({"question": "Missing answer?", "category": 1, "difficulty": 1}),
        json!({"question": "", "answer": "empty question", "category": 1, "difficulty": 1}),
        json!({"question": "Too difficult?", "answer": "yes", "category": 1, "difficulty": 6}),
        json!({"question": "Unknown category?", "answer": "yes", "category": 99, "difficulty": 1}),
        json!({"question": "Wrong type?", "answer": "yes", "category": "one", "difficulty": 1}),
    ];
    for body in invalid_requests {
        let req = test::TestRequest::post()
            .uri("/api/questions")
            .set_json(&body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.status(),
            http::StatusCode::UNPROCESSABLE_ENTITY,
            "{}",
            body
        );
    }
    assert_eq!(store.data.lock().unwrap().questions.len(), 13);
}

#[actix_web::test]
async fn test_delete_question() {
    let store = sample_store();
    let app = init_app!(store.clone());
    let req = test::TestRequest::delete()
        .uri("/api/questions/13")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuestionDeletedResponse = parse_body(res).await;
    assert!(result.success);
    assert_eq!(result.deleted, 13);
    assert_eq!(result.request.answer, "Maya Angelou");
    assert_eq!(store.data.lock().unwrap().questions.len(), 12);

    let req = test::TestRequest::delete()
        .uri("/api/questions/13")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    let result: ErrorResponse = parse_body(res).await;
    assert!(!result.success);
    assert_eq!(store.data.lock().unwrap().questions.len(), 12);
}

#[actix_web::test]
async fn test_search_questions() {
    let app = init_app!(sample_store());
    let req = test::TestRequest::post()
        .uri("/api/questions/search")
        .set_json(json!({"searchTerm": "caged BIRD"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuestionSearchResponse = parse_body(res).await;
    assert_eq!(result.total_questions, 1);
    assert_eq!(result.questions[0].id, 13);

    let req = test::TestRequest::post()
        .uri("/api/questions/search")
        .set_json(json!({"searchTerm": "no such question"}))
        .to_request();
    let result: QuestionSearchResponse = parse_body(test::call_service(&app, req).await).await;
    assert_eq!(result.total_questions, 0);
}

#[actix_web::test]
async fn test_play_quiz() {
    let app = init_app!(sample_store());
    let req = test::TestRequest::post()
        .uri("/api/play")
        .set_json(json!({
            "quizCategory": {"id": 4, "type": "History"},
            "previousQuestions": [9, 10, 11]
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let result: QuizResponse = parse_body(res).await;
    match result.question {
        QuizQuestion::Next(question) => {
            assert_eq!(question.category, 4);
            assert!([12, 13].contains(&question.id));
        }
        QuizQuestion::Exhausted(_) => panic!("Expected a question"),
    }

    let req = test::TestRequest::post()
        .uri("/api/play")
        .set_json(json!({"quizCategory": 4, "previousQuestions": [9, 10, 11, 12, 13]}))
        .to_request();
    let result: QuizResponse = parse_body(test::call_service(&app, req).await).await;
    assert!(matches!(result.question, QuizQuestion::Exhausted(false)));

    // Category 0 selects all categories
    let req = test::TestRequest::post()
        .uri("/api/play")
        .set_json(json!({"quizCategory": 0, "previousQuestions": (1..=12).collect::<Vec<i32>>()}))
        .to_request();
    let result: QuizResponse = parse_body(test::call_service(&app, req).await).await;
    assert!(matches!(result.question, QuizQuestion::Next(q) if q.id == 13));
}

#[actix_web::test]
async fn test_method_not_allowed_and_unknown_path() {
    let app = init_app!(sample_store());
    let req = test::TestRequest::patch().uri("/api/categories").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    let result: ErrorResponse = parse_body(res).await;
    assert_eq!(result.error, 405);

    let req = test::TestRequest::default()
        .method(http::Method::OPTIONS)
        .uri("/api/questions")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/answers").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_database_error() {
    let store = sample_store();
    store.data.lock().unwrap().next_error = Some(StoreError::ConnectionError(
        "Connection refused".to_owned(),
    ));
    let app = init_app!(store);
    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    let result: ErrorResponse = parse_body(res).await;
    assert!(!result.success);
    assert_eq!(result.error, 500);
}
