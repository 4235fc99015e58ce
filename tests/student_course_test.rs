//! Student and course repository integration tests

use matricula_core::domain::{
    CourseFilter, CreateCourseInput, CreateStudentInput, StudentFilter, UpdateStudentInput,
};
use matricula_core::error::AppError;
use matricula_core::repository::course::CourseRepositoryImpl;
use matricula_core::repository::student::StudentRepositoryImpl;
use matricula_core::repository::{CourseRepository, StudentRepository};

mod common;

fn student_input(first: &str, last: &str, email: &str, id_number: &str) -> CreateStudentInput {
    CreateStudentInput {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        id_number: id_number.to_string(),
    }
}

#[tokio::test]
async fn test_student_crud_and_search() {
    let pool = match common::get_test_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: could not connect to database: {}", e);
            return;
        }
    };
    let _guard = common::db_guard().await;
    common::setup_database(&pool).await.unwrap();
    common::cleanup_database(&pool).await.unwrap();

    let repo = StudentRepositoryImpl::new(pool.clone());

    let ana = repo
        .create(&student_input("Ana", "Gomez", "ana@example.com", "1111"))
        .await
        .unwrap();
    repo.create(&student_input("Bruno", "Alvarez", "bruno@example.com", "2222"))
        .await
        .unwrap();

    // Duplicate email is a conflict.
    let duplicate = repo
        .create(&student_input("Otra", "Ana", "ana@example.com", "3333"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Search matches the id number too.
    let filter = StudentFilter {
        search: Some("1111".to_string()),
        ordering: None,
    };
    let found = repo.list(&filter, 0, 20).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, ana.id);
    assert_eq!(repo.count(&filter).await.unwrap(), 1);

    // Default ordering is last name, then first name.
    let all = repo.list(&StudentFilter::default(), 0, 20).await.unwrap();
    let last_names: Vec<_> = all.iter().map(|s| s.last_name.as_str()).collect();
    assert_eq!(last_names, vec!["Alvarez", "Gomez"]);

    // Partial update keeps the other fields.
    let updated = repo
        .update(
            ana.id,
            &UpdateStudentInput {
                email: Some("ana.gomez@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "ana.gomez@example.com");
    assert_eq!(updated.first_name, "Ana");

    repo.delete(ana.id).await.unwrap();
    let gone = repo.find_by_id(ana.id).await.unwrap();
    assert!(gone.is_none());

    common::cleanup_database(&pool).await.unwrap();
}

#[tokio::test]
async fn test_course_unique_code_and_ordering() {
    let pool = match common::get_test_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: could not connect to database: {}", e);
            return;
        }
    };
    let _guard = common::db_guard().await;
    common::setup_database(&pool).await.unwrap();
    common::cleanup_database(&pool).await.unwrap();

    let repo = CourseRepositoryImpl::new(pool.clone());

    repo.create(&CreateCourseInput {
        code: "ZOO-300".to_string(),
        title: "Zoology".to_string(),
        capacity: 30,
    })
    .await
    .unwrap();
    repo.create(&CreateCourseInput {
        code: "ALG-100".to_string(),
        title: "Algebra".to_string(),
        capacity: 30,
    })
    .await
    .unwrap();

    let duplicate = repo
        .create(&CreateCourseInput {
            code: "ZOO-300".to_string(),
            title: "Another".to_string(),
            capacity: 10,
        })
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let all = repo.list(&CourseFilter::default(), 0, 20).await.unwrap();
    let codes: Vec<_> = all.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["ALG-100", "ZOO-300"]);

    common::cleanup_database(&pool).await.unwrap();
}
