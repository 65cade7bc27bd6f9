//! Integration tests for the Postgres repositories.
//!
//! Need a reachable `DATABASE_URL`; run with `cargo test -- --ignored`.

use assert_matches::assert_matches;
use ratesreg_core::lookup::QueryTemplate;
use ratesreg_db::models::person::{NewPerson, UpdatePerson};
use ratesreg_db::models::rates_register::NewRatesRegister;
use ratesreg_db::repositories::{PersonRepo, RatesRegisterRepo};
use ratesreg_db::{PersonStore, PgStore, StoreError};
use sqlx::PgPool;

fn new_person(username: &str, email: &str) -> NewPerson {
    NewPerson {
        name: "Sakthi".to_string(),
        username: username.to_string(),
        email: email.to_string(),
        age: 27,
    }
}

// ---------------------------------------------------------------------------
// Test: create + find round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_person(pool: PgPool) {
    let created = PersonRepo::create(&pool, &new_person("sgsakthi", "sgsakthi1992@gmail.com"))
        .await
        .unwrap();
    let found = PersonRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert!(PersonRepo::find_by_id(&pool, created.id + 1)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: ILIKE search mirrors the in-memory match engine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_search_or_combines_fields(pool: PgPool) {
    PersonRepo::create(&pool, &new_person("sgsakthi", "sgsakthi1992@gmail.com"))
        .await
        .unwrap();
    PersonRepo::create(&pool, &new_person("employee1", "emp1@yahoo.com"))
        .await
        .unwrap();
    PersonRepo::create(&pool, &new_person("under_score", "u@x.org"))
        .await
        .unwrap();

    let template = QueryTemplate::new()
        .with_username("SAKTHI")
        .with_email("YAHOO");
    let found = PersonRepo::search(&pool, &template).await.unwrap();
    let names: Vec<&str> = found.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, vec!["sgsakthi", "employee1"]);

    // `_` is matched literally, not as a wildcard.
    let literal = PersonRepo::search(&pool, &QueryTemplate::new().with_username("r_s"))
        .await
        .unwrap();
    assert_eq!(literal.len(), 1);
    assert_eq!(literal[0].username, "under_score");

    let everything = PersonRepo::search(&pool, &QueryTemplate::new()).await.unwrap();
    assert_eq!(everything.len(), 3);
}

// ---------------------------------------------------------------------------
// Test: unique username constraint
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_violates_unique_constraint(pool: PgPool) {
    PersonRepo::create(&pool, &new_person("sgsakthi", "a@b.com"))
        .await
        .unwrap();
    assert!(PersonRepo::username_exists(&pool, "sgsakthi").await.unwrap());

    let err = PersonRepo::create(&pool, &new_person("sgsakthi", "c@d.com"))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(db) if db.constraint() == Some("uq_persons_username"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_pg_store_reports_taken_username_as_conflict(pool: PgPool) {
    let store = PgStore::new(pool);
    PersonStore::create(&store, &new_person("sgsakthi", "a@b.com"))
        .await
        .unwrap();

    let err = PersonStore::create(&store, &new_person("sgsakthi", "c@d.com"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(msg) if msg == "Username sgsakthi already exists");
}

// ---------------------------------------------------------------------------
// Test: update email and cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_email_and_cascade_delete(pool: PgPool) {
    let person = PersonRepo::create(&pool, &new_person("sgsakthi", "old@gmail.com"))
        .await
        .unwrap();
    let updated = PersonRepo::update(&pool, person.id, &UpdatePerson::email("new@gmail.com"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.email, "new@gmail.com");
    assert_eq!(
        PersonRepo::find_by_email(&pool, "new@gmail.com").await.unwrap().len(),
        1
    );

    let register = RatesRegisterRepo::create(
        &pool,
        &NewRatesRegister {
            employee_id: person.id,
            base: "USD".to_string(),
            target: vec!["INR".to_string(), "EUR".to_string()],
        },
    )
    .await
    .unwrap();
    assert_eq!(register.target, vec!["INR", "EUR"]);

    assert!(PersonRepo::delete(&pool, person.id).await.unwrap());
    assert!(RatesRegisterRepo::find_by_id(&pool, register.registration_id)
        .await
        .unwrap()
        .is_none());
}
