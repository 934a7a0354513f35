use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, EngineError, NewIngredient, NewLot, Principal};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, Principal, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let engine = Engine::builder().database(db.clone()).build();
    engine.ensure_user("alice", "password").await.unwrap();
    let principal = engine.authenticate("alice", "password").await.unwrap();

    (engine, principal, db)
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn ingredient(name: &str, expires_on: &str) -> NewIngredient {
    NewIngredient {
        name: name.to_string(),
        brand: Some("Valrhona".to_string()),
        supplier: None,
        supplier_lot: "L-42".to_string(),
        notes: None,
        mrp_minor: 450,
        expires_on: date(expires_on),
    }
}

async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS count FROM {table};"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "count").unwrap()
}

#[tokio::test]
async fn authenticate_rejects_unknown_credentials() {
    let (engine, _principal, _db) = engine_with_db().await;

    let err = engine.authenticate("alice", "wrong").await.unwrap_err();
    assert_eq!(err, EngineError::Unauthorized);

    let err = engine.authenticate("mallory", "password").await.unwrap_err();
    assert_eq!(err, EngineError::Unauthorized);
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
    let (engine, _principal, _db) = engine_with_db().await;

    engine.ensure_user("alice", "password").await.unwrap();
    engine.authenticate("alice", "password").await.unwrap();
}

#[tokio::test]
async fn pantry_partitions_by_expiry() {
    let (engine, principal, _db) = engine_with_db().await;

    engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    engine
        .stock_ingredient(&principal, ingredient("Zucchero", "2024-11-30"))
        .await
        .unwrap();

    let as_of = date("2024-12-01");
    let available = engine.available_ingredients(as_of).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].name, "Farina");

    let unavailable = engine.unavailable_ingredients(as_of).await.unwrap();
    assert_eq!(unavailable.len(), 1);
    assert_eq!(unavailable[0].name, "Zucchero");
}

#[tokio::test]
async fn ingredient_on_its_expiry_day_is_still_available() {
    let (engine, principal, _db) = engine_with_db().await;

    engine
        .stock_ingredient(&principal, ingredient("Burro", "2024-12-01"))
        .await
        .unwrap();

    let available = engine.available_ingredients(date("2024-12-01")).await.unwrap();
    assert_eq!(available.len(), 1);

    let available = engine.available_ingredients(date("2024-12-02")).await.unwrap();
    assert!(available.is_empty());
}

#[tokio::test]
async fn available_ingredients_are_sorted_by_name() {
    let (engine, principal, _db) = engine_with_db().await;

    for name in ["Zucchero", "Burro", "Farina"] {
        engine
            .stock_ingredient(&principal, ingredient(name, "2025-06-30"))
            .await
            .unwrap();
    }

    let available = engine.available_ingredients(date("2024-12-01")).await.unwrap();
    let names: Vec<&str> = available.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Burro", "Farina", "Zucchero"]);
}

#[tokio::test]
async fn stocking_requires_name_lot_and_non_negative_mrp() {
    let (engine, principal, _db) = engine_with_db().await;

    let err = engine
        .stock_ingredient(&principal, ingredient("  ", "2025-01-31"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let mut missing_lot = ingredient("Farina", "2025-01-31");
    missing_lot.supplier_lot = String::new();
    let err = engine
        .stock_ingredient(&principal, missing_lot)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let mut negative_mrp = ingredient("Farina", "2025-01-31");
    negative_mrp.mrp_minor = -1;
    let err = engine
        .stock_ingredient(&principal, negative_mrp)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn mark_exhausted_is_one_way_and_idempotent() {
    let (engine, principal, _db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();

    engine.mark_exhausted(&principal, stocked.id).await.unwrap();
    // A second station racing on the same flag is a no-op success.
    engine.mark_exhausted(&principal, stocked.id).await.unwrap();

    let as_of = date("2024-12-01");
    assert!(engine.available_ingredients(as_of).await.unwrap().is_empty());

    let unavailable = engine.unavailable_ingredients(as_of).await.unwrap();
    assert_eq!(unavailable.len(), 1);
    assert!(unavailable[0].is_exhausted);
}

#[tokio::test]
async fn mark_exhausted_unknown_ingredient_is_not_found() {
    let (engine, principal, _db) = engine_with_db().await;

    let err = engine
        .mark_exhausted(&principal, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("ingredient not exists".to_string()));
}

#[tokio::test]
async fn lot_codes_are_distinct_and_increasing_within_a_date() {
    let (engine, _principal, _db) = engine_with_db().await;

    let first = engine.generate_lot_code(date("2024-12-01")).await.unwrap();
    let second = engine.generate_lot_code(date("2024-12-01")).await.unwrap();
    assert_eq!(first, "20241201-001");
    assert_eq!(second, "20241201-002");

    // A different date starts its own sequence; codes never collide because
    // the date prefix differs.
    let other = engine.generate_lot_code(date("2024-12-02")).await.unwrap();
    assert_eq!(other, "20241202-001");
}

#[tokio::test]
async fn create_lot_computes_code_and_expiry() {
    let (engine, principal, _db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();

    let lot = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    assert_eq!(lot.lot_code, "20241201-001");
    assert_eq!(lot.expires_on, date("2024-12-22"));
    assert_eq!(lot.product_name, "Sables");
}

#[tokio::test]
async fn create_lot_links_every_selected_ingredient_once() {
    let (engine, principal, db) = engine_with_db().await;

    let farina = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    let burro = engine
        .stock_ingredient(&principal, ingredient("Burro", "2025-01-15"))
        .await
        .unwrap();

    engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Frolla"),
                manufactured_on: date("2024-12-01"),
                // Duplicate selection collapses to one link.
                ingredient_ids: vec![farina.id, burro.id, farina.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    assert_eq!(count(&db, "lot_ingredients").await, 2);
}

#[tokio::test]
async fn create_lot_rejects_empty_inputs_without_writing() {
    let (engine, principal, db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();

    let err = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("X"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("at least one ingredient is required".to_string())
    );

    let err = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("   "),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(count(&db, "product_lots").await, 0);
    assert_eq!(count(&db, "lot_ingredients").await, 0);
}

#[tokio::test]
async fn create_lot_rechecks_availability_at_call_time() {
    let (engine, principal, db) = engine_with_db().await;

    let expired = engine
        .stock_ingredient(&principal, ingredient("Zucchero", "2024-11-30"))
        .await
        .unwrap();

    let err = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![expired.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("ingredient \"Zucchero\" is not available".to_string())
    );

    let exhausted = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    engine.mark_exhausted(&principal, exhausted.id).await.unwrap();

    let err = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![exhausted.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    assert_eq!(count(&db, "product_lots").await, 0);
    assert_eq!(count(&db, "lot_ingredients").await, 0);
}

#[tokio::test]
async fn create_lot_rejects_unknown_ingredient() {
    let (engine, principal, db) = engine_with_db().await;

    let err = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![Uuid::new_v4()],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("ingredient not exists".to_string()));

    assert_eq!(count(&db, "product_lots").await, 0);
}

#[tokio::test]
async fn sold_lot_leaves_the_unsold_list() {
    let (engine, principal, _db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    let lot = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    let unsold = engine.unsold_lots().await.unwrap();
    assert_eq!(unsold.len(), 1);
    assert_eq!(unsold[0].id, lot.id);

    let sale = engine
        .record_sale(&principal, lot.id, "Alice", 2500, date("2024-12-02"))
        .await
        .unwrap();
    assert_eq!(sale.product_lot_id, lot.id);

    assert!(engine.unsold_lots().await.unwrap().is_empty());

    let err = engine
        .record_sale(&principal, lot.id, "Bob", 3000, date("2024-12-02"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::LotAlreadySold("20241201-001".to_string()));
}

#[tokio::test]
async fn record_sale_validates_before_writing() {
    let (engine, principal, db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    let lot = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    let err = engine
        .record_sale(&principal, lot.id, "  ", 2500, date("2024-12-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .record_sale(&principal, lot.id, "Alice", -1, date("2024-12-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .record_sale(&principal, Uuid::new_v4(), "Alice", 2500, date("2024-12-02"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("lot not exists".to_string()));

    assert_eq!(count(&db, "sales").await, 0);
}

#[tokio::test]
async fn store_rejects_a_second_sale_row_for_the_same_lot() {
    let (engine, principal, db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();
    let lot = engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    engine
        .record_sale(&principal, lot.id, "Alice", 2500, date("2024-12-02"))
        .await
        .unwrap();

    // Bypass the precondition check: the unique index itself must reject a
    // competing writer that slipped past it.
    let backend = db.get_database_backend();
    let result = db
        .execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO sales \
             (id, product_lot_id, customer, selling_price_minor, sold_on, recorded_by, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?);",
            vec![
                Uuid::new_v4().to_string().into(),
                lot.id.to_string().into(),
                "Bob".into(),
                3000i64.into(),
                date("2024-12-02").into(),
                "alice".into(),
                Utc::now().into(),
            ],
        ))
        .await;
    assert!(result.is_err());

    assert_eq!(count(&db, "sales").await, 1);
}

#[tokio::test]
async fn unsold_lots_are_ordered_by_manufacture_date() {
    let (engine, principal, _db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();

    engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Sables"),
                manufactured_on: date("2024-12-03"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();
    engine
        .create_lot(
            &principal,
            NewLot {
                product_name: String::from("Frolla"),
                manufactured_on: date("2024-12-01"),
                ingredient_ids: vec![stocked.id],
            },
            date("2024-12-01"),
        )
        .await
        .unwrap();

    let unsold = engine.unsold_lots().await.unwrap();
    let dates: Vec<NaiveDate> = unsold.iter().map(|l| l.manufactured_on).collect();
    assert_eq!(dates, [date("2024-12-01"), date("2024-12-03")]);
}

#[tokio::test]
async fn total_sales_sums_exactly_one_day() {
    let (engine, principal, _db) = engine_with_db().await;

    let stocked = engine
        .stock_ingredient(&principal, ingredient("Farina", "2025-01-31"))
        .await
        .unwrap();

    let mut lots = Vec::new();
    for name in ["Sables", "Frolla", "Cantucci"] {
        lots.push(
            engine
                .create_lot(
                    &principal,
                    NewLot {
                        product_name: name.to_string(),
                        manufactured_on: date("2024-12-01"),
                        ingredient_ids: vec![stocked.id],
                    },
                    date("2024-12-01"),
                )
                .await
                .unwrap(),
        );
    }

    engine
        .record_sale(&principal, lots[0].id, "Alice", 250, date("2024-12-02"))
        .await
        .unwrap();
    engine
        .record_sale(&principal, lots[1].id, "Bob", 300, date("2024-12-02"))
        .await
        .unwrap();
    engine
        .record_sale(&principal, lots[2].id, "Carol", 100, date("2024-12-03"))
        .await
        .unwrap();

    assert_eq!(engine.total_sales(date("2024-12-02")).await.unwrap(), 550);
    assert_eq!(engine.total_sales(date("2024-12-03")).await.unwrap(), 100);
    assert_eq!(engine.total_sales(date("2024-12-04")).await.unwrap(), 0);
}
