//! End-to-end tests that exercise the JSON API through the full router.

use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use money_manager_rs::{AppState, build_router};

fn get_test_server() -> TestServer {
    let connection =
        Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");
    let state = AppState::new(connection, "UTC").expect("Could not create app state");
    let app = build_router(state);

    TestServer::new(app)
}

async fn create_account(server: &TestServer, name: &str, balance: &str) -> i64 {
    let response = server
        .post("/api/accounts")
        .json(&json!({ "name": name, "balance": balance, "color": "#2dd4bf" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn expense_lifecycle_keeps_balance_consistent() {
    let server = get_test_server();
    let cash = create_account(&server, "Cash", "1000").await;

    let response = server
        .post("/api/transactions")
        .json(&json!({
            "type": "expense",
            "amount": "200",
            "description": "Weekly groceries",
            "categoryId": "groceries",
            "division": "Personal",
            "accountId": cash,
            "dateTime": "2024-01-15T10:30:00"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let transaction = response.json::<Value>();
    assert_eq!(transaction["editable"], json!(true));

    let account = server.get(&format!("/api/accounts/{cash}")).await;
    assert_eq!(account.json::<Value>()["balance"], json!("800"));

    let transaction_id = transaction["id"].as_i64().unwrap();
    server
        .delete(&format!("/api/transactions/{transaction_id}"))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let account = server.get(&format!("/api/accounts/{cash}")).await;
    assert_eq!(account.json::<Value>()["balance"], json!("1000"));
}

#[tokio::test]
async fn transfer_round_trip_restores_balances() {
    let server = get_test_server();
    let bank = create_account(&server, "Bank", "5000").await;
    let cash = create_account(&server, "Cash", "1000").await;

    let response = server
        .post("/api/transfers")
        .json(&json!({
            "fromAccountId": bank,
            "toAccountId": cash,
            "amount": "300",
            "description": "Top up cash",
            "dateTime": "2024-01-15T10:30:00"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let transfer_id = response.json::<Value>()["id"].as_i64().unwrap();

    let accounts = server.get("/api/accounts/total-balance").await;
    assert_eq!(accounts.json::<Value>()["totalBalance"], json!("6000"));
    assert_eq!(
        server.get(&format!("/api/accounts/{bank}")).await.json::<Value>()["balance"],
        json!("4700")
    );
    assert_eq!(
        server.get(&format!("/api/accounts/{cash}")).await.json::<Value>()["balance"],
        json!("1300")
    );

    server
        .delete(&format!("/api/transfers/{transfer_id}"))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    assert_eq!(
        server.get(&format!("/api/accounts/{bank}")).await.json::<Value>()["balance"],
        json!("5000")
    );
    assert_eq!(
        server.get(&format!("/api/accounts/{cash}")).await.json::<Value>()["balance"],
        json!("1000")
    );
}

#[tokio::test]
async fn self_transfer_is_a_bad_request() {
    let server = get_test_server();
    let bank = create_account(&server, "Bank", "5000").await;

    server
        .post("/api/transfers")
        .json(&json!({
            "fromAccountId": bank,
            "toAccountId": bank,
            "amount": "300",
            "description": "Top up cash",
            "dateTime": "2024-01-15T10:30:00"
        }))
        .await
        .assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resources_are_not_found() {
    let server = get_test_server();

    server
        .get("/api/accounts/42")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
    server
        .get("/api/transactions/42")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
    server
        .delete("/api/transfers/42")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
    server
        .get("/api/categories/nope")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_account_delete_is_a_conflict() {
    let server = get_test_server();
    let cash = create_account(&server, "Cash", "1000").await;

    server
        .post("/api/transactions")
        .json(&json!({
            "type": "expense",
            "amount": "50",
            "description": "Coffee",
            "categoryId": "coffee",
            "division": "Personal",
            "accountId": cash,
            "dateTime": "2024-01-15T10:30:00"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    server
        .delete(&format!("/api/accounts/{cash}"))
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn transaction_filters_narrow_the_listing() {
    let server = get_test_server();
    let cash = create_account(&server, "Cash", "10000").await;

    for (kind, amount, category, division, date_time) in [
        ("expense", "50", "groceries", "Personal", "2024-01-10T09:00:00"),
        ("expense", "120", "rent", "Personal", "2024-01-12T09:00:00"),
        ("income", "2000", "salary", "Office", "2024-01-15T09:00:00"),
    ] {
        server
            .post("/api/transactions")
            .json(&json!({
                "type": kind,
                "amount": amount,
                "description": "Test",
                "categoryId": category,
                "division": division,
                "accountId": cash,
                "dateTime": date_time
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let all = server.get("/api/transactions").await.json::<Value>();
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["dateTime"], json!("2024-01-15T09:00:00"));

    let personal = server
        .get("/api/transactions")
        .add_query_param("division", "Personal")
        .await
        .json::<Value>();
    assert_eq!(personal.as_array().unwrap().len(), 2);

    let january_middle = server
        .get("/api/transactions")
        .add_query_param("startDate", "2024-01-11")
        .add_query_param("endDate", "2024-01-13")
        .await
        .json::<Value>();
    assert_eq!(january_middle.as_array().unwrap().len(), 1);
    assert_eq!(january_middle[0]["categoryId"], json!("rent"));
}

#[tokio::test]
async fn totals_report_income_minus_expense() {
    let server = get_test_server();
    let cash = create_account(&server, "Cash", "10000").await;

    for (kind, amount, category) in [
        ("income", "2000", "salary"),
        ("expense", "120", "rent"),
        ("expense", "50", "groceries"),
    ] {
        server
            .post("/api/transactions")
            .json(&json!({
                "type": kind,
                "amount": amount,
                "description": "Test",
                "categoryId": category,
                "division": "Personal",
                "accountId": cash,
                "dateTime": "2024-01-15T09:00:00"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let totals = server.get("/api/dashboard/totals").await.json::<Value>();
    assert_eq!(totals["totalIncome"], json!("2000"));
    assert_eq!(totals["totalExpense"], json!("170"));
    assert_eq!(totals["balance"], json!("1830"));
}

#[tokio::test]
async fn category_summary_resolves_known_categories() {
    let server = get_test_server();
    let cash = create_account(&server, "Cash", "10000").await;

    server
        .post("/api/categories")
        .json(&json!({
            "id": "groceries",
            "name": "Groceries",
            "icon": "ShoppingCart",
            "type": "expense"
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    for category in ["groceries", "mystery"] {
        server
            .post("/api/transactions")
            .json(&json!({
                "type": "expense",
                "amount": "40",
                "description": "Test",
                "categoryId": category,
                "division": "Personal",
                "accountId": cash,
                "dateTime": "2024-01-15T09:00:00"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let summaries = server
        .get("/api/dashboard/category-summary")
        .await
        .json::<Value>();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 2);

    let by_id = |id: &str| {
        summaries
            .iter()
            .find(|summary| summary["categoryId"] == json!(id))
            .unwrap()
    };
    assert_eq!(by_id("groceries")["categoryName"], json!("Groceries"));
    assert_eq!(by_id("groceries")["icon"], json!("ShoppingCart"));
    assert_eq!(by_id("mystery")["categoryName"], json!("mystery"));
    assert_eq!(by_id("mystery")["icon"], json!("Receipt"));
}

#[tokio::test]
async fn categories_list_by_type() {
    let server = get_test_server();

    for (id, kind) in [("salary", "income"), ("rent", "expense")] {
        server
            .post("/api/categories")
            .json(&json!({ "id": id, "name": id, "icon": "Receipt", "type": kind }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let income = server
        .get("/api/categories/type/income")
        .await
        .json::<Value>();
    assert_eq!(income.as_array().unwrap().len(), 1);
    assert_eq!(income[0]["id"], json!("salary"));
}

#[tokio::test]
async fn dashboard_summary_serves_trailing_periods() {
    let server = get_test_server();

    let summary = server
        .get("/api/dashboard/summary/weekly")
        .await
        .json::<Value>();
    assert_eq!(summary["periodComparison"].as_array().unwrap().len(), 4);

    let summary = server
        .get("/api/dashboard/summary/monthly")
        .await
        .json::<Value>();
    assert_eq!(summary["periodComparison"].as_array().unwrap().len(), 6);

    let summary = server
        .get("/api/dashboard/summary/custom")
        .add_query_param("startDate", "2024-01-01")
        .add_query_param("endDate", "2024-03-31")
        .await
        .json::<Value>();
    assert_eq!(summary["periodComparison"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn malformed_dates_are_a_bad_request() {
    let server = get_test_server();

    server
        .get("/api/transactions")
        .add_query_param("startDate", "January 1st")
        .await
        .assert_status(axum::http::StatusCode::BAD_REQUEST);
}
