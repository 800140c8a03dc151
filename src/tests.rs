#[cfg(test)]
mod integration_tests {
    use crate::handlers::accounts::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
    use crate::handlers::payments::{PaymentRequest, PaymentResponse, PaymentStatsResponse};
    use crate::handlers::planned_items::{PlannedItemRequest, PlannedItemResponse};
    use crate::handlers::regular_incomes::{RegularIncomeRequest, RegularIncomeResponse};
    use crate::handlers::reports::{SummaryResponse, TotalAssetsResponse, WeeklySpendingResponse};
    use crate::handlers::transactions::{TransactionRequest, TransactionResponse};
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::{Duration, Utc};
    use model::entities::account::AccountKind;
    use model::entities::regular_income::IncomeCategory;
    use model::entities::transaction::TransactionKind;
    use rust_decimal::Decimal;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn account_request(name: &str, currency: &str, balance: i64) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.to_string(),
            kind: AccountKind::Bank,
            currency_code: currency.to_string(),
            initial_balance: Some(dec(balance)),
            description: None,
        }
    }

    fn transaction_request(
        account_id: i32,
        kind: TransactionKind,
        amount: i64,
        currency: Option<&str>,
    ) -> TransactionRequest {
        TransactionRequest {
            account_id,
            kind,
            amount: dec(amount),
            currency_code: currency.map(str::to_string),
            category: Some("test".to_string()),
            description: None,
            transaction_date: Utc::now().date_naive(),
        }
    }

    async fn create_account(server: &TestServer, name: &str, currency: &str, balance: i64) -> i32 {
        let response = server
            .post("/api/v1/accounts")
            .json(&account_request(name, currency, balance))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<AccountResponse> = response.json();
        body.data.id
    }

    async fn account_balance(server: &TestServer, account_id: i32) -> Decimal {
        let response = server.get(&format!("/api/v1/accounts/{}", account_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountResponse> = response.json();
        body.data.balance
    }

    #[tokio::test]
    async fn health_check_reports_database_status() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn account_crud_round_trip() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let account_id = create_account(&server, "Savings", "TRY", 1000).await;

        let response = server.get("/api/v1/accounts").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<AccountResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].name, "Savings");

        // Currency change relabels the account; the balance value stays.
        let response = server
            .put(&format!("/api/v1/accounts/{}", account_id))
            .json(&UpdateAccountRequest {
                name: Some("Dollar savings".to_string()),
                kind: None,
                currency_code: Some("USD".to_string()),
                balance: None,
                description: None,
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<AccountResponse> = response.json();
        assert_eq!(body.data.currency_code, "USD");
        assert_eq!(body.data.balance, dec(1000));

        let response = server
            .delete(&format!("/api/v1/accounts/{}", account_id))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get(&format!("/api/v1/accounts/{}", account_id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_accounts_are_rejected() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/accounts")
            .json(&account_request("   ", "TRY", 0))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/accounts")
            .json(&account_request("Pounds", "GBP", 0))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transaction_lifecycle_adjusts_the_balance() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Cash", "TRY", 1000).await;

        // Expense of 150 brings the balance to 850.
        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(
                account_id,
                TransactionKind::Expense,
                150,
                None,
            ))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<TransactionResponse> = response.json();
        let transaction_id = body.data.id;
        assert_eq!(account_balance(&server, account_id).await, dec(850));

        // Raising the expense to 200 reverses the 150 first.
        let response = server
            .put(&format!("/api/v1/transactions/{}", transaction_id))
            .json(&transaction_request(
                account_id,
                TransactionKind::Expense,
                200,
                None,
            ))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(account_balance(&server, account_id).await, dec(800));

        // Deleting it restores the initial balance.
        let response = server
            .delete(&format!("/api/v1/transactions/{}", transaction_id))
            .await;
        response.assert_status(StatusCode::OK);
        assert_eq!(account_balance(&server, account_id).await, dec(1000));
    }

    #[tokio::test]
    async fn foreign_currency_entry_is_normalized_on_create() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Lira", "TRY", 0).await;

        // 10 USD at rate 43.50 lands as 435 TRY.
        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(
                account_id,
                TransactionKind::Income,
                10,
                Some("USD"),
            ))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<TransactionResponse> = response.json();
        assert_eq!(body.data.currency_code, "TRY");
        assert_eq!(body.data.amount, dec(435));
        assert_eq!(account_balance(&server, account_id).await, dec(435));
    }

    #[tokio::test]
    async fn invalid_transactions_are_rejected_without_side_effects() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Cash", "TRY", 500).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(account_id, TransactionKind::Expense, 0, None))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(
                account_id,
                TransactionKind::Expense,
                10,
                Some("GBP"),
            ))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(999, TransactionKind::Expense, 10, None))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        assert_eq!(account_balance(&server, account_id).await, dec(500));
        let response = server.get("/api/v1/transactions").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn realization_is_exactly_once_through_http() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Cash", "TRY", 1000).await;
        let today = Utc::now().date_naive();

        let response = server
            .post("/api/v1/planned-items")
            .json(&PlannedItemRequest {
                account_id,
                kind: TransactionKind::Expense,
                amount: dec(500),
                currency_code: "TRY".to_string(),
                category: Some("rent".to_string()),
                description: None,
                planned_date: today + Duration::days(3),
                is_recurring: None,
                recurrence_period: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<PlannedItemResponse> = response.json();
        let item_id = body.data.id;

        // Pending items never touch the balance.
        assert_eq!(account_balance(&server, account_id).await, dec(1000));

        let response = server
            .post(&format!("/api/v1/planned-items/{}/realize", item_id))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<TransactionResponse> = response.json();
        assert_eq!(body.data.amount, dec(500));
        assert_eq!(body.data.category, "rent");
        // Dated the realization day, not the planned one.
        assert_eq!(body.data.transaction_date, today);
        assert_eq!(account_balance(&server, account_id).await, dec(500));

        // The item is gone; a second realize finds nothing.
        let response = server.get(&format!("/api/v1/planned-items/{}", item_id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let response = server
            .post(&format!("/api/v1/planned-items/{}/realize", item_id))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let response = server.get("/api/v1/transactions").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
    }

    #[tokio::test]
    async fn planned_item_filters_select_by_date() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Cash", "TRY", 0).await;
        let today = Utc::now().date_naive();

        for (name, offset) in [("past", -2i64), ("soon", 3), ("far", 30)] {
            let response = server
                .post("/api/v1/planned-items")
                .json(&PlannedItemRequest {
                    account_id,
                    kind: TransactionKind::Expense,
                    amount: dec(10),
                    currency_code: "TRY".to_string(),
                    category: Some(name.to_string()),
                    description: None,
                    planned_date: today + Duration::days(offset),
                    is_recurring: None,
                    recurrence_period: None,
                })
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        // Upcoming within a week includes the overdue item, not the far one.
        let response = server.get("/api/v1/planned-items?upcoming_days=7").await;
        let body: ApiResponse<Vec<PlannedItemResponse>> = response.json();
        let categories: Vec<&str> = body.data.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["past", "soon"]);
        assert!(body.data[0].is_overdue);

        let response = server.get("/api/v1/planned-items?overdue=true").await;
        let body: ApiResponse<Vec<PlannedItemResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].category, "past");

        // The default report horizon is 7 days as well.
        let response = server.get("/api/v1/reports/upcoming-payments").await;
        let body: ApiResponse<Vec<PlannedItemResponse>> = response.json();
        assert_eq!(body.data.len(), 2);
    }

    #[tokio::test]
    async fn payment_recording_and_delay_statistics() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Bank", "TRY", 0).await;
        let today = Utc::now().date_naive();

        let response = server
            .post("/api/v1/regular-incomes")
            .json(&RegularIncomeRequest {
                account_id,
                name: "Salary".to_string(),
                category: IncomeCategory::Salary,
                amount: dec(30000),
                currency_code: "TRY".to_string(),
                expected_day: 15,
                description: None,
                is_active: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<RegularIncomeResponse> = response.json();
        let income_id = body.data.id;
        assert!(body.data.is_active);

        // No payments yet: the average is exactly zero, not an error.
        let response = server
            .get(&format!("/api/v1/regular-incomes/{}/stats", income_id))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<PaymentStatsResponse> = response.json();
        assert_eq!(body.data.payment_count, 0);
        assert_eq!(body.data.average_delay_days, 0.0);

        // A payment three days late.
        let response = server
            .post(&format!("/api/v1/regular-incomes/{}/payments", income_id))
            .json(&PaymentRequest {
                expected_date: today - Duration::days(3),
                actual_date: Some(today),
                amount: dec(30000),
                currency_code: "TRY".to_string(),
                notes: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<PaymentResponse> = response.json();
        assert_eq!(body.data.delay_days, 3);

        let response = server
            .get(&format!("/api/v1/regular-incomes/{}/stats", income_id))
            .await;
        let body: ApiResponse<PaymentStatsResponse> = response.json();
        assert_eq!(body.data.payment_count, 1);
        assert_eq!(body.data.average_delay_days, 3.0);

        let response = server
            .get(&format!("/api/v1/regular-incomes/{}/payments", income_id))
            .await;
        let body: ApiResponse<Vec<PaymentResponse>> = response.json();
        assert_eq!(body.data.len(), 1);

        // Recording never touched the ledger.
        assert_eq!(account_balance(&server, account_id).await, dec(0));
        let response = server.get("/api/v1/transactions").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn pending_incomes_exclude_those_paid_this_month() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Bank", "TRY", 0).await;
        let today = Utc::now().date_naive();

        let mut ids = Vec::new();
        for (name, day) in [("Salary", 5), ("Scholarship", 25)] {
            let response = server
                .post("/api/v1/regular-incomes")
                .json(&RegularIncomeRequest {
                    account_id,
                    name: name.to_string(),
                    category: IncomeCategory::Other,
                    amount: dec(1000),
                    currency_code: "TRY".to_string(),
                    expected_day: day,
                    description: None,
                    is_active: None,
                })
                .await;
            response.assert_status(StatusCode::CREATED);
            let body: ApiResponse<RegularIncomeResponse> = response.json();
            ids.push(body.data.id);
        }

        // Pay the first one with an expected date in the current month.
        let response = server
            .post(&format!("/api/v1/regular-incomes/{}/payments", ids[0]))
            .json(&PaymentRequest {
                expected_date: today,
                actual_date: Some(today),
                amount: dec(1000),
                currency_code: "TRY".to_string(),
                notes: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/regular-incomes/pending").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<RegularIncomeResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].id, ids[1]);
    }

    #[tokio::test]
    async fn reports_normalize_into_the_base_currency() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let lira_id = create_account(&server, "Lira", "TRY", 1000).await;
        create_account(&server, "Dollars", "USD", 10).await;

        // 1000 TRY + 10 USD at 43.50.
        let response = server.get("/api/v1/reports/total-assets").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<TotalAssetsResponse> = response.json();
        assert_eq!(body.data.currency_code, "TRY");
        assert!((body.data.total - 1435.0).abs() < 1e-9);

        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(lira_id, TransactionKind::Income, 300, None))
            .await;
        response.assert_status(StatusCode::CREATED);
        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(lira_id, TransactionKind::Expense, 150, None))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server.get("/api/v1/reports/summary").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<SummaryResponse> = response.json();
        assert!((body.data.income - 300.0).abs() < 1e-9);
        assert!((body.data.expense - 150.0).abs() < 1e-9);
        assert!((body.data.net - 150.0).abs() < 1e-9);

        // The current week contains today's 150 expense.
        let response = server.get("/api/v1/reports/weekly-spending").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<WeeklySpendingResponse> = response.json();
        assert!((body.data.weekly_total - 150.0).abs() < 1e-9);
        assert!((body.data.daily_totals.iter().sum::<f64>() - 150.0).abs() < 1e-9);
        assert!(body.data.daily_average > 0.0);
    }

    #[tokio::test]
    async fn deleting_an_account_cascades_to_its_children() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let account_id = create_account(&server, "Doomed", "TRY", 100).await;
        let today = Utc::now().date_naive();

        let response = server
            .post("/api/v1/transactions")
            .json(&transaction_request(account_id, TransactionKind::Expense, 10, None))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/v1/planned-items")
            .json(&PlannedItemRequest {
                account_id,
                kind: TransactionKind::Expense,
                amount: dec(5),
                currency_code: "TRY".to_string(),
                category: None,
                description: None,
                planned_date: today + Duration::days(1),
                is_recurring: None,
                recurrence_period: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .delete(&format!("/api/v1/accounts/{}", account_id))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get("/api/v1/transactions").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert!(body.data.is_empty());
        let response = server.get("/api/v1/planned-items").await;
        let body: ApiResponse<Vec<PlannedItemResponse>> = response.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn transaction_list_filters() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let first = create_account(&server, "First", "TRY", 0).await;
        let second = create_account(&server, "Second", "TRY", 0).await;

        for (account, kind, amount) in [
            (first, TransactionKind::Income, 100),
            (first, TransactionKind::Expense, 40),
            (second, TransactionKind::Income, 7),
        ] {
            let response = server
                .post("/api/v1/transactions")
                .json(&transaction_request(account, kind, amount, None))
                .await;
            response.assert_status(StatusCode::CREATED);
        }

        let response = server
            .get(&format!("/api/v1/accounts/{}/transactions", first))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert_eq!(body.data.len(), 2);
        // Most recent first: same date, so higher id wins.
        assert!(body.data[0].id > body.data[1].id);

        let response = server.get("/api/v1/transactions?kind=expense").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].amount, dec(40));

        let response = server.get("/api/v1/transactions?limit=2").await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert_eq!(body.data.len(), 2);

        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let response = server
            .get(&format!("/api/v1/transactions?start_date={}", tomorrow))
            .await;
        let body: ApiResponse<Vec<TransactionResponse>> = response.json();
        assert!(body.data.is_empty());

        let response = server.get("/api/v1/accounts/999/transactions").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
