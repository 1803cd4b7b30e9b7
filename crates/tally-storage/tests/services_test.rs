//! Service-level tests: login, categories, transactions, balances.

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use tally_core::amount::Amount;
use tally_core::date_range::DateRange;
use tally_storage::{
    CategoryService, LoginService, NewTransaction, Session, StoreGateway, StorePaths,
    TransactionSearch, TransactionService,
};

fn gateway_at(dir: &TempDir) -> StoreGateway {
    let gateway = StoreGateway::new(StorePaths::at(dir.path()));
    gateway.ensure_store_exists().unwrap();
    gateway
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
}

fn at_noon(d: u32) -> NaiveDateTime {
    day(d).and_hms_opt(12, 0, 0).unwrap()
}

fn login(gateway: &StoreGateway, username: &str) -> Session {
    let login = LoginService::new(gateway);
    login.create_user(username, "secret1").unwrap().unwrap();
    login.validate(username, "secret1").unwrap().unwrap()
}

// ---- login ----

#[test]
fn create_and_validate_user() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let service = LoginService::new(&gateway);

    let user = service.create_user("ada", "secret1").unwrap().unwrap();
    assert!(user.is_active);
    assert!(user.last_login_at.is_none());

    let session = service.validate("ada", "secret1").unwrap().unwrap();
    assert_eq!(session.user_id, user.id);
    assert_eq!(session.username, "ada");

    // Username comparison is case-insensitive; password is not.
    assert!(service.validate("ADA", "secret1").unwrap().is_some());
    assert!(service.validate("ada", "SECRET1").unwrap().is_none());
    assert!(service.validate("nobody", "secret1").unwrap().is_none());
}

#[test]
fn rejects_weak_or_duplicate_registrations() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let service = LoginService::new(&gateway);

    assert!(service.create_user("ada", "short").unwrap().is_none());
    assert!(service.create_user("", "secret1").unwrap().is_none());
    assert!(service.create_user("   ", "secret1").unwrap().is_none());

    assert!(service.create_user("ada", "secret1").unwrap().is_some());
    assert!(service.create_user("ada", "different1").unwrap().is_none());
    assert!(service.create_user("Ada", "different1").unwrap().is_none());
    assert!(service.user_exists("ADA").unwrap());
}

#[test]
fn validate_updates_last_login() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let service = LoginService::new(&gateway);
    service.create_user("ada", "secret1").unwrap().unwrap();
    service.validate("ada", "secret1").unwrap().unwrap();

    let conn = gateway.open().unwrap();
    let last_login: Option<String> = conn
        .query_row(
            "SELECT last_login_at FROM users WHERE username = 'ada'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(last_login.is_some());
}

// ---- categories ----

#[test]
fn category_add_trims_and_deduplicates() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let session = login(&gateway, "ada");
    let service = CategoryService::new(&gateway, session.user_id);

    let first = service.add("  Groceries  ").unwrap();
    assert_eq!(first.name, "Groceries");

    let again = service.add("Groceries").unwrap();
    assert_eq!(again.id, first.id);

    assert!(service.add("   ").is_err());

    service.add("Rent").unwrap();
    let names: Vec<String> = service.list().unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Groceries".to_string(), "Rent".to_string()]);
}

#[test]
fn removing_a_category_unlinks_its_transactions() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let session = login(&gateway, "ada");
    let categories = CategoryService::new(&gateway, session.user_id);
    let transactions = TransactionService::new(&gateway, session.user_id);

    let groceries = categories.add("Groceries").unwrap();
    let added = transactions
        .add(NewTransaction {
            amount: Amount(-4.5),
            observations: "bread".to_string(),
            date: at_noon(3),
            category_id: Some(groceries.id),
        })
        .unwrap();

    assert!(categories.remove(groceries.id).unwrap());
    assert!(categories.by_id(groceries.id).unwrap().is_none());

    let all = transactions.all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, added.id);
    assert_eq!(all[0].category_id, None);
}

// ---- transactions ----

#[test]
fn transactions_list_newest_first_and_filter_by_range() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let session = login(&gateway, "ada");
    let service = TransactionService::new(&gateway, session.user_id);

    service
        .add_many(vec![
            NewTransaction {
                amount: Amount(-10.0),
                observations: "first".to_string(),
                date: at_noon(1),
                category_id: None,
            },
            NewTransaction {
                amount: Amount(-20.0),
                observations: "second".to_string(),
                date: at_noon(10),
                category_id: None,
            },
            NewTransaction {
                amount: Amount(500.0),
                observations: "third".to_string(),
                date: at_noon(20),
                category_id: None,
            },
        ])
        .unwrap();

    let all = service.all().unwrap();
    let order: Vec<&str> = all.iter().map(|t| t.observations.as_str()).collect();
    assert_eq!(order, vec!["third", "second", "first"]);

    let mid = service.for_range(DateRange::new(day(5), day(15))).unwrap();
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].observations, "second");

    let one = service.for_date(day(20)).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].observations, "third");

    assert!(service.for_date(day(25)).unwrap().is_empty());
}

#[test]
fn search_combines_filters() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let session = login(&gateway, "ada");
    let categories = CategoryService::new(&gateway, session.user_id);
    let service = TransactionService::new(&gateway, session.user_id);

    let groceries = categories.add("Groceries").unwrap();
    service
        .add_many(vec![
            NewTransaction {
                amount: Amount(-12.5),
                observations: "Weekly shop".to_string(),
                date: at_noon(2),
                category_id: Some(groceries.id),
            },
            NewTransaction {
                amount: Amount(-12.5),
                observations: "cinema".to_string(),
                date: at_noon(3),
                category_id: None,
            },
            NewTransaction {
                amount: Amount(900.0),
                observations: "salary".to_string(),
                date: at_noon(28),
                category_id: None,
            },
        ])
        .unwrap();

    let by_text = service
        .search(&TransactionSearch {
            observations: Some("SHOP".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].observations, "Weekly shop");

    let by_amount = service
        .search(&TransactionSearch {
            amount: Some(Amount(-12.5)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_amount.len(), 2);

    let by_amount_and_category = service
        .search(&TransactionSearch {
            amount: Some(Amount(-12.5)),
            category_id: Some(groceries.id),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_amount_and_category.len(), 1);

    let by_range = service
        .search(&TransactionSearch {
            range: Some(DateRange::new(day(25), day(31))),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(by_range.len(), 1);
    assert_eq!(by_range[0].observations, "salary");

    let everything = service.search(&TransactionSearch::default()).unwrap();
    assert_eq!(everything.len(), 3);
}

#[test]
fn balance_splits_income_and_expenses() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let session = login(&gateway, "ada");
    let service = TransactionService::new(&gateway, session.user_id);

    service
        .add_many(vec![
            NewTransaction {
                amount: Amount(1000.0),
                observations: "salary".to_string(),
                date: at_noon(1),
                category_id: None,
            },
            NewTransaction {
                amount: Amount(-300.0),
                observations: "rent".to_string(),
                date: at_noon(2),
                category_id: None,
            },
            NewTransaction {
                amount: Amount(-50.0),
                observations: "outside the range".to_string(),
                date: day(2)
                    .succ_opt()
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
                category_id: None,
            },
        ])
        .unwrap();

    let balance = service
        .balance_for_range(DateRange::new(day(1), day(2)), Amount(100.0))
        .unwrap();
    assert_eq!(balance.total_income, Amount(1000.0));
    assert_eq!(balance.total_expenses, Amount(-300.0));
    assert_eq!(balance.ending_balance(), Amount(800.0));
}

// ---- ownership scoping ----

#[test]
fn users_only_see_their_own_data() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_at(&dir);
    let ada = login(&gateway, "ada");
    let kay = login(&gateway, "kay");

    let ada_categories = CategoryService::new(&gateway, ada.user_id);
    let kay_categories = CategoryService::new(&gateway, kay.user_id);
    ada_categories.add("Groceries").unwrap();
    // Same name under a different owner is a distinct category.
    let kay_groceries = kay_categories.add("Groceries").unwrap();

    let ada_transactions = TransactionService::new(&gateway, ada.user_id);
    let kay_transactions = TransactionService::new(&gateway, kay.user_id);
    ada_transactions
        .add(NewTransaction {
            amount: Amount(-1.0),
            observations: "ada's".to_string(),
            date: at_noon(1),
            category_id: None,
        })
        .unwrap();

    assert_eq!(ada_transactions.all().unwrap().len(), 1);
    assert!(kay_transactions.all().unwrap().is_empty());

    assert_eq!(ada_categories.list().unwrap().len(), 1);
    assert_eq!(kay_categories.list().unwrap().len(), 1);
    let ada_groceries = ada_categories.by_name("Groceries").unwrap().unwrap();
    assert_ne!(ada_groceries.id, kay_groceries.id);

    // Deleting ada's transaction through kay's scope is a no-op.
    let ada_tx = ada_transactions.all().unwrap()[0].clone();
    assert!(!kay_transactions.remove(ada_tx.id).unwrap());
    assert_eq!(ada_transactions.all().unwrap().len(), 1);
}
