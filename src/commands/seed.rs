//! Seed command - Populates a deterministic fixture dataset for one user.
//!
//! Connects directly to the store, replaces every record owned by the
//! named user, and reports per-entity progress so partial failures are
//! visible. A fixture generator for manual testing and demos, not
//! production logic.

use bson::oid::ObjectId;
use bson::{doc, DateTime};
use chrono::{Duration, Utc};

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::domain::{
    bill, card, cibil_score, emi, notification, transaction, user, Bill, Card, CibilScore, Emi,
    NewBill, NewCard, NewCibilScore, NewEmi, NewTransaction, Notification, Transaction, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    tracing::info!(environment = %config.environment, "seeding fixture data");
    let db = Database::connect(&config).await?;

    let users = db.collection::<User>(user::COLLECTION);
    let Some(user) = users.find_one(doc! { "username": &args.username }).await? else {
        return Err(AppError::bad_request(format!(
            "user '{}' not found; sign up through the API first",
            args.username
        )));
    };
    tracing::info!(username = %user.username, id = %user.id, "found user");

    clear_existing(&db, user.id).await?;

    let cards = seed_cards(&db, &user).await?;
    seed_transactions(&db, &user, &cards).await?;
    seed_bills(&db, &user, &cards).await?;
    seed_emis(&db, &user, &cards).await?;
    seed_cibil_score(&db, &user).await?;
    seed_notifications(&db, &user).await?;

    tracing::info!(username = %user.username, "database seeded successfully");
    Ok(())
}

/// Delete every prior record owned by the user, one collection at a time.
async fn clear_existing(db: &Database, user_id: ObjectId) -> AppResult<()> {
    let owner = doc! { "user_id": user_id };

    let collections = [
        card::COLLECTION,
        transaction::COLLECTION,
        bill::COLLECTION,
        emi::COLLECTION,
        cibil_score::COLLECTION,
        notification::COLLECTION,
    ];
    for name in collections {
        let result = db
            .collection::<bson::Document>(name)
            .delete_many(owner.clone())
            .await?;
        tracing::info!(collection = name, deleted = result.deleted_count, "cleared");
    }
    Ok(())
}

/// Three cards with distinct brands, limits, and balances.
async fn seed_cards(db: &Database, user: &User) -> AppResult<Vec<Card>> {
    let holder = user.full_name();
    let fixtures = [
        // (number, month, year, cvv, brand, name, limit, outstanding, due day)
        ("4111111111111111", 12, 2027, "123", "VISA", "HDFC Millennia", 150_000.0, 48_500.0, 5),
        ("5500000000000004", 8, 2026, "456", "MASTERCARD", "SBI Elite", 225_000.0, 12_800.0, 10),
        ("6011000000000004", 3, 2028, "789", "RUPAY", "ICICI Platinum", 100_000.0, 0.0, 15),
    ];

    let mut cards = Vec::with_capacity(fixtures.len());
    for (number, month, year, cvv, brand, name, limit, outstanding, due) in fixtures {
        let mut card = Card::create(NewCard {
            user_id: user.id,
            card_number: number.to_string(),
            card_holder_name: holder.clone(),
            expiry_month: month,
            expiry_year: year,
            cvv: cvv.to_string(),
            card_type: "credit".to_string(),
            card_brand: brand.to_string(),
            card_name: name.to_string(),
            credit_limit: limit,
            due_date: due,
        });
        card.outstanding_balance = outstanding;
        card.available_credit = limit - outstanding;
        cards.push(card);
    }

    db.collection::<Card>(card::COLLECTION)
        .insert_many(&cards)
        .await?;
    for card in &cards {
        tracing::info!(card = %card.card_name, limit = card.credit_limit, "created card");
    }
    Ok(cards)
}

/// Ten transactions against rotating cards with descending dates.
async fn seed_transactions(db: &Database, user: &User, cards: &[Card]) -> AppResult<()> {
    let merchants = [
        ("Amazon", "online_shopping", 3499.0),
        ("Zomato", "restaurants", 899.0),
        ("BigBasket", "groceries", 2599.0),
        ("Netflix", "subscriptions", 499.0),
        ("Flipkart", "online_shopping", 1299.0),
        ("Swiggy", "restaurants", 650.0),
        ("Uber", "transportation", 350.0),
        ("BookMyShow", "entertainment", 800.0),
        ("DMart", "groceries", 1850.0),
        ("Starbucks", "restaurants", 425.0),
    ];

    let mut transactions = Vec::with_capacity(merchants.len());
    for (i, (merchant, category, amount)) in merchants.into_iter().enumerate() {
        let card = &cards[i % cards.len()];
        let mut tx = Transaction::create(NewTransaction {
            user_id: user.id,
            card_id: card.id,
            transaction_id: format!("TXN{}", 100_000 + i),
            merchant_name: merchant.to_string(),
            merchant_category: category.to_string(),
            amount,
            description: Some(format!("Purchase at {merchant}")),
            transaction_type: "debit".to_string(),
            location: Some("Bangalore, IN".to_string()),
        });
        tx.transaction_date = DateTime::from_chrono(Utc::now() - Duration::days(i as i64 * 2));
        transactions.push(tx);
    }

    db.collection::<Transaction>(transaction::COLLECTION)
        .insert_many(&transactions)
        .await?;
    for tx in &transactions {
        tracing::info!(merchant = %tx.merchant_name, amount = tx.amount, "created transaction");
    }
    Ok(())
}

/// Four recurring monthly bills due over the next days.
async fn seed_bills(db: &Database, user: &User, cards: &[Card]) -> AppResult<()> {
    let fixtures = [
        ("Electricity", "utilities", "utility", 4500.0, 5),
        ("Internet - Airtel", "utilities", "internet", 999.0, 3),
        ("Mobile - Jio", "utilities", "mobile", 399.0, 7),
        ("Water Bill", "utilities", "utility", 850.0, 10),
    ];

    let mut bills = Vec::with_capacity(fixtures.len());
    for (i, (biller, category, bill_type, amount, due_days)) in fixtures.into_iter().enumerate() {
        bills.push(Bill::create(NewBill {
            user_id: user.id,
            card_id: cards[0].id,
            bill_id: format!("BILL{}", 100_000 + i),
            biller_name: biller.to_string(),
            biller_category: category.to_string(),
            bill_type: bill_type.to_string(),
            amount,
            due_date: DateTime::from_chrono(Utc::now() + Duration::days(due_days)),
            bill_number: Some(format!("BN{}", 100_000 + due_days)),
            is_recurring: true,
            recurring_frequency: Some("monthly".to_string()),
        }));
    }

    db.collection::<Bill>(bill::COLLECTION)
        .insert_many(&bills)
        .await?;
    for bill in &bills {
        tracing::info!(biller = %bill.biller_name, amount = bill.amount, "created bill");
    }
    Ok(())
}

/// Two active EMIs with partial payment progress.
async fn seed_emis(db: &Database, user: &User, cards: &[Card]) -> AppResult<()> {
    let fixtures = [
        // (card idx, emi id, principal, rate, tenure, days ago, description, merchant, product, paid)
        (0, "EMI10001", 24_000.0, 12.5, 12, 180, "iPhone 15 Pro", "Apple Store", "iPhone 15 Pro 256GB", 12_000.0),
        (1, "EMI10002", 15_000.0, 10.0, 6, 90, "Sony Headphones WH-1000XM5", "Croma", "Sony WH-1000XM5", 7_500.0),
    ];

    let mut emis = Vec::with_capacity(fixtures.len());
    for (card_idx, emi_id, principal, rate, tenure, days_ago, description, merchant, product, paid) in
        fixtures
    {
        let mut loan = Emi::create(NewEmi {
            user_id: user.id,
            card_id: cards[card_idx].id,
            emi_id: emi_id.to_string(),
            principal_amount: principal,
            interest_rate: rate,
            tenure_months: tenure,
            start_date: DateTime::from_chrono(Utc::now() - Duration::days(days_ago)),
            description: Some(description.to_string()),
            merchant_name: Some(merchant.to_string()),
            product_name: Some(product.to_string()),
        });
        // Fixture progress mirrors the demo dataset rather than the
        // derived schedule.
        loan.total_paid = paid;
        loan.remaining_amount = paid;
        emis.push(loan);
    }

    db.collection::<Emi>(emi::COLLECTION)
        .insert_many(&emis)
        .await?;
    for loan in &emis {
        tracing::info!(
            emi = %loan.emi_id,
            monthly = loan.emi_amount,
            tenure = loan.tenure_months,
            "created EMI"
        );
    }
    Ok(())
}

/// One composite credit-score record.
async fn seed_cibil_score(db: &Database, user: &User) -> AppResult<()> {
    let mut score = CibilScore::create(NewCibilScore {
        user_id: user.id,
        score: 745,
        score_date: DateTime::now(),
        score_type: "cibil".to_string(),
        payment_history_score: 85,
        credit_utilization_score: 75,
        credit_age_score: 70,
        credit_mix_score: 80,
        new_credit_score: 65,
    });
    score.total_accounts = 5;
    score.active_accounts = 3;
    score.closed_accounts = 2;
    score.total_credit_limit = 475_000.0;
    score.total_outstanding = 61_300.0;

    db.collection::<CibilScore>(cibil_score::COLLECTION)
        .insert_one(&score)
        .await?;
    tracing::info!(score = score.score, "created CIBIL score");
    Ok(())
}

/// Five notifications with mixed read state.
async fn seed_notifications(db: &Database, user: &User) -> AppResult<()> {
    let fixtures = [
        ("Bill Due Soon", "Your electricity bill of ₹4,500 is due in 5 days", "bill", "high", false),
        ("Payment Successful", "Payment of ₹899 to Zomato was successful", "transaction", "medium", true),
        ("New Offer", "10% cashback on groceries this weekend!", "promotional", "low", false),
        ("EMI Due", "Your iPhone EMI of ₹2,150 is due on 20th Oct", "emi", "high", false),
        ("CIBIL Score Updated", "Your CIBIL score has been updated to 745", "system", "medium", true),
    ];

    let mut notifications = Vec::with_capacity(fixtures.len());
    for (title, message, notification_type, priority, is_read) in fixtures {
        let mut n = Notification::create(user.id, title, message, notification_type, priority);
        if is_read {
            n.mark_as_read();
        }
        notifications.push(n);
    }

    db.collection::<Notification>(notification::COLLECTION)
        .insert_many(&notifications)
        .await?;
    for n in &notifications {
        tracing::info!(title = %n.title, read = n.is_read, "created notification");
    }
    Ok(())
}
