use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spending_tracker::{
    Category, NewBudget, NewExpenditure, NewUser, PASSWORD_HASH_COST, PasswordHash,
    create_expenditure, create_user, initialize_db, replace_budget,
};

/// A utility for creating a test database for the spending tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
///
/// The demo user logs in with the email "test@example.com" and the password "test".
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let user = create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: "test@example.com".to_owned(),
            password_hash: PasswordHash::from_raw_password("test", PASSWORD_HASH_COST)?,
        },
        &conn,
    )?;

    let today = OffsetDateTime::now_utc().date();

    println!("Creating budgets...");

    for (category, amount) in [
        (Category::Food, 300.0),
        (Category::Groceries, 450.0),
        (Category::Entertainment, 100.0),
    ] {
        replace_budget(
            NewBudget {
                user_id: user.id,
                category,
                amount,
                start_date: today - Duration::days(14),
                end_date: today + Duration::days(14),
            },
            &conn,
        )?;
    }

    println!("Creating expenditures...");

    let expenditures = [
        (Category::Food, 18.5, 1, "Corner Cafe", "Lunch", None),
        (Category::Food, 42.0, 3, "Noodle House", "Dinner with friends", None),
        (Category::Groceries, 87.35, 2, "Supermarket", "Weekly shop", None),
        (Category::Groceries, 23.1, 9, "Farmers market", "Fruit and vegetables", None),
        (Category::Clothing, 65.0, 5, "Shoe shop", "Running shoes", None),
        (Category::Entertainment, 24.0, 4, "Cinema", "Movie tickets", None),
        (Category::Travel, 120.0, 20, "Airline", "Return flights", None),
        (
            Category::OnlinePurchase,
            49.99,
            6,
            "Online store",
            "Headphones",
            Some(("9205590164917312751089", "usps")),
        ),
    ];

    for (category, price, days_ago, where_bought, description, tracking) in expenditures {
        create_expenditure(
            NewExpenditure {
                user_id: user.id,
                category,
                price,
                date: today - Duration::days(days_ago),
                where_bought: where_bought.to_owned(),
                description: description.to_owned(),
                tracking_num: tracking.map(|(number, _)| number.to_owned()),
                tracking_num_carrier: tracking.map(|(_, carrier)| carrier.to_owned()),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
