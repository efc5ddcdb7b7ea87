//! Seeds the database with sample events, members and pending
//! registrations for local development and demos.

use clap::Parser;

#[derive(Parser)]
#[command(name = "greenpass-seed", about = "Seed the GreenPass database with sample data")]
struct Args {
    /// Database URL; falls back to DATABASE_URL, then the default file.
    #[arg(long)]
    database_url: Option<String>,

    /// Remove existing members, pending registrations and events first.
    #[arg(long)]
    wipe: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenpass=info".into()),
        )
        .init();

    let args = Args::parse();
    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:greenpass.db?mode=rwc".to_string());

    let pool = greenpass::db::create_pool(&database_url)
        .await
        .expect("failed to create database pool");

    if args.wipe {
        for table in ["members", "pending_members", "events"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&pool)
                .await
                .expect("failed to wipe table");
        }
        tracing::info!("wiped existing data");
    }

    let events = [
        (
            "Annual Tree Plantation 2024",
            "2024-08-15",
            "Green Environmental Society",
            "To increase green cover in the city.",
        ),
        (
            "Beach Cleanup Drive",
            "2024-09-22",
            "Green Environmental Society",
            "To clean and preserve our coastal ecosystems.",
        ),
    ];

    for (name, date, organized_by, purpose) in events {
        sqlx::query(
            "INSERT INTO events (id, name, organized_by, date, purpose) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(name)
        .bind(organized_by)
        .bind(date)
        .bind(purpose)
        .execute(&pool)
        .await
        .expect("failed to seed event");
    }

    let members = [
        ("GES101", "Ahmed Khan", "Zahid Khan", "42201-1234567-1", "Participant"),
        ("GES102", "Fatima Ali", "Ali Raza", "42201-2345678-2", "Volunteer"),
        ("GES103", "Bilal Ahmed", "Mushtaq Ahmed", "42201-3456789-3", "Organizer"),
    ];

    for (id, user_name, father_name, cnic, role) in members {
        sqlx::query(
            "INSERT INTO members (id, user_name, father_name, cnic, event, role, approved) VALUES (?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(id)
        .bind(user_name)
        .bind(father_name)
        .bind(cnic)
        .bind("Annual Tree Plantation 2024")
        .bind(role)
        .execute(&pool)
        .await
        .expect("failed to seed member");
    }

    // Seeded IDs were assigned directly; advance the counter past them so
    // the next approval cannot collide.
    sqlx::query("UPDATE member_id_counter SET next = MAX(next, 104) WHERE id = 1")
        .execute(&pool)
        .await
        .expect("failed to advance counter");

    let pending = [
        ("Sana Javed", "Javed Iqbal", "42201-4567890-4", "Participant"),
        ("Usman Malik", "Malik Shah", "42201-5678901-5", "Volunteer"),
    ];

    for (user_name, father_name, cnic, role) in pending {
        sqlx::query(
            "INSERT INTO pending_members (key, user_name, father_name, cnic, event, role) VALUES (?, ?, ?, ?, '', ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_name)
        .bind(father_name)
        .bind(cnic)
        .bind(role)
        .execute(&pool)
        .await
        .expect("failed to seed pending member");
    }

    tracing::info!(
        "seeded {} events, {} members, {} pending registrations",
        events.len(),
        members.len(),
        pending.len()
    );
}
