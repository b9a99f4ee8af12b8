use swiss_persistence_sqlite::{create_db_pool, create_schema};

fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("SWISS_DB").expect("SWISS_DB env var not set");
    let parent = std::path::Path::new(&db_path)
        .parent()
        .expect("Failed to get parent directory of DB path");
    if !parent.as_os_str().is_empty() && !parent.exists() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory for DB");
        println!("Created parent directory for DB at {}", parent.display());
    }

    if std::path::Path::new(&db_path).exists() {
        std::fs::remove_file(&db_path).expect("Failed to remove existing DB");
        println!("Removed existing DB at {}", db_path);
    }

    let pool = create_db_pool(&db_path).expect("Failed to create DB pool");
    create_schema(&pool).expect("Failed to create tables");

    println!("Created new tournament DB at {}", db_path);
}
