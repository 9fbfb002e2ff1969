//! Back-office console: seeds a demo store and walks the operations and
//! stock screens through a load/filter/paginate cycle.

use anyhow::Context;
use chrono::{DateTime, Duration, Local};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use bistro_core::PredefinedPeriod;
use bistro_infra::{SqliteOperationSource, SqliteStockSource, init_schema};
use bistro_operations::{Operation, OperationKind, TreasuryTotals};
use bistro_screens::{operations_screen, stock_screen};
use bistro_stock::{StockCategory, StockItem, StockUnit};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bistro_observability::init();

    let db_url = std::env::var("BISTRO_DATABASE_URL").unwrap_or_else(|_| {
        tracing::warn!("BISTRO_DATABASE_URL not set; using in-memory sqlite");
        "sqlite::memory:".to_string()
    });

    // One connection: with the in-memory default, every pooled connection
    // would otherwise see its own empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;
    init_schema(&pool).await.context("failed to init schema")?;

    let now = Local::now();
    seed_demo(&pool, &now).await.context("failed to seed demo data")?;

    show_operations(&pool, &now).await?;
    show_stock(&pool, &now).await?;

    Ok(())
}

async fn show_operations(pool: &SqlitePool, now: &DateTime<Local>) -> anyhow::Result<()> {
    let source = SqliteOperationSource::new(pool.clone());
    let mut screen = operations_screen(now);

    screen.set_predefined_period(PredefinedPeriod::LastSevenDays, now);
    screen.refresh(&source, &Local).await;
    if let Some(error) = screen.last_error() {
        tracing::error!(%error, "operations load failed; retry with the same range");
        return Ok(());
    }
    screen
        .refresh_category_options(&source)
        .await
        .context("failed to load category options")?;

    let totals = TreasuryTotals::from_operations(screen.filtered());
    println!("== operations: {} ==", PredefinedPeriod::LastSevenDays.label());
    println!(
        "{} operations over {} days | entrees {} | sorties {} | balance {}",
        totals.operation_count,
        screen.days_loaded(),
        format_cents(totals.entrees_cents),
        format_cents(totals.sorties_cents),
        format_cents(totals.balance_cents()),
    );

    print_operation_page(&screen);

    screen.set_category(Some(OperationKind::Sortie));
    screen.set_search_term("fournisseur");
    println!("-- filtered: sorties, motif contains \"fournisseur\" --");
    print_operation_page(&screen);

    Ok(())
}

fn print_operation_page(screen: &bistro_screens::OperationsScreen) {
    let view = screen.page_view();
    println!(
        "page {}/{} ({} records)",
        view.page, view.total_pages, view.total_records
    );
    for op in &view.records {
        println!(
            "  {}  {:8}  {:>12}  {}",
            op.occurred_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            op.kind.label(),
            format_cents(op.signed_amount_cents()),
            op.motif,
        );
    }
    if view.records.is_empty() {
        println!("  (no records found)");
    }
}

async fn show_stock(pool: &SqlitePool, now: &DateTime<Local>) -> anyhow::Result<()> {
    let source = SqliteStockSource::new(pool.clone());
    let mut screen = stock_screen(now);

    screen.set_predefined_period(PredefinedPeriod::LastSevenDays, now);
    screen.refresh(&source, &Local).await;
    if let Some(error) = screen.last_error() {
        tracing::error!(%error, "stock load failed; retry with the same range");
        return Ok(());
    }

    println!("== stock ==");
    let view = screen.page_view();
    for item in &view.records {
        let flag = if item.is_depleted() { "  [epuise]" } else { "" };
        println!(
            "  {:16} {:12} {:>6} {}{}",
            item.denomination,
            item.category.label(),
            item.quantity,
            item.unit.abbrev(),
            flag,
        );
    }

    Ok(())
}

async fn seed_demo(pool: &SqlitePool, now: &DateTime<Local>) -> anyhow::Result<()> {
    let operations = SqliteOperationSource::new(pool.clone());
    let stock = SqliteStockSource::new(pool.clone());

    let motifs_in = ["service midi", "service soir", "vente comptoir"];
    let motifs_out = ["achat fournisseur", "retrait caisse"];

    for days_back in 0..7i64 {
        let day = *now - Duration::days(days_back);
        for (i, motif) in motifs_in.iter().enumerate() {
            let at = day - Duration::hours(2 * i as i64 + 1);
            let op = Operation::new(
                OperationKind::Entree,
                4_500 + 700 * days_back + 120 * i as i64,
                *motif,
                at.with_timezone(&chrono::Utc),
            )?;
            operations.insert(&op, &Local).await?;
        }
        for (i, motif) in motifs_out.iter().enumerate() {
            let at = day - Duration::hours(3 * i as i64 + 2);
            let op = Operation::new(
                OperationKind::Sortie,
                2_100 + 450 * days_back + 90 * i as i64,
                *motif,
                at.with_timezone(&chrono::Utc),
            )?;
            operations.insert(&op, &Local).await?;
        }
    }

    let items = [
        ("limonade", StockCategory::Beverage, 24, StockUnit::Litre),
        ("vin rouge", StockCategory::Beverage, 18, StockUnit::Litre),
        ("farine", StockCategory::Ingredient, 40, StockUnit::Kilogram),
        ("beurre", StockCategory::Ingredient, 0, StockUnit::Kilogram),
        ("serviettes", StockCategory::Consumable, 600, StockUnit::Piece),
    ];
    for (denomination, category, quantity, unit) in items {
        let item = StockItem {
            id: bistro_core::RecordId::new(),
            denomination: denomination.to_string(),
            category,
            quantity,
            unit,
            updated_at: now.with_timezone(&chrono::Utc),
        };
        stock.insert(&item, &Local).await?;
    }

    tracing::info!("seeded demo data over the last 7 days");
    Ok(())
}

fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02} EUR", abs / 100, abs % 100)
}
