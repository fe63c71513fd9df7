use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, code, detail, barcode, price, cost, stock, unit, category";

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        code: row.get(1)?,
        detail: row.get(2)?,
        barcode: row.get(3)?,
        price: row.get(4)?,
        cost: row.get(5)?,
        stock: row.get(6)?,
        unit: row.get(7)?,
        category: row.get(8)?,
    })
}

/// Every product in insertion order, matching the customer query.
pub fn fetch_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
        .context("failed to prepare product query")?;

    let products = stmt
        .query_map([], product_from_row)
        .context("failed to load products")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect products")?;

    Ok(products)
}

pub fn fetch_product(conn: &Connection, id: i64) -> Result<Option<Product>> {
    conn.query_row(
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        [id],
        product_from_row,
    )
    .optional()
    .context("failed to load product")
}

pub fn create_product(conn: &Connection, product: &Product) -> Result<Product> {
    conn.execute(
        "INSERT INTO products (code, detail, barcode, price, cost, stock, unit, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            product.code,
            product.detail,
            product.barcode,
            product.price,
            product.cost,
            product.stock,
            product.unit,
            product.category,
        ],
    )
    .context("failed to insert product")?;

    Ok(Product {
        id: conn.last_insert_rowid(),
        ..product.clone()
    })
}

pub fn update_product(conn: &Connection, product: &Product) -> Result<Option<Product>> {
    let updated = conn
        .execute(
            "UPDATE products
             SET code = ?1, detail = ?2, barcode = ?3, price = ?4, cost = ?5,
                 stock = ?6, unit = ?7, category = ?8
             WHERE id = ?9",
            params![
                product.code,
                product.detail,
                product.barcode,
                product.price,
                product.cost,
                product.stock,
                product.unit,
                product.category,
                product.id,
            ],
        )
        .context("failed to update product")?;

    Ok((updated > 0).then(|| product.clone()))
}

pub fn delete_product(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id])
        .context("failed to delete product")?;
    Ok(deleted > 0)
}

pub fn count_products(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .context("failed to count products")?;
    Ok(count as usize)
}
