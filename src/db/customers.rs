use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::Customer;

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, national_id, email, address, city, credit_limit";

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        national_id: row.get(3)?,
        email: row.get(4)?,
        address: row.get(5)?,
        city: row.get(6)?,
        credit_limit: row.get(7)?,
    })
}

/// Every customer in insertion order. The list view indexes into this
/// sequence, so the ordering has to stay stable between two fetches.
pub fn fetch_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"))
        .context("failed to prepare customer query")?;

    let customers = stmt
        .query_map([], customer_from_row)
        .context("failed to load customers")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect customers")?;

    Ok(customers)
}

pub fn fetch_customer(conn: &Connection, id: i64) -> Result<Option<Customer>> {
    conn.query_row(
        &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
        [id],
        customer_from_row,
    )
    .optional()
    .context("failed to load customer")
}

/// Insert a new customer, ignoring `customer.id`, and return the row with its
/// generated key.
pub fn create_customer(conn: &Connection, customer: &Customer) -> Result<Customer> {
    conn.execute(
        "INSERT INTO customers (name, phone, national_id, email, address, city, credit_limit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            customer.name,
            customer.phone,
            customer.national_id,
            customer.email,
            customer.address,
            customer.city,
            customer.credit_limit,
        ],
    )
    .context("failed to insert customer")?;

    Ok(Customer {
        id: conn.last_insert_rowid(),
        ..customer.clone()
    })
}

/// Overwrite every column of the row keyed by `customer.id`. `None` means the
/// row no longer exists.
pub fn update_customer(conn: &Connection, customer: &Customer) -> Result<Option<Customer>> {
    let updated = conn
        .execute(
            "UPDATE customers
             SET name = ?1, phone = ?2, national_id = ?3, email = ?4,
                 address = ?5, city = ?6, credit_limit = ?7
             WHERE id = ?8",
            params![
                customer.name,
                customer.phone,
                customer.national_id,
                customer.email,
                customer.address,
                customer.city,
                customer.credit_limit,
                customer.id,
            ],
        )
        .context("failed to update customer")?;

    Ok((updated > 0).then(|| customer.clone()))
}

pub fn delete_customer(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM customers WHERE id = ?1", params![id])
        .context("failed to delete customer")?;
    Ok(deleted > 0)
}

pub fn count_customers(conn: &Connection) -> Result<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))
        .context("failed to count customers")?;
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn sample(name: &str) -> Customer {
        Customer {
            id: 0,
            name: name.to_string(),
            phone: "555-0100".into(),
            national_id: "X-1".into(),
            email: String::new(),
            address: String::new(),
            city: "Lima".into(),
            credit_limit: 250.0,
        }
    }

    #[test]
    fn create_assigns_ids_in_order() {
        let conn = open_in_memory().unwrap();
        let first = create_customer(&conn, &sample("Ada")).unwrap();
        let second = create_customer(&conn, &sample("Grace")).unwrap();
        assert!(second.id > first.id);

        let names: Vec<String> = fetch_customers(&conn)
            .unwrap()
            .into_iter()
            .map(|customer| customer.name)
            .collect();
        assert_eq!(names, ["Ada", "Grace"]);
        assert_eq!(count_customers(&conn).unwrap(), 2);
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let conn = open_in_memory().unwrap();
        let mut missing = sample("Nobody");
        missing.id = 99;

        assert_eq!(update_customer(&conn, &missing).unwrap(), None);
        assert!(!delete_customer(&conn, 99).unwrap());
        assert_eq!(fetch_customer(&conn, 99).unwrap(), None);
    }

    #[test]
    fn update_overwrites_existing_row() {
        let conn = open_in_memory().unwrap();
        let mut customer = create_customer(&conn, &sample("Ada")).unwrap();
        customer.city = "Paris".into();

        assert!(update_customer(&conn, &customer).unwrap().is_some());
        let stored = fetch_customer(&conn, customer.id).unwrap().unwrap();
        assert_eq!(stored.city, "Paris");
    }
}
