//! Domain models that mirror the SQLite schema and get passed between the
//! store and the terminal controller. The typed structs stay light-weight data
//! holders; the controller itself only ever sees them through [`Record`] and
//! the field-keyed [`FormData`] map that the step forms edit.

use std::collections::BTreeMap;
use std::fmt;

/// Field names shared by the step sequences, the SQL columns and the typed
/// structs. Keeping them in one place means a renamed column cannot silently
/// drift away from the form that edits it.
pub mod fields {
    pub const CUSTOMER_NAME: &str = "CustomerName";
    pub const PHONE: &str = "Phone";
    pub const NATIONAL_ID: &str = "NationalId";
    pub const EMAIL: &str = "Email";
    pub const ADDRESS: &str = "Address";
    pub const CITY: &str = "City";
    pub const CREDIT_LIMIT: &str = "CreditLimit";

    pub const PRODUCT_CODE: &str = "ProductCode";
    pub const DETAIL: &str = "Detail";
    pub const BARCODE: &str = "Barcode";
    pub const PRICE: &str = "Price";
    pub const COST: &str = "Cost";
    pub const STOCK: &str = "Stock";
    pub const UNIT: &str = "Unit";
    pub const CATEGORY: &str = "Category";
}

use fields::*;

/// The two record tables the application manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Customer,
    Product,
}

impl Entity {
    /// Every entity, in the order the main menu and the stats screen list them.
    pub const ALL: [Entity; 2] = [Entity::Customer, Entity::Product];

    pub fn label(self) -> &'static str {
        match self {
            Entity::Customer => "Customer",
            Entity::Product => "Product",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Entity::Customer => "Customers",
            Entity::Product => "Products",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A committed form value. Numeric steps always hold `Number`, text steps
/// always hold `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Numeric view of the value. Text that does not parse reads as zero, the
    /// same coercion the form applies on commit.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(value) => *value,
            FieldValue::Text(text) => text.trim().parse().unwrap_or(0.0),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Integral numbers print without a fractional part (`42`, not `42.0`),
    /// which is also what gets seeded back into the edit buffer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(value) => write!(f, "{value}"),
        }
    }
}

/// Field name to committed value. Ordered so debug output and tests are
/// deterministic.
pub type FormData = BTreeMap<&'static str, FieldValue>;

fn text_field(data: &FormData, key: &str) -> String {
    data.get(key).map(|value| value.to_string()).unwrap_or_default()
}

fn number_field(data: &FormData, key: &str) -> f64 {
    data.get(key).map(FieldValue::as_number).unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
/// A customer row. `national_id` is the tax/identity number printed on
/// invoices; together with `name` and `phone` it is what the list search looks
/// at.
pub struct Customer {
    /// Primary key from the database.
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub national_id: String,
    pub email: String,
    pub address: String,
    pub city: String,
    /// Maximum outstanding balance allowed for the customer.
    pub credit_limit: f64,
}

impl Customer {
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::new();
        data.insert(CUSTOMER_NAME, FieldValue::Text(self.name.clone()));
        data.insert(PHONE, FieldValue::Text(self.phone.clone()));
        data.insert(NATIONAL_ID, FieldValue::Text(self.national_id.clone()));
        data.insert(EMAIL, FieldValue::Text(self.email.clone()));
        data.insert(ADDRESS, FieldValue::Text(self.address.clone()));
        data.insert(CITY, FieldValue::Text(self.city.clone()));
        data.insert(CREDIT_LIMIT, FieldValue::Number(self.credit_limit));
        data
    }

    /// Build a customer from form data. Absent fields fall back to empty text
    /// or zero so a partially filled form still produces a storable row.
    pub fn from_form_data(id: i64, data: &FormData) -> Self {
        Self {
            id,
            name: text_field(data, CUSTOMER_NAME),
            phone: text_field(data, PHONE),
            national_id: text_field(data, NATIONAL_ID),
            email: text_field(data, EMAIL),
            address: text_field(data, ADDRESS),
            city: text_field(data, CITY),
            credit_limit: number_field(data, CREDIT_LIMIT),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A product row. `code` is the shop's own article code while `barcode` holds
/// the printed EAN/UPC, both searchable from the list view.
pub struct Product {
    pub id: i64,
    pub code: String,
    /// Free-form description shown in the list.
    pub detail: String,
    pub barcode: String,
    pub price: f64,
    pub cost: f64,
    pub stock: f64,
    pub unit: String,
    pub category: String,
}

impl Product {
    pub fn to_form_data(&self) -> FormData {
        let mut data = FormData::new();
        data.insert(PRODUCT_CODE, FieldValue::Text(self.code.clone()));
        data.insert(DETAIL, FieldValue::Text(self.detail.clone()));
        data.insert(BARCODE, FieldValue::Text(self.barcode.clone()));
        data.insert(PRICE, FieldValue::Number(self.price));
        data.insert(COST, FieldValue::Number(self.cost));
        data.insert(STOCK, FieldValue::Number(self.stock));
        data.insert(UNIT, FieldValue::Text(self.unit.clone()));
        data.insert(CATEGORY, FieldValue::Text(self.category.clone()));
        data
    }

    pub fn from_form_data(id: i64, data: &FormData) -> Self {
        Self {
            id,
            code: text_field(data, PRODUCT_CODE),
            detail: text_field(data, DETAIL),
            barcode: text_field(data, BARCODE),
            price: number_field(data, PRICE),
            cost: number_field(data, COST),
            stock: number_field(data, STOCK),
            unit: text_field(data, UNIT),
            category: text_field(data, CATEGORY),
        }
    }
}

/// Either kind of row. The controller works with this enum so list, form and
/// confirmation handling are written once for both tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Customer(Customer),
    Product(Product),
}

impl Record {
    pub fn id(&self) -> i64 {
        match self {
            Record::Customer(customer) => customer.id,
            Record::Product(product) => product.id,
        }
    }

    pub fn entity(&self) -> Entity {
        match self {
            Record::Customer(_) => Entity::Customer,
            Record::Product(_) => Entity::Product,
        }
    }

    pub fn to_form_data(&self) -> FormData {
        match self {
            Record::Customer(customer) => customer.to_form_data(),
            Record::Product(product) => product.to_form_data(),
        }
    }

    pub fn from_form_data(entity: Entity, id: i64, data: &FormData) -> Self {
        match entity {
            Entity::Customer => Record::Customer(Customer::from_form_data(id, data)),
            Entity::Product => Record::Product(Product::from_form_data(id, data)),
        }
    }

    /// The fields the list search matches against: name, phone and national
    /// id for customers; code, detail and barcode for products.
    pub fn search_fields(&self) -> [&str; 3] {
        match self {
            Record::Customer(customer) => [
                customer.name.as_str(),
                customer.phone.as_str(),
                customer.national_id.as_str(),
            ],
            Record::Product(product) => [
                product.code.as_str(),
                product.detail.as_str(),
                product.barcode.as_str(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(FieldValue::Number(42.0).to_string(), "42");
        assert_eq!(FieldValue::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn customer_survives_form_data_conversion() {
        let customer = Customer {
            id: 7,
            name: "Ada Lovelace".into(),
            phone: "555-0101".into(),
            national_id: "AL-1815".into(),
            email: "ada@example.com".into(),
            address: "12 St James's Square".into(),
            city: "London".into(),
            credit_limit: 1500.0,
        };

        let rebuilt = Customer::from_form_data(7, &customer.to_form_data());
        assert_eq!(rebuilt, customer);
    }

    #[test]
    fn missing_product_fields_default_to_empty_and_zero() {
        let mut data = FormData::new();
        data.insert(PRODUCT_CODE, FieldValue::Text("P-1".into()));

        let product = Product::from_form_data(3, &data);
        assert_eq!(product.code, "P-1");
        assert_eq!(product.detail, "");
        assert_eq!(product.price, 0.0);
    }
}
