use crate::models::Record;

/// Case-insensitive substring match against the record's searchable fields.
/// An empty filter matches everything.
pub fn matches(record: &Record, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records passing `filter`, in store order. Runs over the full set
/// on every call; there is no incremental index.
pub fn filter_records<'a>(records: &'a [Record], filter: &str) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| matches(record, filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Product};

    fn customer(id: i64, name: &str, phone: &str, national_id: &str) -> Record {
        Record::Customer(Customer {
            id,
            name: name.into(),
            phone: phone.into(),
            national_id: national_id.into(),
            email: "ignored@example.com".into(),
            address: String::new(),
            city: "Quito".into(),
            credit_limit: 0.0,
        })
    }

    fn product(id: i64, code: &str, detail: &str, barcode: &str) -> Record {
        Record::Product(Product {
            id,
            code: code.into(),
            detail: detail.into(),
            barcode: barcode.into(),
            price: 1.0,
            cost: 0.5,
            stock: 3.0,
            unit: "unit".into(),
            category: "Tea".into(),
        })
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let records = vec![
            customer(1, "Ada", "1", "A"),
            customer(2, "Grace", "2", "B"),
            customer(3, "Alan", "3", "C"),
        ];
        let ids: Vec<i64> = filter_records(&records, "").iter().map(|r| r.id()).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn matching_ignores_case() {
        let record = customer(1, "Ada Lovelace", "555", "X");
        assert!(matches(&record, "LOVE"));
        assert!(matches(&record, "ada"));
    }

    #[test]
    fn only_searchable_fields_participate() {
        let record = customer(1, "Ada", "555-0100", "NID-9");
        assert!(matches(&record, "0100"));
        assert!(matches(&record, "nid"));
        assert!(!matches(&record, "quito"));
        assert!(!matches(&record, "example"));

        let item = product(2, "A-100", "Green tea", "7501");
        assert!(matches(&item, "green"));
        assert!(matches(&item, "750"));
        assert!(!matches(&item, "tea bag"));
    }

    #[test]
    fn no_matches_yields_empty_result() {
        let records = vec![product(1, "A-1", "Oolong", "123")];
        assert!(filter_records(&records, "zzz999").is_empty());
    }
}
