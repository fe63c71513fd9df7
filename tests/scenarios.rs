//! End-to-end keystroke scenarios against an in-memory store. No terminal is
//! involved: keys go straight into the controller and frames are painted into
//! a `TestBackend`.

use std::time::{Duration, Instant};

use ratatui::backend::TestBackend;
use ratatui::Terminal;
use records_tui::models::{fields, Customer, FieldValue, Product};
use records_tui::ui::{decode, draw, Choice, PendingAction};
use records_tui::{
    Controller, Entity, LogicalKey, MemoryStore, Outcome, Record, Store, Timing, View,
};

fn seeded_store() -> MemoryStore {
    MemoryStore::with_records(vec![
        Record::Customer(Customer {
            id: 1,
            name: "Grace Hopper".into(),
            phone: "555-0199".into(),
            national_id: "GH-1906".into(),
            email: "grace@example.com".into(),
            address: "1 Navy Yard".into(),
            city: "Arlington".into(),
            credit_limit: 900.0,
        }),
        Record::Product(Product {
            id: 2,
            code: "TEA-01".into(),
            detail: "Green tea 100g".into(),
            barcode: "4006381333931".into(),
            price: 4.5,
            cost: 2.0,
            stock: 30.0,
            unit: "box".into(),
            category: "Drinks".into(),
        }),
    ])
}

fn feed(controller: &mut Controller<MemoryStore>, bytes: &[&[u8]]) {
    for raw in bytes {
        controller.handle_key(decode(raw));
    }
}

fn type_text(controller: &mut Controller<MemoryStore>, text: &str) {
    for ch in text.chars() {
        controller.handle_key(LogicalKey::Printable(ch));
    }
}

fn render(controller: &Controller<MemoryStore>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| draw(frame, controller.state())).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(3600)
}

#[test]
fn new_customer_is_created_after_confirmation() {
    let mut controller = Controller::new(MemoryStore::new(), Timing::default());

    // Enter, then Ctrl+N, as raw terminal bytes.
    feed(&mut controller, &[b"\r", b"\x0e"]);
    assert_eq!(controller.state().view, View::CustomerForm);
    assert_eq!(controller.state().editing_id, None);

    type_text(&mut controller, "Ada");
    for _ in 0..4 {
        controller.handle_key(LogicalKey::Enter);
    }
    assert_eq!(controller.state().form_step, 4);
    assert_eq!(
        controller.state().form_data.get(fields::CUSTOMER_NAME),
        Some(&FieldValue::Text("Ada".into()))
    );

    controller.handle_key(LogicalKey::CtrlS);
    assert_eq!(controller.state().view, View::ConfirmAction);
    assert_eq!(controller.state().confirm_action, PendingAction::Save);
    assert_eq!(controller.state().confirm_index, Choice::Yes);

    controller.handle_key(LogicalKey::Enter);
    assert_eq!(controller.state().view, View::Message);
    assert_eq!(controller.store().count(Entity::Customer).unwrap(), 1);
    assert!(render(&controller).contains("Customer #1 created."));

    assert_eq!(controller.tick(far_future()), Outcome::Repaint);
    assert_eq!(controller.state().view, View::CustomerList);
    assert_eq!(controller.state().records.len(), 1);
    assert!(render(&controller).contains("Ada"));
}

#[test]
fn search_without_matches_shows_empty_indicator() {
    let mut controller = Controller::new(seeded_store(), Timing::default());
    feed(&mut controller, &[b"\x1b[B", b"\r"]);
    assert_eq!(controller.state().view, View::ProductList);

    type_text(&mut controller, "zzz999");
    assert!(controller.state().is_searching);
    assert!(controller.state().filtered_records().is_empty());
    assert_eq!(controller.state().selected_index, 0);

    let screen = render(&controller);
    assert!(screen.contains("No matching records."));
    assert!(!screen.contains("TEA-01"));
}

#[test]
fn escaping_an_edit_does_not_save() {
    let mut controller = Controller::new(seeded_store(), Timing::default());
    controller.handle_key(LogicalKey::Enter);
    controller.handle_key(LogicalKey::Enter);
    assert_eq!(controller.state().view, View::CustomerForm);
    assert_eq!(controller.state().editing_id, Some(1));
    assert_eq!(controller.state().input_buffer, "Grace Hopper");

    controller.handle_key(LogicalKey::Backspace);
    type_text(&mut controller, "y B.");
    controller.handle_key(LogicalKey::Tab);
    controller.handle_key(LogicalKey::Escape);

    assert_eq!(controller.state().view, View::CustomerList);
    let stored = controller.store().get(Entity::Customer, 1).unwrap().unwrap();
    assert_eq!(stored.search_fields()[0], "Grace Hopper");
}

#[test]
fn deleting_needs_explicit_yes() {
    let mut controller = Controller::new(seeded_store(), Timing::default());
    controller.handle_key(LogicalKey::Down);
    controller.handle_key(LogicalKey::Enter);
    controller.handle_key(LogicalKey::Enter);
    assert_eq!(controller.state().view, View::ProductForm);

    controller.handle_key(LogicalKey::CtrlD);
    assert_eq!(controller.state().confirm_index, Choice::No);
    assert!(render(&controller).contains("Delete product #2?"));

    controller.handle_key(LogicalKey::Enter);
    assert_eq!(controller.state().view, View::ProductForm);
    assert_eq!(controller.store().count(Entity::Product).unwrap(), 1);

    controller.handle_key(LogicalKey::CtrlD);
    controller.handle_key(LogicalKey::Right);
    controller.handle_key(LogicalKey::Enter);
    assert_eq!(controller.store().count(Entity::Product).unwrap(), 0);

    controller.tick(far_future());
    assert_eq!(controller.state().view, View::ProductList);
    assert!(controller.state().records.is_empty());
}

#[test]
fn rejected_write_reports_failure_and_keeps_data() {
    let mut store = seeded_store();
    store.reject_writes = true;
    let mut controller = Controller::new(store, Timing::default());

    controller.handle_key(LogicalKey::Enter);
    controller.handle_key(LogicalKey::CtrlN);
    type_text(&mut controller, "Linus");
    controller.handle_key(LogicalKey::CtrlS);
    controller.handle_key(LogicalKey::Enter);

    assert_eq!(controller.state().view, View::Message);
    assert!(render(&controller).contains("Save failed"));
    assert_eq!(controller.store().count(Entity::Customer).unwrap(), 1);
}

#[test]
fn stats_screen_returns_to_main_on_its_own() {
    let mut controller = Controller::new(seeded_store(), Timing::default());
    feed(&mut controller, &[b"\x1b[B", b"\x1b[B", b"\r"]);
    assert_eq!(controller.state().view, View::Stats);
    assert_eq!(controller.tick(Instant::now()), Outcome::Ignored);

    controller.tick(far_future());
    assert_eq!(controller.state().view, View::Main);
    assert_eq!(controller.state().selected_index, 2);
    assert_eq!(controller.handle_key(LogicalKey::CtrlC), Outcome::Quit);
}
