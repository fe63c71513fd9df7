use crate::models::fields::*;
use crate::models::{Entity, FieldValue, FormData};

/// How a step's edit buffer is coerced on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
}

/// One field-entry position within a record form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStep {
    pub field: &'static str,
    pub label: &'static str,
    /// Rendered as a marker next to the label. Nothing blocks advancing or
    /// saving with the field empty.
    pub required: bool,
    pub kind: ValueKind,
}

impl FormStep {
    const fn text(field: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            field,
            label,
            required,
            kind: ValueKind::Text,
        }
    }

    const fn number(field: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            field,
            label,
            required,
            kind: ValueKind::Number,
        }
    }

    /// Turn raw buffer text into a committed value. Numbers that are empty,
    /// unparsable or not finite commit as `0`.
    pub fn coerce(&self, buffer: &str) -> FieldValue {
        match self.kind {
            ValueKind::Text => FieldValue::Text(buffer.to_string()),
            ValueKind::Number => FieldValue::Number(
                buffer
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .unwrap_or(0.0),
            ),
        }
    }
}

pub const CUSTOMER_STEPS: &[FormStep] = &[
    FormStep::text(CUSTOMER_NAME, "Name", true),
    FormStep::text(PHONE, "Phone", false),
    FormStep::text(NATIONAL_ID, "National ID", true),
    FormStep::text(EMAIL, "Email", false),
    FormStep::text(ADDRESS, "Address", false),
    FormStep::text(CITY, "City", false),
    FormStep::number(CREDIT_LIMIT, "Credit limit", false),
];

pub const PRODUCT_STEPS: &[FormStep] = &[
    FormStep::text(PRODUCT_CODE, "Code", true),
    FormStep::text(DETAIL, "Detail", true),
    FormStep::text(BARCODE, "Barcode", false),
    FormStep::number(PRICE, "Price", true),
    FormStep::number(COST, "Cost", false),
    FormStep::number(STOCK, "Stock", false),
    FormStep::text(UNIT, "Unit", false),
    FormStep::text(CATEGORY, "Category", false),
];

pub fn steps_for(entity: Entity) -> &'static [FormStep] {
    match entity {
        Entity::Customer => CUSTOMER_STEPS,
        Entity::Product => PRODUCT_STEPS,
    }
}

/// Step sequencing over the form fields held in the session. The controller
/// borrows the three pieces of session state a form owns and every movement
/// between steps goes through [`FormController::move_by`], which commits
/// first.
pub(crate) struct FormController<'a> {
    steps: &'static [FormStep],
    data: &'a mut FormData,
    step: &'a mut usize,
    buffer: &'a mut String,
}

impl<'a> FormController<'a> {
    pub(crate) fn new(
        entity: Entity,
        data: &'a mut FormData,
        step: &'a mut usize,
        buffer: &'a mut String,
    ) -> Self {
        Self {
            steps: steps_for(entity),
            data,
            step,
            buffer,
        }
    }

    fn current(&self) -> &'static FormStep {
        let steps: &'static [FormStep] = self.steps;
        &steps[(*self.step).min(steps.len() - 1)]
    }

    /// Write the buffer into the form data for the current step.
    pub(crate) fn commit_field(&mut self) {
        let step = self.current();
        self.data.insert(step.field, step.coerce(self.buffer.as_str()));
    }

    /// Refill the buffer from the committed value of the current step.
    pub(crate) fn reseed(&mut self) {
        let step = self.current();
        *self.buffer = self
            .data
            .get(step.field)
            .map(|value| value.to_string())
            .unwrap_or_default();
    }

    pub(crate) fn advance(&mut self) {
        self.move_by(1);
    }

    pub(crate) fn retreat(&mut self) {
        self.move_by(-1);
    }

    /// Commit, then move the cursor, clamped to the step range. At either end
    /// the commit still happens and the buffer is reseeded in place.
    fn move_by(&mut self, delta: isize) {
        self.commit_field();
        let last = self.steps.len() as isize - 1;
        *self.step = (*self.step as isize + delta).clamp(0, last) as usize;
        self.reseed();
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    pub(crate) fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }
}
