use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::trip::WaterKind;

/// Raw values of the entry form, as typed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TripForm {
    #[serde(rename = "type")]
    pub kind: WaterKind,
    pub size: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub bait: String,
}

impl TripForm {
    /// The size field read as a number; anything unparsable is `NaN`.
    pub fn size_value(&self) -> f64 {
        self.size.trim().parse().unwrap_or(f64::NAN)
    }
}

impl Default for TripForm {
    fn default() -> Self {
        Self {
            kind: WaterKind::Freshwater,
            size: String::new(),
            duration: String::new(),
            bait: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Size,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    open: bool,
    focused: Option<FormField>,
    reopen_at: Option<DateTime<Utc>>,
    draft: TripForm,
}

impl FormState {
    pub fn show(&mut self) {
        self.open = true;
        self.focused = Some(FormField::Size);
    }

    /// Empties the numeric fields and keeps the form off screen until `reopen_at`.
    pub fn hide(&mut self, reopen_at: DateTime<Utc>) {
        self.draft.size.clear();
        self.draft.duration.clear();
        self.open = false;
        self.focused = None;
        self.reopen_at = Some(reopen_at);
    }

    pub fn keep_draft(&mut self, form: TripForm) {
        self.draft = form;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn focused(&self) -> Option<FormField> {
        self.focused
    }

    pub fn is_displayed(&self, now: DateTime<Utc>) -> bool {
        self.open && self.reopen_at.map_or(true, |at| now >= at)
    }

    pub fn draft(&self) -> &TripForm {
        &self.draft
    }
}
