//! Test-only [`Resource`] shared by the unit tests of the crate.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::resource::{Patch, Resource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Note {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Note {
    type Id = u32;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn set_last_modified(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Patch<Note> for NotePatch {
    fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(body) = self.body {
            note.body = body;
        }
    }
}

pub(crate) fn note(id: u32) -> Note {
    Note {
        id,
        title: "groceries".to_owned(),
        body: "milk".to_owned(),
        updated_at: Utc.with_ymd_and_hms(2023, 12, 20, 14, 30, 0).unwrap(),
    }
}
