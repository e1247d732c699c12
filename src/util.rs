use std::io;

use chrono::{NaiveDate, Utc};

pub trait IoErrorKindExt {
    fn is_not_found(&self) -> bool;
}

impl IoErrorKindExt for io::ErrorKind {
    fn is_not_found(&self) -> bool {
        matches!(self, io::ErrorKind::NotFound)
    }
}

impl IoErrorKindExt for io::Error {
    fn is_not_found(&self) -> bool {
        self.kind().is_not_found()
    }
}

/// The current calendar day in UTC. Keys the daily wallpaper cache and dates export files.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

macro_rules! hyphenated_uuid {
    ($id:expr) => {
        $id.hyphenated().encode_lower(&mut ::uuid::Uuid::encode_buffer())
    };
}
pub(crate) use hyphenated_uuid;
