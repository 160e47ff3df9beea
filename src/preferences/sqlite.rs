use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::models::preference::{NewPreference, Preference};
use crate::preferences::PreferenceStore;
use crate::preferences::errors::PreferenceResult;

/// Diesel implementation of [`PreferenceStore`] backed by SQLite.
#[derive(Clone)]
pub struct DieselPreferenceStore {
    pool: DbPool,
}

impl DieselPreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PreferenceStore for DieselPreferenceStore {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        use crate::schema::preferences;

        let mut conn = self.pool.get()?;
        let stored = preferences::table
            .find(key)
            .select(Preference::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(stored.map(|preference| preference.value))
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        use crate::schema::preferences;

        let mut conn = self.pool.get()?;
        let record = NewPreference {
            key,
            value,
            updated_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(preferences::table)
            .values(&record)
            .on_conflict(preferences::key)
            .do_update()
            .set(&record)
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        use crate::schema::preferences;

        let mut conn = self.pool.get()?;
        diesel::delete(preferences::table.find(key)).execute(&mut conn)?;

        Ok(())
    }
}
