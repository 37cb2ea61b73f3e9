//! Record store keeping all session records in memory.
//!
//! Every read returns a snapshot of the records at the time of the call. A read that races an
//! append may miss the appended record.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use log::debug;
use vigor_domain as domain;

#[derive(Default)]
pub struct MemoryStore {
    users: Vec<domain::User>,
    session_records: Mutex<BTreeMap<domain::UserID, Vec<domain::SessionRecord>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(users: Vec<domain::User>) -> Self {
        Self {
            users,
            session_records: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn users(&self) -> &[domain::User] {
        &self.users
    }

    fn lock(
        &self,
    ) -> Result<
        MutexGuard<'_, BTreeMap<domain::UserID, Vec<domain::SessionRecord>>>,
        domain::StorageError,
    > {
        self.session_records
            .lock()
            .map_err(|err| domain::StorageError::Other(err.to_string().into()))
    }

    fn check_user(&self, user_id: domain::UserID) -> Result<(), domain::StorageError> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(domain::StorageError::UnknownUser)
        }
    }
}

impl domain::SessionRecordRepository for MemoryStore {
    async fn read_session_records(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::SessionRecord>, domain::ReadError> {
        self.check_user(user_id)?;
        Ok(self.lock()?.get(&user_id).cloned().unwrap_or_default())
    }

    async fn create_session_record(
        &self,
        user_id: domain::UserID,
        session_record: domain::SessionRecord,
    ) -> Result<domain::SessionRecord, domain::CreateError> {
        self.check_user(user_id)?;
        let mut session_records = self.lock()?;
        let user_session_records = session_records.entry(user_id).or_default();
        if user_session_records
            .iter()
            .any(|r| r.date == session_record.date)
        {
            debug!("session record on {} already exists", session_record.date);
            return Err(domain::CreateError::Conflict);
        }
        user_session_records.push(session_record.clone());
        Ok(session_record)
    }
}
