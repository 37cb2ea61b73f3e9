use log::{debug, error};

use crate::{
    CreateError, ReadError, ScoreService, ScoringConfig, SessionRecord, SessionRecordRepository,
    SessionRecordService, UserID,
};

pub struct Service<R> {
    repository: R,
    config: ScoringConfig,
}

impl<R> Service<R>
where
    R: SessionRecordRepository,
{
    pub fn new(repository: R, config: ScoringConfig) -> Self {
        Self { repository, config }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SessionRecordRepository> SessionRecordService for Service<R> {
    async fn get_session_records(&self, user_id: UserID) -> Result<Vec<SessionRecord>, ReadError> {
        log_on_error!(
            self.repository.read_session_records(user_id),
            ReadError,
            "get",
            "session records"
        )
    }

    async fn create_session_record(
        &self,
        user_id: UserID,
        session_record: SessionRecord,
    ) -> Result<SessionRecord, CreateError> {
        log_on_error!(
            self.repository
                .create_session_record(user_id, session_record),
            CreateError,
            "create",
            "session record"
        )
    }
}

impl<R: SessionRecordRepository> ScoreService for Service<R> {
    fn scoring_config(&self) -> &ScoringConfig {
        &self.config
    }
}
