//! Ingestion pipeline: decode, stamp, attribute, persist.
//!
//! A document that fails to decode is reported to the caller and leaves no
//! trace in storage. The record and its language rows are written in one
//! storage call, so a record is never stored without its languages.

use tracing::{debug, info};
use yorc_common::{NewUsageRecord, RecordId};
use yorc_store::{OwnerResolver, Storage};

use crate::error::Result;
use crate::schema;
use crate::service::UsageService;
use crate::session::{Clock, SessionContext};

impl<S, R, C> UsageService<S, R, C>
where
    S: Storage,
    R: OwnerResolver,
    C: Clock,
{
    /// Ingest one submitted configuration document.
    ///
    /// The creation date comes from the service clock, never from the
    /// document. An anonymous session ingests with no owner.
    pub fn ingest(&self, raw: &str, session: &dyn SessionContext) -> Result<RecordId> {
        debug!(bytes = raw.len(), "Request to ingest generator configuration");
        let options = schema::decode_document(raw)?;

        let login = session.current_login();
        let owner = self.owners.find_or_create_owner(login.as_deref())?;
        let record = NewUsageRecord::new(options, self.clock.now()).owned_by(owner.map(|o| o.id));

        let id = self.save(&record)?;
        info!(
            %id,
            client_framework = %record.options.client_framework,
            languages = record.options.selected_languages.len(),
            "ingested usage record"
        );
        Ok(id)
    }

    /// Save a usage record as given.
    pub fn save(&self, record: &NewUsageRecord) -> Result<RecordId> {
        debug!(created = %record.creation_date, "Request to save usage record");
        Ok(self.storage.insert_record(record)?)
    }
}
