use crate::browser::{Element, Session};
use crate::config::HarvestConfig;
use crate::results::{BusinessRecord, Field};
use crate::text;

/// Reads the fixed field set from an open detail panel.
///
/// Each field is looked up on its own and resolves to a value or to
/// nothing; a missing field never affects the others.
pub struct DetailExtractor<'a, S: Session> {
    session: &'a S,
    config: &'a HarvestConfig,
}

impl<'a, S: Session> DetailExtractor<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig) -> Self {
        Self { session, config }
    }

    /// Builds the record for the open panel.
    ///
    /// `row_name` is the name read from the list row, if any; the detail
    /// heading is only consulted when it is missing.
    pub async fn extract(&self, row_name: Option<String>) -> BusinessRecord {
        let name = match row_name {
            Some(name) => Some(name),
            None => self.heading().await,
        };
        let mut record = BusinessRecord::new(name);

        for field in Field::ALL {
            let value = self.lookup(field).await;
            match &value {
                Some(v) => ::log::debug!("Found {}: {}", field.key(), v),
                None => ::log::debug!("No {} found", field.key()),
            }
            record.set(field, value);
        }

        record
    }

    /// One bounded wait for the detail heading
    async fn heading(&self) -> Option<String> {
        let locator = &self.config.selectors.detail_title;
        match self
            .session
            .wait_for(locator, self.config.timing.name_wait())
            .await
        {
            Ok(element) => element.text().await.ok().and_then(|t| text::clean(&t)),
            Err(e) => {
                ::log::debug!("Detail heading unavailable: {}", e);
                None
            }
        }
    }

    /// Direct read of one field, without waiting
    pub async fn lookup(&self, field: Field) -> Option<String> {
        let locator = self.config.selectors.field(field);
        let element = match self.session.find(locator).await {
            Ok(element) => element,
            Err(e) => {
                ::log::trace!("{} lookup failed: {}", field.key(), e);
                return None;
            }
        };

        let raw = match field.attribute() {
            Some(attribute) => element.attr(attribute).await.ok().flatten(),
            None => element.text().await.ok(),
        };
        raw.as_deref().and_then(text::clean)
    }
}
