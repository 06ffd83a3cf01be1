use tracing::debug;

use crate::transport::{FormParams, Page};

use super::{TwilioClient, TwilioError};

/// Forward-only cursor over a paginated collection.
///
/// Pages are fetched lazily: a request is issued only when the buffered records are used up.
/// The sequence ends at the first empty page, or after the records of a page that carries no
/// `next_page_uri`. Once it has ended no further requests are made.
///
/// A failed fetch leaves the cursor untouched, so calling [`ListIter::next`] again retries the
/// same page.
pub struct ListIter<'a, P: Page> {
    client: &'a TwilioClient,
    resource_path: String,
    params: FormParams,
    records: std::vec::IntoIter<P::Item>,
    finished: bool,
}

impl<'a, P: Page> ListIter<'a, P> {
    pub(super) fn new(client: &'a TwilioClient, resource_path: String, params: FormParams) -> Self {
        Self {
            client,
            resource_path,
            params,
            records: Vec::new().into_iter(),
            finished: false,
        }
    }

    /// Next record, or `None` once the collection is exhausted.
    pub async fn next(&mut self) -> Result<Option<P::Item>, TwilioError> {
        if let Some(record) = self.records.next() {
            return Ok(Some(record));
        }
        if self.finished {
            return Ok(None);
        }

        self.fetch().await?;
        Ok(self.records.next())
    }

    /// Query parameters the next fetch will use.
    pub fn cursor(&self) -> &[(String, String)] {
        &self.params
    }

    /// Drain the remaining records into a `Vec`.
    pub async fn collect_all(mut self) -> Result<Vec<P::Item>, TwilioError> {
        let mut all = Vec::new();
        while let Some(record) = self.next().await? {
            all.push(record);
        }
        Ok(all)
    }

    async fn fetch(&mut self) -> Result<(), TwilioError> {
        let page: P = self
            .client
            .fetch_page(&self.resource_path, &self.params)
            .await?;
        let (records, next_page_uri) = page.into_parts();

        let next_params = match next_page_uri.as_deref().map(str::trim) {
            Some(uri) if !uri.is_empty() => Some(self.client.next_page_params(uri)?),
            _ => None,
        };

        debug!(
            resource = %self.resource_path,
            records = records.len(),
            has_next = next_params.is_some(),
            "fetched page"
        );

        if records.is_empty() {
            self.finished = true;
        }
        match next_params {
            Some(params) => self.params = params,
            None => self.finished = true,
        }
        self.records = records.into_iter();
        Ok(())
    }
}
