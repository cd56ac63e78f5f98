use std::collections::BTreeMap;

use log::{debug, info};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::snapshot::{Appointment, AppointmentId, Day, Interviewer, InterviewerId, Snapshot};

/// Fetches the three bootstrap collections and combines them into a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    client: Client,
    api_url: Url,
}

impl SnapshotLoader {
    pub fn new(api_url: Url) -> Self {
        SnapshotLoader {
            client: Client::new(),
            api_url,
        }
    }

    /// Loads days, appointments and interviewers in parallel.
    ///
    /// Succeeds only if all three reads succeed. The first failure is
    /// returned; the other requests keep running on their own tasks and
    /// their results are discarded. No retries.
    pub async fn load(&self) -> Result<Snapshot, FetchError> {
        let days = self.spawn_fetch::<Vec<Day>>("days");
        let appointments = self.spawn_fetch::<BTreeMap<AppointmentId, Appointment>>("appointments");
        let interviewers = self.spawn_fetch::<BTreeMap<InterviewerId, Interviewer>>("interviewers");

        let (days, appointments, interviewers) = tokio::try_join!(
            join_fetch("days", days),
            join_fetch("appointments", appointments),
            join_fetch("interviewers", interviewers),
        )?;

        let snapshot = Snapshot::new(days, appointments, interviewers);
        info!(
            "Loaded snapshot: {} days, {} appointments, {} interviewers",
            snapshot.days().len(),
            snapshot.appointments().len(),
            snapshot.interviewers().len()
        );
        Ok(snapshot)
    }

    fn spawn_fetch<T>(&self, resource: &'static str) -> JoinHandle<Result<T, FetchError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();
        let url = self.resource_url(resource);
        tokio::spawn(async move { fetch_json(&client, url, resource).await })
    }

    fn resource_url(&self, resource: &str) -> Url {
        let mut url = self.api_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}/api/{}", base_path, resource));
        url
    }
}

async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: Url,
    resource: &'static str,
) -> Result<T, FetchError> {
    debug!("GET {}", url);
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request { resource, source })?;

    if !resp.status().is_success() {
        return Err(FetchError::Status {
            resource,
            status: resp.status(),
        });
    }

    resp.json::<T>()
        .await
        .map_err(|source| FetchError::Decode { resource, source })
}

async fn join_fetch<T>(
    resource: &'static str,
    handle: JoinHandle<Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(FetchError::Task {
            resource,
            reason: e.to_string(),
        }),
    }
}
