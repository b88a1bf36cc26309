//! Read access to the plan catalog for client commands.
//!
//! [`Catalog`] is the seam between client state (selection, profile) and
//! the HTTP API; tests substitute an in-memory catalog so selection logic
//! is exercised without a running server.

use std::time::Duration;

use anyhow::{Context, Result};
use fitcat_db::models::{
    DietFilter, DietPlan, DietSort, TrainingFilter, TrainingPlan, TrainingSort,
};
use uuid::Uuid;

use crate::selection::SelectionState;

/// Read-side view of the plan catalog.
pub trait Catalog {
    fn list_trainings(&self, filter: &TrainingFilter, sort: TrainingSort)
        -> Result<Vec<TrainingPlan>>;
    fn trainings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<TrainingPlan>>;
    fn get_training(&self, id: Uuid) -> Result<Option<TrainingPlan>>;

    fn list_diets(&self, filter: &DietFilter, sort: DietSort) -> Result<Vec<DietPlan>>;
    fn diets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<DietPlan>>;
    fn get_diet(&self, id: Uuid) -> Result<Option<DietPlan>>;
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// [`Catalog`] backed by the fitcat HTTP API.
pub struct HttpCatalog {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn fetch_list<T>(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.agent.get(&self.url(path));
        for (key, value) in params {
            request = request.query(key, value);
        }
        request
            .call()
            .with_context(|| format!("GET {path} failed"))?
            .into_json()
            .with_context(|| format!("GET {path} returned an unexpected body"))
    }

    fn fetch_one<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.agent.get(&self.url(path)).call() {
            Ok(response) => response
                .into_json()
                .map(Some)
                .with_context(|| format!("GET {path} returned an unexpected body")),
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("GET {path} failed")),
        }
    }
}

fn ids_param(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Catalog for HttpCatalog {
    fn list_trainings(
        &self,
        filter: &TrainingFilter,
        sort: TrainingSort,
    ) -> Result<Vec<TrainingPlan>> {
        let mut params = Vec::new();
        if let Some(category) = &filter.category {
            params.push(("category", category.as_str()));
        }
        if let Some(difficulty) = &filter.difficulty {
            params.push(("difficulty", difficulty.as_str()));
        }
        if let Some(intensity) = &filter.intensity {
            params.push(("intensity", intensity.as_str()));
        }
        if let Some(sort) = sort.as_param() {
            params.push(("sort", sort));
        }
        self.fetch_list("/api/trainings", &params)
    }

    fn trainings_by_ids(&self, ids: &[Uuid]) -> Result<Vec<TrainingPlan>> {
        let joined = ids_param(ids);
        self.fetch_list("/api/trainings", &[("ids", joined.as_str())])
    }

    fn get_training(&self, id: Uuid) -> Result<Option<TrainingPlan>> {
        self.fetch_one(&format!("/api/trainings/{id}"))
    }

    fn list_diets(&self, filter: &DietFilter, sort: DietSort) -> Result<Vec<DietPlan>> {
        let mut params = Vec::new();
        if let Some(goal) = &filter.goal {
            params.push(("goal", goal.as_str()));
        }
        if let Some(sort) = sort.as_param() {
            params.push(("sort", sort));
        }
        self.fetch_list("/api/diets", &params)
    }

    fn diets_by_ids(&self, ids: &[Uuid]) -> Result<Vec<DietPlan>> {
        let joined = ids_param(ids);
        self.fetch_list("/api/diets", &[("ids", joined.as_str())])
    }

    fn get_diet(&self, id: Uuid) -> Result<Option<DietPlan>> {
        self.fetch_one(&format!("/api/diets/{id}"))
    }
}

// ---------------------------------------------------------------------------
// My plans
// ---------------------------------------------------------------------------

/// The selected plans, resolved against the catalog.
#[derive(Debug, Default)]
pub struct MyPlans {
    pub trainings: Vec<TrainingPlan>,
    pub diets: Vec<DietPlan>,
}

/// Resolve the current selection to full plan records.
///
/// Ids whose plan was deleted server-side are simply absent from the
/// result; the selection itself is left untouched. No request is made for
/// a kind with nothing selected. The catalog may change between the
/// selection read and the fetch; the result reflects the catalog at fetch
/// time.
pub fn fetch_my_plans(catalog: &dyn Catalog, selection: &SelectionState) -> Result<MyPlans> {
    let trainings = if selection.trainings.is_empty() {
        Vec::new()
    } else {
        catalog.trainings_by_ids(&selection.trainings)?
    };
    let diets = if selection.diets.is_empty() {
        Vec::new()
    } else {
        catalog.diets_by_ids(&selection.diets)?
    };
    Ok(MyPlans { trainings, diets })
}
