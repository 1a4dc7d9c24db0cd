//! Predictive models

use super::source::Source;
use super::{or_current, post_update, scoped_collection};
use crate::collection::{LazyCollection, ScanMode};
use crate::entity::{Entity, EntityFactory, EntityInfo, Scope, ScopedEntity, Snapshot, dates, record_id};
use crate::error::{DeepintError, DeepintResult, ResultExt};
use crate::http::{ApiContext, ApiRequest};
use crate::task::{ResolvePolicy, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::ops::Deref;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Classifier,
    Regressor,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Classifier => f.write_str("classifier"),
            ModelType::Regressor => f.write_str("regressor"),
        }
    }
}

/// Training algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelMethod {
    Adaboost,
    Bayes,
    Forest,
    Gbt,
    Tree,
    Xgb,
    Logistic,
    Linear,
    Isotonic,
    Knn,
    Mlp,
    Svm,
}

impl ModelMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMethod::Adaboost => "adaboost",
            ModelMethod::Bayes => "bayes",
            ModelMethod::Forest => "forest",
            ModelMethod::Gbt => "gbt",
            ModelMethod::Tree => "tree",
            ModelMethod::Xgb => "xgb",
            ModelMethod::Logistic => "logistic",
            ModelMethod::Linear => "linear",
            ModelMethod::Isotonic => "isotonic",
            ModelMethod::Knn => "knn",
            ModelMethod::Mlp => "mlp",
            ModelMethod::Svm => "svm",
        }
    }

    /// Methods the server accepts for a model type
    pub fn allowed_for(model_type: ModelType) -> &'static [ModelMethod] {
        use ModelMethod::*;
        match model_type {
            ModelType::Classifier => &[
                Adaboost, Bayes, Forest, Gbt, Tree, Xgb, Logistic, Knn, Mlp, Svm,
            ],
            ModelType::Regressor => &[
                Adaboost, Forest, Gbt, Tree, Xgb, Linear, Isotonic, Knn, Mlp, Svm,
            ],
        }
    }

    pub fn is_allowed_for(&self, model_type: ModelType) -> bool {
        Self::allowed_for(model_type).contains(self)
    }
}

impl fmt::Display for ModelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub model_type: Option<ModelType>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, rename = "source")]
    pub source_id: Option<String>,
    /// Index of the predicted feature in the source
    #[serde(default)]
    pub target: Option<u32>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "dates::lenient")]
    pub last_access: Option<DateTime<Utc>>,
}

impl EntityInfo for ModelInfo {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Clone)]
pub struct Model {
    id: String,
    scope: Scope,
    snapshot: Snapshot<ModelInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct ModelUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Model {
    pub async fn update(&self, update: ModelUpdate) -> DeepintResult<()> {
        self.ensure_loaded().await?;
        let current = self.info();
        let next = ModelInfo {
            name: or_current(update.name, &current.name),
            description: or_current(update.description, &current.description),
            ..current
        };

        post_update(
            self,
            json!({"name": next.name, "description": next.description}),
        )
        .await?;

        self.snapshot.replace(next);
        Ok(())
    }
}

impl Entity for Model {
    type Info = ModelInfo;

    fn id(&self) -> &str {
        &self.id
    }

    fn context(&self) -> &ApiContext {
        &self.scope.context
    }

    fn path(&self) -> String {
        self.scope.path(&format!("{}/{}", Self::SEGMENT, self.id))
    }

    fn snapshot(&self) -> &Snapshot<ModelInfo> {
        &self.snapshot
    }
}

impl ScopedEntity for Model {
    const SEGMENT: &'static str = "models";

    fn from_parts(scope: Scope, id: String, snapshot: Snapshot<ModelInfo>) -> Self {
        Self {
            id,
            scope,
            snapshot,
        }
    }
}

crate::impl_entity_identity!(Model);

/// Parameters for training a new model
#[derive(Debug, Clone)]
pub struct ModelParams {
    pub name: String,
    pub description: String,
    pub model_type: ModelType,
    pub method: ModelMethod,
    /// Name of the source feature to predict
    pub target_feature: String,
    pub configuration: Value,
    /// Share of the instances held out for testing, between 0 and 1
    pub test_split_size: f64,
    pub shuffle_test_split: bool,
    /// Seed for the split
    pub initial_model_state: f64,
    pub hyper_parameters: Value,
}

impl ModelParams {
    pub fn new(
        name: impl Into<String>,
        model_type: ModelType,
        method: ModelMethod,
        target_feature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model_type,
            method,
            target_feature: target_feature.into(),
            configuration: json!({}),
            test_split_size: 0.3,
            shuffle_test_split: false,
            initial_model_state: 0.0,
            hyper_parameters: json!({}),
        }
    }
}

/// Outcome of [`WorkspaceModels::create`]
#[derive(Debug, Clone)]
pub enum ModelCreation {
    /// Training finished and the model was loaded
    Created(Model),
    /// Training is still running on the server
    Pending(Task),
}

impl ModelCreation {
    pub fn model(self) -> Option<Model> {
        match self {
            ModelCreation::Created(model) => Some(model),
            ModelCreation::Pending(_) => None,
        }
    }
}

/// Models of one workspace
pub struct WorkspaceModels {
    scope: Scope,
    collection: LazyCollection<Model>,
}

impl WorkspaceModels {
    pub(crate) fn new(scope: Scope, mode: ScanMode) -> Self {
        Self {
            collection: scoped_collection(&scope, "models", mode),
            scope,
        }
    }

    /// Start training a model on `source`.
    ///
    /// With `wait` the training task is resolved with the default
    /// [`ResolvePolicy`] and the new model is returned.
    pub async fn create(
        &self,
        source: &Source,
        params: ModelParams,
        wait: bool,
    ) -> DeepintResult<ModelCreation> {
        let policy = wait.then(ResolvePolicy::default);
        self.create_with_policy(source, params, policy).await
    }

    pub async fn create_with_policy(
        &self,
        source: &Source,
        params: ModelParams,
        wait: Option<ResolvePolicy>,
    ) -> DeepintResult<ModelCreation> {
        if !params.method.is_allowed_for(params.model_type) {
            let allowed: Vec<_> = ModelMethod::allowed_for(params.model_type)
                .iter()
                .map(ModelMethod::as_str)
                .collect();
            return Err(DeepintError::invalid_input(
                "MODEL_MISMATCH",
                format!(
                    "Provided model method ({}) doesn't match for model type {}. Allowed methods for provided type: {:?}",
                    params.method, params.model_type, allowed
                ),
            ));
        }

        let target = self.target_index(source, &params.target_feature).await?;

        let request = ApiRequest::post(self.scope.path("models")).with_parameters(json!({
            "name": params.name,
            "description": params.description,
            "type": params.model_type,
            "method": params.method,
            "source": source.id(),
            "target": target,
            "configuration": params.configuration,
            "training_configuration": {
                "test_size": params.test_split_size,
                "shuffle": params.shuffle_test_split,
                "random_state": params.initial_model_state,
            },
            "hyper_search_configuration": params.hyper_parameters,
        }));
        let body = self
            .scope
            .context
            .send(request)
            .await
            .context("Creating model")?;
        let task: Task = self.scope.build(&record_id(&body, "task_id")?);

        let Some(policy) = wait else {
            return Ok(ModelCreation::Pending(task));
        };

        task.resolve(policy).await?;
        let result = task.fetch_result().await?;
        let model: Model = self.scope.build(&record_id(&result, "model")?);
        model.load().await?;
        info!(model_id = model.id(), task_id = task.id(), "model trained");

        self.collection.adopt(model.clone()).await;
        Ok(ModelCreation::Created(model))
    }

    async fn target_index(&self, source: &Source, target_feature: &str) -> DeepintResult<u32> {
        let mismatch = || {
            DeepintError::invalid_input(
                "SOURCE_MISMATCH",
                "Provided source for model creation was not found or provided target feature is not configured in the source.",
            )
        };

        let features = match source.loaded_features().await {
            Ok(features) => features,
            Err(e) if e.is_not_found() => return Err(mismatch()),
            Err(e) => return Err(e),
        };

        features
            .iter()
            .find(|f| f.name == target_feature)
            .and_then(|f| f.index)
            .ok_or_else(mismatch)
    }
}

impl Deref for WorkspaceModels {
    type Target = LazyCollection<Model>;

    fn deref(&self) -> &Self::Target {
        &self.collection
    }
}
